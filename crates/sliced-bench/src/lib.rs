//! Benchmark profiles for sliced containers.
//!
//! - [`reference_len`] / [`stress_len`]: element counts used across benches
//! - [`sequential`]: a generic container pre-filled with `0..len`
//! - [`growth_configs`]: one config per growth policy, starting from empty

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sliced_core::{GrowthPolicy, Slice, SliceConfig, SliceError};

/// Element count for the reference profile (10K).
pub fn reference_len() -> usize {
    10_000
}

/// Element count for the stress profile (1M).
pub fn stress_len() -> usize {
    1_000_000
}

/// A container holding `0..len`, sized exactly.
pub fn sequential(len: usize) -> Result<Slice<i64>, SliceError> {
    let mut s = Slice::with_capacity(len)?;
    for v in 0..len as i64 {
        s.append(v)?;
    }
    Ok(s)
}

/// Empty-start configs for each growth policy, labelled for bench ids.
pub fn growth_configs() -> [(&'static str, SliceConfig); 2] {
    [
        (
            "doubling",
            SliceConfig::new(0).with_growth(GrowthPolicy::Doubling),
        ),
        ("legacy", SliceConfig::new(0).with_growth(GrowthPolicy::Legacy)),
    ]
}
