//! Sliced: growable slice containers with negative indexing, strided
//! sub-ranges, and checked growth.
//!
//! This is the top-level facade crate that re-exports the public API of
//! `sliced-core`. The C surface lives in the separate `sliced-ffi` crate.
//!
//! # Quick start
//!
//! ```rust
//! use sliced::prelude::*;
//!
//! let mut s = Slice::with_capacity(2).unwrap();
//! for v in [5, 9, 2, 7] {
//!     s.append(v).unwrap();
//! }
//! assert_eq!(s.capacity(), 4);
//! assert_eq!(s.get(-1), Some(&7));
//!
//! // A negative end includes the element it addresses.
//! let all = s.sub_range(0, -1, 1).unwrap();
//! assert_eq!(all.as_slice(), &[5, 9, 2, 7]);
//! let back = s.sub_range(0, -1, -2).unwrap();
//! assert_eq!(back.as_slice(), &[7, 9]);
//!
//! assert_eq!(s.reduce(|acc, v| acc + v), Ok(23));
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `SliceConfig`, `GrowthPolicy`, capacity ceilings |
//! | [`error`] | `SliceError` and its variants |
//! | [`index`] | Negative index and range resolution |
//! | [`raw`] | `RawSlice`, the type-erased byte-block container |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Construction parameters and growth policies.
pub use sliced_core::config;

/// Error types.
pub use sliced_core::error;

/// Index and range resolution.
///
/// [`index::ResolvedRange`] exposes the exact walk a sub-range copy
/// performs, which is handy for callers that want to visit positions
/// without copying.
pub use sliced_core::index;

/// Type-erased container over fixed-size byte blocks.
pub use sliced_core::raw;

pub use sliced_core::{ConfigError, GrowthPolicy, RawSlice, Slice, SliceConfig, SliceError};

/// Common imports for typical usage.
///
/// ```rust
/// use sliced::prelude::*;
/// ```
pub mod prelude {
    pub use sliced_core::{GrowthPolicy, RawSlice, Slice, SliceConfig, SliceError};
}
