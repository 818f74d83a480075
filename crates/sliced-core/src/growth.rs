//! Capacity planning shared by the generic and type-erased containers.
//!
//! All arithmetic is checked: a plan either yields a capacity whose byte
//! size fits in `isize::MAX`, or an error. Nothing is allocated here.

use tracing::debug;

use crate::config::SliceConfig;
use crate::error::SliceError;

/// Byte size of `capacity` elements of `element_size` bytes.
pub(crate) fn byte_len(capacity: usize, element_size: usize) -> Result<usize, SliceError> {
    capacity
        .checked_mul(element_size)
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or(SliceError::AllocationFailed {
            requested: capacity,
        })
}

/// Check an initial capacity against the config ceiling and byte limits.
pub(crate) fn check_initial(config: &SliceConfig, element_size: usize) -> Result<usize, SliceError> {
    config.validate()?;
    byte_len(config.initial_capacity, element_size)
}

/// Capacity to grow to when a container holding `current` slots is full.
pub(crate) fn plan(
    config: &SliceConfig,
    current: usize,
    element_size: usize,
) -> Result<usize, SliceError> {
    let mut next = config
        .growth
        .next_capacity(current)
        .ok_or(SliceError::AllocationFailed {
            requested: usize::MAX,
        })?;
    if let Some(max) = config.max_capacity {
        if current >= max {
            debug!(current, max, "growth refused at capacity ceiling");
            return Err(SliceError::CapacityExceeded {
                requested: current.saturating_add(1),
                max,
            });
        }
        next = next.min(max);
    }
    byte_len(next, element_size)?;
    Ok(next)
}
