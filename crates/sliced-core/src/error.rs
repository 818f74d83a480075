//! Error types for slice containers.
//!
//! Every constructive or mutating operation reports failure through
//! [`SliceError`]. Lookups that can only miss return `Option` instead.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur during slice operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceError {
    /// A negative initial capacity was requested.
    NegativeCapacity {
        /// The requested capacity.
        requested: i64,
    },
    /// A type-erased container was created with a zero element size.
    ZeroElementSize,
    /// An index did not resolve to a live element.
    IndexOutOfRange {
        /// The index as supplied by the caller.
        index: isize,
        /// Logical length at the time of the lookup.
        len: usize,
    },
    /// A sub-range bound lies outside the accepted window.
    RangeOutOfBounds {
        /// Start bound as supplied.
        start: isize,
        /// End bound as supplied.
        end: isize,
        /// Logical length of the source.
        len: usize,
    },
    /// After resolution the sub-range is empty or inverted.
    EmptyRange {
        /// Resolved start slot.
        start: usize,
        /// Resolved (exclusive) end slot.
        end: usize,
    },
    /// A sub-range step of zero was requested.
    ZeroStep,
    /// Reduce was called on a container with no elements.
    EmptyReduce,
    /// A byte block did not match the length implied by the element size.
    ElementSizeMismatch {
        /// Expected length in bytes.
        expected: usize,
        /// Length of the supplied block.
        actual: usize,
    },
    /// Growth would exceed the configured `max_capacity`.
    CapacityExceeded {
        /// Capacity (in elements) the operation needed.
        requested: usize,
        /// Configured ceiling (in elements).
        max: usize,
    },
    /// The allocator refused the request, or its byte size overflowed.
    AllocationFailed {
        /// Capacity (in elements) that could not be allocated.
        requested: usize,
    },
    /// A caller-supplied mapper reported failure.
    CallbackFailed {
        /// Position of the element being processed.
        index: usize,
    },
    /// The supplied [`SliceConfig`](crate::SliceConfig) failed validation.
    Config(ConfigError),
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeCapacity { requested } => {
                write!(f, "negative initial capacity: {requested}")
            }
            Self::ZeroElementSize => write!(f, "element size must be non-zero"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::RangeOutOfBounds { start, end, len } => {
                write!(f, "range {start}..{end} out of bounds for length {len}")
            }
            Self::EmptyRange { start, end } => {
                write!(f, "resolved range {start}..{end} is empty")
            }
            Self::ZeroStep => write!(f, "step must be non-zero"),
            Self::EmptyReduce => write!(f, "cannot reduce an empty slice"),
            Self::ElementSizeMismatch { expected, actual } => {
                write!(f, "element size mismatch: expected {expected} bytes, got {actual}")
            }
            Self::CapacityExceeded { requested, max } => {
                write!(f, "capacity exceeded: requested {requested} elements, max {max}")
            }
            Self::AllocationFailed { requested } => {
                write!(f, "allocation failed for {requested} elements")
            }
            Self::CallbackFailed { index } => {
                write!(f, "callback failed at element {index}")
            }
            Self::Config(e) => write!(f, "invalid slice config: {e}"),
        }
    }
}

impl Error for SliceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SliceError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
