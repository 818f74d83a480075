//! C-compatible status codes.
//!
//! [`SlicedStatus`] is a `repr(i32)` enum covering every failure the C
//! surface can report. Conversions from [`SliceError`] are provided.

use sliced_core::SliceError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlicedStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null, negative, zero-sized, or otherwise invalid.
    InvalidArgument = -2,
    /// Index does not address a live element.
    IndexOutOfRange = -3,
    /// Sub-range bounds are out of bounds, empty, inverted, or the step is zero.
    InvalidRange = -4,
    /// Reduce was called on an empty container.
    EmptyReduce = -5,
    /// A data block does not match the container's element size.
    ElementSizeMismatch = -6,
    /// Growth would exceed the configured capacity ceiling.
    CapacityExceeded = -7,
    /// The allocator refused the request or its size overflowed.
    AllocationFailed = -8,
    /// A caller-supplied callback reported failure.
    CallbackFailed = -9,
    /// Caller-provided output buffer is too small.
    BufferTooSmall = -10,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -11,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&SliceError> for SlicedStatus {
    fn from(e: &SliceError) -> Self {
        match e {
            SliceError::NegativeCapacity { .. }
            | SliceError::ZeroElementSize
            | SliceError::Config(_) => SlicedStatus::InvalidArgument,
            SliceError::IndexOutOfRange { .. } => SlicedStatus::IndexOutOfRange,
            SliceError::RangeOutOfBounds { .. }
            | SliceError::EmptyRange { .. }
            | SliceError::ZeroStep => SlicedStatus::InvalidRange,
            SliceError::EmptyReduce => SlicedStatus::EmptyReduce,
            SliceError::ElementSizeMismatch { .. } => SlicedStatus::ElementSizeMismatch,
            SliceError::CapacityExceeded { .. } => SlicedStatus::CapacityExceeded,
            SliceError::AllocationFailed { .. } => SlicedStatus::AllocationFailed,
            SliceError::CallbackFailed { .. } => SlicedStatus::CallbackFailed,
        }
    }
}
