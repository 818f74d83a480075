//! C FFI bindings for sliced containers.
//!
//! Exposes the type-erased [`RawSlice`](sliced_core::RawSlice) behind
//! generation-checked `u64` handles. Every function returns an
//! [`SlicedStatus`] code (or a plain value for the convenience getters),
//! and panics never cross the boundary.
//!
//! Each container lives in its own `Arc<Mutex<_>>`; the global handle
//! table lock is held only for lookup, so callbacks may call into the
//! surface for other handles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body returning an `i32` status, converting panics to
/// `SlicedStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(_) => $crate::status::SlicedStatus::Panicked as i32,
        }
    };
}

/// Run an FFI body returning a plain value, substituting `$default` on panic.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)).unwrap_or($default)
    };
}

/// Lock a mutex or return `SlicedStatus::InternalError` if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::SlicedStatus::InternalError as i32,
        }
    };
}

mod handle;
pub mod slice;
pub mod status;

pub use slice::{
    SlicedForEachFn, SlicedInfo, SlicedMapFn, SlicedPredicateFn, SlicedReduceFn,
};
pub use status::SlicedStatus;
