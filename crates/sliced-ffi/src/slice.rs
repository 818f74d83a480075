//! Container lifecycle and operations over the C boundary.
//!
//! Elements are opaque blocks of the size given at creation. Reads copy
//! blocks out into caller buffers and writes copy them in, so no pointer
//! into container storage ever escapes to C.
//!
//! Map, filter and reduce run their callbacks over a snapshot taken under
//! the container lock; the lock is released before the first callback, so
//! a callback may call back into any handle. `sliced_for_each` mutates in
//! place and holds the lock for the whole walk: its callback must not
//! call back into the same handle.

use std::ffi::c_void;
use std::sync::{Arc, Mutex};

use sliced_core::RawSlice;
use tracing::debug;

use crate::handle::HandleTable;
use crate::status::SlicedStatus;

type SliceArc = Arc<Mutex<RawSlice>>;

static SLICES: Mutex<HandleTable<SliceArc>> = Mutex::new(HandleTable::new());

/// Map callback: read `elem`, write exactly `result_size` bytes to `out`.
///
/// Returns 0 on success; any other value aborts the map.
pub type SlicedMapFn =
    extern "C" fn(elem: *const c_void, out: *mut c_void, user_data: *mut c_void) -> i32;

/// Filter predicate: non-zero keeps the element.
pub type SlicedPredicateFn = extern "C" fn(elem: *const c_void, user_data: *mut c_void) -> i32;

/// Reduce callback: fold `elem` into the accumulator `acc` in place.
pub type SlicedReduceFn =
    extern "C" fn(acc: *mut c_void, elem: *const c_void, user_data: *mut c_void);

/// For-each callback: may modify `elem` in place.
pub type SlicedForEachFn = extern "C" fn(elem: *mut c_void, user_data: *mut c_void);

/// Size and capacity snapshot of a container.
///
/// Fixed-width `u64` fields for ABI portability.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlicedInfo {
    /// Number of live elements.
    pub len: u64,
    /// Element slots available before the next growth.
    pub capacity: u64,
    /// Byte width of one element.
    pub element_size: u64,
    /// Bytes reserved for the buffer.
    pub memory_bytes: u64,
}

/// Clone the Arc for a handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
fn get_slice(handle: u64) -> Option<SliceArc> {
    SLICES.lock().ok()?.get(handle).cloned()
}

/// Copy a container's contents so callbacks can run without its lock.
fn snapshot(handle: u64) -> Result<RawSlice, SlicedStatus> {
    let arc = get_slice(handle).ok_or(SlicedStatus::InvalidHandle)?;
    let guard = arc.lock().map_err(|_| SlicedStatus::InternalError)?;
    Ok(guard.clone())
}

/// Register a derived container and write its handle to `out`.
#[allow(unsafe_code)]
fn publish(slice: RawSlice, out: *mut u64) -> i32 {
    let handle = ffi_lock!(SLICES).insert(Arc::new(Mutex::new(slice)));
    // SAFETY: `out` was null-checked by the caller and is valid per contract.
    unsafe { *out = handle };
    SlicedStatus::Ok as i32
}

/// View `len` caller bytes at `ptr`. A zero length never dereferences.
///
/// # Safety
///
/// When `len > 0` and `ptr` is non-null, `ptr` must be valid for reads of
/// `len` bytes for the duration of the borrow.
#[allow(unsafe_code)]
unsafe fn input_bytes<'a>(ptr: *const c_void, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    // SAFETY: upheld by the caller.
    Some(unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) })
}

/// Copy `block` into a caller buffer of `out_len` bytes.
#[allow(unsafe_code)]
fn write_out(out: *mut c_void, out_len: usize, block: &[u8]) -> i32 {
    if out.is_null() {
        return SlicedStatus::InvalidArgument as i32;
    }
    if out_len < block.len() {
        return SlicedStatus::BufferTooSmall as i32;
    }
    // SAFETY: `out` is non-null and valid for `out_len >= block.len()`
    // bytes per contract; caller memory cannot overlap container storage.
    unsafe { std::ptr::copy_nonoverlapping(block.as_ptr(), out.cast::<u8>(), block.len()) };
    SlicedStatus::Ok as i32
}

fn to_index(value: i64) -> Option<isize> {
    isize::try_from(value).ok()
}

// ── Lifecycle ───────────────────────────────────────────────────

/// Create a container of `element_size`-byte elements. Returns handle via `out`.
///
/// Fails with `InvalidArgument` for a negative capacity or zero element size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_create(element_size: usize, initial_capacity: i64, out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return SlicedStatus::InvalidArgument as i32;
        }
        match RawSlice::new(element_size, initial_capacity) {
            Ok(slice) => publish(slice, out),
            Err(e) => SlicedStatus::from(&e) as i32,
        }
    })
}

/// Destroy a container, releasing its buffer.
///
/// Destroying an already-destroyed handle returns `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(SLICES).remove(handle) {
            Some(_) => SlicedStatus::Ok as i32,
            None => SlicedStatus::InvalidHandle as i32,
        }
    })
}

/// Number of containers currently alive across all handles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_live_count() -> usize {
    ffi_guard_or!(0, { SLICES.lock().map(|t| t.live()).unwrap_or(0) })
}

// ── Introspection ───────────────────────────────────────────────

/// Number of live elements.
///
/// **Ambiguity warning:** returns 0 for both "empty" and "invalid handle."
/// Prefer [`sliced_info`] for unambiguous error detection.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_len(handle: u64) -> usize {
    ffi_guard_or!(0, {
        get_slice(handle)
            .and_then(|arc| arc.lock().ok().map(|s| s.len()))
            .unwrap_or(0)
    })
}

/// Element capacity. Returns 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_capacity(handle: u64) -> usize {
    ffi_guard_or!(0, {
        get_slice(handle)
            .and_then(|arc| arc.lock().ok().map(|s| s.capacity()))
            .unwrap_or(0)
    })
}

/// Element size in bytes. Returns 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_element_size(handle: u64) -> usize {
    ffi_guard_or!(0, {
        get_slice(handle)
            .and_then(|arc| arc.lock().ok().map(|s| s.element_size()))
            .unwrap_or(0)
    })
}

/// Write a [`SlicedInfo`] snapshot to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_info(handle: u64, out: *mut SlicedInfo) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return SlicedStatus::InvalidArgument as i32;
        }
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let slice = ffi_lock!(arc);
        let info = SlicedInfo {
            len: slice.len() as u64,
            capacity: slice.capacity() as u64,
            element_size: slice.element_size() as u64,
            memory_bytes: slice.memory_bytes() as u64,
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = info };
        SlicedStatus::Ok as i32
    })
}

// ── Element access ──────────────────────────────────────────────

/// Copy the element at `index` (negative counts from the tail) into `out`.
///
/// `out_len` must be at least the element size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_get(handle: u64, index: i64, out: *mut c_void, out_len: usize) -> i32 {
    ffi_guard!({
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let slice = ffi_lock!(arc);
        match to_index(index).and_then(|i| slice.get(i)) {
            Some(block) => write_out(out, out_len, block),
            None => SlicedStatus::IndexOutOfRange as i32,
        }
    })
}

/// Overwrite the element at `index` with `len` bytes from `data`.
///
/// `len` must equal the element size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_set(handle: u64, index: i64, data: *const c_void, len: usize) -> i32 {
    ffi_guard!({
        // SAFETY: data is valid for len bytes per caller contract.
        let block = match unsafe { input_bytes(data, len) } {
            Some(b) => b,
            None => return SlicedStatus::InvalidArgument as i32,
        };
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let mut slice = ffi_lock!(arc);
        let element_size = slice.element_size();
        if block.len() != element_size {
            return SlicedStatus::ElementSizeMismatch as i32;
        }
        match to_index(index).and_then(|i| slice.get_mut(i)) {
            Some(dst) => {
                dst.copy_from_slice(block);
                SlicedStatus::Ok as i32
            }
            None => SlicedStatus::IndexOutOfRange as i32,
        }
    })
}

// ── Derived containers ──────────────────────────────────────────

/// Copy a strided sub-range into a new container. Returns handle via `out`.
///
/// A negative `end` includes the element it addresses; a negative `step`
/// walks back to front. Empty or inverted ranges return `InvalidRange`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_sub_range(
    handle: u64,
    start: i64,
    end: i64,
    step: i64,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return SlicedStatus::InvalidArgument as i32;
        }
        let (start, end, step) = match (to_index(start), to_index(end), to_index(step)) {
            (Some(a), Some(b), Some(s)) => (a, b, s),
            _ => return SlicedStatus::InvalidRange as i32,
        };
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let derived = ffi_lock!(arc).sub_range(start, end, step);
        match derived {
            Ok(slice) => publish(slice, out),
            Err(e) => SlicedStatus::from(&e) as i32,
        }
    })
}

/// Map every element into a new container of `result_size`-byte elements.
///
/// Nothing is registered unless every callback succeeds.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_map(
    handle: u64,
    result_size: usize,
    f: Option<SlicedMapFn>,
    user_data: *mut c_void,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        let f = match f {
            Some(f) if !out.is_null() => f,
            _ => return SlicedStatus::InvalidArgument as i32,
        };
        let source = match snapshot(handle) {
            Ok(s) => s,
            Err(status) => return status as i32,
        };
        let mapped = source.map(result_size, |src, dst| {
            f(src.as_ptr().cast(), dst.as_mut_ptr().cast(), user_data) == 0
        });
        match mapped {
            Ok(slice) => publish(slice, out),
            Err(e) => {
                debug!(handle, error = %e, "sliced_map failed");
                SlicedStatus::from(&e) as i32
            }
        }
    })
}

/// Copy the elements for which `predicate` returns non-zero into a new
/// container.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_filter(
    handle: u64,
    predicate: Option<SlicedPredicateFn>,
    user_data: *mut c_void,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        let predicate = match predicate {
            Some(p) if !out.is_null() => p,
            _ => return SlicedStatus::InvalidArgument as i32,
        };
        let source = match snapshot(handle) {
            Ok(s) => s,
            Err(status) => return status as i32,
        };
        match source.filter(|block| predicate(block.as_ptr().cast(), user_data) != 0) {
            Ok(slice) => publish(slice, out),
            Err(e) => SlicedStatus::from(&e) as i32,
        }
    })
}

/// Fold all elements left-to-right and copy the accumulator into `out`.
///
/// The accumulator starts as a copy of element 0. An empty container
/// returns `EmptyReduce` and leaves `out` untouched. A null `out` is
/// rejected before any callback runs.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_reduce(
    handle: u64,
    combine: Option<SlicedReduceFn>,
    user_data: *mut c_void,
    out: *mut c_void,
    out_len: usize,
) -> i32 {
    ffi_guard!({
        let combine = match combine {
            Some(c) if !out.is_null() => c,
            _ => return SlicedStatus::InvalidArgument as i32,
        };
        let source = match snapshot(handle) {
            Ok(s) => s,
            Err(status) => return status as i32,
        };
        let reduced = source.reduce(|acc, block| {
            combine(acc.as_mut_ptr().cast(), block.as_ptr().cast(), user_data)
        });
        match reduced {
            Ok(acc) => write_out(out, out_len, &acc),
            Err(e) => SlicedStatus::from(&e) as i32,
        }
    })
}

/// Call `f` on every element in order; `f` may modify elements in place.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_for_each(
    handle: u64,
    f: Option<SlicedForEachFn>,
    user_data: *mut c_void,
) -> i32 {
    ffi_guard!({
        let f = match f {
            Some(f) => f,
            None => return SlicedStatus::InvalidArgument as i32,
        };
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let mut slice = ffi_lock!(arc);
        slice.for_each_mut(|block| f(block.as_mut_ptr().cast(), user_data));
        SlicedStatus::Ok as i32
    })
}

// ── Mutation ────────────────────────────────────────────────────

/// Append one element of `len` bytes; `len` must equal the element size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_append(handle: u64, data: *const c_void, len: usize) -> i32 {
    ffi_guard!({
        // SAFETY: data is valid for len bytes per caller contract.
        let block = match unsafe { input_bytes(data, len) } {
            Some(b) => b,
            None => return SlicedStatus::InvalidArgument as i32,
        };
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let result = ffi_lock!(arc).append(block);
        match result {
            Ok(()) => SlicedStatus::Ok as i32,
            Err(e) => SlicedStatus::from(&e) as i32,
        }
    })
}

/// Append `count` packed elements from `data`.
///
/// `data` must hold `count * element_size` bytes. On failure, elements
/// appended before it remain in the container.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_append_array(handle: u64, data: *const c_void, count: usize) -> i32 {
    ffi_guard!({
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let mut slice = ffi_lock!(arc);
        let len = match count.checked_mul(slice.element_size()) {
            Some(len) => len,
            None => return SlicedStatus::AllocationFailed as i32,
        };
        // SAFETY: data is valid for count * element_size bytes per caller contract.
        let blocks = match unsafe { input_bytes(data, len) } {
            Some(b) => b,
            None => return SlicedStatus::InvalidArgument as i32,
        };
        match slice.append_array(blocks, count) {
            Ok(()) => SlicedStatus::Ok as i32,
            Err(e) => SlicedStatus::from(&e) as i32,
        }
    })
}

/// Append every element of `src` onto `dest`; `src` is not modified.
///
/// `dest` and `src` may be the same handle, in which case the original
/// contents are appended once. Partial effect on failure as for
/// [`sliced_append_array`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_extend(dest: u64, src: u64) -> i32 {
    ffi_guard!({
        let source = match snapshot(src) {
            Ok(s) => s,
            Err(status) => return status as i32,
        };
        let arc = match get_slice(dest) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        let result = ffi_lock!(arc).extend(&source);
        match result {
            Ok(()) => SlicedStatus::Ok as i32,
            Err(e) => SlicedStatus::from(&e) as i32,
        }
    })
}

/// Release the buffer and reset length and capacity to zero.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn sliced_empty(handle: u64) -> i32 {
    ffi_guard!({
        let arc = match get_slice(handle) {
            Some(arc) => arc,
            None => return SlicedStatus::InvalidHandle as i32,
        };
        ffi_lock!(arc).empty();
        SlicedStatus::Ok as i32
    })
}
