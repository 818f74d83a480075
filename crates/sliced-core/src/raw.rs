//! Type-erased container over fixed-size byte blocks.
//!
//! [`RawSlice`] stores elements as opaque blocks of `element_size` bytes,
//! for callers that cannot name the element type (the C surface in
//! `sliced-ffi`). It mirrors [`Slice<T>`](crate::Slice) operation for
//! operation, but every incoming block is length-checked so a size
//! mismatch is an error rather than silent corruption.
//!
//! The buffer is kept zero-filled out to `capacity * element_size` bytes,
//! so every slot below `capacity` is addressable.

use std::ops::Range;
use std::slice::ChunksExact;

use tracing::{debug, trace};

use crate::config::SliceConfig;
use crate::error::SliceError;
use crate::growth;
use crate::index::{resolve_index, ResolvedRange};

/// A growable array of fixed-size byte blocks.
#[derive(Clone, Debug)]
pub struct RawSlice {
    buf: Vec<u8>,
    len: usize,
    capacity: usize,
    element_size: usize,
    config: SliceConfig,
}

impl RawSlice {
    /// Create an empty container for `element_size`-byte blocks.
    ///
    /// `initial_capacity` is signed so that callers holding C integers can
    /// pass them through; a negative value is
    /// [`SliceError::NegativeCapacity`].
    pub fn new(element_size: usize, initial_capacity: i64) -> Result<Self, SliceError> {
        if initial_capacity < 0 {
            return Err(SliceError::NegativeCapacity {
                requested: initial_capacity,
            });
        }
        let capacity =
            usize::try_from(initial_capacity).map_err(|_| SliceError::AllocationFailed {
                requested: usize::MAX,
            })?;
        Self::with_config(element_size, SliceConfig::new(capacity))
    }

    /// Create an empty container from a full configuration.
    pub fn with_config(element_size: usize, config: SliceConfig) -> Result<Self, SliceError> {
        if element_size == 0 {
            return Err(SliceError::ZeroElementSize);
        }
        let bytes = growth::check_initial(&config, element_size)?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes)
            .map_err(|_| SliceError::AllocationFailed {
                requested: config.initial_capacity,
            })?;
        buf.resize(bytes, 0);
        Ok(Self {
            buf,
            len: 0,
            capacity: config.initial_capacity,
            element_size,
            config,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container has no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element slots available before the next growth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Byte width of one element.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// The configuration this container grows by.
    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// Bytes reserved for `capacity` elements.
    pub fn memory_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Live elements as one packed byte run.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len * self.element_size]
    }

    /// Iterate live elements as `element_size`-byte blocks.
    pub fn iter(&self) -> ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.element_size)
    }

    /// Borrow the block at `index`; negative indices count from the tail.
    pub fn get(&self, index: isize) -> Option<&[u8]> {
        let slot = resolve_index(self.len, index)?;
        Some(&self.buf[self.span(slot)])
    }

    /// Mutably borrow the block at `index`.
    pub fn get_mut(&mut self, index: isize) -> Option<&mut [u8]> {
        let slot = resolve_index(self.len, index)?;
        let span = self.span(slot);
        Some(&mut self.buf[span])
    }

    /// Append one block, growing first if the container is full.
    ///
    /// `block` must be exactly `element_size` bytes. On failure the
    /// container is left exactly as it was.
    pub fn append(&mut self, block: &[u8]) -> Result<(), SliceError> {
        self.check_block(block)?;
        self.reserve_one()?;
        let span = self.span(self.len);
        self.buf[span].copy_from_slice(block);
        self.len += 1;
        Ok(())
    }

    /// Append `count` packed blocks from `blocks`.
    ///
    /// `blocks` must hold exactly `count * element_size` bytes; that is
    /// checked before anything is appended. A growth failure part-way
    /// leaves the blocks appended so far in place.
    pub fn append_array(&mut self, blocks: &[u8], count: usize) -> Result<(), SliceError> {
        let expected = count
            .checked_mul(self.element_size)
            .ok_or(SliceError::AllocationFailed { requested: count })?;
        if blocks.len() != expected {
            return Err(SliceError::ElementSizeMismatch {
                expected,
                actual: blocks.len(),
            });
        }
        for block in blocks.chunks_exact(self.element_size) {
            self.append(block)?;
        }
        Ok(())
    }

    /// Append every block of `other` in order; `other` is not modified.
    ///
    /// Element sizes must match. Same partial-effect semantics as
    /// [`append_array`](Self::append_array).
    pub fn extend(&mut self, other: &RawSlice) -> Result<(), SliceError> {
        if other.element_size != self.element_size {
            return Err(SliceError::ElementSizeMismatch {
                expected: self.element_size,
                actual: other.element_size,
            });
        }
        for block in other.iter() {
            self.append(block)?;
        }
        Ok(())
    }

    /// Release the buffer and reset length and capacity to zero.
    pub fn empty(&mut self) {
        self.buf = Vec::new();
        self.len = 0;
        self.capacity = 0;
    }

    /// Copy a strided, directional sub-range into a new container.
    ///
    /// Bounds and step follow [`Slice::sub_range`](crate::Slice::sub_range).
    pub fn sub_range(&self, start: isize, end: isize, step: isize) -> Result<RawSlice, SliceError> {
        let range = ResolvedRange::new(self.len, start, end, step)?;
        let mut out =
            RawSlice::with_config(self.element_size, self.config.derived(range.capacity_hint()))?;
        for slot in range.walk() {
            let block = self.get(slot as isize).ok_or(SliceError::IndexOutOfRange {
                index: slot as isize,
                len: self.len,
            })?;
            out.append(block).inspect_err(|e| {
                debug!(error = %e, start, end, step, "raw sub_range aborted");
            })?;
        }
        Ok(out)
    }

    /// Build a container of `result_size`-byte blocks by mapping each block.
    ///
    /// `f` receives the source block and a zeroed output block to fill, and
    /// returns `false` to signal failure. Any failure drops the partial
    /// result before returning.
    pub fn map<F>(&self, result_size: usize, mut f: F) -> Result<RawSlice, SliceError>
    where
        F: FnMut(&[u8], &mut [u8]) -> bool,
    {
        let mut out = RawSlice::with_config(result_size, self.config.derived(self.len))?;
        let mut scratch = vec![0u8; result_size];
        for (index, block) in self.iter().enumerate() {
            scratch.fill(0);
            if !f(block, &mut scratch) {
                debug!(index, "raw map callback failed");
                return Err(SliceError::CallbackFailed { index });
            }
            out.append(&scratch).inspect_err(|e| {
                debug!(error = %e, index, "raw map aborted");
            })?;
        }
        Ok(out)
    }

    /// Copy the blocks matching `predicate` into a new container.
    pub fn filter<F>(&self, mut predicate: F) -> Result<RawSlice, SliceError>
    where
        F: FnMut(&[u8]) -> bool,
    {
        let mut out = RawSlice::with_config(self.element_size, self.config.derived(0))?;
        for block in self.iter() {
            if predicate(block) {
                out.append(block).inspect_err(|e| {
                    debug!(error = %e, "raw filter aborted");
                })?;
            }
        }
        Ok(out)
    }

    /// Fold left-to-right into a copy of the first block.
    ///
    /// `combine` updates the accumulator in place. The final accumulator is
    /// returned as an owned buffer of `element_size` bytes.
    pub fn reduce<F>(&self, mut combine: F) -> Result<Vec<u8>, SliceError>
    where
        F: FnMut(&mut [u8], &[u8]),
    {
        let mut blocks = self.iter();
        let mut acc = blocks.next().ok_or(SliceError::EmptyReduce)?.to_vec();
        for block in blocks {
            combine(&mut acc, block);
        }
        Ok(acc)
    }

    /// Apply `f` to each block in order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&[u8]),
    {
        self.iter().for_each(f);
    }

    /// Apply `f` to each block in order, allowing in-place updates.
    pub fn for_each_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut [u8]),
    {
        let live = self.len * self.element_size;
        self.buf[..live]
            .chunks_exact_mut(self.element_size)
            .for_each(f);
    }

    fn span(&self, slot: usize) -> Range<usize> {
        let start = slot * self.element_size;
        start..start + self.element_size
    }

    fn check_block(&self, block: &[u8]) -> Result<(), SliceError> {
        if block.len() != self.element_size {
            return Err(SliceError::ElementSizeMismatch {
                expected: self.element_size,
                actual: block.len(),
            });
        }
        Ok(())
    }

    fn reserve_one(&mut self) -> Result<(), SliceError> {
        if self.len < self.capacity {
            return Ok(());
        }
        let next = growth::plan(&self.config, self.capacity, self.element_size)?;
        let bytes = growth::byte_len(next, self.element_size)?;
        self.buf
            .try_reserve_exact(bytes - self.buf.len())
            .map_err(|_| {
                debug!(requested = next, "allocator refused raw growth");
                SliceError::AllocationFailed { requested: next }
            })?;
        self.buf.resize(bytes, 0);
        trace!(from = self.capacity, to = next, "raw slice grew");
        self.capacity = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i32s(values: &[i32]) -> RawSlice {
        let mut s = RawSlice::new(4, values.len() as i64).unwrap();
        for v in values {
            s.append(&v.to_le_bytes()).unwrap();
        }
        s
    }

    fn read_i32(block: &[u8]) -> i32 {
        i32::from_le_bytes(block.try_into().unwrap())
    }

    fn to_vec(s: &RawSlice) -> Vec<i32> {
        s.iter().map(read_i32).collect()
    }

    #[test]
    fn new_is_zero_filled() {
        let s = RawSlice::new(8, 4).unwrap();
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.memory_bytes(), 32);
        assert!(s.buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn negative_capacity_rejected() {
        assert_eq!(
            RawSlice::new(4, -1).unwrap_err(),
            SliceError::NegativeCapacity { requested: -1 }
        );
    }

    #[test]
    fn zero_element_size_rejected() {
        assert_eq!(RawSlice::new(0, 4).unwrap_err(), SliceError::ZeroElementSize);
    }

    #[test]
    fn oversized_initial_capacity_is_allocation_failure() {
        let err = RawSlice::new(1 << 20, i64::MAX).unwrap_err();
        assert!(matches!(err, SliceError::AllocationFailed { .. }));
    }

    #[test]
    fn round_trip_for_various_sizes() {
        for size in [1usize, 4, 16] {
            let mut s = RawSlice::new(size, 0).unwrap();
            for i in 0..5u8 {
                let block = vec![i.wrapping_mul(31); size];
                s.append(&block).unwrap();
                assert_eq!(s.get(-1), Some(block.as_slice()));
                assert_eq!(s.get(s.len() as isize - 1), Some(block.as_slice()));
            }
        }
    }

    #[test]
    fn wrong_block_size_rejected_without_side_effect() {
        let mut s = i32s(&[1]);
        let err = s.append(&[1, 2]).unwrap_err();
        assert_eq!(
            err,
            SliceError::ElementSizeMismatch {
                expected: 4,
                actual: 2
            }
        );
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn get_mut_writes_through() {
        let mut s = i32s(&[1, 2, 3]);
        s.get_mut(-2).unwrap().copy_from_slice(&40i32.to_le_bytes());
        assert_eq!(to_vec(&s), vec![1, 40, 3]);
    }

    #[test]
    fn growth_zero_fills_new_slots() {
        let mut s = RawSlice::new(2, 1).unwrap();
        s.append(&[0xff, 0xff]).unwrap();
        s.append(&[0xee, 0xee]).unwrap();
        assert_eq!(s.capacity(), 2);
        s.append(&[0xdd, 0xdd]).unwrap();
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.memory_bytes(), 8);
        assert_eq!(&s.buf[6..], &[0, 0]);
    }

    #[test]
    fn append_array_checks_total_length_first() {
        let mut s = RawSlice::new(4, 0).unwrap();
        let err = s.append_array(&[0u8; 7], 2).unwrap_err();
        assert_eq!(
            err,
            SliceError::ElementSizeMismatch {
                expected: 8,
                actual: 7
            }
        );
        assert!(s.is_empty());
    }

    #[test]
    fn append_array_partial_effect_at_ceiling() {
        let cfg = SliceConfig::new(1).with_max_capacity(2);
        let mut s = RawSlice::with_config(1, cfg).unwrap();
        let err = s.append_array(&[1, 2, 3], 3).unwrap_err();
        assert!(matches!(err, SliceError::CapacityExceeded { .. }));
        assert_eq!(s.as_bytes(), &[1, 2]);
    }

    #[test]
    fn extend_requires_matching_sizes() {
        let mut a = i32s(&[1]);
        let b = RawSlice::new(8, 0).unwrap();
        assert!(matches!(
            a.extend(&b),
            Err(SliceError::ElementSizeMismatch { .. })
        ));
        a.extend(&i32s(&[2, 3])).unwrap();
        assert_eq!(to_vec(&a), vec![1, 2, 3]);
    }

    #[test]
    fn sub_range_semantics() {
        let s = i32s(&[1, 2, 3, 4, 5]);
        assert_eq!(to_vec(&s.sub_range(0, 5, 1).unwrap()), vec![1, 2, 3, 4, 5]);
        assert_eq!(to_vec(&s.sub_range(0, -1, 1).unwrap()), vec![1, 2, 3, 4, 5]);
        assert_eq!(to_vec(&s.sub_range(0, -1, -2).unwrap()), vec![5, 3, 1]);
        assert_eq!(to_vec(&s.sub_range(-3, 5, 1).unwrap()), vec![3, 4, 5]);
        assert!(s.sub_range(2, 2, 1).is_err());
    }

    #[test]
    fn map_changes_element_size() {
        let s = i32s(&[1, 2, 3]);
        let m = s
            .map(8, |src, out| {
                let v = i64::from(read_i32(src)) * 100;
                out.copy_from_slice(&v.to_le_bytes());
                true
            })
            .unwrap();
        assert_eq!(m.element_size(), 8);
        let values: Vec<i64> = m
            .iter()
            .map(|b| i64::from_le_bytes(b.try_into().unwrap()))
            .collect();
        assert_eq!(values, vec![100, 200, 300]);
    }

    #[test]
    fn map_callback_failure_reports_index() {
        let s = i32s(&[1, 2, 3]);
        let err = s.map(4, |src, _| read_i32(src) != 2).unwrap_err();
        assert_eq!(err, SliceError::CallbackFailed { index: 1 });
    }

    #[test]
    fn map_to_zero_size_rejected() {
        let s = i32s(&[1]);
        assert_eq!(s.map(0, |_, _| true).unwrap_err(), SliceError::ZeroElementSize);
    }

    #[test]
    fn filter_and_reduce() {
        let s = i32s(&[1, 2, 3, 4]);
        let evens = s.filter(|b| read_i32(b) % 2 == 0).unwrap();
        assert_eq!(to_vec(&evens), vec![2, 4]);
        assert_eq!(evens.capacity(), 2);

        let sum = s
            .reduce(|acc, b| {
                let v = read_i32(acc) + read_i32(b);
                acc.copy_from_slice(&v.to_le_bytes());
            })
            .unwrap();
        assert_eq!(read_i32(&sum), 10);
    }

    #[test]
    fn reduce_empty_fails() {
        let s = RawSlice::new(4, 4).unwrap();
        assert_eq!(s.reduce(|_, _| {}), Err(SliceError::EmptyReduce));
    }

    #[test]
    fn for_each_variants() {
        let mut s = i32s(&[1, 2, 3]);
        s.for_each_mut(|b| {
            let v = -read_i32(b);
            b.copy_from_slice(&v.to_le_bytes());
        });
        let mut seen = Vec::new();
        s.for_each(|b| seen.push(read_i32(b)));
        assert_eq!(seen, vec![-1, -2, -3]);
    }

    #[test]
    fn empty_then_append() {
        let mut s = i32s(&[1, 2, 3]);
        s.empty();
        assert_eq!((s.len(), s.capacity(), s.memory_bytes()), (0, 0, 0));
        s.append(&9i32.to_le_bytes()).unwrap();
        assert_eq!(to_vec(&s), vec![9]);
        assert_eq!(s.capacity(), 1);
    }

    #[test]
    fn concrete_scenario() {
        let mut s = RawSlice::new(4, 2).unwrap();
        for v in [5i32, 9, 2, 7] {
            s.append(&v.to_le_bytes()).unwrap();
        }
        assert_eq!(s.capacity(), 4);
        assert_eq!(read_i32(s.get(-1).unwrap()), 7);
        assert_eq!(to_vec(&s.sub_range(0, -1, 1).unwrap()), vec![5, 9, 2, 7]);
        let total = s
            .reduce(|acc, b| {
                let v = read_i32(acc) + read_i32(b);
                acc.copy_from_slice(&v.to_le_bytes());
            })
            .unwrap();
        assert_eq!(read_i32(&total), 23);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn buffer_never_under_sized(
                size in 1usize..24,
                initial in 0i64..4,
                count in 0usize..100,
            ) {
                let mut s = RawSlice::new(size, initial).unwrap();
                for i in 0..count {
                    s.append(&vec![i as u8; size]).unwrap();
                    prop_assert!(s.len() <= s.capacity());
                    prop_assert_eq!(s.memory_bytes(), s.capacity() * size);
                }
                for (i, block) in s.iter().enumerate() {
                    prop_assert!(block.iter().all(|&b| b == i as u8));
                }
            }
        }
    }
}
