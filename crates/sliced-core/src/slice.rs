//! The generic growable container.
//!
//! [`Slice<T>`] tracks its own logical capacity on top of a `Vec<T>` so
//! that growth follows the configured [`GrowthPolicy`](crate::GrowthPolicy)
//! exactly and allocation failure is reported instead of aborting.
//! The backing `Vec` always holds at least `capacity` slots.

use std::mem;

use tracing::{debug, trace};

use crate::config::SliceConfig;
use crate::error::SliceError;
use crate::growth;
use crate::index::{resolve_index, ResolvedRange};

/// A growable array with negative indexing, strided sub-ranges and
/// functional combinators.
///
/// Derived containers ([`sub_range`](Self::sub_range), [`map`](Self::map),
/// [`filter`](Self::filter)) are independent copies: they share no storage
/// with their source and inherit its growth policy and capacity ceiling.
#[derive(Debug)]
pub struct Slice<T> {
    data: Vec<T>,
    capacity: usize,
    config: SliceConfig,
}

impl<T> Slice<T> {
    /// Create an empty slice with no reserved capacity.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            capacity: 0,
            config: SliceConfig::default(),
        }
    }

    /// Create an empty slice with `capacity` reserved slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, SliceError> {
        Self::with_config(SliceConfig::new(capacity))
    }

    /// Create an empty slice from a full configuration.
    pub fn with_config(config: SliceConfig) -> Result<Self, SliceError> {
        growth::check_initial(&config, mem::size_of::<T>())?;
        let mut data = Vec::new();
        data.try_reserve_exact(config.initial_capacity)
            .map_err(|_| SliceError::AllocationFailed {
                requested: config.initial_capacity,
            })?;
        Ok(Self {
            data,
            capacity: config.initial_capacity,
            config,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the slice has no live elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element slots available before the next growth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The configuration this slice grows by.
    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// Bytes reserved for `capacity` elements.
    pub fn memory_bytes(&self) -> usize {
        self.capacity * mem::size_of::<T>()
    }

    /// Live elements as a contiguous slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate live elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Borrow the element at `index`; negative indices count from the tail.
    pub fn get(&self, index: isize) -> Option<&T> {
        resolve_index(self.len(), index).map(|slot| &self.data[slot])
    }

    /// Mutably borrow the element at `index`; negative indices count from
    /// the tail.
    pub fn get_mut(&mut self, index: isize) -> Option<&mut T> {
        resolve_index(self.len(), index).map(move |slot| &mut self.data[slot])
    }

    /// Append one element, growing first if the slice is full.
    ///
    /// On failure the slice is left exactly as it was.
    pub fn append(&mut self, value: T) -> Result<(), SliceError> {
        self.reserve_one()?;
        self.data.push(value);
        Ok(())
    }

    /// Drop every element and release the buffer.
    ///
    /// Afterwards the slice behaves like a fresh one with the same config
    /// and zero initial capacity.
    pub fn empty(&mut self) {
        self.data = Vec::new();
        self.capacity = 0;
    }

    /// Build a new slice with `f` applied to each element in order.
    ///
    /// A failure drops the partially built result before returning.
    pub fn map<U, F>(&self, mut f: F) -> Result<Slice<U>, SliceError>
    where
        F: FnMut(&T) -> U,
    {
        let mut out = Slice::with_config(self.config.derived(self.len()))?;
        for item in &self.data {
            out.append(f(item)).inspect_err(|e| {
                debug!(error = %e, "map aborted");
            })?;
        }
        Ok(out)
    }

    /// Apply `f` to each element in order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.data.iter().for_each(f);
    }

    /// Apply `f` to each element in order, allowing in-place updates.
    pub fn for_each_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut T),
    {
        self.data.iter_mut().for_each(f);
    }

    fn reserve_one(&mut self) -> Result<(), SliceError> {
        if self.data.len() < self.capacity {
            return Ok(());
        }
        let next = growth::plan(&self.config, self.capacity, mem::size_of::<T>())?;
        self.data
            .try_reserve_exact(next - self.data.len())
            .map_err(|_| {
                debug!(requested = next, "allocator refused growth");
                SliceError::AllocationFailed { requested: next }
            })?;
        trace!(from = self.capacity, to = next, "slice grew");
        self.capacity = next;
        Ok(())
    }
}

impl<T: Clone> Slice<T> {
    /// Copy a strided, directional sub-range into a new slice.
    ///
    /// `start` accepts `[-len, len - 1]` and `end` accepts `[-len, len]`; a
    /// negative `end` includes the element it addresses, so `(0, -1, 1)`
    /// copies everything. A negative `step` walks from `end - 1` down to
    /// `start`. Empty or inverted ranges are an error, never an empty
    /// result.
    pub fn sub_range(&self, start: isize, end: isize, step: isize) -> Result<Slice<T>, SliceError> {
        let range = ResolvedRange::new(self.len(), start, end, step)?;
        let mut out = Slice::with_config(self.config.derived(range.capacity_hint()))?;
        for slot in range.walk() {
            let item = self.data.get(slot).ok_or(SliceError::IndexOutOfRange {
                index: slot as isize,
                len: self.len(),
            })?;
            out.append(item.clone()).inspect_err(|e| {
                debug!(error = %e, start, end, step, "sub_range aborted");
            })?;
        }
        Ok(out)
    }

    /// Copy the elements matching `predicate` into a new slice.
    ///
    /// The result starts with zero capacity and grows on demand.
    pub fn filter<F>(&self, mut predicate: F) -> Result<Slice<T>, SliceError>
    where
        F: FnMut(&T) -> bool,
    {
        let mut out = Slice::with_config(self.config.derived(0))?;
        for item in self.data.iter().filter(|item| predicate(*item)) {
            out.append(item.clone()).inspect_err(|e| {
                debug!(error = %e, "filter aborted");
            })?;
        }
        Ok(out)
    }

    /// Fold left-to-right, seeded with the first element.
    ///
    /// The accumulator is returned by value. Reducing an empty slice is
    /// [`SliceError::EmptyReduce`].
    pub fn reduce<F>(&self, mut combine: F) -> Result<T, SliceError>
    where
        F: FnMut(T, &T) -> T,
    {
        let (first, rest) = self.data.split_first().ok_or(SliceError::EmptyReduce)?;
        Ok(rest.iter().fold(first.clone(), |acc, item| combine(acc, item)))
    }

    /// Append every element of `items` in order.
    ///
    /// Stops at the first failure. Elements appended before it stay in
    /// the slice.
    pub fn append_array(&mut self, items: &[T]) -> Result<(), SliceError> {
        for item in items {
            self.append(item.clone())?;
        }
        Ok(())
    }

    /// Append every element of `other` in order; `other` is not modified.
    ///
    /// Same partial-effect semantics as [`append_array`](Self::append_array).
    pub fn extend(&mut self, other: &Slice<T>) -> Result<(), SliceError> {
        self.append_array(&other.data)
    }
}

impl<T: Clone> Clone for Slice<T> {
    fn clone(&self) -> Self {
        // Keep the backing buffer at least as large as the logical capacity.
        let mut data = Vec::with_capacity(self.capacity);
        data.extend(self.data.iter().cloned());
        Self {
            data,
            capacity: self.capacity,
            config: self.config.clone(),
        }
    }
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Slice<T> {
    /// Element-wise equality; capacity and config are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for Slice<T> {}

impl<T> From<Vec<T>> for Slice<T> {
    fn from(data: Vec<T>) -> Self {
        let capacity = data.len();
        Self {
            data,
            capacity,
            config: SliceConfig::default(),
        }
    }
}

impl<T> FromIterator<T> for Slice<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a Slice<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
