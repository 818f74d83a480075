//! Generation-checked handle table for container lifetimes across the C
//! boundary.
//!
//! A handle packs a slot index (upper 32 bits) and the slot's generation
//! (lower 32 bits). Destroying a container bumps the generation, so a
//! stale or twice-destroyed handle resolves to `None` instead of another
//! container.

fn pack(slot: u32, generation: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> (usize, u32) {
    ((handle >> 32) as usize, handle as u32)
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Maps `u64` handles to owned values, reusing vacated slots.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    /// An empty table.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Store `value` and return its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        self.live += 1;
        if let Some(slot) = self.vacant.pop() {
            let entry = &mut self.entries[slot as usize];
            entry.value = Some(value);
            return pack(slot, entry.generation);
        }
        let slot = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            value: Some(value),
        });
        pack(slot, 0)
    }

    fn entry(&self, handle: u64) -> Option<&Entry<T>> {
        let (slot, generation) = unpack(handle);
        self.entries
            .get(slot)
            .filter(|entry| entry.generation == generation)
    }

    /// Value behind `handle`, or `None` if stale or never issued.
    pub fn get(&self, handle: u64) -> Option<&T> {
        self.entry(handle)?.value.as_ref()
    }

    /// Take the value out and invalidate `handle`.
    ///
    /// A slot whose generation wraps to zero is retired for good, so that a
    /// handle from its first life can never match again.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, generation) = unpack(handle);
        let entry = self.entries.get_mut(slot)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.vacant.push(slot as u32);
        }
        self.live -= 1;
        Some(value)
    }

    /// Number of values currently stored.
    pub fn live(&self) -> usize {
        self.live
    }
}
