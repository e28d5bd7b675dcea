//! Generation-checked handle table for heaps owned across the C boundary.
//!
//! A handle packs a slot index (high 32 bits) and the slot's generation
//! (low 32 bits). Destroying a heap bumps the generation, so a handle kept
//! by C after `fixheap_destroy` resolves to `None` instead of to whatever
//! heap later reuses the slot.

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

/// Slot table mapping `u64` handles to owned values.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
}

impl<T> HandleTable<T> {
    /// An empty table. `const` so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Store `value`, returning its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        match self.vacant.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                entry.value = Some(value);
                pack(slot, entry.generation)
            }
            None => {
                let slot = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    value: Some(value),
                });
                pack(slot, 0)
            }
        }
    }

    /// The value behind `handle`, unless the handle is stale or unknown.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (slot, generation) = unpack(handle);
        let entry = self.entries.get(slot)?;
        (entry.generation == generation)
            .then_some(entry.value.as_ref())
            .flatten()
    }

    /// Take the value behind `handle` out of the table.
    ///
    /// The slot's generation advances so `handle` goes stale. A slot whose
    /// generation wraps to zero is never handed out again.
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
        Some(value)
    }

    /// Number of values currently stored.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }
}
