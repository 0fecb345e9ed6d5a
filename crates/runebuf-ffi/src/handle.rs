//! Typed buffer handles and the slot table that issues them.
//!
//! A [`Handle`] crosses the C ABI as a `u64`: slot index in the high half,
//! generation in the low half. Freed entries are chained into an intrusive
//! free list and carry the next generation, so a destroyed buffer's handle
//! never resolves again. A slot whose generation would wrap is retired.

use std::fmt;

/// Identifies one live value in a [`HandleTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    /// Decode a handle received from C. Any bit pattern is accepted; a
    /// pattern the table never issued simply fails to resolve.
    pub fn from_raw(raw: u64) -> Self {
        Self {
            slot: (raw >> 32) as u32,
            generation: raw as u32,
        }
    }

    /// The value handed out to C.
    pub fn into_raw(self) -> u64 {
        (u64::from(self.slot) << 32) | u64::from(self.generation)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.slot, self.generation)
    }
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    Free { generation: u32, next_free: Option<u32> },
    Retired,
}

/// Owns values addressed by [`Handle`].
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Store `value`, reusing the most recently freed slot if there is one.
    pub fn insert(&mut self, value: T) -> Handle {
        self.live += 1;
        if let Some(slot) = self.free_head {
            if let Some(&Entry::Free {
                generation,
                next_free,
            }) = self.entries.get(slot as usize)
            {
                self.free_head = next_free;
                self.entries[slot as usize] = Entry::Occupied { generation, value };
                return Handle { slot, generation };
            }
        }
        let slot = self.entries.len() as u32;
        self.entries.push(Entry::Occupied {
            generation: 0,
            value,
        });
        Handle {
            slot,
            generation: 0,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.entries.get(handle.slot as usize)? {
            Entry::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.entries.get_mut(handle.slot as usize)? {
            Entry::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Take the value out. `handle` and every copy of it stop resolving.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        self.get(handle)?;
        let index = handle.slot as usize;
        let next = handle.generation.wrapping_add(1);
        let vacated = if next == 0 {
            Entry::Retired
        } else {
            Entry::Free {
                generation: next,
                next_free: self.free_head,
            }
        };
        let Entry::Occupied { value, .. } = std::mem::replace(&mut self.entries[index], vacated)
        else {
            return None;
        };
        if next != 0 {
            self.free_head = Some(handle.slot);
        }
        self.live -= 1;
        Some(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }
}
