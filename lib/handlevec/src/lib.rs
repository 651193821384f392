#![doc = include_str!("../README.md")]

use std::ops::Index;

use bitvec::vec::BitVec;

mod conv;
mod macros;

// reexport so the macro works outside of this package
pub use bitvec;

/// A checked reference to a slot within a [HandleVec].
///
/// Handles are plain data; they stay `Copy` and can be handed across API boundaries freely. A
/// handle is only ever honored by the [HandleVec] that issued it, and only while the value it was
/// issued for still occupies its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// The slot this handle points at.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// The generation of the slot at the time this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// A vector type with indices stable across removals & insertions, which reuses vacated slots and
/// rejects stale [Handles](Handle); comparable to `Vec<Option<T>>` with a generation per slot.
///
/// # Invariants
///
/// * `slots.len` == `generations.len` == `occupied.len`
/// * `slots[i]` is `Some` ⟺ `occupied[i] == true`
/// * `generations[i]` changes every time `slots[i]` is vacated
#[derive(Debug, Clone)]
pub struct HandleVec<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    /// Flags indicating whether a slot is occupied.
    occupied: BitVec<usize, bitvec::order::Lsb0>,
    /// Number of occupied slots
    count: usize,
}

impl<T> Default for HandleVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleVec<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            occupied: BitVec::new(),
            count: 0,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            slots: Vec::with_capacity(cap),
            generations: Vec::with_capacity(cap),
            occupied: BitVec::with_capacity(cap),
            count: 0,
        }
    }

    /// Get the total number of slots, occupied or not.
    #[inline(always)]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Get the number of occupied slots.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether `handle` refers to a value currently stored in `self`.
    pub fn contains(&self, handle: Handle) -> bool {
        self.live_index(handle).is_some()
    }

    fn live_index(&self, handle: Handle) -> Option<usize> {
        let index = handle.index();
        match self.generations.get(index) {
            Some(&gen) if gen == handle.generation && self.occupied[index] => Some(index),
            _ => None,
        }
    }

    /// Store a value, reusing the first vacant slot if there is one.
    pub fn insert(&mut self, value: T) -> Handle {
        let index = match self.occupied.first_zero() {
            Some(i) => i,
            None => {
                self.slots.push(None);
                self.generations.push(0);
                self.occupied.push(false);
                self.slots.len() - 1
            }
        };
        self.slots[index] = Some(value);
        self.occupied.set(index, true);
        self.count += 1;
        let handle = Handle {
            index: index as u32,
            generation: self.generations[index],
        };
        tracing::trace!(%handle, "occupied slot");
        handle
    }

    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.live_index(handle)
            .and_then(|i| self.slots[i].as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.live_index(handle)
            .and_then(|i| self.slots[i].as_mut())
    }

    /// Vacate the slot referred to by `handle`, returning its value.
    ///
    /// The slot's generation is advanced, so `handle` (and every copy of it) is stale afterwards.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let index = self.live_index(handle)?;
        Some(self.vacate(index))
    }

    fn vacate(&mut self, index: usize) -> T {
        self.occupied.set(index, false);
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.count -= 1;
        tracing::trace!(index, generation = self.generations[index], "vacated slot");
        match self.slots[index].take() {
            Some(value) => value,
            // occupied[i] ⟺ slots[i].is_some()
            None => unreachable!("occupied slot {index} held no value"),
        }
    }

    /// Vacate every slot, returning the values in slot order.
    pub fn drain(&mut self) -> Vec<T> {
        let occupied: Vec<usize> = self.occupied.iter_ones().collect();
        occupied.into_iter().map(|i| self.vacate(i)).collect()
    }

    /// Drop everything. Outstanding handles become stale.
    pub fn clear(&mut self) {
        drop(self.drain());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.occupied.iter_ones().filter_map(|i| {
            self.slots[i].as_ref().map(|value| {
                (
                    Handle {
                        index: i as u32,
                        generation: self.generations[i],
                    },
                    value,
                )
            })
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.iter().map(|(h, _)| h)
    }
}

impl<T> Index<Handle> for HandleVec<T> {
    type Output = T;

    /// # Panics
    ///
    /// * `handle` is stale or was issued by another [HandleVec]
    fn index(&self, handle: Handle) -> &Self::Output {
        match self.get(handle) {
            Some(v) => v,
            None => panic!("stale handle: {handle}"),
        }
    }
}
