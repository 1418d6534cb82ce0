//! Fixed-capacity slot table with free-list recycling. Handles into the table are plain indices,
//! so a released slot can be handed out again without any pointer staying behind.

/// Slot index that never refers to a live resource.
pub const INVALID_INDEX: u32 = u32::MAX;

/// Dense array of slots plus a stack of reclaimed indices.
///
/// # Example
/// ```
/// # use vkrecord::pool::ResourcePool;
/// let mut pool = ResourcePool::new(2);
/// let a = pool.obtain(10u32).unwrap();
/// let b = pool.obtain(20u32).unwrap();
/// assert!(pool.obtain(30u32).is_none());
/// pool.release(a);
/// assert_eq!(pool.obtain(40u32), Some(a));
/// # let _ = b;
/// ```
#[derive(Debug)]
pub struct ResourcePool<T> {
    slots: Vec<Option<T>>,
    free_indices: Vec<u32>,
}

impl<T> ResourcePool<T> {
    /// Create a pool that can hold up to `capacity` live values.
    pub fn new(capacity: u32) -> Self {
        let mut slots = Vec::with_capacity(capacity as usize);
        slots.resize_with(capacity as usize, || None);
        Self {
            slots,
            // Reversed so that slots are handed out in ascending order.
            free_indices: (0..capacity).rev().collect(),
        }
    }

    /// Store a value in a free slot and return its index, or `None` if every slot is taken.
    pub fn obtain(&mut self, value: T) -> Option<u32> {
        let index = self.free_indices.pop()?;
        self.slots[index as usize] = Some(value);
        Some(index)
    }

    /// Take the value out of a slot and put the slot back on the free list.
    /// Releasing an empty or out of range slot does nothing.
    pub fn release(&mut self, index: u32) -> Option<T> {
        let value = self.slots.get_mut(index as usize)?.take()?;
        self.free_indices.push(index);
        Some(value)
    }

    /// Release every live slot, returning the values in ascending slot order.
    /// Afterwards slots are handed out from index 0 again.
    pub fn release_all(&mut self) -> Vec<T> {
        let released = self.slots.iter_mut().filter_map(Option::take).collect();
        self.free_indices = (0..self.slots.len() as u32).rev().collect();
        released
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots.get_mut(index as usize)?.as_mut()
    }

    /// Indices of all occupied slots, in ascending order.
    pub fn live_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| index as u32)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
