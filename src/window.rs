// HEARTBEAT WINDOW BUFFER
// FIXED-CAPACITY RING OF RECORDS. STORAGE IS RESERVED ONCE AT CONSTRUCTION
// AND NEVER REALLOCATES. ONCE FULL, EVERY INSERT OVERWRITES THE OLDEST ENTRY.

use crate::error::{HeartbeatError, Result};

#[derive(Debug)]
pub struct WindowBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    // WRITE CURSOR. WHEN FULL IT ALSO MARKS THE OLDEST ENTRY.
    head: usize,
}

impl<T: Copy> WindowBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(HeartbeatError::InvalidWindowSize(0));
        }
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        Ok(Self { slots, capacity, head: 0 })
    }

    /// Insert `item`, returning the entry it evicted once the buffer is full.
    pub fn insert(&mut self, item: T) -> Option<T> {
        if self.slots.len() < self.capacity {
            self.slots.push(item);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], item);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    // THE ENTRY THE NEXT INSERT WILL OVERWRITE, IF ANY
    pub fn evicting(&self) -> Option<&T> {
        if self.is_full() {
            self.slots.get(self.head)
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn oldest(&self) -> Option<&T> {
        self.slots.get(self.head)
    }

    pub fn newest(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let len = self.slots.len();
        self.slots.get((self.head + len - 1) % len)
    }

    // ITERATE IN CHRONOLOGICAL ORDER, OLDEST FIRST
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let len = self.slots.len();
        let start = self.head;
        (0..len).map(move |i| &self.slots[(start + i) % len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            WindowBuffer::<u64>::with_capacity(0),
            Err(HeartbeatError::InvalidWindowSize(0))
        ));
    }

    #[test]
    fn fills_without_eviction() {
        let mut w = WindowBuffer::with_capacity(3).unwrap();
        assert!(w.is_empty());
        assert_eq!(w.insert(1u64), None);
        assert_eq!(w.insert(2), None);
        assert_eq!(w.len(), 2);
        assert!(!w.is_full());
        assert_eq!(w.evicting(), None);
        assert_eq!(w.oldest(), Some(&1));
        assert_eq!(w.newest(), Some(&2));
    }

    #[test]
    fn ring_buffer_wraps() {
        let mut w = WindowBuffer::with_capacity(3).unwrap();
        for i in 0..3u64 {
            w.insert(i);
        }
        assert!(w.is_full());
        assert_eq!(w.head, 0);
        assert_eq!(w.evicting(), Some(&0));

        // WRITE ONE MORE -- OVERWRITES OLDEST
        assert_eq!(w.insert(99), Some(0));
        assert_eq!(w.len(), 3);
        assert_eq!(w.head, 1);
        assert_eq!(w.slots[0], 99);

        // CHRONOLOGICAL ITERATION STARTS FROM OLDEST (INDEX 1)
        let ordered: Vec<u64> = w.iter().copied().collect();
        assert_eq!(ordered, vec![1, 2, 99]);
        assert_eq!(w.oldest(), Some(&1));
        assert_eq!(w.newest(), Some(&99));
    }

    #[test]
    fn capacity_one_always_holds_latest() {
        let mut w = WindowBuffer::with_capacity(1).unwrap();
        assert_eq!(w.insert(5u64), None);
        assert_eq!(w.insert(6), Some(5));
        assert_eq!(w.insert(7), Some(6));
        assert_eq!(w.iter().copied().collect::<Vec<_>>(), vec![7]);
        assert_eq!(w.capacity(), 1);
    }

    #[test]
    fn storage_never_reallocates() {
        let mut w = WindowBuffer::with_capacity(4).unwrap();
        w.insert(0u64);
        let ptr = w.slots.as_ptr();
        for i in 1..100u64 {
            w.insert(i);
        }
        assert_eq!(w.slots.as_ptr(), ptr);
        assert_eq!(w.slots.capacity(), 4);
    }
}
