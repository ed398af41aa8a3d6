// Fixed-capacity history buffer for per-frame signals
//
// Storage is allocated once; once full, each push overwrites the oldest slot.

/// Ring buffer keeping the most recent `capacity` values
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    slots: Vec<T>,
    capacity: usize,
    /// Slot the next push writes to. Equal to the oldest entry once full.
    head: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append a value, evicting the oldest one when full
    pub fn push(&mut self, value: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
        } else {
            self.slots[self.head] = value;
        }
        self.head = (self.head + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The value `n` pushes back from the newest (0 = newest)
    pub fn back(&self, n: usize) -> Option<&T> {
        let len = self.slots.len();
        if n >= len {
            return None;
        }
        Some(&self.slots[(self.head + len - 1 - n) % len])
    }

    pub fn latest(&self) -> Option<&T> {
        self.back(0)
    }

    /// Values from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let len = self.slots.len();
        (0..len).map(move |i| &self.slots[(self.head + i) % len])
    }

    /// The newest `n` values (or fewer), from oldest to newest
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> + '_ {
        self.iter().skip(self.len().saturating_sub(n))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}
