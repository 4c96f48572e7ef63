// THEORY:
// `FrameHistory` is the sliding window behind the stability tracker: a
// fixed-capacity ring buffer indexed by a monotonically advancing write cursor.
//
// - Slots are allocated once, up to `capacity`, and then overwritten in place.
// - The slot for the next write is `cursor % capacity`; once the window is full
//   that slot holds the oldest observation, which is exactly the one FIFO
//   eviction should drop.
// - `iter` yields observations oldest-first so order-sensitive statistics
//   (frame-to-frame jitter) see the frames in the order they arrived.

/// Fixed-capacity FIFO window of observations.
#[derive(Debug, Clone)]
pub struct FrameHistory<T> {
    slots: Vec<T>,
    capacity: usize,
    cursor: u64,
}

impl<T: Copy> FrameHistory<T> {
    /// A window holding at most `capacity` observations (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Appends `value`, evicting the oldest observation once full.
    pub fn push(&mut self, value: T) {
        let slot = (self.cursor % self.capacity as u64) as usize;
        if self.slots.len() < self.capacity {
            self.slots.push(value);
        } else {
            self.slots[slot] = value;
        }
        self.cursor += 1;
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

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total observations pushed since construction or the last `clear`.
    pub fn total_observed(&self) -> u64 {
        self.cursor
    }

    /// The most recent observation.
    pub fn latest(&self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }
        let index = ((self.cursor - 1) % self.capacity as u64) as usize;
        self.slots.get(index).copied()
    }

    /// Observations oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = T> + Clone + '_ {
        let split = if self.is_full() {
            (self.cursor % self.capacity as u64) as usize
        } else {
            0
        };
        let (newer, older) = self.slots.split_at(split);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }
}
