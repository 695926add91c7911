//! Pending instruction queue.
//!
//! Bounded FIFO of words waiting to be observed on the fetch bus. The queue
//! provides:
//! 1. **Append:** Add a word at the tail. A full queue refuses; nothing is dropped.
//! 2. **Dispatch:** Mark the head in flight and record its baseline PC.
//! 3. **Retire:** Remove the head once the PC has moved past it.
//! 4. **Evict:** Remove the head by force when a liveness guard fires.

/// Lifecycle state of a pending entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EntryState {
    /// Waiting for its first match on the fetch bus.
    #[default]
    Queued,
    /// Matched at least once; waiting for the PC to move.
    InFlight,
    /// Left the queue after the PC moved.
    Retired,
    /// Left the queue through a forced recovery.
    Evicted,
}

/// A single pending instruction word.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingEntry {
    /// Instruction word to inject.
    pub word: u32,
    /// Current lifecycle state.
    pub state: EntryState,
    /// PC of the edge before the entry went in flight; `None` after a reset.
    pub baseline_pc: Option<u32>,
    /// Matches observed without the PC moving.
    pub pc_unchanged: u32,
    /// Consecutive edges on which the head was not on the fetch bus.
    pub misses: u32,
}

impl PendingEntry {
    fn new(word: u32) -> Self {
        Self {
            word,
            ..Self::default()
        }
    }
}

/// Bounded FIFO of pending entries.
#[derive(Debug, Clone)]
pub struct PendingQueue {
    entries: Vec<PendingEntry>,
    /// Index of the oldest entry.
    head: usize,
    /// Index where the next entry will be appended.
    tail: usize,
    /// Number of occupied entries.
    count: usize,
}

impl PendingQueue {
    /// Creates an empty queue holding at most `capacity` words (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity.max(1));
        entries.resize_with(capacity.max(1), PendingEntry::default);
        Self {
            entries,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of pending words.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no word is pending.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if an append would be refused.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.entries.len() - self.count
    }

    /// Appends a word at the tail. Returns false if the queue is full.
    pub fn push(&mut self, word: u32) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries[self.tail] = PendingEntry::new(word);
        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        true
    }

    /// The oldest entry.
    pub fn head(&self) -> Option<&PendingEntry> {
        (!self.is_empty()).then(|| &self.entries[self.head])
    }

    /// The oldest entry, mutably.
    pub fn head_mut(&mut self) -> Option<&mut PendingEntry> {
        if self.is_empty() {
            return None;
        }
        Some(&mut self.entries[self.head])
    }

    /// Marks the head in flight against `baseline` if it is still queued.
    pub fn dispatch(&mut self, baseline: Option<u32>) {
        if let Some(entry) = self.head_mut()
            && entry.state == EntryState::Queued
        {
            entry.state = EntryState::InFlight;
            entry.baseline_pc = baseline;
        }
    }

    /// Removes the head, tagging it with its terminal state.
    fn pop(&mut self, terminal: EntryState) -> Option<PendingEntry> {
        if self.is_empty() {
            return None;
        }
        let mut entry = std::mem::take(&mut self.entries[self.head]);
        entry.state = terminal;
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
        Some(entry)
    }

    /// Removes the head after the PC moved past it.
    pub fn retire(&mut self) -> Option<PendingEntry> {
        self.pop(EntryState::Retired)
    }

    /// Removes the head after a liveness guard fired.
    pub fn evict(&mut self) -> Option<PendingEntry> {
        self.pop(EntryState::Evicted)
    }

    /// Iterates pending words from head to tail.
    pub fn words(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.count).map(move |i| self.entries[(self.head + i) % self.entries.len()].word)
    }
}
