//! Injection synchronizer.
//!
//! Owns the pending queue and tracks its head against the fetch bus one clock
//! edge at a time. The synchronizer performs no I/O: each call to
//! [`InjectionSynchronizer::observe`] returns a [`CycleOutcome`] and the
//! driving loop acts on it (resetting the DUT on a recovery).
//!
//! Per edge, for the head entry:
//! 1. **Dispatch:** A queued head goes in flight; its baseline PC is the PC of
//!    the previous edge, or none right after start or a reset.
//! 2. **Match:** Fetch-valid with the head word on the bus samples coverage. If
//!    the PC differs from the baseline the head retires, otherwise its
//!    PC-unchanged counter increments.
//! 3. **Stuck-at-buffer:** `stuck_buffer_cycles` consecutive non-matching edges
//!    evict the head.
//! 4. **Stuck-at-pc:** A PC-unchanged counter above `stuck_pc_matches` evicts the head.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::SyncConfig;
use crate::coverage::monitor::InstructionMonitor;
use crate::sync::queue::PendingQueue;
use crate::sync::signals::{CycleOutcome, FetchSnapshot, RecoveryEvent, RecoveryKind};

/// Synchronizer counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncStats {
    /// Edges observed.
    pub cycles: u64,
    /// Words accepted into the queue.
    pub appended: u64,
    /// Appends refused by a full queue.
    pub refused: u64,
    /// Entries retired.
    pub retired: u64,
    /// Matches on which the PC had not moved.
    pub unchanged_matches: u64,
    /// Edges the head spent off the fetch bus.
    pub waiting_cycles: u64,
    /// Stuck-at-buffer evictions.
    pub stuck_at_buffer: u64,
    /// Stuck-at-pc evictions.
    pub stuck_at_pc: u64,
    /// Largest queue depth observed.
    pub max_depth: usize,
}

impl SyncStats {
    /// Total forced evictions.
    pub const fn recoveries(&self) -> u64 {
        self.stuck_at_buffer + self.stuck_at_pc
    }
}

/// Tracks pending instructions against the fetch stage of a CPU DUT.
#[derive(Debug, Clone)]
pub struct InjectionSynchronizer {
    config: SyncConfig,
    queue: PendingQueue,
    /// PC from the most recent edge, cleared by a reset.
    last_pc: Option<u32>,
    stats: SyncStats,
}

impl InjectionSynchronizer {
    /// Creates a synchronizer with an empty queue.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            config: *config,
            queue: PendingQueue::new(config.queue_capacity),
            last_pc: None,
            stats: SyncStats::default(),
        }
    }

    /// Appends a word at the tail of the queue.
    ///
    /// # Returns
    ///
    /// `false` when the queue is full; the word is not stored and must be
    /// offered again after a slot frees up.
    pub fn try_append(&mut self, word: u32) -> bool {
        if !self.queue.push(word) {
            self.stats.refused += 1;
            return false;
        }
        self.stats.appended += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.queue.len());
        true
    }

    /// Word the DUT should currently be fed, if any.
    pub fn head(&self) -> Option<u32> {
        self.queue.head().map(|e| e.word)
    }

    /// Pending words from head to tail.
    pub fn pending(&self) -> impl Iterator<Item = u32> + '_ {
        self.queue.words()
    }

    /// Number of pending words.
    pub const fn depth(&self) -> usize {
        self.queue.len()
    }

    /// Queue bound.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Whether an append would be refused.
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Whether nothing is pending.
    pub const fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Synchronizer counters.
    pub const fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Active configuration.
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Forgets the last PC. Call after resetting the DUT outside a recovery.
    pub fn notify_reset(&mut self) {
        self.last_pc = None;
        if let Some(head) = self.queue.head_mut() {
            head.misses = 0;
        }
    }

    /// Observes one clock edge.
    ///
    /// Coverage is sampled into `monitor` on every matching edge; other edges,
    /// fetch stalls included, leave the monitor untouched. On
    /// [`CycleOutcome::Recovered`] the head has already been evicted and the
    /// monitor history cleared; the caller must reset the DUT.
    pub fn observe(
        &mut self,
        snapshot: &FetchSnapshot,
        monitor: &mut InstructionMonitor,
    ) -> CycleOutcome {
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;
        #[cfg(feature = "always-trace")]
        trace!(
            cycle,
            insn = format_args!("{:#010x}", snapshot.instruction),
            valid = snapshot.fetch_valid,
            pc = format_args!("{:#x}", snapshot.pc),
            depth = self.queue.len(),
            "edge"
        );

        let baseline = self.last_pc.replace(snapshot.pc);
        self.queue.dispatch(baseline);
        let Some(head) = self.queue.head_mut() else {
            return CycleOutcome::Idle;
        };

        let matched = snapshot.fetch_valid && snapshot.instruction == head.word;
        if !matched {
            head.misses += 1;
            self.stats.waiting_cycles += 1;
            if head.misses >= self.config.stuck_buffer_cycles {
                return self.recover(RecoveryKind::StuckAtBuffer, monitor);
            }
            return CycleOutcome::Waiting;
        }

        head.misses = 0;
        let word = head.word;
        let moved = head.baseline_pc != Some(snapshot.pc);
        if !moved {
            head.pc_unchanged += 1;
        }
        let unchanged = head.pc_unchanged;

        let _ = monitor.sample(word, snapshot.pc);

        if moved {
            let _ = self.queue.retire();
            self.stats.retired += 1;
            debug!(
                word = format_args!("{word:#010x}"),
                pc = format_args!("{:#x}", snapshot.pc),
                depth = self.queue.len(),
                "retired"
            );
            return CycleOutcome::Retired {
                word,
                pc: snapshot.pc,
            };
        }

        self.stats.unchanged_matches += 1;
        if unchanged > self.config.stuck_pc_matches {
            return self.recover(RecoveryKind::StuckAtPc, monitor);
        }
        trace!(cycle, unchanged, "head matched without pc movement");
        CycleOutcome::Matched
    }

    fn recover(&mut self, kind: RecoveryKind, monitor: &mut InstructionMonitor) -> CycleOutcome {
        let cycle = self.stats.cycles;
        let word = self.queue.evict().map_or(0, |e| e.word);
        match kind {
            RecoveryKind::StuckAtBuffer => self.stats.stuck_at_buffer += 1,
            RecoveryKind::StuckAtPc => self.stats.stuck_at_pc += 1,
        }
        self.last_pc = None;
        monitor.clear_history();
        warn!(
            %kind,
            word = format_args!("{word:#010x}"),
            cycle,
            depth = self.queue.len(),
            "evicted head, reset required"
        );
        CycleOutcome::Recovered(RecoveryEvent { kind, word, cycle })
    }
}
