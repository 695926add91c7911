//! Session drivers.
//!
//! A session owns one DUT and runs the lock-step control loop for it. Each
//! exchange takes one externally supplied stimulus batch, drives it to
//! completion and returns the coverage observed so far. There is exactly one
//! exchange in flight; nothing is shared across threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::common::{Result, SyncError};
use crate::config::{Config, SyncConfig};
use crate::coverage::database::CoverageDatabase;
use crate::coverage::monitor::InstructionMonitor;
use crate::sampler::database::GenericCoverageDatabase;
use crate::sampler::signal::{SequenceSummary, SignalSampler};
use crate::sim::dut::{Dut, SignalDut};
use crate::stats::SessionStats;
use crate::sync::signals::{CycleOutcome, DutState, RecoveryEvent};
use crate::sync::synchronizer::InjectionSynchronizer;

/// A batch of instruction words to inject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    /// Words in injection order.
    #[serde(alias = "insn_mem_updates")]
    pub instructions: Vec<u32>,
    /// Whether this is the last exchange of the session.
    #[serde(default)]
    pub finish: bool,
}

/// Reply to a [`Stimulus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Last instruction the monitor sampled.
    pub state: DutState,
    /// Cumulative coverage.
    pub coverage: CoverageDatabase,
    /// Fraction of legal bins hit so far.
    pub coverage_rate: f64,
    /// Recoveries performed during this exchange.
    pub recoveries: Vec<RecoveryEvent>,
    /// Echo of the stimulus `finish` flag.
    pub finish: bool,
}

/// Drives a CPU DUT through stimulus exchanges.
#[derive(Debug)]
pub struct Session<D: Dut> {
    dut: D,
    sync: InjectionSynchronizer,
    monitor: InstructionMonitor,
    stats: SessionStats,
    finished: bool,
}

impl<D: Dut> Session<D> {
    /// Creates a session over `dut` with an empty queue and database.
    pub fn new(dut: D, config: &Config) -> Self {
        Self {
            dut,
            sync: InjectionSynchronizer::new(&config.sync),
            monitor: InstructionMonitor::new(config.isa),
            stats: SessionStats::default(),
            finished: false,
        }
    }

    /// Advances one clock edge, resetting the DUT if the synchronizer asks.
    pub fn step(&mut self) -> CycleOutcome {
        self.dut.present(self.sync.head());
        let snapshot = self.dut.tick();
        let outcome = self.sync.observe(&snapshot, &mut self.monitor);
        if outcome.reset_required() {
            self.dut.reset();
            self.stats.resets += 1;
        }
        outcome
    }

    /// Injects `stimulus` and waits until every word has retired or been evicted.
    ///
    /// Appends block (by stepping the DUT) while the queue is full.
    ///
    /// # Errors
    ///
    /// * `SyncError::QueueFull` if a slot does not free up within the
    ///   append budget.
    /// * `SyncError::DrainTimeout` if the queue does not empty within the
    ///   budget after the last append.
    ///
    /// Both carry the recoveries performed before the exchange gave up; the
    /// DUT has already been reset for each of them.
    pub fn exchange(&mut self, stimulus: &Stimulus) -> std::result::Result<Response, SyncError> {
        let budget = self.sync.config().append_cycle_budget;
        let mut recoveries = Vec::new();

        for (i, &word) in stimulus.instructions.iter().enumerate() {
            let mut waited = 0;
            while self.sync.is_full() {
                if waited >= budget {
                    return Err(SyncError::QueueFull {
                        pending: self.sync.depth(),
                        capacity: self.sync.capacity(),
                        remaining: stimulus.instructions.len() - i,
                        waited,
                        recoveries,
                    });
                }
                self.step_collecting(&mut recoveries);
                waited += 1;
            }
            let _ = self.sync.try_append(word);
        }

        let mut waited = 0;
        while !self.sync.is_empty() {
            if waited >= budget {
                return Err(SyncError::DrainTimeout {
                    pending: self.sync.depth(),
                    waited,
                    recoveries,
                });
            }
            self.step_collecting(&mut recoveries);
            waited += 1;
        }

        self.stats.exchanges += 1;
        self.finished |= stimulus.finish;
        let coverage = self.monitor.coverage().clone();
        let coverage_rate = coverage.coverage_rate();
        info!(
            exchange = self.stats.exchanges,
            words = stimulus.instructions.len(),
            recoveries = recoveries.len(),
            coverage = format_args!("{:.2}%", coverage_rate * 100.0),
            "exchange complete"
        );
        Ok(Response {
            state: self.monitor.state(),
            coverage,
            coverage_rate,
            recoveries,
            finish: stimulus.finish,
        })
    }

    fn step_collecting(&mut self, recoveries: &mut Vec<RecoveryEvent>) {
        if let CycleOutcome::Recovered(event) = self.step() {
            recoveries.push(event);
        }
    }

    /// Cumulative coverage.
    pub const fn coverage(&self) -> &CoverageDatabase {
        self.monitor.coverage()
    }

    /// Last sampled instruction.
    pub const fn state(&self) -> DutState {
        self.monitor.state()
    }

    /// The instruction monitor.
    pub const fn monitor(&self) -> &InstructionMonitor {
        &self.monitor
    }

    /// The injection synchronizer.
    pub const fn synchronizer(&self) -> &InjectionSynchronizer {
        &self.sync
    }

    /// Synchronizer settings.
    pub const fn sync_config(&self) -> &SyncConfig {
        self.sync.config()
    }

    /// The driven DUT.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// The driven DUT, mutably.
    pub fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    /// Whether an exchange carrying `finish` has completed.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Snapshot of the session statistics.
    pub fn stats(&self) -> SessionStats {
        let mut stats = self.stats.clone();
        stats.sync = *self.sync.stats();
        stats.decode = *self.monitor.stats();
        stats.bins_hit = self.monitor.coverage().hit_bins();
        stats.bins_total = self.monitor.coverage().total_bins();
        stats
    }
}

/// A stimulus value for a generic DUT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericStimulus {
    /// Value vector applied to the design inputs.
    pub value: Vec<i64>,
    /// Whether this is the last exchange of the session.
    #[serde(default)]
    pub finish: bool,
}

/// Reply to a [`GenericStimulus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericResponse {
    /// Cumulative coverage.
    pub coverage: GenericCoverageDatabase,
    /// Fraction of bins hit so far.
    pub coverage_rate: f64,
    /// Measurements of the sequence this stimulus produced.
    pub sequence: SequenceSummary,
    /// Echo of the stimulus `finish` flag.
    pub finish: bool,
}

/// Drives a generic DUT through stimulus exchanges.
#[derive(Debug)]
pub struct GenericSession<D: SignalDut> {
    dut: D,
    sampler: SignalSampler,
    budget: u64,
    stats: SessionStats,
    finished: bool,
}

impl<D: SignalDut> GenericSession<D> {
    /// Creates a session over `dut`.
    ///
    /// # Errors
    ///
    /// Returns a sampler error if the sampler configuration is unusable.
    pub fn new(dut: D, config: &Config) -> Result<Self> {
        Ok(Self {
            dut,
            sampler: SignalSampler::new(&config.sampler)?,
            budget: config.sampler.sequence_cycle_budget,
            stats: SessionStats::default(),
            finished: false,
        })
    }

    /// Applies `stimulus` and samples until the DUT finishes the sequence.
    ///
    /// # Errors
    ///
    /// * `SyncError::SequenceTimeout` if no sequence finishes within the budget.
    /// * `SamplerError::UnknownEvent` if the DUT reports an undeclared event level.
    pub fn exchange(&mut self, stimulus: &GenericStimulus) -> Result<GenericResponse> {
        self.dut.apply(&stimulus.value);
        let mut waited = 0;
        let sequence = loop {
            if waited >= self.budget {
                return Err(SyncError::SequenceTimeout { waited }.into());
            }
            let snapshot = self.dut.tick();
            waited += 1;
            if let Some(summary) = self.sampler.sample(&snapshot)? {
                break summary;
            }
        };

        self.stats.exchanges += 1;
        self.finished |= stimulus.finish;
        let coverage = self.sampler.coverage().clone();
        let coverage_rate = coverage.coverage_rate();
        debug!(cycles = waited, ?sequence, "generic exchange complete");
        info!(
            exchange = self.stats.exchanges,
            coverage = format_args!("{:.2}%", coverage_rate * 100.0),
            "exchange complete"
        );
        Ok(GenericResponse {
            coverage,
            coverage_rate,
            sequence,
            finish: stimulus.finish,
        })
    }

    /// Resets the DUT and abandons the sequence in progress.
    pub fn reset(&mut self) {
        self.dut.reset();
        self.sampler.reset();
        self.stats.resets += 1;
    }

    /// The signal sampler.
    pub const fn sampler(&self) -> &SignalSampler {
        &self.sampler
    }

    /// The driven DUT.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Whether an exchange carrying `finish` has completed.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Snapshot of the session statistics.
    pub fn stats(&self) -> SessionStats {
        let mut stats = self.stats.clone();
        stats.sequences = self.sampler.sequences();
        stats.saturations = self.sampler.saturations();
        stats.bins_hit = self.sampler.coverage().hit_bins();
        stats.bins_total = self.sampler.coverage().total_bins();
        stats
    }
}
