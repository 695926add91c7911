//! Session statistics collection and reporting.
//!
//! This module tracks what a session has done. It provides:
//! 1. **Summary:** Exchanges, DUT resets and coverage closure.
//! 2. **Synchronizer:** Appends, retirements, waiting cycles and stuck-at recoveries.
//! 3. **Decode:** Sampled words by outcome, self-loop jumps and hazards.
//! 4. **Sampler:** Finished sequences and saturated buckets for generic DUTs.

use std::time::Instant;

use crate::coverage::monitor::DecodeStats;
use crate::sync::synchronizer::SyncStats;

/// Statistics for one session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    start_time: Instant,
    /// Stimulus exchanges completed.
    pub exchanges: u64,
    /// DUT resets performed by recoveries.
    pub resets: u64,
    /// Synchronizer counters.
    pub sync: SyncStats,
    /// Decode counters.
    pub decode: DecodeStats,
    /// Generic sequences finished.
    pub sequences: u64,
    /// Generic buckets clamped into their last bin.
    pub saturations: u64,
    /// Coverage bins hit at least once.
    pub bins_hit: usize,
    /// Coverage bins in the universe.
    pub bins_total: usize,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            exchanges: 0,
            resets: 0,
            sync: SyncStats::default(),
            decode: DecodeStats::default(),
            sequences: 0,
            saturations: 0,
            bins_hit: 0,
            bins_total: 0,
        }
    }
}

impl SessionStats {
    /// Fraction of bins hit, in `[0.0, 1.0]`.
    pub fn coverage_rate(&self) -> f64 {
        if self.bins_total == 0 {
            0.0
        } else {
            self.bins_hit as f64 / self.bins_total as f64
        }
    }

    /// Prints only the requested sections to stdout.
    ///
    /// Sections: `summary`, `sync`, `decode`, `sampler`. An empty slice
    /// prints everything.
    ///
    /// # Arguments
    ///
    /// * `sections` - The section names to print.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.sync.cycles.max(1);

        if want("summary") {
            println!("\n==========================================================");
            println!("INJECTION SESSION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("exchanges                {}", self.exchanges);
            println!("dut_resets               {}", self.resets);
            println!(
                "coverage                 {}/{} ({:.2}%)",
                self.bins_hit,
                self.bins_total,
                self.coverage_rate() * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("sync") {
            let s = &self.sync;
            println!("SYNCHRONIZER");
            println!("  cycles                 {}", s.cycles);
            println!("  appended               {}", s.appended);
            println!("  refused                {}", s.refused);
            println!("  retired                {}", s.retired);
            println!("  max_depth              {}", s.max_depth);
            println!(
                "  waiting                {} ({:.2}%)",
                s.waiting_cycles,
                (s.waiting_cycles as f64 / cyc as f64) * 100.0
            );
            println!("  unchanged_matches      {}", s.unchanged_matches);
            println!("  stuck_at_buffer        {}", s.stuck_at_buffer);
            println!("  stuck_at_pc            {}", s.stuck_at_pc);
            println!("----------------------------------------------------------");
        }
        if want("decode") {
            let d = &self.decode;
            let sampled = d.sampled.max(1);
            println!("DECODE");
            println!("  sampled                {}", d.sampled);
            println!(
                "  decoded                {} ({:.2}%)",
                d.decoded,
                (d.decoded as f64 / sampled as f64) * 100.0
            );
            println!("  undecodable            {}", d.undecodable);
            println!("  invalid_function       {}", d.invalid_function);
            println!("  self_loops             {}", d.self_loops);
            println!("  raw_hazards            {}", d.hazards);
            println!("  history_clears         {}", d.history_clears);
            println!("----------------------------------------------------------");
        }
        if want("sampler") {
            println!("SAMPLER");
            println!("  sequences              {}", self.sequences);
            println!("  saturated_buckets      {}", self.saturations);
            println!("==========================================================");
        }
    }

    /// Prints every section.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
