//! Instruction injection core CLI.
//!
//! This binary exposes the core without a simulator attached. It performs:
//! 1. **Decode:** Disassemble instruction words for either ISA.
//! 2. **Bins:** List the coverage taxonomy and the size of the bin universe.
//! 3. **Replay:** Feed a recorded fetch trace through the instruction monitor.
//! 4. **Sample:** Feed a recorded signal trace through the generic sampler.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use covinject_core::Result;
use covinject_core::common::ConfigError;
use covinject_core::config::Config;
use covinject_core::coverage::bins::{cross_bins, self_bins};
use covinject_core::coverage::{CoverageDatabase, InstructionMonitor};
use covinject_core::isa::{Isa, Mnemonic};
use covinject_core::sampler::{SignalSampler, SignalSnapshot};
use covinject_core::stats::SessionStats;
use covinject_core::sync::FetchSnapshot;

#[derive(Parser, Debug)]
#[command(
    name = "covinject",
    author,
    version,
    about = "Coverage-guided instruction injection core",
    long_about = "Decode instruction words, list coverage bins, or replay recorded traces through the coverage monitors.\n\nExamples:\n  covinject decode --isa rv32 0x01EE12B3 0xC1CFA2EF\n  covinject bins\n  covinject replay fetch.json --stats\n  covinject sample signals.json --config prefetcher.json"
)]
struct Cli {
    /// Log filter in `EnvFilter` syntax; overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log: Option<String>,

    /// Print session statistics after a replay or sample run.
    #[arg(long, global = true)]
    stats: bool,

    /// Statistics sections to print (summary, sync, decode, sampler).
    #[arg(long, global = true, value_delimiter = ',')]
    sections: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Disassemble instruction words (hex with 0x prefix, or decimal).
    Decode {
        /// Instruction set.
        #[arg(long, default_value = "mips")]
        isa: Isa,

        /// PC of the first word; each following word is 4 bytes later.
        #[arg(long, default_value = "0", value_parser = parse_word)]
        pc: u32,

        /// Words to decode.
        #[arg(required = true, value_parser = parse_word)]
        words: Vec<u32>,
    },

    /// List every legal self and cross bin.
    Bins,

    /// Replay a JSON array of fetch snapshots through the instruction monitor.
    Replay {
        /// Trace file: `[{"instruction": 32, "fetch_valid": true, "pc": 0}, ...]`.
        trace: PathBuf,

        /// Configuration file; `isa` selects the decoder.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit the coverage database as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Replay a JSON array of signal snapshots through the generic sampler.
    Sample {
        /// Trace file: `[{"bits": 3, "ready": true, "valid": true, "finished": false}, ...]`.
        /// `bits` is a number, a `"0x..."` hex or `"0101"` binary string of any
        /// width, or an array of bools with bit 0 first.
        trace: PathBuf,

        /// Configuration file with a `sampler` section.
        #[arg(long)]
        config: PathBuf,
    },
}

/// Parses `0x`-prefixed hex or decimal.
fn parse_word(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("`{s}` is not a 32-bit word: {e}"))
}

fn main() {
    let cli = Cli::parse();

    let filter = cli.log.as_deref().map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Decode { isa, pc, words } => {
            cmd_decode(*isa, *pc, words);
            Ok(())
        }
        Commands::Bins => {
            cmd_bins();
            Ok(())
        }
        Commands::Replay {
            trace,
            config,
            json,
        } => cmd_replay(&cli, trace, config.as_deref(), *json),
        Commands::Sample { trace, config } => cmd_sample(&cli, trace, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Prints one line per word: PC, raw word and disassembly.
fn cmd_decode(isa: Isa, pc: u32, words: &[u32]) {
    for (i, &word) in words.iter().enumerate() {
        let at = pc.wrapping_add(4 * i as u32);
        let text = match isa.decode(word, at) {
            Ok(Some(insn)) => insn.to_string(),
            Ok(None) => "<undecodable>".to_owned(),
            Err(e) => format!("<{e}>"),
        };
        println!("{at:#010x}: {word:08x}  {text}");
    }
}

/// Prints the bin taxonomy per mnemonic.
fn cmd_bins() {
    let db = CoverageDatabase::new();
    for m in Mnemonic::ALL {
        let form = m.form();
        let own: Vec<&str> = self_bins(form).iter().map(|b| b.name()).collect();
        println!("{:<5} {:?}  self: {}", m.name(), form, own.join(", "));
        for (prior, bin) in cross_bins(form) {
            println!("      after {:<5} {}", prior.name(), bin.name());
        }
    }
    println!();
    println!("total legal bins: {}", db.total_bins());
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(ConfigError::from)?;
    Ok(serde_json::from_str(&text).map_err(ConfigError::from)?)
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Ok(Config::from_path(p)?),
        None => Ok(Config::default()),
    }
}

fn print_stats(cli: &Cli, stats: &SessionStats) {
    if cli.stats || !cli.sections.is_empty() {
        stats.print_sections(&cli.sections);
    }
}

/// Replays a fetch trace through a fresh monitor and prints the coverage.
fn cmd_replay(cli: &Cli, trace: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let snapshots: Vec<FetchSnapshot> = read_json(trace)?;
    info!(cycles = snapshots.len(), isa = %config.isa, "replaying fetch trace");

    let mut monitor = InstructionMonitor::new(config.isa);
    for snapshot in &snapshots {
        if let Some(insn) = monitor.observe(snapshot) {
            debug!(pc = format_args!("{:#x}", snapshot.pc), %insn, "sampled");
        }
    }

    let coverage = monitor.coverage();
    if json {
        println!("{}", serde_json::to_string_pretty(coverage)?);
    } else {
        print_coverage(coverage);
    }

    let mut stats = SessionStats::default();
    stats.decode = *monitor.stats();
    stats.bins_hit = coverage.hit_bins();
    stats.bins_total = coverage.total_bins();
    print_stats(cli, &stats);
    Ok(())
}

fn print_coverage(coverage: &CoverageDatabase) {
    for (m, bin, hits) in coverage.iter_self().filter(|&(.., h)| h > 0) {
        println!("{:<5} {:<16} {hits}", m.name(), bin.name());
    }
    for (m, prior, bin, hits) in coverage.iter_cross().filter(|&(.., h)| h > 0) {
        println!("{:<5} after {:<5} {:<16} {hits}", m.name(), prior.name(), bin.name());
    }
    println!(
        "coverage {}/{} ({:.2}%)",
        coverage.hit_bins(),
        coverage.total_bins(),
        coverage.coverage_rate() * 100.0
    );
}

/// Replays a signal trace through a fresh sampler, one line per finished sequence.
fn cmd_sample(cli: &Cli, trace: &Path, config: &Path) -> Result<()> {
    let config = Config::from_path(config)?;
    let snapshots: Vec<SignalSnapshot> = read_json(trace)?;
    info!(cycles = snapshots.len(), "replaying signal trace");

    let mut sampler = SignalSampler::new(&config.sampler)?;
    for snapshot in &snapshots {
        if let Some(summary) = sampler.sample(snapshot)? {
            println!("{}", serde_json::to_string(&summary)?);
        }
    }
    if sampler.in_sequence() {
        println!("(trace ended inside an unfinished sequence)");
    }
    println!("{}", serde_json::to_string_pretty(sampler.coverage())?);

    let coverage = sampler.coverage();
    let mut stats = SessionStats::default();
    stats.sequences = sampler.sequences();
    stats.saturations = sampler.saturations();
    stats.bins_hit = coverage.hit_bins();
    stats.bins_total = coverage.total_bins();
    print_stats(cli, &stats);
    Ok(())
}
