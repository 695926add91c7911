//! Instruction Monitor.
//!
//! Self-bin classification, the one-deep hazard history and the conditions
//! that clear it.

use covinject_core::coverage::{CoverageBin, InstructionMonitor};
use covinject_core::isa::{Isa, Mnemonic};
use covinject_core::sync::FetchSnapshot;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{mips, rv32};
use crate::common::harness::init_tracing;

fn monitor(isa: Isa) -> InstructionMonitor {
    init_tracing();
    InstructionMonitor::new(isa)
}

#[test]
fn register_self_bins() {
    let mut m = monitor(Isa::Mips);
    // add $0, $4, $4
    let _ = m.sample(mips::add(0, 4, 4), 0);
    let db = m.coverage();
    assert_eq!(db.hits(Mnemonic::Add, CoverageBin::Seen), Some(1));
    assert_eq!(db.hits(Mnemonic::Add, CoverageBin::ZeroDst), Some(1));
    assert_eq!(db.hits(Mnemonic::Add, CoverageBin::SameSrc), Some(1));
    assert_eq!(db.hits(Mnemonic::Add, CoverageBin::ZeroSrc), Some(0));
}

#[test]
fn store_self_bins() {
    let mut m = monitor(Isa::Rv32);
    let _ = m.sample(rv32::sw(0, 7, 8), 0);
    let db = m.coverage();
    assert_eq!(db.hits(Mnemonic::Sw, CoverageBin::Seen), Some(1));
    assert_eq!(db.hits(Mnemonic::Sw, CoverageBin::ZeroSrc), Some(1));
    assert_eq!(db.hits(Mnemonic::Sw, CoverageBin::SameSrc), Some(0));
}

#[test]
fn jump_direction_bins() {
    let mut m = monitor(Isa::Rv32);
    let _ = m.sample(rv32::jal(1, -8), 0x100);
    let _ = m.sample(rv32::jal(1, 16), 0x100);
    let _ = m.sample(rv32::jal(1, 0), 0x100);
    let db = m.coverage();
    assert_eq!(db.hits(Mnemonic::Jal, CoverageBin::Seen), Some(3));
    assert_eq!(db.hits(Mnemonic::Jal, CoverageBin::BranchBackward), Some(1));
    assert_eq!(db.hits(Mnemonic::Jal, CoverageBin::BranchForward), Some(1));
    assert_eq!(m.stats().self_loops, 1);
}

#[test]
fn hazard_increments_exactly_once() {
    let mut m = monitor(Isa::Mips);
    // add $5, $1, $2 ; sub $6, $5, $3
    let _ = m.sample(mips::add(5, 1, 2), 0);
    let _ = m.sample(mips::sub(6, 5, 3), 4);
    assert_eq!(
        m.coverage()
            .cross_hits(Mnemonic::Sub, Mnemonic::Add, CoverageBin::RawHazard),
        Some(1)
    );
    assert_eq!(m.stats().hazards, 1);
    assert_eq!(m.coverage().iter_cross().map(|(.., c)| c).sum::<u64>(), 1);
}

#[test]
fn hazard_through_both_sources_still_counts_once() {
    let mut m = monitor(Isa::Mips);
    let _ = m.sample(mips::add(5, 1, 2), 0);
    let _ = m.sample(mips::sub(6, 5, 5), 4);
    assert_eq!(
        m.coverage()
            .cross_hits(Mnemonic::Sub, Mnemonic::Add, CoverageBin::RawHazard),
        Some(1)
    );
}

#[test]
fn store_reads_jal_link_register() {
    let mut m = monitor(Isa::Rv32);
    let _ = m.sample(rv32::jal(1, 8), 0);
    let _ = m.sample(rv32::sw(2, 1, 0), 8);
    assert_eq!(
        m.coverage()
            .cross_hits(Mnemonic::Sw, Mnemonic::Jal, CoverageBin::RawHazard),
        Some(1)
    );
}

#[test]
fn no_cross_bin_without_previous() {
    let mut m = monitor(Isa::Mips);
    let _ = m.sample(mips::sub(6, 5, 3), 0);
    assert_eq!(m.coverage().iter_cross().filter(|&(.., c)| c > 0).count(), 0);
}

#[test]
fn undecodable_word_breaks_the_pair() {
    let mut m = monitor(Isa::Mips);
    let _ = m.sample(mips::add(5, 1, 2), 0);
    // lw $2, 0($1)
    assert!(m.sample(0x8C22_0000, 4).is_none());
    let _ = m.sample(mips::sub(6, 5, 3), 8);
    assert_eq!(m.stats().undecodable, 1);
    assert_eq!(m.stats().hazards, 0);
}

#[test]
fn invalid_function_is_counted_and_breaks_the_pair() {
    let mut m = monitor(Isa::Mips);
    let _ = m.sample(mips::add(5, 1, 2), 0);
    assert!(m.sample(mips::r_type(0x3F, 5, 1, 2), 4).is_none());
    let _ = m.sample(mips::sub(6, 5, 3), 8);
    assert_eq!(m.stats().invalid_function, 1);
    assert_eq!(m.stats().hazards, 0);
    // nothing was fabricated for the invalid word
    assert_eq!(m.coverage().total_hits(), 2);
}

#[test]
fn stalled_fetch_keeps_history() {
    let mut m = monitor(Isa::Mips);
    let add = mips::add(5, 1, 2);
    let _ = m.observe(&FetchSnapshot::valid(add, 0));
    assert!(m.observe(&FetchSnapshot::stalled(4)).is_none());
    assert_eq!(m.state().last_insn, Some(add));
    let _ = m.observe(&FetchSnapshot::valid(mips::sub(6, 5, 3), 4));
    assert_eq!(m.stats().sampled, 2);
    assert_eq!(m.stats().hazards, 1);
    assert_eq!(m.stats().history_clears, 0);
}

#[test]
fn state_tracks_last_sample() {
    let mut m = monitor(Isa::Mips);
    let word = mips::add(5, 1, 2);
    let _ = m.sample(word, 0x40);
    assert_eq!(m.state().last_pc, Some(0x40));
    assert_eq!(m.state().last_insn, Some(word));
}
