//! Liveness Recovery.
//!
//! Stuck-at-buffer fires after exactly `stuck_buffer_cycles` non-matching
//! edges; stuck-at-pc fires once the unchanged counter exceeds
//! `stuck_pc_matches`. Each evicts only the head.

use covinject_core::config::SyncConfig;
use covinject_core::isa::Isa;
use covinject_core::sync::{CycleOutcome, FetchSnapshot, RecoveryEvent, RecoveryKind};
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::mips;
use crate::common::harness::SyncContext;

#[test]
fn ten_non_matching_edges_evict_exactly_once() {
    let mut ctx = SyncContext::new(Isa::Mips);
    let head = mips::add(5, 1, 2);
    assert!(ctx.sync.try_append(head));
    assert!(ctx.sync.try_append(mips::sub(6, 5, 3)));

    let mut outcomes = Vec::new();
    for cycle in 0..10 {
        outcomes.push(
            ctx.sync
                .observe(&FetchSnapshot::valid(0, cycle * 4), &mut ctx.monitor),
        );
    }
    assert!(outcomes[..9].iter().all(|o| *o == CycleOutcome::Waiting));
    assert_eq!(
        outcomes[9],
        CycleOutcome::Recovered(RecoveryEvent {
            kind: RecoveryKind::StuckAtBuffer,
            word: head,
            cycle: 10,
        })
    );
    assert_eq!(ctx.sync.depth(), 1);
    assert_eq!(ctx.sync.head(), Some(mips::sub(6, 5, 3)));
    assert_eq!(ctx.sync.stats().stuck_at_buffer, 1);
    assert_eq!(ctx.sync.stats().stuck_at_pc, 0);
}

#[test]
fn nine_non_matching_edges_do_not_evict() {
    let mut ctx = SyncContext::new(Isa::Mips);
    assert!(ctx.sync.try_append(mips::add(5, 1, 2)));
    for _ in 0..9 {
        let out = ctx.sync.observe(&FetchSnapshot::stalled(0), &mut ctx.monitor);
        assert!(!out.reset_required());
    }
    assert_eq!(ctx.sync.depth(), 1);
}

#[test]
fn a_match_resets_the_miss_counter() {
    let mut ctx = SyncContext::new(Isa::Mips);
    let word = mips::add(5, 1, 2);
    let _ = ctx.sync.observe(&FetchSnapshot::valid(0, 0x100), &mut ctx.monitor);
    assert!(ctx.sync.try_append(word));
    for _ in 0..9 {
        let _ = ctx.sync.observe(&FetchSnapshot::stalled(0x100), &mut ctx.monitor);
    }
    assert_eq!(
        ctx.sync.observe(&FetchSnapshot::valid(word, 0x100), &mut ctx.monitor),
        CycleOutcome::Matched
    );
    for _ in 0..9 {
        let out = ctx.sync.observe(&FetchSnapshot::stalled(0x100), &mut ctx.monitor);
        assert_eq!(out, CycleOutcome::Waiting);
    }
}

#[test]
fn stuck_at_pc_fires_when_counter_exceeds_threshold() {
    let mut ctx = SyncContext::new(Isa::Mips);
    let word = mips::add(5, 1, 2);
    let _ = ctx.sync.observe(&FetchSnapshot::valid(0, 0x200), &mut ctx.monitor);
    assert!(ctx.sync.try_append(word));

    for _ in 0..10 {
        let out = ctx.sync.observe(&FetchSnapshot::valid(word, 0x200), &mut ctx.monitor);
        assert_eq!(out, CycleOutcome::Matched);
    }
    let out = ctx.sync.observe(&FetchSnapshot::valid(word, 0x200), &mut ctx.monitor);
    let CycleOutcome::Recovered(event) = out else {
        panic!("expected a recovery, got {out:?}");
    };
    assert_eq!(event.kind, RecoveryKind::StuckAtPc);
    assert_eq!(event.word, word);
    assert!(ctx.sync.is_empty());
    assert_eq!(ctx.sync.stats().stuck_at_pc, 1);
}

#[test]
fn recovery_clears_monitor_history() {
    let mut ctx = SyncContext::new(Isa::Mips);
    let _ = ctx.monitor.sample(mips::add(5, 1, 2), 0);
    assert!(ctx.monitor.previous().is_some());
    assert!(ctx.sync.try_append(mips::sub(6, 5, 3)));
    for cycle in 0..9 {
        let _ = ctx
            .sync
            .observe(&FetchSnapshot::valid(u32::MAX, cycle), &mut ctx.monitor);
    }
    assert!(ctx.monitor.previous().is_some());
    let out = ctx.sync.observe(&FetchSnapshot::valid(u32::MAX, 9), &mut ctx.monitor);
    assert!(out.reset_required());
    assert!(ctx.monitor.previous().is_none());
}

#[test]
fn thresholds_come_from_config() {
    let config = SyncConfig {
        stuck_buffer_cycles: 3,
        ..SyncConfig::default()
    };
    let mut ctx = SyncContext::with_config(Isa::Mips, config);
    assert!(ctx.sync.try_append(1));
    let outs: Vec<_> = (0..3)
        .map(|_| ctx.sync.observe(&FetchSnapshot::stalled(0), &mut ctx.monitor))
        .collect();
    assert!(outs[2].reset_required());
}

#[test]
fn recovery_event_serializes_with_its_guard_name() {
    let event = RecoveryEvent {
        kind: RecoveryKind::StuckAtPc,
        word: 0x0022_1820,
        cycle: 42,
    };
    assert_eq!(
        serde_json::to_value(event).unwrap(),
        serde_json::json!({ "kind": "stuck_at_pc", "word": 0x0022_1820, "cycle": 42 })
    );
    let buffer = RecoveryEvent {
        kind: RecoveryKind::StuckAtBuffer,
        ..event
    };
    assert_eq!(serde_json::to_value(buffer).unwrap()["kind"], "stuck_at_buffer");
}
