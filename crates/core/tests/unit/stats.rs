//! Session Statistics.

use covinject_core::isa::Isa;
use covinject_core::sim::Stimulus;
use covinject_core::stats::SessionStats;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::mips;
use crate::common::harness::session;
use crate::common::mocks::pipeline::{Behavior, PipelineDut};

#[test]
fn empty_stats_report_zero_coverage() {
    let stats = SessionStats::default();
    assert!(stats.coverage_rate().abs() < f64::EPSILON);
    stats.print();
}

#[test]
fn session_stats_gather_every_component() {
    let dut = PipelineDut::new(Behavior::Stalled).recovering_to(Behavior::InOrder);
    let mut s = session(dut, Isa::Mips);
    let _ = s
        .exchange(&Stimulus {
            instructions: vec![mips::add(5, 1, 2), mips::sub(6, 5, 3), mips::r_type(0x3F, 1, 2, 3)],
            finish: false,
        })
        .unwrap();

    let stats = s.stats();
    assert_eq!(stats.exchanges, 1);
    assert_eq!(stats.resets, 1);
    assert_eq!(stats.sync.appended, 3);
    assert_eq!(stats.sync.retired, 2);
    assert_eq!(stats.sync.stuck_at_buffer, 1);
    assert_eq!(stats.sync.recoveries(), 1);
    assert_eq!(stats.decode.sampled, 2);
    assert_eq!(stats.decode.decoded, 1);
    assert_eq!(stats.decode.invalid_function, 1);
    assert_eq!(stats.bins_total, s.coverage().total_bins());
    assert_eq!(stats.bins_hit, 1);
    assert!(stats.coverage_rate() > 0.0);

    stats.print_sections(&["sync".to_owned(), "decode".to_owned()]);
}
