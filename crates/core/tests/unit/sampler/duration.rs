//! Duration Bins.

use covinject_core::common::SamplerError;
use covinject_core::config::{DurationConfig, PeakMode, SamplerConfig};
use covinject_core::sampler::{SignalBits, SignalSampler, SignalSnapshot};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::{run_sequence, sampler};

fn duration_only(bins: usize, divisor: u64) -> SignalSampler {
    let config = SamplerConfig {
        width: 8,
        duration: Some(DurationConfig {
            bins,
            divisor,
            signal: 3,
        }),
        ..SamplerConfig::default()
    };
    SignalSampler::new(&config).unwrap()
}

#[test]
fn two_high_cycles_land_in_bucket_two() {
    let mut s = sampler(PeakMode::Floating);
    let summary = run_sequence(&mut s, &[1, 1, 0]);
    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.high_cycles, 2);
    assert_eq!(summary.duration_bucket, Some(2));
    assert_eq!(s.coverage().duration, vec![0, 0, 1, 0, 0, 0, 0, 0]);
}

#[rstest]
#[case(&[1, 1, 1], 2, 2)]
#[case(&[1, 1, 1, 1], 2, 2)]
#[case(&[1], 4, 1)]
#[case(&[0, 0], 3, 0)]
fn divisor_rounds_up(#[case] highs: &[u64], #[case] divisor: u64, #[case] bucket: usize) {
    let mut s = duration_only(8, divisor);
    let bits: Vec<u64> = highs.iter().map(|&h| h << 3).collect();
    assert_eq!(run_sequence(&mut s, &bits).duration_bucket, Some(bucket));
}

#[test]
fn only_the_tracked_bit_counts() {
    let mut s = duration_only(8, 1);
    let summary = run_sequence(&mut s, &[0b0111, 0b1000, 0b1111_0111]);
    assert_eq!(summary.high_cycles, 1);
}

#[test]
fn ungated_cycles_are_not_measured() {
    let mut s = sampler(PeakMode::Floating);
    let not_ready = SignalSnapshot {
        bits: SignalBits::from(1),
        ready: false,
        valid: true,
        ..SignalSnapshot::default()
    };
    let not_valid = SignalSnapshot {
        bits: SignalBits::from(1),
        ready: true,
        valid: false,
        finished: true,
        ..SignalSnapshot::default()
    };
    assert_eq!(s.sample(&not_ready).unwrap(), None);
    assert_eq!(s.sample(&not_valid).unwrap(), None);
    assert!(!s.in_sequence());
    assert_eq!(s.sequences(), 0);

    let summary = run_sequence(&mut s, &[1]);
    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.high_cycles, 1);
}

#[test]
fn finishing_cycle_is_not_measured() {
    let mut s = sampler(PeakMode::Floating);
    let finish_high = SignalSnapshot {
        bits: SignalBits::from(0xF),
        ..SignalSnapshot::finish()
    };
    let summary = s.sample(&finish_high).unwrap().unwrap();
    assert_eq!(summary.cycles, 0);
    assert_eq!(summary.duration_bucket, Some(0));
    assert_eq!(summary.peak_bucket, Some(0));
}

#[test]
fn overlong_sequences_saturate_into_last_bucket() {
    let mut s = duration_only(3, 1);
    let summary = run_sequence(&mut s, &[0x8; 7]);
    assert_eq!(summary.duration_bucket, Some(7));
    assert_eq!(s.coverage().duration, vec![0, 0, 1]);
    assert_eq!(s.saturations(), 1);
}

#[test]
fn counters_reset_between_sequences() {
    let mut s = duration_only(8, 1);
    let _ = run_sequence(&mut s, &[0x8, 0x8, 0x8]);
    let second = run_sequence(&mut s, &[0x8]);
    assert_eq!(second.duration_bucket, Some(1));
    assert_eq!(s.coverage().duration[3], 1);
    assert_eq!(s.coverage().duration[1], 1);
    assert_eq!(s.sequences(), 2);
}

#[test]
fn reset_abandons_the_open_sequence() {
    let mut s = duration_only(8, 1);
    let _ = s.sample(&SignalSnapshot::gated(0x8)).unwrap();
    assert!(s.in_sequence());
    s.reset();
    assert!(!s.in_sequence());
    assert_eq!(run_sequence(&mut s, &[]).duration_bucket, Some(0));
}

#[test]
fn signal_outside_width_is_rejected() {
    let config = SamplerConfig {
        width: 4,
        duration: Some(DurationConfig {
            bins: 2,
            divisor: 1,
            signal: 4,
        }),
        ..SamplerConfig::default()
    };
    assert_eq!(
        SignalSampler::new(&config).unwrap_err(),
        SamplerError::SignalOutOfRange { index: 4, width: 4 }
    );
}

#[test]
fn tracked_bit_may_sit_past_the_first_word() {
    let config = SamplerConfig {
        width: 1023,
        duration: Some(DurationConfig {
            bins: 4,
            divisor: 1,
            signal: 1022,
        }),
        ..SamplerConfig::default()
    };
    let mut s = SignalSampler::new(&config).unwrap();
    let mut high = SignalBits::new();
    high.set(1022, true);
    for bits in [high.clone(), SignalBits::from(u64::MAX), high] {
        let _ = s.sample(&SignalSnapshot::gated_bits(bits)).unwrap();
    }
    let summary = s.sample(&SignalSnapshot::finish()).unwrap().unwrap();
    assert_eq!(summary.high_cycles, 2);
    assert_eq!(s.coverage().duration, vec![0, 0, 1, 0]);
}
