//! Peak Concurrency and the Combined Table.

use covinject_core::config::{PeakConfig, PeakMode, SamplerConfig};
use covinject_core::sampler::{SequenceSummary, SignalBits, SignalSampler, SignalSnapshot};
use pretty_assertions::assert_eq;

use super::{run_sequence, sampler};

#[test]
fn floating_peak_is_the_largest_popcount() {
    let mut s = sampler(PeakMode::Floating);
    let summary = run_sequence(&mut s, &[0b0001, 0b0111, 0b0011]);
    assert_eq!(summary.peak_bucket, Some(3));
}

#[test]
fn floating_peak_resets_per_sequence() {
    let mut s = sampler(PeakMode::Floating);
    let _ = run_sequence(&mut s, &[0b1111]);
    let second = run_sequence(&mut s, &[0b0010]);
    assert_eq!(second.peak_bucket, Some(1));
    assert_eq!(s.coverage().peak, vec![0, 1, 0, 0, 1]);
}

#[test]
fn rolling_cursor_advances_only_on_the_bit_under_it() {
    let mut s = sampler(PeakMode::Rolling);
    // bit 0, bit 1, then bit 2 low: cursor stops at 2
    let summary = run_sequence(&mut s, &[0b0001, 0b0010, 0b0001, 0b1000]);
    assert_eq!(summary.peak_bucket, Some(2));
}

#[test]
fn rolling_cursor_needs_bit_zero_first() {
    let mut s = sampler(PeakMode::Rolling);
    let summary = run_sequence(&mut s, &[0b1110, 0b1110]);
    assert_eq!(summary.peak_bucket, Some(0));
}

#[test]
fn rolling_cursor_is_capped_at_width() {
    let config = SamplerConfig {
        width: 2,
        peak: Some(PeakConfig {
            mode: PeakMode::Rolling,
            bins: 3,
        }),
        ..SamplerConfig::default()
    };
    let mut s = SignalSampler::new(&config).unwrap();
    let summary = run_sequence(&mut s, &[0b11; 6]);
    assert_eq!(summary.peak_bucket, Some(2));
    assert_eq!(summary.duration_bucket, None);
    assert_eq!(s.saturations(), 0);
}

#[test]
fn combined_table_pairs_duration_with_peak() {
    let mut s = sampler(PeakMode::Floating);
    let summary = run_sequence(&mut s, &[0b0011, 0b0001]);
    assert_eq!(summary.duration_bucket, Some(2));
    assert_eq!(summary.peak_bucket, Some(2));
    let db = s.coverage();
    assert_eq!(db.combined[2][2], 1);
    assert_eq!(db.combined.iter().flatten().sum::<u64>(), 1);
    // duration, peak and one combined cell
    assert_eq!(db.hit_bins(), 3);
    assert_eq!(db.total_bins(), 8 + 5 + 40);
}

/// A 1023-bit weight-bank sampler with one peak bucket per possible count.
fn weight_bank(mode: PeakMode) -> SignalSampler {
    let config = SamplerConfig {
        width: 1023,
        peak: Some(PeakConfig { mode, bins: 1024 }),
        ..SamplerConfig::default()
    };
    SignalSampler::new(&config).unwrap()
}

fn run_wide(sampler: &mut SignalSampler, cycles: &[SignalBits]) -> SequenceSummary {
    for bits in cycles {
        let gated = SignalSnapshot::gated_bits(bits.clone());
        assert_eq!(sampler.sample(&gated).unwrap(), None);
    }
    sampler
        .sample(&SignalSnapshot::finish())
        .unwrap()
        .unwrap()
}

fn low_ones(n: usize) -> SignalBits {
    SignalBits::from_bools(std::iter::repeat_n(true, n))
}

#[test]
fn floating_peak_counts_across_the_whole_vector() {
    let mut s = weight_bank(PeakMode::Floating);
    let mut sparse = low_ones(3);
    // past the configured width: ignored
    sparse.set(1100, true);
    let summary = run_wide(&mut s, &[sparse, low_ones(700), low_ones(90)]);
    assert_eq!(summary.peak_bucket, Some(700));
    assert_eq!(s.coverage().peak[700], 1);
    assert_eq!(s.saturations(), 0);
}

#[test]
fn rolling_cursor_walks_past_bit_63() {
    let mut s = weight_bank(PeakMode::Rolling);
    let full = low_ones(1023);
    let summary = run_wide(&mut s, &vec![full.clone(); 100]);
    assert_eq!(summary.peak_bucket, Some(100));

    let summary = run_wide(&mut s, &vec![full; 1100]);
    assert_eq!(summary.peak_bucket, Some(1023));
    assert_eq!(s.coverage().peak[1023], 1);
    assert_eq!(s.saturations(), 0);
}

#[test]
fn rolling_cursor_stops_at_a_low_bit_in_a_high_word() {
    let mut s = weight_bank(PeakMode::Rolling);
    let mut gap = low_ones(1023);
    gap.set(70, false);
    let summary = run_wide(&mut s, &vec![gap; 200]);
    assert_eq!(summary.peak_bucket, Some(70));
}
