//! Configuration Loading and Validation.

use std::io::Write;

use covinject_core::common::ConfigError;
use covinject_core::config::{Config, PeakMode, SamplerConfig, SyncConfig};
use covinject_core::isa::Isa;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn defaults_match_the_documented_thresholds() {
    let sync = SyncConfig::default();
    assert_eq!(sync.queue_capacity, 5);
    assert_eq!(sync.stuck_buffer_cycles, 10);
    assert_eq!(sync.stuck_pc_matches, 10);

    let sampler = SamplerConfig::default();
    assert_eq!(sampler.width, 8);
    assert!(sampler.duration.is_none());
    assert!(sampler.peak.is_none());
    assert!(Config::default().validate().is_ok());
}

#[rstest]
#[case("mips", Isa::Mips)]
#[case("rv32", Isa::Rv32)]
#[case("riscv", Isa::Rv32)]
#[case("rv32i", Isa::Rv32)]
fn isa_names_and_aliases(#[case] name: &str, #[case] isa: Isa) {
    let json = format!(r#"{{ "isa": "{name}" }}"#);
    assert_eq!(Config::from_json_str(&json).unwrap().isa, isa);
    assert_eq!(name.parse::<Isa>().unwrap(), isa);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let json = r#"{
        "sync": { "stuck_pc_matches": 3 },
        "sampler": { "peak": { "bins": 9 } }
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.sync.stuck_pc_matches, 3);
    assert_eq!(config.sync.queue_capacity, 5);
    let peak = config.sampler.peak.unwrap();
    assert_eq!(peak.mode, PeakMode::Floating);
    assert_eq!(peak.bins, 9);
}

#[test]
fn weight_bank_width_vectors_are_accepted() {
    let json = r#"{
        "sampler": {
            "width": 1023,
            "duration": { "bins": 4, "signal": 1022 },
            "peak": { "mode": "rolling", "bins": 1024 }
        }
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.sampler.width, 1023);
    assert_eq!(config.sampler.peak.unwrap().mode, PeakMode::Rolling);
}

#[rstest]
#[case(r#"{ "sync": { "queue_capacity": 0 } }"#, "sync.queue_capacity")]
#[case(r#"{ "sync": { "stuck_buffer_cycles": 0 } }"#, "sync.stuck_buffer_cycles")]
#[case(r#"{ "sync": { "append_cycle_budget": 0 } }"#, "sync.append_cycle_budget")]
#[case(r#"{ "sampler": { "width": 0 } }"#, "sampler.width")]
#[case(
    r#"{ "sampler": { "duration": { "bins": 0, "signal": 0 } } }"#,
    "sampler.duration.bins"
)]
#[case(
    r#"{ "sampler": { "duration": { "bins": 2, "divisor": 0, "signal": 0 } } }"#,
    "sampler.duration.divisor"
)]
#[case(
    r#"{ "sampler": { "width": 4, "duration": { "bins": 2, "signal": 4 } } }"#,
    "sampler.duration.signal"
)]
#[case(r#"{ "sampler": { "peak": { "bins": 0 } } }"#, "sampler.peak.bins")]
#[case(r#"{ "sampler": { "combined": true } }"#, "sampler.combined")]
#[case(
    r#"{ "sampler": { "sequence_cycle_budget": 0 } }"#,
    "sampler.sequence_cycle_budget"
)]
fn invalid_values_name_their_field(#[case] json: &str, #[case] expected: &str) {
    match Config::from_json_str(json) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected an invalid-field error, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json_str(r#"{ "isa": "sparc" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    let err = Config::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "isa": "rv32", "sampler": {{ "events": ["full", "empty"] }} }}"#
    )
    .unwrap();
    let config = Config::from_path(file.path()).unwrap();
    assert_eq!(config.isa, Isa::Rv32);
    assert_eq!(config.sampler.events, vec!["full", "empty"]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn config_round_trips_through_json() {
    let config = Config::from_json_str(r#"{ "sampler": { "peak": { "mode": "rolling", "bins": 3 } } }"#)
        .unwrap();
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(Config::from_json_str(&text).unwrap(), config);
}
