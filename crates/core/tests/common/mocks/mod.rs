/// `mockall` DUTs.
pub mod dut;
/// Replays recorded signal snapshots.
pub mod signals;
