//! Session drivers and DUT collaborator traits.

/// `Dut` and `SignalDut`.
pub mod dut;

/// Stimulus exchange loops.
pub mod session;

pub use dut::{Dut, SignalDut};
pub use session::{GenericResponse, GenericSession, GenericStimulus, Response, Session, Stimulus};
