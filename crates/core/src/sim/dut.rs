//! DUT collaborator traits.
//!
//! The core never touches simulator signals directly. A driver implements one
//! of these traits over whatever simulator it runs (a cocotb testbench through
//! the Python bindings, a recorded trace, a software pipeline model) and the
//! session loops call it once per clock edge.

use crate::sampler::signal::SignalSnapshot;
use crate::sync::signals::FetchSnapshot;

/// A CPU design fed through its instruction bus.
pub trait Dut {
    /// Drives `word` onto the instruction bus for the next fetch, or the idle
    /// value when nothing is pending.
    fn present(&mut self, word: Option<u32>);

    /// Advances one clock edge and samples the fetch stage.
    fn tick(&mut self) -> FetchSnapshot;

    /// Runs the DUT's reset sequence. The next `tick` observes the design
    /// out of reset.
    fn reset(&mut self);
}

/// A non-CPU design driven with a value vector.
pub trait SignalDut {
    /// Drives one stimulus value onto the design inputs.
    fn apply(&mut self, value: &[i64]);

    /// Advances one clock edge and samples the coverage signals.
    fn tick(&mut self) -> SignalSnapshot;

    /// Runs the DUT's reset sequence.
    fn reset(&mut self);
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn present(&mut self, word: Option<u32>) {
        (**self).present(word);
    }

    fn tick(&mut self) -> FetchSnapshot {
        (**self).tick()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
