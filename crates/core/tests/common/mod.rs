/// DUT stand-ins.
pub mod mocks;
