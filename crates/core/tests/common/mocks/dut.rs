use covinject_core::sampler::SignalSnapshot;
use covinject_core::sim::{Dut, SignalDut};
use covinject_core::sync::FetchSnapshot;
use mockall::mock;

mock! {
    pub CpuDut {}
    impl Dut for CpuDut {
        fn present(&mut self, word: Option<u32>);
        fn tick(&mut self) -> FetchSnapshot;
        fn reset(&mut self);
    }
}

mock! {
    pub GenericDut {}
    impl SignalDut for GenericDut {
        fn apply(&mut self, value: &[i64]);
        fn tick(&mut self) -> SignalSnapshot;
        fn reset(&mut self);
    }
}
