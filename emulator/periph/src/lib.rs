/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains emulated FPGA IP core peripherals used by the driver test
    suites: a RAM-backed register window, an access-recording spy window, an
    MSGDMA dispatcher model and a PLL Reconfig model.

--*/

mod msgdma_model;
mod pll_model;
mod ram;
mod spy;

pub use msgdma_model::{DispatcherModel, DispatcherMode};
pub use pll_model::PllReconfModel;
pub use ram::RamWindow;
pub use spy::{Access, AccessKind, SpyWindow};
