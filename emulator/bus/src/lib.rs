/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the register window Bus trait and the interrupt routing
    primitives shared by the drivers and the emulated peripherals.

--*/

mod bus;
mod irq;

pub use bus::{Bus, BusError, BusSize};
pub use irq::{IrqController, IrqError, IrqHandler, IrqLine};
