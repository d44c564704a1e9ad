/*++

Licensed under the Apache-2.0 license.

File Name:

    pll_model.rs

Abstract:

    File contains an emulated PLL Reconfig core: a word-addressed register
    file where a start-register write marks the reconfiguration done.

--*/

use std::sync::{Arc, Mutex};

use emulator_bus::{Bus, BusError, BusSize};
use fpga_registers::pll::{PLL_START_INDEX, PLL_STATUS_INDEX};

const PLL_WINDOW_SPAN: u32 = 0x100;
const PLL_STATUS_DONE: u32 = 1;

/// Word-addressed PLL reconfiguration register file.
pub struct PllReconfModel {
    regs: Mutex<[u32; (PLL_WINDOW_SPAN / 4) as usize]>,
}

impl PllReconfModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            regs: Mutex::new([0; (PLL_WINDOW_SPAN / 4) as usize]),
        })
    }

    pub fn register(&self, index: u32) -> u32 {
        self.regs.lock().unwrap()[index as usize]
    }
}

impl Bus for PllReconfModel {
    fn read(&self, size: BusSize, offset: u32) -> Result<u32, BusError> {
        if size != BusSize::Word || offset % 4 != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        if offset + 4 > PLL_WINDOW_SPAN {
            return Err(BusError::LoadAccessFault);
        }
        Ok(self.regs.lock().unwrap()[(offset / 4) as usize])
    }

    fn write(&self, size: BusSize, offset: u32, val: u32) -> Result<(), BusError> {
        if size != BusSize::Word || offset % 4 != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        if offset + 4 > PLL_WINDOW_SPAN {
            return Err(BusError::StoreAccessFault);
        }
        let mut regs = self.regs.lock().unwrap();
        regs[(offset / 4) as usize] = val;
        if offset / 4 == PLL_START_INDEX {
            // Reconfiguration completes immediately in the model.
            regs[PLL_STATUS_INDEX as usize] = PLL_STATUS_DONE;
        }
        Ok(())
    }
}
