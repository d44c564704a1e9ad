// Licensed under the Apache-2.0 license

//! ioctl-to-register multiplexing. Each command resolves to a register word
//! index through a static table; there is no per-device state beyond the
//! mapped window.

use std::sync::Arc;

use emulator_bus::{Bus, BusError, BusSize};
use log::{debug, error};
use thiserror::Error;

use fpga_registers::ioc::{ioc_dir, ioc_nr, ioc_size, ioc_type, IOC_READ, IOC_WRITE};
use fpga_registers::pll::{
    PLL_CTL_C_COUNTER_WRITE, PLL_CTL_M_COUNTER_WRITE, PLL_CTL_N_COUNTER_WRITE,
    PLL_CTL_START_WRITE, PLL_IOC_MAGIC, PLL_IOC_MAXNR, PLL_READ_OFFSETS, PLL_WRITE_OFFSETS,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PllError {
    #[error("unrecognized or malformed command 0x{0:08x}")]
    InvalidCommand(u32),

    #[error("no register is mapped to command 0x{0:08x}")]
    InvalidArgument(u32),

    #[error("register access fault: {0}")]
    Bus(#[from] BusError),
}

/// One mapped PLL reconfiguration core.
pub struct PllDevice {
    window: Arc<dyn Bus>,
}

impl PllDevice {
    pub fn new(window: Arc<dyn Bus>) -> Self {
        Self { window }
    }

    /// Entry point for a raw caller command. Read commands return the
    /// register value; write commands take it from `value` and return
    /// `None`.
    pub fn ioctl(&self, cmd: u32, value: u32) -> Result<Option<u32>, PllError> {
        if ioc_type(cmd) != PLL_IOC_MAGIC {
            error!("pll ioctl: incorrect magic number in 0x{cmd:08x}");
            return Err(PllError::InvalidCommand(cmd));
        }
        let nr = ioc_nr(cmd);
        if nr == 0 || nr > PLL_IOC_MAXNR || ioc_size(cmd) != 4 {
            error!("pll ioctl: command 0x{cmd:08x} is not valid");
            return Err(PllError::InvalidCommand(cmd));
        }

        // Word-indexed registers; byte offset is index * 4.
        match ioc_dir(cmd) {
            IOC_READ => {
                let index = lookup(PLL_READ_OFFSETS, nr).ok_or(PllError::InvalidArgument(cmd))?;
                let value = self.window.read(BusSize::Word, index * 4)?;
                debug!("pll: read index 0x{index:x} -> 0x{value:x}");
                Ok(Some(value))
            }
            IOC_WRITE => {
                let index = lookup(PLL_WRITE_OFFSETS, nr).ok_or(PllError::InvalidArgument(cmd))?;
                debug!("pll: write index 0x{index:x} <- 0x{value:x}");
                self.window.write(BusSize::Word, index * 4, value)?;
                Ok(None)
            }
            _ => {
                // Every command in the family moves data one way.
                error!("pll ioctl: direction mismatch in 0x{cmd:08x}");
                Err(PllError::InvalidCommand(cmd))
            }
        }
    }

    /// Program the three counters and pulse the start register.
    pub fn reconfigure_basic(&self, m: u32, n: u32, c: u32) -> Result<(), PllError> {
        debug!("pll: reconfigure m=0x{m:x} n=0x{n:x} c=0x{c:x}");
        self.ioctl(PLL_CTL_M_COUNTER_WRITE, m)?;
        self.ioctl(PLL_CTL_N_COUNTER_WRITE, n)?;
        self.ioctl(PLL_CTL_C_COUNTER_WRITE, c)?;
        self.ioctl(PLL_CTL_START_WRITE, 0)?;
        Ok(())
    }
}

fn lookup(table: &[(u32, u32)], nr: u32) -> Option<u32> {
    table.iter().find(|(n, _)| *n == nr).map(|(_, index)| *index)
}
