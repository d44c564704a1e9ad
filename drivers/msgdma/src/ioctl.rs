// Licensed under the Apache-2.0 license

//! Command dispatch. Every request is validated against the fixed command
//! table before any register access happens.

use log::error;
use zerocopy::FromBytes;

use crate::device::MsgdmaDevice;
use crate::error::MsgdmaError;
use fpga_registers::ioc::{ioc_dir, ioc_nr, ioc_size, ioc_type};
use fpga_registers::msgdma::{command_spec, CommandNr, Descriptor, DescriptorExtended, MSGDMA_IOC_MAGIC};

impl MsgdmaDevice {
    /// Entry point for a raw caller command. `arg` is the caller payload:
    /// input for descriptor submissions, output for the busy query, empty
    /// for the rest.
    pub fn ioctl(&self, cmd: u32, arg: &mut [u8]) -> Result<(), MsgdmaError> {
        if ioc_type(cmd) != MSGDMA_IOC_MAGIC {
            error!("ioctl: incorrect magic number in 0x{cmd:08x}");
            return Err(MsgdmaError::InvalidCommand(cmd));
        }
        let nr = CommandNr::try_from(ioc_nr(cmd)).map_err(|_| {
            error!("ioctl: command 0x{cmd:08x} is not valid");
            MsgdmaError::InvalidCommand(cmd)
        })?;
        let spec = command_spec(nr);
        if ioc_dir(cmd) != spec.dir {
            error!("ioctl: direction mismatch in 0x{cmd:08x}");
            return Err(MsgdmaError::InvalidCommand(cmd));
        }
        if ioc_size(cmd) as usize != spec.size || arg.len() != spec.size {
            error!(
                "ioctl: payload size mismatch for 0x{cmd:08x} (expected {} bytes, got {})",
                spec.size,
                arg.len()
            );
            return Err(MsgdmaError::InvalidCommand(cmd));
        }

        match nr {
            CommandNr::WriteStdDscr => {
                let dscr = Descriptor::read_from_bytes(&*arg)
                    .map_err(|_| MsgdmaError::InvalidCommand(cmd))?;
                self.write_standard_descriptor(&dscr)
            }
            CommandNr::WriteExtDscr => {
                let dscr = DescriptorExtended::read_from_bytes(&*arg)
                    .map_err(|_| MsgdmaError::InvalidCommand(cmd))?;
                self.write_extended_descriptor(&dscr)
            }
            CommandNr::EnableGlobalIrq => self.enable_global_irq(),
            CommandNr::DisableGlobalIrq => self.disable_global_irq(),
            CommandNr::IsBusy => {
                let busy = self.is_busy()? as u32;
                arg.copy_from_slice(&busy.to_le_bytes());
                Ok(())
            }
            CommandNr::ResetDispatcher => self.reset_dispatcher(),
        }
    }
}
