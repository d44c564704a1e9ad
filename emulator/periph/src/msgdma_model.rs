/*++

Licensed under the Apache-2.0 license.

File Name:

    msgdma_model.rs

Abstract:

    File contains an emulated MSGDMA dispatcher: CSR and descriptor register
    windows over shared state, a go-bit latch, busy modeling and interrupt
    raising on transfer completion.

--*/

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use emulator_bus::{Bus, BusError, BusSize, IrqLine};
use fpga_registers::msgdma::{
    CSR_CONTROL_OFFSET, CSR_GLOBAL_IRQ_MASK_BIT, CSR_RESET_DISPATCHER_BIT, CSR_STATUS_BUSY_BIT,
    CSR_STATUS_IRQ_BIT, CSR_STATUS_OFFSET, DSCR_CONTROL_EXT_OFFSET, DSCR_CONTROL_OFFSET,
    DSCR_EARLY_TERMINATION_IRQ_BIT, DSCR_TRANSFER_COMPLETE_IRQ_BIT, DSCR_TRANSFER_GO_BIT,
    EXTENDED_DESCRIPTOR_SPAN,
};

/// Descriptor window layout of the modeled hardware, fixed at construction
/// like the synthesized IP would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherMode {
    Standard,
    Extended,
}

const STANDARD_DESCRIPTOR_SPAN: u32 = 0x10;
const CSR_SPAN: u32 = 0x20;

struct Regs {
    status: u32,
    control: u32,
    dscr: [u8; EXTENDED_DESCRIPTOR_SPAN as usize],
}

struct Shared {
    mode: DispatcherMode,
    regs: Mutex<Regs>,
    irq: IrqLine,
    /// `None` models hardware that never signals completion (timeout tests).
    completion_delay: Option<Duration>,
}

impl Shared {
    fn control_offset(&self) -> u32 {
        match self.mode {
            DispatcherMode::Standard => DSCR_CONTROL_OFFSET,
            DispatcherMode::Extended => DSCR_CONTROL_EXT_OFFSET,
        }
    }

    fn dscr_span(&self) -> u32 {
        match self.mode {
            DispatcherMode::Standard => STANDARD_DESCRIPTOR_SPAN,
            DispatcherMode::Extended => EXTENDED_DESCRIPTOR_SPAN,
        }
    }

    /// Called with the go bit set: the descriptor is latched and the
    /// transfer starts.
    fn latch(self: &Arc<Self>, control: u32) {
        let irq_requested =
            control & (DSCR_TRANSFER_COMPLETE_IRQ_BIT | DSCR_EARLY_TERMINATION_IRQ_BIT) != 0;

        self.regs.lock().unwrap().status |= CSR_STATUS_BUSY_BIT;

        let Some(delay) = self.completion_delay else {
            return;
        };
        let shared = Arc::clone(self);
        thread::spawn(move || {
            thread::sleep(delay);
            let masked = {
                let mut regs = shared.regs.lock().unwrap();
                regs.status &= !CSR_STATUS_BUSY_BIT;
                if irq_requested {
                    regs.status |= CSR_STATUS_IRQ_BIT;
                }
                regs.control & CSR_GLOBAL_IRQ_MASK_BIT == 0
            };
            if irq_requested && !masked {
                shared.irq.raise();
            }
        });
    }
}

pub struct DispatcherModel {
    shared: Arc<Shared>,
}

impl DispatcherModel {
    pub fn new(mode: DispatcherMode, irq: IrqLine, completion_delay: Option<Duration>) -> Self {
        Self {
            shared: Arc::new(Shared {
                mode,
                regs: Mutex::new(Regs {
                    status: 0,
                    control: 0,
                    dscr: [0; EXTENDED_DESCRIPTOR_SPAN as usize],
                }),
                irq,
                completion_delay,
            }),
        }
    }

    pub fn csr_window(&self) -> Arc<dyn Bus> {
        Arc::new(CsrWindow(Arc::clone(&self.shared)))
    }

    pub fn descriptor_window(&self) -> Arc<dyn Bus> {
        Arc::new(DscrWindow(Arc::clone(&self.shared)))
    }

    /// Byte size of the mapped descriptor resource, as discovery reports it.
    pub fn descriptor_span(&self) -> u32 {
        self.shared.dscr_span()
    }

    /// Test knob: force the busy bit.
    pub fn set_busy(&self, busy: bool) {
        let mut regs = self.shared.regs.lock().unwrap();
        if busy {
            regs.status |= CSR_STATUS_BUSY_BIT;
        } else {
            regs.status &= !CSR_STATUS_BUSY_BIT;
        }
    }

    pub fn status(&self) -> u32 {
        self.shared.regs.lock().unwrap().status
    }

    pub fn control(&self) -> u32 {
        self.shared.regs.lock().unwrap().control
    }

    /// Raw bytes of the latched descriptor window.
    pub fn descriptor_bytes(&self) -> [u8; EXTENDED_DESCRIPTOR_SPAN as usize] {
        self.shared.regs.lock().unwrap().dscr
    }
}

struct CsrWindow(Arc<Shared>);

impl Bus for CsrWindow {
    fn read(&self, size: BusSize, offset: u32) -> Result<u32, BusError> {
        if offset % size as u32 != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        if offset + size as u32 > CSR_SPAN {
            return Err(BusError::LoadAccessFault);
        }
        let regs = self.0.regs.lock().unwrap();
        match offset {
            CSR_STATUS_OFFSET => Ok(regs.status),
            CSR_CONTROL_OFFSET => Ok(regs.control),
            // Fill levels and sequence numbers read as empty.
            _ => Ok(0),
        }
    }

    fn write(&self, size: BusSize, offset: u32, val: u32) -> Result<(), BusError> {
        if offset % size as u32 != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        if offset + size as u32 > CSR_SPAN {
            return Err(BusError::StoreAccessFault);
        }
        let mut regs = self.0.regs.lock().unwrap();
        match offset {
            // Status bits are read-only except the pending bit, which is
            // write-one-to-clear.
            CSR_STATUS_OFFSET => regs.status &= !(val & CSR_STATUS_IRQ_BIT),
            CSR_CONTROL_OFFSET => {
                if val & CSR_RESET_DISPATCHER_BIT != 0 {
                    // Self-clearing reset pulse.
                    regs.status = 0;
                    regs.control = val & !CSR_RESET_DISPATCHER_BIT;
                } else {
                    regs.control = val;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

struct DscrWindow(Arc<Shared>);

impl Bus for DscrWindow {
    fn read(&self, size: BusSize, offset: u32) -> Result<u32, BusError> {
        if offset % size as u32 != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        if offset + size as u32 > self.0.dscr_span() {
            return Err(BusError::LoadAccessFault);
        }
        let regs = self.0.regs.lock().unwrap();
        let offset = offset as usize;
        let mut word = [0u8; 4];
        word[..size as usize].copy_from_slice(&regs.dscr[offset..offset + size as usize]);
        Ok(u32::from_le_bytes(word))
    }

    fn write(&self, size: BusSize, offset: u32, val: u32) -> Result<(), BusError> {
        if offset % size as u32 != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        if offset + size as u32 > self.0.dscr_span() {
            return Err(BusError::StoreAccessFault);
        }
        {
            let mut regs = self.0.regs.lock().unwrap();
            let offset = offset as usize;
            regs.dscr[offset..offset + size as usize]
                .copy_from_slice(&val.to_le_bytes()[..size as usize]);
        }
        if size == BusSize::Word && offset == self.0.control_offset() && val & DSCR_TRANSFER_GO_BIT != 0
        {
            self.0.latch(val);
        }
        Ok(())
    }
}
