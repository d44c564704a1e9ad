// Licensed under the Apache-2.0 license

//! One MSGDMA dispatcher instance: descriptor submission, completion wait
//! and CSR operations.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use emulator_bus::{Bus, BusSize, IrqHandler};
use log::{debug, error};

use crate::error::MsgdmaError;
use fpga_registers::msgdma::{
    Descriptor, DescriptorExtended, CSR_CONTROL_OFFSET, CSR_GLOBAL_IRQ_MASK_BIT,
    CSR_RESET_DISPATCHER_BIT, CSR_STATUS_BUSY_BIT, CSR_STATUS_IRQ_BIT, CSR_STATUS_OFFSET,
    DSCR_CONTROL_EXT_OFFSET, DSCR_CONTROL_OFFSET, DSCR_EARLY_TERMINATION_IRQ_BIT,
    DSCR_LENGTH_OFFSET, DSCR_READ_BURST_OFFSET, DSCR_READ_HIGH_OFFSET, DSCR_READ_OFFSET,
    DSCR_READ_STRIDE_OFFSET, DSCR_SEQUENCE_OFFSET, DSCR_TRANSFER_COMPLETE_IRQ_BIT,
    DSCR_TRANSFER_GO_BIT, DSCR_WRITE_BURST_OFFSET, DSCR_WRITE_HIGH_OFFSET, DSCR_WRITE_OFFSET,
    DSCR_WRITE_STRIDE_OFFSET, EXTENDED_DESCRIPTOR_SPAN,
};

/// Upper bound on the completion wait of an IRQ-mode submission.
pub const PROCESS_SUSPEND_TIMEOUT: Duration = Duration::from_millis(2000);

/// One discovered dispatcher. All callers that open the same device file
/// share this instance, including its completion-wait state.
pub struct MsgdmaDevice {
    minor: u32,
    irq: u32,
    csr: Arc<dyn Bus>,
    dscr: Arc<dyn Bus>,
    dscr_extended: bool,
    /// Serializes descriptor submissions on this instance, held across the
    /// completion wait so at most one IRQ-mode submission is outstanding.
    submission_lock: Mutex<()>,
    /// True while a submission awaits this instance's next interrupt.
    awaiting: Mutex<bool>,
    completed: Condvar,
}

impl MsgdmaDevice {
    pub(crate) fn new(
        minor: u32,
        csr: Arc<dyn Bus>,
        dscr: Arc<dyn Bus>,
        dscr_span: u32,
        irq: u32,
    ) -> Self {
        let dscr_extended = dscr_span == EXTENDED_DESCRIPTOR_SPAN;
        debug!("msgdma{minor}: extended descriptor: {dscr_extended}");
        Self {
            minor,
            irq,
            csr,
            dscr,
            dscr_extended,
            submission_lock: Mutex::new(()),
            awaiting: Mutex::new(false),
            completed: Condvar::new(),
        }
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn irq(&self) -> u32 {
        self.irq
    }

    pub fn is_extended(&self) -> bool {
        self.dscr_extended
    }

    /// Submit a standard-layout transfer descriptor. The go bit is ORed into
    /// the control word as the hardware will not start without it.
    ///
    /// If the control word requests completion notification the caller is
    /// suspended until the interrupt fires; `MsgdmaError::Timeout` is
    /// returned if no interrupt is observed within
    /// [`PROCESS_SUSPEND_TIMEOUT`].
    pub fn write_standard_descriptor(&self, dscr: &Descriptor) -> Result<(), MsgdmaError> {
        if self.dscr_extended {
            return Err(MsgdmaError::InvalidArgument);
        }
        let _submission = self.submission_lock.lock().unwrap();

        debug!(
            "msgdma{}: std dscr read=0x{:x} write=0x{:x} length=0x{:x} control=0x{:x}",
            self.minor, dscr.read_addr, dscr.write_addr, dscr.length, dscr.control
        );

        self.dscr.write(BusSize::Word, DSCR_READ_OFFSET, dscr.read_addr)?;
        self.dscr.write(BusSize::Word, DSCR_WRITE_OFFSET, dscr.write_addr)?;
        self.dscr.write(BusSize::Word, DSCR_LENGTH_OFFSET, dscr.length)?;

        self.start_transfer(
            DSCR_CONTROL_OFFSET,
            dscr.control | DSCR_TRANSFER_GO_BIT,
            wants_completion_irq(dscr.control),
        )
    }

    /// Submit an extended-layout transfer descriptor. Unlike the standard
    /// path the control word is written verbatim; the caller sets the go bit.
    pub fn write_extended_descriptor(&self, dscr: &DescriptorExtended) -> Result<(), MsgdmaError> {
        if !self.dscr_extended {
            return Err(MsgdmaError::InvalidArgument);
        }
        let _submission = self.submission_lock.lock().unwrap();

        debug!(
            "msgdma{}: ext dscr read=0x{:x} write=0x{:x} length=0x{:x} seq=0x{:x} control=0x{:x}",
            self.minor, dscr.read_addr, dscr.write_addr, dscr.length, dscr.seq_number, dscr.control
        );

        self.dscr.write(BusSize::Word, DSCR_READ_OFFSET, dscr.read_addr)?;
        self.dscr.write(BusSize::Word, DSCR_WRITE_OFFSET, dscr.write_addr)?;
        self.dscr.write(BusSize::Word, DSCR_LENGTH_OFFSET, dscr.length)?;
        self.dscr.write(
            BusSize::Byte,
            DSCR_READ_BURST_OFFSET,
            dscr.read_burst_count as u32,
        )?;
        self.dscr.write(
            BusSize::Byte,
            DSCR_WRITE_BURST_OFFSET,
            dscr.write_burst_count as u32,
        )?;
        self.dscr.write(
            BusSize::HalfWord,
            DSCR_SEQUENCE_OFFSET,
            dscr.seq_number as u32,
        )?;
        self.dscr.write(
            BusSize::HalfWord,
            DSCR_READ_STRIDE_OFFSET,
            dscr.read_stride as u32,
        )?;
        self.dscr.write(
            BusSize::HalfWord,
            DSCR_WRITE_STRIDE_OFFSET,
            dscr.write_stride as u32,
        )?;
        self.dscr.write(
            BusSize::Word,
            DSCR_READ_HIGH_OFFSET,
            dscr.read_addr_high,
        )?;
        self.dscr.write(
            BusSize::Word,
            DSCR_WRITE_HIGH_OFFSET,
            dscr.write_addr_high,
        )?;

        self.start_transfer(
            DSCR_CONTROL_EXT_OFFSET,
            dscr.control,
            wants_completion_irq(dscr.control),
        )
    }

    /// Write the control word, which latches the descriptor and starts the
    /// transfer, then wait for completion if notification was requested.
    ///
    /// The wait is armed before the control word goes out: once the go bit
    /// is written the interrupt may fire at any instruction boundary, and an
    /// interrupt delivered before the flag is raised would be lost.
    fn start_transfer(
        &self,
        control_offset: u32,
        control: u32,
        wait: bool,
    ) -> Result<(), MsgdmaError> {
        if wait {
            *self.awaiting.lock().unwrap() = true;
        }
        if let Err(e) = self.dscr.write(BusSize::Word, control_offset, control) {
            if wait {
                *self.awaiting.lock().unwrap() = false;
            }
            return Err(e.into());
        }
        if wait {
            self.wait_for_completion()?;
        }
        Ok(())
    }

    fn wait_for_completion(&self) -> Result<(), MsgdmaError> {
        let awaiting = self.awaiting.lock().unwrap();
        let (mut awaiting, _) = self
            .completed
            .wait_timeout_while(awaiting, PROCESS_SUSPEND_TIMEOUT, |awaiting| *awaiting)
            .unwrap();
        if *awaiting {
            // Leave a clean flag behind for the next submission.
            *awaiting = false;
            error!("msgdma{}: completion wait timed out", self.minor);
            return Err(MsgdmaError::Timeout);
        }
        Ok(())
    }

    /// Set the global interrupt mask bit in the CSR control register.
    pub fn enable_global_irq(&self) -> Result<(), MsgdmaError> {
        debug!("msgdma{}: enable global IRQ mask", self.minor);
        let value = self.csr.read(BusSize::Word, CSR_CONTROL_OFFSET)?;
        self.csr.write(
            BusSize::Word,
            CSR_CONTROL_OFFSET,
            value | CSR_GLOBAL_IRQ_MASK_BIT,
        )?;
        Ok(())
    }

    /// Clear the global interrupt mask bit in the CSR control register.
    pub fn disable_global_irq(&self) -> Result<(), MsgdmaError> {
        debug!("msgdma{}: disable global IRQ mask", self.minor);
        let value = self.csr.read(BusSize::Word, CSR_CONTROL_OFFSET)?;
        self.csr.write(
            BusSize::Word,
            CSR_CONTROL_OFFSET,
            value & !CSR_GLOBAL_IRQ_MASK_BIT,
        )?;
        Ok(())
    }

    /// Non-destructive read of the dispatcher busy bit.
    pub fn is_busy(&self) -> Result<bool, MsgdmaError> {
        let status = self.csr.read(BusSize::Word, CSR_STATUS_OFFSET)?;
        Ok(status & CSR_STATUS_BUSY_BIT != 0)
    }

    /// Pulse the dispatcher reset bit. The bit self-clears in hardware; this
    /// layer does not poll for the reset to finish.
    pub fn reset_dispatcher(&self) -> Result<(), MsgdmaError> {
        debug!("msgdma{}: reset dispatcher", self.minor);
        let value = self.csr.read(BusSize::Word, CSR_CONTROL_OFFSET)?;
        self.csr.write(
            BusSize::Word,
            CSR_CONTROL_OFFSET,
            value | CSR_RESET_DISPATCHER_BIT,
        )?;
        Ok(())
    }
}

// Hand-written: the `Arc<dyn Bus>` windows have no Debug impl.
impl fmt::Debug for MsgdmaDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsgdmaDevice")
            .field("minor", &self.minor)
            .field("irq", &self.irq)
            .field("dscr_extended", &self.dscr_extended)
            .finish_non_exhaustive()
    }
}

/// Runs in interrupt context; must not block. The status clear comes first
/// (write-one-to-clear, otherwise the line retriggers), then the awaiting
/// flag drops, then the waiter is released.
impl IrqHandler for MsgdmaDevice {
    fn handle_interrupt(&self) {
        debug!("msgdma{}: interrupt received", self.minor);
        if let Err(e) = self
            .csr
            .write(BusSize::Word, CSR_STATUS_OFFSET, CSR_STATUS_IRQ_BIT)
        {
            error!("msgdma{}: failed to clear interrupt status: {e}", self.minor);
        }
        let mut awaiting = self.awaiting.lock().unwrap();
        *awaiting = false;
        self.completed.notify_one();
    }
}

fn wants_completion_irq(control: u32) -> bool {
    control & (DSCR_TRANSFER_COMPLETE_IRQ_BIT | DSCR_EARLY_TERMINATION_IRQ_BIT) != 0
}
