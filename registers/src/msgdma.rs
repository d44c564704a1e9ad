// Licensed under the Apache-2.0 license

//! MSGDMA dispatcher register map and ioctl command family.
//!
//! The dispatcher exposes two independent register windows: a CSR window
//! (status, control, fill levels, sequence numbers) and a descriptor window
//! into which one transfer descriptor is written to start a transfer. The
//! descriptor window comes in two mutually exclusive layouts; hardware built
//! with extended features maps a 0x20-byte window, standard hardware a
//! 0x10-byte one.

use core::mem::size_of;

use num_enum::TryFromPrimitive;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::ioc::{ioc, IOC_NONE, IOC_READ, IOC_WRITE};

/* Descriptor window byte offsets */
pub const DSCR_READ_OFFSET: u32 = 0x00;
pub const DSCR_WRITE_OFFSET: u32 = 0x04;
pub const DSCR_LENGTH_OFFSET: u32 = 0x08;
pub const DSCR_CONTROL_OFFSET: u32 = 0x0c;
pub const DSCR_WRITE_BURST_OFFSET: u32 = 0x0c;
pub const DSCR_READ_BURST_OFFSET: u32 = 0x0d;
pub const DSCR_SEQUENCE_OFFSET: u32 = 0x0e;
pub const DSCR_READ_STRIDE_OFFSET: u32 = 0x10;
pub const DSCR_WRITE_STRIDE_OFFSET: u32 = 0x12;
pub const DSCR_READ_HIGH_OFFSET: u32 = 0x14;
pub const DSCR_WRITE_HIGH_OFFSET: u32 = 0x18;
pub const DSCR_CONTROL_EXT_OFFSET: u32 = 0x1c;

/* CSR window byte offsets */
pub const CSR_STATUS_OFFSET: u32 = 0x00;
pub const CSR_CONTROL_OFFSET: u32 = 0x04;
pub const CSR_WRITE_FILL_OFFSET: u32 = 0x08;
pub const CSR_READ_FILL_OFFSET: u32 = 0x0a;
pub const CSR_RESPONSE_FILL_OFFSET: u32 = 0x0e;
pub const CSR_WRITE_SEQ_NUM_OFFSET: u32 = 0x10;
pub const CSR_READ_SEQ_NUM_OFFSET: u32 = 0x12;

/* CSR bits */
pub const CSR_STATUS_BUSY_BIT: u32 = 1 << 0;
pub const CSR_STATUS_IRQ_BIT: u32 = 1 << 9;
pub const CSR_GLOBAL_IRQ_MASK_BIT: u32 = 1 << 4;
pub const CSR_RESET_DISPATCHER_BIT: u32 = 1 << 1;

/* Descriptor control word bits */
pub const DSCR_TRANSMIT_CHANNEL_MASK: u32 = 0xff;
pub const DSCR_GENERATE_SOP: u32 = 1 << 8;
pub const DSCR_GENERATE_EOP: u32 = 1 << 9;
pub const DSCR_PARK_READS: u32 = 1 << 10;
pub const DSCR_PARK_WRITES: u32 = 1 << 11;
pub const DSCR_END_ON_EOP: u32 = 1 << 12;
pub const DSCR_TRANSFER_COMPLETE_IRQ_BIT: u32 = 1 << 14;
pub const DSCR_EARLY_TERMINATION_IRQ_BIT: u32 = 1 << 15;
pub const DSCR_TRANSMIT_ERROR_IRQ_MASK: u32 = 0xff << 16;
pub const DSCR_EARLY_DONE_ENABLE: u32 = 1 << 24;
pub const DSCR_TRANSFER_GO_BIT: u32 = 1 << 31;

/// Byte size of the descriptor window on hardware with extended descriptors.
/// Any other window size selects the standard layout.
pub const EXTENDED_DESCRIPTOR_SPAN: u32 = 0x20;

/// Standard transfer descriptor, as carried by the submit-standard command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Descriptor {
    pub read_addr: u32,
    pub write_addr: u32,
    pub length: u32,
    pub control: u32,
}

/// Extended transfer descriptor, as carried by the submit-extended command.
/// Unused fields must be zero-initialized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DescriptorExtended {
    pub read_addr: u32,
    pub write_addr: u32,
    pub length: u32,
    pub read_burst_count: u8,
    pub write_burst_count: u8,
    pub seq_number: u16,
    pub read_stride: u16,
    pub write_stride: u16,
    pub read_addr_high: u32,
    pub write_addr_high: u32,
    pub control: u32,
}

/// Command family magic for MSGDMA devices.
pub const MSGDMA_IOC_MAGIC: u32 = 0xf1;

/// Highest valid command sequence number.
pub const MSGDMA_IOC_MAXNR: u32 = 6;

/// Recognized command sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum CommandNr {
    WriteStdDscr = 1,
    WriteExtDscr = 2,
    EnableGlobalIrq = 3,
    DisableGlobalIrq = 4,
    IsBusy = 5,
    ResetDispatcher = 6,
}

/// Declared shape of one command: direction and exact payload size.
pub struct CommandSpec {
    pub nr: CommandNr,
    pub dir: u32,
    pub size: usize,
}

/// The fixed command set, indexed by `nr - 1`. Dispatch resolves commands
/// through this table rather than through per-command branching.
pub const COMMAND_TABLE: [CommandSpec; MSGDMA_IOC_MAXNR as usize] = [
    CommandSpec {
        nr: CommandNr::WriteStdDscr,
        dir: IOC_WRITE,
        size: size_of::<Descriptor>(),
    },
    CommandSpec {
        nr: CommandNr::WriteExtDscr,
        dir: IOC_WRITE,
        size: size_of::<DescriptorExtended>(),
    },
    CommandSpec {
        nr: CommandNr::EnableGlobalIrq,
        dir: IOC_NONE,
        size: 0,
    },
    CommandSpec {
        nr: CommandNr::DisableGlobalIrq,
        dir: IOC_NONE,
        size: 0,
    },
    CommandSpec {
        nr: CommandNr::IsBusy,
        dir: IOC_READ,
        size: size_of::<u32>(),
    },
    CommandSpec {
        nr: CommandNr::ResetDispatcher,
        dir: IOC_NONE,
        size: 0,
    },
];

pub fn command_spec(nr: CommandNr) -> &'static CommandSpec {
    &COMMAND_TABLE[nr as usize - 1]
}

pub const MSGDMA_WRITE_STD_DSCR: u32 = ioc(
    IOC_WRITE,
    MSGDMA_IOC_MAGIC,
    CommandNr::WriteStdDscr as u32,
    size_of::<Descriptor>() as u32,
);
pub const MSGDMA_WRITE_EXT_DSCR: u32 = ioc(
    IOC_WRITE,
    MSGDMA_IOC_MAGIC,
    CommandNr::WriteExtDscr as u32,
    size_of::<DescriptorExtended>() as u32,
);
pub const MSGDMA_ENABLE_IRQ_MASK: u32 = ioc(
    IOC_NONE,
    MSGDMA_IOC_MAGIC,
    CommandNr::EnableGlobalIrq as u32,
    0,
);
pub const MSGDMA_DISABLE_IRQ_MASK: u32 = ioc(
    IOC_NONE,
    MSGDMA_IOC_MAGIC,
    CommandNr::DisableGlobalIrq as u32,
    0,
);
pub const MSGDMA_IS_BUSY: u32 = ioc(
    IOC_READ,
    MSGDMA_IOC_MAGIC,
    CommandNr::IsBusy as u32,
    size_of::<u32>() as u32,
);
pub const MSGDMA_RESET_DISPATCHER: u32 = ioc(
    IOC_NONE,
    MSGDMA_IOC_MAGIC,
    CommandNr::ResetDispatcher as u32,
    0,
);

#[cfg(test)]
mod test {
    use super::*;
    use zerocopy::IntoBytes;

    #[test]
    fn test_descriptor_wire_sizes() {
        assert_eq!(size_of::<Descriptor>(), 16);
        assert_eq!(size_of::<DescriptorExtended>(), 32);
    }

    #[test]
    fn test_extended_descriptor_field_placement() {
        let dscr = DescriptorExtended {
            read_addr: 0x1111_1111,
            write_addr: 0x2222_2222,
            length: 0x3333_3333,
            read_burst_count: 0xaa,
            write_burst_count: 0xbb,
            seq_number: 0xcccc,
            read_stride: 0xdddd,
            write_stride: 0xeeee,
            read_addr_high: 0x4444_4444,
            write_addr_high: 0x5555_5555,
            control: 0x6666_6666,
        };
        let bytes = dscr.as_bytes();
        assert_eq!(bytes[12], 0xaa);
        assert_eq!(bytes[13], 0xbb);
        assert_eq!(&bytes[14..16], &0xcccc_u16.to_le_bytes());
        assert_eq!(&bytes[28..32], &0x6666_6666_u32.to_le_bytes());
    }

    #[test]
    fn test_command_table_matches_encodings() {
        for spec in COMMAND_TABLE.iter() {
            assert_eq!(command_spec(spec.nr).nr, spec.nr);
            assert!(spec.nr as u32 <= MSGDMA_IOC_MAXNR);
        }
        assert_eq!(crate::ioc::ioc_size(MSGDMA_WRITE_STD_DSCR), 16);
        assert_eq!(crate::ioc::ioc_size(MSGDMA_WRITE_EXT_DSCR), 32);
        assert_eq!(crate::ioc::ioc_nr(MSGDMA_RESET_DISPATCHER), 6);
        assert_eq!(crate::ioc::ioc_type(MSGDMA_IS_BUSY), MSGDMA_IOC_MAGIC);
    }
}
