// Licensed under the Apache-2.0 license

//! PLL Reconfig register map and ioctl command family.
//!
//! The reconfiguration core exposes word-addressed registers; the tables
//! below carry word indices (byte offset = index * 4). Every command moves a
//! single 4-byte value regardless of the underlying register width.

use crate::ioc::{ioc, IOC_READ, IOC_WRITE};

/// Byte span of the mapped reconfiguration window.
pub const PLL_ADDR_SPAN: u32 = 0xff;

/* Register word indices */
pub const PLL_MODE_INDEX: u32 = 0x00;
pub const PLL_STATUS_INDEX: u32 = 0x01;
pub const PLL_START_INDEX: u32 = 0x02;
pub const PLL_N_COUNTER_INDEX: u32 = 0x03;
pub const PLL_M_COUNTER_INDEX: u32 = 0x04;
pub const PLL_C_COUNTER_INDEX: u32 = 0x05;
pub const PLL_DYNAMIC_SHIFT_MODE_INDEX: u32 = 0x06;
pub const PLL_M_COUNTER_FRACT_INDEX: u32 = 0x07;
pub const PLL_BANDWIDTH_INDEX: u32 = 0x08;
pub const PLL_CHARGE_PUMP_INDEX: u32 = 0x09;
pub const PLL_VCO_DIV_INDEX: u32 = 0x1c;
pub const PLL_MIF_BASE_INDEX: u32 = 0x1f;

/* Mode register values */
pub const PLL_MODE_WRITE_REQUEST: u32 = 0;
pub const PLL_MODE_POLL: u32 = 1;

/// Command family magic for PLL reconfiguration devices.
pub const PLL_IOC_MAGIC: u32 = 0xf0;

/// Highest valid command sequence number.
pub const PLL_IOC_MAXNR: u32 = 19;

pub const PLL_CTL_MODE_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 1, 4);
pub const PLL_CTL_MODE_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 2, 4);
pub const PLL_CTL_STATUS_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 3, 4);
pub const PLL_CTL_START_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 4, 4);
pub const PLL_CTL_N_COUNTER_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 5, 4);
pub const PLL_CTL_N_COUNTER_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 6, 4);
pub const PLL_CTL_M_COUNTER_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 7, 4);
pub const PLL_CTL_M_COUNTER_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 8, 4);
pub const PLL_CTL_C_COUNTER_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 9, 4);
pub const PLL_CTL_C_COUNTER_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 10, 4);
pub const PLL_CTL_DYNAMIC_SHIFT_MODE_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 11, 4);
pub const PLL_CTL_M_COUNTER_FRACT_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 12, 4);
pub const PLL_CTL_BANDWIDTH_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 13, 4);
pub const PLL_CTL_BANDWIDTH_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 14, 4);
pub const PLL_CTL_CHARGE_PUMP_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 15, 4);
pub const PLL_CTL_CHARGE_PUMP_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 16, 4);
pub const PLL_CTL_VCO_DIV_READ: u32 = ioc(IOC_READ, PLL_IOC_MAGIC, 17, 4);
pub const PLL_CTL_VCO_DIV_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 18, 4);
pub const PLL_CTL_MIF_BASE_WRITE: u32 = ioc(IOC_WRITE, PLL_IOC_MAGIC, 19, 4);

/// Read commands, nr -> register word index.
pub const PLL_READ_OFFSETS: &[(u32, u32)] = &[
    (2, PLL_MODE_INDEX),
    (3, PLL_STATUS_INDEX),
    (6, PLL_N_COUNTER_INDEX),
    (8, PLL_M_COUNTER_INDEX),
    (10, PLL_C_COUNTER_INDEX),
    (13, PLL_BANDWIDTH_INDEX),
    (15, PLL_CHARGE_PUMP_INDEX),
    (17, PLL_VCO_DIV_INDEX),
];

/// Write commands, nr -> register word index.
pub const PLL_WRITE_OFFSETS: &[(u32, u32)] = &[
    (1, PLL_MODE_INDEX),
    (4, PLL_START_INDEX),
    (5, PLL_N_COUNTER_INDEX),
    (7, PLL_M_COUNTER_INDEX),
    (9, PLL_C_COUNTER_INDEX),
    (11, PLL_DYNAMIC_SHIFT_MODE_INDEX),
    (12, PLL_M_COUNTER_FRACT_INDEX),
    (14, PLL_BANDWIDTH_INDEX),
    (16, PLL_CHARGE_PUMP_INDEX),
    (18, PLL_VCO_DIV_INDEX),
    (19, PLL_MIF_BASE_INDEX),
];
