// Licensed under the Apache-2.0 license

//! Register maps and command encodings for the Altera MSGDMA dispatcher and
//! PLL Reconfig IP cores. Offsets and bit positions follow the vendor
//! documentation; command words use the Linux `_IOC` encoding of the
//! character-device interface.

pub mod ioc;
pub mod msgdma;
pub mod pll;
