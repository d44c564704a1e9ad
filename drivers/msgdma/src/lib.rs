// Licensed under the Apache-2.0 license

//! Control-plane driver for Altera MSGDMA dispatcher IP core instances.
//!
//! One [`MsgdmaDevice`] exists per discovered dispatcher and owns its CSR
//! window, descriptor window and interrupt line. Callers submit transfer
//! descriptors through the ioctl command set; a descriptor whose control word
//! requests completion notification suspends the caller until the instance's
//! interrupt fires or the wait times out. Discovery and removal go through
//! the [`DeviceRegistry`].

mod device;
mod error;
mod ioctl;
mod registry;

pub use device::{MsgdmaDevice, PROCESS_SUSPEND_TIMEOUT};
pub use error::{MsgdmaError, RegistryError};
pub use fpga_registers::msgdma::{Descriptor, DescriptorExtended};
pub use registry::DeviceRegistry;
