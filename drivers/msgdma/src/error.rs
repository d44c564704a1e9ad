// Licensed under the Apache-2.0 license

use emulator_bus::BusError;
use thiserror::Error;

/// Errors surfaced to ioctl callers. Protocol errors are detected before any
/// register access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MsgdmaError {
    #[error("unrecognized or malformed command 0x{0:08x}")]
    InvalidCommand(u32),

    #[error("descriptor layout does not match the device descriptor window")]
    InvalidArgument,

    #[error("no completion interrupt observed within the suspend timeout")]
    Timeout,

    #[error("register access fault: {0}")]
    Bus(#[from] BusError),
}

/// Errors in device lifecycle handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("could not bind interrupt line {0}")]
    IrqBindFailed(u32),

    #[error("no such device: minor {0}")]
    NoSuchDevice(u32),
}
