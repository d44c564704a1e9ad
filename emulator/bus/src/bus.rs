/*++

Licensed under the Apache-2.0 license.

File Name:

    bus.rs

Abstract:

    File contains definition of the Bus trait.

--*/

use std::fmt;

/// Width of a single register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum BusSize {
    Byte = 1,
    HalfWord = 2,
    Word = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Load address misaligned exception
    LoadAddrMisaligned,

    /// Load access fault exception
    LoadAccessFault,

    /// Store address misaligned exception
    StoreAddrMisaligned,

    /// Store access fault exception
    StoreAccessFault,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusError::LoadAddrMisaligned => "load address misaligned",
            BusError::LoadAccessFault => "load access fault",
            BusError::StoreAddrMisaligned => "store address misaligned",
            BusError::StoreAccessFault => "store access fault",
        };
        f.write_str(s)
    }
}

impl std::error::Error for BusError {}

/// Represents one memory-mapped register window. Offsets are byte offsets
/// relative to the window base.
///
/// Access goes through `&self` because a window is shared between process
/// context (blocking callers) and interrupt context; implementations provide
/// their own interior locking and must never block indefinitely.
pub trait Bus: Send + Sync {
    /// Read data of specified size from the given offset.
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::LoadAccessFault` or
    ///   `BusError::LoadAddrMisaligned`
    fn read(&self, size: BusSize, offset: u32) -> Result<u32, BusError>;

    /// Write data of specified size to the given offset.
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::StoreAccessFault` or
    ///   `BusError::StoreAddrMisaligned`
    fn write(&self, size: BusSize, offset: u32, val: u32) -> Result<(), BusError>;
}
