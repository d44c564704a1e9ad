/*++

Licensed under the Apache-2.0 license.

File Name:

    ram.rs

Abstract:

    File contains a RAM-backed register window with no side effects.

--*/

use std::sync::Mutex;

use emulator_bus::{Bus, BusError, BusSize};

/// A plain RAM-backed register window. Reads and writes have no side
/// effects, which makes it a convenient backing store for the spy window and
/// for register files that need no modeled behavior.
pub struct RamWindow {
    data: Mutex<Vec<u8>>,
}

impl RamWindow {
    pub fn new(span: usize) -> Self {
        Self {
            data: Mutex::new(vec![0u8; span]),
        }
    }

    pub fn span(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    fn check(size: BusSize, offset: u32, len: usize, store: bool) -> Result<usize, BusError> {
        let width = size as usize;
        let offset = offset as usize;
        if offset % width != 0 {
            return Err(if store {
                BusError::StoreAddrMisaligned
            } else {
                BusError::LoadAddrMisaligned
            });
        }
        if offset + width > len {
            return Err(if store {
                BusError::StoreAccessFault
            } else {
                BusError::LoadAccessFault
            });
        }
        Ok(offset)
    }
}

impl Bus for RamWindow {
    fn read(&self, size: BusSize, offset: u32) -> Result<u32, BusError> {
        let data = self.data.lock().unwrap();
        let offset = Self::check(size, offset, data.len(), false)?;
        let mut word = [0u8; 4];
        word[..size as usize].copy_from_slice(&data[offset..offset + size as usize]);
        Ok(u32::from_le_bytes(word))
    }

    fn write(&self, size: BusSize, offset: u32, val: u32) -> Result<(), BusError> {
        let mut data = self.data.lock().unwrap();
        let offset = Self::check(size, offset, data.len(), true)?;
        data[offset..offset + size as usize].copy_from_slice(&val.to_le_bytes()[..size as usize]);
        Ok(())
    }
}
