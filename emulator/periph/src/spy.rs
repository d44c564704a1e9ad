/*++

Licensed under the Apache-2.0 license.

File Name:

    spy.rs

Abstract:

    File contains a register window wrapper that records every access in
    order, for asserting on driver register traffic.

--*/

use std::sync::{Arc, Mutex};

use emulator_bus::{Bus, BusError, BusSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One recorded register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub kind: AccessKind,
    pub size: BusSize,
    pub offset: u32,
    pub value: u32,
}

/// Wraps another window and records each access before forwarding it.
pub struct SpyWindow {
    inner: Arc<dyn Bus>,
    log: Mutex<Vec<Access>>,
}

impl SpyWindow {
    pub fn new(inner: Arc<dyn Bus>) -> Self {
        Self {
            inner,
            log: Mutex::new(Vec::new()),
        }
    }

    /// All recorded accesses, in order.
    pub fn accesses(&self) -> Vec<Access> {
        self.log.lock().unwrap().clone()
    }

    /// Only the recorded writes, in order.
    pub fn writes(&self) -> Vec<Access> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .copied()
            .filter(|a| a.kind == AccessKind::Write)
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl Bus for SpyWindow {
    fn read(&self, size: BusSize, offset: u32) -> Result<u32, BusError> {
        let value = self.inner.read(size, offset)?;
        self.log.lock().unwrap().push(Access {
            kind: AccessKind::Read,
            size,
            offset,
            value,
        });
        Ok(value)
    }

    fn write(&self, size: BusSize, offset: u32, val: u32) -> Result<(), BusError> {
        // Record after the forwarded access succeeds; failed accesses never
        // reached hardware.
        self.inner.write(size, offset, val)?;
        self.log.lock().unwrap().push(Access {
            kind: AccessKind::Write,
            size,
            offset,
            value: val,
        });
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::RamWindow;

    #[test]
    fn test_records_in_order() {
        let spy = SpyWindow::new(Arc::new(RamWindow::new(0x10)));
        spy.write(BusSize::Word, 0x00, 1).unwrap();
        spy.write(BusSize::Word, 0x04, 2).unwrap();
        spy.read(BusSize::Word, 0x00).unwrap();

        let accesses = spy.accesses();
        assert_eq!(accesses.len(), 3);
        assert_eq!(accesses[0].kind, AccessKind::Write);
        assert_eq!(accesses[1].offset, 0x04);
        assert_eq!(accesses[2].kind, AccessKind::Read);
        assert_eq!(spy.writes().len(), 2);
    }

    #[test]
    fn test_failed_access_not_recorded() {
        let spy = SpyWindow::new(Arc::new(RamWindow::new(0x10)));
        assert!(spy.write(BusSize::Word, 0x40, 1).is_err());
        assert!(spy.accesses().is_empty());
    }
}
