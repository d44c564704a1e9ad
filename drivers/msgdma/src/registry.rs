// Licensed under the Apache-2.0 license

//! Device lifecycle. The discovery collaborator hands over mapped register
//! windows and an interrupt line; the registry allocates an identity, binds
//! the interrupt and publishes the instance. Removal unbinds the interrupt
//! before the window handles are dropped, so a late interrupt can never run
//! against unmapped registers.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use emulator_bus::{Bus, IrqController};
use log::{error, info};

use crate::device::MsgdmaDevice;
use crate::error::RegistryError;

/// Table of live dispatcher instances, keyed by minor number. One registry
/// exists for the running system.
pub struct DeviceRegistry {
    irq_controller: Arc<IrqController>,
    devices: Mutex<BTreeMap<u32, Arc<MsgdmaDevice>>>,
}

impl DeviceRegistry {
    pub fn new(irq_controller: Arc<IrqController>) -> Self {
        Self {
            irq_controller,
            devices: Mutex::new(BTreeMap::new()),
        }
    }

    /// Bring up one discovered dispatcher. `dscr_span` is the byte size of
    /// the mapped descriptor resource and selects the descriptor layout.
    ///
    /// Minor numbers are allocated lowest-free and reused after removal. On
    /// a failed interrupt bind the partially created instance is rolled back
    /// and the minor released.
    pub fn probe(
        &self,
        csr: Arc<dyn Bus>,
        dscr: Arc<dyn Bus>,
        dscr_span: u32,
        irq: u32,
    ) -> Result<Arc<MsgdmaDevice>, RegistryError> {
        let mut devices = self.devices.lock().unwrap();
        let minor = (0..).find(|m| !devices.contains_key(m)).unwrap();

        let device = Arc::new(MsgdmaDevice::new(minor, csr, dscr, dscr_span, irq));
        devices.insert(minor, Arc::clone(&device));

        let handler: Arc<dyn emulator_bus::IrqHandler> = device.clone();
        if let Err(e) = self.irq_controller.bind(irq, handler) {
            error!("msgdma{minor}: could not register interrupt: {e}");
            devices.remove(&minor);
            return Err(RegistryError::IrqBindFailed(irq));
        }

        info!(
            "msgdma{minor}: probed (irq {irq}, extended: {})",
            device.is_extended()
        );
        Ok(device)
    }

    /// Tear down the instance with the given minor. Callers holding the
    /// device handle keep a working reference until they drop it; the
    /// identity becomes reusable immediately.
    pub fn remove(&self, minor: u32) -> Result<(), RegistryError> {
        let device = self
            .devices
            .lock()
            .unwrap()
            .remove(&minor)
            .ok_or(RegistryError::NoSuchDevice(minor))?;

        // Interrupt delivery stops before the window handles go away.
        self.irq_controller.unbind(device.irq());
        info!("msgdma{minor}: removed");
        Ok(())
    }

    /// Look up a live instance, as a device-file open would.
    pub fn open(&self, minor: u32) -> Result<Arc<MsgdmaDevice>, RegistryError> {
        self.devices
            .lock()
            .unwrap()
            .get(&minor)
            .cloned()
            .ok_or(RegistryError::NoSuchDevice(minor))
    }

    pub fn len(&self) -> usize {
        self.devices.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.lock().unwrap().is_empty()
    }
}
