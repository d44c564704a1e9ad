// Licensed under the Apache-2.0 license

//! Probe, open and removal of dispatcher instances against the emulated
//! hardware, including interrupt teardown ordering.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use emulator_bus::IrqController;
use emulator_periph::{DispatcherMode, DispatcherModel};
use fpga_registers::msgdma::CSR_STATUS_BUSY_BIT;
use msgdma_driver::{DeviceRegistry, RegistryError};

#[test]
fn test_probe_open_remove_cycle() -> Result<()> {
    let controller = IrqController::new();
    let registry = DeviceRegistry::new(Arc::clone(&controller));

    let model = DispatcherModel::new(DispatcherMode::Standard, controller.line(40), None);
    let device = registry.probe(
        model.csr_window(),
        model.descriptor_window(),
        model.descriptor_span(),
        40,
    )?;
    assert_eq!(device.minor(), 0);
    assert!(!device.is_extended());

    // An opener sees the same instance the probe produced.
    let opened = registry.open(0)?;
    assert!(Arc::ptr_eq(&device, &opened));

    registry.remove(0)?;
    assert_eq!(registry.open(0).unwrap_err(), RegistryError::NoSuchDevice(0));
    assert!(registry.is_empty());
    Ok(())
}

#[test]
fn test_interrupts_stop_after_removal() -> Result<()> {
    let controller = IrqController::new();
    let registry = DeviceRegistry::new(Arc::clone(&controller));

    let line = controller.line(40);
    let model = DispatcherModel::new(DispatcherMode::Standard, line.clone(), None);
    registry.probe(
        model.csr_window(),
        model.descriptor_window(),
        model.descriptor_span(),
        40,
    )?;
    registry.remove(0)?;

    // A late interrupt from the hardware is dropped, not delivered to the
    // removed instance.
    line.raise();
    Ok(())
}

#[test]
fn test_two_dispatchers_operate_independently() -> Result<()> {
    let controller = IrqController::new();
    let registry = DeviceRegistry::new(Arc::clone(&controller));

    let std_model = DispatcherModel::new(
        DispatcherMode::Standard,
        controller.line(40),
        Some(Duration::from_millis(10)),
    );
    let ext_model = DispatcherModel::new(DispatcherMode::Extended, controller.line(41), None);

    let std_dev = registry.probe(
        std_model.csr_window(),
        std_model.descriptor_window(),
        std_model.descriptor_span(),
        40,
    )?;
    let ext_dev = registry.probe(
        ext_model.csr_window(),
        ext_model.descriptor_window(),
        ext_model.descriptor_span(),
        41,
    )?;

    assert_eq!((std_dev.minor(), ext_dev.minor()), (0, 1));
    assert!(!std_dev.is_extended());
    assert!(ext_dev.is_extended());

    // Busy state on one instance is invisible on the other.
    ext_model.set_busy(true);
    assert!(!std_dev.is_busy()?);
    assert!(ext_dev.is_busy()?);
    assert_eq!(std_model.status() & CSR_STATUS_BUSY_BIT, 0);
    Ok(())
}
