// Licensed under the Apache-2.0 license

//! Frequency reconfiguration flow: calculate counters for a target
//! frequency, program them through the command interface and poll the
//! status register on the emulated core.

use anyhow::Result;
use emulator_periph::PllReconfModel;
use fpga_registers::pll::{
    PLL_CTL_MODE_WRITE, PLL_CTL_M_COUNTER_READ, PLL_CTL_STATUS_READ, PLL_C_COUNTER_INDEX,
    PLL_MODE_INDEX, PLL_MODE_POLL, PLL_M_COUNTER_INDEX, PLL_N_COUNTER_INDEX,
};
use pll_driver::{calculate_counters_brute_force, PllDevice};

#[test]
fn test_full_reconfiguration_flow() -> Result<()> {
    let model = PllReconfModel::new();
    let device = PllDevice::new(model.clone());

    device.ioctl(PLL_CTL_MODE_WRITE, PLL_MODE_POLL)?;
    assert_eq!(model.register(PLL_MODE_INDEX), PLL_MODE_POLL);

    // 50 MHz reference up to 400 MHz: an exact multiply-only solution.
    let solution = calculate_counters_brute_force(50_000_000.0, 400_000_000.0);
    assert_eq!(solution.freq, 400_000_000.0);

    device.reconfigure_basic(solution.m, solution.n, solution.c)?;
    assert_eq!(model.register(PLL_M_COUNTER_INDEX), solution.m);
    assert_eq!(model.register(PLL_N_COUNTER_INDEX), solution.n);
    assert_eq!(model.register(PLL_C_COUNTER_INDEX), solution.c);

    // The modeled core finishes immediately once started.
    assert_eq!(device.ioctl(PLL_CTL_STATUS_READ, 0)?, Some(1));
    Ok(())
}

#[test]
fn test_counters_read_back_what_was_programmed() -> Result<()> {
    let model = PllReconfModel::new();
    let device = PllDevice::new(model.clone());

    let solution = calculate_counters_brute_force(50_000_000.0, 75_000_000.0);
    device.reconfigure_basic(solution.m, solution.n, solution.c)?;
    assert_eq!(device.ioctl(PLL_CTL_M_COUNTER_READ, 0)?, Some(solution.m));
    Ok(())
}
