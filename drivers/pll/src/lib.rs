// Licensed under the Apache-2.0 license

//! Driver for the Altera PLL Reconfig IP core: a stateless ioctl-to-register
//! multiplexer plus the brute-force counter search used to hit a requested
//! output frequency.

mod device;
mod search;

pub use device::{PllDevice, PllError};
pub use search::{calculate_counters_brute_force, CounterSolution};
