// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test_msgdma_lifecycle;
#[cfg(test)]
mod test_msgdma_transfers;
#[cfg(test)]
mod test_pll_reconfig;
