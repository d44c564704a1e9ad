/*++

Licensed under the Apache-2.0 license.

File Name:

    irq.rs

Abstract:

    File contains the interrupt controller used to route raised interrupt
    lines to bound device handlers.

--*/

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use log::warn;

/// Handler invoked in interrupt context when a bound line fires. Handlers
/// must not block.
pub trait IrqHandler: Send + Sync {
    fn handle_interrupt(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqError {
    /// The line already has a handler bound to it.
    AlreadyBound(u32),
}

impl fmt::Display for IrqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrqError::AlreadyBound(irq) => write!(f, "interrupt line {irq} is already bound"),
        }
    }
}

impl std::error::Error for IrqError {}

/// Routes interrupt lines to handlers. One controller exists for the running
/// system; devices bind their line at probe time and unbind it on removal,
/// before their register windows go away.
#[derive(Default)]
pub struct IrqController {
    handlers: Mutex<HashMap<u32, Arc<dyn IrqHandler>>>,
}

impl IrqController {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bind `handler` to line `irq`. Lines are exclusive.
    pub fn bind(&self, irq: u32, handler: Arc<dyn IrqHandler>) -> Result<(), IrqError> {
        let mut handlers = self.handlers.lock().unwrap();
        if handlers.contains_key(&irq) {
            return Err(IrqError::AlreadyBound(irq));
        }
        handlers.insert(irq, handler);
        Ok(())
    }

    /// Release line `irq`. A later raise of an unbound line is dropped.
    pub fn unbind(&self, irq: u32) {
        self.handlers.lock().unwrap().remove(&irq);
    }

    /// Deliver a fired line to its handler, on the calling thread. The
    /// handler table lock is released before the handler runs.
    pub fn raise(&self, irq: u32) {
        let handler = self.handlers.lock().unwrap().get(&irq).cloned();
        match handler {
            Some(handler) => handler.handle_interrupt(),
            None => warn!("spurious interrupt {irq}: no handler bound"),
        }
    }

    /// A raising handle for line `irq`, handed to the peripheral that owns
    /// the line.
    pub fn line(self: &Arc<Self>, irq: u32) -> IrqLine {
        IrqLine {
            irq,
            controller: Arc::clone(self),
        }
    }
}

/// Peripheral-side handle for one interrupt line.
#[derive(Clone)]
pub struct IrqLine {
    irq: u32,
    controller: Arc<IrqController>,
}

impl IrqLine {
    pub fn irq(&self) -> u32 {
        self.irq
    }

    pub fn raise(&self) {
        self.controller.raise(self.irq);
    }
}
