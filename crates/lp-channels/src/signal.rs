//! Signal gates.
//!
//! A gate marks "the channel is the originator of this update". While at
//! least one [`SignalBlock`] is alive, events posted through the gated port
//! are dropped and change notifications guarded by the gate are withheld.
//! Blocks release on drop, so early returns and `?` cannot leave a gate
//! closed.

use std::cell::Cell;
use std::rc::Rc;

/// Shared, nestable suppression flag.
#[derive(Debug, Clone, Default)]
pub struct SignalGate {
    depth: Rc<Cell<u32>>,
}

impl SignalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate until the returned block is dropped.
    pub fn block(&self) -> SignalBlock {
        self.depth.set(self.depth.get() + 1);
        SignalBlock {
            depth: Rc::clone(&self.depth),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Scope guard returned by [`SignalGate::block`].
#[derive(Debug)]
#[must_use = "the gate reopens as soon as the block is dropped"]
pub struct SignalBlock {
    depth: Rc<Cell<u32>>,
}

impl Drop for SignalBlock {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
