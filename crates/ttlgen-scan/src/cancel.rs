//! Cooperative cancellation

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The scan was abandoned because the host invalidated the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scan cancelled")]
pub struct Cancelled;

/// Polled by long-running scans between units of work
pub trait Cancellation {
    /// What a cancelled checkpoint returns
    type Interrupt;

    fn checkpoint(&self) -> Result<(), Self::Interrupt>;
}

/// Never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    type Interrupt = Infallible;

    fn checkpoint(&self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Shared flag, set from any thread
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Cancellation for CancelFlag {
    type Interrupt = Cancelled;

    fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
