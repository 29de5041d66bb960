//! Cancellation backed by Salsa revisions

use std::convert::Infallible;
use ttlgen_scan::Cancellation;

/// Checkpoint that unwinds when another handle starts a new revision
///
/// Salsa cancels by unwinding out of the running query, so a checkpoint never
/// returns an interrupt.
#[derive(Clone, Copy)]
pub struct RevisionGuard<'db>(&'db dyn salsa::Database);

impl<'db> RevisionGuard<'db> {
    pub fn new(db: &'db dyn salsa::Database) -> Self {
        Self(db)
    }
}

impl Cancellation for RevisionGuard<'_> {
    type Interrupt = Infallible;

    fn checkpoint(&self) -> Result<(), Infallible> {
        self.0.unwind_if_revision_cancelled();
        Ok(())
    }
}
