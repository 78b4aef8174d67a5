//! Locks shared by services that write the same remote collection.

use std::sync::Arc;

use tokio::sync::Mutex;

/// Held from the duplicate-email lookup until the user write returns.
///
/// The remote collection has no unique index, so every service that creates
/// or renames users in one process must share the same instance.
#[derive(Clone, Default)]
pub struct EmailLock(Arc<Mutex<()>>);

impl EmailLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
