//! Auth Service Library
//!
//! This crate provides the Session Store: registration, login and logout
//! against the remote `users` collection, and the storage that keeps issued
//! sessions (in memory or in Redis).

pub mod service;
pub mod storage;

use std::sync::Arc;

use tracing::warn;

use common::{AppResult, SessionConfig};

pub use crate::service::{IssuedSession, Registration, SessionService, SessionStore};
pub use crate::storage::{MemorySessionStorage, RedisSessionStorage, SessionStorage};

#[cfg(any(test, feature = "test-utils"))]
pub use crate::service::MockSessionService;

/// Connect the configured session storage.
///
/// Falls back to memory when no Redis URL is configured; sessions then do not
/// survive a restart.
pub async fn connect_storage(config: &SessionConfig) -> AppResult<Arc<dyn SessionStorage>> {
    match &config.redis_url {
        Some(url) => {
            let storage = RedisSessionStorage::connect(url).await?;
            Ok(Arc::new(storage))
        }
        None => {
            warn!("REDIS_URL not set; sessions are kept in memory");
            Ok(Arc::new(MemorySessionStorage::new()))
        }
    }
}
