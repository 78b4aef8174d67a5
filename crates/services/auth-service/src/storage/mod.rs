//! Where issued sessions are kept between requests.

mod memory;
mod redis_store;

pub use self::memory::MemorySessionStorage;
pub use self::redis_store::RedisSessionStorage;

use async_trait::async_trait;

use common::AppResult;
use domain::{EntityId, Session};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Key prefix for persisted sessions
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Session persistence keyed by opaque session token.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn save(&self, token: &str, session: &Session) -> AppResult<()>;

    async fn load(&self, token: &str) -> AppResult<Option<Session>>;

    /// Removing an unknown token is not an error
    async fn remove(&self, token: &str) -> AppResult<()>;

    /// Tokens of every stored session belonging to `user`
    async fn tokens_of(&self, user: &EntityId) -> AppResult<Vec<String>>;

    /// Release whatever does not outlive the process.
    async fn teardown(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn session_key(token: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, token)
}
