use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::info;

use common::{AppError, AppResult};
use domain::{EntityId, Session};

use super::{session_key, SessionStorage, SESSION_KEY_PREFIX};

/// Sessions persisted in Redis as JSON, without expiry, so they survive
/// gateway restarts.
#[derive(Clone)]
pub struct RedisSessionStorage {
    connection: ConnectionManager,
}

impl RedisSessionStorage {
    pub async fn connect(url: &str) -> AppResult<Self> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        info!("Redis session storage connected");
        Ok(Self { connection })
    }
}

#[async_trait]
impl SessionStorage for RedisSessionStorage {
    async fn save(&self, token: &str, session: &Session) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(session)?;
        conn.set::<_, _, ()>(session_key(token), json).await?;
        Ok(())
    }

    async fn load(&self, token: &str) -> AppResult<Option<Session>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(session_key(token)).await?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Stored session is unreadable: {}", e))
                })
            })
            .transpose()
    }

    async fn remove(&self, token: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(session_key(token)).await?;
        Ok(())
    }

    async fn tokens_of(&self, user: &EntityId) -> AppResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = conn.keys(format!("{}*", SESSION_KEY_PREFIX)).await?;

        let mut tokens = Vec::new();
        for key in keys {
            let value: Option<String> = conn.get(&key).await?;
            let owner = value
                .and_then(|json| serde_json::from_str::<Session>(&json).ok())
                .map(|session| session.id);
            if owner.as_ref() == Some(user) {
                if let Some(token) = key.strip_prefix(SESSION_KEY_PREFIX) {
                    tokens.push(token.to_string());
                }
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_format() {
        assert_eq!(session_key("abc"), "session:abc");
    }
}
