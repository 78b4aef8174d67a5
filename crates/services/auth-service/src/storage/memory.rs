use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use common::AppResult;
use domain::{EntityId, Session};

use super::SessionStorage;

/// Process-local sessions. Everything is dropped on teardown or restart.
#[derive(Default)]
pub struct MemorySessionStorage {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn save(&self, token: &str, session: &Session) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .insert(token.to_string(), session.clone());
        Ok(())
    }

    async fn load(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> AppResult<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn tokens_of(&self, user: &EntityId) -> AppResult<Vec<String>> {
        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .filter(|(_, session)| &session.id == user)
            .map(|(token, _)| token.clone())
            .collect())
    }

    async fn teardown(&self) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        debug!("Dropping {} in-memory sessions", sessions.len());
        sessions.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Role;

    fn session() -> Session {
        Session {
            id: EntityId::from("1"),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::Gerente,
        }
    }

    #[tokio::test]
    async fn test_save_load_remove() {
        let storage = MemorySessionStorage::new();
        storage.save("t1", &session()).await.unwrap();

        assert_eq!(storage.load("t1").await.unwrap(), Some(session()));
        assert_eq!(storage.load("t2").await.unwrap(), None);

        storage.remove("t1").await.unwrap();
        storage.remove("t1").await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_tokens_of_filters_by_user() {
        let storage = MemorySessionStorage::new();
        let mut other = session();
        other.id = EntityId::from("2");
        storage.save("a", &session()).await.unwrap();
        storage.save("b", &other).await.unwrap();
        storage.save("c", &session()).await.unwrap();

        let mut tokens = storage.tokens_of(&EntityId::from("1")).await.unwrap();
        tokens.sort();
        assert_eq!(tokens, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_teardown_clears() {
        let storage = MemorySessionStorage::new();
        storage.save("a", &session()).await.unwrap();
        storage.save("b", &session()).await.unwrap();
        assert_eq!(storage.len().await, 2);

        storage.teardown().await.unwrap();
        assert!(storage.is_empty().await);
    }
}
