use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{SessionError, SessionKey, SessionStore};

/// Non-persistent store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: Arc<RwLock<HashMap<SessionKey, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, SessionError> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionError> {
        self.values.write().await.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> Result<(), SessionError> {
        self.values.write().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let a = MemorySessionStore::new();
        let b = a.clone();
        a.set(SessionKey::Username, "Ana").await.unwrap();
        assert_eq!(
            b.get(SessionKey::Username).await.unwrap().as_deref(),
            Some("Ana")
        );
        b.remove(SessionKey::Username).await.unwrap();
        assert_eq!(a.get(SessionKey::Username).await.unwrap(), None);
    }
}
