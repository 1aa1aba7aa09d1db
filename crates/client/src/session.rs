use std::sync::{Arc, RwLock};

use crate::{error::Result, token_store::TokenStore};

/// Process-wide bearer token shared by every request of a [`Client`].
///
/// Clones share the same token. When a [`TokenStore`] is attached, `set` and
/// `clear` also update the persisted copy.
///
/// [`Client`]: crate::Client
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Option<TokenStore>,
}

impl Session {
    /// In-memory session, nothing persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session backed by `store`, primed with the token saved there.
    pub fn restore(store: TokenStore) -> Result<Self> {
        let token = store.load()?;
        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            store: Some(store),
        })
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persists first; a token that could not be saved is not adopted.
    pub fn set(&self, token: &str) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(token)?;
        }
        self.replace(Some(token.to_string()));
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.replace(None);
        if let Some(store) = &self.store {
            store.clear()?;
        }
        Ok(())
    }

    fn replace(&self, value: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_token() {
        let session = Session::new();
        let other = session.clone();
        session.set("tok").unwrap();
        assert_eq!(other.token().as_deref(), Some("tok"));

        other.clear().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn restore_reads_and_clear_removes_persisted_token() {
        let path = std::env::temp_dir()
            .join("carbonboard_tests")
            .join(format!("session_{}.json", std::process::id()));
        let store = TokenStore::new(&path);
        store.save("persisted").unwrap();

        let session = Session::restore(store.clone()).unwrap();
        assert_eq!(session.token().as_deref(), Some("persisted"));

        session.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn failed_save_keeps_the_previous_token() {
        let dir = std::env::temp_dir().join("carbonboard_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join(format!("not_a_dir_{}", std::process::id()));
        std::fs::write(&blocker, b"").unwrap();

        let session = Session {
            token: Arc::default(),
            store: Some(TokenStore::new(blocker.join("session.json"))),
        };
        assert!(session.set("tok").is_err());
        assert!(!session.is_authenticated());

        std::fs::remove_file(&blocker).unwrap();
    }
}
