//! Explicit session lifecycle for the signed-in identity.

use async_trait::async_trait;

use gofinances_domain::{IdentityProfile, User};

use crate::{
    storage::{KeyValueStore, StorageKey},
    CoreError,
};

/// Result of one run of the external sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityOutcome {
    Authenticated(IdentityProfile),
    /// The user dismissed the flow; nothing changes.
    Cancelled,
}

/// External identity collaborator (OAuth redirect, platform sign-in, ...).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self) -> Result<IdentityOutcome, CoreError>;
}

/// Holds the signed-in user and caches it under `<namespace>:user`.
#[derive(Debug, Clone)]
pub struct Session {
    key: String,
    user: Option<User>,
}

impl Session {
    pub fn new(namespace: &str) -> Self {
        Self {
            key: StorageKey::user(namespace),
            user: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Restores the cached user. An unreadable cache entry is discarded.
    pub async fn load(&mut self, store: &dyn KeyValueStore) -> Result<Option<&User>, CoreError> {
        self.user = match store.get(&self.key).await? {
            None => None,
            Some(blob) => match serde_json::from_str::<User>(&blob) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(key = %self.key, error = %err, "discarding unreadable session cache");
                    store.remove(&self.key).await?;
                    None
                }
            },
        };
        Ok(self.user.as_ref())
    }

    /// Runs the provider and, on success, caches the resulting user.
    pub async fn sign_in(
        &mut self,
        store: &dyn KeyValueStore,
        provider: &dyn IdentityProvider,
    ) -> Result<Option<&User>, CoreError> {
        match provider.authenticate().await? {
            IdentityOutcome::Authenticated(profile) => {
                self.establish(store, profile).await.map(Some)
            }
            IdentityOutcome::Cancelled => {
                tracing::info!("sign-in cancelled");
                Ok(self.user.as_ref())
            }
        }
    }

    /// Adopts `profile` as the current user and caches it.
    pub async fn establish(
        &mut self,
        store: &dyn KeyValueStore,
        profile: IdentityProfile,
    ) -> Result<&User, CoreError> {
        let user = User::from(profile);
        let blob = serde_json::to_string(&user)?;
        store.set(&self.key, blob).await?;
        tracing::info!(user_id = %user.id, "signed in");
        Ok(self.user.insert(user))
    }

    /// Forgets the current user and drops the cached entry.
    pub async fn sign_out(&mut self, store: &dyn KeyValueStore) -> Result<(), CoreError> {
        store.remove(&self.key).await?;
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    struct StaticProvider(Result<IdentityOutcome, String>);

    #[async_trait]
    impl IdentityProvider for StaticProvider {
        async fn authenticate(&self) -> Result<IdentityOutcome, CoreError> {
            self.0.clone().map_err(CoreError::Identity)
        }
    }

    fn profile() -> IdentityProfile {
        IdentityProfile {
            id: "1234".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            picture: Some("https://example.com/ana.png".into()),
        }
    }

    #[tokio::test]
    async fn sign_in_caches_user_and_load_restores_it() {
        let store = MemoryStore::new();
        let mut session = Session::new("@gofinances");
        let provider = StaticProvider(Ok(IdentityOutcome::Authenticated(profile())));

        let user = session.sign_in(&store, &provider).await.unwrap().cloned();
        assert_eq!(user.as_ref().map(|u| u.photo.as_deref()), Some(Some("https://example.com/ana.png")));

        let mut restored = Session::new("@gofinances");
        let loaded = restored.load(&store).await.unwrap().cloned();
        assert_eq!(loaded, user);
        assert_eq!(restored.user_id(), Some("1234"));
    }

    #[tokio::test]
    async fn cancelled_and_failed_sign_in_leave_session_empty() {
        let store = MemoryStore::new();
        let mut session = Session::new("@gofinances");

        let cancelled = StaticProvider(Ok(IdentityOutcome::Cancelled));
        assert!(session.sign_in(&store, &cancelled).await.unwrap().is_none());

        let failing = StaticProvider(Err("network unreachable".into()));
        let err = session.sign_in(&store, &failing).await.unwrap_err();
        assert!(matches!(err, CoreError::Identity(_)));
        assert!(!session.is_signed_in());
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn sign_out_clears_cache() {
        let store = MemoryStore::new();
        let mut session = Session::new("@gofinances");
        session.establish(&store, profile()).await.unwrap();

        session.sign_out(&store).await.unwrap();
        assert!(session.user().is_none());
        assert!(Session::new("@gofinances").load(&store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreadable_cache_is_discarded() {
        let store = MemoryStore::new();
        store.set("@gofinances:user", "{oops".into()).await.unwrap();
        let mut session = Session::new("@gofinances");
        assert!(session.load(&store).await.unwrap().is_none());
        assert!(store.get("@gofinances:user").await.unwrap().is_none());
    }
}
