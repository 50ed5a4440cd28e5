use std::sync::Mutex;

use async_trait::async_trait;
use gofinances::gofinances_config::Config;
use gofinances::gofinances_core::{CoreError, IdentityOutcome, IdentityProvider};
use gofinances::gofinances_domain::IdentityProfile;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Settings rooted in a fresh temporary data directory.
pub fn temp_config() -> Config {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    Config {
        data_dir: Some(base),
        ..Config::default()
    }
}

/// Identity provider that always answers with the same outcome.
pub struct StubProvider(pub IdentityOutcome);

impl StubProvider {
    pub fn user(id: &str) -> Self {
        Self(IdentityOutcome::Authenticated(IdentityProfile {
            id: id.into(),
            name: "Ana Souza".into(),
            email: format!("{id}@example.com"),
            picture: Some("https://example.com/ana.png".into()),
        }))
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    async fn authenticate(&self) -> Result<IdentityOutcome, CoreError> {
        Ok(self.0.clone())
    }
}
