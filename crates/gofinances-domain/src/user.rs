//! Identity types supplied by the external sign-in flow.

use serde::{Deserialize, Serialize};

/// Profile payload returned by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Locally cached signed-in user. `id` namespaces the ledger storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl From<IdentityProfile> for User {
    fn from(profile: IdentityProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            photo: profile.picture,
        }
    }
}
