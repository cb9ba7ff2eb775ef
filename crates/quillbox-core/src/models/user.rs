use serde::{Deserialize, Serialize};

/// Authenticated caller, as resolved by the authentication layer in front of us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
}

impl UserIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_superuser: false,
        }
    }

    pub fn superuser(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_superuser: true,
        }
    }
}
