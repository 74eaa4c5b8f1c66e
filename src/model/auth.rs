//! Authentication payloads

use serde::{Deserialize, Serialize};

/// Login form body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The authenticated user as stored under the `user` session key
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub is_first_login: bool,
    #[serde(default)]
    pub password_reset_required: bool,
}

impl AuthUser {
    /// First login or an admin-forced reset both route to the wizard
    pub fn needs_password_reset(&self) -> bool {
        self.is_first_login || self.password_reset_required
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// `data` of a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginData {
    pub user: AuthUser,
    pub tokens: AuthTokens,
}
