//! Login, logout and the password-reset calls

use serde_json::json;
use tracing::{info, warn};

use crate::client::{ApiClient, ApiRequest, Transport};
use crate::error::{ClientError, ClientResult};
use crate::model::{AuthUser, Credentials, LoginData};
use crate::session::SessionStore;

/// Where a successful login leads
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Session flag set; go to the dashboard
    Authenticated(AuthUser),
    /// First login or forced reset; go to the wizard's last step with this token
    PasswordResetRequired { user: AuthUser, token: String },
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }
}

/// `POST /auth/login`, persisting tokens and user on success
pub async fn login<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    credentials: &Credentials,
) -> ClientResult<LoginOutcome> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ClientError::invalid("email", "Email and password are required"));
    }

    let data: LoginData = client.post("/auth/login", credentials).await?;
    let authenticated = client.session().store_login(&data)?;

    if authenticated {
        info!(user = %data.user.email, "Logged in");
        Ok(LoginOutcome::Authenticated(data.user))
    } else {
        info!(user = %data.user.email, "Login requires password reset");
        Ok(LoginOutcome::PasswordResetRequired {
            user: data.user,
            token: data.tokens.access_token,
        })
    }
}

/// `POST /auth/forgot-password`: email a temporary password
pub async fn request_temp_password<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    email: &str,
) -> ClientResult<Option<String>> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ClientError::invalid("email", "Email is required"));
    }
    let request = ApiRequest::post("/auth/forgot-password").json(&json!({ "email": email }))?;
    client.execute_ack(request).await
}

/// Log in with the emailed temporary password and keep the returned token
pub async fn verify_temp_password<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    email: &str,
    temp_password: &str,
) -> ClientResult<String> {
    let credentials = Credentials {
        email: email.trim().to_string(),
        password: temp_password.to_string(),
    };

    let token = match login(client, &credentials).await {
        Ok(LoginOutcome::Authenticated(_)) => client.session().access_token(),
        Ok(LoginOutcome::PasswordResetRequired { token, .. }) => Some(token),
        Err(e) => {
            client.session().remove_temp_access_token()?;
            return Err(e);
        }
    };

    let token = token.filter(|t| !t.is_empty()).ok_or(ClientError::MissingToken)?;
    client.session().set_temp_access_token(&token)?;
    Ok(token)
}

/// `POST /auth/reset-password` with `token` as the bearer
///
/// Success signs the user out so they log in with the new password; failure
/// drops the temporary token.
pub async fn reset_password<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    password: &str,
    token: &str,
) -> ClientResult<Option<String>> {
    if token.is_empty() {
        return Err(ClientError::MissingToken);
    }

    let session = client.session();
    session.set_access_token(token)?;

    let request = ApiRequest::post("/auth/reset-password")
        .bearer(token)
        .json(&json!({ "password": password }))?;

    match client.execute_ack(request).await {
        Ok(message) => {
            session.logout()?;
            info!("Password reset complete");
            Ok(message)
        }
        Err(e) => {
            warn!("Password reset failed: {}", e);
            session.remove_access_token()?;
            Err(e)
        }
    }
}

/// Sign out locally; the backend keeps no session to end
pub fn logout<T: Transport, S: SessionStore>(client: &ApiClient<T, S>) -> ClientResult<()> {
    client.session().logout()?;
    info!("Logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::session::{keys, MemorySessionStore};
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (ApiClient<MockTransport, Arc<MemorySessionStore>>, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (
            ApiClient::new("https://backend.test", MockTransport::new(), store.clone()),
            store,
        )
    }

    fn login_body(first_login: bool) -> serde_json::Value {
        json!({
            "status": "success",
            "data": {
                "user": {
                    "id": "u1",
                    "userId": "usr-1",
                    "email": "nurse@school.in",
                    "isFirstLogin": first_login,
                    "passwordResetRequired": false
                },
                "tokens": {"accessToken": "acc-1", "refreshToken": "ref-1"}
            }
        })
    }

    fn creds() -> Credentials {
        Credentials {
            email: "nurse@school.in".into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_login_authenticated() {
        let (client, store) = client();
        client.transport().respond(200, login_body(false));

        let outcome = login(&client, &creds()).await.unwrap();
        assert!(outcome.is_authenticated());
        assert_eq!(store.get(keys::IS_AUTHENTICATED).as_deref(), Some("true"));
        assert_eq!(store.get(keys::ACCESS_TOKEN).as_deref(), Some("acc-1"));
    }

    #[tokio::test]
    async fn test_first_login_routes_to_reset() {
        let (client, store) = client();
        client.transport().respond(200, login_body(true));

        let outcome = login(&client, &creds()).await.unwrap();
        match outcome {
            LoginOutcome::PasswordResetRequired { token, .. } => assert_eq!(token, "acc-1"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.get(keys::IS_AUTHENTICATED).as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_login_failure_message() {
        let (client, store) = client();
        client
            .transport()
            .respond(400, json!({"status": "error", "message": "Invalid credentials"}));

        let err = login(&client, &creds()).await.unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");
        assert!(store.get(keys::ACCESS_TOKEN).is_none());
    }

    #[tokio::test]
    async fn test_reset_success_signs_out() {
        let (client, store) = client();
        store.set(keys::REFRESH_TOKEN, "ref").unwrap();
        client
            .transport()
            .respond(200, json!({"status": "success", "message": "Password updated"}));

        let message = reset_password(&client, "N3w-pass", "temp-tok").await.unwrap();
        assert_eq!(message.as_deref(), Some("Password updated"));

        let sent = client.transport().requests();
        assert_eq!(sent[0].bearer.as_deref(), Some("temp-tok"));
        assert!(store.get(keys::ACCESS_TOKEN).is_none());
        assert!(store.get(keys::REFRESH_TOKEN).is_none());
        assert_eq!(store.get(keys::IS_AUTHENTICATED).as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_reset_failure_drops_token() {
        let (client, store) = client();
        store.set(keys::REFRESH_TOKEN, "ref").unwrap();
        client
            .transport()
            .respond(422, json!({"status": "error", "message": "Password too weak"}));

        let err = reset_password(&client, "x", "temp-tok").await.unwrap_err();
        assert_eq!(err.message(), "Password too weak");
        assert!(store.get(keys::ACCESS_TOKEN).is_none());
        assert_eq!(store.get(keys::REFRESH_TOKEN).as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn test_reset_without_token_sends_nothing() {
        let (client, _) = client();
        let err = reset_password(&client, "x", "").await.unwrap_err();
        assert_eq!(err, ClientError::MissingToken);
        assert_eq!(client.transport().request_count(), 0);
    }
}
