//! Password-reset wizard
//!
//! Three steps: request a temporary password by email, verify it by logging
//! in with it, then set a new password using the token that login returned.
//! First-login users skip straight to the last step with the token from their
//! login. The wizard is plain state; pages and the CLI drive it and render
//! `error` / `success`.

use tracing::{debug, info};

use crate::client::{ApiClient, Transport};
use crate::error::{ClientError, ClientResult};
use crate::services::auth;
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Request,
    Verify,
    SetPassword,
}

impl WizardStep {
    /// 1-based position shown in the step indicator
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Request => 1,
            WizardStep::Verify => 2,
            WizardStep::SetPassword => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Request => "Request Temporary Password",
            WizardStep::Verify => "Verify Temporary Password",
            WizardStep::SetPassword => "Set New Password",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetWizard {
    pub step: WizardStep,
    pub email: String,
    pub temp_password: String,
    pub new_password: String,
    pub confirm_password: String,
    token: Option<String>,
    /// Step 1 is waiting on the "send temporary password?" confirmation
    pub confirm_pending: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    /// New password stored; the caller should return to the login page
    pub completed: bool,
}

impl Default for ResetWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Request,
            email: String::new(),
            temp_password: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
            token: None,
            confirm_pending: false,
            error: None,
            success: None,
            completed: false,
        }
    }

    /// Enter at the last step with the token a forced-reset login returned
    pub fn from_login<S: SessionStore>(
        session: &Session<S>,
        email: &str,
        token: &str,
    ) -> ClientResult<Self> {
        session.set_temp_access_token(token)?;
        Ok(Self {
            step: WizardStep::SetPassword,
            email: email.to_string(),
            token: Some(token.to_string()),
            ..Self::new()
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        self.error = Some(error.message());
        self.success = None;
        error
    }

    /// Step 1 submit: check the email and ask for confirmation
    pub fn submit_request(&mut self) -> ClientResult<()> {
        self.error = None;
        if self.email.trim().is_empty() {
            return Err(self.fail(ClientError::invalid("email", "Email is required")));
        }
        self.confirm_pending = true;
        Ok(())
    }

    pub fn cancel_request(&mut self) {
        self.confirm_pending = false;
    }

    /// Send the temporary password; also used to resend from step 2
    pub async fn confirm_request<T: Transport, S: SessionStore>(
        &mut self,
        client: &ApiClient<T, S>,
    ) -> ClientResult<()> {
        self.confirm_pending = false;
        self.error = None;
        self.success = None;

        match auth::request_temp_password(client, &self.email).await {
            Ok(message) => {
                client.session().begin_temp_flow()?;
                self.step = WizardStep::Verify;
                self.success = Some(
                    message.unwrap_or_else(|| {
                        "Temporary password has been sent to your email".to_string()
                    }),
                );
                info!(email = %self.email, "Temporary password requested");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Step 2: log in with the temporary password and keep the token
    pub async fn verify<T: Transport, S: SessionStore>(
        &mut self,
        client: &ApiClient<T, S>,
    ) -> ClientResult<()> {
        self.error = None;
        if self.temp_password.is_empty() {
            return Err(self.fail(ClientError::invalid(
                "tempPassword",
                "Temporary password is required",
            )));
        }

        match auth::verify_temp_password(client, &self.email, &self.temp_password).await {
            Ok(token) => {
                self.token = Some(token);
                self.step = WizardStep::SetPassword;
                self.success = Some(
                    "Temporary password verified successfully. Please set your new password."
                        .to_string(),
                );
                Ok(())
            }
            Err(e) => {
                self.token = None;
                Err(self.fail(e))
            }
        }
    }

    /// Step 3 checks, in order; returns the token to use
    pub fn check_new_password<S: SessionStore>(&self, session: &Session<S>) -> ClientResult<String> {
        if self.new_password.is_empty() || self.confirm_password.is_empty() {
            return Err(ClientError::invalid("newPassword", "All fields are required"));
        }
        if self.new_password != self.confirm_password {
            return Err(ClientError::invalid("confirmPassword", "Passwords do not match"));
        }
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| session.temp_access_token())
            .ok_or(ClientError::MissingToken)
    }

    /// Step 3: store the new password
    pub async fn set_password<T: Transport, S: SessionStore>(
        &mut self,
        client: &ApiClient<T, S>,
    ) -> ClientResult<()> {
        self.error = None;
        let token = match self.check_new_password(client.session()) {
            Ok(token) => token,
            Err(e) => return Err(self.fail(e)),
        };

        match auth::reset_password(client, &self.new_password, &token).await {
            Ok(_) => {
                client.session().clear_temp_flow()?;
                self.token = None;
                self.completed = true;
                self.success = Some(
                    "Password reset successful! Please login with your new password.".to_string(),
                );
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Take the request outcome from `finished`, a copy that ran one of the
    /// async steps, while keeping whatever was typed here in the meantime
    pub fn absorb_outcome(&mut self, finished: ResetWizard) {
        self.step = finished.step;
        self.token = finished.token;
        self.confirm_pending = finished.confirm_pending;
        self.error = finished.error;
        self.success = finished.success;
        self.completed = finished.completed;
    }

    /// Forget the wizard's scratch keys when navigating away
    pub fn leave<S: SessionStore>(&self, session: &Session<S>) -> ClientResult<()> {
        debug!(step = self.step.number(), "Leaving reset wizard");
        session.clear_temp_flow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::session::{keys, MemorySessionStore};
    use serde_json::json;

    fn client() -> ApiClient<MockTransport, MemorySessionStore> {
        ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new())
    }

    fn ok(message: &str) -> serde_json::Value {
        json!({"status": "success", "message": message})
    }

    #[test]
    fn test_request_requires_email() {
        let mut wizard = ResetWizard::new();
        assert!(wizard.submit_request().is_err());
        assert_eq!(wizard.error.as_deref(), Some("Email is required"));
        assert!(!wizard.confirm_pending);

        wizard.email = "nurse@school.in".into();
        wizard.submit_request().unwrap();
        assert!(wizard.confirm_pending);
        assert!(wizard.error.is_none());
    }

    #[tokio::test]
    async fn test_resubmitting_step_one_resends() {
        let client = client();
        client.transport().respond(200, ok("Sent"));
        client.transport().respond(200, ok("Sent again"));

        let mut wizard = ResetWizard::new();
        wizard.email = "nurse@school.in".into();
        wizard.submit_request().unwrap();
        wizard.confirm_request(&client).await.unwrap();
        assert_eq!(wizard.step, WizardStep::Verify);
        assert_eq!(client.session().store().get(keys::TEMP_AUTH_FLOW).as_deref(), Some("true"));

        wizard.confirm_request(&client).await.unwrap();
        assert_eq!(wizard.success.as_deref(), Some("Sent again"));
        assert_eq!(client.transport().request_count(), 2);
    }

    #[tokio::test]
    async fn test_verify_keeps_token() {
        let client = client();
        client.transport().respond(
            200,
            json!({"status": "success", "data": {
                "user": {"id": "u1", "email": "n@s.in", "passwordResetRequired": true},
                "tokens": {"accessToken": "tmp-tok", "refreshToken": "r"}
            }}),
        );

        let mut wizard = ResetWizard::new();
        wizard.step = WizardStep::Verify;
        wizard.email = "n@s.in".into();
        wizard.temp_password = "Tmp#123".into();
        wizard.verify(&client).await.unwrap();

        assert_eq!(wizard.step, WizardStep::SetPassword);
        assert!(wizard.has_token());
        assert_eq!(client.session().temp_access_token().as_deref(), Some("tmp-tok"));
    }

    #[tokio::test]
    async fn test_verify_failure_discards_token() {
        let client = client();
        client.session().set_temp_access_token("stale").unwrap();
        client
            .transport()
            .respond(401, json!({"status": "error", "message": "Invalid temporary password"}));

        let mut wizard = ResetWizard::new();
        wizard.step = WizardStep::Verify;
        wizard.email = "n@s.in".into();
        wizard.temp_password = "wrong".into();
        assert!(wizard.verify(&client).await.is_err());

        assert_eq!(wizard.step, WizardStep::Verify);
        assert!(!wizard.has_token());
        assert!(client.session().temp_access_token().is_none());
        assert_eq!(wizard.error.as_deref(), Some("Invalid temporary password"));
    }

    #[test]
    fn test_set_password_checks() {
        let session = Session::new(MemorySessionStore::new());
        let mut wizard = ResetWizard::new();
        wizard.step = WizardStep::SetPassword;

        wizard.new_password = "abc".into();
        assert_eq!(
            wizard.check_new_password(&session).unwrap_err().message(),
            "All fields are required"
        );

        wizard.confirm_password = "abd".into();
        assert_eq!(
            wizard.check_new_password(&session).unwrap_err().message(),
            "Passwords do not match"
        );

        wizard.confirm_password = "abc".into();
        assert_eq!(
            wizard.check_new_password(&session).unwrap_err().message(),
            "No authentication token found. Please try again."
        );

        session.set_temp_access_token("stored").unwrap();
        assert_eq!(wizard.check_new_password(&session).unwrap(), "stored");
    }

    #[tokio::test]
    async fn test_from_login_completes() {
        let client = client();
        client.transport().respond(200, ok("Password updated"));

        let mut wizard = ResetWizard::from_login(client.session(), "n@s.in", "login-tok").unwrap();
        assert_eq!(wizard.step.number(), 3);

        wizard.new_password = "Str0ng!pass".into();
        wizard.confirm_password = "Str0ng!pass".into();
        wizard.set_password(&client).await.unwrap();

        assert!(wizard.completed);
        assert_eq!(client.transport().requests()[0].bearer.as_deref(), Some("login-tok"));
        assert!(client.session().temp_access_token().is_none());
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_outcome_keeps_input_typed_during_request() {
        let client = client();
        client.transport().respond(
            200,
            json!({"status": "success", "data": {
                "user": {"id": "u1", "email": "nurse@school.in", "passwordResetRequired": true},
                "tokens": {"accessToken": "tok-9", "refreshToken": "r"}
            }}),
        );

        let mut live = ResetWizard::new();
        live.step = WizardStep::Verify;
        live.email = "nurse@school.in".into();
        live.temp_password = "temp-1".into();

        let mut in_flight = live.clone();
        live.new_password = "typed-while-waiting".into();
        in_flight.verify(&client).await.unwrap();
        live.absorb_outcome(in_flight);

        assert_eq!(live.step, WizardStep::SetPassword);
        assert!(live.has_token());
        assert_eq!(live.new_password, "typed-while-waiting");
        assert!(live.success.is_some());
    }
}
