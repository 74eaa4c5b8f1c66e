//! Per-invocation state shared by every command

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context as _};

use super::output::OutputFormat;
use crate::client::transport::ReqwestTransport;
use crate::client::ApiClient;
use crate::config::Config;
use crate::services::nurses;
use crate::session::{FileSessionStore, NurseSession};

pub type CliClient = ApiClient<ReqwestTransport, FileSessionStore>;

pub struct Context {
    pub client: CliClient,
    pub format: OutputFormat,
    pub yes: bool,
}

impl Context {
    pub fn new(config: &Config, format: OutputFormat, yes: bool) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.api.timeout_secs))?;
        let store = FileSessionStore::new(config.session.path());
        tracing::debug!(
            api = %config.api.base_url,
            session = %store.path().display(),
            "CLI context ready"
        );
        Ok(Self {
            client: ApiClient::new(config.api.base_url.clone(), transport, store),
            format,
            yes,
        })
    }

    pub fn require_login(&self) -> anyhow::Result<()> {
        if !self.client.session().is_authenticated() {
            bail!("Not logged in. Run `ahana login --email <email>` first.");
        }
        Ok(())
    }

    /// The signed-in nurse with their school
    pub async fn nurse(&self) -> anyhow::Result<NurseSession> {
        self.require_login()?;
        nurses::current_session(&self.client)
            .await?
            .context("No nurse profile is linked to this login")
    }

    /// Ask a yes/no question on stderr; `--yes` answers for the user
    pub fn confirm(&self, prompt: &str) -> anyhow::Result<bool> {
        if self.yes {
            return Ok(true);
        }
        eprint!("{} [y/N] ", prompt);
        std::io::stderr().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    /// Read one line from stdin after a prompt
    pub fn prompt(&self, prompt: &str) -> anyhow::Result<String> {
        eprint!("{}: ", prompt);
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
