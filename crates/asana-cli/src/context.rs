use std::sync::Arc;

use anyhow::{Context as _, Result};
use asana_api::{Client, DEFAULT_BASE_URL, TokenProvider};
use asana_common::{AsanaConfig, ConfigStore, DefaultWorkspace};
use asana_secrets::{CredentialError, CredentialStore};
use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::prompter::Prompter;

pub const BASE_URL_ENV: &str = "ASANA_BASE_URL";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("you are not logged in; run `asana auth login` to authenticate")]
    NotAuthenticated,
    #[error("no default workspace set; run `asana config set default-workspace` to choose one")]
    NoDefaultWorkspace,
    #[error("{0}")]
    InvalidArgument(String),
}

/// Everything a command needs, built once in `main` and passed down by reference.
pub struct Context {
    config: ConfigStore,
    credentials: Arc<dyn CredentialStore>,
    prompter: Box<dyn Prompter>,
    base_url: Option<String>,
    today: NaiveDate,
}

impl Context {
    pub fn new(
        config: ConfigStore,
        credentials: Arc<dyn CredentialStore>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            config,
            credentials,
            prompter,
            base_url: None,
            today: Local::now().date_naive(),
        }
    }

    /// Takes precedence over the configured base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.filter(|url| !url.trim().is_empty());
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    pub fn config(&self) -> Result<AsanaConfig> {
        self.config.load().context("failed to load config")
    }

    /// Returns the stored token, or `CliError::NotAuthenticated` when there is none.
    pub fn require_token(&self) -> Result<String> {
        match self.credentials.get() {
            Ok(token) => Ok(token),
            Err(CredentialError::NoToken) => Err(CliError::NotAuthenticated.into()),
            Err(err) => Err(anyhow::Error::new(err).context("failed to read stored token")),
        }
    }

    pub fn default_workspace(&self) -> Result<DefaultWorkspace> {
        match self.config.load() {
            Ok(config) => config
                .workspace
                .ok_or_else(|| CliError::NoDefaultWorkspace.into()),
            Err(err) if err.is_not_found() => Err(CliError::NoDefaultWorkspace.into()),
            Err(err) => Err(anyhow::Error::new(err).context("failed to load config")),
        }
    }

    pub fn base_url(&self) -> Result<String> {
        if let Some(url) = &self.base_url {
            return Ok(url.clone());
        }
        let config = self
            .config
            .load_or_default()
            .context("failed to load config")?;
        Ok(config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
    }

    /// API client that re-reads the credential store on every request.
    pub fn client(&self) -> Result<Client> {
        let base_url = self.base_url()?;
        let tokens = StoredToken {
            credentials: Arc::clone(&self.credentials),
        };
        Client::new(&base_url, tokens).context("failed to initialize Asana client")
    }

    /// Client for a token that is not stored yet, used to verify it during login.
    pub fn client_with_token(&self, token: &str) -> Result<Client> {
        let base_url = self.base_url()?;
        Client::new(&base_url, asana_api::StaticToken::new(token))
            .context("failed to initialize Asana client")
    }
}

struct StoredToken {
    credentials: Arc<dyn CredentialStore>,
}

impl TokenProvider for StoredToken {
    fn bearer_token(&self) -> Result<Option<String>> {
        match self.credentials.get() {
            Ok(token) => Ok(Some(token)),
            Err(CredentialError::NoToken) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
