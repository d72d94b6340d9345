use std::sync::{Mutex, mpsc};
use std::thread;
use std::time::Duration;

use thiserror::Error;

pub const SERVICE_NAME: &str = "asana-cli";
pub const ACCOUNT_NAME: &str = "user";
pub const TOKEN_ENV: &str = "ASANA_TOKEN";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

const MIN_TOKEN_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("no token found")]
    NoToken,
    #[error("timeout while trying to {operation} secret in keyring")]
    Timeout { operation: &'static str },
    #[error("keyring error: {0}")]
    Backend(String),
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Holds the single bearer token used for every API call.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<String, CredentialError>;
    fn set(&self, token: &str) -> Result<(), CredentialError>;
    fn delete(&self) -> Result<(), CredentialError>;
}

/// Token stored in the OS keychain. Each call runs on a helper thread so a hung
/// keychain daemon surfaces as `CredentialError::Timeout` instead of hanging the CLI.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    account: String,
    timeout: Duration,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME, ACCOUNT_NAME)
    }
}

impl KeyringStore {
    pub fn new(service: &str, account: &str) -> Self {
        Self {
            service: service.to_string(),
            account: account.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run<T, F>(&self, operation: &'static str, op: F) -> Result<T, CredentialError>
    where
        T: Send + 'static,
        F: FnOnce(keyring::Entry) -> Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service.clone();
        let account = self.account.clone();
        let work = move || {
            let entry = keyring::Entry::new(&service, &account).map_err(map_keyring_error)?;
            op(entry).map_err(map_keyring_error)
        };
        with_timeout(operation, self.timeout, work)
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self) -> Result<String, CredentialError> {
        self.run("get", |entry| entry.get_password())
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        let token = validate_token_shape(token)?;
        self.run("set", move |entry| entry.set_password(&token))?;
        tracing::debug!(service = %self.service, "token stored in keyring");
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        self.run("delete", |entry| entry.delete_credential())?;
        tracing::debug!(service = %self.service, "token removed from keyring");
        Ok(())
    }
}

fn map_keyring_error(err: keyring::Error) -> CredentialError {
    match err {
        keyring::Error::NoEntry => CredentialError::NoToken,
        other => CredentialError::Backend(other.to_string()),
    }
}

/// Runs `work` on a helper thread and gives up after `timeout`. The worker is detached on
/// timeout; it only holds its own copies of the inputs.
pub fn with_timeout<T, F>(
    operation: &'static str,
    timeout: Duration,
    work: F,
) -> Result<T, CredentialError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("keyring-{operation}"))
        .spawn(move || {
            let _ = tx.send(work());
        })
        .map_err(|err| CredentialError::Backend(format!("failed to spawn keyring worker: {err}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(operation, "keyring call timed out");
            Err(CredentialError::Timeout { operation })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(CredentialError::Backend(
            "keyring worker exited without a result".to_string(),
        )),
    }
}

/// Lets a token from the environment (`ASANA_TOKEN`) take precedence over the wrapped store.
/// Writes always go to the wrapped store.
#[derive(Debug)]
pub struct EnvOverride<S> {
    inner: S,
    value: Option<String>,
}

impl<S: CredentialStore> EnvOverride<S> {
    pub fn from_env(inner: S) -> Self {
        Self::new(inner, std::env::var(TOKEN_ENV).ok())
    }

    pub fn new(inner: S, value: Option<String>) -> Self {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Self { inner, value }
    }

    pub fn is_overridden(&self) -> bool {
        self.value.is_some()
    }
}

impl<S: CredentialStore> CredentialStore for EnvOverride<S> {
    fn get(&self) -> Result<String, CredentialError> {
        match &self.value {
            Some(token) => Ok(token.clone()),
            None => self.inner.get(),
        }
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        self.inner.set(token)
    }

    fn delete(&self) -> Result<(), CredentialError> {
        self.inner.delete()
    }
}

/// Process-local store, used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Result<String, CredentialError> {
        let guard = self
            .token
            .lock()
            .map_err(|_| CredentialError::Backend("memory store poisoned".to_string()))?;
        guard.clone().ok_or(CredentialError::NoToken)
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        let token = validate_token_shape(token)?;
        let mut guard = self
            .token
            .lock()
            .map_err(|_| CredentialError::Backend("memory store poisoned".to_string()))?;
        *guard = Some(token);
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| CredentialError::Backend("memory store poisoned".to_string()))?;
        guard.take().map(|_| ()).ok_or(CredentialError::NoToken)
    }
}

/// Trims the token and rejects values that cannot be a personal access token.
pub fn validate_token_shape(token: &str) -> Result<String, CredentialError> {
    let trimmed = token.trim();
    if trimmed.len() < MIN_TOKEN_LEN {
        return Err(CredentialError::InvalidToken(
            "the token is not long enough".to_string(),
        ));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(CredentialError::InvalidToken(
            "the token must not contain whitespace".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
