//! The `asana` command-line client: command tree, interactive prompts and output formatting
//! on top of `asana-api`.

pub mod cli;
pub mod commands;
pub mod context;
pub mod format;
pub mod prompter;
pub mod sorting;

use asana_api::ApiError;
use asana_secrets::CredentialError;

pub use cli::{Cli, Command};
pub use context::{CliError, Context};
pub use prompter::{DialoguerPrompter, PromptError, Prompter};

pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CANCELLED: u8 = 2;
pub const EXIT_AUTH: u8 = 4;

/// Maps a command failure onto the process exit code by walking its cause chain.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(PromptError::Cancelled) = cause.downcast_ref::<PromptError>() {
            return EXIT_CANCELLED;
        }
        if let Some(CliError::NotAuthenticated) = cause.downcast_ref::<CliError>() {
            return EXIT_AUTH;
        }
        if let Some(CredentialError::NoToken) = cause.downcast_ref::<CredentialError>() {
            return EXIT_AUTH;
        }
        if let Some(api) = cause.downcast_ref::<ApiError>()
            && api.is_auth_error()
        {
            return EXIT_AUTH;
        }
    }
    EXIT_ERROR
}

#[cfg(test)]
mod tests {
    use anyhow::Context as _;
    use asana_api::ErrorDetail;

    use super::*;

    #[test]
    fn cancellation_wins_through_context_layers() {
        let err = Err::<(), _>(PromptError::Cancelled)
            .context("failed to select task")
            .expect_err("error");
        assert_eq!(exit_code(&err), EXIT_CANCELLED);
    }

    #[test]
    fn auth_failures_map_to_auth_code() {
        assert_eq!(exit_code(&CliError::NotAuthenticated.into()), EXIT_AUTH);

        let unauthorized = ApiError::Api(ErrorDetail::from_status(401, "req-1"));
        let err = anyhow::Error::new(unauthorized).context("failed to fetch tasks");
        assert_eq!(exit_code(&err), EXIT_AUTH);

        let err = anyhow::Error::new(ApiError::NotAuthenticated);
        assert_eq!(exit_code(&err), EXIT_AUTH);
    }

    #[test]
    fn everything_else_is_a_generic_failure() {
        let server_error = ApiError::Api(ErrorDetail::from_status(500, "req-2"));
        assert_eq!(exit_code(&server_error.into()), EXIT_ERROR);
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), EXIT_ERROR);
    }
}
