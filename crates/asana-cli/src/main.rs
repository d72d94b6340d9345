use std::env;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use asana_cli::context::BASE_URL_ENV;
use asana_cli::{Cli, Context, DialoguerPrompter, EXIT_CANCELLED, commands, exit_code};
use asana_common::{ConfigStore, logging};
use asana_secrets::{CredentialStore, EnvOverride, KeyringStore};
use clap::Parser;
use colored::Colorize;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = ConfigStore::open_default();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config
            .load_or_default()
            .map(|config| config.log_level)
            .unwrap_or_else(|_| "warn".to_string())
    };
    logging::init(&level);
    tracing::debug!(config = %config.path().display(), "starting");

    let credentials: Arc<dyn CredentialStore> =
        Arc::new(EnvOverride::from_env(KeyringStore::default()));
    let ctx = Context::new(config, credentials, Box::new(DialoguerPrompter::new()))
        .with_base_url(env::var(BASE_URL_ENV).ok());

    let mut stdout = io::stdout().lock();
    match commands::run(&ctx, cli.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            if code == EXIT_CANCELLED {
                eprintln!();
            } else {
                eprintln!("{} {err:#}", "Error:".red().bold());
            }
            ExitCode::from(code)
        }
    }
}
