use std::io::Write;
use std::thread;

use anyhow::{Context as _, Result, anyhow, bail};
use asana_api::Workspace;
use asana_common::{ConfigError, DefaultWorkspace};
use asana_secrets::{CredentialError, validate_token_shape};
use clap::{Args, Subcommand};
use colored::Colorize;

use super::{read_stdin_token, success_icon, take};
use crate::context::{CliError, Context};

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in with a personal access token and pick a default workspace.
    Login(LoginArgs),
    /// Remove the stored token. The token itself stays valid in Asana.
    Logout,
    /// Show who you are logged in as and the default workspace.
    Status,
    /// Replace the stored personal access token.
    Update,
}

#[derive(Debug, Clone, Default, Args)]
pub struct LoginArgs {
    /// Default workspace, by name or gid.
    #[arg(long, short)]
    pub workspace: Option<String>,
    /// Read the token from standard input instead of prompting.
    #[arg(long)]
    pub with_token: bool,
}

pub fn run(ctx: &Context, command: AuthCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        AuthCommand::Login(args) => {
            let piped = if args.with_token {
                if args.workspace.is_none() {
                    bail!(CliError::InvalidArgument(
                        "--workspace is required together with --with-token".to_string()
                    ));
                }
                Some(read_stdin_token()?)
            } else {
                None
            };
            login(ctx, &args, piped, out)
        }
        AuthCommand::Logout => logout(ctx, out),
        AuthCommand::Status => status(ctx, out),
        AuthCommand::Update => update(ctx, out),
    }
}

/// Verifies the token against the API, saves username and default workspace, then stores
/// the token. Nothing is persisted if any step fails.
pub fn login(
    ctx: &Context,
    args: &LoginArgs,
    piped_token: Option<String>,
    out: &mut dyn Write,
) -> Result<()> {
    if let Ok(token) = ctx.credentials().get()
        && !token.is_empty()
    {
        writeln!(out, "You are already logged in.")?;
        return Ok(());
    }

    let interactive = piped_token.as_deref().is_none_or(str::is_empty);
    let raw = match piped_token.filter(|token| !token.is_empty()) {
        Some(token) => token,
        None => {
            writeln!(
                out,
                "Tip: you can generate a personal access token at https://app.asana.com/0/my-apps"
            )?;
            ctx.prompter().token()?
        }
    };
    let token = validate_token_shape(&raw)?;

    let client = ctx.client_with_token(&token)?;
    let workspaces = client
        .list_workspaces(0)
        .context("failed to fetch workspaces")?;
    if workspaces.is_empty() {
        writeln!(out, "No workspaces found.")?;
        return Ok(());
    }

    let mut selected = None;
    if let Some(wanted) = &args.workspace {
        selected = find_workspace(&workspaces, wanted).cloned();
        if selected.is_none() {
            if !interactive {
                bail!(CliError::InvalidArgument(format!(
                    "workspace {wanted:?} not found; pass a valid name or gid with --workspace"
                )));
            }
            writeln!(out, "Workspace {wanted:?} not found. Please select one from the list.")?;
        }
    }
    let workspace = match selected {
        Some(workspace) => workspace,
        None => {
            let names: Vec<String> = workspaces.iter().map(|ws| ws.name.clone()).collect();
            let index = ctx.prompter().select("Select a default workspace:", &names)?;
            take(workspaces, index)?
        }
    };

    let user = client
        .current_user()
        .context("failed to fetch the current user")?;

    let store = ctx.config_store();
    let mut config = store.load_or_default().context("failed to load config")?;
    config.username = Some(user.name.clone());
    config.workspace = Some(DefaultWorkspace {
        gid: workspace.gid.clone(),
        name: workspace.name.clone(),
    });
    store.save(&config).context("failed to save config")?;
    ctx.credentials()
        .set(&token)
        .context("failed to store token")?;
    tracing::info!(user = %user.gid, workspace = %workspace.gid, "logged in");

    writeln!(out, "{} Logged in as {}", success_icon(), user.name.bold())?;
    writeln!(
        out,
        "{} Default workspace set to {}",
        success_icon(),
        workspace.name.bold()
    )?;
    Ok(())
}

pub fn logout(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    match ctx.credentials().get() {
        Ok(_) => {}
        Err(CredentialError::NoToken) => {
            writeln!(out, "No active session found. You are not logged in.")?;
            return Ok(());
        }
        Err(err) => return Err(anyhow!(err).context("failed to read stored token")),
    }

    if !ctx
        .prompter()
        .confirm("Are you sure you want to log out?", false)?
    {
        writeln!(out, "Logout aborted.")?;
        return Ok(());
    }
    ctx.credentials()
        .delete()
        .context("failed to remove stored token")?;
    writeln!(out, "{} Successfully logged out.", success_icon())?;
    Ok(())
}

/// Loads the config and asks the API who we are in parallel; each outcome is reported
/// on its own.
pub fn status(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    match ctx.require_token() {
        Ok(_) => {}
        Err(err) if is_not_authenticated(&err) => {
            writeln!(out, "You are not logged in.")?;
            return Ok(());
        }
        Err(err) => return Err(err),
    }

    let client = ctx.client()?;
    let store = ctx.config_store();
    let (config, me) = thread::scope(|scope| {
        let config = scope.spawn(|| store.load());
        let me = scope.spawn(|| client.current_user());
        (config.join(), me.join())
    });
    let config = config.map_err(|_| anyhow!("config loader panicked"))?;
    let me = me.map_err(|_| anyhow!("user lookup panicked"))?;

    let api_error = match me {
        Ok(user) => {
            writeln!(out, "API is operational.")?;
            writeln!(out, "Logged in as {} ({})", user.name.bold(), user.gid)?;
            None
        }
        Err(err) => {
            writeln!(out, "Unable to verify the stored token: {err}")?;
            Some(err)
        }
    };

    match config {
        Ok(config) => match config.workspace {
            Some(workspace) => writeln!(
                out,
                "Default workspace is {} ({})",
                workspace.name.bold(),
                workspace.gid
            )?,
            None => writeln!(out, "No default workspace set.")?,
        },
        Err(ConfigError::NotFound { .. }) => writeln!(out, "No default workspace set.")?,
        Err(err) => writeln!(out, "Unable to read config: {err}")?,
    }

    match api_error {
        Some(err) => Err(anyhow!(err).context("failed to verify login")),
        None => Ok(()),
    }
}

pub fn update(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let token = validate_token_shape(&ctx.prompter().token()?)?;
    ctx.credentials()
        .set(&token)
        .context("failed to store token")?;
    writeln!(out, "{} Token updated", success_icon())?;
    Ok(())
}

fn find_workspace<'a>(workspaces: &'a [Workspace], wanted: &str) -> Option<&'a Workspace> {
    let wanted = wanted.trim();
    workspaces
        .iter()
        .find(|ws| ws.gid == wanted || ws.name.eq_ignore_ascii_case(wanted))
}

fn is_not_authenticated(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<CliError>(), Some(CliError::NotAuthenticated))
}
