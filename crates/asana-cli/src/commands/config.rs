use std::io::Write;

use anyhow::{Context as _, Result};
use asana_api::DEFAULT_BASE_URL;
use asana_common::{ConfigKey, ConfigUpdate, DefaultWorkspace};
use clap::{Args, Subcommand};
use colored::Colorize;

use super::{success_icon, take};
use crate::context::{CliError, Context};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the value of a configuration key.
    Get(KeyArg),
    /// Change a configuration key.
    Set(SetArgs),
}

#[derive(Debug, Clone, Args)]
pub struct KeyArg {
    /// default-workspace (dw), username, log-level or base-url.
    pub key: String,
}

#[derive(Debug, Clone, Args)]
pub struct SetArgs {
    /// default-workspace (dw), username, log-level or base-url.
    pub key: String,
    /// New value. `default-workspace` prompts when omitted; `base-url` resets.
    pub value: Option<String>,
}

pub fn run(ctx: &Context, command: ConfigCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        ConfigCommand::Get(args) => get(ctx, &args.key, out),
        ConfigCommand::Set(args) => set(ctx, &args.key, args.value.as_deref(), out),
    }
}

pub fn get(ctx: &Context, key: &str, out: &mut dyn Write) -> Result<()> {
    let key = parse_key(key)?;
    match key {
        ConfigKey::DefaultWorkspace => {
            let workspace = ctx.default_workspace()?;
            writeln!(
                out,
                "Default workspace is {} ({})",
                workspace.name.bold(),
                workspace.gid
            )?;
        }
        ConfigKey::Username => {
            let config = ctx.config_store().load_or_default()?;
            writeln!(out, "{}", config.username.as_deref().unwrap_or("(not set)"))?;
        }
        ConfigKey::LogLevel => {
            let config = ctx.config_store().load_or_default()?;
            writeln!(out, "{}", config.log_level)?;
        }
        ConfigKey::BaseUrl => {
            let config = ctx.config_store().load_or_default()?;
            match config.base_url {
                Some(url) => writeln!(out, "{url}")?,
                None => writeln!(out, "{DEFAULT_BASE_URL} (default)")?,
            }
        }
    }
    Ok(())
}

pub fn set(ctx: &Context, key: &str, value: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let key = parse_key(key)?;
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let update = match key {
        ConfigKey::DefaultWorkspace => match choose_workspace(ctx, value, out)? {
            Some(workspace) => ConfigUpdate::Workspace(workspace),
            None => return Ok(()),
        },
        ConfigKey::Username => ConfigUpdate::Username(required(key, value)?.to_string()),
        ConfigKey::LogLevel => {
            let level = required(key, value)?.to_ascii_lowercase();
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(CliError::InvalidArgument(format!(
                    "invalid log level {level:?}; expected one of {}",
                    LOG_LEVELS.join(", ")
                ))
                .into());
            }
            ConfigUpdate::LogLevel(level)
        }
        ConfigKey::BaseUrl => ConfigUpdate::BaseUrl(value.map(str::to_string)),
    };

    let config = ctx
        .config_store()
        .set(update)
        .context("failed to update config")?;
    match key {
        ConfigKey::DefaultWorkspace => {
            let name = config.workspace.map(|ws| ws.name).unwrap_or_default();
            writeln!(out, "{} Default workspace set to {}", success_icon(), name.bold())?;
        }
        ConfigKey::BaseUrl if config.base_url.is_none() => {
            writeln!(out, "{} base-url reset to {DEFAULT_BASE_URL}", success_icon())?;
        }
        _ => writeln!(out, "{} {} updated", success_icon(), key.as_str())?,
    }
    Ok(())
}

fn choose_workspace(
    ctx: &Context,
    wanted: Option<&str>,
    out: &mut dyn Write,
) -> Result<Option<DefaultWorkspace>> {
    let workspaces = ctx
        .client()?
        .list_workspaces(0)
        .context("failed to fetch workspaces")?;
    if workspaces.is_empty() {
        writeln!(out, "No workspaces found.")?;
        return Ok(None);
    }

    let chosen = match wanted {
        Some(wanted) => workspaces
            .into_iter()
            .find(|ws| ws.gid == wanted || ws.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CliError::InvalidArgument(format!("workspace {wanted:?} not found")))?,
        None => {
            let names: Vec<String> = workspaces.iter().map(|ws| ws.name.clone()).collect();
            let index = ctx
                .prompter()
                .select("Select a new default workspace:", &names)?;
            take(workspaces, index)?
        }
    };
    Ok(Some(DefaultWorkspace {
        gid: chosen.gid,
        name: chosen.name,
    }))
}

fn parse_key(raw: &str) -> Result<ConfigKey> {
    ConfigKey::parse(raw).ok_or_else(|| {
        let known: Vec<String> = ConfigKey::all()
            .iter()
            .map(|key| match key {
                ConfigKey::DefaultWorkspace => format!("{} (dw)", key.as_str()),
                _ => key.as_str().to_string(),
            })
            .collect();
        CliError::InvalidArgument(format!(
            "unknown configuration key {raw:?}; available keys are: {}",
            known.join(", ")
        ))
        .into()
    })
}

fn required(key: ConfigKey, value: Option<&str>) -> Result<&str> {
    value.ok_or_else(|| {
        CliError::InvalidArgument(format!("a value is required for {}", key.as_str())).into()
    })
}
