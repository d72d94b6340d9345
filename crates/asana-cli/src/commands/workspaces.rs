use std::io::Write;

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;

use crate::context::Context;

#[derive(Debug, Subcommand)]
pub enum WorkspacesCommand {
    /// Every workspace your token can access.
    #[command(visible_alias = "ls")]
    List,
}

pub fn run(ctx: &Context, command: WorkspacesCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        WorkspacesCommand::List => list(ctx, out),
    }
}

pub fn list(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let client = ctx.client()?;
    let workspaces = client
        .list_workspaces(0)
        .context("failed to fetch workspaces")?;
    if workspaces.is_empty() {
        writeln!(out, "No workspaces found.")?;
        return Ok(());
    }

    let default_gid = ctx
        .config_store()
        .load_or_default()
        .ok()
        .and_then(|config| config.workspace)
        .map(|ws| ws.gid);
    writeln!(out, "{}", "Your Workspaces:".bold().underline())?;
    for (idx, workspace) in workspaces.iter().enumerate() {
        let marker = if default_gid.as_deref() == Some(workspace.gid.as_str()) {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "{}. {}{}", idx + 1, workspace.name, marker.green())?;
    }
    Ok(())
}
