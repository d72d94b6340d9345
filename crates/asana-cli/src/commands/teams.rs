use std::io::Write;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::context::Context;

#[derive(Debug, Subcommand)]
pub enum TeamsCommand {
    /// Teams in the default workspace.
    #[command(visible_alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
}

pub fn run(ctx: &Context, command: TeamsCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        TeamsCommand::List(args) => list(ctx, &args, out),
    }
}

pub fn list(ctx: &Context, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let workspace = ctx.default_workspace()?;
    let teams = ctx
        .client()?
        .list_teams(&workspace.gid, args.limit)
        .context("failed to fetch teams")?;
    writeln!(out, "\nTeams in workspace {}:\n", workspace.name.bold())?;
    for (idx, team) in teams.iter().enumerate() {
        writeln!(out, "{:2}. {}", idx + 1, team.name.bold())?;
    }
    Ok(())
}
