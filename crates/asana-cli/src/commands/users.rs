use std::io::Write;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::context::Context;
use crate::sorting::NameSort;

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Members of the default workspace.
    #[command(visible_alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
    #[arg(long, short, value_enum)]
    pub sort: Option<NameSort>,
}

pub fn run(ctx: &Context, command: UsersCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        UsersCommand::List(args) => list(ctx, &args, out),
    }
}

pub fn list(ctx: &Context, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let workspace = ctx.default_workspace()?;
    let client = ctx.client()?;
    let mut users = client
        .list_users(&workspace.gid, args.limit)
        .context("failed to fetch users")?;
    if let Some(sort) = args.sort {
        sort.users(&mut users);
    }

    writeln!(out, "\nUsers in workspace {}:\n", workspace.name.bold())?;
    for user in &users {
        match &user.email {
            Some(email) => writeln!(out, "{} <{}>", user.name.bold(), email)?,
            None => writeln!(out, "{}", user.name.bold())?,
        }
    }
    Ok(())
}
