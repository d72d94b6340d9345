pub mod auth;
pub mod config;
pub mod projects;
pub mod tags;
pub mod tasks;
pub mod teams;
pub mod time;
pub mod users;
pub mod workspaces;

use std::io::{self, Write};

use anyhow::{Context as _, Result};
use asana_api::{Client, Options, Task, TaskQuery};
use colored::{ColoredString, Colorize};

use crate::cli::Command;
use crate::context::Context;
use crate::format;

pub fn run(ctx: &Context, command: Command, out: &mut dyn Write) -> Result<()> {
    if command.requires_auth() {
        ctx.require_token()?;
    }
    match command {
        Command::Auth { command } => auth::run(ctx, command, out),
        Command::Tasks { command } => tasks::run(ctx, command, out),
        Command::Projects { command } => projects::run(ctx, command, out),
        Command::Workspaces { command } => workspaces::run(ctx, command, out),
        Command::Tags { command } => tags::run(ctx, command, out),
        Command::Users { command } => users::run(ctx, command, out),
        Command::Teams { command } => teams::run(ctx, command, out),
        Command::Time { command } => time::run(ctx, command, out),
        Command::Config { command } => config::run(ctx, command, out),
    }
}

pub(crate) fn success_icon() -> ColoredString {
    "✓".green()
}

/// Lets the user pick one of their open tasks. `Ok(None)` when there are none.
pub(crate) fn select_task(
    ctx: &Context,
    client: &Client,
    message: &str,
    out: &mut dyn Write,
) -> Result<Option<Task>> {
    let workspace = ctx.default_workspace()?;
    let tasks = client
        .list_tasks(
            &TaskQuery::my_open_tasks(&workspace.gid),
            &Options::fields(["name", "due_on"]),
            0,
        )
        .context("failed to query tasks")?;
    if tasks.is_empty() {
        writeln!(out, "No tasks found.")?;
        return Ok(None);
    }
    let labels = format::task_lines(&tasks, ctx.today());
    let index = ctx
        .prompter()
        .select(message, &labels)
        .context("failed to select task")?;
    take(tasks, index).map(Some)
}

/// Moves the selected item out of `items`.
pub(crate) fn take<T>(mut items: Vec<T>, index: usize) -> Result<T> {
    if index >= items.len() {
        anyhow::bail!("selection {index} is out of range");
    }
    Ok(items.swap_remove(index))
}

/// Reads a token piped on stdin for `auth login --with-token`.
pub(crate) fn read_stdin_token() -> Result<String> {
    let token = io::read_to_string(io::stdin()).context("failed to read token from standard input")?;
    Ok(token.trim().to_string())
}
