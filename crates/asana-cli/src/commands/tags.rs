use std::io::Write;

use anyhow::{Context as _, Result};
use asana_api::{Client, Options, Tag};
use clap::{Args, Subcommand};
use colored::Colorize;

use super::take;
use crate::context::Context;

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// Tags in the default workspace.
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Tasks carrying a tag.
    Tasks(TasksArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TasksArgs {
    /// Tag gid; prompts for a tag when omitted.
    pub gid: Option<String>,
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
}

pub fn run(ctx: &Context, command: TagsCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        TagsCommand::List(args) => list(ctx, &args, out),
        TagsCommand::Tasks(args) => tasks(ctx, &args, out),
    }
}

pub fn list(ctx: &Context, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let workspace = ctx.default_workspace()?;
    let client = ctx.client()?;
    let tags = client
        .list_tags(&workspace.gid, args.limit)
        .context("failed to fetch tags")?;
    if tags.is_empty() {
        writeln!(out, "No tags found in {}.", workspace.name)?;
        return Ok(());
    }
    writeln!(out, "\nTags in {}:\n", workspace.name.bold())?;
    for (idx, tag) in tags.iter().enumerate() {
        writeln!(out, "{:2}. {}", idx + 1, tag.name.bold())?;
    }
    Ok(())
}

pub fn tasks(ctx: &Context, args: &TasksArgs, out: &mut dyn Write) -> Result<()> {
    let client = ctx.client()?;
    let tag = match &args.gid {
        Some(gid) => client
            .get_tag(gid)
            .with_context(|| format!("failed to fetch tag {gid}"))?,
        None => match select_tag(ctx, &client, out)? {
            Some(tag) => tag,
            None => return Ok(()),
        },
    };

    let tasks = client
        .tag_tasks(&tag.gid, &Options::fields(["name", "due_on"]), args.limit)
        .with_context(|| format!("failed to fetch tasks for tag {}", tag.name))?;
    if tasks.is_empty() {
        writeln!(out, "No tasks found for tag {}.", tag.name)?;
        return Ok(());
    }
    writeln!(out, "\nTasks with the tag {}:\n", tag.name.bold())?;
    for (idx, task) in tasks.iter().enumerate() {
        writeln!(out, "{:2}. {}", idx + 1, task.name.bold())?;
    }
    Ok(())
}

fn select_tag(ctx: &Context, client: &Client, out: &mut dyn Write) -> Result<Option<Tag>> {
    let workspace = ctx.default_workspace()?;
    let tags = client
        .list_tags(&workspace.gid, 0)
        .context("failed to fetch tags")?;
    if tags.is_empty() {
        writeln!(out, "No tags found in {}.", workspace.name)?;
        return Ok(None);
    }
    let names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();
    let index = ctx
        .prompter()
        .select("Select a tag:", &names)
        .context("failed to select a tag")?;
    take(tags, index).map(Some)
}
