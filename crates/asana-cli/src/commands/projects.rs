use std::io::Write;

use anyhow::{Context as _, Result};
use asana_api::{Client, Options, Project};
use clap::{Args, Subcommand};
use colored::Colorize;

use super::take;
use crate::context::Context;
use crate::sorting::NameSort;

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// Projects in the default workspace.
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Tasks of a project.
    Tasks(TasksArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
    #[arg(long, short, value_enum)]
    pub sort: Option<NameSort>,
    /// Only archived (`true`) or only active (`false`) projects.
    #[arg(long)]
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TasksArgs {
    /// Project gid; prompts for a project when omitted.
    pub gid: Option<String>,
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
    /// Group the tasks by section.
    #[arg(long)]
    pub sections: bool,
}

pub fn run(ctx: &Context, command: ProjectsCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        ProjectsCommand::List(args) => list(ctx, &args, out),
        ProjectsCommand::Tasks(args) => tasks(ctx, &args, out),
    }
}

pub fn list(ctx: &Context, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let workspace = ctx.default_workspace()?;
    let client = ctx.client()?;
    let mut projects = client
        .list_projects(&workspace.gid, args.archived, args.limit)
        .context("failed to fetch projects")?;
    if projects.is_empty() {
        writeln!(out, "No projects found.")?;
        return Ok(());
    }
    if let Some(sort) = args.sort {
        sort.projects(&mut projects);
    }

    writeln!(out, "\nProjects in {}:\n", workspace.name.bold())?;
    for project in &projects {
        let marker = if project.archived == Some(true) { " (archived)" } else { "" };
        writeln!(out, "{}{}", project.name.bold(), marker.dimmed())?;
    }
    Ok(())
}

pub fn tasks(ctx: &Context, args: &TasksArgs, out: &mut dyn Write) -> Result<()> {
    let client = ctx.client()?;
    let project = match &args.gid {
        Some(gid) => client
            .get_project(gid)
            .with_context(|| format!("failed to fetch project {gid}"))?,
        None => match select_project(ctx, &client, out)? {
            Some(project) => project,
            None => return Ok(()),
        },
    };

    let options = Options::fields(["name", "due_on", "completed"]);
    writeln!(out, "\nTasks in {}:\n", project.name.bold())?;

    if !args.sections {
        let tasks = client
            .project_tasks(&project.gid, &options, args.limit)
            .with_context(|| format!("failed to fetch tasks for project {:?}", project.name))?;
        if tasks.is_empty() {
            writeln!(out, "No tasks found")?;
        }
        for (idx, task) in tasks.iter().enumerate() {
            writeln!(out, "{}. {}", idx + 1, task.name.bold())?;
        }
        return Ok(());
    }

    let sections = client
        .list_sections(&project.gid)
        .with_context(|| format!("failed to fetch sections for project {:?}", project.name))?;
    for section in &sections {
        let tasks = client
            .section_tasks(&section.gid, &options, args.limit)
            .with_context(|| format!("failed to fetch tasks for section {:?}", section.name))?;
        writeln!(out, "{}", section.name.bold().underline())?;
        if tasks.is_empty() {
            writeln!(out, "  No tasks")?;
        }
        for (idx, task) in tasks.iter().enumerate() {
            writeln!(out, "  {}. {}", idx + 1, task.name)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn select_project(ctx: &Context, client: &Client, out: &mut dyn Write) -> Result<Option<Project>> {
    let workspace = ctx.default_workspace()?;
    let projects = client
        .list_projects(&workspace.gid, None, 0)
        .context("failed to fetch projects")?;
    if projects.is_empty() {
        writeln!(out, "No projects found.")?;
        return Ok(None);
    }
    let names: Vec<String> = projects.iter().map(|p| p.name.clone()).collect();
    let index = ctx
        .prompter()
        .select("Select a project:", &names)
        .context("failed to select a project")?;
    take(projects, index).map(Some)
}
