use std::io::Write;

use anyhow::{Context as _, Result, bail};
use asana_api::{
    Client, CreateTaskRequest, Options, SearchTasksQuery, Task, TaskQuery, UpdateTaskRequest,
};
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;

use super::{select_task, success_icon, take};
use crate::context::{CliError, Context};
use crate::format;
use crate::sorting::TaskSort;

const DETAIL_FIELDS: [&str; 8] = [
    "name",
    "due_on",
    "completed",
    "notes",
    "projects.name",
    "tags.name",
    "assignee.name",
    "permalink_url",
];

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// Your incomplete tasks in the default workspace.
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Details of a single task.
    View(ViewArgs),
    /// Complete, rename or reschedule a task.
    Update(UpdateArgs),
    /// Create a task in the default workspace.
    Create(CreateArgs),
    /// Search tasks in the default workspace.
    Search(SearchArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long, short, value_enum)]
    pub sort: Option<TaskSort>,
    /// Maximum number of tasks; 0 fetches every page.
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    /// Task gid; prompts for one of your tasks when omitted.
    pub gid: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct UpdateArgs {
    /// Task gid; prompts for one of your tasks when omitted.
    pub gid: Option<String>,
    /// Mark the task as completed.
    #[arg(long)]
    pub complete: bool,
    /// New task name.
    #[arg(long)]
    pub name: Option<String>,
    /// New due date (YYYY-MM-DD), or `none` to clear it.
    #[arg(long)]
    pub due: Option<String>,
}

impl UpdateArgs {
    fn to_request(&self) -> Result<Option<UpdateTaskRequest>> {
        let due_on = match self.due.as_deref() {
            None => None,
            Some(raw) => Some(parse_optional_date(raw)?),
        };
        let request = UpdateTaskRequest {
            name: self.name.clone(),
            completed: self.complete.then_some(true),
            due_on,
            ..UpdateTaskRequest::default()
        };
        Ok((!request.is_empty()).then_some(request))
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    /// Task name; runs interactively when omitted.
    #[arg(long)]
    pub name: Option<String>,
    /// Assignee gid, or `me`.
    #[arg(long)]
    pub assignee: Option<String>,
    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<NaiveDate>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Add the task to this project gid.
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SearchSortBy {
    DueDate,
    CreatedAt,
    CompletedAt,
    Likes,
    ModifiedAt,
}

impl SearchSortBy {
    fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "due_date",
            Self::CreatedAt => "created_at",
            Self::CompletedAt => "completed_at",
            Self::Likes => "likes",
            Self::ModifiedAt => "modified_at",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Full-text search on task names and descriptions.
    #[arg(long, short)]
    pub query: Option<String>,
    /// Resource subtype, e.g. default_task or milestone.
    #[arg(long = "type", default_value = "default_task")]
    pub kind: String,
    /// Comma-separated assignee gids (`me` allowed).
    #[arg(long, short, value_delimiter = ',', default_value = "me")]
    pub assignee: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub exclude_assignee: Vec<String>,
    /// Only tasks carrying all of these tag gids.
    #[arg(long, value_delimiter = ',')]
    pub tags_all: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub creator_any: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub exclude_creator: Vec<String>,
    /// Only tasks with incomplete dependencies.
    #[arg(long)]
    pub is_blocked: bool,
    #[arg(long, value_enum, default_value = "modified_at")]
    pub sort_by: SearchSortBy,
    #[arg(long)]
    pub sort_asc: bool,
    #[arg(long, conflicts_with_all = ["due_on_before", "due_on_after"])]
    pub due_on: Option<NaiveDate>,
    #[arg(long)]
    pub due_on_before: Option<NaiveDate>,
    #[arg(long)]
    pub due_on_after: Option<NaiveDate>,
    #[arg(long)]
    pub due_at_before: Option<NaiveDate>,
    #[arg(long)]
    pub due_at_after: Option<NaiveDate>,
    #[arg(long, short, default_value_t = 0)]
    pub limit: usize,
}

impl Default for SearchArgs {
    fn default() -> Self {
        Self {
            query: None,
            kind: "default_task".to_string(),
            assignee: vec!["me".to_string()],
            exclude_assignee: Vec::new(),
            tags_all: Vec::new(),
            creator_any: Vec::new(),
            exclude_creator: Vec::new(),
            is_blocked: false,
            sort_by: SearchSortBy::ModifiedAt,
            sort_asc: false,
            due_on: None,
            due_on_before: None,
            due_on_after: None,
            due_at_before: None,
            due_at_after: None,
            limit: 0,
        }
    }
}

impl SearchArgs {
    pub fn to_query(&self) -> SearchTasksQuery {
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string());
        SearchTasksQuery {
            text: self.query.clone().filter(|q| !q.trim().is_empty()),
            resource_subtype: Some(self.kind.clone()),
            assignee_any: self.assignee.clone(),
            assignee_not: self.exclude_assignee.clone(),
            tags_all: self.tags_all.clone(),
            created_by_any: self.creator_any.clone(),
            created_by_not: self.exclude_creator.clone(),
            is_blocked: self.is_blocked.then_some(true),
            completed: None,
            due_on: date(self.due_on),
            due_on_before: date(self.due_on_before),
            due_on_after: date(self.due_on_after),
            due_at_before: date(self.due_at_before),
            due_at_after: date(self.due_at_after),
            sort_by: Some(self.sort_by.as_str().to_string()),
            sort_ascending: self.sort_asc.then_some(true),
        }
    }
}

pub fn run(ctx: &Context, command: TasksCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        TasksCommand::List(args) => list(ctx, &args, out),
        TasksCommand::View(args) => view(ctx, &args, out),
        TasksCommand::Update(args) => update(ctx, &args, out),
        TasksCommand::Create(args) => create(ctx, &args, out),
        TasksCommand::Search(args) => search(ctx, &args, out),
    }
}

pub fn list(ctx: &Context, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let workspace = ctx.default_workspace()?;
    let client = ctx.client()?;
    let mut tasks = client
        .list_tasks(
            &TaskQuery::my_open_tasks(&workspace.gid),
            &Options::fields(["due_on", "name", "created_at"]),
            args.limit,
        )
        .context("failed to fetch tasks")?;
    if tasks.is_empty() {
        writeln!(out, "No tasks found.")?;
        return Ok(());
    }
    if let Some(sort) = args.sort {
        sort.apply(&mut tasks);
    }

    let owner = ctx
        .config()?
        .username
        .unwrap_or_else(|| "you".to_string());
    writeln!(out, "\nTasks for {}:\n", owner.bold())?;
    for (idx, task) in tasks.iter().enumerate() {
        writeln!(
            out,
            "{}. [{}] {}",
            idx + 1,
            format::date(task.due_on, ctx.today()),
            task.name.bold()
        )?;
    }
    Ok(())
}

pub fn view(ctx: &Context, args: &ViewArgs, out: &mut dyn Write) -> Result<()> {
    let client = ctx.client()?;
    let Some(gid) = resolve_task_gid(ctx, &client, args.gid.as_deref(), out)? else {
        return Ok(());
    };
    let task = client
        .get_task(&gid, &Options::fields(DETAIL_FIELDS))
        .with_context(|| format!("failed to fetch task {gid}"))?;
    write_details(&task, ctx, out)
}

pub fn update(ctx: &Context, args: &UpdateArgs, out: &mut dyn Write) -> Result<()> {
    let from_flags = args.to_request()?;
    let client = ctx.client()?;
    let Some(gid) = resolve_task_gid(ctx, &client, args.gid.as_deref(), out)? else {
        return Ok(());
    };

    let request = match from_flags {
        Some(request) => request,
        None => match prompt_update(ctx)? {
            Some(request) => request,
            None => {
                writeln!(out, "{} Cancelled", success_icon())?;
                return Ok(());
            }
        },
    };

    let task = client
        .update_task(&gid, &request)
        .context("failed to update task")?;
    if request.completed == Some(true) {
        writeln!(out, "{} Task completed: {}", success_icon(), task.name.bold())?;
    } else {
        writeln!(out, "{} Task updated: {}", success_icon(), task.name.bold())?;
    }
    Ok(())
}

pub fn create(ctx: &Context, args: &CreateArgs, out: &mut dyn Write) -> Result<()> {
    let workspace = ctx.default_workspace()?;
    let client = ctx.client()?;

    let request = match &args.name {
        Some(name) => CreateTaskRequest {
            name: name.trim().to_string(),
            notes: args.notes.clone(),
            due_on: args.due,
            assignee: args.assignee.clone(),
            workspace: Some(workspace.gid.clone()),
            projects: args.project.iter().cloned().collect(),
            ..CreateTaskRequest::default()
        },
        None => prompt_create(ctx, &client, &workspace.gid)?,
    };

    let task = client
        .create_task(&request)
        .context("error creating task")?;
    writeln!(
        out,
        "{} Created task {:?} with due date {}",
        success_icon(),
        task.name,
        format::date(task.due_on, ctx.today())
    )?;
    Ok(())
}

pub fn search(ctx: &Context, args: &SearchArgs, out: &mut dyn Write) -> Result<()> {
    let workspace = ctx.default_workspace()?;
    let client = ctx.client()?;
    let tasks = client
        .search_tasks(
            &workspace.gid,
            &args.to_query(),
            &Options::fields(["name", "due_on"]),
            args.limit,
        )
        .context("failed searching tasks")?;

    if tasks.is_empty() {
        writeln!(out, "No tasks found matching your criteria.")?;
        writeln!(out, "- Try broadening your search by removing some filters")?;
        writeln!(out, "- Check if the assignee or creator ids are correct")?;
        writeln!(out, "- If searching by text, try fewer or different keywords")?;
        if args.kind != "default_task" {
            writeln!(
                out,
                "- Try changing the task type from '{}' to 'default_task'",
                args.kind
            )?;
        }
        return Ok(());
    }

    writeln!(out, "\nTasks assigned to {}:\n", args.assignee.join(", ").bold())?;
    for (idx, task) in tasks.iter().enumerate() {
        writeln!(out, "{:2}. {}", idx + 1, format::task_line(task, ctx.today()))?;
    }
    Ok(())
}

fn resolve_task_gid(
    ctx: &Context,
    client: &Client,
    gid: Option<&str>,
    out: &mut dyn Write,
) -> Result<Option<String>> {
    if let Some(gid) = gid {
        return Ok(Some(gid.to_string()));
    }
    let message = format!(
        "Your tasks on {} (select one):",
        ctx.today().format("%b %d, %Y")
    );
    Ok(select_task(ctx, client, &message, out)?.map(|task| task.gid))
}

fn write_details(task: &Task, ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let projects = format::names("Projects", task.projects.iter().map(|p| p.name.as_str()));
    writeln!(
        out,
        "{} | Due: {} | {}",
        task.name.bold().underline(),
        format::date(task.due_on, ctx.today()),
        projects
    )?;
    writeln!(out, "{}", format::names("Tags", task.tags.iter().map(|t| t.name.as_str())))?;
    if let Some(assignee) = &task.assignee {
        writeln!(out, "Assignee: {}", assignee.name)?;
    }
    if task.completed == Some(true) {
        writeln!(out, "Status: {}", "completed".green())?;
    }
    if !task.notes.is_empty() {
        writeln!(out, "{}", "Description:".bold().underline())?;
        writeln!(out, "{}", format::indent(&task.notes, "  "))?;
    }
    if let Some(url) = &task.permalink_url {
        writeln!(out, "{}", url.dimmed())?;
    }
    Ok(())
}

fn prompt_update(ctx: &Context) -> Result<Option<UpdateTaskRequest>> {
    let prompter = ctx.prompter();
    let actions = [
        "Mark as completed",
        "Edit task name",
        "Change due date",
        "Edit description",
        "Cancel",
    ]
    .map(String::from);
    let request = match prompter.select("What do you want to do with this task:", &actions)? {
        0 => UpdateTaskRequest {
            completed: Some(true),
            ..UpdateTaskRequest::default()
        },
        1 => {
            let name = prompter.input("Enter the new task name:", "")?;
            if name.is_empty() {
                bail!(CliError::InvalidArgument("task name cannot be empty".to_string()));
            }
            UpdateTaskRequest {
                name: Some(name),
                ..UpdateTaskRequest::default()
            }
        }
        2 => {
            let raw = prompter.input("Enter the new due date (YYYY-MM-DD, or none):", "")?;
            UpdateTaskRequest {
                due_on: Some(parse_optional_date(&raw)?),
                ..UpdateTaskRequest::default()
            }
        }
        3 => {
            let notes = prompter.editor("Edit the task description:", "")?;
            UpdateTaskRequest {
                notes: Some(notes.trim().to_string()),
                ..UpdateTaskRequest::default()
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(request))
}

fn prompt_create(ctx: &Context, client: &Client, workspace: &str) -> Result<CreateTaskRequest> {
    let prompter = ctx.prompter();
    let name = prompter.input("Enter task name:", "")?;
    if name.is_empty() {
        bail!(CliError::InvalidArgument("task name cannot be empty".to_string()));
    }

    let users = client
        .list_users(workspace, 0)
        .context("cannot fetch users")?;
    let names: Vec<String> = users.iter().map(|u| u.name.clone()).collect();
    let index = prompter
        .select("Select assignee:", &names)
        .context("assignee selection failed")?;
    let assignee = take(users, index)?;

    let raw_due = prompter.input("Enter due date (YYYY-MM-DD), leave blank for none:", "")?;
    let due_on = parse_optional_date(&raw_due)?;
    let notes = prompter.editor("Enter task description:", "")?;
    let notes = notes.trim();

    Ok(CreateTaskRequest {
        name,
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        due_on,
        assignee: Some(assignee.gid),
        workspace: Some(workspace.to_string()),
        ..CreateTaskRequest::default()
    })
}

/// Empty input or `none` means no date.
fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|err| CliError::InvalidArgument(format!("invalid date {raw:?}: {err}")).into())
}
