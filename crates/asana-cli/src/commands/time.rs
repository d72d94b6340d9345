use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context as _, Result};
use asana_api::{Client, CreateTimeTrackingEntryRequest, Options, Task, TimeTrackingEntry};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::{select_task, success_icon, take};
use crate::context::{CliError, Context};
use crate::format;

const ENTRY_FIELDS: [&str; 4] = [
    "created_by.name",
    "created_by.gid",
    "duration_minutes",
    "entered_on",
];

#[derive(Debug, Subcommand)]
pub enum TimeCommand {
    /// Log time to a task.
    Create(CreateArgs),
    /// Delete a time entry from a task.
    Delete(TaskArg),
    /// Tracked time of a task, grouped by day.
    Status(TaskArg),
}

#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    /// Minutes to log; prompted when omitted.
    #[arg(long, short)]
    pub minutes: Option<u32>,
    /// Entry date (YYYY-MM-DD), defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Task gid; prompts for one of your tasks when omitted.
    #[arg(long)]
    pub task: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TaskArg {
    /// Task gid; prompts for one of your tasks when omitted.
    #[arg(long)]
    pub task: Option<String>,
}

/// Entries of one day, newest day first. `day` is `None` for entries without a date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: Option<NaiveDate>,
    pub entries: Vec<TimeTrackingEntry>,
}

pub fn run(ctx: &Context, command: TimeCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        TimeCommand::Create(args) => create(ctx, &args, out),
        TimeCommand::Delete(args) => delete(ctx, &args, out),
        TimeCommand::Status(args) => status(ctx, &args, out),
    }
}

pub fn create(ctx: &Context, args: &CreateArgs, out: &mut dyn Write) -> Result<()> {
    if args.minutes == Some(0) {
        return Err(CliError::InvalidArgument("minutes must be a positive number".to_string()).into());
    }
    let client = ctx.client()?;
    let Some(task) = resolve_task(ctx, &client, args.task.as_deref(), "Select a task to log time to:", out)? else {
        return Ok(());
    };

    let minutes = match args.minutes {
        Some(minutes) => minutes,
        None => prompt_minutes(ctx)?,
    };
    let request = CreateTimeTrackingEntryRequest {
        duration_minutes: minutes,
        entered_on: Some(args.date.unwrap_or(ctx.today())),
        description: None,
    };
    let entry = client
        .create_time_entry(&task.gid, &request)
        .context("failed to create time tracking entry")?;

    writeln!(
        out,
        "{} Logged {} to {:?} on {}",
        success_icon(),
        format::duration(entry.duration_minutes),
        task.name,
        format::date(entry.entered_on.or(request.entered_on), ctx.today())
    )?;
    Ok(())
}

pub fn status(ctx: &Context, args: &TaskArg, out: &mut dyn Write) -> Result<()> {
    let client = ctx.client()?;
    let Some(task) = resolve_task(ctx, &client, args.task.as_deref(), "Select a task to view tracked time:", out)? else {
        return Ok(());
    };
    let entries = client
        .task_time_entries(&task.gid, &Options::fields(ENTRY_FIELDS))
        .context("failed to get time tracking entries")?;
    if entries.is_empty() {
        writeln!(out, "No time entries found for this task.")?;
        return Ok(());
    }

    let (groups, total) = group_by_day(entries);
    writeln!(out, "\nTime entries for task: {}", task.name.bold())?;
    for group in &groups {
        let header = match group.day {
            Some(day) => format::human_date(day, ctx.today()),
            None => "Undated".to_string(),
        };
        writeln!(out, "\n[{header}]")?;
        for entry in &group.entries {
            writeln!(
                out,
                " • {} - {}",
                creator_name(entry),
                format::duration(entry.duration_minutes).bold()
            )?;
        }
    }
    writeln!(out, "\nTotal: {}", format::duration(total).bold())?;
    Ok(())
}

pub fn delete(ctx: &Context, args: &TaskArg, out: &mut dyn Write) -> Result<()> {
    let client = ctx.client()?;
    let Some(task) = resolve_task(ctx, &client, args.task.as_deref(), "Select a task to delete time from:", out)? else {
        return Ok(());
    };
    let entries = client
        .task_time_entries(&task.gid, &Options::fields(ENTRY_FIELDS))
        .context("failed to get time tracking entries")?;
    if entries.is_empty() {
        writeln!(out, "No time entries found for this task.")?;
        return Ok(());
    }

    let labels: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "{} - {} ({})",
                creator_name(entry),
                format::duration(entry.duration_minutes),
                format::date(entry.entered_on, ctx.today())
            )
        })
        .collect();
    let index = ctx
        .prompter()
        .select("Select a time entry to delete:", &labels)
        .context("failed to select time entry")?;
    let entry = take(entries, index)?;
    client
        .delete_time_entry(&entry.gid)
        .context("failed to delete time tracking entry")?;

    writeln!(
        out,
        "{} Deleted time entry of {} created by {}",
        success_icon(),
        format::duration(entry.duration_minutes),
        creator_name(&entry)
    )?;
    Ok(())
}

/// Groups entries by `entered_on`, newest day first with undated entries last, and sums
/// the minutes of every entry.
pub fn group_by_day(entries: Vec<TimeTrackingEntry>) -> (Vec<DayGroup>, u32) {
    let mut days: BTreeMap<Option<NaiveDate>, Vec<TimeTrackingEntry>> = BTreeMap::new();
    let mut total = 0_u32;
    for entry in entries {
        total = total.saturating_add(entry.duration_minutes);
        days.entry(entry.entered_on).or_default().push(entry);
    }
    let groups = days
        .into_iter()
        .rev()
        .map(|(day, entries)| DayGroup { day, entries })
        .collect();
    (groups, total)
}

fn resolve_task(
    ctx: &Context,
    client: &Client,
    gid: Option<&str>,
    message: &str,
    out: &mut dyn Write,
) -> Result<Option<Task>> {
    match gid {
        Some(gid) => client
            .get_task(gid, &Options::fields(["name", "due_on"]))
            .map(Some)
            .with_context(|| format!("failed to fetch task {gid}")),
        None => select_task(ctx, client, message, out),
    }
}

fn prompt_minutes(ctx: &Context) -> Result<u32> {
    let raw = ctx
        .prompter()
        .input("Enter minutes to log (e.g., 30):", "")
        .context("failed to read duration")?;
    match raw.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(CliError::InvalidArgument(format!(
            "invalid duration {raw:?}: please enter a positive number"
        ))
        .into()),
    }
}

fn creator_name(entry: &TimeTrackingEntry) -> &str {
    entry
        .created_by
        .as_ref()
        .map(|user| user.name.as_str())
        .unwrap_or("Unknown")
}
