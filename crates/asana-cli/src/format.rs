//! Human-readable renderings shared by the commands.

use asana_api::Task;
use chrono::{Days, NaiveDate};

/// Relative due date: `Today`, `Tomorrow`, a weekday name within the coming week,
/// otherwise `Jan 02, 2006`.
pub fn date(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due else {
        return "None".to_string();
    };
    let tomorrow = today + Days::new(1);
    let week_later = today + Days::new(6);
    if due == today {
        "Today".to_string()
    } else if due == tomorrow {
        "Tomorrow".to_string()
    } else if due > tomorrow && due < week_later {
        due.format("%a").to_string()
    } else {
        due.format("%b %d, %Y").to_string()
    }
}

/// Header label used when grouping entries by day.
pub fn human_date(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.checked_sub_days(Days::new(1)) {
        "Yesterday".to_string()
    } else {
        day.format("%a, %b %d").to_string()
    }
}

pub fn duration(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// `Projects: a, b` or `Projects: None`.
pub fn names<'a>(prefix: &str, items: impl IntoIterator<Item = &'a str>) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        format!("{prefix}: None")
    } else {
        format!("{prefix}: {joined}")
    }
}

/// `[Tomorrow] Write docs`, the label used in task pickers and listings.
pub fn task_line(task: &Task, today: NaiveDate) -> String {
    format!("[{}] {}", date(task.due_on, today), task.name)
}

pub fn task_lines(tasks: &[Task], today: NaiveDate) -> Vec<String> {
    tasks.iter().map(|task| task_line(task, today)).collect()
}

/// Prefixes every line of `text`; blank text is returned unchanged.
pub fn indent(text: &str, prefix: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    text.split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
