use std::cmp::{Ordering, Reverse};

use asana_api::{Project, Task, User};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskSort {
    /// Name, A to Z
    Asc,
    /// Name, Z to A
    Desc,
    /// Earliest due date first, undated last
    Due,
    /// Latest due date first, undated first
    DueDesc,
    /// Newest first
    CreatedAt,
}

impl TaskSort {
    pub fn apply(self, tasks: &mut [Task]) {
        match self {
            Self::Asc => tasks.sort_by(|a, b| a.name.cmp(&b.name)),
            Self::Desc => tasks.sort_by(|a, b| b.name.cmp(&a.name)),
            Self::Due => tasks.sort_by(|a, b| match (a.due_on, b.due_on) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            Self::DueDesc => tasks.sort_by(|a, b| match (a.due_on, b.due_on) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            }),
            Self::CreatedAt => tasks.sort_by(|a, b| match (a.created_at, b.created_at) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
        }
    }
}

/// Case-insensitive name ordering for projects, users and other named lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NameSort {
    Asc,
    Desc,
}

impl NameSort {
    pub fn apply<T>(self, items: &mut [T], name: impl Fn(&T) -> &str) {
        match self {
            Self::Asc => items.sort_by_cached_key(|item| name(item).to_lowercase()),
            Self::Desc => items.sort_by_cached_key(|item| Reverse(name(item).to_lowercase())),
        }
    }

    pub fn projects(self, projects: &mut [Project]) {
        self.apply(projects, |p| p.name.as_str());
    }

    pub fn users(self, users: &mut [User]) {
        self.apply(users, |u| u.name.as_str());
    }
}
