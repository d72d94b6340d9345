use clap::{Parser, Subcommand};

use crate::commands::{auth, config, projects, tags, tasks, teams, time, users, workspaces};

#[derive(Debug, Parser)]
#[command(name = "asana", about = "Work with Asana from the command line", version)]
pub struct Cli {
    /// Log HTTP requests and other diagnostics to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, log out and inspect the stored credential.
    Auth {
        #[command(subcommand)]
        command: auth::AuthCommand,
    },
    /// List, view, create, update and search tasks.
    #[command(visible_alias = "ts")]
    Tasks {
        #[command(subcommand)]
        command: tasks::TasksCommand,
    },
    /// Projects of the default workspace.
    #[command(visible_alias = "ps")]
    Projects {
        #[command(subcommand)]
        command: projects::ProjectsCommand,
    },
    /// Workspaces you belong to.
    #[command(visible_alias = "ws")]
    Workspaces {
        #[command(subcommand)]
        command: workspaces::WorkspacesCommand,
    },
    /// Tags of the default workspace.
    Tags {
        #[command(subcommand)]
        command: tags::TagsCommand,
    },
    /// Users of the default workspace.
    Users {
        #[command(subcommand)]
        command: users::UsersCommand,
    },
    /// Teams of the default workspace.
    Teams {
        #[command(subcommand)]
        command: teams::TeamsCommand,
    },
    /// Log and inspect tracked time.
    Time {
        #[command(subcommand)]
        command: time::TimeCommand,
    },
    /// Read and change local settings.
    Config {
        #[command(subcommand)]
        command: config::ConfigCommand,
    },
}

impl Command {
    /// `auth` and `config` manage their own credential checks.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Auth { .. } | Self::Config { .. })
    }
}
