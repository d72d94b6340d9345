#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use asana_cli::{Command, Context, PromptError, Prompter, commands};
use asana_common::{AsanaConfig, ConfigStore, DefaultWorkspace};
use asana_secrets::{CredentialStore, MemoryStore};
use chrono::NaiveDate;
use httpmock::MockServer;
use tempfile::TempDir;

pub const TOKEN: &str = "0/abcdef123456";

#[derive(Debug, Clone)]
pub enum Answer {
    Select(usize),
    Confirm(bool),
    Text(String),
    Cancel,
}

/// Replays canned answers in order and fails the prompt when the script runs dry.
#[derive(Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<Answer>>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            asked: Arc::default(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().expect("lock").len()
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("lock").clone()
    }

    fn next(&self, message: &str) -> Result<Answer, PromptError> {
        self.asked.lock().expect("lock").push(message.to_string());
        match self.answers.lock().expect("lock").pop_front() {
            Some(Answer::Cancel) => Err(PromptError::Cancelled),
            Some(answer) => Ok(answer),
            None => Err(PromptError::Io(format!("no scripted answer for {message:?}"))),
        }
    }

    fn text(&self, message: &str) -> Result<String, PromptError> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text),
            other => Err(PromptError::Io(format!("expected text for {message:?}, got {other:?}"))),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, message: &str, options: &[String]) -> Result<usize, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        match self.next(message)? {
            Answer::Select(index) => Ok(index),
            other => Err(PromptError::Io(format!("expected select for {message:?}, got {other:?}"))),
        }
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool, PromptError> {
        match self.next(message)? {
            Answer::Confirm(yes) => Ok(yes),
            other => Err(PromptError::Io(format!("expected confirm for {message:?}, got {other:?}"))),
        }
    }

    fn input(&self, message: &str, _default: &str) -> Result<String, PromptError> {
        self.text(message)
    }

    fn token(&self) -> Result<String, PromptError> {
        self.text("token")
    }

    fn editor(&self, message: &str, _prefill: &str) -> Result<String, PromptError> {
        self.text(message)
    }
}

pub struct Harness {
    pub server: MockServer,
    pub dir: TempDir,
    pub credentials: Arc<MemoryStore>,
    pub prompter: ScriptedPrompter,
}

impl Harness {
    /// Logged-in user with workspace `7` ("Acme") as default.
    pub fn logged_in() -> Self {
        let harness = Self::empty();
        harness.credentials.set(TOKEN).expect("store token");
        harness
            .store()
            .save(&AsanaConfig {
                username: Some("Ada Lovelace".to_string()),
                workspace: Some(DefaultWorkspace {
                    gid: "7".to_string(),
                    name: "Acme".to_string(),
                }),
                ..AsanaConfig::default()
            })
            .expect("save config");
        harness
    }

    /// No token and no config file.
    pub fn empty() -> Self {
        colored::control::set_override(false);
        Self {
            server: MockServer::start(),
            dir: tempfile::tempdir().expect("tempdir"),
            credentials: Arc::new(MemoryStore::default()),
            prompter: ScriptedPrompter::default(),
        }
    }

    pub fn answers(mut self, answers: impl IntoIterator<Item = Answer>) -> Self {
        self.prompter = ScriptedPrompter::new(answers);
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("asana").join("config.toml")
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::at_path(self.config_path())
    }

    pub fn context(&self) -> Context {
        let credentials: Arc<dyn CredentialStore> = self.credentials.clone();
        Context::new(self.store(), credentials, Box::new(self.prompter.clone()))
            .with_base_url(Some(self.server.url("/api/1.0")))
            .with_today(today())
    }

    /// Runs a command and returns its stdout.
    pub fn run(&self, command: Command) -> anyhow::Result<String> {
        let mut out = Vec::new();
        commands::run(&self.context(), command, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }
}

/// A Wednesday.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 8).expect("date")
}

pub fn parse(args: &[&str]) -> Command {
    use clap::Parser;
    let mut argv = vec!["asana"];
    argv.extend_from_slice(args);
    asana_cli::Cli::try_parse_from(argv).expect("parse args").command
}
