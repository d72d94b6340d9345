use serde::Serialize;

use crate::client::{Client, segment};
use crate::error::ApiError;
use crate::models::{Project, Section, Task};
use crate::options::Options;

#[derive(Debug, Serialize)]
struct ProjectQuery<'a> {
    workspace: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    archived: Option<bool>,
}

impl Client {
    /// Projects of a workspace. `archived: None` returns both archived and active ones.
    pub fn list_projects(
        &self,
        workspace: &str,
        archived: Option<bool>,
        limit: usize,
    ) -> Result<Vec<Project>, ApiError> {
        let query = ProjectQuery {
            workspace: segment(workspace)?,
            archived,
        };
        let options = Options::fields(["name", "archived", "color", "created_at", "due_on"]);
        self.get_all("projects", &query, &options, limit)
    }

    pub fn get_project(&self, gid: &str) -> Result<Project, ApiError> {
        let path = format!("projects/{}", segment(gid)?);
        let options = Options::fields(["name", "archived", "owner.name", "due_on", "permalink_url"]);
        Ok(self.get(&path, &(), &options)?.data)
    }

    pub fn project_tasks(
        &self,
        project: &str,
        options: &Options,
        limit: usize,
    ) -> Result<Vec<Task>, ApiError> {
        let path = format!("projects/{}/tasks", segment(project)?);
        self.get_all(&path, &(), options, limit)
    }

    pub fn list_sections(&self, project: &str) -> Result<Vec<Section>, ApiError> {
        let path = format!("projects/{}/sections", segment(project)?);
        self.get_all(&path, &(), &Options::fields(["name"]), 0)
    }

    pub fn section_tasks(
        &self,
        section: &str,
        options: &Options,
        limit: usize,
    ) -> Result<Vec<Task>, ApiError> {
        let path = format!("sections/{}/tasks", segment(section)?);
        self.get_all(&path, &(), options, limit)
    }
}
