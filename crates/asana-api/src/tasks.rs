use serde::Serialize;

use crate::client::{Client, segment};
use crate::error::ApiError;
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::options::Options;

/// Filters for `GET /tasks`. Asana requires either a project/tag/section, or an
/// assignee together with a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// `now` or an ISO-8601 timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_since: Option<String>,
}

impl TaskQuery {
    /// Incomplete tasks assigned to the token owner in `workspace`.
    pub fn my_open_tasks(workspace: &str) -> Self {
        Self {
            assignee: Some("me".to_string()),
            workspace: Some(workspace.to_string()),
            completed_since: Some("now".to_string()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.assignee.is_some() != self.workspace.is_some() {
            return Err(ApiError::InvalidRequest(
                "assignee and workspace must be given together".to_string(),
            ));
        }
        if self.assignee.is_none()
            && self.project.is_none()
            && self.section.is_none()
            && self.tag.is_none()
        {
            return Err(ApiError::InvalidRequest(
                "task query needs a project, section, tag or assignee+workspace".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filters for `GET /workspaces/{gid}/tasks/search`. List-valued filters are sent
/// comma-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchTasksQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_subtype: Option<String>,
    #[serde(rename = "assignee.any", skip_serializing_if = "Vec::is_empty")]
    pub assignee_any: Vec<String>,
    #[serde(rename = "assignee.not", skip_serializing_if = "Vec::is_empty")]
    pub assignee_not: Vec<String>,
    #[serde(rename = "tags.all", skip_serializing_if = "Vec::is_empty")]
    pub tags_all: Vec<String>,
    #[serde(rename = "created_by.any", skip_serializing_if = "Vec::is_empty")]
    pub created_by_any: Vec<String>,
    #[serde(rename = "created_by.not", skip_serializing_if = "Vec::is_empty")]
    pub created_by_not: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
    #[serde(rename = "due_on.before", skip_serializing_if = "Option::is_none")]
    pub due_on_before: Option<String>,
    #[serde(rename = "due_on.after", skip_serializing_if = "Option::is_none")]
    pub due_on_after: Option<String>,
    #[serde(rename = "due_at.before", skip_serializing_if = "Option::is_none")]
    pub due_at_before: Option<String>,
    #[serde(rename = "due_at.after", skip_serializing_if = "Option::is_none")]
    pub due_at_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_ascending: Option<bool>,
}

impl SearchTasksQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.due_on.is_some() && (self.due_on_before.is_some() || self.due_on_after.is_some()) {
            return Err(ApiError::InvalidRequest(
                "due_on cannot be combined with due_on.before or due_on.after".to_string(),
            ));
        }
        Ok(())
    }
}

impl Client {
    pub fn list_tasks(
        &self,
        query: &TaskQuery,
        options: &Options,
        limit: usize,
    ) -> Result<Vec<Task>, ApiError> {
        query.validate()?;
        self.get_all("tasks", query, options, limit)
    }

    pub fn get_task(&self, gid: &str, options: &Options) -> Result<Task, ApiError> {
        let path = format!("tasks/{}", segment(gid)?);
        Ok(self.get(&path, &(), options)?.data)
    }

    pub fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        request.validate()?;
        self.post("tasks", request, &Options::default())
    }

    pub fn update_task(&self, gid: &str, request: &UpdateTaskRequest) -> Result<Task, ApiError> {
        request.validate()?;
        let path = format!("tasks/{}", segment(gid)?);
        self.put(&path, request, &Options::default())
    }

    pub fn delete_task(&self, gid: &str) -> Result<(), ApiError> {
        let path = format!("tasks/{}", segment(gid)?);
        self.delete(&path, &Options::default())
    }

    pub fn search_tasks(
        &self,
        workspace: &str,
        query: &SearchTasksQuery,
        options: &Options,
        limit: usize,
    ) -> Result<Vec<Task>, ApiError> {
        query.validate()?;
        let path = format!("workspaces/{}/tasks/search", segment(workspace)?);
        self.get_all(&path, query, options, limit)
    }
}
