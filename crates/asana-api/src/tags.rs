use serde::Serialize;

use crate::client::{Client, segment};
use crate::error::ApiError;
use crate::models::{Tag, Task};
use crate::options::Options;

#[derive(Serialize)]
struct WorkspaceQuery<'a> {
    workspace: &'a str,
}

impl Client {
    pub fn list_tags(&self, workspace: &str, limit: usize) -> Result<Vec<Tag>, ApiError> {
        let query = WorkspaceQuery {
            workspace: segment(workspace)?,
        };
        self.get_all("tags", &query, &Options::fields(["name", "color"]), limit)
    }

    pub fn get_tag(&self, gid: &str) -> Result<Tag, ApiError> {
        let path = format!("tags/{}", segment(gid)?);
        Ok(self.get(&path, &(), &Options::fields(["name", "color"]))?.data)
    }

    pub fn tag_tasks(&self, tag: &str, options: &Options, limit: usize) -> Result<Vec<Task>, ApiError> {
        let path = format!("tags/{}/tasks", segment(tag)?);
        self.get_all(&path, &(), options, limit)
    }
}
