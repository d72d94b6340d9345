use crate::client::{Client, segment};
use crate::error::ApiError;
use crate::models::{Team, Workspace};
use crate::options::Options;

impl Client {
    pub fn list_workspaces(&self, limit: usize) -> Result<Vec<Workspace>, ApiError> {
        self.get_all(
            "workspaces",
            &(),
            &Options::fields(["name", "is_organization"]),
            limit,
        )
    }

    pub fn list_teams(&self, workspace: &str, limit: usize) -> Result<Vec<Team>, ApiError> {
        let path = format!("workspaces/{}/teams", segment(workspace)?);
        self.get_all(&path, &(), &Options::fields(["name", "description"]), limit)
    }
}
