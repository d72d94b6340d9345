use crate::client::{Client, segment};
use crate::error::ApiError;
use crate::models::User;
use crate::options::Options;

impl Client {
    /// The user that owns the bearer token.
    pub fn current_user(&self) -> Result<User, ApiError> {
        let options = Options::fields(["name", "email", "workspaces.name"]);
        Ok(self.get("users/me", &(), &options)?.data)
    }

    pub fn get_user(&self, gid: &str) -> Result<User, ApiError> {
        let path = format!("users/{}", segment(gid)?);
        Ok(self.get(&path, &(), &Options::fields(["name", "email"]))?.data)
    }

    pub fn list_users(&self, workspace: &str, limit: usize) -> Result<Vec<User>, ApiError> {
        let path = format!("workspaces/{}/users", segment(workspace)?);
        self.get_all(&path, &(), &Options::fields(["name", "email"]), limit)
    }
}
