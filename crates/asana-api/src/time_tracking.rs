use crate::client::{Client, segment};
use crate::error::ApiError;
use crate::models::{CreateTimeTrackingEntryRequest, TimeTrackingEntry};
use crate::options::Options;

impl Client {
    pub fn task_time_entries(
        &self,
        task: &str,
        options: &Options,
    ) -> Result<Vec<TimeTrackingEntry>, ApiError> {
        let path = format!("tasks/{}/time_tracking_entries", segment(task)?);
        self.get_all(&path, &(), options, 0)
    }

    pub fn create_time_entry(
        &self,
        task: &str,
        request: &CreateTimeTrackingEntryRequest,
    ) -> Result<TimeTrackingEntry, ApiError> {
        request.validate()?;
        let path = format!("tasks/{}/time_tracking_entries", segment(task)?);
        self.post(&path, request, &Options::default())
    }

    pub fn delete_time_entry(&self, gid: &str) -> Result<(), ApiError> {
        tracing::debug!(gid, "removing time tracking entry");
        let path = format!("time_tracking_entries/{}", segment(gid)?);
        self.delete(&path, &Options::default())
    }
}
