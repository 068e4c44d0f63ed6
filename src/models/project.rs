pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_ON_HOLD: &str = "On Hold";

/// One project row from the projects table, normalized.
///
/// Missing text fields are empty strings and a missing `with_client` flag is `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRecord {
    pub job_number: String,
    pub job_name: String,
    pub description: String,
    pub stage: String,
    pub status: String,
    pub with_client: bool,
    pub latest_update: String,
    pub update_due: String,
    pub live_date: String,
    pub client: String,
    pub project_owner: String,
    /// Only populated by the completed-projects query
    pub status_changed: String,
}

impl ProjectRecord {
    pub fn is_in_progress(&self) -> bool {
        self.status == STATUS_IN_PROGRESS
    }

    pub fn is_on_hold(&self) -> bool {
        self.status == STATUS_ON_HOLD
    }
}
