mod airtable;
mod fields;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ClientInfo, ProjectRecord};

pub use airtable::AirtableStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record store API key configured")]
    MissingApiKey,
    #[error("record store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("record store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Read access to the project and client tables
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// In-progress and on-hold projects whose job number starts with `client_code`
    async fn active_projects(&self, client_code: &str) -> Result<Vec<ProjectRecord>, StoreError>;

    /// Projects completed within the last `window_days`, most recent first
    async fn completed_projects(
        &self,
        client_code: &str,
        window_days: i64,
    ) -> Result<Vec<ProjectRecord>, StoreError>;

    /// Clients-table entry for `client_code`, if there is one
    async fn client_info(&self, client_code: &str) -> Result<Option<ClientInfo>, StoreError>;
}

/// Quote `value` as a string literal inside a filter formula
pub(crate) fn formula_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

pub(crate) fn active_projects_formula(client_code: &str) -> String {
    format!(
        "AND(FIND({}, {{Job Number}})=1, OR({{Status}}='In Progress', {{Status}}='On Hold'))",
        formula_literal(client_code)
    )
}

pub(crate) fn completed_projects_formula(client_code: &str, window_days: i64) -> String {
    format!(
        "AND(FIND({}, {{Job Number}})=1, {{Status}}='Completed', IS_AFTER({{Status Changed}}, DATEADD(TODAY(), -{}, 'days')))",
        formula_literal(client_code),
        window_days
    )
}

pub(crate) fn client_info_formula(client_code: &str) -> String {
    format!("{{Client code}}={}", formula_literal(client_code))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// In-memory store. A `None` list makes that call fail.
    #[derive(Default)]
    pub struct FakeStore {
        pub active: Option<Vec<ProjectRecord>>,
        pub completed: Option<Vec<ProjectRecord>>,
        pub client: Option<ClientInfo>,
        pub fail_client_lookup: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeStore {
        pub fn with_active(active: Vec<ProjectRecord>) -> Self {
            Self {
                active: Some(active),
                completed: Some(Vec::new()),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn active_projects(
            &self,
            client_code: &str,
        ) -> Result<Vec<ProjectRecord>, StoreError> {
            self.record(format!("active:{client_code}"));
            self.active.clone().ok_or(StoreError::MissingApiKey)
        }

        async fn completed_projects(
            &self,
            client_code: &str,
            window_days: i64,
        ) -> Result<Vec<ProjectRecord>, StoreError> {
            self.record(format!("completed:{client_code}:{window_days}"));
            self.completed.clone().ok_or(StoreError::MissingApiKey)
        }

        async fn client_info(&self, client_code: &str) -> Result<Option<ClientInfo>, StoreError> {
            self.record(format!("client:{client_code}"));
            if self.fail_client_lookup {
                return Err(StoreError::MissingApiKey);
            }
            Ok(self.client.clone())
        }
    }

    pub fn project(job_number: &str, status: &str, with_client: bool) -> ProjectRecord {
        ProjectRecord {
            job_number: job_number.to_string(),
            job_name: format!("{job_number} name"),
            status: status.to_string(),
            with_client,
            ..ProjectRecord::default()
        }
    }
}
