use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::config::Config;
use crate::models::{ClientInfo, ProjectRecord};
use crate::report::{Buckets, ReportContext, render_wip_email};
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No active projects found")]
    NotFound { client_code: String },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A rendered WIP report and its summary counts
#[derive(Debug, Clone)]
pub struct WipReport {
    pub client_code: String,
    pub client_name: String,
    pub active_count: usize,
    pub completed_count: usize,
    pub html: String,
}

impl WipReport {
    pub fn project_count(&self) -> usize {
        self.active_count + self.completed_count
    }
}

/// Fetches, classifies and renders WIP reports
pub struct WipService {
    store: Arc<dyn RecordStore>,
    client_names: HashMap<String, String>,
    include_completed: bool,
    client_lookup: bool,
    completed_window_days: i64,
}

impl WipService {
    pub fn new(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            client_names: config.client_names(),
            include_completed: config.wip_include_completed,
            client_lookup: config.wip_client_lookup,
            completed_window_days: config.completed_window_days,
        }
    }

    pub async fn build_report(&self, client_code: &str) -> Result<WipReport, ReportError> {
        self.build_report_on(client_code, Local::now().date_naive())
            .await
    }

    pub async fn build_report_on(
        &self,
        client_code: &str,
        today: NaiveDate,
    ) -> Result<WipReport, ReportError> {
        let active = self.fetch_active(client_code).await;
        let completed = self.fetch_completed(client_code).await;
        let buckets = Buckets::classify(active, completed);

        if buckets.is_empty() {
            tracing::info!(client_code, "no projects to report");
            return Err(ReportError::NotFound {
                client_code: client_code.to_string(),
            });
        }

        let client = self.fetch_client(client_code).await;
        let client_name = self.resolve_client_name(client_code, client.as_ref(), &buckets);

        let context = ReportContext {
            client_name: client_name.clone(),
            header_image_url: client.and_then(|c| c.header_image_url),
            today,
        };
        let html = render_wip_email(&context, &buckets)?;

        tracing::info!(
            client_code,
            active = buckets.active_count(),
            completed = buckets.completed_count(),
            "WIP report rendered"
        );

        Ok(WipReport {
            client_code: client_code.to_string(),
            client_name,
            active_count: buckets.active_count(),
            completed_count: buckets.completed_count(),
            html,
        })
    }

    async fn fetch_active(&self, client_code: &str) -> Vec<ProjectRecord> {
        let result = self.store.active_projects(client_code).await;
        downgrade(result, client_code, "active projects")
    }

    async fn fetch_completed(&self, client_code: &str) -> Vec<ProjectRecord> {
        if !self.include_completed {
            return Vec::new();
        }
        let result = self
            .store
            .completed_projects(client_code, self.completed_window_days)
            .await;
        downgrade(result, client_code, "completed projects")
    }

    async fn fetch_client(&self, client_code: &str) -> Option<ClientInfo> {
        if !self.client_lookup {
            return None;
        }
        let result = self.store.client_info(client_code).await;
        downgrade(result, client_code, "client info")
    }

    fn resolve_client_name(
        &self,
        client_code: &str,
        client: Option<&ClientInfo>,
        buckets: &Buckets,
    ) -> String {
        if let Some(name) = self.client_names.get(client_code) {
            return name.clone();
        }

        client
            .map(|c| c.client_name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| buckets.client_name())
            .unwrap_or(client_code)
            .to_string()
    }
}

/// Store failures are logged and reported as "nothing found"
fn downgrade<T: Default>(result: Result<T, StoreError>, client_code: &str, what: &str) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(client_code, error = %err, "failed to fetch {what}");
        T::default()
    })
}
