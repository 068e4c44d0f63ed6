use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::fields::{self, Fields};
use super::{
    RecordStore, StoreError, active_projects_formula, client_info_formula,
    completed_projects_formula,
};
use crate::config::Config;
use crate::models::{ClientInfo, ProjectRecord};

#[derive(Debug, Default, Deserialize)]
struct ListRecordsResponse {
    #[serde(default)]
    records: Vec<StoreRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct StoreRecord {
    #[serde(default)]
    fields: Fields,
}

/// Record store backed by the Airtable REST API
pub struct AirtableStore {
    http: Client,
    api_key: Option<String>,
    api_url: String,
    base_id: String,
    projects_table: String,
    clients_table: String,
}

impl AirtableStore {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            api_key: config.airtable_api_key.clone().filter(|key| !key.is_empty()),
            api_url: config.airtable_api_url.trim_end_matches('/').to_string(),
            base_id: config.airtable_base_id.clone(),
            projects_table: config.airtable_projects_table.clone(),
            clients_table: config.airtable_clients_table.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.api_url, self.base_id, table)
    }

    async fn list_records(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<Fields>, StoreError> {
        let api_key = self.api_key.as_deref().ok_or(StoreError::MissingApiKey)?;

        let response = self
            .http
            .get(self.table_url(table))
            .bearer_auth(api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let listing: ListRecordsResponse = response.json().await?;
        tracing::debug!(table, count = listing.records.len(), "records fetched");

        Ok(listing.records.into_iter().map(|r| r.fields).collect())
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn active_projects(&self, client_code: &str) -> Result<Vec<ProjectRecord>, StoreError> {
        let query = [("filterByFormula", active_projects_formula(client_code))];
        let records = self.list_records(&self.projects_table, &query).await?;

        Ok(records.iter().map(fields::project_from_fields).collect())
    }

    async fn completed_projects(
        &self,
        client_code: &str,
        window_days: i64,
    ) -> Result<Vec<ProjectRecord>, StoreError> {
        let query = [
            (
                "filterByFormula",
                completed_projects_formula(client_code, window_days),
            ),
            ("sort[0][field]", "Status Changed".to_string()),
            ("sort[0][direction]", "desc".to_string()),
        ];
        let records = self.list_records(&self.projects_table, &query).await?;

        Ok(records.iter().map(fields::project_from_fields).collect())
    }

    async fn client_info(&self, client_code: &str) -> Result<Option<ClientInfo>, StoreError> {
        let query = [("filterByFormula", client_info_formula(client_code))];
        let records = self.list_records(&self.clients_table, &query).await?;

        Ok(records.first().map(fields::client_from_fields))
    }
}
