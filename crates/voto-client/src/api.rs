//! Data-access interfaces consumed by the pages
//!
//! Pages only see these traits. [`HttpApi`](crate::HttpApi) implements them
//! against the REST API; [`InMemoryApi`](crate::InMemoryApi) and
//! [`InMemoryReports`](crate::InMemoryReports) implement them for tests.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::watch;

use crate::error::Result;
use crate::import::VoterUpload;
use crate::resource::Resource;
use crate::types::{DashboardSummary, ImportReport, LogEntry, ResultadoData};

/// Query parameters of a list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Only the non-empty values, in a fixed order
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// CRUD over one resource collection
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    /// `GET /<resource>`
    async fn list(&self, query: &ListQuery) -> Result<Vec<R::Entity>>;

    /// `GET /<resource>/:id`
    async fn get(&self, id: u64) -> Result<R::Entity>;

    /// `POST /<resource>`
    async fn create(&self, draft: &R::Draft) -> Result<R::Entity>;

    /// `PUT /<resource>/:id`
    async fn update(&self, id: u64, draft: &R::Draft) -> Result<R::Entity>;

    /// `DELETE /<resource>/:id`
    async fn delete(&self, id: u64) -> Result<()>;
}

/// Read-only reports plus the voter import
#[async_trait]
pub trait ReportApi: Send + Sync {
    async fn dashboard_summary(&self) -> Result<DashboardSummary>;

    async fn audit_logs(&self) -> Result<Vec<LogEntry>>;

    async fn results(&self, eleicao_id: u64) -> Result<ResultadoData>;

    /// Raw CSV report
    async fn export_results(&self, eleicao_id: u64) -> Result<Bytes>;

    /// Upload a voter file; upload progress (0..=100) is published on
    /// `progress`
    async fn import_voters(
        &self,
        upload: &VoterUpload,
        progress: &watch::Sender<u8>,
    ) -> Result<ImportReport>;
}
