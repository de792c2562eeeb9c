//! In-memory implementations of the data-access traits
//!
//! Used by tests and demos in place of a live API. Both fakes count calls,
//! can be told to fail the next call of an operation with a given HTTP
//! status, and can delay responses to exercise cancellation.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use crate::api::{ListQuery, ReportApi, ResourceApi};
use crate::error::{ApiError, Result};
use crate::filter::Searchable;
use crate::import::VoterUpload;
use crate::resource::Resource;
use crate::session::Session;
use crate::types::{DashboardSummary, ImportReport, LogEntry, ResultadoData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Turn an injected status into the error `HttpApi` would return
fn injected(session: Option<&Session>, status: u16) -> ApiError {
    if status == 401 {
        if let Some(session) = session {
            session.expire();
        }
        return ApiError::Unauthorized;
    }
    ApiError::status(status, "Falha simulada")
}

struct Store<E> {
    items: Vec<E>,
    next_id: u64,
    calls: HashMap<Operation, usize>,
    failures: HashMap<Operation, u16>,
}

/// One resource collection held in memory
pub struct InMemoryApi<R: Resource> {
    store: Mutex<Store<R::Entity>>,
    latency: Option<Duration>,
    session: Option<Session>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Default for InMemoryApi<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> InMemoryApi<R> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Seeded collection; new ids continue after the largest seeded id
    pub fn with_items(items: Vec<R::Entity>) -> Self {
        let next_id = items.iter().map(R::id).max().unwrap_or(0) + 1;
        Self {
            store: Mutex::new(Store {
                items,
                next_id,
                calls: HashMap::new(),
                failures: HashMap::new(),
            }),
            latency: None,
            session: None,
            _resource: PhantomData,
        }
    }

    /// Delay every response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Session expired by injected 401s
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Fail the next call of `op` with `status`
    pub fn fail_next(&self, op: Operation, status: u16) {
        self.store.lock().failures.insert(op, status);
    }

    pub fn calls(&self, op: Operation) -> usize {
        self.store.lock().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn items(&self) -> Vec<R::Entity> {
        self.store.lock().items.clone()
    }

    /// Record the call and return the injected failure, if any
    async fn enter(&self, op: Operation) -> Result<()> {
        let failure = {
            let mut store = self.store.lock();
            *store.calls.entry(op).or_default() += 1;
            store.failures.remove(&op)
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(status) => {
                debug!("Injected {} on {:?} {}", status, op, R::KIND);
                Err(injected(self.session.as_ref(), status))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for InMemoryApi<R> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R::Entity>> {
        self.enter(Operation::List).await?;
        let store = self.store.lock();

        let needle = query.search.as_deref().unwrap_or("").trim().to_lowercase();
        let matching = store
            .items
            .iter()
            .filter(|item| needle.is_empty() || item.matches(&needle));

        let items = match (query.page, query.limit) {
            (page, Some(limit)) => {
                let page = page.unwrap_or(1).max(1) as usize;
                matching
                    .skip((page - 1) * limit as usize)
                    .take(limit as usize)
                    .cloned()
                    .collect()
            }
            _ => matching.cloned().collect(),
        };
        Ok(items)
    }

    async fn get(&self, id: u64) -> Result<R::Entity> {
        self.enter(Operation::Get).await?;
        self.store
            .lock()
            .items
            .iter()
            .find(|item| R::id(item) == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(R::KIND.singular(), id))
    }

    async fn create(&self, draft: &R::Draft) -> Result<R::Entity> {
        self.enter(Operation::Create).await?;
        let mut store = self.store.lock();
        let id = store.next_id;
        store.next_id += 1;
        let entity = R::from_draft(id, draft, None);
        store.items.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: u64, draft: &R::Draft) -> Result<R::Entity> {
        self.enter(Operation::Update).await?;
        let mut store = self.store.lock();
        let slot = store
            .items
            .iter_mut()
            .find(|item| R::id(item) == id)
            .ok_or_else(|| ApiError::not_found(R::KIND.singular(), id))?;
        let updated = R::from_draft(id, draft, Some(&*slot));
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.enter(Operation::Delete).await?;
        let mut store = self.store.lock();
        let before = store.items.len();
        store.items.retain(|item| R::id(item) != id);
        if store.items.len() == before {
            return Err(ApiError::not_found(R::KIND.singular(), id));
        }
        Ok(())
    }
}

#[derive(Default)]
struct Reports {
    summary: Option<DashboardSummary>,
    logs: Vec<LogEntry>,
    results: HashMap<u64, ResultadoData>,
    import_report: ImportReport,
    calls: Vec<String>,
    failures: HashMap<&'static str, u16>,
}

/// Reports held in memory
///
/// Calls are logged as `"<operation>:<argument>"`, e.g. `"results:2"`.
#[derive(Default)]
pub struct InMemoryReports {
    state: Mutex<Reports>,
    latency: Option<Duration>,
    session: Option<Session>,
}

impl InMemoryReports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(self, summary: DashboardSummary) -> Self {
        self.state.lock().summary = Some(summary);
        self
    }

    pub fn with_logs(self, logs: Vec<LogEntry>) -> Self {
        self.state.lock().logs = logs;
        self
    }

    pub fn with_results(self, eleicao_id: u64, results: ResultadoData) -> Self {
        self.state.lock().results.insert(eleicao_id, results);
        self
    }

    pub fn with_import_report(self, report: ImportReport) -> Self {
        self.state.lock().import_report = report;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Fail the next call of `operation` (`"summary"`, `"logs"`,
    /// `"results"`, `"export"` or `"import"`)
    pub fn fail_next(&self, operation: &'static str, status: u16) {
        self.state.lock().failures.insert(operation, status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    async fn enter(&self, operation: &'static str, argument: impl std::fmt::Display) -> Result<()> {
        let failure = {
            let mut state = self.state.lock();
            state.calls.push(format!("{}:{}", operation, argument));
            state.failures.remove(operation)
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(status) => Err(injected(self.session.as_ref(), status)),
            None => Ok(()),
        }
    }

    fn results_for(&self, eleicao_id: u64) -> Result<ResultadoData> {
        self.state
            .lock()
            .results
            .get(&eleicao_id)
            .cloned()
            .ok_or_else(|| ApiError::status(404, "Resultados não encontrados"))
    }
}

#[async_trait]
impl ReportApi for InMemoryReports {
    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.enter("summary", "").await?;
        self.state
            .lock()
            .summary
            .clone()
            .ok_or_else(|| ApiError::status(404, "Resumo indisponível"))
    }

    async fn audit_logs(&self) -> Result<Vec<LogEntry>> {
        self.enter("logs", "").await?;
        Ok(self.state.lock().logs.clone())
    }

    async fn results(&self, eleicao_id: u64) -> Result<ResultadoData> {
        self.enter("results", eleicao_id).await?;
        self.results_for(eleicao_id)
    }

    async fn export_results(&self, eleicao_id: u64) -> Result<Bytes> {
        self.enter("export", eleicao_id).await?;
        let results = self.results_for(eleicao_id)?;
        let mut csv = String::from("candidato,votos\n");
        for candidate in &results.votos_por_candidato {
            csv.push_str(&format!("{},{}\n", candidate.nome, candidate.votos));
        }
        csv.push_str(&format!("Brancos,{}\n", results.votos_brancos));
        csv.push_str(&format!("Nulos,{}\n", results.votos_nulos));
        Ok(Bytes::from(csv))
    }

    async fn import_voters(
        &self,
        upload: &VoterUpload,
        progress: &watch::Sender<u8>,
    ) -> Result<ImportReport> {
        self.enter("import", &upload.file_name).await?;
        for percent in [25, 50, 75, 99] {
            progress.send_replace(percent);
        }
        Ok(self.state.lock().import_report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Route;
    use crate::session::{MemoryNavigator, Navigator};
    use crate::session::MemoryTokenStore;
    use crate::types::{Eleitor, EleitorDraft, Eleitores};
    use std::sync::Arc;

    fn eleitor(id: u64, nome: &str) -> Eleitor {
        Eleitor {
            id,
            nome: nome.to_string(),
            cpf: format!("{:011}", id),
            matricula: format!("M{}", id),
        }
    }

    #[tokio::test]
    async fn test_crud_and_counters() {
        let api = InMemoryApi::<Eleitores>::with_items(vec![eleitor(4, "Ana")]);
        let draft = EleitorDraft {
            nome: "Bruno".into(),
            cpf: "123.456.789-01".into(),
            matricula: "77".into(),
        };

        let created = api.create(&draft).await.unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(created.cpf, "12345678901");

        let updated = api
            .update(5, &EleitorDraft {
                nome: "Bruno Lima".into(),
                ..draft.clone()
            })
            .await
            .unwrap();
        assert_eq!(updated.nome, "Bruno Lima");

        api.delete(4).await.unwrap();
        assert!(matches!(api.get(4).await, Err(ApiError::NotFound { .. })));
        assert_eq!(api.calls(Operation::Delete), 1);
        assert_eq!(api.items().len(), 1);
    }

    #[tokio::test]
    async fn test_server_side_search_and_pages() {
        let items = (1..=25).map(|i| eleitor(i, &format!("Eleitor {}", i))).collect();
        let api = InMemoryApi::<Eleitores>::with_items(items);

        let page = api.list(&ListQuery::default().with_page(3, 10)).await.unwrap();
        assert_eq!(page.iter().map(|e| e.id).collect::<Vec<_>>(), (21..=25).collect::<Vec<_>>());

        let found = api.list(&ListQuery::search("eleitor 2")).await.unwrap();
        assert_eq!(found.len(), 7);
    }

    #[tokio::test]
    async fn test_injected_401_expires_session() {
        let navigator = Arc::new(MemoryNavigator::new(Route::List(Eleitores::KIND)));
        let session = Session::new(Arc::new(MemoryTokenStore::with_token("t")), navigator.clone());
        let api = InMemoryApi::<Eleitores>::new().with_session(session.clone());

        api.fail_next(Operation::List, 401);
        assert!(matches!(
            api.list(&ListQuery::default()).await,
            Err(ApiError::Unauthorized)
        ));
        assert_eq!(session.token(), None);
        assert_eq!(navigator.current(), Route::Login);

        assert!(api.list(&ListQuery::default()).await.is_ok());
    }
}
