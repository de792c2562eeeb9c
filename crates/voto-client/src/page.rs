//! List-and-manage page shared by every resource, and the create/edit
//! flow behind its form routes

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::{ListQuery, ResourceApi};
use crate::error::ApiError;
use crate::filter::filter_by_search;
use crate::notify::{Notification, Notifier, describe};
use crate::render::Table;
use crate::resource::{Resource, ResourceKind};
use crate::route::Route;
use crate::session::Session;

/// Load state of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Resolves once `rx` reports disposal
pub(crate) async fn disposed(rx: &mut watch::Receiver<bool>) {
    loop {
        let done = *rx.borrow_and_update();
        if done {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Confirmation shown before a delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDialog {
    pub id: u64,
    pub label: String,
    pub message: String,
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Urna Removida`, `Candidato Criado`, ...
fn outcome_title(kind: ResourceKind, stem: &str) -> String {
    format!("{} {}", capitalize(kind.singular()), capitalize(&kind.agree(stem)))
}

/// `A urna 0042 foi removida com sucesso.`
fn outcome_message(kind: ResourceKind, label: &str, stem: &str) -> String {
    format!(
        "{} {} {} foi {} com sucesso.",
        kind.article(),
        kind.singular(),
        label,
        kind.agree(stem)
    )
}

struct ListState<E> {
    query: ListQuery,
    items: Vec<E>,
    state: LoadState,
}

/// Fetch, search and delete over one resource
///
/// Every method takes `&self` so the page can be shared with the task that
/// disposes it. A response that arrives after [`dispose`](Self::dispose), or
/// after a newer load started, is dropped without touching the page.
pub struct ListPage<R: Resource> {
    api: Arc<dyn ResourceApi<R>>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<ListState<R::Entity>>,
    generation: AtomicU64,
    cancel: watch::Sender<bool>,
}

impl<R: Resource> ListPage<R> {
    pub fn new(api: Arc<dyn ResourceApi<R>>, notifier: Arc<dyn Notifier>) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            api,
            notifier,
            inner: Mutex::new(ListState {
                query: ListQuery::default(),
                items: Vec::new(),
                state: LoadState::Idle,
            }),
            generation: AtomicU64::new(0),
            cancel,
        }
    }

    /// Query sent with the next loads
    pub fn set_query(&self, query: ListQuery) {
        self.inner.lock().query = query;
    }

    pub fn state(&self) -> LoadState {
        self.inner.lock().state.clone()
    }

    pub fn items(&self) -> Vec<R::Entity> {
        self.inner.lock().items.clone()
    }

    pub fn is_disposed(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Stop accepting responses and abort the in-flight load
    pub fn dispose(&self) {
        debug!("Disposing {} page", R::KIND);
        self.cancel.send_replace(true);
    }

    /// Fetch the list; failures become an error notification and leave the
    /// previous items in place
    pub async fn load(&self) -> LoadState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut cancel = self.cancel.subscribe();
        if self.is_disposed() {
            return self.state();
        }

        let query = {
            let mut inner = self.inner.lock();
            inner.state = LoadState::Loading;
            inner.query.clone()
        };
        debug!("Loading {} (generation {})", R::KIND, generation);

        let result = tokio::select! {
            result = self.api.list(&query) => result,
            _ = disposed(&mut cancel) => Err(ApiError::Cancelled),
        };

        if self.is_disposed() || self.generation.load(Ordering::SeqCst) != generation {
            debug!("Dropping stale {} response (generation {})", R::KIND, generation);
            return self.state();
        }

        match result {
            Ok(items) => {
                let mut inner = self.inner.lock();
                debug!("Loaded {} {}", items.len(), R::KIND);
                inner.items = items;
                inner.state = LoadState::Loaded;
                inner.state.clone()
            }
            Err(e) => {
                let failed = LoadState::Failed(describe(&e));
                self.inner.lock().state = failed.clone();
                self.notifier.notify(Notification::from_error(
                    format!("Erro ao carregar {}", R::KIND.title().to_lowercase()),
                    &e,
                ));
                failed
            }
        }
    }

    /// Loaded items matching the search box
    pub fn visible(&self, search: &str) -> Vec<R::Entity> {
        let inner = self.inner.lock();
        filter_by_search(&inner.items, search)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Table of the visible items, with an explicit row when nothing matches
    pub fn table(&self, search: &str) -> Table {
        let visible = self.visible(search);
        Table::from_items(&visible, R::KIND.empty_message())
    }

    /// Dialog naming the entity to delete; `None` if it is not loaded
    pub fn request_delete(&self, id: u64) -> Option<DeleteDialog> {
        let inner = self.inner.lock();
        let entity = inner.items.iter().find(|item| R::id(item) == id)?;
        Some(self.delete_dialog(entity))
    }

    /// Dialog for an entity fetched on its own, e.g. one outside the loaded page
    pub fn delete_dialog(&self, entity: &R::Entity) -> DeleteDialog {
        let label = R::label(entity);
        DeleteDialog {
            id: R::id(entity),
            message: format!(
                "Tem certeza que deseja remover {} {} {}? Esta ação não pode ser desfeita.",
                R::KIND.article().to_lowercase(),
                R::KIND.singular(),
                label
            ),
            label,
        }
    }

    /// Issue one DELETE; refetch only after it succeeded
    pub async fn confirm_delete(&self, dialog: DeleteDialog) -> bool {
        info!("Deleting {} {}", R::KIND.singular(), dialog.id);
        match self.api.delete(dialog.id).await {
            Ok(()) => {
                self.notifier.notify(Notification::success(
                    outcome_title(R::KIND, "Removid"),
                    outcome_message(R::KIND, &dialog.label, "removid"),
                ));
                if !self.is_disposed() {
                    self.load().await;
                }
                true
            }
            Err(e) => {
                self.notifier.notify(Notification::from_error(
                    format!("Erro ao remover {}", R::KIND.singular()),
                    &e,
                ));
                false
            }
        }
    }

    /// Closing the dialog has no effect
    pub fn cancel_delete(&self, dialog: DeleteDialog) {
        debug!("Delete of {} {} cancelled", R::KIND.singular(), dialog.id);
    }

    pub fn create_route(&self) -> Route {
        Route::New(R::KIND)
    }

    pub fn edit_route(&self, id: u64) -> Route {
        Route::Edit(R::KIND, id)
    }
}

/// Create and edit flow behind `/<resource>/novo` and `/<resource>/editar/:id`
pub struct EntityEditor<R: Resource> {
    api: Arc<dyn ResourceApi<R>>,
    notifier: Arc<dyn Notifier>,
    session: Session,
}

impl<R: Resource> EntityEditor<R> {
    pub fn new(api: Arc<dyn ResourceApi<R>>, notifier: Arc<dyn Notifier>, session: Session) -> Self {
        Self {
            api,
            notifier,
            session,
        }
    }

    /// Entity to pre-fill the edit form with
    pub async fn load(&self, id: u64) -> Option<R::Entity> {
        match self.api.get(id).await {
            Ok(entity) => Some(entity),
            Err(e) => {
                self.notifier.notify(Notification::from_error(
                    format!("Erro ao carregar {}", R::KIND.singular()),
                    &e,
                ));
                None
            }
        }
    }

    pub async fn create(&self, draft: R::Draft) -> Option<R::Entity> {
        match self.api.create(&draft).await {
            Ok(entity) => {
                self.notifier.notify(Notification::success(
                    outcome_title(R::KIND, "Criad"),
                    outcome_message(R::KIND, &R::label(&entity), "criad"),
                ));
                self.session.navigate(Route::List(R::KIND));
                Some(entity)
            }
            Err(e) => {
                self.notifier.notify(Notification::from_error(
                    format!("Erro ao criar {}", R::KIND.singular()),
                    &e,
                ));
                None
            }
        }
    }

    pub async fn update(&self, id: u64, draft: R::Draft) -> Option<R::Entity> {
        match self.api.update(id, &draft).await {
            Ok(entity) => {
                self.notifier.notify(Notification::success(
                    outcome_title(R::KIND, "Atualizad"),
                    outcome_message(R::KIND, &R::label(&entity), "atualizad"),
                ));
                self.session.navigate(Route::List(R::KIND));
                Some(entity)
            }
            Err(e) => {
                self.notifier.notify(Notification::from_error(
                    format!("Erro ao atualizar {}", R::KIND.singular()),
                    &e,
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Urnas;

    #[test]
    fn test_outcome_wording_agrees_with_gender() {
        assert_eq!(outcome_title(ResourceKind::Urnas, "Removid"), "Urna Removida");
        assert_eq!(outcome_title(ResourceKind::Eleicoes, "Criad"), "Eleição Criada");
        assert_eq!(
            outcome_title(ResourceKind::Candidatos, "Atualizad"),
            "Candidato Atualizado"
        );
        assert_eq!(
            outcome_message(ResourceKind::Urnas, "0042", "removid"),
            "A urna 0042 foi removida com sucesso."
        );
    }

    #[test]
    fn test_routes() {
        let page = ListPage::<Urnas>::new(
            Arc::new(crate::memory::InMemoryApi::<Urnas>::new()),
            Arc::new(crate::notify::NotificationLog::new()),
        );
        assert_eq!(page.create_route().to_string(), "/urnas/novo");
        assert_eq!(page.edit_route(3).to_string(), "/urnas/editar/3");
        assert_eq!(page.state(), LoadState::Idle);
    }
}
