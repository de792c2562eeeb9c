//! Client library for the Voto Seguro administration API
//!
//! This crate holds everything the admin dashboard needs to talk to the
//! electronic-voting backend: the typed HTTP client, the session and route
//! gate, form validation, client-side search and the page controllers that
//! drive the list, form, results and import screens.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use voto_client::{
//!     ClientConfig, FileTokenStore, HttpApi, ListPage, MemoryNavigator, NotificationLog,
//!     Route, Session, Urnas,
//! };
//!
//! # async fn run() -> voto_client::Result<()> {
//! let session = Session::new(
//!     Arc::new(FileTokenStore::new("/tmp/voto-token")),
//!     Arc::new(MemoryNavigator::new(Route::Dashboard)),
//! );
//! let api = Arc::new(HttpApi::new(ClientConfig::from_env()?, session)?);
//! let page = ListPage::<Urnas>::new(api, Arc::new(NotificationLog::new()));
//! page.load().await;
//! println!("{}", page.table(""));
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! - `VOTO_API_URL`: base URL of the API (default: `http://localhost:3000/api`)
//! - `VOTO_API_PREFIX`: version prefix of resource paths (default: `/v1`)
//! - `VOTO_HTTP_TIMEOUT_SECS`: request timeout (default: 30)

pub mod api;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod election_candidates;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod forms;
pub mod import;
pub mod memory;
pub mod notify;
pub mod page;
pub mod render;
pub mod resource;
pub mod results;
pub mod route;
pub mod session;
pub mod types;

pub use api::{ListQuery, ReportApi, ResourceApi};
pub use client::HttpApi;
pub use config::ClientConfig;
pub use dashboard::{DashboardPage, NavItem};
pub use election_candidates::ElectionCandidates;
pub use error::{ApiError, Result};
pub use filter::{Debouncer, LogFilter, Searchable, distinct_actions, filter_by_search};
pub use forms::{FieldErrors, Form, FormController, FormOutcome};
pub use import::{ImportPage, VoterUpload, preview_csv};
pub use memory::{InMemoryApi, InMemoryReports, Operation};
pub use notify::{Notification, NotificationKind, NotificationLog, Notifier};
pub use page::{DeleteDialog, EntityEditor, ListPage, LoadState};
pub use render::{StatCard, Table, Tabular, format_count, format_datetime};
pub use resource::{Resource, ResourceKind};
pub use results::{ChartSeries, ResultsPage, export_file_name};
pub use route::Route;
pub use session::{
    AuthGate, FileTokenStore, GateDecision, MemoryNavigator, MemoryTokenStore, Navigator,
    Session, TokenStore,
};
pub use types::{
    Candidato, Candidatos, DashboardSummary, Eleicao, Eleicoes, Eleitor, Eleitores, ImportReport,
    LogEntry, ResultadoData, Urna, Urnas,
};
