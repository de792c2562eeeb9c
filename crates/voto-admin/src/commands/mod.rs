//! Command handlers
//!
//! Every handler drives one page controller of `voto-client` and prints
//! what the page would show. API failures surface as notifications and do
//! not change the exit code; invalid forms and a refused gate do.

pub mod auditoria;
pub mod auth;
pub mod candidatos;
pub mod dashboard;
pub mod eleicoes;
pub mod eleitores;
pub mod resources;
pub mod resultados;
pub mod urnas;

use anyhow::{Result, anyhow, bail};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use voto_client::{
    AuthGate, ClientConfig, FieldErrors, FileTokenStore, GateDecision, HttpApi, MemoryNavigator,
    NotificationLog, Notifier, ReportApi, Resource, ResourceApi, Route, Session,
};

/// Session, client and notification sink of one invocation
pub struct AdminContext {
    pub session: Session,
    pub api: Arc<HttpApi>,
    pub notifications: Arc<NotificationLog>,
    token_file: PathBuf,
}

impl AdminContext {
    /// The navigator starts on `route`, the screen the command stands for
    pub fn new(config: ClientConfig, token_file: PathBuf, route: Route) -> Result<Self> {
        debug!("Token file: {}", token_file.display());
        let session = Session::new(
            Arc::new(FileTokenStore::new(token_file.clone())),
            Arc::new(MemoryNavigator::new(route)),
        );
        let api = HttpApi::new(config, session.clone())?;
        Ok(Self {
            session,
            api: Arc::new(api),
            notifications: Arc::new(NotificationLog::new()),
            token_file,
        })
    }

    pub fn resource<R: Resource>(&self) -> Arc<dyn ResourceApi<R>> {
        self.api.clone()
    }

    pub fn reports(&self) -> Arc<dyn ReportApi> {
        self.api.clone()
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifications.clone()
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    /// Refuse protected routes when no token is stored
    pub fn enter(&self, route: Route) -> Result<()> {
        match AuthGate::check(&self.session, route) {
            GateDecision::Allow => Ok(()),
            GateDecision::RedirectToLogin => {
                bail!("Não autenticado. Execute `voto-admin login --email <email>` primeiro.")
            }
        }
    }

    /// Print and clear the collected notifications
    pub fn flush(&self) {
        for notification in self.notifications.drain() {
            if notification.is_error() {
                eprintln!("✗ {}", notification);
            } else {
                println!("✓ {}", notification);
            }
        }
    }
}

/// Yes/no question on stderr; anything but an explicit yes is a no
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [s/N] ", question))?;
    Ok(matches!(
        answer.to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    ))
}

/// One trimmed line from stdin
pub fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Print the field errors of a rejected form
pub fn rejected(errors: &FieldErrors) -> anyhow::Error {
    for (field, message) in errors.iter() {
        eprintln!("  {}: {}", field, message);
    }
    anyhow!("Formulário inválido ({} erro(s))", errors.len())
}
