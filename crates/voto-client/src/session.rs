//! Session state: the persisted bearer token, the current location and the
//! route gate
//!
//! The token store and the navigator are injected, so the HTTP client and
//! the pages can be exercised without a real storage backend.

use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::route::Route;

/// Persistent storage for the bearer token
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token kept in process memory
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

/// Token kept in a single file; a missing or empty file means no token
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read token file {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        debug!("Stored token in {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Where the user currently is, and how to send them elsewhere
pub trait Navigator: Send + Sync {
    fn current(&self) -> Route;

    /// Full redirect: the destination starts from a clean state
    fn redirect(&self, to: Route);
}

/// Navigator that records every redirect
#[derive(Debug)]
pub struct MemoryNavigator {
    current: Mutex<Route>,
    history: Mutex<Vec<Route>>,
}

impl MemoryNavigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: Mutex::new(start),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Redirect targets in order
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current(&self) -> Route {
        *self.current.lock()
    }

    fn redirect(&self, to: Route) {
        *self.current.lock() = to;
        self.history.lock().push(to);
    }
}

/// Token store plus navigator, handed to the HTTP client at construction
#[derive(Clone)]
pub struct Session {
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { tokens, navigator }
    }

    /// Session with no token, positioned on `start`
    pub fn in_memory(start: Route) -> Self {
        Self::new(
            Arc::new(MemoryTokenStore::new()),
            Arc::new(MemoryNavigator::new(start)),
        )
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn store_token(&self, token: &str) -> Result<()> {
        self.tokens.set(token)
    }

    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }

    pub fn navigate(&self, to: Route) {
        info!("Navigating to {}", to);
        self.navigator.redirect(to);
    }

    /// Forget the token and go to the login page
    pub fn logout(&self) -> Result<()> {
        self.tokens.clear()?;
        self.navigate(Route::Login);
        Ok(())
    }

    /// React to a rejected token: clear it and redirect to login, unless the
    /// user is already there
    pub fn expire(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!("Failed to clear expired token: {}", e);
        }
        if self.navigator.current() != Route::Login {
            self.navigate(Route::Login);
        }
    }
}

/// Result of checking a route against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
}

/// Boolean gate for protected routes: a stored token is enough
///
/// No expiry check and no renewal; an expired token is caught by the first
/// request that comes back 401.
pub struct AuthGate;

impl AuthGate {
    pub fn check(session: &Session, route: Route) -> GateDecision {
        if !route.is_protected() || session.is_authenticated() {
            return GateDecision::Allow;
        }
        debug!("No token for protected route {}", route);
        session.navigate(Route::Login);
        GateDecision::RedirectToLogin
    }
}
