//! Transient user notifications

use parking_lot::Mutex;
use std::fmt;
use tracing::{info, warn};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Dismissible message with a short title and a description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Error notification describing a failed API call
    pub fn from_error(title: impl Into<String>, err: &ApiError) -> Self {
        Self::error(title, describe(err))
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// User-facing text for an API failure
pub fn describe(err: &ApiError) -> String {
    match err {
        ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
        ApiError::Status { status, .. } => format!("A API respondeu com status {}.", status),
        ApiError::Unauthorized => "Sessão expirada. Faça login novamente.".to_string(),
        ApiError::Transport(_) => "Não foi possível conectar à API.".to_string(),
        ApiError::Decode { .. } => "Resposta inesperada da API.".to_string(),
        ApiError::NotFound { resource, id } => format!("Não encontrado: {} {}.", resource, id),
        ApiError::Cancelled => "Operação cancelada.".to_string(),
        other => other.to_string(),
    }
}

/// Sink for page notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that keeps every notification until drained
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries.lock().last().cloned()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn errors(&self) -> usize {
        self.entries.lock().iter().filter(|n| n.is_error()).count()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => info!("{}", notification),
            NotificationKind::Error => warn!("{}", notification),
        }
        self.entries.lock().push(notification);
    }
}
