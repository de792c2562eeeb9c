//! Resource descriptions shared by the HTTP client, the in-memory fake and
//! the page controllers

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{self, Debug};

use crate::error::{ApiError, Result};
use crate::filter::Searchable;
use crate::render::Tabular;

/// The managed collections exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Urnas,
    Eleicoes,
    Candidatos,
    Eleitores,
    Auditoria,
}

impl ResourceKind {
    /// Path segment used both by the API and by client routes
    pub fn path(self) -> &'static str {
        match self {
            Self::Urnas => "urnas",
            Self::Eleicoes => "eleicoes",
            Self::Candidatos => "candidatos",
            Self::Eleitores => "eleitores",
            Self::Auditoria => "auditoria",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Urnas => "urna",
            Self::Eleicoes => "eleição",
            Self::Candidatos => "candidato",
            Self::Eleitores => "eleitor",
            Self::Auditoria => "registro",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Urnas => "Urnas",
            Self::Eleicoes => "Eleições",
            Self::Candidatos => "Candidatos",
            Self::Eleitores => "Eleitores",
            Self::Auditoria => "Logs de Auditoria",
        }
    }

    fn is_feminine(self) -> bool {
        matches!(self, Self::Urnas | Self::Eleicoes)
    }

    /// Agree a participle stem with the resource gender: `Criad` -> `Criada`
    pub fn agree(self, stem: &str) -> String {
        format!("{}{}", stem, if self.is_feminine() { "a" } else { "o" })
    }

    pub fn article(self) -> &'static str {
        if self.is_feminine() { "A" } else { "O" }
    }

    /// Text of the explicit row shown when a table has nothing to display
    pub fn empty_message(self) -> String {
        let none = if self.is_feminine() { "Nenhuma" } else { "Nenhum" };
        format!("{} {} {}.", none, self.singular(), self.agree("encontrad"))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One part of a multipart request
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Bytes,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Body of a create/update request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::invalid_input("payload", e.to_string()))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// Static description of a CRUD resource
///
/// Implemented by zero-sized marker types (`Urnas`, `Eleicoes`, ...) so the
/// data-access trait can be written once and parameterized per resource.
pub trait Resource: Send + Sync + 'static {
    /// Entity as returned by the API
    type Entity: DeserializeOwned
        + Serialize
        + Clone
        + Debug
        + PartialEq
        + Searchable
        + Tabular
        + Send
        + Sync
        + 'static;

    /// Validated payload produced by the resource form
    type Draft: Serialize + Clone + Debug + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(entity: &Self::Entity) -> u64;

    /// Human name of the entity, used in dialogs and notifications
    fn label(entity: &Self::Entity) -> String;

    /// Encode a draft for the wire
    fn payload(draft: &Self::Draft) -> Result<RequestBody> {
        RequestBody::json(draft)
    }

    /// Build the entity a server would return after storing `draft`
    fn from_draft(id: u64, draft: &Self::Draft, previous: Option<&Self::Entity>) -> Self::Entity;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gendered_labels() {
        assert_eq!(ResourceKind::Urnas.agree("Removid"), "Removida");
        assert_eq!(ResourceKind::Candidatos.agree("Removid"), "Removido");
        assert_eq!(ResourceKind::Eleicoes.empty_message(), "Nenhuma eleição encontrada.");
        assert_eq!(ResourceKind::Eleitores.empty_message(), "Nenhum eleitor encontrado.");
    }
}
