//! Audit log entries

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use super::number_from_any;

/// User who performed an audited action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogUser {
    pub nome: String,
}

impl<'de> Deserialize<'de> for LogUser {
    /// Accepts `{"nome": "admin"}` and the older bare `"admin"`
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Nested { nome: String },
            Bare(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Nested { nome } | Raw::Bare(nome) => LogUser { nome },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(deserialize_with = "number_from_any")]
    pub id: u64,
    pub data: DateTime<Utc>,
    pub acao: String,
    pub usuario: LogUser,
    #[serde(default)]
    pub descricao: String,
}
