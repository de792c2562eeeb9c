//! Voting machines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{number_from_any, string_from_any};
use crate::resource::{Resource, ResourceKind};

/// Operational status of a voting machine
///
/// The API briefly reported `online`/`offline`; those decode as
/// `Ativa`/`Inativa`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrnaStatus {
    #[default]
    #[serde(alias = "online")]
    Ativa,
    #[serde(alias = "offline")]
    Inativa,
    Manutencao,
}

impl UrnaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ativa => "ativa",
            Self::Inativa => "inativa",
            Self::Manutencao => "manutencao",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ativa => "Ativa",
            Self::Inativa => "Inativa",
            Self::Manutencao => "Manutenção",
        }
    }
}

impl fmt::Display for UrnaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UrnaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ativa" | "online" => Ok(Self::Ativa),
            "inativa" | "offline" => Ok(Self::Inativa),
            "manutencao" | "manutenção" => Ok(Self::Manutencao),
            other => Err(format!("status de urna desconhecido: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Urna {
    #[serde(deserialize_with = "number_from_any")]
    pub id: u64,
    #[serde(deserialize_with = "string_from_any")]
    pub numero: String,
    #[serde(alias = "local")]
    pub localizacao: String,
    #[serde(default)]
    pub status: UrnaStatus,
    #[serde(
        default,
        alias = "ultimaAtividade",
        skip_serializing_if = "Option::is_none"
    )]
    pub ultima_atividade: Option<DateTime<Utc>>,
}

/// Create/update payload for a voting machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrnaDraft {
    pub numero: String,
    pub localizacao: String,
    pub status: UrnaStatus,
}

/// Marker for the `/urnas` resource
pub struct Urnas;

impl Resource for Urnas {
    type Entity = Urna;
    type Draft = UrnaDraft;

    const KIND: ResourceKind = ResourceKind::Urnas;

    fn id(entity: &Urna) -> u64 {
        entity.id
    }

    fn label(entity: &Urna) -> String {
        entity.numero.clone()
    }

    fn from_draft(id: u64, draft: &UrnaDraft, previous: Option<&Urna>) -> Urna {
        Urna {
            id,
            numero: draft.numero.clone(),
            localizacao: draft.localizacao.clone(),
            status: draft.status,
            ultima_atividade: previous.and_then(|p| p.ultima_atividade),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_current_and_legacy_shapes() {
        let urna: Urna = serde_json::from_str(
            r#"{"id":1,"numero":"0042","localizacao":"Seção 1","status":"manutencao","ultima_atividade":"2024-08-15T10:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(urna.status, UrnaStatus::Manutencao);
        assert!(urna.ultima_atividade.is_some());

        let legacy: Urna = serde_json::from_str(
            r#"{"id":"2","numero":7,"local":"Zona A","status":"offline","ultimaAtividade":"2024-08-15T10:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(legacy.id, 2);
        assert_eq!(legacy.numero, "7");
        assert_eq!(legacy.status, UrnaStatus::Inativa);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Manutenção".parse::<UrnaStatus>(), Ok(UrnaStatus::Manutencao));
        assert_eq!("online".parse::<UrnaStatus>(), Ok(UrnaStatus::Ativa));
        assert!("quebrada".parse::<UrnaStatus>().is_err());
    }
}
