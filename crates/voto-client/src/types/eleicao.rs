//! Elections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{number_from_any, opt_number_from_any};
use crate::resource::{Resource, ResourceKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EleicaoStatus {
    #[default]
    Criada,
    Ativa,
    Finalizada,
    Cancelada,
}

impl EleicaoStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Criada => "Criada",
            Self::Ativa => "Ativa",
            Self::Finalizada => "Finalizada",
            Self::Cancelada => "Cancelada",
        }
    }
}

impl fmt::Display for EleicaoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eleicao {
    #[serde(deserialize_with = "number_from_any")]
    pub id: u64,
    #[serde(alias = "titulo")]
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(alias = "dataInicio")]
    pub data_inicio: DateTime<Utc>,
    #[serde(alias = "dataFim")]
    pub data_fim: DateTime<Utc>,
    #[serde(
        default,
        alias = "urnaId",
        deserialize_with = "opt_number_from_any",
        skip_serializing_if = "Option::is_none"
    )]
    pub urna_id: Option<u64>,
    #[serde(default)]
    pub status: EleicaoStatus,
}

/// Create/update payload for an election
///
/// `data_fim > data_inicio` holds for every draft built by the election form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EleicaoDraft {
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub urna_id: u64,
}

/// Marker for the `/eleicoes` resource
pub struct Eleicoes;

impl Resource for Eleicoes {
    type Entity = Eleicao;
    type Draft = EleicaoDraft;

    const KIND: ResourceKind = ResourceKind::Eleicoes;

    fn id(entity: &Eleicao) -> u64 {
        entity.id
    }

    fn label(entity: &Eleicao) -> String {
        entity.nome.clone()
    }

    fn from_draft(id: u64, draft: &EleicaoDraft, previous: Option<&Eleicao>) -> Eleicao {
        Eleicao {
            id,
            nome: draft.nome.clone(),
            descricao: draft.descricao.clone(),
            data_inicio: draft.data_inicio,
            data_fim: draft.data_fim,
            urna_id: Some(draft.urna_id),
            status: previous.map(|p| p.status).unwrap_or_default(),
        }
    }
}
