//! Dashboard summary

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UrnaStatus;

/// Connectivity of the voting machine as seen by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conexao {
    #[serde(alias = "online")]
    Online,
    #[serde(alias = "offline")]
    Offline,
}

impl fmt::Display for Conexao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("Online"),
            Self::Offline => f.write_str("Offline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub status_urna: UrnaStatus,
    pub conexao_urna: Conexao,
    #[serde(default)]
    pub total_votos: u64,
    #[serde(default)]
    pub contagem_eleicoes: u64,
    #[serde(default)]
    pub contagem_candidatos: u64,
    #[serde(default)]
    pub contagem_eleitores: u64,
}
