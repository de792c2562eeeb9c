//! Aggregate results and import reports

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateVotes {
    pub nome: String,
    pub votos: u64,
}

/// Vote totals for one election
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoData {
    #[serde(alias = "total_votos")]
    pub total_votos: u64,
    #[serde(alias = "votos_brancos")]
    pub votos_brancos: u64,
    #[serde(alias = "votos_nulos")]
    pub votos_nulos: u64,
    #[serde(default, alias = "votos_por_candidato")]
    pub votos_por_candidato: Vec<CandidateVotes>,
}

impl ResultadoData {
    /// Sum of the votes given to candidates (blank and null excluded)
    pub fn candidate_total(&self) -> u64 {
        self.votos_por_candidato.iter().map(|c| c.votos).sum()
    }
}

/// Outcome of a voter import, as reported by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    #[serde(default)]
    pub message: String,
    pub imported_count: u64,
    pub failed_count: u64,
    /// One message per rejected row
    #[serde(default)]
    pub errors: Vec<String>,
}
