//! Entities as transported by the API
//!
//! Field names follow the `/v1` API. Older snapshots of the API sent
//! camelCase names and numbers-as-strings; those shapes are accepted on
//! decode through aliases and the helpers below.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

pub mod candidato;
pub mod dashboard;
pub mod eleicao;
pub mod eleitor;
pub mod log;
pub mod resultado;
pub mod urna;

pub use candidato::{Candidato, CandidatoDraft, Candidatos, Photo, PhotoFile};
pub use dashboard::{Conexao, DashboardSummary};
pub use eleicao::{Eleicao, EleicaoDraft, EleicaoStatus, Eleicoes};
pub use eleitor::{Eleitor, EleitorDraft, Eleitores, format_cpf, normalize_cpf};
pub use log::{LogEntry, LogUser};
pub use resultado::{CandidateVotes, ImportReport, ResultadoData};
pub use urna::{Urna, UrnaDraft, UrnaStatus, Urnas};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(serde_json::Number),
    Text(String),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Accept `7` and `"7"` for numeric fields
pub(crate) fn number_from_any<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = StringOrNumber::deserialize(deserializer)?.into_string();
    raw.trim()
        .parse()
        .map_err(|e| de::Error::custom(format!("invalid number {raw:?}: {e}")))
}

/// Optional variant of [`number_from_any`]; `null` and `""` map to `None`
pub(crate) fn opt_number_from_any<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => {
            let raw = value.into_string();
            if raw.trim().is_empty() {
                return Ok(None);
            }
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid number {raw:?}: {e}")))
        }
    }
}

/// Accept `"0042"` and `42` for textual identifiers
pub(crate) fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrNumber::deserialize(deserializer)?.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "number_from_any")]
        id: u64,
        #[serde(default, deserialize_with = "opt_number_from_any")]
        parent: Option<u64>,
        #[serde(deserialize_with = "string_from_any")]
        code: String,
    }

    #[test]
    fn test_numbers_and_strings_are_interchangeable() {
        let probe: Probe =
            serde_json::from_str(r#"{"id":"12","parent":3,"code":42}"#).unwrap();
        assert_eq!(probe.id, 12);
        assert_eq!(probe.parent, Some(3));
        assert_eq!(probe.code, "42");

        let probe: Probe = serde_json::from_str(r#"{"id":1,"parent":"","code":"A1"}"#).unwrap();
        assert_eq!(probe.parent, None);

        let probe: Probe = serde_json::from_str(r#"{"id":1,"code":"A1"}"#).unwrap();
        assert_eq!(probe.parent, None);

        assert!(serde_json::from_str::<Probe>(r#"{"id":"x","code":"A1"}"#).is_err());
    }
}
