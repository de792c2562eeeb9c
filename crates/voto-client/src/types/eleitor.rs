//! Registered voters

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use super::{number_from_any, string_from_any};
use crate::resource::{Resource, ResourceKind};

/// Keep only the ASCII digits of a CPF as typed by a user
pub fn normalize_cpf(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format an 11-digit CPF as `000.000.000-00`; other lengths are returned as is
pub fn format_cpf(cpf: &str) -> String {
    let digits = normalize_cpf(cpf);
    if digits.len() != 11 {
        return cpf.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

fn cpf_digits<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_cpf(&String::deserialize(deserializer)?))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eleitor {
    #[serde(deserialize_with = "number_from_any")]
    pub id: u64,
    pub nome: String,
    /// Digits only
    #[serde(deserialize_with = "cpf_digits")]
    pub cpf: String,
    #[serde(alias = "tituloEleitor", deserialize_with = "string_from_any")]
    pub matricula: String,
}

impl Eleitor {
    pub fn formatted_cpf(&self) -> String {
        format_cpf(&self.cpf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EleitorDraft {
    pub nome: String,
    /// Digits only
    pub cpf: String,
    pub matricula: String,
}

/// Marker for the `/eleitores` resource
pub struct Eleitores;

impl Resource for Eleitores {
    type Entity = Eleitor;
    type Draft = EleitorDraft;

    const KIND: ResourceKind = ResourceKind::Eleitores;

    fn id(entity: &Eleitor) -> u64 {
        entity.id
    }

    fn label(entity: &Eleitor) -> String {
        entity.nome.clone()
    }

    fn from_draft(id: u64, draft: &EleitorDraft, _previous: Option<&Eleitor>) -> Eleitor {
        Eleitor {
            id,
            nome: draft.nome.clone(),
            cpf: normalize_cpf(&draft.cpf),
            matricula: draft.matricula.clone(),
        }
    }
}
