use chrono::{DateTime, NaiveDateTime, Utc};

use super::{FieldErrors, Form, min_chars, optional, selected_id};
use crate::api::{ListQuery, ResourceApi};
use crate::error::Result;
use crate::types::{Eleicao, EleicaoDraft, Urna, Urnas};

const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a datetime typed by a user; naive values are taken as UTC
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EleicaoInput {
    pub nome: String,
    pub descricao: String,
    pub data_inicio: String,
    pub data_fim: String,
    pub urna_id: String,
}

impl From<&Eleicao> for EleicaoInput {
    fn from(eleicao: &Eleicao) -> Self {
        Self {
            nome: eleicao.nome.clone(),
            descricao: eleicao.descricao.clone().unwrap_or_default(),
            data_inicio: eleicao.data_inicio.format("%Y-%m-%dT%H:%M").to_string(),
            data_fim: eleicao.data_fim.format("%Y-%m-%dT%H:%M").to_string(),
            urna_id: eleicao.urna_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

pub struct EleicaoForm;

fn required_datetime(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    missing: &str,
) -> Option<DateTime<Utc>> {
    if value.trim().is_empty() {
        errors.add(field, missing);
        return None;
    }
    let parsed = parse_datetime(value);
    if parsed.is_none() {
        errors.add(field, "Data inválida.");
    }
    parsed
}

impl Form for EleicaoForm {
    type Input = EleicaoInput;
    type Output = EleicaoDraft;

    fn validate(input: &EleicaoInput) -> std::result::Result<EleicaoDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nome = min_chars(
            &mut errors,
            "nome",
            &input.nome,
            3,
            "O nome deve ter pelo menos 3 caracteres.",
        );
        let data_inicio = required_datetime(
            &mut errors,
            "data_inicio",
            &input.data_inicio,
            "A data de início é obrigatória.",
        );
        let data_fim = required_datetime(
            &mut errors,
            "data_fim",
            &input.data_fim,
            "A data de fim é obrigatória.",
        );
        let urna_id = selected_id(&mut errors, "urna_id", &input.urna_id, "Selecione uma urna.");

        let (Some(data_inicio), Some(data_fim)) = (data_inicio, data_fim) else {
            return Err(errors);
        };
        if data_fim <= data_inicio {
            errors.add(
                "data_fim",
                "A data de fim deve ser posterior à data de início.",
            );
        }

        errors.into_result(EleicaoDraft {
            nome,
            descricao: optional(&input.descricao),
            data_inicio,
            data_fim,
            urna_id,
        })
    }
}

/// Choices for the voting-machine selector
#[derive(Debug, Clone, Default)]
pub struct EleicaoFormOptions {
    pub urnas: Vec<Urna>,
}

impl EleicaoFormOptions {
    pub async fn load(api: &dyn ResourceApi<Urnas>) -> Result<Self> {
        let urnas = api.list(&ListQuery::default()).await?;
        Ok(Self { urnas })
    }

    /// `(id, label)` pairs in API order
    pub fn choices(&self) -> Vec<(u64, String)> {
        self.urnas
            .iter()
            .map(|u| (u.id, format!("Urna {} ({})", u.numero, u.localizacao)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: &str, end: &str) -> EleicaoInput {
        EleicaoInput {
            nome: "Conselho Municipal".into(),
            descricao: String::new(),
            data_inicio: start.into(),
            data_fim: end.into(),
            urna_id: "1".into(),
        }
    }

    #[test]
    fn test_end_must_follow_start() {
        for end in ["2024-10-02T08:00", "2024-10-01T17:00"] {
            let errors = EleicaoForm::validate(&input("2024-10-02T08:00", end)).unwrap_err();
            assert_eq!(
                errors.get("data_fim"),
                Some("A data de fim deve ser posterior à data de início.")
            );
            assert_eq!(errors.get("data_inicio"), None);
        }

        let draft = EleicaoForm::validate(&input("2024-10-02 08:00", "2024-10-02T17:00:00Z")).unwrap();
        assert!(draft.data_fim > draft.data_inicio);
        assert_eq!(draft.descricao, None);
    }

    #[test]
    fn test_missing_values() {
        let errors = EleicaoForm::validate(&EleicaoInput::default()).unwrap_err();
        assert_eq!(errors.get("data_inicio"), Some("A data de início é obrigatória."));
        assert_eq!(errors.get("data_fim"), Some("A data de fim é obrigatória."));
        assert_eq!(errors.get("urna_id"), Some("Selecione uma urna."));
        assert!(errors.get("nome").is_some());
    }

    #[test]
    fn test_edit_input_round_trips() {
        let draft = EleicaoForm::validate(&input("2024-10-02T08:00", "2024-10-02T17:00")).unwrap();
        let eleicao = Eleicao {
            id: 1,
            nome: draft.nome.clone(),
            descricao: None,
            data_inicio: draft.data_inicio,
            data_fim: draft.data_fim,
            urna_id: Some(1),
            status: Default::default(),
        };
        assert_eq!(EleicaoForm::validate(&EleicaoInput::from(&eleicao)).unwrap(), draft);
    }
}
