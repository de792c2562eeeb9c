use super::{FieldErrors, Form, min_chars};
use crate::types::{Urna, UrnaDraft, UrnaStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrnaInput {
    pub numero: String,
    pub localizacao: String,
    /// Empty means `ativa`
    pub status: String,
}

impl From<&Urna> for UrnaInput {
    fn from(urna: &Urna) -> Self {
        Self {
            numero: urna.numero.clone(),
            localizacao: urna.localizacao.clone(),
            status: urna.status.as_str().to_string(),
        }
    }
}

pub struct UrnaForm;

impl Form for UrnaForm {
    type Input = UrnaInput;
    type Output = UrnaDraft;

    fn validate(input: &UrnaInput) -> Result<UrnaDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let numero = min_chars(&mut errors, "numero", &input.numero, 1, "O número é obrigatório.");
        let localizacao = min_chars(
            &mut errors,
            "localizacao",
            &input.localizacao,
            3,
            "A localização deve ter pelo menos 3 caracteres.",
        );
        let status = if input.status.trim().is_empty() {
            UrnaStatus::default()
        } else {
            input.status.parse().unwrap_or_else(|_| {
                errors.add("status", "Status inválido.");
                UrnaStatus::default()
            })
        };

        errors.into_result(UrnaDraft {
            numero,
            localizacao,
            status,
        })
    }
}
