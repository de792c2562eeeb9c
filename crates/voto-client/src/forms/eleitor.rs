use super::{FieldErrors, Form, min_chars};
use crate::types::{Eleitor, EleitorDraft, normalize_cpf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EleitorInput {
    pub nome: String,
    /// As typed; punctuation is stripped before validation
    pub cpf: String,
    pub matricula: String,
}

impl From<&Eleitor> for EleitorInput {
    fn from(eleitor: &Eleitor) -> Self {
        Self {
            nome: eleitor.nome.clone(),
            cpf: eleitor.cpf.clone(),
            matricula: eleitor.matricula.clone(),
        }
    }
}

pub struct EleitorForm;

impl Form for EleitorForm {
    type Input = EleitorInput;
    type Output = EleitorDraft;

    fn validate(input: &EleitorInput) -> Result<EleitorDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nome = min_chars(
            &mut errors,
            "nome",
            &input.nome,
            3,
            "O nome deve ter pelo menos 3 caracteres.",
        );
        let cpf = normalize_cpf(&input.cpf);
        if cpf.len() != 11 {
            errors.add("cpf", "O CPF deve conter exatamente 11 dígitos.");
        }
        let matricula = min_chars(
            &mut errors,
            "matricula",
            &input.matricula,
            1,
            "A matrícula é obrigatória.",
        );

        errors.into_result(EleitorDraft {
            nome,
            cpf,
            matricula,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf_is_sent_as_digits() {
        let draft = EleitorForm::validate(&EleitorInput {
            nome: "Maria Souza".into(),
            cpf: "123.456.789-01".into(),
            matricula: "2024001".into(),
        })
        .unwrap();
        assert_eq!(draft.cpf, "12345678901");
    }

    #[test]
    fn test_cpf_length_and_matricula() {
        let errors = EleitorForm::validate(&EleitorInput {
            nome: "Maria Souza".into(),
            cpf: "123.456.789".into(),
            matricula: " ".into(),
        })
        .unwrap_err();
        assert_eq!(errors.get("cpf"), Some("O CPF deve conter exatamente 11 dígitos."));
        assert_eq!(errors.get("matricula"), Some("A matrícula é obrigatória."));
        assert_eq!(errors.get("nome"), None);
    }
}
