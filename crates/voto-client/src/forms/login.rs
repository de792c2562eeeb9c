use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{FieldErrors, Form};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

pub struct LoginForm;

impl Form for LoginForm {
    type Input = LoginInput;
    type Output = LoginRequest;

    fn validate(input: &LoginInput) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = input.email.trim().to_string();
        if !EMAIL.is_match(&email) {
            errors.add("email", "Por favor, insira um email válido.");
        }
        if input.password.chars().count() < 6 {
            errors.add("password", "A senha deve ter pelo menos 6 caracteres.");
        }

        errors.into_result(LoginRequest {
            email,
            senha: input.password.clone(),
        })
    }
}
