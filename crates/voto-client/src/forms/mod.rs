//! Client-side validation of entity forms
//!
//! A form turns raw user input (strings, as typed) into a validated draft or
//! a set of per-field errors. Nothing invalid ever reaches the network: the
//! submit callback only runs on a draft that passed validation.

use std::fmt;
use std::future::Future;
use tracing::debug;

pub mod candidato;
pub mod eleicao;
pub mod eleitor;
pub mod login;
pub mod urna;

pub use candidato::{CandidatoForm, CandidatoFormOptions, CandidatoInput, PhotoPreview};
pub use eleicao::{EleicaoForm, EleicaoFormOptions, EleicaoInput, parse_datetime};
pub use eleitor::{EleitorForm, EleitorInput};
pub use login::{LoginForm, LoginInput, LoginRequest};
pub use urna::{UrnaForm, UrnaInput};

/// Validation errors keyed by field, in the order the fields were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; only the first error per field is kept
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(value)` when no error was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// A validating form
pub trait Form {
    /// Raw values as typed by a user
    type Input: Clone + Default + fmt::Debug;
    /// Validated draft handed to the submit callback
    type Output;

    fn validate(input: &Self::Input) -> Result<Self::Output, FieldErrors>;
}

/// What happened when the user left the form
#[derive(Debug)]
pub enum FormOutcome<T> {
    /// Validation passed and the callback ran
    Submitted(T),
    /// Validation failed; the callback was not called
    Invalid(FieldErrors),
    /// Left without submitting
    Cancelled,
}

impl<T> FormOutcome<T> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Create or edit session of one form
#[derive(Debug, Clone)]
pub struct FormController<F: Form> {
    defaults: Option<F::Input>,
}

impl<F: Form> FormController<F> {
    /// Empty form
    pub fn create() -> Self {
        Self { defaults: None }
    }

    /// Form pre-filled with an existing entity
    pub fn edit(defaults: F::Input) -> Self {
        Self {
            defaults: Some(defaults),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.defaults.is_some()
    }

    pub fn initial_input(&self) -> F::Input {
        self.defaults.clone().unwrap_or_default()
    }

    /// Validate `input` and hand the draft to `on_submit`
    pub async fn submit<T, Fut>(
        &self,
        input: &F::Input,
        on_submit: impl FnOnce(F::Output) -> Fut,
    ) -> FormOutcome<T>
    where
        Fut: Future<Output = T>,
    {
        match F::validate(input) {
            Ok(draft) => FormOutcome::Submitted(on_submit(draft).await),
            Err(errors) => {
                debug!("Form rejected: {}", errors);
                FormOutcome::Invalid(errors)
            }
        }
    }

    pub fn cancel<T>(&self) -> FormOutcome<T> {
        FormOutcome::Cancelled
    }
}

/// Trimmed value of a text field with at least `min` characters
pub(crate) fn min_chars(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) -> String {
    let value = value.trim();
    if value.chars().count() < min {
        errors.add(field, message);
    }
    value.to_string()
}

/// `None` for blank input
pub(crate) fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse an id chosen in a selector
pub(crate) fn selected_id(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    message: &str,
) -> u64 {
    match value.trim().parse::<u64>() {
        Ok(id) => id,
        Err(_) => {
            errors.add(field, message);
            0
        }
    }
}
