use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

use super::{FieldErrors, Form, min_chars, optional, selected_id};
use crate::api::{ListQuery, ResourceApi};
use crate::error::Result;
use crate::types::{Candidato, CandidatoDraft, Eleicao, Eleicoes, Photo, PhotoFile};

/// Largest photo accepted by the form
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatoInput {
    pub nome: String,
    pub numero: String,
    pub eleicao_id: String,
    pub partido: String,
    /// Link to an already hosted photo
    pub foto_url: String,
    /// Picked file; takes precedence over `foto_url`
    pub foto_file: Option<PhotoFile>,
}

impl From<&Candidato> for CandidatoInput {
    fn from(candidato: &Candidato) -> Self {
        Self {
            nome: candidato.nome.clone(),
            numero: candidato.numero.to_string(),
            eleicao_id: candidato.eleicao_id.to_string(),
            partido: candidato.partido.clone().unwrap_or_default(),
            foto_url: candidato.foto_url.clone().unwrap_or_default(),
            foto_file: None,
        }
    }
}

pub struct CandidatoForm;

fn photo(errors: &mut FieldErrors, input: &CandidatoInput) -> Option<Photo> {
    if let Some(file) = &input.foto_file {
        if !file.mime.starts_with("image/") {
            errors.add("foto", "O arquivo deve ser uma imagem.");
        } else if file.bytes.len() > MAX_PHOTO_BYTES {
            errors.add("foto", "A imagem deve ter no máximo 5MB.");
        }
        return Some(Photo::File(file.clone()));
    }

    let url = optional(&input.foto_url)?;
    // Uploaded photos come back as paths on the API host
    if url.starts_with('/') && !url.starts_with("//") {
        return Some(Photo::Url(url));
    }
    match Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(Photo::Url(url)),
        _ => {
            errors.add("foto_url", "URL da foto inválida.");
            None
        }
    }
}

impl Form for CandidatoForm {
    type Input = CandidatoInput;
    type Output = CandidatoDraft;

    fn validate(input: &CandidatoInput) -> std::result::Result<CandidatoDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nome = min_chars(
            &mut errors,
            "nome",
            &input.nome,
            3,
            "O nome deve ter pelo menos 3 caracteres.",
        );
        let numero = match input.numero.trim().parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => {
                errors.add("numero", "O número deve ser maior que zero.");
                0
            }
        };
        let eleicao_id = selected_id(
            &mut errors,
            "eleicao_id",
            &input.eleicao_id,
            "Selecione uma eleição.",
        );
        let foto = photo(&mut errors, input);

        errors.into_result(CandidatoDraft {
            nome,
            numero,
            eleicao_id,
            partido: optional(&input.partido),
            foto,
        })
    }
}

/// What the avatar shows while the form is open
///
/// A picked file is previewed as a `data:` URL; the draft still carries the
/// raw file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoPreview {
    Image(String),
    Initials(String),
}

impl PhotoPreview {
    pub fn from_input(input: &CandidatoInput) -> Self {
        if let Some(file) = &input.foto_file {
            return Self::Image(format!(
                "data:{};base64,{}",
                file.mime,
                STANDARD.encode(&file.bytes)
            ));
        }
        match optional(&input.foto_url) {
            Some(url) => Self::Image(url),
            None => Self::Initials(initials(&input.nome)),
        }
    }
}

fn initials(nome: &str) -> String {
    let initials: String = nome.trim().chars().take(2).collect::<String>().to_uppercase();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

/// Choices for the election selector
#[derive(Debug, Clone, Default)]
pub struct CandidatoFormOptions {
    pub eleicoes: Vec<Eleicao>,
}

impl CandidatoFormOptions {
    pub async fn load(api: &dyn ResourceApi<Eleicoes>) -> Result<Self> {
        let eleicoes = api.list(&ListQuery::default()).await?;
        Ok(Self { eleicoes })
    }

    pub fn choices(&self) -> Vec<(u64, String)> {
        self.eleicoes.iter().map(|e| (e.id, e.nome.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn input() -> CandidatoInput {
        CandidatoInput {
            nome: "Ana Lima".into(),
            numero: "13".into(),
            eleicao_id: "2".into(),
            ..Default::default()
        }
    }

    fn png(len: usize) -> PhotoFile {
        PhotoFile {
            file_name: "ana.png".into(),
            mime: "image/png".into(),
            bytes: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn test_numero_is_coerced() {
        assert_eq!(CandidatoForm::validate(&input()).unwrap().numero, 13);

        for bad in ["0", "-1", "abc", ""] {
            let mut i = input();
            i.numero = bad.into();
            let errors = CandidatoForm::validate(&i).unwrap_err();
            assert_eq!(errors.get("numero"), Some("O número deve ser maior que zero."));
        }
    }

    #[test]
    fn test_photo_url_must_be_http() {
        let mut i = input();
        i.foto_url = "javascript:alert(1)".into();
        assert_eq!(
            CandidatoForm::validate(&i).unwrap_err().get("foto_url"),
            Some("URL da foto inválida.")
        );

        i.foto_url = "https://cdn.example.org/ana.png".into();
        assert!(matches!(
            CandidatoForm::validate(&i).unwrap().foto,
            Some(Photo::Url(_))
        ));
    }

    #[test]
    fn test_edit_keeps_uploaded_photo_path() {
        let candidato: Candidato = serde_json::from_str(
            r#"{"id":9,"nome":"Ana Lima","numero":13,"eleicao_id":2,"foto_url":"/uploads/c1.png"}"#,
        )
        .unwrap();
        let mut i = CandidatoInput::from(&candidato);
        i.nome = "Ana Lima Souza".into();

        let draft = CandidatoForm::validate(&i).unwrap();
        assert_eq!(draft.foto, Some(Photo::Url("/uploads/c1.png".into())));

        i.foto_url = "//evil.example.org/x.png".into();
        assert!(CandidatoForm::validate(&i).unwrap_err().get("foto_url").is_some());
    }

    #[test]
    fn test_photo_file_limits() {
        let mut i = input();
        i.foto_file = Some(png(MAX_PHOTO_BYTES + 1));
        assert!(CandidatoForm::validate(&i).unwrap_err().get("foto").is_some());

        let mut pdf = png(10);
        pdf.mime = "application/pdf".into();
        i.foto_file = Some(pdf);
        assert!(CandidatoForm::validate(&i).unwrap_err().get("foto").is_some());

        i.foto_file = Some(png(10));
        i.foto_url = "https://cdn.example.org/old.png".into();
        assert!(matches!(
            CandidatoForm::validate(&i).unwrap().foto,
            Some(Photo::File(_))
        ));
    }

    #[test]
    fn test_preview_is_distinct_from_submitted_value() {
        let mut i = input();
        assert_eq!(PhotoPreview::from_input(&i), PhotoPreview::Initials("AN".into()));

        i.foto_file = Some(PhotoFile {
            file_name: "a.png".into(),
            mime: "image/png".into(),
            bytes: Bytes::from_static(b"abc"),
        });
        assert_eq!(
            PhotoPreview::from_input(&i),
            PhotoPreview::Image("data:image/png;base64,YWJj".into())
        );
    }
}
