//! Candidates and their photos

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{number_from_any, opt_number_from_any};
use crate::error::Result;
use crate::resource::{FormPart, RequestBody, Resource, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidato {
    #[serde(deserialize_with = "number_from_any")]
    pub id: u64,
    pub nome: String,
    /// Ballot number, unique within an election (enforced by the API)
    #[serde(deserialize_with = "number_from_any")]
    pub numero: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partido: Option<String>,
    #[serde(default, alias = "fotoUrl", skip_serializing_if = "Option::is_none")]
    pub foto_url: Option<String>,
    #[serde(alias = "eleicaoId", deserialize_with = "number_from_any")]
    pub eleicao_id: u64,
    #[serde(
        default,
        deserialize_with = "opt_number_from_any",
        skip_serializing_if = "Option::is_none"
    )]
    pub votos: Option<u64>,
}

/// Photo uploaded from disk
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// Photo attached to a candidate draft
#[derive(Debug, Clone, PartialEq)]
pub enum Photo {
    /// Already hosted image
    Url(String),
    /// New image sent as multipart
    File(PhotoFile),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatoDraft {
    pub nome: String,
    pub numero: u32,
    pub eleicao_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partido: Option<String>,
    #[serde(skip)]
    pub foto: Option<Photo>,
}

impl CandidatoDraft {
    /// Draft that stores `candidato` unchanged, keeping its hosted photo
    pub fn from_entity(candidato: &Candidato) -> Self {
        Self {
            nome: candidato.nome.clone(),
            numero: candidato.numero,
            eleicao_id: candidato.eleicao_id,
            partido: candidato.partido.clone(),
            foto: candidato.foto_url.clone().map(Photo::Url),
        }
    }
}

/// Marker for the `/candidatos` resource
pub struct Candidatos;

impl Resource for Candidatos {
    type Entity = Candidato;
    type Draft = CandidatoDraft;

    const KIND: ResourceKind = ResourceKind::Candidatos;

    fn id(entity: &Candidato) -> u64 {
        entity.id
    }

    fn label(entity: &Candidato) -> String {
        entity.nome.clone()
    }

    /// JSON unless a photo file is attached, in which case the whole draft
    /// travels as multipart with the file under `foto`
    fn payload(draft: &CandidatoDraft) -> Result<RequestBody> {
        match &draft.foto {
            Some(Photo::File(file)) => {
                let mut parts = vec![
                    FormPart::text("nome", &draft.nome),
                    FormPart::text("numero", draft.numero.to_string()),
                    FormPart::text("eleicao_id", draft.eleicao_id.to_string()),
                ];
                if let Some(partido) = &draft.partido {
                    parts.push(FormPart::text("partido", partido));
                }
                parts.push(FormPart::File {
                    name: "foto".to_string(),
                    file_name: file.file_name.clone(),
                    mime: file.mime.clone(),
                    bytes: file.bytes.clone(),
                });
                Ok(RequestBody::Multipart(parts))
            }
            Some(Photo::Url(url)) => {
                let mut body = RequestBody::json(draft)?;
                if let RequestBody::Json(serde_json::Value::Object(map)) = &mut body {
                    map.insert("foto_url".to_string(), serde_json::Value::String(url.clone()));
                }
                Ok(body)
            }
            None => RequestBody::json(draft),
        }
    }

    fn from_draft(id: u64, draft: &CandidatoDraft, previous: Option<&Candidato>) -> Candidato {
        let foto_url = match &draft.foto {
            Some(Photo::Url(url)) => Some(url.clone()),
            Some(Photo::File(file)) => Some(format!("/uploads/candidatos/{}/{}", id, file.file_name)),
            None => previous.and_then(|p| p.foto_url.clone()),
        };
        Candidato {
            id,
            nome: draft.nome.clone(),
            numero: draft.numero,
            partido: draft.partido.clone(),
            foto_url,
            eleicao_id: draft.eleicao_id,
            votos: previous.and_then(|p| p.votos),
        }
    }
}
