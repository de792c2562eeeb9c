use anyhow::{Context, Result};
use std::path::Path;

use voto_client::forms::{CandidatoForm, CandidatoFormOptions, CandidatoInput, PhotoPreview};
use voto_client::types::PhotoFile;
use voto_client::{Candidatos, Eleicoes, FormController};

use super::{AdminContext, resources};
use crate::cli::{CandidatoAction, CandidatoFields};

/// Content type from the file extension; unknown types are rejected by the
/// form as non-images
fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

async fn read_photo(path: &Path) -> Result<PhotoFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("foto")
        .to_string();
    Ok(PhotoFile {
        file_name,
        mime: image_mime(path).to_string(),
        bytes: bytes.into(),
    })
}

impl CandidatoFields {
    async fn apply(self, input: &mut CandidatoInput) -> Result<()> {
        if let Some(nome) = self.nome {
            input.nome = nome;
        }
        if let Some(numero) = self.numero {
            input.numero = numero;
        }
        if let Some(eleicao) = self.eleicao {
            input.eleicao_id = eleicao;
        }
        if let Some(partido) = self.partido {
            input.partido = partido;
        }
        if let Some(foto_url) = self.foto_url {
            input.foto_url = foto_url;
        }
        if let Some(path) = self.foto {
            input.foto_file = Some(read_photo(&path).await?);
        }
        Ok(())
    }
}

fn print_preview(input: &CandidatoInput) {
    if let Some(file) = &input.foto_file {
        println!("Foto: {} ({} bytes)", file.file_name, file.bytes.len());
        return;
    }
    match PhotoPreview::from_input(input) {
        PhotoPreview::Image(url) => println!("Foto: {}", url),
        PhotoPreview::Initials(initials) => println!("Foto: sem imagem [{}]", initials),
    }
}

async fn print_election_choices(ctx: &AdminContext) {
    let api = ctx.resource::<Eleicoes>();
    match CandidatoFormOptions::load(api.as_ref()).await {
        Ok(options) => {
            eprintln!("Eleições disponíveis (--eleicao):");
            for (id, label) in options.choices() {
                eprintln!("  {:>4}  {}", id, label);
            }
        }
        Err(e) => tracing::warn!("Failed to load elections: {}", e),
    }
}

pub async fn handle_candidatos_command(ctx: &AdminContext, action: CandidatoAction) -> Result<()> {
    match action {
        CandidatoAction::Create { fields } => {
            let form = FormController::<CandidatoForm>::create();
            let mut input = form.initial_input();
            let missing_election = fields.eleicao.is_none();
            fields.apply(&mut input).await?;
            print_preview(&input);

            let submitted =
                resources::submit::<CandidatoForm, Candidatos>(ctx, &form, &input, None).await;
            if submitted.is_err() && missing_election {
                print_election_choices(ctx).await;
            }
            submitted
        }
        CandidatoAction::Update { id, fields } => {
            let Some(candidato) = resources::load::<Candidatos>(ctx, id).await else {
                return Ok(());
            };
            let form = FormController::<CandidatoForm>::edit(CandidatoInput::from(&candidato));
            let mut input = form.initial_input();
            fields.apply(&mut input).await?;
            print_preview(&input);
            resources::submit::<CandidatoForm, Candidatos>(ctx, &form, &input, Some(id)).await
        }
        CandidatoAction::Common(action) => {
            resources::handle_common_action::<Candidatos>(ctx, action).await
        }
    }
}
