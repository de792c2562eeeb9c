use anyhow::Result;
use std::path::Path;

use voto_client::forms::{EleitorForm, EleitorInput};
use voto_client::{Eleitores, FormController, ImportPage, Table, VoterUpload};

use super::{AdminContext, resources};
use crate::cli::{EleitorAction, EleitorFields};

impl EleitorFields {
    fn apply(self, input: &mut EleitorInput) {
        if let Some(nome) = self.nome {
            input.nome = nome;
        }
        if let Some(cpf) = self.cpf {
            input.cpf = cpf;
        }
        if let Some(matricula) = self.matricula {
            input.matricula = matricula;
        }
    }
}

pub async fn handle_eleitores_command(ctx: &AdminContext, action: EleitorAction) -> Result<()> {
    match action {
        EleitorAction::Create { fields } => {
            let form = FormController::<EleitorForm>::create();
            let mut input = form.initial_input();
            fields.apply(&mut input);
            resources::submit::<EleitorForm, Eleitores>(ctx, &form, &input, None).await
        }
        EleitorAction::Update { id, fields } => {
            let Some(eleitor) = resources::load::<Eleitores>(ctx, id).await else {
                return Ok(());
            };
            let form = FormController::<EleitorForm>::edit(EleitorInput::from(&eleitor));
            let mut input = form.initial_input();
            fields.apply(&mut input);
            resources::submit::<EleitorForm, Eleitores>(ctx, &form, &input, Some(id)).await
        }
        EleitorAction::Import { file } => import(ctx, &file).await,
        EleitorAction::Preview { file } => preview(&file).await,
        EleitorAction::Common(action) => {
            resources::handle_common_action::<Eleitores>(ctx, action).await
        }
    }
}

async fn import(ctx: &AdminContext, file: &Path) -> Result<()> {
    let upload = VoterUpload::from_path(file).await?;
    println!("Arquivo: {} ({} KB)", upload.file_name, upload.size_kb());

    let mut page = ImportPage::new(ctx.reports(), ctx.notifier());
    let mut progress = page.progress();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let percent = *progress.borrow_and_update();
            eprint!("\rEnviando... {:>3}%", percent);
        }
        eprintln!();
    });

    let report = page.upload(&upload).await.cloned();
    drop(page);
    printer.await?;

    if let Some(report) = report {
        if !report.message.is_empty() {
            println!("{}", report.message);
        }
        println!("Importados: {}", report.imported_count);
        println!("Com erro:   {}", report.failed_count);
        for error in &report.errors {
            println!("  - {}", error);
        }
    }
    Ok(())
}

async fn preview(file: &Path) -> Result<()> {
    let upload = VoterUpload::from_path(file).await?;
    let Some(rows) = ImportPage::preview(&upload) else {
        println!("Pré-visualização disponível apenas para arquivos CSV.");
        return Ok(());
    };

    let mut rows = rows.into_iter();
    let headers = rows.next().unwrap_or_default();
    let mut table = Table::new(
        headers.iter().map(String::as_str).collect(),
        "O arquivo não tem linhas de dados.",
    );
    for row in rows {
        table.push(row);
    }
    print!("{}", table);
    Ok(())
}
