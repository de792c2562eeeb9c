use anyhow::Result;

use voto_client::forms::{EleicaoForm, EleicaoFormOptions, EleicaoInput};
use voto_client::{ElectionCandidates, Eleicoes, FormController, Table, Urnas};

use super::{AdminContext, resources};
use crate::cli::{EleicaoAction, EleicaoFields};

impl EleicaoFields {
    fn apply(self, input: &mut EleicaoInput) {
        if let Some(nome) = self.nome {
            input.nome = nome;
        }
        if let Some(descricao) = self.descricao {
            input.descricao = descricao;
        }
        if let Some(inicio) = self.inicio {
            input.data_inicio = inicio;
        }
        if let Some(fim) = self.fim {
            input.data_fim = fim;
        }
        if let Some(urna) = self.urna {
            input.urna_id = urna;
        }
    }
}

/// Voting machines an election can be assigned to
async fn print_urna_choices(ctx: &AdminContext) {
    let api = ctx.resource::<Urnas>();
    match EleicaoFormOptions::load(api.as_ref()).await {
        Ok(options) => {
            eprintln!("Urnas disponíveis (--urna):");
            for (id, label) in options.choices() {
                eprintln!("  {:>4}  {}", id, label);
            }
        }
        Err(e) => tracing::warn!("Failed to load voting machines: {}", e),
    }
}

pub async fn handle_eleicoes_command(ctx: &AdminContext, action: EleicaoAction) -> Result<()> {
    match action {
        EleicaoAction::Create { fields } => {
            let form = FormController::<EleicaoForm>::create();
            let mut input = form.initial_input();
            let missing_urna = fields.urna.is_none();
            fields.apply(&mut input);

            let submitted = resources::submit::<EleicaoForm, Eleicoes>(ctx, &form, &input, None).await;
            if submitted.is_err() && missing_urna {
                print_urna_choices(ctx).await;
            }
            submitted
        }
        EleicaoAction::Update { id, fields } => {
            let Some(eleicao) = resources::load::<Eleicoes>(ctx, id).await else {
                return Ok(());
            };
            let form = FormController::<EleicaoForm>::edit(EleicaoInput::from(&eleicao));
            let mut input = form.initial_input();
            fields.apply(&mut input);
            resources::submit::<EleicaoForm, Eleicoes>(ctx, &form, &input, Some(id)).await
        }
        EleicaoAction::Candidatos { id, search, attach } => {
            handle_candidates(ctx, id, &search, attach).await
        }
        EleicaoAction::Common(action) => {
            resources::handle_common_action::<Eleicoes>(ctx, action).await
        }
    }
}

async fn handle_candidates(
    ctx: &AdminContext,
    eleicao_id: u64,
    search: &str,
    attach: Option<u64>,
) -> Result<()> {
    let Some(mut page) = ElectionCandidates::load(
        ctx.resource(),
        ctx.resource(),
        ctx.notifier(),
        &ctx.session,
        eleicao_id,
    )
    .await
    else {
        return Ok(());
    };

    if let Some(candidato_id) = attach {
        if !page.attach(candidato_id).await && !page.available().iter().any(|c| c.id == candidato_id)
        {
            eprintln!(
                "Candidato {} não está disponível para esta eleição.",
                candidato_id
            );
        }
    }

    println!("{}", page.eleicao().nome);
    print!(
        "{}",
        Table::from_items(page.associated(search), "Nenhum candidato associado.")
    );
    println!();
    println!("Disponíveis:");
    print!(
        "{}",
        Table::from_items(page.available(), "Nenhum candidato disponível.")
    );
    Ok(())
}
