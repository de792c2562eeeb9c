use anyhow::Result;

use voto_client::forms::{UrnaForm, UrnaInput};
use voto_client::{FormController, Urnas};

use super::{AdminContext, resources};
use crate::cli::{UrnaAction, UrnaFields};

impl UrnaFields {
    /// Overwrite the fields given on the command line
    fn apply(self, input: &mut UrnaInput) {
        if let Some(numero) = self.numero {
            input.numero = numero;
        }
        if let Some(localizacao) = self.localizacao {
            input.localizacao = localizacao;
        }
        if let Some(status) = self.status {
            input.status = status;
        }
    }
}

pub async fn handle_urnas_command(ctx: &AdminContext, action: UrnaAction) -> Result<()> {
    match action {
        UrnaAction::Create { fields } => {
            let form = FormController::<UrnaForm>::create();
            let mut input = form.initial_input();
            fields.apply(&mut input);
            resources::submit::<UrnaForm, Urnas>(ctx, &form, &input, None).await
        }
        UrnaAction::Update { id, fields } => {
            let Some(urna) = resources::load::<Urnas>(ctx, id).await else {
                return Ok(());
            };
            let form = FormController::<UrnaForm>::edit(UrnaInput::from(&urna));
            let mut input = form.initial_input();
            fields.apply(&mut input);
            resources::submit::<UrnaForm, Urnas>(ctx, &form, &input, Some(id)).await
        }
        UrnaAction::Common(action) => resources::handle_common_action::<Urnas>(ctx, action).await,
    }
}
