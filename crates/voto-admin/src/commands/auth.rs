use anyhow::Result;

use voto_client::forms::{LoginForm, LoginInput};
use voto_client::{FormController, FormOutcome, Notification, Notifier};

use super::{AdminContext, prompt, rejected};

pub async fn handle_login_command(
    ctx: &AdminContext,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Senha: ")?,
    };

    let form = FormController::<LoginForm>::create();
    let api = &ctx.api;
    let outcome = form
        .submit(&LoginInput { email, password }, |request| async move {
            api.login(&request).await
        })
        .await;

    match outcome {
        FormOutcome::Submitted(Ok(())) => {
            println!(
                "Login realizado. Token salvo em {}.",
                ctx.token_file().display()
            );
            Ok(())
        }
        FormOutcome::Submitted(Err(e)) => {
            ctx.notifications
                .notify(Notification::from_error("Falha no login", &e));
            Ok(())
        }
        FormOutcome::Invalid(errors) => Err(rejected(&errors)),
        FormOutcome::Cancelled => Ok(()),
    }
}

pub async fn handle_logout_command(ctx: &AdminContext) -> Result<()> {
    ctx.api.logout()?;
    println!("Sessão encerrada.");
    Ok(())
}
