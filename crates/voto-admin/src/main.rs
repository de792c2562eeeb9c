//! Voto Seguro administration CLI
//!
//! Manages voting machines, elections, candidates and voters through the
//! Voto Seguro REST API, and shows the dashboard, audit trail and results.
//!
//! ## Usage
//!
//! ```bash
//! # Sign in once; the token is kept in ~/.voto-admin/token
//! voto-admin login --email admin@voto.gov.br
//!
//! # List, create and delete voting machines
//! voto-admin urnas list --search "seção 1"
//! voto-admin urnas create --numero 0042 --localizacao "Escola Central"
//! voto-admin urnas delete 3
//!
//! # Upload a voter file and export results
//! voto-admin eleitores import eleitores.csv
//! voto-admin resultados export --eleicao 2 --out ./relatorios
//!
//! # More logs
//! RUST_LOG=debug voto-admin dashboard
//! ```
//!
//! ## Environment Variables
//!
//! - `VOTO_API_URL`: base URL of the API (default: `http://localhost:3000/api`)
//! - `VOTO_API_PREFIX`: version prefix of resource paths (default: `/v1`)
//! - `VOTO_TOKEN_FILE`: session token file (default: `~/.voto-admin/token`)
//! - `VOTO_CONFIG`: TOML configuration file (default: `voto.toml`)
//! - `RUST_LOG`: log filter; overrides `--log-level`

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands::AdminContext;
use crate::config::VotoToml;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so that tables on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "voto_admin={level},voto_client={level},reqwest=warn",
                    level = cli.log_level
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let toml = VotoToml::from_file(&cli.config)?;
    let client_config = toml.client_config(cli.api_url.clone(), cli.api_prefix.clone());
    let token_file = toml.token_file(cli.token_file.clone());

    let route = cli.command.route();
    debug!("Command route: {}", route);
    let ctx = AdminContext::new(client_config, token_file, route)?;
    ctx.enter(route)?;

    let result = match cli.command {
        Commands::Login { email, password } => {
            commands::auth::handle_login_command(&ctx, email, password).await
        }
        Commands::Logout => commands::auth::handle_logout_command(&ctx).await,
        Commands::Dashboard => commands::dashboard::handle_dashboard_command(&ctx).await,
        Commands::Urnas { action } => commands::urnas::handle_urnas_command(&ctx, action).await,
        Commands::Eleicoes { action } => {
            commands::eleicoes::handle_eleicoes_command(&ctx, action).await
        }
        Commands::Candidatos { action } => {
            commands::candidatos::handle_candidatos_command(&ctx, action).await
        }
        Commands::Eleitores { action } => {
            commands::eleitores::handle_eleitores_command(&ctx, action).await
        }
        Commands::Auditoria {
            action,
            date,
            search,
        } => commands::auditoria::handle_auditoria_command(&ctx, action, date, &search).await,
        Commands::Resultados { action } => {
            commands::resultados::handle_resultados_command(&ctx, action).await
        }
    };

    ctx.flush();
    result
}
