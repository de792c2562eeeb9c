use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use voto_client::{ResourceKind, Route};

#[derive(Parser, Debug)]
#[command(name = "voto-admin")]
#[command(about = "Voto Seguro - administration of voting machines, elections, candidates and voters")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Base URL of the API (overrides voto.toml)
    #[arg(long, global = true, env = "VOTO_API_URL")]
    pub api_url: Option<String>,

    /// Version prefix of resource paths, e.g. /v1 (overrides voto.toml)
    #[arg(long, global = true, env = "VOTO_API_PREFIX")]
    pub api_prefix: Option<String>,

    /// File holding the session token
    #[arg(long, global = true, env = "VOTO_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(long, global = true, env = "VOTO_CONFIG", default_value = "voto.toml")]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "VOTO_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long, env = "VOTO_EMAIL")]
        email: String,

        /// Read from stdin when omitted
        #[arg(long, env = "VOTO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Machine status, vote totals and counts
    Dashboard,

    /// Voting machines
    Urnas {
        #[command(subcommand)]
        action: UrnaAction,
    },

    /// Elections
    Eleicoes {
        #[command(subcommand)]
        action: EleicaoAction,
    },

    /// Candidates
    Candidatos {
        #[command(subcommand)]
        action: CandidatoAction,
    },

    /// Registered voters
    Eleitores {
        #[command(subcommand)]
        action: EleitorAction,
    },

    /// Audit trail
    Auditoria {
        /// Keep only this action label
        #[arg(long)]
        action: Option<String>,

        /// Keep only this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        search: String,
    },

    /// Election results
    Resultados {
        #[command(subcommand)]
        action: ResultadoAction,
    },
}

impl Commands {
    /// Screen the command stands for, checked against the auth gate
    pub fn route(&self) -> Route {
        match self {
            Commands::Login { .. } | Commands::Logout => Route::Login,
            Commands::Dashboard => Route::Dashboard,
            Commands::Urnas { action } => match action {
                UrnaAction::Create { .. } => Route::New(ResourceKind::Urnas),
                UrnaAction::Update { id, .. } => Route::Edit(ResourceKind::Urnas, *id),
                UrnaAction::Common(_) => Route::List(ResourceKind::Urnas),
            },
            Commands::Eleicoes { action } => match action {
                EleicaoAction::Create { .. } => Route::New(ResourceKind::Eleicoes),
                EleicaoAction::Update { id, .. } => Route::Edit(ResourceKind::Eleicoes, *id),
                EleicaoAction::Candidatos { id, .. } => Route::ElectionCandidates(*id),
                EleicaoAction::Common(_) => Route::List(ResourceKind::Eleicoes),
            },
            Commands::Candidatos { action } => match action {
                CandidatoAction::Create { .. } => Route::New(ResourceKind::Candidatos),
                CandidatoAction::Update { id, .. } => Route::Edit(ResourceKind::Candidatos, *id),
                CandidatoAction::Common(_) => Route::List(ResourceKind::Candidatos),
            },
            Commands::Eleitores { action } => match action {
                EleitorAction::Create { .. } => Route::New(ResourceKind::Eleitores),
                EleitorAction::Update { id, .. } => Route::Edit(ResourceKind::Eleitores, *id),
                EleitorAction::Import { .. } | EleitorAction::Preview { .. } => {
                    Route::ImportVoters
                }
                EleitorAction::Common(_) => Route::List(ResourceKind::Eleitores),
            },
            Commands::Auditoria { .. } => Route::List(ResourceKind::Auditoria),
            Commands::Resultados { .. } => Route::Results,
        }
    }
}

/// List, show and delete, shared by every resource
#[derive(Subcommand, Debug)]
pub enum CommonAction {
    /// List entries
    List {
        /// Case-insensitive filter over the visible columns
        #[arg(long, default_value = "")]
        search: String,

        /// Page number, sent to the API together with --limit
        #[arg(long, requires = "limit")]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one entry
    Show { id: u64 },

    /// Delete an entry
    Delete {
        id: u64,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum UrnaAction {
    /// Register a voting machine
    Create {
        #[command(flatten)]
        fields: UrnaFields,
    },

    /// Update a voting machine; omitted fields keep their value
    Update {
        id: u64,

        #[command(flatten)]
        fields: UrnaFields,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum EleicaoAction {
    /// Create an election
    Create {
        #[command(flatten)]
        fields: EleicaoFields,
    },

    /// Update an election; omitted fields keep their value
    Update {
        id: u64,

        #[command(flatten)]
        fields: EleicaoFields,
    },

    /// Candidates of one election
    Candidatos {
        id: u64,

        #[arg(long, default_value = "")]
        search: String,

        /// Move this candidate into the election
        #[arg(long)]
        attach: Option<u64>,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum CandidatoAction {
    /// Register a candidate
    Create {
        #[command(flatten)]
        fields: CandidatoFields,
    },

    /// Update a candidate; omitted fields keep their value
    Update {
        id: u64,

        #[command(flatten)]
        fields: CandidatoFields,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum EleitorAction {
    /// Register a voter
    Create {
        #[command(flatten)]
        fields: EleitorFields,
    },

    /// Update a voter; omitted fields keep their value
    Update {
        id: u64,

        #[command(flatten)]
        fields: EleitorFields,
    },

    /// Upload a .csv, .xls or .xlsx voter file
    Import { file: PathBuf },

    /// Show the header and first rows of a CSV voter file
    Preview { file: PathBuf },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Args, Debug, Default)]
pub struct UrnaFields {
    #[arg(long)]
    pub numero: Option<String>,

    #[arg(long)]
    pub localizacao: Option<String>,

    /// ativa, inativa or manutencao
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct EleicaoFields {
    #[arg(long)]
    pub nome: Option<String>,

    #[arg(long)]
    pub descricao: Option<String>,

    /// Start, e.g. 2024-10-06T08:00
    #[arg(long)]
    pub inicio: Option<String>,

    /// End, e.g. 2024-10-06T17:00
    #[arg(long)]
    pub fim: Option<String>,

    /// Voting machine id
    #[arg(long)]
    pub urna: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct CandidatoFields {
    #[arg(long)]
    pub nome: Option<String>,

    #[arg(long)]
    pub numero: Option<String>,

    /// Election id
    #[arg(long)]
    pub eleicao: Option<String>,

    #[arg(long)]
    pub partido: Option<String>,

    /// Link to a hosted photo
    #[arg(long, conflicts_with = "foto")]
    pub foto_url: Option<String>,

    /// Image file to upload
    #[arg(long)]
    pub foto: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct EleitorFields {
    #[arg(long)]
    pub nome: Option<String>,

    /// With or without punctuation
    #[arg(long)]
    pub cpf: Option<String>,

    #[arg(long)]
    pub matricula: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ResultadoAction {
    /// Totals and per-candidate votes
    Show {
        /// Election id; the first election when omitted
        #[arg(long)]
        eleicao: Option<u64>,
    },

    /// Save the CSV report
    Export {
        #[arg(long)]
        eleicao: Option<u64>,

        /// Destination directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_routes_of_commands() {
        let cli = Cli::parse_from(["voto-admin", "urnas", "update", "3", "--status", "inativa"]);
        assert_eq!(cli.command.route(), Route::Edit(ResourceKind::Urnas, 3));

        let cli = Cli::parse_from(["voto-admin", "eleicoes", "candidatos", "2", "--attach", "7"]);
        assert_eq!(cli.command.route(), Route::ElectionCandidates(2));

        let cli = Cli::parse_from(["voto-admin", "eleitores", "import", "lote.csv"]);
        assert_eq!(cli.command.route(), Route::ImportVoters);
        assert!(Cli::parse_from(["voto-admin", "logout"]).command.route() == Route::Login);
    }

    #[test]
    fn test_date_filter_parses() {
        let cli = Cli::parse_from(["voto-admin", "auditoria", "--date", "2024-08-15"]);
        let Commands::Auditoria { date, .. } = cli.command else {
            panic!("expected auditoria");
        };
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 8, 15));
    }
}
