//! Results page: per-election totals, chart series and CSV export

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::{ListQuery, ReportApi, ResourceApi};
use crate::notify::{Notification, Notifier};
use crate::render::{StatCard, format_count};
use crate::types::{Eleicao, Eleicoes, ResultadoData};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// `resultados_<name with whitespace runs as _>.csv`, or the id when the
/// name is unknown
pub fn export_file_name(eleicao: Option<&Eleicao>, eleicao_id: u64) -> String {
    let stem = eleicao
        .map(|e| e.nome.trim())
        .filter(|nome| !nome.is_empty())
        .map(|nome| WHITESPACE.replace_all(nome, "_").into_owned())
        .unwrap_or_else(|| eleicao_id.to_string());
    format!("resultados_{}.csv", stem)
}

/// Per-candidate data for the pie and bar charts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub votes: Vec<u64>,
    /// Share of the candidate votes, one decimal
    pub percentages: Vec<f64>,
}

impl ChartSeries {
    pub fn from_results(results: &ResultadoData) -> Self {
        let total = results.candidate_total();
        let mut series = Self::default();
        for candidate in &results.votos_por_candidato {
            series.labels.push(candidate.nome.clone());
            series.votes.push(candidate.votos);
            let share = if total == 0 {
                0.0
            } else {
                (candidate.votos as f64 * 1000.0 / total as f64).round() / 10.0
            };
            series.percentages.push(share);
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub struct ResultsPage {
    eleicoes_api: Arc<dyn ResourceApi<Eleicoes>>,
    reports: Arc<dyn ReportApi>,
    notifier: Arc<dyn Notifier>,
    eleicoes: Vec<Eleicao>,
    selected: Option<u64>,
    results: Option<ResultadoData>,
}

impl ResultsPage {
    pub fn new(
        eleicoes_api: Arc<dyn ResourceApi<Eleicoes>>,
        reports: Arc<dyn ReportApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            eleicoes_api,
            reports,
            notifier,
            eleicoes: Vec::new(),
            selected: None,
            results: None,
        }
    }

    pub fn eleicoes(&self) -> &[Eleicao] {
        &self.eleicoes
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    pub fn results(&self) -> Option<&ResultadoData> {
        self.results.as_ref()
    }

    /// Fetch the elections and show the first one
    pub async fn load(&mut self) {
        match self.eleicoes_api.list(&ListQuery::default()).await {
            Ok(eleicoes) => self.eleicoes = eleicoes,
            Err(e) => {
                self.notifier
                    .notify(Notification::from_error("Erro ao carregar eleições", &e));
                return;
            }
        }
        if let Some(first) = self.eleicoes.first().map(|e| e.id) {
            self.select(first).await;
        }
    }

    /// Fetch the totals of one election; a failure clears the previous ones
    pub async fn select(&mut self, eleicao_id: u64) -> bool {
        debug!("Selecting election {}", eleicao_id);
        self.selected = Some(eleicao_id);
        match self.reports.results(eleicao_id).await {
            Ok(results) => {
                self.results = Some(results);
                true
            }
            Err(e) => {
                self.results = None;
                self.notifier
                    .notify(Notification::from_error("Erro ao buscar resultados", &e));
                false
            }
        }
    }

    /// Total, blank and null votes
    pub fn stat_cards(&self) -> [StatCard; 3] {
        let value = |pick: fn(&ResultadoData) -> u64| {
            self.results
                .as_ref()
                .map(|r| format_count(pick(r)))
                .unwrap_or_else(|| "0".to_string())
        };
        [
            StatCard::new("Total de Votos", value(|r| r.total_votos)),
            StatCard::new("Votos Brancos", value(|r| r.votos_brancos)),
            StatCard::new("Votos Nulos", value(|r| r.votos_nulos)),
        ]
    }

    pub fn chart_series(&self) -> ChartSeries {
        self.results
            .as_ref()
            .map(ChartSeries::from_results)
            .unwrap_or_default()
    }

    pub fn export_file_name(&self) -> Option<String> {
        let id = self.selected?;
        Some(export_file_name(
            self.eleicoes.iter().find(|e| e.id == id),
            id,
        ))
    }

    /// Download the CSV report of the selected election into `dir`
    pub async fn export(&self, dir: &Path) -> Option<PathBuf> {
        let id = self.selected?;
        let file_name = self.export_file_name()?;

        let saved = async {
            let bytes = self.reports.export_results(id).await?;
            let path = dir.join(&file_name);
            tokio::fs::write(&path, &bytes).await?;
            Ok::<PathBuf, crate::error::ApiError>(path)
        }
        .await;

        match saved {
            Ok(path) => {
                info!("Exported results of election {} to {:?}", id, path);
                self.notifier.notify(Notification::success(
                    "Exportação Concluída",
                    format!("Relatório salvo em {}.", path.display()),
                ));
                Some(path)
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::from_error("Erro na Exportação", &e));
                None
            }
        }
    }
}
