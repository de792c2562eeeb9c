//! Overview page

use std::sync::Arc;

use crate::api::ReportApi;
use crate::notify::{Notification, Notifier};
use crate::render::{StatCard, format_count};
use crate::resource::ResourceKind;
use crate::route::Route;
use crate::types::DashboardSummary;

/// Entry of the management menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub description: &'static str,
}

pub struct DashboardPage {
    api: Arc<dyn ReportApi>,
    notifier: Arc<dyn Notifier>,
    summary: Option<DashboardSummary>,
}

impl DashboardPage {
    pub fn new(api: Arc<dyn ReportApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            summary: None,
        }
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.summary.as_ref()
    }

    pub async fn load(&mut self) -> bool {
        match self.api.dashboard_summary().await {
            Ok(summary) => {
                self.summary = Some(summary);
                true
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::from_error("Erro ao carregar dashboard", &e));
                false
            }
        }
    }

    /// Machine status, connection and total votes; `...` until loaded
    pub fn stat_items(&self) -> [StatCard; 3] {
        match &self.summary {
            Some(s) => [
                StatCard::new("Status da Urna", s.status_urna.label()),
                StatCard::new("Conexão da Urna", s.conexao_urna.to_string()),
                StatCard::new("Total de Votos", format_count(s.total_votos)),
            ],
            None => [
                StatCard::new("Status da Urna", "..."),
                StatCard::new("Conexão da Urna", "..."),
                StatCard::new("Total de Votos", "0"),
            ],
        }
    }

    pub fn counts(&self) -> [StatCard; 3] {
        let count = |pick: fn(&DashboardSummary) -> u64| {
            self.summary
                .as_ref()
                .map(|s| format_count(pick(s)))
                .unwrap_or_else(|| "0".to_string())
        };
        [
            StatCard::new("Eleições", count(|s| s.contagem_eleicoes)),
            StatCard::new("Candidatos", count(|s| s.contagem_candidatos)),
            StatCard::new("Eleitores", count(|s| s.contagem_eleitores)),
        ]
    }

    pub fn navigation() -> Vec<NavItem> {
        vec![
            NavItem {
                route: Route::List(ResourceKind::Urnas),
                label: "Urnas",
                description: "Gerencie a urna eletrônica",
            },
            NavItem {
                route: Route::List(ResourceKind::Eleicoes),
                label: "Eleições",
                description: "Crie e configure eleições",
            },
            NavItem {
                route: Route::List(ResourceKind::Candidatos),
                label: "Candidatos",
                description: "Adicione e edite candidatos",
            },
            NavItem {
                route: Route::List(ResourceKind::Eleitores),
                label: "Eleitores",
                description: "Gerencie a lista de eleitores",
            },
            NavItem {
                route: Route::Results,
                label: "Resultados",
                description: "Visualize os resultados",
            },
            NavItem {
                route: Route::List(ResourceKind::Auditoria),
                label: "Logs de Auditoria",
                description: "Acompanhe todas as ações",
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryReports;
    use crate::notify::NotificationLog;
    use crate::types::{Conexao, UrnaStatus};

    #[tokio::test]
    async fn test_summary_cards() {
        let reports = InMemoryReports::new().with_summary(DashboardSummary {
            status_urna: UrnaStatus::Ativa,
            conexao_urna: Conexao::Online,
            total_votos: 1234,
            contagem_eleicoes: 2,
            contagem_candidatos: 8,
            contagem_eleitores: 5000,
        });
        let mut page = DashboardPage::new(Arc::new(reports), Arc::new(NotificationLog::new()));

        assert_eq!(page.stat_items()[0].value, "...");
        assert!(page.load().await);
        let items = page.stat_items();
        assert_eq!(items[0].value, "Ativa");
        assert_eq!(items[1].value, "Online");
        assert_eq!(items[2].value, "1.234");
        assert_eq!(page.counts()[2].value, "5.000");
    }

    #[tokio::test]
    async fn test_failure_notifies() {
        let reports = Arc::new(InMemoryReports::new());
        reports.fail_next("summary", 500);
        let log = Arc::new(NotificationLog::new());
        let mut page = DashboardPage::new(reports, log.clone());

        assert!(!page.load().await);
        assert_eq!(log.errors(), 1);
        assert!(page.summary().is_none());
    }
}
