//! Client-side search and filters over an already fetched page of data

use chrono::NaiveDate;
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::types::{Candidato, Eleicao, Eleitor, LogEntry, Urna};

/// Fields matched by the search box
pub trait Searchable {
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Case-insensitive substring match; `needle` must already be lowercase
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for Urna {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.numero.as_str()),
            Cow::Borrowed(self.localizacao.as_str()),
            Cow::Owned(self.id.to_string()),
        ]
    }
}

impl Searchable for Eleicao {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.nome.as_str()), Cow::Owned(self.id.to_string())]
    }
}

impl Searchable for Candidato {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![
            Cow::Borrowed(self.nome.as_str()),
            Cow::Owned(self.numero.to_string()),
        ];
        if let Some(partido) = &self.partido {
            fields.push(Cow::Borrowed(partido.as_str()));
        }
        fields
    }
}

impl Searchable for Eleitor {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.nome.as_str()),
            Cow::Borrowed(self.cpf.as_str()),
            Cow::Owned(self.formatted_cpf()),
            Cow::Borrowed(self.matricula.as_str()),
        ]
    }
}

impl Searchable for LogEntry {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.acao.as_str()),
            Cow::Borrowed(self.usuario.nome.as_str()),
            Cow::Borrowed(self.descricao.as_str()),
        ]
    }
}

/// Items whose search fields contain `query`; a blank query keeps everything
pub fn filter_by_search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&needle)).collect()
}

/// Filters of the audit page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Exact action label; `None` keeps every action
    pub action: Option<String>,
    /// Calendar day (UTC)
    pub date: Option<NaiveDate>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let action_match = self.action.as_deref().is_none_or(|a| a == entry.acao);
        let date_match = self.date.is_none_or(|d| entry.data.date_naive() == d);
        action_match && date_match
    }

    pub fn apply<'a>(&self, logs: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        logs.iter().filter(|entry| self.matches(entry)).collect()
    }
}

/// Action labels in first-seen order, for the action selector
pub fn distinct_actions(logs: &[LogEntry]) -> Vec<String> {
    let mut actions: Vec<String> = Vec::new();
    for entry in logs {
        if !actions.contains(&entry.acao) {
            actions.push(entry.acao.clone());
        }
    }
    actions
}

/// Delays search terms; a newer term supersedes any term still waiting
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait out the delay; `None` if another term arrived meanwhile
    pub async fn settle(&self, term: impl Into<String>) -> Option<String> {
        let term = term.into();
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogUser, UrnaStatus};
    use chrono::{TimeZone, Utc};

    fn urna(id: u64, numero: &str, localizacao: &str) -> Urna {
        Urna {
            id,
            numero: numero.to_string(),
            localizacao: localizacao.to_string(),
            status: UrnaStatus::Ativa,
            ultima_atividade: None,
        }
    }

    fn log(id: u64, acao: &str, day: u32) -> LogEntry {
        LogEntry {
            id,
            data: Utc.with_ymd_and_hms(2024, 8, day, 10, 0, 0).unwrap(),
            acao: acao.to_string(),
            usuario: LogUser {
                nome: "admin".to_string(),
            },
            descricao: String::new(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let urnas = vec![
            urna(1, "0001", "Escola Central"),
            urna(2, "0002", "Ginásio Norte"),
            urna(3, "0103", "Escola do Campo"),
        ];

        let found: Vec<u64> = filter_by_search(&urnas, "ESCOLA").iter().map(|u| u.id).collect();
        assert_eq!(found, vec![1, 3]);

        let found: Vec<u64> = filter_by_search(&urnas, "010").iter().map(|u| u.id).collect();
        assert_eq!(found, vec![3]);

        assert_eq!(filter_by_search(&urnas, "   ").len(), 3);
        assert!(filter_by_search(&urnas, "hospital").is_empty());
    }

    #[test]
    fn test_eleitor_matches_formatted_and_raw_cpf() {
        let eleitores = vec![Eleitor {
            id: 1,
            nome: "João".into(),
            cpf: "12345678901".into(),
            matricula: "555".into(),
        }];
        assert_eq!(filter_by_search(&eleitores, "456.789").len(), 1);
        assert_eq!(filter_by_search(&eleitores, "45678").len(), 1);
        assert_eq!(filter_by_search(&eleitores, "joão").len(), 1);
    }

    #[test]
    fn test_log_filter_by_action_and_day() {
        let logs = vec![
            log(1, "Login de Usuário", 15),
            log(2, "Criação de Eleição", 15),
            log(3, "Login de Usuário", 16),
        ];

        assert_eq!(
            distinct_actions(&logs),
            vec!["Login de Usuário", "Criação de Eleição"]
        );
        assert_eq!(LogFilter::default().apply(&logs).len(), 3);

        let filter = LogFilter {
            action: Some("Login de Usuário".into()),
            date: NaiveDate::from_ymd_opt(2024, 8, 16),
        };
        let ids: Vec<u64> = filter.apply(&logs).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_keeps_only_latest_term() {
        let debouncer = Debouncer::new(Duration::from_millis(300));

        let first = debouncer.settle("jo");
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            debouncer.settle("joão").await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, None);
        assert_eq!(second.as_deref(), Some("joão"));
    }
}
