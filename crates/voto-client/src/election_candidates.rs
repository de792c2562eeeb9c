//! Candidates of one election

use std::sync::Arc;
use tracing::info;

use crate::api::{ListQuery, ResourceApi};
use crate::error::ApiError;
use crate::notify::{Notification, Notifier};
use crate::resource::ResourceKind;
use crate::route::Route;
use crate::session::Session;
use crate::types::{Candidato, CandidatoDraft, Candidatos, Eleicao, Eleicoes};

/// Every candidate belongs to exactly one election, so candidates can be
/// moved into this election but not detached from it.
pub struct ElectionCandidates {
    candidatos_api: Arc<dyn ResourceApi<Candidatos>>,
    notifier: Arc<dyn Notifier>,
    eleicao: Eleicao,
    candidatos: Vec<Candidato>,
}

impl ElectionCandidates {
    /// Fetch the election and all candidates; an unknown election sends the
    /// user back to the election list
    pub async fn load(
        eleicoes_api: Arc<dyn ResourceApi<Eleicoes>>,
        candidatos_api: Arc<dyn ResourceApi<Candidatos>>,
        notifier: Arc<dyn Notifier>,
        session: &Session,
        eleicao_id: u64,
    ) -> Option<Self> {
        let all = ListQuery::default();
        let (eleicao, candidatos) = tokio::join!(
            eleicoes_api.get(eleicao_id),
            candidatos_api.list(&all)
        );

        let loaded = eleicao.and_then(|e| candidatos.map(|c| (e, c)));
        match loaded {
            Ok((eleicao, candidatos)) => Some(Self {
                candidatos_api,
                notifier,
                eleicao,
                candidatos,
            }),
            Err(ApiError::NotFound { .. }) => {
                notifier.notify(Notification::error("Erro", "Eleição não encontrada."));
                session.navigate(Route::List(ResourceKind::Eleicoes));
                None
            }
            Err(e) => {
                notifier.notify(Notification::from_error(
                    "Erro ao carregar dados da eleição",
                    &e,
                ));
                None
            }
        }
    }

    pub fn eleicao(&self) -> &Eleicao {
        &self.eleicao
    }

    /// Candidates of this election matching `search` (by name)
    pub fn associated(&self, search: &str) -> Vec<&Candidato> {
        let needle = search.trim().to_lowercase();
        self.candidatos
            .iter()
            .filter(|c| c.eleicao_id == self.eleicao.id)
            .filter(|c| needle.is_empty() || c.nome.to_lowercase().contains(&needle))
            .collect()
    }

    /// Candidates currently in other elections
    pub fn available(&self) -> Vec<&Candidato> {
        self.candidatos
            .iter()
            .filter(|c| c.eleicao_id != self.eleicao.id)
            .collect()
    }

    /// Move a candidate into this election through `PUT /candidatos/:id`
    pub async fn attach(&mut self, candidato_id: u64) -> bool {
        let Some(index) = self
            .candidatos
            .iter()
            .position(|c| c.id == candidato_id && c.eleicao_id != self.eleicao.id)
        else {
            return false;
        };

        let mut draft = CandidatoDraft::from_entity(&self.candidatos[index]);
        draft.eleicao_id = self.eleicao.id;

        match self.candidatos_api.update(candidato_id, &draft).await {
            Ok(updated) => {
                info!(
                    "Candidate {} moved to election {}",
                    candidato_id, self.eleicao.id
                );
                self.notifier.notify(Notification::success(
                    "Candidato Adicionado",
                    format!(
                        "O candidato {} foi adicionado à eleição {}.",
                        updated.nome, self.eleicao.nome
                    ),
                ));
                self.candidatos[index] = updated;
                true
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::from_error("Erro ao adicionar candidato", &e));
                false
            }
        }
    }
}
