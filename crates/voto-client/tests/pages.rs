//! Page flows over the in-memory API

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use voto_client::forms::{UrnaForm, UrnaInput};
use voto_client::types::{CandidateVotes, EleicaoStatus, UrnaDraft, UrnaStatus};
use voto_client::{
    ApiError, Candidato, Candidatos, DashboardPage, Eleicao, Eleicoes, ElectionCandidates,
    EntityEditor, FormController, FormOutcome, ImportPage, ImportReport, InMemoryApi,
    InMemoryReports, ListPage, ListQuery, LoadState, MemoryNavigator, MemoryTokenStore,
    Navigator, NotificationLog, Operation, ResourceApi, ResourceKind, ResultadoData,
    ResultsPage, Route, Session, Urna, Urnas, VoterUpload,
};

fn urna(id: u64) -> Urna {
    Urna {
        id,
        numero: format!("{:04}", id),
        localizacao: format!("Seção {}", id),
        status: UrnaStatus::Ativa,
        ultima_atividade: None,
    }
}

fn eleicao(id: u64, nome: &str) -> Eleicao {
    Eleicao {
        id,
        nome: nome.to_string(),
        descricao: None,
        data_inicio: Utc.with_ymd_and_hms(2024, 10, 6, 8, 0, 0).unwrap(),
        data_fim: Utc.with_ymd_and_hms(2024, 10, 6, 17, 0, 0).unwrap(),
        urna_id: Some(1),
        status: EleicaoStatus::Ativa,
    }
}

fn candidato(id: u64, nome: &str, eleicao_id: u64) -> Candidato {
    Candidato {
        id,
        nome: nome.to_string(),
        numero: id as u32 * 10,
        partido: None,
        foto_url: None,
        eleicao_id,
        votos: None,
    }
}

fn results(total: u64, brancos: u64, nulos: u64) -> ResultadoData {
    ResultadoData {
        total_votos: total,
        votos_brancos: brancos,
        votos_nulos: nulos,
        votos_por_candidato: vec![CandidateVotes {
            nome: "A".into(),
            votos: total - brancos - nulos,
        }],
    }
}

fn session_at(route: Route) -> (Session, Arc<MemoryNavigator>) {
    let navigator = Arc::new(MemoryNavigator::new(route));
    let session = Session::new(
        Arc::new(MemoryTokenStore::with_token("t")),
        navigator.clone(),
    );
    (session, navigator)
}

#[tokio::test]
async fn test_empty_list_renders_message_row() {
    let page = ListPage::<Urnas>::new(
        Arc::new(InMemoryApi::new()),
        Arc::new(NotificationLog::new()),
    );

    assert_eq!(page.load().await, LoadState::Loaded);
    let table = page.table("");
    assert!(table.is_empty());
    assert!(table.to_string().contains("Nenhuma urna encontrada."));
}

#[tokio::test]
async fn test_search_without_match_renders_message_row() {
    let page = ListPage::<Urnas>::new(
        Arc::new(InMemoryApi::with_items(vec![urna(1), urna(2)])),
        Arc::new(NotificationLog::new()),
    );
    page.load().await;

    assert_eq!(page.visible("seção 2").len(), 1);
    assert_eq!(
        page.table("zona norte").display_rows(),
        vec![vec!["Nenhuma urna encontrada.".to_string()]]
    );
}

#[tokio::test]
async fn test_confirmed_delete_issues_one_call_and_reloads() {
    let api = Arc::new(InMemoryApi::<Urnas>::with_items(vec![urna(1), urna(2)]));
    let log = Arc::new(NotificationLog::new());
    let page = ListPage::new(api.clone(), log.clone());
    page.load().await;

    let dialog = page.request_delete(1).unwrap();
    assert_eq!(
        dialog.message,
        "Tem certeza que deseja remover a urna 0001? Esta ação não pode ser desfeita."
    );
    assert!(page.confirm_delete(dialog).await);

    assert_eq!(api.calls(Operation::Delete), 1);
    assert_eq!(api.calls(Operation::List), 2);
    assert_eq!(page.items(), vec![urna(2)]);
    let last = log.last().unwrap();
    assert_eq!(last.title, "Urna Removida");
    assert_eq!(last.description, "A urna 0001 foi removida com sucesso.");
}

#[tokio::test]
async fn test_delete_outside_loaded_page() {
    let api = Arc::new(InMemoryApi::<Urnas>::with_items(vec![urna(1), urna(2)]));
    let page = ListPage::new(api.clone(), Arc::new(NotificationLog::new()));
    page.set_query(ListQuery::default().with_page(1, 1));
    page.load().await;
    assert!(page.request_delete(2).is_none());

    let fetched = api.get(2).await.unwrap();
    let dialog = page.delete_dialog(&fetched);
    assert_eq!(dialog.id, 2);
    assert_eq!(dialog.label, "0002");
    assert!(page.confirm_delete(dialog).await);

    assert_eq!(api.calls(Operation::Delete), 1);
    assert!(matches!(api.get(2).await, Err(ApiError::NotFound { .. })));
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let api = Arc::new(InMemoryApi::<Urnas>::with_items(vec![urna(1)]));
    let page = ListPage::new(api.clone(), Arc::new(NotificationLog::new()));
    page.load().await;

    let dialog = page.request_delete(1).unwrap();
    page.cancel_delete(dialog);

    assert_eq!(api.calls(Operation::Delete), 0);
    assert!(page.request_delete(42).is_none());
}

#[tokio::test]
async fn test_failed_delete_keeps_row_and_notifies() {
    let api = Arc::new(InMemoryApi::<Urnas>::with_items(vec![urna(1), urna(2)]));
    let log = Arc::new(NotificationLog::new());
    let page = ListPage::new(api.clone(), log.clone());
    page.load().await;

    api.fail_next(Operation::Delete, 500);
    let dialog = page.request_delete(1).unwrap();
    assert!(!page.confirm_delete(dialog).await);

    assert_eq!(page.items().len(), 2);
    assert_eq!(api.calls(Operation::List), 1);
    assert_eq!(log.errors(), 1);
    let last = log.last().unwrap();
    assert_eq!(last.title, "Erro ao remover urna");
    assert_eq!(last.description, "Falha simulada");
}

#[tokio::test]
async fn test_failed_load_keeps_previous_items() {
    let api = Arc::new(InMemoryApi::<Urnas>::with_items(vec![urna(1)]));
    let log = Arc::new(NotificationLog::new());
    let page = ListPage::new(api.clone(), log.clone());
    page.load().await;

    api.fail_next(Operation::List, 503);
    assert!(matches!(page.load().await, LoadState::Failed(_)));
    assert_eq!(page.items(), vec![urna(1)]);
    assert_eq!(log.last().unwrap().title, "Erro ao carregar urnas");
}

#[tokio::test]
async fn test_401_on_list_sends_user_to_login() {
    let (session, navigator) = session_at(Route::List(ResourceKind::Urnas));
    let api = Arc::new(InMemoryApi::<Urnas>::new().with_session(session.clone()));
    api.fail_next(Operation::List, 401);
    let page = ListPage::new(api, Arc::new(NotificationLog::new()));

    page.load().await;

    assert!(!session.is_authenticated());
    assert_eq!(navigator.current(), Route::Login);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_drops_in_flight_load() {
    let api = Arc::new(
        InMemoryApi::<Urnas>::with_items(vec![urna(1)]).with_latency(Duration::from_secs(1)),
    );
    let log = Arc::new(NotificationLog::new());
    let page = Arc::new(ListPage::new(api.clone(), log.clone()));

    let loading = tokio::spawn({
        let page = page.clone();
        async move { page.load().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    page.dispose();
    loading.await.unwrap();

    assert!(page.items().is_empty());
    assert_ne!(page.state(), LoadState::Loaded);
    assert!(log.entries().is_empty());

    page.load().await;
    assert_eq!(api.calls(Operation::List), 1);
}

/// Serves each list call after its own delay, so responses can arrive out
/// of order
struct SlowThenFast {
    responses: Mutex<Vec<(Duration, Vec<Urna>)>>,
}

#[async_trait]
impl ResourceApi<Urnas> for SlowThenFast {
    async fn list(&self, _query: &ListQuery) -> voto_client::Result<Vec<Urna>> {
        let (delay, items) = self.responses.lock().remove(0);
        tokio::time::sleep(delay).await;
        Ok(items)
    }

    async fn get(&self, id: u64) -> voto_client::Result<Urna> {
        Err(ApiError::not_found("urna", id))
    }

    async fn create(&self, _draft: &UrnaDraft) -> voto_client::Result<Urna> {
        Err(ApiError::status(405, "not supported"))
    }

    async fn update(&self, _id: u64, _draft: &UrnaDraft) -> voto_client::Result<Urna> {
        Err(ApiError::status(405, "not supported"))
    }

    async fn delete(&self, _id: u64) -> voto_client::Result<()> {
        Err(ApiError::status(405, "not supported"))
    }
}

#[tokio::test(start_paused = true)]
async fn test_newer_load_supersedes_older() {
    let api = SlowThenFast {
        responses: Mutex::new(vec![
            (Duration::from_millis(500), vec![urna(1)]),
            (Duration::from_millis(10), vec![urna(2)]),
        ]),
    };
    let page = ListPage::new(Arc::new(api), Arc::new(NotificationLog::new()));

    tokio::join!(page.load(), page.load());

    assert_eq!(page.items(), vec![urna(2)]);
    assert_eq!(page.state(), LoadState::Loaded);
}

#[tokio::test]
async fn test_form_submit_creates_and_returns_to_list() {
    let api = Arc::new(InMemoryApi::<Urnas>::with_items(vec![urna(1)]));
    let log = Arc::new(NotificationLog::new());
    let (session, navigator) = session_at(Route::New(ResourceKind::Urnas));
    let editor = EntityEditor::new(api.clone(), log.clone(), session);
    let form = FormController::<UrnaForm>::create();

    let invalid = form
        .submit(&UrnaInput::default(), |draft| editor.create(draft))
        .await;
    assert!(matches!(invalid, FormOutcome::Invalid(ref errors) if errors.len() == 2));
    assert_eq!(api.calls(Operation::Create), 0);

    let input = UrnaInput {
        numero: "0100".into(),
        localizacao: "Escola Central".into(),
        status: "manutencao".into(),
    };
    let outcome = form.submit(&input, |draft| editor.create(draft)).await;
    let FormOutcome::Submitted(Some(created)) = outcome else {
        panic!("expected a created urna");
    };
    assert_eq!(created.id, 2);
    assert_eq!(created.status, UrnaStatus::Manutencao);
    assert_eq!(navigator.current(), Route::List(ResourceKind::Urnas));
    assert_eq!(log.last().unwrap().title, "Urna Criada");
}

#[tokio::test]
async fn test_edit_form_prefills_and_updates() {
    let api = Arc::new(InMemoryApi::<Urnas>::with_items(vec![urna(1)]));
    let log = Arc::new(NotificationLog::new());
    let (session, navigator) = session_at(Route::Edit(ResourceKind::Urnas, 1));
    let editor = EntityEditor::new(api.clone(), log.clone(), session);

    let existing = editor.load(1).await.unwrap();
    let form = FormController::<UrnaForm>::edit(UrnaInput::from(&existing));
    assert!(form.is_edit());

    let mut input = form.initial_input();
    assert_eq!(input.numero, "0001");
    input.localizacao = "Ginásio".into();

    let outcome = form.submit(&input, |draft| editor.update(1, draft)).await;
    assert!(outcome.is_submitted());
    assert_eq!(api.items()[0].localizacao, "Ginásio");
    assert_eq!(navigator.current(), Route::List(ResourceKind::Urnas));
    assert_eq!(
        log.last().unwrap().description,
        "A urna 0001 foi atualizada com sucesso."
    );

    assert!(editor.load(9).await.is_none());
    assert_eq!(log.errors(), 1);
}

#[tokio::test]
async fn test_switching_elections_fetches_new_results() {
    let eleicoes = InMemoryApi::<Eleicoes>::with_items(vec![
        eleicao(1, "Eleição A"),
        eleicao(2, "Eleição B"),
    ]);
    let reports = Arc::new(
        InMemoryReports::new()
            .with_results(1, results(100, 5, 5))
            .with_results(2, results(1234, 25, 50)),
    );
    let log = Arc::new(NotificationLog::new());
    let mut page = ResultsPage::new(Arc::new(eleicoes), reports.clone(), log.clone());

    page.load().await;
    assert_eq!(page.selected(), Some(1));
    assert_eq!(page.stat_cards()[0].value, "100");

    assert!(page.select(2).await);
    assert_eq!(reports.calls(), vec!["results:1", "results:2"]);
    let cards = page.stat_cards();
    assert_eq!(cards[0].value, "1.234");
    assert_eq!(cards[1].value, "25");
    assert_eq!(cards[2].value, "50");
    assert_eq!(page.chart_series().votes, vec![1159]);

    let dir = tempfile::tempdir().unwrap();
    let path = page.export(dir.path()).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "resultados_Eleição_B.csv");
    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.starts_with("candidato,votos\nA,1159\n"));
    assert_eq!(log.last().unwrap().title, "Exportação Concluída");
}

#[tokio::test]
async fn test_failed_results_clear_previous_totals() {
    let eleicoes = InMemoryApi::<Eleicoes>::with_items(vec![
        eleicao(1, "Eleição A"),
        eleicao(2, "Eleição B"),
    ]);
    let reports = Arc::new(InMemoryReports::new().with_results(1, results(100, 5, 5)));
    let log = Arc::new(NotificationLog::new());
    let mut page = ResultsPage::new(Arc::new(eleicoes), reports.clone(), log.clone());
    page.load().await;

    reports.fail_next("results", 500);
    assert!(!page.select(2).await);
    assert!(page.results().is_none());
    assert_eq!(page.stat_cards()[0].value, "0");
    assert_eq!(log.last().unwrap().title, "Erro ao buscar resultados");
}

#[tokio::test]
async fn test_attach_candidate_to_election() {
    let eleicoes = Arc::new(InMemoryApi::<Eleicoes>::with_items(vec![eleicao(
        1,
        "Conselho 2024",
    )]));
    let candidatos = Arc::new(InMemoryApi::<Candidatos>::with_items(vec![
        candidato(1, "Ana Lima", 1),
        candidato(2, "Bruno Souza", 2),
    ]));
    let log = Arc::new(NotificationLog::new());
    let (session, _) = session_at(Route::ElectionCandidates(1));

    let mut page = ElectionCandidates::load(eleicoes, candidatos.clone(), log.clone(), &session, 1)
        .await
        .unwrap();
    assert_eq!(page.associated("").len(), 1);
    assert_eq!(page.available().len(), 1);
    assert!(page.associated("bruno").is_empty());

    assert!(page.attach(2).await);
    assert_eq!(candidatos.calls(Operation::Update), 1);
    assert_eq!(page.associated("bruno").len(), 1);
    assert!(page.available().is_empty());
    assert_eq!(log.last().unwrap().title, "Candidato Adicionado");

    assert!(!page.attach(2).await);
    assert_eq!(candidatos.calls(Operation::Update), 1);
}

#[tokio::test]
async fn test_unknown_election_returns_to_list() {
    let (session, navigator) = session_at(Route::ElectionCandidates(99));
    let log = Arc::new(NotificationLog::new());

    let page = ElectionCandidates::load(
        Arc::new(InMemoryApi::<Eleicoes>::new()),
        Arc::new(InMemoryApi::<Candidatos>::new()),
        log.clone(),
        &session,
        99,
    )
    .await;

    assert!(page.is_none());
    assert_eq!(navigator.current(), Route::List(ResourceKind::Eleicoes));
    assert_eq!(log.last().unwrap().description, "Eleição não encontrada.");
}

#[tokio::test]
async fn test_import_reports_progress_and_outcome() {
    let reports = Arc::new(InMemoryReports::new().with_import_report(ImportReport {
        message: "ok".into(),
        imported_count: 48,
        failed_count: 2,
        errors: vec!["Linha 3: CPF inválido".into(), "Linha 9: nome ausente".into()],
    }));
    let log = Arc::new(NotificationLog::new());
    let mut page = ImportPage::new(reports.clone(), log.clone());
    let progress = page.progress();

    let upload = VoterUpload::from_bytes("eleitores.csv", "nome,cpf,matricula\nAna,1,2\n").unwrap();
    assert_eq!(ImportPage::preview(&upload).unwrap().len(), 2);

    let report = page.upload(&upload).await.cloned().unwrap();
    assert_eq!(report.failed_count, 2);
    assert_eq!(*progress.borrow(), 100);
    assert_eq!(log.last().unwrap().title, "Importação Concluída");

    reports.fail_next("import", 422);
    assert!(page.upload(&upload).await.is_none());
    assert_eq!(*progress.borrow(), 0);
    assert!(page.report().is_none());
    assert_eq!(log.last().unwrap().title, "Erro na Importação");
}

#[tokio::test]
async fn test_dashboard_failure_leaves_placeholders() {
    let reports = Arc::new(InMemoryReports::new());
    let log = Arc::new(NotificationLog::new());
    let mut page = DashboardPage::new(reports, log.clone());

    assert!(!page.load().await);
    assert_eq!(page.stat_items()[0].value, "...");
    assert_eq!(page.counts()[0].value, "0");
    assert_eq!(DashboardPage::navigation().len(), 6);
}
