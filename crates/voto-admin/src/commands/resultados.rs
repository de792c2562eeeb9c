use anyhow::Result;

use voto_client::{ResultsPage, Table, format_count};

use super::AdminContext;
use crate::cli::ResultadoAction;

async fn open(ctx: &AdminContext, eleicao: Option<u64>) -> Option<ResultsPage> {
    let mut page = ResultsPage::new(ctx.resource(), ctx.reports(), ctx.notifier());
    page.load().await;
    if page.eleicoes().is_empty() {
        println!("Nenhuma eleição encontrada.");
        return None;
    }
    if let Some(id) = eleicao.filter(|id| page.selected() != Some(*id)) {
        page.select(id).await;
    }
    Some(page)
}

pub async fn handle_resultados_command(ctx: &AdminContext, action: ResultadoAction) -> Result<()> {
    match action {
        ResultadoAction::Show { eleicao } => {
            let Some(page) = open(ctx, eleicao).await else {
                return Ok(());
            };
            let nome = page
                .selected()
                .and_then(|id| page.eleicoes().iter().find(|e| e.id == id))
                .map(|e| e.nome.as_str())
                .unwrap_or("-");
            println!("Eleição: {}", nome);
            for card in page.stat_cards() {
                println!("  {}", card);
            }

            let series = page.chart_series();
            let mut table = Table::new(vec!["Candidato", "Votos", "%"], "Nenhum voto registrado.");
            for ((label, votes), share) in series
                .labels
                .iter()
                .zip(&series.votes)
                .zip(&series.percentages)
            {
                table.push(vec![
                    label.clone(),
                    format_count(*votes),
                    format!("{:.1}", share),
                ]);
            }
            println!();
            print!("{}", table);
            Ok(())
        }
        ResultadoAction::Export { eleicao, out } => {
            if let Some(page) = open(ctx, eleicao).await {
                page.export(&out).await;
            }
            Ok(())
        }
    }
}
