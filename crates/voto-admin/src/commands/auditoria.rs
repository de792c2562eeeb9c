use anyhow::Result;
use chrono::NaiveDate;

use voto_client::{
    LogFilter, Notification, Notifier, ResourceKind, Table, distinct_actions, filter_by_search,
};

use super::AdminContext;

pub async fn handle_auditoria_command(
    ctx: &AdminContext,
    action: Option<String>,
    date: Option<NaiveDate>,
    search: &str,
) -> Result<()> {
    let logs = match ctx.reports().audit_logs().await {
        Ok(logs) => logs,
        Err(e) => {
            ctx.notifications
                .notify(Notification::from_error("Erro ao carregar logs", &e));
            return Ok(());
        }
    };

    let filter = LogFilter { action, date };
    let rows: Vec<_> = filter_by_search(&logs, search)
        .into_iter()
        .filter(|entry| filter.matches(entry))
        .collect();

    print!(
        "{}",
        Table::from_items(rows, ResourceKind::Auditoria.empty_message())
    );

    let actions = distinct_actions(&logs);
    if !actions.is_empty() {
        println!();
        println!("Ações (--action): {}", actions.join(", "));
    }
    Ok(())
}
