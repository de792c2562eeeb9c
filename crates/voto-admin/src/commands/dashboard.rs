use anyhow::Result;

use voto_client::DashboardPage;

use super::AdminContext;

pub async fn handle_dashboard_command(ctx: &AdminContext) -> Result<()> {
    let mut page = DashboardPage::new(ctx.reports(), ctx.notifier());
    page.load().await;

    for card in page.stat_items().iter().chain(page.counts().iter()) {
        println!("{}", card);
    }

    println!();
    println!("Gerenciamento:");
    for item in DashboardPage::navigation() {
        println!(
            "  {:<24} {:<20} {}",
            item.route.to_string(),
            item.label,
            item.description
        );
    }
    Ok(())
}
