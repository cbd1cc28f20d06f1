use crate::config::Config;
use crate::domain::KindFilter;
use crate::services::{DashboardService, ListQuery, SeaOrmDashboardService};

pub async fn cmd_history(
    config: &Config,
    email: &str,
    kind: KindFilter,
    page: u64,
    q: Option<String>,
) -> anyhow::Result<()> {
    let (store, user) = super::open_for_user(config, email).await?;
    let service = SeaOrmDashboardService::new(store);

    let query = ListQuery { kind, page, q };
    let feed = service.list(user.id, &query).await?;

    if feed.items.is_empty() {
        println!("No history entries on page {}.", feed.page);
        return Ok(());
    }

    println!("History for {} (page {}/{}):", user.email, feed.page, feed.total_pages);
    println!("{:-<70}", "");

    for item in feed.items {
        println!("• [{}#{}] {}", item.kind, item.id, item.title);
        if let Some(snippet) = item.snippet {
            println!("  {snippet}");
        }
        if let Some(url) = item.image_url {
            println!("  {url}");
        }
        println!("  {}", item.created_at.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}
