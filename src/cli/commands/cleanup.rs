use crate::config::Config;
use crate::services::{DashboardService, SeaOrmDashboardService};

pub async fn cmd_cleanup(config: &Config, email: &str) -> anyhow::Result<()> {
    let (store, user) = super::open_for_user(config, email).await?;
    let service = SeaOrmDashboardService::new(store);

    let deleted = service.cleanup_empty(user.id).await?;
    println!(
        "✓ Removed {} search and {} image entries without a title.",
        deleted.search, deleted.image
    );

    Ok(())
}
