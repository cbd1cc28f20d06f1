use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, DashboardService, ImageService, SeaOrmAuthService, SeaOrmDashboardService,
    SearchService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
pub(crate) fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("ContentExplorer/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub dashboard_service: Arc<dyn DashboardService>,

    pub search_service: Arc<SearchService>,

    pub image_service: Arc<ImageService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires every service on top of an already connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.search.timeout_seconds)?;

        let search_service = Arc::new(SearchService::from_config(&config.search, http_client));
        let image_service = Arc::new(ImageService::from_config(&config.image)?);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.auth.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let dashboard_service = Arc::new(SeaOrmDashboardService::new(store.clone()))
            as Arc<dyn DashboardService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            dashboard_service,
            search_service,
            image_service,
        })
    }
}
