use crate::config::Config;
use crate::services::SearchService;
use crate::state::build_shared_http_client;

pub async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let http = build_shared_http_client(config.search.timeout_seconds)?;
    let service = SearchService::from_config(&config.search, http);

    if !service.is_configured() {
        println!("No search API key configured; showing fallback results.");
    }

    let response = service.search(query).await;

    println!("Results for: {}", response.query);
    println!("{:-<70}", "");

    for (i, result) in response.results.iter().enumerate() {
        println!("{}. {}", i + 1, result.title);
        if !result.url.is_empty() {
            println!("   {}", result.url);
        }
        if let Some(summary) = result.summary.as_deref().filter(|s| !s.is_empty()) {
            println!("   {summary}");
        }
    }

    Ok(())
}
