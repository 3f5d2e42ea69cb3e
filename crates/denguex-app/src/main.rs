use std::sync::Arc;

use tracing::info;

use denguex_client::{ApiClient, ClientConfig, GeoClient, SessionStore};
use denguex_screens::dashboard::DashboardController;
use denguex_screens::news::NewsController;

/// Headless shell: log in with env-provided credentials (or reuse a stored
/// session), then print one dashboard snapshot. Mostly a smoke harness for
/// the client and screen crates until a real UI shell embeds them.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "denguex=info".into()),
        )
        .init();

    // Config
    let config = ClientConfig::from_env();
    info!(api_base = %config.api_base, "starting denguex client");

    let session = Arc::new(SessionStore::open(&config.session_path));
    let api = Arc::new(ApiClient::new(&config, session.clone())?);
    let geo = Arc::new(GeoClient::new()?);

    if !session.is_logged_in() {
        let username = std::env::var("DENGUEX_USERNAME").unwrap_or_default();
        let password = std::env::var("DENGUEX_PASSWORD").unwrap_or_default();
        if username.is_empty() {
            anyhow::bail!("no stored session; set DENGUEX_USERNAME and DENGUEX_PASSWORD");
        }
        let s = api.login(&username, &password).await?;
        info!(username = %s.username, is_admin = s.is_admin, "logged in");
    }

    let mut dashboard = DashboardController::new(api.clone());
    dashboard.load().await;

    let summary = dashboard.summary();
    println!(
        "Nationwide: {} active, {} recovered, {} deaths ({} total)",
        summary.active, summary.recovered, summary.deaths, summary.total
    );
    for (province, active) in dashboard.provinces() {
        println!("  {province}: {active} active");
    }
    if let Some(stats) = dashboard.stats.ready() {
        for stat in stats {
            println!(
                "  {} — {}/{}/{} [{:?}]",
                stat.city, stat.active, stat.recovered, stat.deaths, stat.risk()
            );
        }
    } else if let Some(err) = dashboard.stats.state().error() {
        eprintln!("dashboard unavailable: {err}");
    }

    let mut news = NewsController::new(api);
    news.load().await;
    if let Some(items) = news.items.ready() {
        for item in items.iter().take(5) {
            println!("news [{}] {}", item.city, item.title);
        }
    }

    // Topology fetch is best-effort; log whether the map would have data.
    if geo.topology().await.is_some() {
        info!("map topology available");
    }

    Ok(())
}
