// Cold-chain dashboard API server
//
// This binary starts the web server with:
// - Actix-web for HTTP serving
// - The catalog from WMS_CATALOG_PATH or the embedded sample
// - A background KPI/alert poller when WMS_KPI_URL or WMS_ALERTS_URL is set
// - A demo ledger for the simulated blockchain panel

use actix_web::{web, App, HttpServer};
use tokio::sync::watch;

use coldchain_wms::dashboard::api::handlers::{self, AppState};
use coldchain_wms::dashboard::config::AppConfig;
use coldchain_wms::dashboard::ledger::DemoLedger;
use coldchain_wms::dashboard::metrics::{DashboardMetrics, MetricsClient, MetricsPoller};
use coldchain_wms::dashboard::Catalog;
use coldchain_wms::fixtures::{catalogs::ColdChainCatalog, CatalogFixture};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load environment variables (.env included)
    let config = AppConfig::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => {
            let catalog = ColdChainCatalog::catalog()?;
            tracing::info!("Using embedded sample catalog ({} products)", catalog.len());
            catalog
        }
    };

    // The poller handle must outlive the server; dropping it stops polling
    let (_poller, metrics) = if config.polling_enabled() {
        let client = MetricsClient::new(config.kpi_url.clone(), config.alerts_url.clone())?;
        let (poller, rx) = MetricsPoller::spawn(client, config.poll_interval);
        (Some(poller), rx)
    } else {
        tracing::info!("No KPI/alert endpoints configured, metrics polling disabled");
        let (_tx, rx) = watch::channel(DashboardMetrics::default());
        (None, rx)
    };

    let state = web::Data::new(AppState::new(
        catalog,
        metrics,
        DemoLedger::from_entropy(),
        config.store.page_size,
    ));

    tracing::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
