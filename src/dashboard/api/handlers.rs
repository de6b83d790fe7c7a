// dashboard/api/handlers.rs - HTTP JSON API (actix-web)
//
// Each request is stateless: the query string is parsed into FilterCriteria
// and the view is derived from the shared catalog. Nothing a request does
// changes the catalog.
//
// Routes (registered by `configure`):
// - GET  /api/products              derived view, criteria as query params
// - GET  /api/products/export       filtered products as csv | json | html
// - POST /api/products/import       import preview, body in `format`
// - GET  /api/products/{id}
// - GET  /api/analytics
// - GET  /api/alerts
// - GET  /api/suggestions?q=&limit=
// - GET  /api/metrics               latest KPI/alert poll snapshot
// - GET  /api/ledger/{id}           simulated ledger record (demo only)

use std::sync::Mutex;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::dashboard::api::catalog::Catalog;
use crate::dashboard::api::queries;
use crate::dashboard::error::{DashboardError, Result};
use crate::dashboard::ledger::{DemoLedger, SimulatedVerification};
use crate::dashboard::metrics::DashboardMetrics;
use crate::dashboard::model::{
    CatalogAnalytics, FilterCriteria, FilterUpdate, ImportStatus, InventoryAlert, PriceBucket,
    Product, ProductView,
};
use crate::dashboard::session::history::RecentSearches;
use crate::dashboard::session::suggestions::{self, Suggestion};
use crate::dashboard::transfer::{self, ExportFormat};

const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Shared server state
pub struct AppState {
    pub catalog: Catalog,
    pub metrics: watch::Receiver<DashboardMetrics>,
    pub ledger: Mutex<DemoLedger>,
    pub page_size: u32,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        metrics: watch::Receiver<DashboardMetrics>,
        ledger: DemoLedger,
        page_size: u32,
    ) -> Self {
        AppState {
            catalog,
            metrics,
            ledger: Mutex::new(ledger),
            page_size,
        }
    }

    /// State whose metrics snapshot stays at its empty default
    pub fn without_polling(catalog: Catalog, ledger: DemoLedger, page_size: u32) -> Self {
        let (_tx, rx) = watch::channel(DashboardMetrics::default());
        AppState::new(catalog, rx, ledger, page_size)
    }
}

/// JSON body of every error response
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_uppercase()
                .replace(' ', "_"),
            message: self.to_string(),
            code: status.as_u16(),
        })
    }
}

/// Keys that carry the text query rather than a filter dimension
const QUERY_KEYS: &[&str] = &["q", "query", "search"];

/// Build criteria from query parameters
///
/// Page updates are applied last so their position in the query string
/// does not matter. `skip` names parameters the caller consumes itself.
pub fn criteria_from_params(
    params: &[(String, String)],
    page_size: u32,
    skip: &[&str],
) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::with_page_size(page_size);
    let mut page_updates = Vec::new();

    for (key, value) in params {
        if skip.contains(&key.as_str()) {
            continue;
        }
        if QUERY_KEYS.contains(&key.as_str()) {
            criteria.query = value.clone();
            continue;
        }
        match FilterUpdate::parse(key, value)? {
            update @ FilterUpdate::Page(_) => page_updates.push(update),
            update => criteria.apply(update),
        }
    }

    for update in page_updates {
        criteria.apply(update);
    }
    Ok(criteria)
}

async fn list_products(
    state: web::Data<AppState>,
    params: web::Query<Vec<(String, String)>>,
) -> Result<web::Json<ProductView>> {
    let criteria = criteria_from_params(&params, state.page_size, &[])?;
    let view = queries::derive_view(&state.catalog, &criteria);
    tracing::info!(
        "GET /api/products: {} matches, page {}/{}",
        view.total_count,
        view.page + 1,
        view.page_count
    );
    Ok(web::Json(view))
}

async fn get_product(state: web::Data<AppState>, path: web::Path<u32>) -> Result<web::Json<Product>> {
    let id = path.into_inner();
    state
        .catalog
        .get(id)
        .cloned()
        .map(web::Json)
        .ok_or(DashboardError::ProductNotFound(id))
}

/// `format` query parameter, case-insensitive; JSON when absent
fn format_from_params(params: &[(String, String)]) -> Result<ExportFormat> {
    match params.iter().find(|(k, _)| k == "format") {
        Some((_, value)) => value.parse(),
        None => Ok(ExportFormat::Json),
    }
}

async fn export_products(
    state: web::Data<AppState>,
    params: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse> {
    let format = format_from_params(&params)?;
    let criteria = criteria_from_params(&params, state.page_size, &["format"])?;
    let products = queries::filter_and_sort(state.catalog.products(), &criteria);
    let body = transfer::export_products(products.iter().copied(), format)?;

    tracing::info!("Exported {} products as {}", products.len(), format);
    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"products.{}\"", format.file_extension()),
        ))
        .body(body))
}

/// Parsed products plus per-row outcome; the catalog is not modified
#[derive(Serialize, Deserialize, Debug)]
pub struct ImportPreview {
    pub status: ImportStatus,
    pub products: Vec<Product>,
}

async fn import_preview(
    params: web::Query<Vec<(String, String)>>,
    body: String,
) -> Result<web::Json<ImportPreview>> {
    let format = format_from_params(&params)?;
    let records = transfer::import(&body, format)?;
    let (products, status) = transfer::products_from_records(&records);

    tracing::info!(
        "Import preview: {} of {} rows parsed",
        status.succeeded,
        status.total
    );
    Ok(web::Json(ImportPreview { status, products }))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub analytics: CatalogAnalytics,
    pub price_histogram: Vec<PriceBucket>,
}

async fn catalog_analytics(state: web::Data<AppState>) -> web::Json<AnalyticsResponse> {
    web::Json(AnalyticsResponse {
        analytics: queries::analytics(&state.catalog),
        price_histogram: queries::price_histogram(
            state.catalog.products(),
            Decimal::from(queries::DEFAULT_PRICE_BUCKET),
        ),
    })
}

async fn inventory_alerts(state: web::Data<AppState>) -> web::Json<Vec<InventoryAlert>> {
    web::Json(queries::inventory_alerts(&state.catalog))
}

#[derive(Deserialize)]
struct SuggestQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

async fn search_suggestions(
    state: web::Data<AppState>,
    query: web::Query<SuggestQuery>,
) -> web::Json<Vec<Suggestion>> {
    // Requests carry no session, so there is no search history to draw on
    let history = RecentSearches::default();
    web::Json(suggestions::suggest(
        &state.catalog,
        &history,
        &query.q,
        query.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT),
    ))
}

async fn latest_metrics(state: web::Data<AppState>) -> web::Json<DashboardMetrics> {
    web::Json(state.metrics.borrow().clone())
}

async fn ledger_record(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<web::Json<SimulatedVerification>> {
    let id = path.into_inner();
    let product = state.catalog.get(id).ok_or(DashboardError::ProductNotFound(id))?;
    let mut ledger = state.ledger.lock().unwrap_or_else(|e| e.into_inner());
    Ok(web::Json(ledger.simulate(product)))
}

/// Register every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/products", web::get().to(list_products))
            .route("/products/export", web::get().to(export_products))
            .route("/products/import", web::post().to(import_preview))
            .route("/products/{id}", web::get().to(get_product))
            .route("/analytics", web::get().to(catalog_analytics))
            .route("/alerts", web::get().to(inventory_alerts))
            .route("/suggestions", web::get().to(search_suggestions))
            .route("/metrics", web::get().to(latest_metrics))
            .route("/ledger/{id}", web::get().to(ledger_record)),
    );
}
