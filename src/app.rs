use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Args;
use crate::error::FetchError;
use crate::fetcher::{RecordSource, RowFetcher};
use crate::record::Record;
use crate::view::{Criteria, DashboardView, ViewRequest};

/// Body returned for every failed fetch. The cause only goes to the log.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch partnerships data";

pub struct AppState {
    source: Arc<dyn RecordSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// A failed upstream fetch, as seen by an HTTP client.
#[derive(Debug)]
pub struct ApiError(FetchError);

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, upstream_status = ?self.0.status(), "Error fetching partnerships data");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: FETCH_FAILED_MESSAGE.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/health", get(health))
        .route("/api/partnerships", get(list_partnerships))
        .route(
            "/api/partnerships/view",
            get(partnerships_view).post(filter_view),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let fetcher = RowFetcher::new(args.sheet_source(), args.parse_options(), args.request_timeout())?;
    let state = Arc::new(AppState::new(Arc::new(fetcher)));

    let app = router(state);

    let listener = TcpListener::bind(args.listen).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_partnerships(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.source.fetch_records().await?;
    info!(count = records.len(), "served partnerships");
    Ok(Json(records))
}

async fn partnerships_view(
    Query(criteria): Query<Criteria>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardView>, ApiError> {
    let records = state.source.fetch_records().await?;
    let view = DashboardView::build(&records, criteria);
    info!(
        total = view.counts.total,
        visible = view.records.len(),
        filtered = view.filtered,
        "served partnerships view"
    );
    Ok(Json(view))
}

/// Filters records the caller already holds. Never touches the source, so
/// the page can refine its view on every keystroke without refetching.
async fn filter_view(Json(request): Json<ViewRequest>) -> Json<DashboardView> {
    let view = DashboardView::build(&request.records, request.criteria);
    info!(
        total = view.counts.total,
        visible = view.records.len(),
        filtered = view.filtered,
        "filtered held partnerships"
    );
    Json(view)
}
