use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::warn;

use super::service::{DashboardRequest, ForecastService};

/// Router builder exposing the dashboard computation over HTTP.
pub fn forecast_router(service: Arc<ForecastService>) -> Router {
    Router::new()
        .route("/api/v1/forecast/dashboard", post(dashboard_handler))
        .with_state(service)
}

pub(crate) async fn dashboard_handler(
    State(service): State<Arc<ForecastService>>,
    axum::Json(request): axum::Json<DashboardRequest>,
) -> Response {
    match service.dashboard(request) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => {
            warn!(%error, "dashboard request rejected");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}
