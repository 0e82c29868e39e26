use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_forecast_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use subsidy_forecast::config::AppConfig;
use subsidy_forecast::error::AppError;
use subsidy_forecast::telemetry;
use subsidy_forecast::workflows::forecast::ForecastService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let forecast_service = Arc::new(ForecastService::new(
        config.forecast.clone(),
        config.data.payment_skip_rows,
    ));

    let app = with_forecast_routes(forecast_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        threshold = config.forecast.attendance_threshold,
        cap_attendance = config.forecast.cap_attendance,
        "subsidy forecast service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
