use axum::{
    Router,
    extract::rejection::JsonRejection,
    response::IntoResponse,
    routing::get,
};
use catan_domain::{ServiceError, service::ArcScoreboardService};
use log::info;

mod export;
mod games;
mod players;
mod reports;

pub fn router(service: ArcScoreboardService) -> Router {
    let router: Router<ArcScoreboardService> = Router::new().nest(
        "/v1",
        Router::new()
            .route("/players", get(players::get_all).post(players::add))
            .route("/games", get(games::get_all).post(games::create))
            .route("/games/winners", get(games::get_with_winners))
            .route("/games/{id}/scores", get(games::get_scores))
            .route("/leaderboard", get(reports::get_leaderboard))
            .route("/scores", get(reports::get_all_scores))
            .route("/statistics", get(reports::get_statistics))
            .route("/export", get(export::get_rows))
            .route("/export.csv", get(export::get_csv)),
    );
    router.with_state(service)
}

pub async fn run(
    service: ArcScoreboardService,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let port = std::env::var("CATAN_HTTP_API_PORT")
        .unwrap_or_else(|_| "3004".to_string())
        .parse::<u16>()
        .expect("CATAN_HTTP_API_PORT must be a valid u16");

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    info!("API server listening on port {}", port);
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}

pub struct ApiError(ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self.0 {
            ServiceError::BadRequest(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ServiceError::Uninitialized(msg) => (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                format!("database not initialized: {}", msg),
            ),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        ApiError(value)
    }
}

/// Malformed or mistyped request bodies get the same JSON error shape as
/// validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ServiceError::BadRequest(rejection.body_text()))
    }
}
