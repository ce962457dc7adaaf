//! Read-only HTTP surface.
//!
//! Serves whatever the last successful pipeline run published, verbatim.
//! A scrape never runs on the request path: a failed or in-progress run
//! leaves readers on the previous day's file.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use cagestats::config::Settings;
use cagestats::storage;

#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(rankings))
        .route("/api/pulse", get(pulse))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(settings: Arc<Settings>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(AppState::new(settings));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving published rankings");
    axum::serve(listener, app).await?;
    Ok(())
}

/// The published rankings document, byte for byte.
async fn rankings(State(state): State<AppState>) -> impl IntoResponse {
    info!("rankings requested");
    match storage::read_published(&state.settings) {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            json,
        )
            .into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            "no rankings published yet; the first scheduled scrape has not completed",
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to read published rankings");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read published rankings")
                .into_response()
        }
    }
}

async fn pulse() -> &'static str {
    info!("pulse requested");
    "PULSE"
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use cagestats::config::Config;

    fn state_in(dir: &std::path::Path) -> AppState {
        let settings = Config {
            data_dir: Some(dir.to_path_buf()),
            ..Config::default()
        }
        .into_settings();
        AppState::new(Arc::new(settings))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn pulse_answers() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path()));

        let response = app
            .oneshot(Request::get("/api/pulse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "PULSE");
    }

    #[tokio::test]
    async fn rankings_404_before_first_publish() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path()));

        let response = app
            .oneshot(Request::get("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rankings_returns_published_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let published = r#"[{"weightClass":"Heavyweight","fighters":[]}]"#;
        storage::publish(&state.settings, published).unwrap();

        let app = router(state);
        let response = app
            .oneshot(Request::get("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_string(response).await, published);
    }
}
