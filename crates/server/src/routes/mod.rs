use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod health;
mod systems;
mod users;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.storage.max_upload_bytes;

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        // System catalog
        .route("/sistemas", get(systems::list_systems).patch(systems::update_system))
        .route("/sistemas/", get(systems::list_systems).patch(systems::update_system))
        .route("/sistemas/:id", get(systems::get_system))
        .route("/sistemas/:id/download", get(systems::download_file))
        .route("/sistemas/:id/arquivo", post(systems::upload_file))
        .route("/sistema", post(systems::create_system).patch(systems::update_system))
        .route("/sistema/", post(systems::create_system).patch(systems::update_system))
        .route("/sistema/:id/arquivo", post(systems::upload_file))
        // User directory
        .route(
            "/usuarios",
            get(users::list_users)
                .post(users::create_user)
                .patch(users::update_user),
        )
        .route(
            "/usuarios/:id",
            patch(users::activate_user).delete(users::deactivate_user),
        )
        // Middleware
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde::de::DeserializeOwned;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::{config::Config, db::Database, state::AppState};

    pub const BOUNDARY: &str = "catalog-test-boundary";

    /// Router backed by a fresh database and storage root in a temp dir
    pub async fn test_app() -> (TempDir, AppState, Router) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("catalog.db").to_string_lossy().to_string();
        config.storage.root = dir.path().join("static");

        let db = Database::new(&config.database.path, config.database.max_connections)
            .await
            .unwrap();
        db.run_migrations().await.unwrap();

        let state = AppState::new(db, config);
        let router = super::create_router(state.clone());
        (dir, state, router)
    }

    pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn send_json<T: DeserializeOwned>(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, T) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = send(router, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Multipart body with a single `arquivo` part
    pub fn multipart_upload(uri: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"arquivo\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }
}
