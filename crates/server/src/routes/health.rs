use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "sistemas": "/sistemas/",
        "usuarios": "/usuarios",
        "health": "/health",
    }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.db.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{send_json, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::Value;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (_dir, _state, router) = test_app().await;
        let (status, body): (_, Value) = send_json(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_points_at_catalogs() {
        let (_dir, _state, router) = test_app().await;
        let (status, body): (_, Value) = send_json(&router, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sistemas"], "/sistemas/");
    }
}
