use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ErrorCode, ErrorResponse, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(format!("Envio de arquivo inválido: {}", err.body_text()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Corpo JSON inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Parâmetros de consulta inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Caminho inválido: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(format!("Envio de arquivo inválido: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures are logged in full but never described to clients
        let (status, code, message) = match self {
            AppError::NotFound(msg) => {
                tracing::info!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg)
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg)
            }
            AppError::Io(err) => {
                tracing::error!("Filesystem error: {}", err);
                internal()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                internal()
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

fn internal() -> (StatusCode, ErrorCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalError,
        "Erro interno do servidor".to_string(),
    )
}

/// True when a store error came from a UNIQUE or CHECK constraint.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation() || e.is_check_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_keep_their_message() {
        let (status, body) = body_of(AppError::NotFound("Sistema com ID 4 não encontrado".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.erro.codigo, ErrorCode::NotFound);
        assert_eq!(body.erro.mensagem, "Sistema com ID 4 não encontrado");

        let (status, body) = body_of(ValidationError::Empty("nome").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.erro.codigo, ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let err = AppError::Internal(anyhow::anyhow!("password=hunter2 connection refused"));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.erro.codigo, ErrorCode::InternalError);
        assert!(!body.erro.mensagem.contains("hunter2"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "/secret/path");
        let (status, body) = body_of(AppError::Io(io)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.erro.mensagem.contains("/secret/path"));
    }

    #[test]
    fn test_non_database_errors_are_not_constraint_violations() {
        assert!(!is_constraint_violation(&anyhow::anyhow!("boom")));
        assert!(!is_constraint_violation(&anyhow::Error::new(sqlx::Error::RowNotFound)));
    }
}
