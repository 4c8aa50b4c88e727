use serde::{Deserialize, Serialize};

/// Message returned by operations that only signal success
pub const SUCCESS_MESSAGE: &str = "Sucesso!";

// ============================================================================
// Success marker
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub mensagem: String,
}

impl MessageResponse {
    pub fn success() -> Self {
        Self {
            mensagem: SUCCESS_MESSAGE.to_string(),
        }
    }
}

// ============================================================================
// Error body
// ============================================================================

/// Machine-readable error category sent to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    BadRequest,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub codigo: ErrorCode,
    pub mensagem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub erro: ErrorDetail,
}

impl ErrorResponse {
    pub fn new(codigo: ErrorCode, mensagem: impl Into<String>) -> Self {
        Self {
            erro: ErrorDetail {
                codigo,
                mensagem: mensagem.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_message_shape() {
        let json = serde_json::to_value(MessageResponse::success()).unwrap();
        assert_eq!(json, serde_json::json!({ "mensagem": "Sucesso!" }));
    }

    #[test]
    fn test_error_response_uses_snake_case_codes() {
        let body = ErrorResponse::new(ErrorCode::NotFound, "Sistema com ID 7 não encontrado");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"codigo\":\"not_found\""));
        assert!(json.contains("Sistema com ID 7"));
    }
}
