//! Input checks applied before anything reaches the store.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("O campo '{0}' não pode ser vazio")]
    Empty(&'static str),
    #[error("Nome de sistema inválido: '{0}'")]
    UnsafeName(String),
    #[error("A versão deve ser maior ou igual a 1 (recebido {0})")]
    Version(i64),
    #[error("O campo 'ativo' deve ser 0 ou 1 (recebido {0})")]
    ActiveFlag(i64),
    #[error("E-mail inválido: '{0}'")]
    Email(String),
}

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

/// System names become a directory under the storage root, so they must be a
/// single plain path component.
pub fn system_name(value: &str) -> Result<(), ValidationError> {
    non_empty("nome", value)?;
    let unsafe_name = value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(ValidationError::UnsafeName(value.to_string()));
    }
    Ok(())
}

pub fn version(value: i64) -> Result<(), ValidationError> {
    if value < 1 {
        return Err(ValidationError::Version(value));
    }
    Ok(())
}

pub fn active_flag(value: i64) -> Result<(), ValidationError> {
    match value {
        0 | 1 => Ok(()),
        other => Err(ValidationError::ActiveFlag(other)),
    }
}

/// Syntactic check only: one `@`, a non-empty local part and a dotted domain
/// with no empty labels.
pub fn email(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::Email(value.to_string());

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}
