use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

// ============================================================================
// Responses
// ============================================================================

/// A user record as exposed over the API. `ativo` is 1 (active) or 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub ativo: i64,
}

// ============================================================================
// Requests
// ============================================================================

fn default_active() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub nome: String,
    pub email: String,
    #[serde(default = "default_active")]
    pub ativo: i64,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("nome", &self.nome)?;
        validation::email(&self.email)?;
        validation::active_flag(self.ativo)
    }
}

/// Body of `PATCH /usuarios`; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ativo: Option<i64>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(nome) = &self.nome {
            validation::non_empty("nome", nome)?;
        }
        if let Some(email) = &self.email {
            validation::email(email)?;
        }
        if let Some(ativo) = self.ativo {
            validation::active_flag(ativo)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.nome.is_none() && self.email.is_none() && self.ativo.is_none()
    }
}

// ============================================================================
// Listing
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
    #[default]
    #[serde(alias = "all")]
    Todos,
    #[serde(alias = "active")]
    Ativos,
    #[serde(alias = "inactive")]
    Inativos,
}

impl ActiveFilter {
    /// Flag value to match, or `None` when every user qualifies
    pub fn flag(self) -> Option<i64> {
        match self {
            ActiveFilter::Todos => None,
            ActiveFilter::Ativos => Some(1),
            ActiveFilter::Inativos => Some(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Id,
    Nome,
    Ativo,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Nome => "nome",
            SortField::Ativo => "ativo",
        }
    }
}

/// Query string of `GET /usuarios`; all filters are combined with AND
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    pub id: Option<i64>,
    #[serde(default)]
    pub ativo: ActiveFilter,
    /// Case-insensitive substring of the user's name
    pub nome: Option<String>,
    #[serde(default)]
    pub ordenador: SortField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_to_active() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"nome":"Ana","email":"ana@x.com"}"#).unwrap();
        assert_eq!(req.ativo, 1);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let req = CreateUserRequest {
            nome: "".to_string(),
            email: "ana@x.com".to_string(),
            ativo: 1,
        };
        assert_eq!(req.validate(), Err(ValidationError::Empty("nome")));

        let req = CreateUserRequest {
            nome: "Ana".to_string(),
            email: "ana".to_string(),
            ativo: 1,
        };
        assert!(matches!(req.validate(), Err(ValidationError::Email(_))));
    }

    #[test]
    fn test_active_filter_accepts_both_spellings() {
        let pt: ActiveFilter = serde_json::from_str("\"inativos\"").unwrap();
        let en: ActiveFilter = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(pt, ActiveFilter::Inativos);
        assert_eq!(en, ActiveFilter::Inativos);
        assert_eq!(ActiveFilter::Todos.flag(), None);
        assert_eq!(ActiveFilter::Ativos.flag(), Some(1));
    }

    #[test]
    fn test_sort_field_columns() {
        let field: SortField = serde_json::from_str("\"nome\"").unwrap();
        assert_eq!(field.column(), "nome");
        assert_eq!(SortField::default().column(), "id");
    }
}
