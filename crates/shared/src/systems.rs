use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::{self, ValidationError};

/// Media type every uploaded and downloaded executable must carry
pub const EXECUTABLE_MEDIA_TYPE: &str = "application/x-msdownload";

/// Directory below the storage root that holds system executables
pub const SYSTEMS_DIR: &str = "sistemas";

// ============================================================================
// Responses
// ============================================================================

/// A system record as exposed over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemResponse {
    pub id: i64,
    pub nome: String,
    pub version: i64,
    pub arquivo: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /sistema/`. Only the name is honoured; new systems always
/// start at version 1 with no file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSystemRequest {
    pub nome: String,
}

impl CreateSystemRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::system_name(&self.nome)
    }
}

/// Body of `PATCH /sistema/`. Absent fields are left untouched; `arquivo`
/// distinguishes "absent" from an explicit `null`, which clears the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSystemRequest {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub arquivo: Option<Option<String>>,
}

impl UpdateSystemRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(nome) = &self.nome {
            validation::system_name(nome)?;
        }
        if let Some(version) = self.version {
            validation::version(version)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.nome.is_none() && self.version.is_none() && self.arquivo.is_none()
    }
}

/// Query string of `GET /sistemas/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemListQuery {
    pub sistema_nome: Option<String>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_response_serializes_missing_file_as_null() {
        let system = SystemResponse {
            id: 1,
            nome: "Tool".to_string(),
            version: 1,
            arquivo: None,
        };
        let json = serde_json::to_value(&system).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 1, "nome": "Tool", "version": 1, "arquivo": null })
        );
    }

    #[test]
    fn test_create_ignores_extra_fields() {
        let req: CreateSystemRequest =
            serde_json::from_str(r#"{"nome":"Tool","version":9,"arquivo":"x.exe"}"#).unwrap();
        assert_eq!(req.nome, "Tool");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_distinguishes_absent_and_null() {
        let absent: UpdateSystemRequest = serde_json::from_str(r#"{"id":3}"#).unwrap();
        assert_eq!(absent.arquivo, None);
        assert!(absent.is_empty());

        let cleared: UpdateSystemRequest =
            serde_json::from_str(r#"{"id":3,"arquivo":null}"#).unwrap();
        assert_eq!(cleared.arquivo, Some(None));
        assert!(!cleared.is_empty());

        let set: UpdateSystemRequest =
            serde_json::from_str(r#"{"id":3,"arquivo":"static/a.exe","version":2}"#).unwrap();
        assert_eq!(set.arquivo, Some(Some("static/a.exe".to_string())));
        assert_eq!(set.version, Some(2));
    }

    #[test]
    fn test_update_validation() {
        let req = UpdateSystemRequest {
            id: 1,
            version: Some(0),
            ..Default::default()
        };
        assert_eq!(req.validate(), Err(ValidationError::Version(0)));

        let req = UpdateSystemRequest {
            id: 1,
            nome: Some("../etc".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
