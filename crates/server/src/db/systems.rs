use anyhow::Result;
use shared::UpdateSystemRequest;
use sqlx::{QueryBuilder, Sqlite};

use super::{Database, System};

impl Database {
    /// All systems ordered by id, or only those named exactly `name`.
    pub async fn list_systems(&self, name: Option<&str>) -> Result<Vec<System>> {
        let systems = match name {
            Some(name) => {
                sqlx::query_as::<_, System>(
                    "SELECT id, nome, version, arquivo FROM sistemas WHERE nome = ? ORDER BY id",
                )
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, System>(
                    "SELECT id, nome, version, arquivo FROM sistemas ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(systems)
    }

    pub async fn get_system(&self, id: i64) -> Result<Option<System>> {
        let system = sqlx::query_as::<_, System>(
            "SELECT id, nome, version, arquivo FROM sistemas WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(system)
    }

    pub async fn create_system(&self, name: &str) -> Result<System> {
        let system = sqlx::query_as::<_, System>(
            "INSERT INTO sistemas (nome, version) VALUES (?, 1) RETURNING id, nome, version, arquivo",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(system)
    }

    /// Applies the fields present in `patch`. Returns false when no system
    /// has the given id.
    pub async fn update_system(&self, patch: &UpdateSystemRequest) -> Result<bool> {
        if patch.is_empty() {
            return Ok(self.get_system(patch.id).await?.is_some());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE sistemas SET ");
        let mut fields = builder.separated(", ");
        if let Some(nome) = &patch.nome {
            fields.push("nome = ").push_bind_unseparated(nome.clone());
        }
        if let Some(version) = patch.version {
            fields.push("version = ").push_bind_unseparated(version);
        }
        if let Some(arquivo) = &patch.arquivo {
            fields.push("arquivo = ").push_bind_unseparated(arquivo.clone());
        }
        builder.push(" WHERE id = ").push_bind(patch.id);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stores the location and version of a freshly uploaded executable.
    pub async fn record_upload(&self, id: i64, version: i64, path: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE sistemas SET version = ?, arquivo = ? WHERE id = ?")
            .bind(version)
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
