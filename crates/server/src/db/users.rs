use anyhow::Result;
use shared::{CreateUserRequest, UpdateUserRequest, UserListQuery};
use sqlx::{QueryBuilder, Sqlite};

use super::{Database, User};

impl Database {
    pub async fn create_user(&self, user: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO usuarios (nome, email, ativo) VALUES (?, ?, ?) RETURNING id, nome, email, ativo",
        )
        .bind(&user.nome)
        .bind(&user.email)
        .bind(user.ativo)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, nome, email, ativo FROM usuarios WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Users matching every filter in `query`, ascending by the requested
    /// field with ties broken by id.
    pub async fn list_users(&self, query: &UserListQuery) -> Result<Vec<User>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, nome, email, ativo FROM usuarios WHERE 1 = 1");
        if let Some(id) = query.id {
            builder.push(" AND id = ").push_bind(id);
        }
        if let Some(flag) = query.ativo.flag() {
            builder.push(" AND ativo = ").push_bind(flag);
        }
        builder.push(" ORDER BY ");
        builder.push(query.ordenador.column());
        builder.push(" ASC, id ASC");

        let mut users = builder.build_query_as::<User>().fetch_all(&self.pool).await?;

        // SQLite's lower() only folds ASCII, so the name match runs here
        if let Some(needle) = query.nome.as_deref().filter(|n| !n.is_empty()) {
            let needle = needle.to_lowercase();
            users.retain(|user| user.nome.to_lowercase().contains(&needle));
        }

        Ok(users)
    }

    /// Applies the fields present in `patch` and returns the stored row, or
    /// `None` when no user has the given id.
    pub async fn update_user(&self, patch: &UpdateUserRequest) -> Result<Option<User>> {
        if patch.is_empty() {
            return self.get_user(patch.id).await;
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE usuarios SET ");
        let mut fields = builder.separated(", ");
        if let Some(nome) = &patch.nome {
            fields.push("nome = ").push_bind_unseparated(nome.clone());
        }
        if let Some(email) = &patch.email {
            fields.push("email = ").push_bind_unseparated(email.clone());
        }
        if let Some(ativo) = patch.ativo {
            fields.push("ativo = ").push_bind_unseparated(ativo);
        }
        builder.push(" WHERE id = ").push_bind(patch.id);
        builder.push(" RETURNING id, nome, email, ativo");

        let user = builder
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Sets the active flag. Returns false when no user has the given id.
    pub async fn set_user_active(&self, id: i64, active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE usuarios SET ativo = ? WHERE id = ?")
            .bind(i64::from(active))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
