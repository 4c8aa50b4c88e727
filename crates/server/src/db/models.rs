use shared::{SystemResponse, UserResponse};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct System {
    pub id: i64,
    pub nome: String,
    pub version: i64,
    pub arquivo: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub ativo: i64,
}

impl From<System> for SystemResponse {
    fn from(row: System) -> Self {
        SystemResponse {
            id: row.id,
            nome: row.nome,
            version: row.version,
            arquivo: row.arquivo,
        }
    }
}

impl From<User> for UserResponse {
    fn from(row: User) -> Self {
        UserResponse {
            id: row.id,
            nome: row.nome,
            email: row.email,
            ativo: row.ativo,
        }
    }
}
