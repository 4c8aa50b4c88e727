//! User directory endpoints

use axum::{extract::State, http::StatusCode, Json};
use shared::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserListQuery, UserResponse};

use crate::{
    error::{is_constraint_violation, AppError},
    extract,
    state::AppState,
};

/// List users matching every supplied filter
/// GET /usuarios
pub async fn list_users(
    State(state): State<AppState>,
    extract::Query(query): extract::Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.db.list_users(&query).await?;
    if users.is_empty() {
        return Err(AppError::NotFound("Nenhum usuário encontrado".to_string()));
    }
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Any store failure on insert is reported to the client as a bad request
/// POST /usuarios
pub async fn create_user(
    State(state): State<AppState>,
    extract::Json(req): extract::Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()?;

    let user = state.db.create_user(&req).await.map_err(|e| {
        if is_constraint_violation(&e) {
            AppError::BadRequest(format!("Usuário com e-mail {} já cadastrado", req.email))
        } else {
            tracing::warn!("Failed to create user {}: {:#}", req.email, e);
            AppError::BadRequest("Não foi possível cadastrar o usuário".to_string())
        }
    })?;
    tracing::info!("Created user {} ({})", user.id, user.email);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PATCH /usuarios
pub async fn update_user(
    State(state): State<AppState>,
    extract::Json(req): extract::Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate()?;

    let user = state
        .db
        .update_user(&req)
        .await
        .map_err(|e| {
            if is_constraint_violation(&e) {
                AppError::BadRequest("E-mail já cadastrado para outro usuário".to_string())
            } else {
                AppError::Internal(e)
            }
        })?
        .ok_or_else(|| AppError::BadRequest(format!("Usuário com ID {} não encontrado", req.id)))?;

    tracing::info!("Updated user {}", user.id);
    Ok(Json(user.into()))
}

/// PATCH /usuarios/:id
pub async fn activate_user(
    State(state): State<AppState>,
    extract::Path(id): extract::Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    set_active(&state, id, true).await
}

/// Soft delete: the row stays, only the flag changes
/// DELETE /usuarios/:id
pub async fn deactivate_user(
    State(state): State<AppState>,
    extract::Path(id): extract::Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    set_active(&state, id, false).await
}

async fn set_active(state: &AppState, id: i64, active: bool) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.set_user_active(id, active).await? {
        return Err(AppError::NotFound(format!("Usuário com ID {} não encontrado", id)));
    }
    tracing::info!(
        "User {} {}",
        id,
        if active { "activated" } else { "deactivated" }
    );
    Ok(Json(MessageResponse::success()))
}
