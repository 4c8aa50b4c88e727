//! System catalog endpoints

use axum::{
    body::Body,
    extract::{multipart::{Field, MultipartRejection}, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::{
    CreateSystemRequest, MessageResponse, SystemListQuery, SystemResponse, UpdateSystemRequest,
    EXECUTABLE_MEDIA_TYPE,
};
use std::path::Path as FsPath;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::{
    error::{is_constraint_violation, AppError},
    extract,
    state::AppState,
    storage::{attachment_disposition, sanitize_file_name},
};

/// Multipart part carrying the executable
const UPLOAD_FIELD: &str = "arquivo";

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Sistema com ID {} não encontrado", id))
}

/// List systems, optionally filtered by exact name
/// GET /sistemas/
pub async fn list_systems(
    State(state): State<AppState>,
    extract::Query(query): extract::Query<SystemListQuery>,
) -> Result<Json<Vec<SystemResponse>>, AppError> {
    let name = query.sistema_nome.as_deref().filter(|n| !n.is_empty());
    let systems = state.db.list_systems(name).await?;
    Ok(Json(systems.into_iter().map(Into::into).collect()))
}

/// GET /sistemas/:id
pub async fn get_system(
    State(state): State<AppState>,
    extract::Path(id): extract::Path<i64>,
) -> Result<Json<SystemResponse>, AppError> {
    let system = state.db.get_system(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(system.into()))
}

/// Create a system at version 1 with no file
/// POST /sistema/
pub async fn create_system(
    State(state): State<AppState>,
    extract::Json(req): extract::Json<CreateSystemRequest>,
) -> Result<Json<SystemResponse>, AppError> {
    req.validate()?;

    let system = state.db.create_system(&req.nome).await?;
    tracing::info!("Created system {} ({})", system.id, system.nome);

    Ok(Json(system.into()))
}

/// Patch the fields present in the body
/// PATCH /sistema/
pub async fn update_system(
    State(state): State<AppState>,
    extract::Json(req): extract::Json<UpdateSystemRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;

    let found = state.db.update_system(&req).await.map_err(|e| {
        if is_constraint_violation(&e) {
            AppError::BadRequest(format!("Dados inválidos para o sistema {}", req.id))
        } else {
            AppError::Internal(e)
        }
    })?;
    if !found {
        return Err(not_found(req.id));
    }

    tracing::info!("Updated system {}", req.id);
    Ok(Json(MessageResponse::success()))
}

/// Upload the executable for a system
/// POST /sistema/:id/arquivo
pub async fn upload_file(
    State(state): State<AppState>,
    extract::Path(id): extract::Path<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            store_upload(&state, id, field).await?;
            return Ok((StatusCode::CREATED, Json(MessageResponse::success())));
        }
    }

    Err(AppError::BadRequest(format!(
        "Campo '{}' ausente no envio",
        UPLOAD_FIELD
    )))
}

/// The first upload fills the current version; later uploads bump it.
async fn store_upload(state: &AppState, id: i64, mut field: Field<'_>) -> Result<(), AppError> {
    if field.content_type() != Some(EXECUTABLE_MEDIA_TYPE) {
        return Err(AppError::BadRequest(
            "O arquivo deve ser um executável (.exe)".to_string(),
        ));
    }
    let file_name = field
        .file_name()
        .and_then(sanitize_file_name)
        .ok_or_else(|| AppError::BadRequest("Nome de arquivo inválido".to_string()))?;

    let system = state.db.get_system(id).await?.ok_or_else(|| not_found(id))?;
    let version = if system.arquivo.is_some() {
        system.version.checked_add(1).ok_or_else(|| {
            AppError::BadRequest(format!(
                "O sistema {} já atingiu a versão máxima",
                system.nome
            ))
        })?
    } else {
        system.version
    };

    let path = state.storage.executable_path(&system.nome, version, &file_name);
    let written = match write_field(state, &path, &mut field).await {
        Ok(written) => written,
        Err(err) => {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove partial upload {}: {}", path.display(), e);
            }
            return Err(err);
        }
    };

    let recorded = path.to_string_lossy();
    if !state.db.record_upload(id, version, &recorded).await? {
        return Err(not_found(id));
    }

    tracing::info!(
        "Stored {} bytes for system {} version {} at {}",
        written,
        system.nome,
        version,
        recorded
    );
    Ok(())
}

async fn write_field(
    state: &AppState,
    path: &FsPath,
    field: &mut Field<'_>,
) -> Result<u64, AppError> {
    let mut file = state.storage.create(path).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Stream the latest executable of a system
/// GET /sistemas/:id/download
pub async fn download_file(
    State(state): State<AppState>,
    extract::Path(id): extract::Path<i64>,
) -> Result<Response, AppError> {
    let system = state
        .db
        .get_system(id)
        .await?
        .filter(|s| s.arquivo.is_some())
        .ok_or_else(|| {
            AppError::NotFound(format!("Sistema com ID {} não encontrado ou sem arquivo", id))
        })?;

    let path = state
        .storage
        .resolve_download(system.arquivo.as_deref(), &system.nome, system.version)
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!("Arquivo do sistema {} não encontrado", system.nome))
        })?;

    let file = tokio::fs::File::open(&path).await?;
    let body = Body::from_stream(ReaderStream::new(file));
    let disposition = attachment_disposition(&format!("{}.exe", system.nome));

    Ok((
        [
            (header::CONTENT_TYPE, EXECUTABLE_MEDIA_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
