// src/handlers/usuarios.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{CreateUsuarioPayload, Usuario},
};

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CreateUsuarioPayload,
    responses(
        (status = 201, description = "Usuário criado", body = Usuario),
        (status = 409, description = "Usuário ou e-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_usuario(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state.auth_service.create_usuario(&payload).await?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses((status = 200, description = "Lista de usuários", body = Vec<Usuario>)),
    security(("api_jwt" = []))
)]
pub async fn list_usuarios(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let usuarios = app_state.auth_service.list_usuarios().await?;
    Ok((StatusCode::OK, Json(usuarios)))
}

// DELETE /api/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Último usuário não pode ser removido")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_usuario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.delete_usuario(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
