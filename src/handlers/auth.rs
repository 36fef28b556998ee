// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginPayload, Usuario},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Usuário ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, usuario) = app_state
        .auth_service
        .login(&payload.username, &payload.senha)
        .await?;

    Ok(Json(AuthResponse { token, usuario }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/usuarios/me",
    tag = "Usuarios",
    responses((status = 200, description = "Usuário logado", body = Usuario)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(usuario): AuthenticatedUser) -> Json<Usuario> {
    Json(usuario)
}
