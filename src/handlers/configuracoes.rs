// src/handlers/configuracoes.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::configuracao::{Configuracao, UpdateConfiguracaoPayload},
};

// GET /api/configuracoes
#[utoipa::path(
    get,
    path = "/api/configuracoes",
    tag = "Configuracoes",
    responses((status = 200, description = "Configurações atuais", body = Configuracao)),
    security(("api_jwt" = []))
)]
pub async fn get_configuracoes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let config = app_state.config_repo.get().await?;
    Ok((StatusCode::OK, Json(config)))
}

// PUT /api/configuracoes
#[utoipa::path(
    put,
    path = "/api/configuracoes",
    tag = "Configuracoes",
    request_body = UpdateConfiguracaoPayload,
    responses((status = 200, description = "Configurações atualizadas", body = Configuracao)),
    security(("api_jwt" = []))
)]
pub async fn update_configuracoes(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateConfiguracaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let config = app_state.config_repo.update(&payload).await?;
    Ok((StatusCode::OK, Json(config)))
}
