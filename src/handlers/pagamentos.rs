// src/handlers/pagamentos.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    common::validacao::{normalizar_cpf, validar_cpf},
    config::AppState,
    models::pagamento::{CreatePixPayload, Pagamento, PixResponse},
};

// POST /api/pagamentos/pix: emite a cobrança e devolve o QR Code.
#[utoipa::path(
    post,
    path = "/api/pagamentos/pix",
    tag = "Pagamentos",
    request_body = CreatePixPayload,
    responses(
        (status = 201, description = "Cobrança PIX criada", body = PixResponse),
        (status = 404, description = "CPF sem ficha de dados pessoais"),
        (status = 502, description = "Falha na comunicação com o MercadoPago")
    )
)]
pub async fn criar_pix(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePixPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cpf = normalizar_cpf(&payload.cpf);
    let resposta = app_state.pagamento_service.criar_pix(&cpf, &payload).await?;

    Ok((StatusCode::CREATED, Json(resposta)))
}

// GET /api/pagamentos: painel da secretaria.
#[utoipa::path(
    get,
    path = "/api/pagamentos",
    tag = "Pagamentos",
    responses((status = 200, description = "Lista de pagamentos", body = Vec<Pagamento>)),
    security(("api_jwt" = []))
)]
pub async fn list_pagamentos(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pagamentos = app_state.pagamento_service.list_all().await?;
    Ok((StatusCode::OK, Json(pagamentos)))
}

// GET /api/pagamentos/cpf/{cpf}: tela de checkout consulta o andamento.
#[utoipa::path(
    get,
    path = "/api/pagamentos/cpf/{cpf}",
    tag = "Pagamentos",
    params(("cpf" = String, Path, description = "CPF com ou sem pontuação")),
    responses((status = 200, description = "Pagamentos do aluno", body = Vec<Pagamento>))
)]
pub async fn list_pagamentos_por_cpf(
    State(app_state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validar_cpf(&cpf).map_err(|_| AppError::CpfInvalido)?;

    let pagamentos = app_state
        .pagamento_service
        .list_por_cpf(&normalizar_cpf(&cpf))
        .await?;
    Ok((StatusCode::OK, Json(pagamentos)))
}
