// src/handlers/pedidos.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::validacao::{normalizar_cpf, validar_cpf},
    config::AppState,
    models::pedido::{CreatePedidoPayload, Pedido},
};

// POST /api/pedidos: pedido de livro do fluxo público.
#[utoipa::path(
    post,
    path = "/api/pedidos",
    tag = "Pedidos",
    request_body = CreatePedidoPayload,
    responses(
        (status = 201, description = "Pedido criado", body = Pedido),
        (status = 404, description = "CPF sem ficha de dados pessoais")
    )
)]
pub async fn create_pedido(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePedidoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cpf = normalizar_cpf(&payload.cpf);

    // Só aluno com ficha pede livro.
    app_state
        .aluno_repo
        .find_by_cpf(&cpf)
        .await?
        .ok_or(AppError::AlunoNotFound)?;

    let pedido = app_state
        .pedido_repo
        .create(
            &cpf,
            &payload.livro,
            &payload.ciclo,
            Utc::now().date_naive(),
            payload.observacao.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(pedido)))
}

// GET /api/pedidos
#[utoipa::path(
    get,
    path = "/api/pedidos",
    tag = "Pedidos",
    responses((status = 200, description = "Lista de pedidos", body = Vec<Pedido>)),
    security(("api_jwt" = []))
)]
pub async fn list_pedidos(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let pedidos = app_state.pedido_repo.list_all().await?;
    Ok((StatusCode::OK, Json(pedidos)))
}

// GET /api/pedidos/cpf/{cpf}
#[utoipa::path(
    get,
    path = "/api/pedidos/cpf/{cpf}",
    tag = "Pedidos",
    params(("cpf" = String, Path, description = "CPF com ou sem pontuação")),
    responses((status = 200, description = "Pedidos do aluno", body = Vec<Pedido>))
)]
pub async fn list_pedidos_por_cpf(
    State(app_state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validar_cpf(&cpf).map_err(|_| AppError::CpfInvalido)?;

    let pedidos = app_state
        .pedido_repo
        .find_by_cpf(&normalizar_cpf(&cpf))
        .await?;
    Ok((StatusCode::OK, Json(pedidos)))
}

// DELETE /api/pedidos/{id}: cancelamento.
//
// Remove o pedido E as cobranças da mesma compra numa transação só, e é
// idempotente: cancelar de novo um pedido já removido devolve o mesmo
// formato de sucesso, sem tocar em nada.
#[utoipa::path(
    delete,
    path = "/api/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses((status = 200, description = "Pedido cancelado (ou já não existia)"))
)]
pub async fn cancelar_pedido(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let Some(pedido) = app_state.pedido_repo.find_by_id(id).await? else {
        // Já cancelado antes: no-op.
        return Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "removido": false })),
        ));
    };

    let mut tx = app_state.db_pool.begin().await?;

    app_state.pedido_repo.delete(&mut *tx, id).await?;
    let pagamentos_removidos = app_state
        .pagamento_repo
        .delete_por_compra(&mut *tx, &pedido.cpf, &pedido.livro, &pedido.ciclo)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Pedido {} cancelado ({} cobrança(s) removida(s))",
        id,
        pagamentos_removidos
    );

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "removido": true })),
    ))
}
