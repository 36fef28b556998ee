// src/handlers/matriculas.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    common::validacao::normalizar_cpf,
    config::AppState,
    models::matricula::{FinalizarMatriculaPayload, Matricula},
};

// POST /api/matriculas: finalização de matrícula.
#[utoipa::path(
    post,
    path = "/api/matriculas",
    tag = "Matriculas",
    request_body = FinalizarMatriculaPayload,
    responses(
        (status = 201, description = "Matrícula finalizada", body = Matricula),
        (status = 404, description = "CPF sem ficha de dados pessoais"),
        (status = 409, description = "Aluno já matriculado neste ciclo")
    ),
    security(("api_jwt" = []))
)]
pub async fn finalizar_matricula(
    State(app_state): State<AppState>,
    Json(payload): Json<FinalizarMatriculaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cpf = normalizar_cpf(&payload.cpf);
    let matricula = app_state.matricula_service.finalizar(&cpf, &payload).await?;

    // O aluno saiu de "pendentes" e entrou em "matriculados".
    app_state.invalidar_caches().await;

    Ok((StatusCode::CREATED, Json(matricula)))
}

// GET /api/matriculas
#[utoipa::path(
    get,
    path = "/api/matriculas",
    tag = "Matriculas",
    responses((status = 200, description = "Lista de matrículas", body = Vec<Matricula>)),
    security(("api_jwt" = []))
)]
pub async fn list_matriculas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let matriculas = app_state.matricula_repo.list_all().await?;
    Ok((StatusCode::OK, Json(matriculas)))
}
