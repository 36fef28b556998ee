// src/handlers/alunos.rs

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
    common::validacao::{normalizar_cpf, validar_cpf},
    config::AppState,
    models::aluno::{Aluno, CreateAlunoPayload, UpdateAlunoPayload},
};

// POST /api/alunos: formulário público de cadastro.
#[utoipa::path(
    post,
    path = "/api/alunos",
    tag = "Alunos",
    request_body = CreateAlunoPayload,
    responses(
        (status = 201, description = "Aluno cadastrado", body = Aluno),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF já cadastrado")
    )
)]
pub async fn create_aluno(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateAlunoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cpf = normalizar_cpf(&payload.cpf);
    let aluno = app_state.aluno_repo.create(&cpf, &payload).await?;
    app_state.invalidar_caches().await;

    Ok((StatusCode::CREATED, Json(aluno)))
}

// GET /api/alunos/cpf/{cpf}: o "verificar CPF" dos fluxos públicos.
#[utoipa::path(
    get,
    path = "/api/alunos/cpf/{cpf}",
    tag = "Alunos",
    params(("cpf" = String, Path, description = "CPF com ou sem pontuação")),
    responses(
        (status = 200, description = "Ficha do aluno", body = Aluno),
        (status = 404, description = "Aluno não encontrado")
    )
)]
pub async fn get_aluno_por_cpf(
    State(app_state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validar_cpf(&cpf).map_err(|_| AppError::CpfInvalido)?;

    let aluno = app_state
        .aluno_repo
        .find_by_cpf(&normalizar_cpf(&cpf))
        .await?
        .ok_or(AppError::AlunoNotFound)?;

    Ok((StatusCode::OK, Json(aluno)))
}

// GET /api/alunos: painel da secretaria.
#[utoipa::path(
    get,
    path = "/api/alunos",
    tag = "Alunos",
    responses((status = 200, description = "Todos os alunos", body = Vec<Aluno>)),
    security(("api_jwt" = []))
)]
pub async fn list_alunos(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let alunos = app_state.aluno_repo.list_all().await?;
    Ok((StatusCode::OK, Json(alunos)))
}

// GET /api/alunos/pendentes: com ficha, sem matrícula (via cache TTL).
#[utoipa::path(
    get,
    path = "/api/alunos/pendentes",
    tag = "Alunos",
    responses((status = 200, description = "Alunos aguardando matrícula", body = Vec<Aluno>)),
    security(("api_jwt" = []))
)]
pub async fn list_pendentes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.aluno_repo.clone();
    let alunos = app_state
        .cache_pendentes
        .get_or_recarregar(|| async move { repo.list_pendentes().await })
        .await?;
    Ok((StatusCode::OK, Json(alunos.as_ref().clone())))
}

// GET /api/alunos/matriculados
#[utoipa::path(
    get,
    path = "/api/alunos/matriculados",
    tag = "Alunos",
    responses((status = 200, description = "Alunos com matrícula ativa", body = Vec<Aluno>)),
    security(("api_jwt" = []))
)]
pub async fn list_matriculados(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let repo = app_state.aluno_repo.clone();
    let alunos = app_state
        .cache_matriculados
        .get_or_recarregar(|| async move { repo.list_matriculados().await })
        .await?;
    Ok((StatusCode::OK, Json(alunos.as_ref().clone())))
}

// PUT /api/alunos/{id}: edição pela secretaria.
#[utoipa::path(
    put,
    path = "/api/alunos/{id}",
    tag = "Alunos",
    params(("id" = Uuid, Path, description = "ID do aluno")),
    request_body = UpdateAlunoPayload,
    responses(
        (status = 200, description = "Aluno atualizado", body = Aluno),
        (status = 404, description = "Aluno não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_aluno(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAlunoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let aluno = app_state
        .aluno_repo
        .update(id, &payload)
        .await?
        .ok_or(AppError::AlunoNotFound)?;
    app_state.invalidar_caches().await;

    Ok((StatusCode::OK, Json(aluno)))
}

// DELETE /api/alunos/{id}
#[utoipa::path(
    delete,
    path = "/api/alunos/{id}",
    tag = "Alunos",
    params(("id" = Uuid, Path, description = "ID do aluno")),
    responses(
        (status = 204, description = "Aluno removido"),
        (status = 404, description = "Aluno não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_aluno(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let removidos = app_state.aluno_repo.delete(id).await?;
    if removidos == 0 {
        return Err(AppError::AlunoNotFound);
    }
    app_state.invalidar_caches().await;

    Ok(StatusCode::NO_CONTENT)
}
