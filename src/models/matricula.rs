// src/models/matricula.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validacao::validar_cpf;

// Registro de matrícula (antiga aba "matriculas"): cópia desnormalizada de
// nome/CPF mais ciclo, subnúcleo, data, status e observação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Matricula {
    pub id: Uuid,
    // Código de negócio no formato MAT-<timestamp>, mantido do sistema antigo.
    #[schema(example = "MAT-1756406400000")]
    pub codigo: String,
    pub aluno_id: Uuid,
    pub nome: String,
    pub cpf: String,
    #[schema(example = "1º Ciclo")]
    pub ciclo: String,
    #[schema(example = "Núcleo Central")]
    pub subnucleo: Option<String>,
    pub data_matricula: NaiveDate,
    #[schema(example = "Ativa")]
    pub status: String,
    pub observacao: Option<String>,
    pub criado_em: DateTime<Utc>,
}

// Payload de finalização de matrícula.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizarMatriculaPayload {
    #[validate(custom(function = validar_cpf))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    #[validate(length(min = 1, message = "O ciclo é obrigatório."))]
    #[schema(example = "1º Ciclo")]
    pub ciclo: String,

    pub subnucleo: Option<String>,
    pub observacao: Option<String>,
}
