// src/models/aluno.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validacao::validar_cpf;

// Ficha de dados pessoais do aluno (antiga aba "dados pessoais").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Aluno {
    pub id: Uuid,
    #[schema(example = "João Pereira")]
    pub nome: String,
    // Sempre armazenado só com os 11 dígitos.
    #[schema(example = "52998224725")]
    pub cpf: String,
    pub rg: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    #[schema(example = "Ensino Médio completo")]
    pub origem_academica: Option<String>,
    #[schema(example = "Diácono")]
    pub funcao_igreja: Option<String>,
    // Texto livre, como no sistema antigo ("Matriculado", "", ...).
    #[schema(example = "Matriculado")]
    pub status: String,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

// Payload do formulário público de cadastro.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlunoPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "João Pereira")]
    pub nome: String,

    #[validate(custom(function = validar_cpf))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    pub rg: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub origem_academica: Option<String>,
    pub funcao_igreja: Option<String>,
}

// Edição feita pela secretaria: os mesmos campos do cadastro, mais o status.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlunoPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: String,
    pub rg: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub origem_academica: Option<String>,
    pub funcao_igreja: Option<String>,
    #[schema(example = "Matriculado")]
    pub status: Option<String>,
}
