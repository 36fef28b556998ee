// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validacao::validar_senha;

// Representa um usuário da secretaria vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    #[schema(example = "secretaria01")]
    pub username: String,
    #[schema(example = "secretaria@eetad.org")]
    pub email: String,
    #[schema(example = "Maria da Silva")]
    pub nome_completo: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub senha_hash: String,

    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 3, message = "O usuário deve ter no mínimo 3 caracteres."))]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub senha: String,
}

// Dados para criação de um usuário da secretaria
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsuarioPayload {
    #[validate(length(min = 3, message = "O usuário deve ter no mínimo 3 caracteres."))]
    #[schema(example = "secretaria01")]
    pub username: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "secretaria@eetad.org")]
    pub email: String,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Maria da Silva")]
    pub nome_completo: String,

    // Política herdada: 6 caracteres alfanuméricos, letra + número.
    #[validate(custom(function = validar_senha))]
    #[schema(example = "abc123")]
    pub senha: String,
}

// Resposta de autenticação com o token e o usuário logado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub usuario: Usuario,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
