// src/models/pedido.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validacao::validar_cpf;

// Pedido de livro (antiga aba "pedidos").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pedido {
    pub id: Uuid,
    pub cpf: String,
    #[schema(example = "Bibliologia")]
    pub livro: String,
    #[schema(example = "1º Ciclo")]
    pub ciclo: String,
    pub data_pedido: NaiveDate,
    pub observacao: Option<String>,
    #[schema(example = "Pendente")]
    pub status: String,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePedidoPayload {
    #[validate(custom(function = validar_cpf))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    #[validate(length(min = 1, message = "O livro é obrigatório."))]
    #[schema(example = "Bibliologia")]
    pub livro: String,

    #[validate(length(min = 1, message = "O ciclo é obrigatório."))]
    #[schema(example = "1º Ciclo")]
    pub ciclo: String,

    pub observacao: Option<String>,
}
