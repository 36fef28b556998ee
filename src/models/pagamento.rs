// src/models/pagamento.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validacao::validar_cpf;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_pagamento", rename_all = "snake_case")]
#[serde(rename_all = "camelCase")]
pub enum StatusPagamento {
    Pendente,
    Aprovado,
    Rejeitado,
    Cancelado,
}

// Cobrança PIX (antiga aba "pagamentos"). O `id` da linha também é o
// external_reference enviado ao MercadoPago.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagamento {
    pub id: Uuid,
    pub cpf: String,
    #[schema(example = "Bibliologia")]
    pub livro: String,
    #[schema(example = "1º Ciclo")]
    pub ciclo: String,
    #[schema(example = "45.00")]
    pub valor: Decimal,
    pub mp_payment_id: Option<i64>,
    pub status: StatusPagamento,
    #[schema(ignore)]
    pub qr_code: Option<String>,
    #[schema(ignore)]
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePixPayload {
    #[validate(custom(function = validar_cpf))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    #[validate(length(min = 1, message = "O livro é obrigatório."))]
    pub livro: String,

    #[validate(length(min = 1, message = "O ciclo é obrigatório."))]
    pub ciclo: String,

    #[validate(range(min = 0.01, message = "O valor deve ser positivo."))]
    #[schema(example = 45.0)]
    pub valor: f64,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email_pagador: Option<String>,
}

// Resposta da criação de cobrança: o que a tela de checkout precisa
// para exibir o QR Code.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PixResponse {
    pub pagamento: Pagamento,
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
}

// Corpo do callback do MercadoPago: { "type": "payment", "data": { "id" } }
#[derive(Debug, Deserialize)]
pub struct MercadoPagoWebhook {
    #[serde(rename = "type")]
    pub tipo: Option<String>,
    pub data: Option<MercadoPagoWebhookData>,
}

#[derive(Debug, Deserialize)]
pub struct MercadoPagoWebhookData {
    pub id: serde_json::Value,
}
