// src/models/configuracao.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Linha única de configuração, no lugar do settings.json do webhook antigo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuracao {
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub id: bool,
    pub notificar_whatsapp: bool,
    pub notificar_email: bool,
    pub chatbot_ativo: bool,
    #[schema(example = 10)]
    pub limite_msgs_por_minuto: i32,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfiguracaoPayload {
    pub notificar_whatsapp: Option<bool>,
    pub notificar_email: Option<bool>,
    pub chatbot_ativo: Option<bool>,
    #[validate(range(min = 1, max = 120, message = "O limite deve ficar entre 1 e 120."))]
    pub limite_msgs_por_minuto: Option<i32>,
}
