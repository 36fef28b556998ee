// src/models/chatbot.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Um turno da conversa, no formato que o front já usava.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MensagemChat {
    // "usuario" ou "assistente"
    #[schema(example = "usuario")]
    pub papel: String,
    pub conteudo: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotPayload {
    #[validate(length(min = 1, max = 2000, message = "A mensagem deve ter entre 1 e 2000 caracteres."))]
    pub mensagem: String,

    #[serde(default)]
    pub historico: Vec<MensagemChat>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotResponse {
    pub resposta: String,
}

// Payload (reduzido) do webhook de mensagens recebidas da Evolution API.
#[derive(Debug, Deserialize)]
pub struct EvolutionWebhook {
    pub event: Option<String>,
    pub data: Option<serde_json::Value>,
}
