// src/handlers/chatbot.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::chatbot::{ChatbotPayload, ChatbotResponse},
};

// POST /api/chatbot: usado pela janela de chat do site.
pub async fn conversar(
    State(app_state): State<AppState>,
    Json(payload): Json<ChatbotPayload>,
) -> Result<Json<ChatbotResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let config = app_state.config_repo.get().await?;
    if !config.chatbot_ativo {
        return Err(AppError::ChatbotError("assistente desativado nas configurações".to_string()));
    }

    let resposta = app_state
        .chatbot_service
        .responder(&payload.mensagem, &payload.historico)
        .await?;

    Ok(Json(ChatbotResponse { resposta }))
}
