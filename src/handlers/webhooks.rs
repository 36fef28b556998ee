// src/handlers/webhooks.rs
//
// Callbacks externos: MercadoPago (pagamentos) e Evolution API (mensagens
// de WhatsApp recebidas). Os dois respondem SEMPRE 200; falha de
// processamento vira log e, no caso dos pagamentos, um campo `warning`;
// nunca um erro HTTP que faça o provedor desistir ou repetir para sempre.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    config::AppState,
    models::chatbot::EvolutionWebhook,
    models::pagamento::MercadoPagoWebhook,
};

// POST /api/webhooks/mercadopago
pub async fn webhook_mercadopago(
    State(app_state): State<AppState>,
    Json(payload): Json<MercadoPagoWebhook>,
) -> Json<Value> {
    if payload.tipo.as_deref() != Some("payment") {
        return Json(json!({ "received": true, "ignored": true }));
    }

    let Some(mp_payment_id) = payload.data.as_ref().and_then(|d| extrair_id(&d.id)) else {
        tracing::warn!("Webhook do MercadoPago sem id de pagamento legível");
        return Json(json!({ "received": true, "ignored": true }));
    };

    let aprovado = match app_state.pagamento_service.processar_webhook(mp_payment_id).await {
        Ok(aprovado) => aprovado,
        Err(e) => {
            tracing::error!("Falha ao processar webhook do pagamento {}: {}", mp_payment_id, e);
            return Json(json!({ "received": true, "success": false }));
        }
    };

    let Some(pagamento) = aprovado else {
        return Json(json!({ "received": true, "success": true }));
    };

    // Notificações de melhor-esforço: cada uma no próprio escopo de erro.
    let avisos = app_state
        .notificacao_service
        .notificar_pagamento_aprovado(&pagamento)
        .await;

    if avisos.is_empty() {
        Json(json!({ "received": true, "success": true }))
    } else {
        Json(json!({ "received": true, "success": true, "warning": avisos.join(" ") }))
    }
}

// POST /api/webhooks/whatsapp: mensagens recebidas viram conversa com o
// chatbot, limitadas por telefone.
pub async fn webhook_whatsapp(
    State(app_state): State<AppState>,
    Json(payload): Json<EvolutionWebhook>,
) -> Json<Value> {
    if payload.event.as_deref() != Some("messages.upsert") {
        return Json(json!({ "received": true, "ignored": true }));
    }

    let Some(data) = payload.data.as_ref() else {
        return Json(json!({ "received": true, "ignored": true }));
    };

    // Mensagens enviadas por nós mesmos voltam pelo webhook; ignora.
    if data["key"]["fromMe"].as_bool().unwrap_or(false) {
        return Json(json!({ "received": true, "ignored": true }));
    }

    let (Some(telefone), Some(texto)) = (extrair_numero(data), extrair_texto(data)) else {
        return Json(json!({ "received": true, "ignored": true }));
    };

    let config = match app_state.config_repo.get().await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Falha ao carregar configurações no webhook: {}", e);
            return Json(json!({ "received": true, "success": false }));
        }
    };

    if !config.chatbot_ativo {
        return Json(json!({ "received": true, "ignored": true }));
    }

    let limite = config.limite_msgs_por_minuto.max(1) as u32;
    let resposta = if app_state.rate_limiter.permitir(&telefone, limite).await {
        match app_state.chatbot_service.responder(&texto, &[]).await {
            Ok(resposta) => resposta,
            Err(e) => {
                tracing::error!("Chatbot falhou para {}: {}", telefone, e);
                "Desculpe, não consegui responder agora. Tente novamente em instantes.".to_string()
            }
        }
    } else {
        "Você enviou muitas mensagens em pouco tempo. Aguarde um minuto e tente de novo, por favor."
            .to_string()
    };

    if let Some(evolution) = app_state.notificacao_service.whatsapp() {
        if let Err(e) = evolution.enviar_texto(&telefone, &resposta).await {
            tracing::error!("Falha ao responder {} no WhatsApp: {}", telefone, e);
            return Json(json!({ "received": true, "success": false }));
        }
    }

    Json(json!({ "received": true, "success": true }))
}

// O id do MercadoPago chega ora como número, ora como string.
fn extrair_id(valor: &Value) -> Option<i64> {
    match valor {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// "5511988887777@s.whatsapp.net" -> "5511988887777"
fn extrair_numero(data: &Value) -> Option<String> {
    let jid = data["key"]["remoteJid"].as_str()?;
    let numero: String = jid
        .split('@')
        .next()?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if numero.is_empty() {
        None
    } else {
        Some(numero)
    }
}

fn extrair_texto(data: &Value) -> Option<String> {
    data["message"]["conversation"]
        .as_str()
        .or_else(|| data["message"]["extendedTextMessage"]["text"].as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_numerico_e_string() {
        assert_eq!(extrair_id(&json!(42)), Some(42));
        assert_eq!(extrair_id(&json!("42")), Some(42));
        assert_eq!(extrair_id(&json!("abc")), None);
        assert_eq!(extrair_id(&json!(null)), None);
    }

    #[test]
    fn numero_sai_do_remote_jid() {
        let data = json!({ "key": { "remoteJid": "5511988887777@s.whatsapp.net" } });
        assert_eq!(extrair_numero(&data), Some("5511988887777".to_string()));
        assert_eq!(extrair_numero(&json!({})), None);
    }

    #[test]
    fn texto_de_conversation_e_extended() {
        let simples = json!({ "message": { "conversation": "oi " } });
        assert_eq!(extrair_texto(&simples), Some("oi".to_string()));

        let extended = json!({ "message": { "extendedTextMessage": { "text": "olá" } } });
        assert_eq!(extrair_texto(&extended), Some("olá".to_string()));

        assert_eq!(extrair_texto(&json!({ "message": {} })), None);
        assert_eq!(extrair_texto(&json!({ "message": { "conversation": "  " } })), None);
    }
}
