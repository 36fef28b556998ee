// src/clients/openai.rs
//
// Cliente da API de chat-completions da OpenAI, com suporte a tool calling.
// O serviço de chatbot monta as mensagens e as ferramentas; aqui só mora a
// chamada HTTP e o recorte da resposta.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::error::AppError;

const MODELO: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// Mensagem devolvida pelo modelo: ou texto final, ou pedidos de ferramenta.
#[derive(Debug, Clone, Deserialize)]
pub struct MensagemModelo {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    // JSON serializado em string, como a API devolve.
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MensagemModelo,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url("https://api.openai.com".to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    pub async fn chat(
        &self,
        mensagens: &[Value],
        tools: Option<&[Value]>,
    ) -> Result<MensagemModelo, AppError> {
        let mut body = json!({
            "model": MODELO,
            "messages": mensagens,
            "temperature": 0.3,
            "max_tokens": 600
        });
        if let Some(tools) = tools {
            body["tools"] = json!(tools);
        }

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ChatbotError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ChatbotError(format!(
                "chat-completions devolveu {}",
                response.status()
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::ChatbotError(format!("resposta inesperada: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| AppError::ChatbotError("resposta sem choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn chat_devolve_texto_final() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-teste")
                    .json_body_partial(r#"{ "model": "gpt-4o-mini" }"#);
                then.status(200).json_body(serde_json::json!({
                    "choices": [
                        { "message": { "content": "Olá! Como posso ajudar?" } }
                    ]
                }));
            })
            .await;

        let client = OpenAiClient::with_base_url(server.base_url(), "sk-teste".into());
        let msg = client
            .chat(&[json!({ "role": "user", "content": "oi" })], None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(msg.content.as_deref(), Some("Olá! Como posso ajudar?"));
        assert!(msg.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn chat_devolve_tool_calls() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(serde_json::json!({
                    "choices": [{
                        "message": {
                            "content": null,
                            "tool_calls": [{
                                "id": "call_1",
                                "type": "function",
                                "function": {
                                    "name": "consultar_aluno",
                                    "arguments": "{\"cpf\":\"52998224725\"}"
                                }
                            }]
                        }
                    }]
                }));
            })
            .await;

        let client = OpenAiClient::with_base_url(server.base_url(), "sk".into());
        let msg = client
            .chat(&[json!({ "role": "user", "content": "meu cadastro" })], None)
            .await
            .unwrap();

        assert_eq!(msg.tool_calls.len(), 1);
        assert_eq!(msg.tool_calls[0].function.name, "consultar_aluno");
    }
}
