// src/clients/evolution.rs
//
// Cliente da Evolution API (gateway de WhatsApp Business):
// POST {base}/message/sendText/{instance} com { number, text }.

use reqwest::Client;
use serde_json::json;

use crate::common::validacao::normalizar_telefone;

#[derive(Clone)]
pub struct EvolutionClient {
    client: Client,
    base_url: String,
    instance: String,
    api_key: String,
}

impl EvolutionClient {
    pub fn new(base_url: String, instance: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            instance,
            api_key,
        }
    }

    /// Envia uma mensagem de texto. O telefone é normalizado para dígitos
    /// com DDI 55. Devolve `anyhow::Error` porque todos os chamadores
    /// tratam o envio como melhor-esforço.
    pub async fn enviar_texto(&self, telefone: &str, texto: &str) -> anyhow::Result<()> {
        let numero = normalizar_telefone(telefone);
        let url = format!("{}/message/sendText/{}", self.base_url, self.instance);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&json!({ "number": numero, "text": texto }))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Evolution API devolveu {} ao enviar para {}",
                response.status(),
                numero
            );
        }

        tracing::info!("WhatsApp enviado para {}", numero);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn enviar_texto_normaliza_numero_e_usa_apikey() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/message/sendText/secretaria")
                    .header("apikey", "chave-teste")
                    .json_body(serde_json::json!({
                        "number": "5511988887777",
                        "text": "Pagamento confirmado!"
                    }));
                then.status(201).json_body(serde_json::json!({ "status": "PENDING" }));
            })
            .await;

        let client = EvolutionClient::new(server.base_url(), "secretaria".into(), "chave-teste".into());
        client
            .enviar_texto("(11) 98888-7777", "Pagamento confirmado!")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn erro_http_vira_err() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path_contains("/message/sendText/");
                then.status(401);
            })
            .await;

        let client = EvolutionClient::new(server.base_url(), "inst".into(), "errada".into());
        assert!(client.enviar_texto("11999998888", "oi").await.is_err());
    }
}
