// src/clients/mercadopago.rs
//
// Cliente da API REST do MercadoPago (v1): criação de cobrança PIX e
// consulta de pagamento por id.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Clone)]
pub struct MercadoPagoClient {
    client: Client,
    base_url: String,
    access_token: String,
}

// Campos do pagamento que realmente usamos na resposta do MercadoPago.
#[derive(Debug, Clone, Deserialize)]
pub struct MpPagamento {
    pub id: i64,
    pub status: String,
    pub external_reference: Option<String>,
    pub transaction_amount: Option<f64>,
    pub point_of_interaction: Option<MpPointOfInteraction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MpPointOfInteraction {
    pub transaction_data: Option<MpTransactionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MpTransactionData {
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
}

impl MpPagamento {
    pub fn qr_code(&self) -> Option<&str> {
        self.point_of_interaction
            .as_ref()?
            .transaction_data
            .as_ref()?
            .qr_code
            .as_deref()
    }

    pub fn qr_code_base64(&self) -> Option<&str> {
        self.point_of_interaction
            .as_ref()?
            .transaction_data
            .as_ref()?
            .qr_code_base64
            .as_deref()
    }

    pub fn ticket_url(&self) -> Option<&str> {
        self.point_of_interaction
            .as_ref()?
            .transaction_data
            .as_ref()?
            .ticket_url
            .as_deref()
    }
}

impl MercadoPagoClient {
    pub fn new(access_token: String) -> Self {
        Self::with_base_url("https://api.mercadopago.com".to_string(), access_token)
    }

    pub fn with_base_url(base_url: String, access_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            access_token,
        }
    }

    /// Cria uma cobrança PIX. `external_reference` é o id da nossa linha de
    /// pagamento; a chave de idempotência evita cobrança dupla num retry.
    pub async fn criar_pix(
        &self,
        valor: f64,
        descricao: &str,
        cpf: &str,
        email_pagador: &str,
        external_reference: &str,
        notification_url: Option<&str>,
    ) -> Result<MpPagamento, AppError> {
        let mut body = json!({
            "transaction_amount": valor,
            "description": descricao,
            "payment_method_id": "pix",
            "external_reference": external_reference,
            "payer": {
                "email": email_pagador,
                "identification": { "type": "CPF", "number": cpf }
            }
        });
        if let Some(url) = notification_url {
            body["notification_url"] = json!(url);
        }

        let response = self
            .client
            .post(format!("{}/v1/payments", self.base_url))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::MercadoPagoError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let corpo = response.text().await.unwrap_or_default();
            return Err(AppError::MercadoPagoError(format!(
                "criação de cobrança devolveu {}: {}",
                status, corpo
            )));
        }

        response
            .json::<MpPagamento>()
            .await
            .map_err(|e| AppError::MercadoPagoError(format!("resposta inesperada: {}", e)))
    }

    /// Busca o pagamento completo por id. É isso que dá integridade ao
    /// webhook: nunca confiamos no corpo do callback, só no id.
    pub async fn buscar_pagamento(&self, payment_id: i64) -> Result<MpPagamento, AppError> {
        let response = self
            .client
            .get(format!("{}/v1/payments/{}", self.base_url, payment_id))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| AppError::MercadoPagoError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::MercadoPagoError(format!(
                "consulta do pagamento {} devolveu {}",
                payment_id,
                response.status()
            )));
        }

        response
            .json::<MpPagamento>()
            .await
            .map_err(|e| AppError::MercadoPagoError(format!("resposta inesperada: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn criar_pix_envia_payload_correto() {
        let server = MockServer::start_async().await;

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/payments")
                    .header("authorization", "Bearer token-teste")
                    .header_exists("x-idempotency-key")
                    .json_body_partial(
                        r#"{
                            "transaction_amount": 45.0,
                            "payment_method_id": "pix",
                            "external_reference": "ref-123",
                            "payer": { "identification": { "type": "CPF", "number": "52998224725" } }
                        }"#,
                    );
                then.status(201).json_body(serde_json::json!({
                    "id": 987654321,
                    "status": "pending",
                    "external_reference": "ref-123",
                    "transaction_amount": 45.0,
                    "point_of_interaction": {
                        "transaction_data": {
                            "qr_code": "00020126...",
                            "qr_code_base64": "iVBORw0KGgo=",
                            "ticket_url": "https://mp.com/ticket/1"
                        }
                    }
                }));
            })
            .await;

        let client = MercadoPagoClient::with_base_url(server.base_url(), "token-teste".into());
        let pagamento = client
            .criar_pix(45.0, "Livro Bibliologia", "52998224725", "aluno@teste.com", "ref-123", None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(pagamento.id, 987654321);
        assert_eq!(pagamento.status, "pending");
        assert_eq!(pagamento.qr_code(), Some("00020126..."));
        assert_eq!(pagamento.ticket_url(), Some("https://mp.com/ticket/1"));
    }

    #[tokio::test]
    async fn criar_pix_erro_http_vira_erro_de_dominio() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/payments");
                then.status(400)
                    .json_body(serde_json::json!({ "message": "invalid token" }));
            })
            .await;

        let client = MercadoPagoClient::with_base_url(server.base_url(), "ruim".into());
        let erro = client
            .criar_pix(10.0, "x", "52998224725", "a@b.com", "ref", None)
            .await;

        assert!(matches!(erro, Err(AppError::MercadoPagoError(_))));
    }

    #[tokio::test]
    async fn buscar_pagamento_por_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/payments/42");
                then.status(200).json_body(serde_json::json!({
                    "id": 42,
                    "status": "approved",
                    "external_reference": "11144477735_Bibliologia_1º Ciclo",
                    "transaction_amount": 45.0
                }));
            })
            .await;

        let client = MercadoPagoClient::with_base_url(server.base_url(), "token".into());
        let pagamento = client.buscar_pagamento(42).await.unwrap();

        mock.assert_async().await;
        assert_eq!(pagamento.status, "approved");
        assert_eq!(
            pagamento.external_reference.as_deref(),
            Some("11144477735_Bibliologia_1º Ciclo")
        );
        assert_eq!(pagamento.transaction_amount, Some(45.0));
    }
}
