// src/services/pagamento_service.rs

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    clients::mercadopago::MercadoPagoClient,
    common::error::AppError,
    db::{AlunoRepository, PagamentoRepository},
    models::pagamento::{CreatePixPayload, Pagamento, PixResponse, StatusPagamento},
};

#[derive(Clone)]
pub struct PagamentoService {
    pagamento_repo: PagamentoRepository,
    aluno_repo: AlunoRepository,
    mercadopago: MercadoPagoClient,
    // URL pública deste backend, usada como notification_url da cobrança.
    webhook_base_url: Option<String>,
}

// external_reference de uma cobrança: ou o UUID da nossa linha de
// pagamento, ou o formato legado CPF_LIVRO_CICLO do sistema antigo.
#[derive(Debug, PartialEq)]
pub enum ExternalReference {
    Id(Uuid),
    Legado { cpf: String, livro: String, ciclo: String },
    Invalido,
}

/// Interpreta o external_reference. O UUID tem prioridade; o formato
/// legado é um split posicional por underline: primeiro pedaço é o CPF,
/// último é o ciclo e o meio (re-juntado) é o livro. Aceito apenas para
/// cobranças emitidas pelo sistema antigo.
pub fn parse_external_reference(referencia: &str) -> ExternalReference {
    if let Ok(id) = Uuid::parse_str(referencia) {
        return ExternalReference::Id(id);
    }

    let partes: Vec<&str> = referencia.split('_').collect();
    if partes.len() < 3 {
        return ExternalReference::Invalido;
    }

    ExternalReference::Legado {
        cpf: partes[0].to_string(),
        livro: partes[1..partes.len() - 1].join("_"),
        ciclo: partes[partes.len() - 1].to_string(),
    }
}

impl PagamentoService {
    pub fn new(
        pagamento_repo: PagamentoRepository,
        aluno_repo: AlunoRepository,
        mercadopago: MercadoPagoClient,
        webhook_base_url: Option<String>,
    ) -> Self {
        Self { pagamento_repo, aluno_repo, mercadopago, webhook_base_url }
    }

    /// Emite uma cobrança PIX: grava a linha pendente, chama o MercadoPago
    /// com o id da linha como external_reference e persiste os dados do QR.
    pub async fn criar_pix(&self, cpf: &str, payload: &CreatePixPayload) -> Result<PixResponse, AppError> {
        let aluno = self
            .aluno_repo
            .find_by_cpf(cpf)
            .await?
            .ok_or(AppError::AlunoNotFound)?;

        let valor = Decimal::from_f64(payload.valor)
            .ok_or_else(|| anyhow::anyhow!("Valor inválido: {}", payload.valor))?
            .round_dp(2);

        let pendente = self
            .pagamento_repo
            .create_pendente(cpf, &payload.livro, &payload.ciclo, valor)
            .await?;

        let email_pagador = payload
            .email_pagador
            .clone()
            .or(aluno.email)
            .unwrap_or_else(|| "pagador@eetad.org".to_string());

        let descricao = format!("Livro {} - {}", payload.livro, payload.ciclo);
        let notification_url = self
            .webhook_base_url
            .as_ref()
            .map(|base| format!("{}/api/webhooks/mercadopago", base.trim_end_matches('/')));

        let cobranca = match self
            .mercadopago
            .criar_pix(
                payload.valor,
                &descricao,
                cpf,
                &email_pagador,
                &pendente.id.to_string(),
                notification_url.as_deref(),
            )
            .await
        {
            Ok(cobranca) => cobranca,
            Err(e) => {
                // A linha pendente não fica órfã: vira 'cancelado'.
                self.pagamento_repo
                    .set_status(pendente.id, StatusPagamento::Cancelado)
                    .await?;
                return Err(e);
            }
        };

        let pagamento = self
            .pagamento_repo
            .registrar_cobranca(
                pendente.id,
                cobranca.id,
                cobranca.qr_code(),
                cobranca.qr_code_base64(),
                cobranca.ticket_url(),
            )
            .await?;

        tracing::info!(
            "Cobrança PIX {} criada (MercadoPago {}) para o CPF {}",
            pagamento.id,
            cobranca.id,
            cpf
        );

        Ok(PixResponse {
            qr_code: pagamento.qr_code.clone(),
            qr_code_base64: pagamento.qr_code_base64.clone(),
            ticket_url: pagamento.ticket_url.clone(),
            pagamento,
        })
    }

    /// Processa o callback do MercadoPago para um pagamento. Busca o
    /// pagamento completo na API (nunca confiamos no corpo do webhook) e,
    /// só quando aprovado, atualiza-se-existe / insere-se-não-existe.
    /// Devolve a linha aprovada, ou None quando não há nada a fazer.
    pub async fn processar_webhook(&self, mp_payment_id: i64) -> Result<Option<Pagamento>, AppError> {
        let mp_pagamento = self.mercadopago.buscar_pagamento(mp_payment_id).await?;

        if mp_pagamento.status != "approved" {
            tracing::info!(
                "Webhook do pagamento {} ignorado (status '{}')",
                mp_payment_id,
                mp_pagamento.status
            );
            return Ok(None);
        }

        // Caminho mais comum: a cobrança é nossa e a linha já existe.
        if let Some(pagamento) = self.pagamento_repo.marcar_aprovado_por_mp_id(mp_payment_id).await? {
            return Ok(Some(pagamento));
        }

        let referencia = mp_pagamento.external_reference.as_deref().unwrap_or_default();
        let valor = Decimal::from_f64(mp_pagamento.transaction_amount.unwrap_or_default())
            .unwrap_or_default()
            .round_dp(2);

        match parse_external_reference(referencia) {
            ExternalReference::Id(id) => {
                let Some(existente) = self.pagamento_repo.find_by_id(id).await? else {
                    tracing::warn!(
                        "Pagamento {} aprovado com external_reference {} sem linha correspondente",
                        mp_payment_id,
                        referencia
                    );
                    return Ok(None);
                };
                let pagamento = self
                    .pagamento_repo
                    .upsert_aprovado(
                        id,
                        &existente.cpf,
                        &existente.livro,
                        &existente.ciclo,
                        existente.valor,
                        mp_payment_id,
                    )
                    .await?;
                Ok(Some(pagamento))
            }
            ExternalReference::Legado { cpf, livro, ciclo } => {
                let pagamento = self
                    .pagamento_repo
                    .insert_aprovado_legado(&cpf, &livro, &ciclo, valor, mp_payment_id)
                    .await?;
                Ok(Some(pagamento))
            }
            ExternalReference::Invalido => {
                tracing::warn!(
                    "Pagamento {} aprovado com external_reference ilegível: '{}'",
                    mp_payment_id,
                    referencia
                );
                Ok(None)
            }
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Pagamento>, AppError> {
        self.pagamento_repo.list_all().await
    }

    pub async fn list_por_cpf(&self, cpf: &str) -> Result<Vec<Pagamento>, AppError> {
        self.pagamento_repo.find_by_cpf(cpf).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referencia_uuid_tem_prioridade() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_external_reference(&id.to_string()),
            ExternalReference::Id(id)
        );
    }

    #[test]
    fn referencia_legada_posicional() {
        assert_eq!(
            parse_external_reference("11144477735_Bibliologia_1º Ciclo"),
            ExternalReference::Legado {
                cpf: "11144477735".into(),
                livro: "Bibliologia".into(),
                ciclo: "1º Ciclo".into(),
            }
        );
    }

    #[test]
    fn referencia_legada_com_underline_no_livro() {
        // O meio re-juntado vira o livro; primeiro = CPF, último = ciclo.
        assert_eq!(
            parse_external_reference("11144477735_Atos_dos_Apostolos_2º Ciclo"),
            ExternalReference::Legado {
                cpf: "11144477735".into(),
                livro: "Atos_dos_Apostolos".into(),
                ciclo: "2º Ciclo".into(),
            }
        );
    }

    #[test]
    fn referencia_ilegivel() {
        assert_eq!(parse_external_reference(""), ExternalReference::Invalido);
        assert_eq!(parse_external_reference("so-um-pedaco"), ExternalReference::Invalido);
        assert_eq!(parse_external_reference("cpf_livro"), ExternalReference::Invalido);
    }
}
