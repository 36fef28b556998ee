// src/services/notificacao_service.rs
//
// Notificações de melhor-esforço. Um WhatsApp ou e-mail que falha nunca
// derruba a requisição de quem chamou: cada envio tem o próprio escopo de
// erro e vira no máximo um aviso na resposta.

use crate::{
    clients::{evolution::EvolutionClient, mailer::Mailer},
    db::{AlunoRepository, ConfiguracaoRepository},
    models::pagamento::Pagamento,
};

#[derive(Clone)]
pub struct NotificacaoService {
    evolution: Option<EvolutionClient>,
    mailer: Option<Mailer>,
    aluno_repo: AlunoRepository,
    config_repo: ConfiguracaoRepository,
}

impl NotificacaoService {
    pub fn new(
        evolution: Option<EvolutionClient>,
        mailer: Option<Mailer>,
        aluno_repo: AlunoRepository,
        config_repo: ConfiguracaoRepository,
    ) -> Self {
        Self { evolution, mailer, aluno_repo, config_repo }
    }

    pub fn whatsapp(&self) -> Option<&EvolutionClient> {
        self.evolution.as_ref()
    }

    /// Avisa o aluno que o pagamento foi aprovado. Devolve a lista de
    /// avisos (envios que falharam ou foram pulados por falta de contato).
    pub async fn notificar_pagamento_aprovado(&self, pagamento: &Pagamento) -> Vec<String> {
        let mut avisos = Vec::new();

        let config = match self.config_repo.get().await {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Falha ao carregar configurações: {}", e);
                return vec!["Configurações indisponíveis; notificações puladas.".to_string()];
            }
        };

        let aluno = match self.aluno_repo.find_by_cpf(&pagamento.cpf).await {
            Ok(aluno) => aluno,
            Err(e) => {
                tracing::error!("Falha ao buscar aluno para notificar: {}", e);
                None
            }
        };

        let nome = aluno.as_ref().map(|a| a.nome.clone()).unwrap_or_else(|| "aluno(a)".to_string());
        let texto = format!(
            "Olá, {}! Recebemos o pagamento de R$ {} do livro \"{}\" ({}). Bons estudos!",
            nome, pagamento.valor, pagamento.livro, pagamento.ciclo
        );

        // WhatsApp
        if config.notificar_whatsapp {
            match (&self.evolution, aluno.as_ref().and_then(|a| a.telefone.as_deref())) {
                (Some(evolution), Some(telefone)) => {
                    if let Err(e) = evolution.enviar_texto(telefone, &texto).await {
                        tracing::error!("Falha ao enviar WhatsApp: {}", e);
                        avisos.push("Não foi possível enviar o WhatsApp de confirmação.".to_string());
                    }
                }
                (None, _) => tracing::debug!("Evolution API não configurada; WhatsApp pulado"),
                (_, None) => avisos.push("Aluno sem telefone cadastrado; WhatsApp pulado.".to_string()),
            }
        }

        // E-mail
        if config.notificar_email {
            match (&self.mailer, aluno.as_ref().and_then(|a| a.email.as_deref())) {
                (Some(mailer), Some(email)) => {
                    let corpo = format!(
                        "<p>Olá, <b>{}</b>!</p>\
                         <p>Confirmamos o pagamento de <b>R$ {}</b> referente ao livro \
                         <b>{}</b> ({}).</p><p>Secretaria EETAD</p>",
                        nome, pagamento.valor, pagamento.livro, pagamento.ciclo
                    );
                    if let Err(e) = mailer.enviar(email, "Pagamento confirmado", &corpo).await {
                        tracing::error!("Falha ao enviar e-mail: {}", e);
                        avisos.push("Não foi possível enviar o e-mail de confirmação.".to_string());
                    }
                }
                (None, _) => tracing::debug!("SMTP não configurado; e-mail pulado"),
                (_, None) => avisos.push("Aluno sem e-mail cadastrado; e-mail pulado.".to_string()),
            }
        }

        avisos
    }
}
