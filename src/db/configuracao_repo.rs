// src/db/configuracao_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::configuracao::{Configuracao, UpdateConfiguracaoPayload},
};

// A tabela 'configuracoes' tem uma linha só (id = TRUE).
#[derive(Clone)]
pub struct ConfiguracaoRepository {
    pool: PgPool,
}

impl ConfiguracaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<Configuracao, AppError> {
        let config = sqlx::query_as::<_, Configuracao>(
            "SELECT * FROM configuracoes WHERE id = TRUE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(config)
    }

    pub async fn update(&self, payload: &UpdateConfiguracaoPayload) -> Result<Configuracao, AppError> {
        let config = sqlx::query_as::<_, Configuracao>(
            r#"
            UPDATE configuracoes SET
                notificar_whatsapp = COALESCE($1, notificar_whatsapp),
                notificar_email = COALESCE($2, notificar_email),
                chatbot_ativo = COALESCE($3, chatbot_ativo),
                limite_msgs_por_minuto = COALESCE($4, limite_msgs_por_minuto),
                atualizado_em = now()
            WHERE id = TRUE
            RETURNING *
            "#,
        )
        .bind(payload.notificar_whatsapp)
        .bind(payload.notificar_email)
        .bind(payload.chatbot_ativo)
        .bind(payload.limite_msgs_por_minuto)
        .fetch_one(&self.pool)
        .await?;
        Ok(config)
    }
}
