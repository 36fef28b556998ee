// src/db/pedido_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::pedido::Pedido};

#[derive(Clone)]
pub struct PedidoRepository {
    pool: PgPool,
}

impl PedidoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Pedido>, AppError> {
        let pedidos = sqlx::query_as::<_, Pedido>(
            "SELECT * FROM pedidos ORDER BY criado_em DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pedidos)
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Vec<Pedido>, AppError> {
        let pedidos = sqlx::query_as::<_, Pedido>(
            "SELECT * FROM pedidos WHERE cpf = $1 ORDER BY criado_em DESC",
        )
        .bind(cpf)
        .fetch_all(&self.pool)
        .await?;
        Ok(pedidos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Pedido>, AppError> {
        let pedido = sqlx::query_as::<_, Pedido>(
            "SELECT * FROM pedidos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pedido)
    }

    pub async fn create(
        &self,
        cpf: &str,
        livro: &str,
        ciclo: &str,
        data_pedido: NaiveDate,
        observacao: Option<&str>,
    ) -> Result<Pedido, AppError> {
        let pedido = sqlx::query_as::<_, Pedido>(
            r#"
            INSERT INTO pedidos (cpf, livro, ciclo, data_pedido, observacao)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(cpf)
        .bind(livro)
        .bind(ciclo)
        .bind(data_pedido)
        .bind(observacao)
        .fetch_one(&self.pool)
        .await?;

        Ok(pedido)
    }

    // Remoção dentro da transação de cancelamento. Devolve 0 quando o
    // pedido já foi removido antes (cancelamento é idempotente).
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM pedidos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
