// src/db/pagamento_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pagamento::{Pagamento, StatusPagamento},
};

#[derive(Clone)]
pub struct PagamentoRepository {
    pool: PgPool,
}

impl PagamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Pagamento>, AppError> {
        let pagamentos = sqlx::query_as::<_, Pagamento>(
            "SELECT * FROM pagamentos ORDER BY criado_em DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pagamentos)
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Vec<Pagamento>, AppError> {
        let pagamentos = sqlx::query_as::<_, Pagamento>(
            "SELECT * FROM pagamentos WHERE cpf = $1 ORDER BY criado_em DESC",
        )
        .bind(cpf)
        .fetch_all(&self.pool)
        .await?;
        Ok(pagamentos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Pagamento>, AppError> {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            "SELECT * FROM pagamentos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pagamento)
    }

    // Linha pendente criada ANTES de chamar o MercadoPago; o id gerado aqui
    // vai na cobrança como external_reference.
    pub async fn create_pendente(
        &self,
        cpf: &str,
        livro: &str,
        ciclo: &str,
        valor: Decimal,
    ) -> Result<Pagamento, AppError> {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            INSERT INTO pagamentos (cpf, livro, ciclo, valor)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(cpf)
        .bind(livro)
        .bind(ciclo)
        .bind(valor)
        .fetch_one(&self.pool)
        .await?;

        Ok(pagamento)
    }

    // Preenche os dados devolvidos pelo MercadoPago na linha pendente.
    pub async fn registrar_cobranca(
        &self,
        id: Uuid,
        mp_payment_id: i64,
        qr_code: Option<&str>,
        qr_code_base64: Option<&str>,
        ticket_url: Option<&str>,
    ) -> Result<Pagamento, AppError> {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            UPDATE pagamentos SET
                mp_payment_id = $2, qr_code = $3, qr_code_base64 = $4,
                ticket_url = $5, atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mp_payment_id)
        .bind(qr_code)
        .bind(qr_code_base64)
        .bind(ticket_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::PagamentoNotFound)?;

        Ok(pagamento)
    }

    pub async fn set_status(&self, id: Uuid, status: StatusPagamento) -> Result<(), AppError> {
        sqlx::query("UPDATE pagamentos SET status = $2, atualizado_em = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Coração da idempotência do webhook: o UNIQUE em mp_payment_id garante
    // que duas entregas do mesmo pagamento aprovado terminem na MESMA linha.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_aprovado(
        &self,
        id: Uuid,
        cpf: &str,
        livro: &str,
        ciclo: &str,
        valor: Decimal,
        mp_payment_id: i64,
    ) -> Result<Pagamento, AppError> {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            INSERT INTO pagamentos (id, cpf, livro, ciclo, valor, mp_payment_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'aprovado')
            ON CONFLICT (id) DO UPDATE
                SET status = 'aprovado',
                    mp_payment_id = EXCLUDED.mp_payment_id,
                    atualizado_em = now()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cpf)
        .bind(livro)
        .bind(ciclo)
        .bind(valor)
        .bind(mp_payment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(pagamento)
    }

    // Caminho legado: cobrança criada pelo sistema antigo, sem linha nossa.
    // O conflito é no mp_payment_id, então entregas repetidas do webhook
    // colapsam na mesma linha em vez de duplicar.
    pub async fn insert_aprovado_legado(
        &self,
        cpf: &str,
        livro: &str,
        ciclo: &str,
        valor: Decimal,
        mp_payment_id: i64,
    ) -> Result<Pagamento, AppError> {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            INSERT INTO pagamentos (cpf, livro, ciclo, valor, mp_payment_id, status)
            VALUES ($1, $2, $3, $4, $5, 'aprovado')
            ON CONFLICT (mp_payment_id) DO UPDATE
                SET status = 'aprovado', atualizado_em = now()
            RETURNING *
            "#,
        )
        .bind(cpf)
        .bind(livro)
        .bind(ciclo)
        .bind(valor)
        .bind(mp_payment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(pagamento)
    }

    pub async fn marcar_aprovado_por_mp_id(&self, mp_payment_id: i64) -> Result<Option<Pagamento>, AppError> {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            UPDATE pagamentos SET status = 'aprovado', atualizado_em = now()
            WHERE mp_payment_id = $1
            RETURNING *
            "#,
        )
        .bind(mp_payment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pagamento)
    }

    // Usado pelo cancelamento de pedido: remove as cobranças da mesma
    // compra (CPF + livro + ciclo), como o sistema antigo fazia por texto.
    pub async fn delete_por_compra<'e, E>(
        &self,
        executor: E,
        cpf: &str,
        livro: &str,
        ciclo: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM pagamentos WHERE cpf = $1 AND livro = $2 AND ciclo = $3",
        )
        .bind(cpf)
        .bind(livro)
        .bind(ciclo)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
