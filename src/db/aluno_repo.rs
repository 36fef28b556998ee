// src/db/aluno_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::aluno::{Aluno, CreateAlunoPayload, UpdateAlunoPayload},
};

// Repositório das fichas de dados pessoais (tabela 'alunos').
// As buscas por CPF, que no sistema antigo eram varreduras lineares na
// planilha, aqui são consultas indexadas.
#[derive(Clone)]
pub struct AlunoRepository {
    pool: PgPool,
}

impl AlunoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Aluno>, AppError> {
        let maybe_aluno = sqlx::query_as::<_, Aluno>(
            "SELECT * FROM alunos WHERE cpf = $1",
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_aluno)
    }

    pub async fn list_all(&self) -> Result<Vec<Aluno>, AppError> {
        let alunos = sqlx::query_as::<_, Aluno>(
            "SELECT * FROM alunos ORDER BY nome",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(alunos)
    }

    // Alunos com ficha de dados pessoais e NENHUMA matrícula: a antiga
    // diferença-de-conjuntos O(n·m) entre duas planilhas vira um anti-join.
    pub async fn list_pendentes(&self) -> Result<Vec<Aluno>, AppError> {
        let alunos = sqlx::query_as::<_, Aluno>(
            r#"
            SELECT a.*
            FROM alunos a
            WHERE NOT EXISTS (
                SELECT 1 FROM matriculas m WHERE m.aluno_id = a.id
            )
            ORDER BY a.nome
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(alunos)
    }

    pub async fn list_matriculados(&self) -> Result<Vec<Aluno>, AppError> {
        let alunos = sqlx::query_as::<_, Aluno>(
            "SELECT * FROM alunos WHERE status = 'Matriculado' ORDER BY nome",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(alunos)
    }

    pub async fn create(&self, cpf: &str, payload: &CreateAlunoPayload) -> Result<Aluno, AppError> {
        let aluno = sqlx::query_as::<_, Aluno>(
            r#"
            INSERT INTO alunos (
                nome, cpf, rg, email, telefone,
                endereco, numero, bairro, cidade, estado, cep,
                origem_academica, funcao_igreja
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&payload.nome)
        .bind(cpf)
        .bind(&payload.rg)
        .bind(&payload.email)
        .bind(&payload.telefone)
        .bind(&payload.endereco)
        .bind(&payload.numero)
        .bind(&payload.bairro)
        .bind(&payload.cidade)
        .bind(&payload.estado)
        .bind(&payload.cep)
        .bind(&payload.origem_academica)
        .bind(&payload.funcao_igreja)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CpfAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(aluno)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateAlunoPayload) -> Result<Option<Aluno>, AppError> {
        let aluno = sqlx::query_as::<_, Aluno>(
            r#"
            UPDATE alunos SET
                nome = $2, rg = $3, email = $4, telefone = $5,
                endereco = $6, numero = $7, bairro = $8, cidade = $9,
                estado = $10, cep = $11, origem_academica = $12,
                funcao_igreja = $13,
                status = COALESCE($14, status),
                atualizado_em = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nome)
        .bind(&payload.rg)
        .bind(&payload.email)
        .bind(&payload.telefone)
        .bind(&payload.endereco)
        .bind(&payload.numero)
        .bind(&payload.bairro)
        .bind(&payload.cidade)
        .bind(&payload.estado)
        .bind(&payload.cep)
        .bind(&payload.origem_academica)
        .bind(&payload.funcao_igreja)
        .bind(&payload.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(aluno)
    }

    // Atualiza só a coluna de status, dentro de uma transação de matrícula.
    pub async fn set_status<'e, E>(&self, executor: E, id: Uuid, status: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE alunos SET status = $2, atualizado_em = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    // As matrículas caem junto pelo ON DELETE CASCADE.
    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM alunos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
