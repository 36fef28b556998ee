// src/db/matricula_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::matricula::Matricula};

#[derive(Clone)]
pub struct MatriculaRepository {
    pool: PgPool,
}

impl MatriculaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Matricula>, AppError> {
        let matriculas = sqlx::query_as::<_, Matricula>(
            "SELECT * FROM matriculas ORDER BY criado_em DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(matriculas)
    }

    // Inserção feita dentro da transação de finalização de matrícula.
    // UNIQUE (cpf, ciclo) transforma a dupla matrícula em erro de domínio.
    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        codigo: &str,
        aluno_id: Uuid,
        nome: &str,
        cpf: &str,
        ciclo: &str,
        subnucleo: Option<&str>,
        data_matricula: NaiveDate,
        observacao: Option<&str>,
    ) -> Result<Matricula, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let matricula = sqlx::query_as::<_, Matricula>(
            r#"
            INSERT INTO matriculas (
                codigo, aluno_id, nome, cpf, ciclo, subnucleo,
                data_matricula, observacao
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(codigo)
        .bind(aluno_id)
        .bind(nome)
        .bind(cpf)
        .bind(ciclo)
        .bind(subnucleo)
        .bind(data_matricula)
        .bind(observacao)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::MatriculaDuplicada;
                }
            }
            e.into()
        })?;

        Ok(matricula)
    }
}
