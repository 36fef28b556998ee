// src/db/usuario_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Usuario};

// Repositório de usuários da secretaria (tabela 'usuarios').
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    pub async fn list_all(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios ORDER BY criado_em",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(usuarios)
    }

    // Cria um novo usuário. A unicidade de username/e-mail é do banco;
    // a violação vira um erro de domínio aqui.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        nome_completo: &str,
        senha_hash: &str,
    ) -> Result<Usuario, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (username, email, nome_completo, senha_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(nome_completo)
        .bind(senha_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UserAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(usuario)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    // Devolve quantas linhas foram removidas (0 quando o id não existe).
    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
