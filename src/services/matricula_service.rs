// src/services/matricula_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{AlunoRepository, MatriculaRepository},
    models::matricula::{FinalizarMatriculaPayload, Matricula},
};

#[derive(Clone)]
pub struct MatriculaService {
    aluno_repo: AlunoRepository,
    matricula_repo: MatriculaRepository,
    pool: PgPool,
}

impl MatriculaService {
    pub fn new(aluno_repo: AlunoRepository, matricula_repo: MatriculaRepository, pool: PgPool) -> Self {
        Self { aluno_repo, matricula_repo, pool }
    }

    /// Finaliza a matrícula de um aluno: muda o status da ficha para
    /// "Matriculado" e grava o registro de matrícula. No sistema antigo
    /// eram duas escritas soltas em planilhas diferentes, e uma queda no
    /// meio deixava estado inconsistente; aqui é uma transação só.
    pub async fn finalizar(&self, cpf: &str, payload: &FinalizarMatriculaPayload) -> Result<Matricula, AppError> {
        let aluno = self
            .aluno_repo
            .find_by_cpf(cpf)
            .await?
            .ok_or(AppError::AlunoNotFound)?;

        let codigo = gerar_codigo(Utc::now().timestamp_millis());

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        self.aluno_repo
            .set_status(&mut *tx, aluno.id, "Matriculado")
            .await?;

        let matricula = self
            .matricula_repo
            .create(
                &mut *tx,
                &codigo,
                aluno.id,
                &aluno.nome,
                cpf,
                &payload.ciclo,
                payload.subnucleo.as_deref(),
                Utc::now().date_naive(),
                payload.observacao.as_deref(),
            )
            .await?; // Se falhar aqui, a mudança de status sofre rollback.

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("Matrícula {} finalizada para o CPF {}", matricula.codigo, cpf);
        Ok(matricula)
    }
}

// Código de negócio no formato do sistema antigo: MAT-<timestamp em ms>.
fn gerar_codigo(timestamp_ms: i64) -> String {
    format!("MAT-{}", timestamp_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codigo_tem_o_formato_legado() {
        assert_eq!(gerar_codigo(1756406400000), "MAT-1756406400000");
    }
}
