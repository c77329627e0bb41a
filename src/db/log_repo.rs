// src/db/log_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::log::{AcaoLog, FiltroLogs, LogSistema},
};

#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Grava na mesma transação da operação auditada
    pub async fn registrar<'e, E>(
        &self,
        executor: E,
        funcionario_id: Option<Uuid>,
        acao: AcaoLog,
        alvo: &str,
        detalhes: Value,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO logs_sistema (funcionario_id, acao, alvo, detalhes)
            VALUES ($1, $2, $3, $4)
            "#,
        )
            .bind(funcionario_id)
            .bind(acao.as_str())
            .bind(alvo)
            .bind(detalhes)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn listar(&self, filtro: &FiltroLogs) -> Result<Vec<LogSistema>, AppError> {
        let logs = sqlx::query_as::<_, LogSistema>(
            r#"
            SELECT * FROM logs_sistema
            WHERE ($1::text IS NULL OR acao = $1)
              AND ($2::uuid IS NULL OR funcionario_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
            .bind(filtro.acao.as_deref())
            .bind(filtro.funcionario_id)
            .bind(filtro.limite_efetivo())
            .fetch_all(&self.pool)
            .await?;

        Ok(logs)
    }
}
