// src/db/pausa_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{unique_violation_or, AppError},
    models::pausa::{
        FiltroPausas, PausaProducao, SolicitacaoPausa, SolicitacaoPausaDetalhe, StatusSolicitacao,
    },
};

#[derive(Clone)]
pub struct PausaRepository {
    pool: PgPool,
}

impl PausaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SOLICITAÇÕES
    // =========================================================================

    // O índice parcial garante uma única pendente por moto
    pub async fn criar_solicitacao<'e, E>(
        &self,
        executor: E,
        moto_id: Uuid,
        solicitante_id: Uuid,
        motivo: &str,
    ) -> Result<SolicitacaoPausa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SolicitacaoPausa>(
            r#"
            INSERT INTO solicitacoes_pausa (moto_id, solicitante_id, motivo)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
            .bind(moto_id)
            .bind(solicitante_id)
            .bind(motivo)
            .fetch_one(executor)
            .await
            .map_err(|e| unique_violation_or(e, || AppError::SolicitacaoPendenteExistente))
    }

    pub async fn find_solicitacao_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<SolicitacaoPausa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SolicitacaoPausa>(
            "SELECT * FROM solicitacoes_pausa WHERE id = $1 FOR UPDATE",
        )
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::SolicitacaoNaoEncontrada)
    }

    // pendente -> aprovado | rejeitado
    pub async fn responder<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: StatusSolicitacao,
        respondido_por: Uuid,
        resposta: Option<&str>,
    ) -> Result<Option<SolicitacaoPausa>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitacao = sqlx::query_as::<_, SolicitacaoPausa>(
            r#"
            UPDATE solicitacoes_pausa
            SET status = $2,
                respondido_por = $3,
                resposta = $4,
                respondido_em = NOW()
            WHERE id = $1 AND status = 'pendente'
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(status)
            .bind(respondido_por)
            .bind(resposta)
            .fetch_optional(executor)
            .await?;

        Ok(solicitacao)
    }

    // Fecha o que ficou pendente quando a moto sai de produção
    pub async fn rejeitar_pendentes<'e, E>(
        &self,
        executor: E,
        moto_id: Uuid,
        respondido_por: Uuid,
        resposta: &str,
    ) -> Result<Vec<SolicitacaoPausa>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitacoes = sqlx::query_as::<_, SolicitacaoPausa>(
            r#"
            UPDATE solicitacoes_pausa
            SET status = 'rejeitado',
                respondido_por = $2,
                resposta = $3,
                respondido_em = NOW()
            WHERE moto_id = $1 AND status = 'pendente'
            RETURNING *
            "#,
        )
            .bind(moto_id)
            .bind(respondido_por)
            .bind(resposta)
            .fetch_all(executor)
            .await?;

        Ok(solicitacoes)
    }

    pub async fn listar_solicitacoes(
        &self,
        status: Option<StatusSolicitacao>,
    ) -> Result<Vec<SolicitacaoPausaDetalhe>, AppError> {
        let solicitacoes = sqlx::query_as::<_, SolicitacaoPausaDetalhe>(
            r#"
            SELECT
                s.*,
                m.chassi,
                m.modelo,
                f.nome AS solicitante_nome
            FROM solicitacoes_pausa s
            JOIN motos m ON m.id = s.moto_id
            JOIN funcionarios f ON f.id = s.solicitante_id
            WHERE ($1::status_solicitacao IS NULL OR s.status = $1)
            ORDER BY s.created_at DESC
            "#,
        )
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(solicitacoes)
    }

    // =========================================================================
    //  HISTÓRICO
    // =========================================================================

    pub async fn abrir_pausa<'e, E>(
        &self,
        executor: E,
        moto_id: Uuid,
        solicitacao_id: Uuid,
        motivo: &str,
        autorizado_por: Uuid,
    ) -> Result<PausaProducao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pausa = sqlx::query_as::<_, PausaProducao>(
            r#"
            INSERT INTO pausas_producao (moto_id, solicitacao_id, motivo, autorizado_por)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(moto_id)
            .bind(solicitacao_id)
            .bind(motivo)
            .bind(autorizado_por)
            .fetch_one(executor)
            .await?;

        Ok(pausa)
    }

    pub async fn encerrar_pausa<'e, E>(
        &self,
        executor: E,
        moto_id: Uuid,
        retomado_por: Uuid,
    ) -> Result<Option<PausaProducao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pausa = sqlx::query_as::<_, PausaProducao>(
            r#"
            UPDATE pausas_producao
            SET fim = NOW(), retomado_por = $2
            WHERE moto_id = $1 AND fim IS NULL
            RETURNING *
            "#,
        )
            .bind(moto_id)
            .bind(retomado_por)
            .fetch_optional(executor)
            .await?;

        Ok(pausa)
    }

    pub async fn listar_pausas(&self, filtro: &FiltroPausas) -> Result<Vec<PausaProducao>, AppError> {
        let pausas = sqlx::query_as::<_, PausaProducao>(
            r#"
            SELECT * FROM pausas_producao
            WHERE ($1::uuid IS NULL OR moto_id = $1)
              AND ($2 = false OR fim IS NULL)
            ORDER BY inicio DESC
            "#,
        )
            .bind(filtro.moto_id)
            .bind(filtro.abertas)
            .fetch_all(&self.pool)
            .await?;

        Ok(pausas)
    }
}
