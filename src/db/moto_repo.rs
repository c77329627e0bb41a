// src/db/moto_repo.rs
//
// Todas as mudanças de etapa são UPDATEs filtrados pelo status de origem:
// se nenhuma linha voltar, a moto não estava mais na etapa esperada.

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{unique_violation_or, AppError},
    models::moto::{FiltroEstoque, FiltroMotos, Moto, MotoStatus, ResumoEstoque},
};

const LIMITE_PADRAO: i64 = 200;

#[derive(Clone)]
pub struct MotoRepository {
    pool: PgPool,
}

impl MotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Moto>, AppError> {
        let moto = sqlx::query_as::<_, Moto>("SELECT * FROM motos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(moto)
    }

    // Trava a linha até o fim da transação
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Moto>("SELECT * FROM motos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::MotoNaoEncontrada)
    }

    pub async fn find_by_chassi(&self, chassi: &str) -> Result<Option<Moto>, AppError> {
        let moto = sqlx::query_as::<_, Moto>("SELECT * FROM motos WHERE chassi = $1")
            .bind(chassi)
            .fetch_optional(&self.pool)
            .await?;
        Ok(moto)
    }

    pub async fn listar(&self, filtro: &FiltroMotos) -> Result<Vec<Moto>, AppError> {
        let motos = sqlx::query_as::<_, Moto>(
            r#"
            SELECT * FROM motos
            WHERE ($1::moto_status IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR chassi ILIKE '%' || $2 || '%'
                   OR modelo ILIKE '%' || $2 || '%'
                   OR cor ILIKE '%' || $2 || '%')
              AND ($3::boolean IS NULL OR em_pausa = $3)
            ORDER BY updated_at DESC
            LIMIT $4
            "#,
        )
            .bind(filtro.status)
            .bind(filtro.busca.as_deref())
            .bind(filtro.em_pausa)
            .bind(filtro.limite.unwrap_or(LIMITE_PADRAO).clamp(1, 1000))
            .fetch_all(&self.pool)
            .await?;

        Ok(motos)
    }

    pub async fn listar_estoque(&self, filtro: &FiltroEstoque) -> Result<Vec<Moto>, AppError> {
        let motos = sqlx::query_as::<_, Moto>(
            r#"
            SELECT * FROM motos
            WHERE status = 'estoque'
              AND ($1::text IS NULL OR modelo = $1)
              AND ($2::text IS NULL OR cor ILIKE $2)
            ORDER BY entrada_estoque DESC NULLS LAST
            "#,
        )
            .bind(filtro.modelo.as_deref())
            .bind(filtro.cor.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(motos)
    }

    pub async fn resumo_estoque(&self) -> Result<Vec<ResumoEstoque>, AppError> {
        let resumo = sqlx::query_as::<_, ResumoEstoque>(
            r#"
            SELECT modelo, cor, COUNT(*) AS quantidade
            FROM motos
            WHERE status = 'estoque'
            GROUP BY modelo, cor
            ORDER BY modelo, cor
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(resumo)
    }

    // =========================================================================
    //  ESCRITAS
    // =========================================================================

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        chassi: &str,
        modelo: &str,
        ano_modelo: Option<i32>,
        cor: &str,
        cor_secundaria: Option<&str>,
        escaneado_por: Uuid,
    ) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Moto>(
            r#"
            INSERT INTO motos (chassi, modelo, ano_modelo, cor, cor_secundaria, escaneado_por)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(chassi)
            .bind(modelo)
            .bind(ano_modelo)
            .bind(cor)
            .bind(cor_secundaria)
            .bind(escaneado_por)
            .fetch_one(executor)
            .await
            .map_err(|e| unique_violation_or(e, || AppError::ChassiJaCadastrado(chassi.to_string())))
    }

    pub async fn iniciar_montagem<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        montador_id: Uuid,
    ) -> Result<Option<Moto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let moto = sqlx::query_as::<_, Moto>(
            r#"
            UPDATE motos
            SET status = 'em_producao',
                montador_id = $2,
                inicio_montagem = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'aguardando_montagem' AND em_pausa = false
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(montador_id)
            .fetch_optional(executor)
            .await?;

        Ok(moto)
    }

    pub async fn concluir_montagem<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        novo_status: MotoStatus,
        checklist: Value,
        observacoes: Option<&str>,
    ) -> Result<Option<Moto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let moto = sqlx::query_as::<_, Moto>(
            r#"
            UPDATE motos
            SET status = $2,
                checklist = $3,
                observacoes = COALESCE($4, observacoes),
                fim_montagem = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'em_producao' AND em_pausa = false
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(novo_status)
            .bind(checklist)
            .bind(observacoes)
            .fetch_optional(executor)
            .await?;

        Ok(moto)
    }

    pub async fn registrar_inspecao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        inspetor_id: Uuid,
        novo_status: MotoStatus,
        observacoes: Option<&str>,
    ) -> Result<Option<Moto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let moto = sqlx::query_as::<_, Moto>(
            r#"
            UPDATE motos
            SET status = $3,
                inspetor_id = $2,
                inspecionada_em = NOW(),
                entrada_estoque = CASE WHEN $3 = 'estoque'::moto_status THEN NOW() ELSE NULL END,
                observacoes = COALESCE($4, observacoes),
                updated_at = NOW()
            WHERE id = $1 AND status = 'em_analise' AND em_pausa = false
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(inspetor_id)
            .bind(novo_status)
            .bind(observacoes)
            .fetch_optional(executor)
            .await?;

        Ok(moto)
    }

    // avaria_* -> em_analise
    pub async fn concluir_reparo<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status_atual: MotoStatus,
        observacoes: Option<&str>,
    ) -> Result<Option<Moto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let moto = sqlx::query_as::<_, Moto>(
            r#"
            UPDATE motos
            SET status = 'em_analise',
                observacoes = COALESCE($3, observacoes),
                updated_at = NOW()
            WHERE id = $1 AND status = $2 AND em_pausa = false
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(status_atual)
            .bind(observacoes)
            .fetch_optional(executor)
            .await?;

        Ok(moto)
    }

    pub async fn marcar_pausa<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        em_pausa: bool,
    ) -> Result<Option<Moto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let moto = sqlx::query_as::<_, Moto>(
            r#"
            UPDATE motos
            SET em_pausa = $2, updated_at = NOW()
            WHERE id = $1 AND em_pausa = NOT $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(em_pausa)
            .fetch_optional(executor)
            .await?;

        Ok(moto)
    }
}
