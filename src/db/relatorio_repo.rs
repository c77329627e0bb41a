// src/db/relatorio_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::relatorio::{ContagemStatus, DesempenhoMontador, ProducaoDiaria, ResumoPausas},
};

#[derive(Clone)]
pub struct RelatorioRepository {
    pool: PgPool,
}

impl RelatorioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Motos por etapa (só as etapas com alguma moto)
    pub async fn contagem_por_status(&self) -> Result<Vec<ContagemStatus>, AppError> {
        let contagens = sqlx::query_as::<_, ContagemStatus>(
            "SELECT status, COUNT(*) AS quantidade FROM motos GROUP BY status",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(contagens)
    }

    pub async fn contar_em_pausa(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM motos WHERE em_pausa = true")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn contar_solicitacoes_pendentes(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM solicitacoes_pausa WHERE status = 'pendente'",
        )
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    // 2. Série diária (dias sem produção aparecem zerados)
    pub async fn producao_diaria(&self, dias: i32) -> Result<Vec<ProducaoDiaria>, AppError> {
        let serie = sqlx::query_as::<_, ProducaoDiaria>(
            r#"
            SELECT
                d::date AS dia,
                (SELECT COUNT(*) FROM motos WHERE created_at::date = d::date) AS escaneadas,
                (SELECT COUNT(*) FROM motos WHERE fim_montagem::date = d::date) AS montadas,
                (SELECT COUNT(*) FROM motos WHERE entrada_estoque::date = d::date) AS aprovadas
            FROM generate_series(CURRENT_DATE - ($1::int - 1), CURRENT_DATE, INTERVAL '1 day') AS d
            ORDER BY dia ASC
            "#,
        )
            .bind(dias)
            .fetch_all(&self.pool)
            .await?;
        Ok(serie)
    }

    // 3. Ranking de montadores
    pub async fn desempenho_montadores(&self) -> Result<Vec<DesempenhoMontador>, AppError> {
        let ranking = sqlx::query_as::<_, DesempenhoMontador>(
            r#"
            SELECT
                f.id AS funcionario_id,
                f.nome,
                COUNT(m.id) AS motos_montadas,
                AVG(EXTRACT(EPOCH FROM (m.fim_montagem - m.inicio_montagem)) / 60.0)::float8
                    AS tempo_medio_minutos
            FROM funcionarios f
            JOIN motos m ON m.montador_id = f.id AND m.fim_montagem IS NOT NULL
            GROUP BY f.id, f.nome
            ORDER BY motos_montadas DESC, f.nome ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(ranking)
    }

    // 4. Pausas por motivo (pausas abertas contam até agora)
    pub async fn resumo_pausas(&self) -> Result<Vec<ResumoPausas>, AppError> {
        let resumo = sqlx::query_as::<_, ResumoPausas>(
            r#"
            SELECT
                motivo,
                COUNT(*) AS quantidade,
                COALESCE(SUM(EXTRACT(EPOCH FROM (COALESCE(fim, NOW()) - inicio)) / 60.0), 0)::float8
                    AS minutos_pausados
            FROM pausas_producao
            GROUP BY motivo
            ORDER BY minutos_pausados DESC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(resumo)
    }
}
