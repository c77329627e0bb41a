// src/services/relatorio_service.rs

use crate::{
    common::error::AppError,
    db::RelatorioRepository,
    models::relatorio::{
        completar_contagens, DesempenhoMontador, PeriodoRelatorio, ProducaoDiaria, ResumoPausas,
        ResumoProducao,
    },
};

#[derive(Clone)]
pub struct RelatorioService {
    repo: RelatorioRepository,
}

impl RelatorioService {
    pub fn new(repo: RelatorioRepository) -> Self {
        Self { repo }
    }

    // Consultas independentes em paralelo
    pub async fn resumo(&self) -> Result<ResumoProducao, AppError> {
        let (contagens, em_pausa, solicitacoes_pendentes) = tokio::try_join!(
            self.repo.contagem_por_status(),
            self.repo.contar_em_pausa(),
            self.repo.contar_solicitacoes_pendentes(),
        )?;

        let por_status = completar_contagens(contagens);
        let total = por_status.iter().map(|c| c.quantidade).sum();

        Ok(ResumoProducao { por_status, total, em_pausa, solicitacoes_pendentes })
    }

    pub async fn producao_diaria(&self, periodo: &PeriodoRelatorio) -> Result<Vec<ProducaoDiaria>, AppError> {
        self.repo.producao_diaria(periodo.dias_efetivos()).await
    }

    pub async fn desempenho_montadores(&self) -> Result<Vec<DesempenhoMontador>, AppError> {
        self.repo.desempenho_montadores().await
    }

    pub async fn resumo_pausas(&self) -> Result<Vec<ResumoPausas>, AppError> {
        self.repo.resumo_pausas().await
    }
}
