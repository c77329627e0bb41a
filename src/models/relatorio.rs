// src/models/relatorio.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::moto::MotoStatus;

// 1. Quadro geral da linha
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoProducao {
    pub por_status: Vec<ContagemStatus>,
    pub total: i64,
    pub em_pausa: i64,
    pub solicitacoes_pendentes: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContagemStatus {
    pub status: MotoStatus,
    pub quantidade: i64,
}

// 2. Produção por dia
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProducaoDiaria {
    pub dia: NaiveDate,
    pub escaneadas: i64,
    pub montadas: i64,
    pub aprovadas: i64,
}

// 3. Desempenho por montador
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesempenhoMontador {
    pub funcionario_id: Uuid,
    pub nome: String,
    pub motos_montadas: i64,
    pub tempo_medio_minutos: Option<f64>,
}

// 4. Pausas por motivo
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoPausas {
    pub motivo: String,
    pub quantidade: i64,
    pub minutos_pausados: f64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PeriodoRelatorio {
    /// Quantidade de dias para trás (padrão 30, teto 365)
    pub dias: Option<i32>,
}

impl PeriodoRelatorio {
    pub fn dias_efetivos(&self) -> i32 {
        self.dias.unwrap_or(30).clamp(1, 365)
    }
}

/// Completa os status sem nenhuma moto com zero, na ordem do fluxo.
pub fn completar_contagens(mut contagens: Vec<ContagemStatus>) -> Vec<ContagemStatus> {
    for status in MotoStatus::TODOS {
        if !contagens.iter().any(|c| c.status == status) {
            contagens.push(ContagemStatus { status, quantidade: 0 });
        }
    }
    contagens.sort_by_key(|c| MotoStatus::TODOS.iter().position(|s| *s == c.status));
    contagens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completar_contagens() {
        let contagens = completar_contagens(vec![
            ContagemStatus { status: MotoStatus::Estoque, quantidade: 4 },
            ContagemStatus { status: MotoStatus::EmProducao, quantidade: 2 },
        ]);

        assert_eq!(contagens.len(), MotoStatus::TODOS.len());
        assert_eq!(contagens[0].status, MotoStatus::AguardandoMontagem);
        assert_eq!(contagens[0].quantidade, 0);
        assert_eq!(contagens[1].quantidade, 2);
        assert_eq!(contagens.last().unwrap().status, MotoStatus::Estoque);
        assert_eq!(contagens.last().unwrap().quantidade, 4);
    }

    #[test]
    fn test_dias_efetivos() {
        assert_eq!(PeriodoRelatorio::default().dias_efetivos(), 30);
        assert_eq!(PeriodoRelatorio { dias: Some(9999) }.dias_efetivos(), 365);
        assert_eq!(PeriodoRelatorio { dias: Some(-3) }.dias_efetivos(), 1);
    }
}
