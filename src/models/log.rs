// src/models/log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Ações gravadas na trilha de auditoria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcaoLog {
    Login,
    FuncionarioCriado,
    FuncaoAlterada,
    FuncionarioDesativado,
    MotoEscaneada,
    MontagemIniciada,
    MontagemConcluida,
    InspecaoRealizada,
    ReparoConcluido,
    PausaSolicitada,
    PausaAprovada,
    PausaRejeitada,
    ProducaoRetomada,
}

impl AcaoLog {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcaoLog::Login => "login",
            AcaoLog::FuncionarioCriado => "funcionario_criado",
            AcaoLog::FuncaoAlterada => "funcao_alterada",
            AcaoLog::FuncionarioDesativado => "funcionario_desativado",
            AcaoLog::MotoEscaneada => "moto_escaneada",
            AcaoLog::MontagemIniciada => "montagem_iniciada",
            AcaoLog::MontagemConcluida => "montagem_concluida",
            AcaoLog::InspecaoRealizada => "inspecao_realizada",
            AcaoLog::ReparoConcluido => "reparo_concluido",
            AcaoLog::PausaSolicitada => "pausa_solicitada",
            AcaoLog::PausaAprovada => "pausa_aprovada",
            AcaoLog::PausaRejeitada => "pausa_rejeitada",
            AcaoLog::ProducaoRetomada => "producao_retomada",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogSistema {
    pub id: Uuid,
    pub funcionario_id: Option<Uuid>,
    #[schema(example = "moto_escaneada")]
    pub acao: String,
    #[schema(example = "motos/9C2KC2100RR000123")]
    pub alvo: String,
    pub detalhes: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroLogs {
    pub acao: Option<String>,
    pub funcionario_id: Option<Uuid>,
    /// Máximo de registros (padrão 100, teto 500)
    pub limite: Option<i64>,
}

impl FiltroLogs {
    pub fn limite_efetivo(&self) -> i64 {
        self.limite.unwrap_or(100).clamp(1, 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limite_efetivo() {
        assert_eq!(FiltroLogs::default().limite_efetivo(), 100);
        assert_eq!(FiltroLogs { limite: Some(0), ..Default::default() }.limite_efetivo(), 1);
        assert_eq!(FiltroLogs { limite: Some(10_000), ..Default::default() }.limite_efetivo(), 500);
    }
}
