// src/models/pausa.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_solicitacao", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusSolicitacao {
    Pendente,
    Aprovado,
    Rejeitado,
}

// Pedido de pausa feito pela linha
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoPausa {
    pub id: Uuid,
    pub moto_id: Uuid,
    pub solicitante_id: Uuid,
    #[schema(example = "Falta de peça: chicote elétrico")]
    pub motivo: String,
    pub status: StatusSolicitacao,
    pub respondido_por: Option<Uuid>,
    pub resposta: Option<String>,
    pub respondido_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Linha da fila de aprovação (com dados da moto e do solicitante)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoPausaDetalhe {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub solicitacao: SolicitacaoPausa,
    pub chassi: String,
    pub modelo: String,
    pub solicitante_nome: String,
}

// Histórico de pausas efetivas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PausaProducao {
    pub id: Uuid,
    pub moto_id: Uuid,
    pub solicitacao_id: Option<Uuid>,
    pub motivo: String,
    pub autorizado_por: Uuid,
    pub inicio: DateTime<Utc>,
    pub fim: Option<DateTime<Utc>>,
    pub retomado_por: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitarPausaPayload {
    pub moto_id: Uuid,
    #[validate(length(min = 3, message = "validacao.obrigatorio"))]
    pub motivo: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponderSolicitacaoPayload {
    pub aprovar: bool,
    #[schema(example = "Liberado até a chegada do lote")]
    pub resposta: Option<String>,
}

// Resultado da resposta: a pausa só existe quando aprovada
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespostaSolicitacao {
    pub solicitacao: SolicitacaoPausa,
    pub pausa: Option<PausaProducao>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroSolicitacoes {
    pub status: Option<StatusSolicitacao>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroPausas {
    pub moto_id: Option<Uuid>,
    /// Somente pausas ainda abertas
    #[serde(default)]
    pub abertas: bool,
}

impl StatusSolicitacao {
    pub fn from_resposta(aprovar: bool) -> Self {
        if aprovar {
            StatusSolicitacao::Aprovado
        } else {
            StatusSolicitacao::Rejeitado
        }
    }
}
