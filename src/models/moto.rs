// src/models/moto.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// --- Enums ---

// Etapa da moto na linha. Espelha o enum `moto_status` do banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "moto_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MotoStatus {
    AguardandoMontagem,
    EmProducao,
    EmAnalise,
    AvariaMontagem,
    AvariaPintura,
    AvariaEletrica,
    AvariaMecanica,
    Estoque,
}

// Defeito apontado pela inspeção de qualidade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TipoAvaria {
    Montagem,
    Pintura,
    Eletrica,
    Mecanica,
}

impl MotoStatus {
    pub const TODOS: [MotoStatus; 8] = [
        MotoStatus::AguardandoMontagem,
        MotoStatus::EmProducao,
        MotoStatus::EmAnalise,
        MotoStatus::AvariaMontagem,
        MotoStatus::AvariaPintura,
        MotoStatus::AvariaEletrica,
        MotoStatus::AvariaMecanica,
        MotoStatus::Estoque,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MotoStatus::AguardandoMontagem => "aguardando_montagem",
            MotoStatus::EmProducao => "em_producao",
            MotoStatus::EmAnalise => "em_analise",
            MotoStatus::AvariaMontagem => "avaria_montagem",
            MotoStatus::AvariaPintura => "avaria_pintura",
            MotoStatus::AvariaEletrica => "avaria_eletrica",
            MotoStatus::AvariaMecanica => "avaria_mecanica",
            MotoStatus::Estoque => "estoque",
        }
    }

    pub fn is_avaria(&self) -> bool {
        matches!(
            self,
            MotoStatus::AvariaMontagem
                | MotoStatus::AvariaPintura
                | MotoStatus::AvariaEletrica
                | MotoStatus::AvariaMecanica
        )
    }

    /// Fluxo da linha:
    /// aguardando_montagem -> em_producao -> em_analise -> estoque,
    /// com desvios para avaria_* e retorno à análise após o reparo.
    pub fn pode_transicionar_para(&self, destino: MotoStatus) -> bool {
        match (self, destino) {
            (MotoStatus::AguardandoMontagem, MotoStatus::EmProducao) => true,
            (MotoStatus::EmProducao, MotoStatus::EmAnalise) => true,
            (MotoStatus::EmProducao, MotoStatus::AvariaMontagem) => true,
            (MotoStatus::EmAnalise, MotoStatus::Estoque) => true,
            (MotoStatus::EmAnalise, d) if d.is_avaria() => true,
            (origem, MotoStatus::EmAnalise) if origem.is_avaria() => true,
            _ => false,
        }
    }

    /// Garante que a transição é permitida antes de ir ao banco.
    pub fn validar_transicao(&self, destino: MotoStatus) -> Result<(), AppError> {
        if self.pode_transicionar_para(destino) {
            Ok(())
        } else {
            Err(AppError::TransicaoInvalida { de: *self, para: destino })
        }
    }

    /// Resultado da inspeção de qualidade.
    pub fn apos_inspecao(aprovada: bool, avaria: Option<TipoAvaria>) -> Result<MotoStatus, AppError> {
        if aprovada {
            return Ok(MotoStatus::Estoque);
        }
        match avaria {
            Some(tipo) => Ok(tipo.status()),
            None => Err(AppError::AvariaNaoInformada),
        }
    }
}

impl fmt::Display for MotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TipoAvaria {
    pub fn status(&self) -> MotoStatus {
        match self {
            TipoAvaria::Montagem => MotoStatus::AvariaMontagem,
            TipoAvaria::Pintura => MotoStatus::AvariaPintura,
            TipoAvaria::Eletrica => MotoStatus::AvariaEletrica,
            TipoAvaria::Mecanica => MotoStatus::AvariaMecanica,
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Moto {
    pub id: Uuid,
    #[schema(example = "9C2KC2100RR000123")]
    pub chassi: String,
    #[schema(example = "CG 160 Titan")]
    pub modelo: String,
    #[schema(example = 2024)]
    pub ano_modelo: Option<i32>,
    #[schema(example = "Vermelho")]
    pub cor: String,
    pub cor_secundaria: Option<String>,
    pub status: MotoStatus,
    pub em_pausa: bool,
    #[schema(value_type = Option<Vec<ItemChecklist>>)]
    pub checklist: Option<Value>,
    pub observacoes: Option<String>,
    pub escaneado_por: Option<Uuid>,
    pub montador_id: Option<Uuid>,
    pub inspetor_id: Option<Uuid>,
    pub inicio_montagem: Option<DateTime<Utc>>,
    pub fim_montagem: Option<DateTime<Utc>>,
    pub inspecionada_em: Option<DateTime<Utc>>,
    pub entrada_estoque: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Item do checklist de montagem
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemChecklist {
    #[validate(length(min = 1, message = "validacao.obrigatorio"))]
    #[schema(example = "Torque das rodas")]
    pub descricao: String,
    #[schema(example = true)]
    pub conforme: bool,
}

/// Checklist todo conforme leva a moto para análise; qualquer não conformidade
/// a marca como avaria de montagem.
pub fn resultado_checklist(itens: &[ItemChecklist]) -> MotoStatus {
    if itens.iter().all(|i| i.conforme) {
        MotoStatus::EmAnalise
    } else {
        MotoStatus::AvariaMontagem
    }
}

pub fn checklist_json(itens: &[ItemChecklist]) -> Value {
    json!(itens)
}

// --- Payloads ---

// VIN: letras e números, sem I, O e Q
pub fn validar_formato_chassi(chassi: &str) -> Result<(), ValidationError> {
    let valido = chassi
        .chars()
        .all(|c| c.is_ascii_alphanumeric() && !matches!(c.to_ascii_uppercase(), 'I' | 'O' | 'Q'));
    if !valido {
        let mut err = ValidationError::new("chassi");
        err.message = Some("validacao.chassi_formato".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanPayload {
    #[validate(
        length(equal = 17, message = "validacao.chassi_formato"),
        custom(function = "validar_formato_chassi")
    )]
    #[schema(example = "9C2KC2100RR000123")]
    pub chassi: String,

    #[validate(length(min = 1, message = "validacao.obrigatorio"))]
    #[schema(example = "Vermelho")]
    pub cor: String,

    pub cor_secundaria: Option<String>,

    // Sobrescreve o modelo decodificado do VIN
    pub modelo: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConcluirMontagemPayload {
    #[validate(length(min = 1, message = "validacao.checklist_vazio"), nested)]
    pub itens: Vec<ItemChecklist>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspecaoPayload {
    pub aprovada: bool,
    pub tipo_avaria: Option<TipoAvaria>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConcluirReparoPayload {
    #[schema(example = "Chicote substituído")]
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroMotos {
    /// Filtra por etapa
    pub status: Option<MotoStatus>,
    /// Busca em chassi, modelo e cor
    pub busca: Option<String>,
    pub em_pausa: Option<bool>,
    pub limite: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FiltroEstoque {
    pub modelo: Option<String>,
    pub cor: Option<String>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoEstoque {
    pub modelo: String,
    pub cor: String,
    pub quantidade: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(conforme: bool) -> ItemChecklist {
        ItemChecklist { descricao: "Freios".into(), conforme }
    }

    #[test]
    fn test_fluxo_principal() {
        assert!(MotoStatus::AguardandoMontagem.pode_transicionar_para(MotoStatus::EmProducao));
        assert!(MotoStatus::EmProducao.pode_transicionar_para(MotoStatus::EmAnalise));
        assert!(MotoStatus::EmAnalise.pode_transicionar_para(MotoStatus::Estoque));
    }

    #[test]
    fn test_desvios_de_avaria() {
        assert!(MotoStatus::EmProducao.pode_transicionar_para(MotoStatus::AvariaMontagem));
        assert!(MotoStatus::EmAnalise.pode_transicionar_para(MotoStatus::AvariaPintura));
        assert!(MotoStatus::AvariaEletrica.pode_transicionar_para(MotoStatus::EmAnalise));
        assert!(!MotoStatus::AvariaEletrica.pode_transicionar_para(MotoStatus::Estoque));
    }

    #[test]
    fn test_transicoes_proibidas() {
        assert!(!MotoStatus::AguardandoMontagem.pode_transicionar_para(MotoStatus::Estoque));
        assert!(!MotoStatus::Estoque.pode_transicionar_para(MotoStatus::EmProducao));
        assert!(!MotoStatus::EmProducao.pode_transicionar_para(MotoStatus::AvariaPintura));

        let err = MotoStatus::Estoque.validar_transicao(MotoStatus::EmAnalise).unwrap_err();
        assert!(matches!(
            err,
            AppError::TransicaoInvalida { de: MotoStatus::Estoque, para: MotoStatus::EmAnalise }
        ));
    }

    #[test]
    fn test_nenhum_status_transiciona_para_si_mesmo() {
        for status in MotoStatus::TODOS {
            assert!(!status.pode_transicionar_para(status), "{}", status);
        }
    }

    #[test]
    fn test_resultado_checklist() {
        assert_eq!(resultado_checklist(&[item(true), item(true)]), MotoStatus::EmAnalise);
        assert_eq!(resultado_checklist(&[item(true), item(false)]), MotoStatus::AvariaMontagem);
    }

    #[test]
    fn test_apos_inspecao() {
        assert_eq!(MotoStatus::apos_inspecao(true, None).unwrap(), MotoStatus::Estoque);
        // Aprovada ignora o tipo de avaria
        assert_eq!(
            MotoStatus::apos_inspecao(true, Some(TipoAvaria::Pintura)).unwrap(),
            MotoStatus::Estoque
        );
        assert_eq!(
            MotoStatus::apos_inspecao(false, Some(TipoAvaria::Eletrica)).unwrap(),
            MotoStatus::AvariaEletrica
        );
        assert!(matches!(
            MotoStatus::apos_inspecao(false, None),
            Err(AppError::AvariaNaoInformada)
        ));
    }

    #[test]
    fn test_validacao_do_scan() {
        let ok = ScanPayload {
            chassi: "9C2KC2100RR000123".into(),
            cor: "Preto".into(),
            cor_secundaria: None,
            modelo: None,
        };
        assert!(ok.validate().is_ok());

        let curto = ScanPayload { chassi: "9C2KC21".into(), ..ok.clone() };
        assert!(curto.validate().is_err());

        // 'O' não existe em VIN
        let com_letra_o = ScanPayload { chassi: "9C2KC2100RR00O123".into(), ..ok.clone() };
        let erros = com_letra_o.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("chassi"));
    }

    #[test]
    fn test_checklist_vazio_e_invalido() {
        let payload = ConcluirMontagemPayload { itens: vec![], observacoes: None };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_status_serializa_igual_ao_banco() {
        for status in MotoStatus::TODOS {
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status.as_str())
            );
        }
    }
}
