// src/services/moto_service.rs
//
// Fluxo da moto na linha. Cada passo roda numa transação:
// trava a moto, confere pausa + transição, atualiza e grava o log.

use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LogRepository, MotoRepository, PausaRepository},
    models::{
        log::AcaoLog,
        moto::{
            checklist_json, resultado_checklist, validar_formato_chassi, ConcluirMontagemPayload, FiltroEstoque,
            FiltroMotos, InspecaoPayload, Moto, MotoStatus, ResumoEstoque, ScanPayload,
        },
    },
    services::vin_decoder,
};

pub const RESPOSTA_SAIU_DE_PRODUCAO: &str = "Encerrada automaticamente: a moto saiu de produção.";

#[derive(Clone)]
pub struct MotoService {
    repo: MotoRepository,
    pausa_repo: PausaRepository,
    log_repo: LogRepository,
}

impl MotoService {
    pub fn new(repo: MotoRepository, pausa_repo: PausaRepository, log_repo: LogRepository) -> Self {
        Self { repo, pausa_repo, log_repo }
    }

    // --- SCAN (entrada na linha) ---
    pub async fn registrar_scan<'e, E>(
        &self,
        executor: E,
        funcionario_id: Uuid,
        payload: &ScanPayload,
    ) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let chassi = chassi_valido(&payload.chassi)?;
        let decodificado = vin_decoder::decodificar(&chassi);

        // Modelo informado pelo operador tem prioridade sobre o decodificado
        let modelo = payload
            .modelo
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| decodificado.modelo.clone());

        let mut tx = executor.begin().await?;

        let moto = self.repo
            .insert(
                &mut *tx,
                &chassi,
                &modelo,
                decodificado.ano_modelo,
                payload.cor.trim(),
                payload.cor_secundaria.as_deref().map(str::trim).filter(|c| !c.is_empty()),
                funcionario_id,
            )
            .await?;

        self.log_repo
            .registrar(
                &mut *tx,
                Some(funcionario_id),
                AcaoLog::MotoEscaneada,
                &alvo(&moto),
                json!({
                    "modelo": moto.modelo,
                    "origemModelo": decodificado.origem,
                    "cor": moto.cor,
                }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("📦 Moto {} escaneada ({})", moto.chassi, moto.modelo);
        Ok(moto)
    }

    // --- MONTAGEM ---
    pub async fn iniciar_montagem<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        montador_id: Uuid,
    ) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let atual = self.repo.find_for_update(&mut *tx, id).await?;
        verificar_em_linha(&atual, MotoStatus::EmProducao)?;

        let moto = self.repo
            .iniciar_montagem(&mut *tx, id, montador_id)
            .await?
            .ok_or(AppError::TransicaoInvalida { de: atual.status, para: MotoStatus::EmProducao })?;

        self.log_repo
            .registrar(&mut *tx, Some(montador_id), AcaoLog::MontagemIniciada, &alvo(&moto), json!({}))
            .await?;

        tx.commit().await?;

        tracing::info!("🔧 Montagem iniciada: {}", moto.chassi);
        Ok(moto)
    }

    pub async fn concluir_montagem<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        montador_id: Uuid,
        payload: &ConcluirMontagemPayload,
    ) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let destino = resultado_checklist(&payload.itens);

        let mut tx = executor.begin().await?;

        let atual = self.repo.find_for_update(&mut *tx, id).await?;
        verificar_em_linha(&atual, destino)?;

        let moto = self.repo
            .concluir_montagem(
                &mut *tx,
                id,
                destino,
                checklist_json(&payload.itens),
                payload.observacoes.as_deref(),
            )
            .await?
            .ok_or(AppError::TransicaoInvalida { de: atual.status, para: destino })?;

        let pendencias: Vec<&str> = payload
            .itens
            .iter()
            .filter(|i| !i.conforme)
            .map(|i| i.descricao.as_str())
            .collect();

        self.log_repo
            .registrar(
                &mut *tx,
                Some(montador_id),
                AcaoLog::MontagemConcluida,
                &alvo(&moto),
                json!({ "status": destino, "naoConformes": pendencias }),
            )
            .await?;

        // Pedido de pausa pendente não tem mais como ser aprovado
        let encerradas = self.pausa_repo
            .rejeitar_pendentes(&mut *tx, id, montador_id, RESPOSTA_SAIU_DE_PRODUCAO)
            .await?;
        for solicitacao in &encerradas {
            self.log_repo
                .registrar(
                    &mut *tx,
                    Some(montador_id),
                    AcaoLog::PausaRejeitada,
                    &format!("solicitacoes_pausa/{}", solicitacao.id),
                    json!({ "motoId": moto.id, "resposta": RESPOSTA_SAIU_DE_PRODUCAO, "automatica": true }),
                )
                .await?;
        }

        tx.commit().await?;

        if !encerradas.is_empty() {
            tracing::info!("⏹️ {} pedido(s) de pausa encerrado(s) para {}", encerradas.len(), moto.chassi);
        }

        tracing::info!("✅ Montagem concluída: {} -> {}", moto.chassi, destino);
        Ok(moto)
    }

    // --- QUALIDADE ---
    pub async fn inspecionar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        inspetor_id: Uuid,
        payload: &InspecaoPayload,
    ) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let destino = MotoStatus::apos_inspecao(payload.aprovada, payload.tipo_avaria)?;

        let mut tx = executor.begin().await?;

        let atual = self.repo.find_for_update(&mut *tx, id).await?;
        verificar_em_linha(&atual, destino)?;

        let moto = self.repo
            .registrar_inspecao(&mut *tx, id, inspetor_id, destino, payload.observacoes.as_deref())
            .await?
            .ok_or(AppError::TransicaoInvalida { de: atual.status, para: destino })?;

        self.log_repo
            .registrar(
                &mut *tx,
                Some(inspetor_id),
                AcaoLog::InspecaoRealizada,
                &alvo(&moto),
                json!({ "aprovada": payload.aprovada, "status": destino }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🔍 Inspeção de {}: {}", moto.chassi, destino);
        Ok(moto)
    }

    // --- REPARO (avaria_* -> em_analise) ---
    pub async fn concluir_reparo<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        funcionario_id: Uuid,
        observacoes: Option<&str>,
    ) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let atual = self.repo.find_for_update(&mut *tx, id).await?;
        verificar_em_linha(&atual, MotoStatus::EmAnalise)?;

        let moto = self.repo
            .concluir_reparo(&mut *tx, id, atual.status, observacoes)
            .await?
            .ok_or(AppError::TransicaoInvalida { de: atual.status, para: MotoStatus::EmAnalise })?;

        self.log_repo
            .registrar(
                &mut *tx,
                Some(funcionario_id),
                AcaoLog::ReparoConcluido,
                &alvo(&moto),
                json!({ "avaria": atual.status }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🛠️ Reparo concluído: {} ({} -> em_analise)", moto.chassi, atual.status);
        Ok(moto)
    }

    // --- CONSULTAS ---
    pub async fn listar(&self, filtro: &FiltroMotos) -> Result<Vec<Moto>, AppError> {
        self.repo.listar(filtro).await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Moto, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::MotoNaoEncontrada)
    }

    pub async fn buscar_por_chassi(&self, chassi: &str) -> Result<Moto, AppError> {
        self.repo
            .find_by_chassi(&chassi_valido(chassi)?)
            .await?
            .ok_or(AppError::MotoNaoEncontrada)
    }

    pub async fn listar_estoque(&self, filtro: &FiltroEstoque) -> Result<Vec<Moto>, AppError> {
        self.repo.listar_estoque(filtro).await
    }

    pub async fn resumo_estoque(&self) -> Result<Vec<ResumoEstoque>, AppError> {
        self.repo.resumo_estoque().await
    }
}

pub fn normalizar_chassi(chassi: &str) -> String {
    chassi.trim().to_uppercase()
}

/// Chassi normalizado com 17 caracteres, sem I, O e Q.
pub fn chassi_valido(chassi: &str) -> Result<String, AppError> {
    let normalizado = normalizar_chassi(chassi);
    if normalizado.len() != 17 || validar_formato_chassi(&normalizado).is_err() {
        return Err(AppError::ChassiInvalido(normalizado));
    }
    Ok(normalizado)
}

/// Moto pausada não anda; fora isso vale a tabela de transições.
pub fn verificar_em_linha(moto: &Moto, destino: MotoStatus) -> Result<(), AppError> {
    if moto.em_pausa {
        return Err(AppError::MotoPausada);
    }
    moto.status.validar_transicao(destino)
}

fn alvo(moto: &Moto) -> String {
    format!("motos/{}", moto.chassi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn moto(status: MotoStatus, em_pausa: bool) -> Moto {
        Moto {
            id: Uuid::new_v4(),
            chassi: "9C2KC2100RR000123".into(),
            modelo: "CG 160 Titan".into(),
            ano_modelo: Some(2024),
            cor: "Vermelho".into(),
            cor_secundaria: None,
            status,
            em_pausa,
            checklist: None,
            observacoes: None,
            escaneado_por: None,
            montador_id: None,
            inspetor_id: None,
            inicio_montagem: None,
            fim_montagem: None,
            inspecionada_em: None,
            entrada_estoque: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_moto_pausada_recusa_qualquer_transicao() {
        let m = moto(MotoStatus::EmProducao, true);
        assert!(matches!(verificar_em_linha(&m, MotoStatus::EmAnalise), Err(AppError::MotoPausada)));
        assert!(matches!(
            verificar_em_linha(&m, MotoStatus::AvariaMontagem),
            Err(AppError::MotoPausada)
        ));
    }

    #[test]
    fn test_transicao_valida_passa() {
        let m = moto(MotoStatus::AguardandoMontagem, false);
        assert!(verificar_em_linha(&m, MotoStatus::EmProducao).is_ok());

        let m = moto(MotoStatus::AvariaPintura, false);
        assert!(verificar_em_linha(&m, MotoStatus::EmAnalise).is_ok());
    }

    #[test]
    fn test_transicao_fora_do_fluxo_e_recusada() {
        let m = moto(MotoStatus::Estoque, false);
        match verificar_em_linha(&m, MotoStatus::EmAnalise) {
            Err(AppError::TransicaoInvalida { de, para }) => {
                assert_eq!(de, MotoStatus::Estoque);
                assert_eq!(para, MotoStatus::EmAnalise);
            }
            outro => panic!("esperava TransicaoInvalida, veio {:?}", outro),
        }
    }

    #[test]
    fn test_normalizar_chassi() {
        assert_eq!(normalizar_chassi("  9c2kc2100rr000123 "), "9C2KC2100RR000123");
    }

    #[test]
    fn test_chassi_valido() {
        assert_eq!(chassi_valido("9c2kc2100rr000123").unwrap(), "9C2KC2100RR000123");
        assert!(matches!(chassi_valido("9C2KC2100"), Err(AppError::ChassiInvalido(_))));
        // O (letra) no lugar de 0
        assert!(matches!(chassi_valido("9C2KC21OORR000123"), Err(AppError::ChassiInvalido(_))));
    }
}
