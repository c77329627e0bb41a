// src/services/pausa_service.rs
//
// Solicitação -> aprovação/rejeição -> retomada.
// A aprovação marca a moto, abre o histórico e responde o pedido na mesma transação.

use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LogRepository, MotoRepository, PausaRepository},
    models::{
        log::AcaoLog,
        moto::{Moto, MotoStatus},
        pausa::{
            FiltroPausas, PausaProducao, RespostaSolicitacao, ResponderSolicitacaoPayload,
            SolicitacaoPausa, SolicitacaoPausaDetalhe, SolicitarPausaPayload, StatusSolicitacao,
        },
    },
};

#[derive(Clone)]
pub struct PausaService {
    repo: PausaRepository,
    moto_repo: MotoRepository,
    log_repo: LogRepository,
}

impl PausaService {
    pub fn new(repo: PausaRepository, moto_repo: MotoRepository, log_repo: LogRepository) -> Self {
        Self { repo, moto_repo, log_repo }
    }

    pub async fn solicitar<'e, E>(
        &self,
        executor: E,
        solicitante_id: Uuid,
        payload: &SolicitarPausaPayload,
    ) -> Result<SolicitacaoPausa, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let moto = self.moto_repo.find_for_update(&mut *tx, payload.moto_id).await?;
        verificar_pausavel(&moto)?;

        let solicitacao = self.repo
            .criar_solicitacao(&mut *tx, moto.id, solicitante_id, payload.motivo.trim())
            .await?;

        self.log_repo
            .registrar(
                &mut *tx,
                Some(solicitante_id),
                AcaoLog::PausaSolicitada,
                &format!("motos/{}", moto.chassi),
                json!({ "solicitacaoId": solicitacao.id, "motivo": solicitacao.motivo }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("⏸️ Pausa solicitada para {}: {}", moto.chassi, solicitacao.motivo);
        Ok(solicitacao)
    }

    pub async fn responder<'e, E>(
        &self,
        executor: E,
        supervisor_id: Uuid,
        solicitacao_id: Uuid,
        payload: &ResponderSolicitacaoPayload,
    ) -> Result<RespostaSolicitacao, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let novo_status = StatusSolicitacao::from_resposta(payload.aprovar);
        let resposta = payload.resposta.as_deref().map(str::trim).filter(|r| !r.is_empty());

        let mut tx = executor.begin().await?;

        let pendente = self.repo.find_solicitacao_for_update(&mut *tx, solicitacao_id).await?;
        if pendente.status != StatusSolicitacao::Pendente {
            return Err(AppError::SolicitacaoJaRespondida);
        }

        // 1. Aprovação: moto parada + histórico aberto
        let pausa = if payload.aprovar {
            let moto = self.moto_repo.find_for_update(&mut *tx, pendente.moto_id).await?;
            verificar_pausavel(&moto)?;

            self.moto_repo
                .marcar_pausa(&mut *tx, moto.id, true)
                .await?
                .ok_or(AppError::MotoPausada)?;

            let pausa = self.repo
                .abrir_pausa(&mut *tx, moto.id, pendente.id, &pendente.motivo, supervisor_id)
                .await?;
            Some(pausa)
        } else {
            None
        };

        // 2. Resposta do pedido
        let solicitacao = self.repo
            .responder(&mut *tx, solicitacao_id, novo_status, supervisor_id, resposta)
            .await?
            .ok_or(AppError::SolicitacaoJaRespondida)?;

        let acao = if payload.aprovar { AcaoLog::PausaAprovada } else { AcaoLog::PausaRejeitada };
        self.log_repo
            .registrar(
                &mut *tx,
                Some(supervisor_id),
                acao,
                &format!("solicitacoes_pausa/{}", solicitacao.id),
                json!({ "motoId": solicitacao.moto_id, "resposta": resposta }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("📋 Solicitação {} respondida: {:?}", solicitacao.id, novo_status);
        Ok(RespostaSolicitacao { solicitacao, pausa })
    }

    pub async fn retomar<'e, E>(
        &self,
        executor: E,
        funcionario_id: Uuid,
        moto_id: Uuid,
    ) -> Result<Moto, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let atual = self.moto_repo.find_for_update(&mut *tx, moto_id).await?;
        if !atual.em_pausa {
            return Err(AppError::MotoNaoPausada);
        }

        let moto = self.moto_repo
            .marcar_pausa(&mut *tx, moto_id, false)
            .await?
            .ok_or(AppError::MotoNaoPausada)?;

        // Pausa sem histórico aberto não impede a retomada
        let pausa = self.repo.encerrar_pausa(&mut *tx, moto_id, funcionario_id).await?;
        if pausa.is_none() {
            tracing::warn!("Moto {} estava pausada sem registro aberto", moto.chassi);
        }

        self.log_repo
            .registrar(
                &mut *tx,
                Some(funcionario_id),
                AcaoLog::ProducaoRetomada,
                &format!("motos/{}", moto.chassi),
                detalhes_retomada(pausa.as_ref()),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("▶️ Produção retomada: {}", moto.chassi);
        Ok(moto)
    }

    pub async fn listar_solicitacoes(
        &self,
        status: Option<StatusSolicitacao>,
    ) -> Result<Vec<SolicitacaoPausaDetalhe>, AppError> {
        self.repo.listar_solicitacoes(status).await
    }

    pub async fn historico(&self, filtro: &FiltroPausas) -> Result<Vec<PausaProducao>, AppError> {
        self.repo.listar_pausas(filtro).await
    }
}

// Retomada sem pausa aberta fica marcada na trilha de auditoria
fn detalhes_retomada(pausa: Option<&PausaProducao>) -> serde_json::Value {
    match pausa {
        Some(p) => json!({ "pausaId": p.id, "motivo": p.motivo }),
        None => json!({ "pausaId": null, "semHistorico": true }),
    }
}

/// Só motos em produção, e ainda não paradas, aceitam pausa.
pub fn verificar_pausavel(moto: &Moto) -> Result<(), AppError> {
    if moto.em_pausa {
        return Err(AppError::MotoPausada);
    }
    if moto.status != MotoStatus::EmProducao {
        return Err(AppError::MotoForaDeProducao);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::teste_banco,
        models::{
            funcionario::Funcao,
            moto::{ConcluirMontagemPayload, ItemChecklist},
        },
        services::moto_service::{MotoService, RESPOSTA_SAIU_DE_PRODUCAO},
    };
    use chrono::Utc;
    use sqlx::PgPool;

    fn moto(status: MotoStatus, em_pausa: bool) -> Moto {
        Moto {
            id: Uuid::new_v4(),
            chassi: "9C2ND0910RR000777".into(),
            modelo: "PCX 160".into(),
            ano_modelo: Some(2024),
            cor: "Branco".into(),
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
    fn test_moto_em_producao_pode_pausar() {
        assert!(verificar_pausavel(&moto(MotoStatus::EmProducao, false)).is_ok());
    }

    #[test]
    fn test_moto_ja_pausada_nao_pausa_de_novo() {
        assert!(matches!(
            verificar_pausavel(&moto(MotoStatus::EmProducao, true)),
            Err(AppError::MotoPausada)
        ));
    }

    #[test]
    fn test_so_motos_em_producao_pausam() {
        for status in [MotoStatus::AguardandoMontagem, MotoStatus::EmAnalise, MotoStatus::Estoque] {
            assert!(matches!(
                verificar_pausavel(&moto(status, false)),
                Err(AppError::MotoForaDeProducao)
            ));
        }
    }

    #[test]
    fn test_retomada_sem_historico_fica_marcada() {
        let detalhes = detalhes_retomada(None);
        assert_eq!(detalhes["semHistorico"], true);
        assert!(detalhes["pausaId"].is_null());

        let pausa = PausaProducao {
            id: Uuid::new_v4(),
            moto_id: Uuid::new_v4(),
            solicitacao_id: None,
            motivo: "Falta de peça".into(),
            autorizado_por: Uuid::new_v4(),
            inicio: Utc::now(),
            fim: None,
            retomado_por: None,
        };
        let detalhes = detalhes_retomada(Some(&pausa));
        assert_eq!(detalhes["motivo"], "Falta de peça");
        assert!(detalhes.get("semHistorico").is_none());
    }

    // --- Com banco ---

    fn servicos(pool: &PgPool) -> (PausaService, MotoService) {
        let repo = PausaRepository::new(pool.clone());
        let moto_repo = MotoRepository::new(pool.clone());
        let log_repo = LogRepository::new(pool.clone());
        (
            PausaService::new(repo.clone(), moto_repo.clone(), log_repo.clone()),
            MotoService::new(moto_repo, repo, log_repo),
        )
    }

    fn pedido(moto_id: Uuid) -> SolicitarPausaPayload {
        SolicitarPausaPayload { moto_id, motivo: "Falta de chicote elétrico".into() }
    }

    fn resposta(aprovar: bool) -> ResponderSolicitacaoPayload {
        ResponderSolicitacaoPayload { aprovar, resposta: None }
    }

    #[tokio::test]
    async fn test_uma_solicitacao_pendente_por_moto() {
        let Some(pool) = teste_banco::conectar().await else { return };
        let (pausas, _) = servicos(&pool);
        let montador = teste_banco::funcionario(&pool, Funcao::Montador).await;
        let moto = teste_banco::moto_em_producao(&pool, &montador).await;

        let primeira = pausas.solicitar(&pool, montador.id, &pedido(moto.id)).await.unwrap();
        assert_eq!(primeira.status, StatusSolicitacao::Pendente);

        let repetida = pausas.solicitar(&pool, montador.id, &pedido(moto.id)).await;
        assert!(matches!(repetida, Err(AppError::SolicitacaoPendenteExistente)));
    }

    #[tokio::test]
    async fn test_solicitacao_so_e_respondida_uma_vez() {
        let Some(pool) = teste_banco::conectar().await else { return };
        let (pausas, _) = servicos(&pool);
        let montador = teste_banco::funcionario(&pool, Funcao::Montador).await;
        let supervisor = teste_banco::funcionario(&pool, Funcao::Supervisor).await;
        let moto = teste_banco::moto_em_producao(&pool, &montador).await;

        let solicitacao = pausas.solicitar(&pool, montador.id, &pedido(moto.id)).await.unwrap();

        let rejeitada = pausas
            .responder(&pool, supervisor.id, solicitacao.id, &resposta(false))
            .await
            .unwrap();
        assert_eq!(rejeitada.solicitacao.status, StatusSolicitacao::Rejeitado);
        assert!(rejeitada.pausa.is_none());

        let de_novo = pausas.responder(&pool, supervisor.id, solicitacao.id, &resposta(true)).await;
        assert!(matches!(de_novo, Err(AppError::SolicitacaoJaRespondida)));

        // Rejeitada não deixa a moto parada
        let moto = MotoRepository::new(pool.clone()).find_by_id(moto.id).await.unwrap().unwrap();
        assert!(!moto.em_pausa);
    }

    #[tokio::test]
    async fn test_aprovacao_para_a_moto_e_retomada_fecha_o_historico() {
        let Some(pool) = teste_banco::conectar().await else { return };
        let (pausas, motos) = servicos(&pool);
        let montador = teste_banco::funcionario(&pool, Funcao::Montador).await;
        let supervisor = teste_banco::funcionario(&pool, Funcao::Supervisor).await;
        let moto = teste_banco::moto_em_producao(&pool, &montador).await;

        let solicitacao = pausas.solicitar(&pool, montador.id, &pedido(moto.id)).await.unwrap();
        let aprovada = pausas
            .responder(&pool, supervisor.id, solicitacao.id, &resposta(true))
            .await
            .unwrap();

        assert_eq!(aprovada.solicitacao.status, StatusSolicitacao::Aprovado);
        assert_eq!(aprovada.solicitacao.respondido_por, Some(supervisor.id));
        let pausa = aprovada.pausa.expect("pausa aberta");
        assert_eq!(pausa.solicitacao_id, Some(solicitacao.id));
        assert!(pausa.fim.is_none());

        let parada = motos.buscar(moto.id).await.unwrap();
        assert!(parada.em_pausa);

        // Parada, a moto não avança
        let checklist = ConcluirMontagemPayload {
            itens: vec![ItemChecklist { descricao: "Torque das rodas".into(), conforme: true }],
            observacoes: None,
        };
        let bloqueada = motos.concluir_montagem(&pool, moto.id, montador.id, &checklist).await;
        assert!(matches!(bloqueada, Err(AppError::MotoPausada)));

        let retomada = pausas.retomar(&pool, supervisor.id, moto.id).await.unwrap();
        assert!(!retomada.em_pausa);
        assert_eq!(retomada.status, MotoStatus::EmProducao);

        let abertas = pausas
            .historico(&FiltroPausas { moto_id: Some(moto.id), abertas: true })
            .await
            .unwrap();
        assert!(abertas.is_empty());

        let todas = pausas
            .historico(&FiltroPausas { moto_id: Some(moto.id), abertas: false })
            .await
            .unwrap();
        assert_eq!(todas.len(), 1);
        assert!(todas[0].fim.is_some());
        assert_eq!(todas[0].retomado_por, Some(supervisor.id));

        let de_novo = pausas.retomar(&pool, supervisor.id, moto.id).await;
        assert!(matches!(de_novo, Err(AppError::MotoNaoPausada)));
    }

    #[tokio::test]
    async fn test_pendente_e_encerrada_quando_a_moto_sai_de_producao() {
        let Some(pool) = teste_banco::conectar().await else { return };
        let (pausas, motos) = servicos(&pool);
        let montador = teste_banco::funcionario(&pool, Funcao::Montador).await;
        let supervisor = teste_banco::funcionario(&pool, Funcao::Supervisor).await;
        let moto = teste_banco::moto_em_producao(&pool, &montador).await;

        let solicitacao = pausas.solicitar(&pool, montador.id, &pedido(moto.id)).await.unwrap();

        let checklist = ConcluirMontagemPayload {
            itens: vec![ItemChecklist { descricao: "Chicote conectado".into(), conforme: false }],
            observacoes: None,
        };
        let montada = motos.concluir_montagem(&pool, moto.id, montador.id, &checklist).await.unwrap();
        assert_eq!(montada.status, MotoStatus::AvariaMontagem);

        let encerrada = PausaRepository::new(pool.clone())
            .find_solicitacao_for_update(&pool, solicitacao.id)
            .await
            .unwrap();
        assert_eq!(encerrada.status, StatusSolicitacao::Rejeitado);
        assert_eq!(encerrada.resposta.as_deref(), Some(RESPOSTA_SAIU_DE_PRODUCAO));
        assert_eq!(encerrada.respondido_por, Some(montador.id));

        let tarde = pausas.responder(&pool, supervisor.id, solicitacao.id, &resposta(true)).await;
        assert!(matches!(tarde, Err(AppError::SolicitacaoJaRespondida)));

        let pendentes = pausas.listar_solicitacoes(Some(StatusSolicitacao::Pendente)).await.unwrap();
        assert!(pendentes.iter().all(|s| s.solicitacao.id != solicitacao.id));
    }
}
