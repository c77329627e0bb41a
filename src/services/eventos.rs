// src/services/eventos.rs
//
// Ponte banco -> clientes: os triggers fazem pg_notify e este listener
// repassa cada evento para o canal broadcast lido pelo endpoint SSE.

use std::time::Duration;

use sqlx::{postgres::PgListener, PgPool};
use tokio::sync::broadcast;

use crate::models::evento::EventoProducao;

pub const CANAL_EVENTOS: &str = "producao_eventos";
pub const CAPACIDADE_CANAL: usize = 256;

const ESPERA_RECONEXAO: Duration = Duration::from_secs(5);

/// Roda para sempre; cai e volta a escutar depois de uma pausa.
pub async fn escutar_notificacoes(pool: PgPool, sender: broadcast::Sender<EventoProducao>) {
    loop {
        if let Err(e) = escutar(&pool, &sender).await {
            tracing::error!("❌ Listener de eventos caiu: {}. Reconectando em {:?}", e, ESPERA_RECONEXAO);
        }
        tokio::time::sleep(ESPERA_RECONEXAO).await;
    }
}

async fn escutar(
    pool: &PgPool,
    sender: &broadcast::Sender<EventoProducao>,
) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CANAL_EVENTOS).await?;
    tracing::info!("📡 Escutando o canal '{}'", CANAL_EVENTOS);

    loop {
        let notificacao = listener.recv().await?;
        match interpretar(notificacao.payload()) {
            Some(evento) => {
                // Sem clientes conectados o envio falha; não é erro
                let _ = sender.send(evento);
            }
            None => tracing::warn!("Payload de evento ignorado: {}", notificacao.payload()),
        }
    }
}

pub fn interpretar(payload: &str) -> Option<EventoProducao> {
    serde_json::from_str(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretar_payload_valido() {
        let evento = interpretar(
            r#"{"tabela":"solicitacoes_pausa","operacao":"INSERT","id":"0b7e3c52-41f4-4c43-a5d2-2d0f6f1e9a10","status":"pendente","ator":"5a4f8b8e-2f0e-4d55-9a3c-8f1f5c9e7b21"}"#,
        )
        .unwrap();
        assert_eq!(evento.tabela, "solicitacoes_pausa");
        assert_eq!(evento.operacao, "INSERT");
        assert!(evento.ator.is_some());
    }

    #[test]
    fn test_interpretar_payload_invalido() {
        assert!(interpretar("not json").is_none());
        assert!(interpretar(r#"{"tabela":"motos"}"#).is_none());
    }

    #[tokio::test]
    async fn test_evento_chega_aos_assinantes() {
        let (tx, mut rx) = broadcast::channel(CAPACIDADE_CANAL);
        let evento = interpretar(
            r#"{"tabela":"motos","operacao":"UPDATE","id":"6f1c0d2e-6a40-4b8e-9a53-0f5c3b8a1d11","status":"em_producao","ator":null}"#,
        )
        .unwrap();

        tx.send(evento.clone()).unwrap();
        assert_eq!(rx.recv().await.unwrap(), evento);
    }
}
