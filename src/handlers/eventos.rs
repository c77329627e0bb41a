// src/handlers/eventos.rs

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast;

use crate::{
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::evento::EventoProducao,
};

// GET /api/eventos
#[utoipa::path(
    get,
    path = "/api/eventos",
    tag = "Eventos",
    responses(
        (status = 200, description = "Stream SSE com as mudanças de motos e solicitações de pausa", body = EventoProducao, content_type = "text/event-stream"),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn stream_eventos(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("Cliente SSE conectado: {}", user.0.matricula);

    let rx = app_state.eventos.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(evento) => {
                    if let Some(json) = corpo_evento(&evento) {
                        return Some((Ok(Event::default().event(&evento.tabela).data(json)), rx));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(perdidos)) => {
                    tracing::warn!("Cliente SSE atrasado, {} eventos perdidos", perdidos);
                    return Some((
                        Ok(Event::default().event("aviso").data("Eventos perdidos; recarregue os dados")),
                        rx,
                    ));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

// Frame sem corpo não vai para o cliente
fn corpo_evento(evento: &EventoProducao) -> Option<String> {
    match serde_json::to_string(evento) {
        Ok(json) if !json.is_empty() => Some(json),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Evento {} descartado: {}", evento.id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_corpo_do_evento_leva_o_json_completo() {
        let evento = EventoProducao {
            tabela: "motos".into(),
            operacao: "UPDATE".into(),
            id: Uuid::new_v4(),
            status: Some("em_analise".into()),
            ator: None,
        };

        let json = corpo_evento(&evento).expect("corpo do evento");
        let valor: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(valor["tabela"], "motos");
        assert_eq!(valor["status"], "em_analise");
        assert_eq!(valor["id"], evento.id.to_string());
    }
}
