// src/models/evento.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Payload publicado pelos triggers via pg_notify('producao_eventos', ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventoProducao {
    #[schema(example = "motos")]
    pub tabela: String,
    #[schema(example = "UPDATE")]
    pub operacao: String,
    pub id: Uuid,
    #[schema(example = "em_analise")]
    pub status: Option<String>,
    pub ator: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_payload_do_trigger() {
        let payload = r#"{"tabela":"motos","operacao":"UPDATE","id":"6f1c0d2e-6a40-4b8e-9a53-0f5c3b8a1d11","status":"estoque","ator":null}"#;
        let evento: EventoProducao = serde_json::from_str(payload).unwrap();
        assert_eq!(evento.tabela, "motos");
        assert_eq!(evento.status.as_deref(), Some("estoque"));
        assert!(evento.ator.is_none());
    }
}
