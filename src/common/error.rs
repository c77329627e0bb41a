use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::moto::MotoStatus,
};

// Erro de domínio. Os handlers convertem para ApiError (traduzido) com `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Funcionário não encontrado")]
    FuncionarioNaoEncontrado,

    #[error("Funcionário inativo")]
    FuncionarioInativo,

    #[error("Acesso negado (exige: {0})")]
    AcessoNegado(String),

    #[error("Operação deixaria o sistema sem admin ativo")]
    UltimoAdmin,

    #[error("Matrícula já existe: {0}")]
    MatriculaJaExiste(String),

    #[error("Chassi já cadastrado: {0}")]
    ChassiJaCadastrado(String),

    #[error("Chassi inválido: {0}")]
    ChassiInvalido(String),

    #[error("Moto não encontrada")]
    MotoNaoEncontrada,

    #[error("Transição inválida: {de} -> {para}")]
    TransicaoInvalida { de: MotoStatus, para: MotoStatus },

    #[error("Moto pausada")]
    MotoPausada,

    #[error("Moto não está pausada")]
    MotoNaoPausada,

    #[error("Moto fora da etapa de produção")]
    MotoForaDeProducao,

    #[error("Solicitação de pausa não encontrada")]
    SolicitacaoNaoEncontrada,

    #[error("Solicitação de pausa já respondida")]
    SolicitacaoJaRespondida,

    #[error("Já existe solicitação de pausa pendente")]
    SolicitacaoPendenteExistente,

    #[error("Tipo de avaria não informado")]
    AvariaNaoInformada,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro pronto para ir ao cliente: status HTTP + mensagem no idioma do pedido.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::ChassiInvalido(_)
            | AppError::AvariaNaoInformada => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::FuncionarioInativo | AppError::AcessoNegado(_) => StatusCode::FORBIDDEN,
            AppError::FuncionarioNaoEncontrado
            | AppError::MotoNaoEncontrada
            | AppError::SolicitacaoNaoEncontrada => StatusCode::NOT_FOUND,
            AppError::MatriculaJaExiste(_)
            | AppError::UltimoAdmin
            | AppError::ChassiJaCadastrado(_)
            | AppError::TransicaoInvalida { .. }
            | AppError::MotoPausada
            | AppError::MotoNaoPausada
            | AppError::MotoForaDeProducao
            | AppError::SolicitacaoJaRespondida
            | AppError::SolicitacaoPendenteExistente => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let idioma = locale.0.as_str();
        let status = self.status();

        let (chave, params): (&str, Vec<(&str, String)>) = match &self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (campo, erros_campo) in errors.field_errors() {
                    let mensagens: Vec<Value> = erros_campo
                        .iter()
                        .map(|e| {
                            let chave = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            Value::String(store.traduzir(idioma, &chave, &[]))
                        })
                        .collect();
                    details.insert(campo.to_string(), Value::Array(mensagens));
                }
                return ApiError {
                    status,
                    error: store.traduzir(idioma, "erros.validacao", &[]),
                    details: Some(Value::Object(details)),
                };
            }
            AppError::InvalidCredentials => ("erros.credenciais_invalidas", vec![]),
            AppError::InvalidToken => ("erros.token_invalido", vec![]),
            AppError::FuncionarioNaoEncontrado => ("erros.funcionario_nao_encontrado", vec![]),
            AppError::FuncionarioInativo => ("erros.funcionario_inativo", vec![]),
            AppError::AcessoNegado(funcoes) => {
                ("erros.acesso_negado", vec![("funcoes", funcoes.clone())])
            }
            AppError::UltimoAdmin => ("erros.ultimo_admin", vec![]),
            AppError::MatriculaJaExiste(matricula) => {
                ("erros.matricula_existente", vec![("matricula", matricula.clone())])
            }
            AppError::ChassiJaCadastrado(chassi) => {
                ("erros.chassi_existente", vec![("chassi", chassi.clone())])
            }
            AppError::ChassiInvalido(chassi) => {
                ("erros.chassi_invalido", vec![("chassi", chassi.clone())])
            }
            AppError::MotoNaoEncontrada => ("erros.moto_nao_encontrada", vec![]),
            AppError::TransicaoInvalida { de, para } => (
                "erros.transicao_invalida",
                vec![("de", de.to_string()), ("para", para.to_string())],
            ),
            AppError::MotoPausada => ("erros.moto_pausada", vec![]),
            AppError::MotoNaoPausada => ("erros.moto_nao_pausada", vec![]),
            AppError::MotoForaDeProducao => ("erros.moto_fora_producao", vec![]),
            AppError::SolicitacaoNaoEncontrada => ("erros.solicitacao_nao_encontrada", vec![]),
            AppError::SolicitacaoJaRespondida => ("erros.solicitacao_respondida", vec![]),
            AppError::SolicitacaoPendenteExistente => ("erros.solicitacao_pendente", vec![]),
            AppError::AvariaNaoInformada => ("erros.avaria_nao_informada", vec![]),

            // O cliente recebe uma mensagem genérica; o detalhe fica no log.
            e @ (AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_)) => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ("erros.interno", vec![])
            }
        };

        let params: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();

        ApiError {
            status,
            error: store.traduzir(idioma, chave, &params),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Mapeia violação de unicidade para um erro de domínio; o resto vira DatabaseError.
pub(crate) fn unique_violation_or(e: sqlx::Error, conflito: impl FnOnce() -> AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return conflito();
        }
    }
    AppError::DatabaseError(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn store() -> I18nStore {
        I18nStore::carregar().unwrap()
    }

    #[test]
    fn test_status_http_por_variante() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AcessoNegado("admin".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::MotoNaoEncontrada.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ChassiJaCadastrado("9C2KC2100RR000001".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::AvariaNaoInformada.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UltimoAdmin.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_mensagem_traduzida_com_parametros() {
        let api = AppError::TransicaoInvalida {
            de: MotoStatus::Estoque,
            para: MotoStatus::EmProducao,
        }
        .to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(
            api.error,
            "The motorcycle is in 'estoque' and cannot move to 'em_producao'."
        );
        assert!(api.details.is_none());
    }

    #[test]
    fn test_erro_interno_nao_vaza_detalhes() {
        let api = AppError::InternalServerError(anyhow::anyhow!("senha do banco: xyz"))
            .to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
    }

    #[test]
    fn test_validacao_traz_detalhes_por_campo() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("validacao.tamanho_senha".into());
        errors.add("senha", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Um ou mais campos são inválidos.");
        let details = api.details.unwrap();
        assert_eq!(
            details["senha"][0],
            "A senha deve ter no mínimo 6 caracteres."
        );
    }
}
