// src/handlers/pausas.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_audited_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ExigeMontagem, ExigeSupervisao, RequireFuncao},
    },
    models::{
        moto::Moto,
        pausa::{
            FiltroPausas, FiltroSolicitacoes, PausaProducao, RespostaSolicitacao,
            ResponderSolicitacaoPayload, SolicitacaoPausa, SolicitacaoPausaDetalhe,
            SolicitarPausaPayload,
        },
    },
};

// POST /api/pausas/solicitacoes
#[utoipa::path(
    post,
    path = "/api/pausas/solicitacoes",
    tag = "Pausas",
    request_body = SolicitarPausaPayload,
    responses(
        (status = 201, description = "Solicitação aguardando supervisor", body = SolicitacaoPausa),
        (status = 404, description = "Moto não encontrada"),
        (status = 409, description = "Moto fora de produção, já pausada ou com pedido pendente")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn solicitar_pausa(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeMontagem>,
    Json(payload): Json<SolicitarPausaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let solicitacao = app_state.pausa_service
        .solicitar(&mut *conn, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(solicitacao)))
}

// GET /api/pausas/solicitacoes
#[utoipa::path(
    get,
    path = "/api/pausas/solicitacoes",
    tag = "Pausas",
    params(FiltroSolicitacoes),
    responses(
        (status = 200, description = "Fila de solicitações", body = Vec<SolicitacaoPausaDetalhe>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn listar_solicitacoes(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Query(filtro): Query<FiltroSolicitacoes>,
) -> Result<impl IntoResponse, ApiError> {
    let solicitacoes = app_state.pausa_service
        .listar_solicitacoes(filtro.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(solicitacoes)))
}

// POST /api/pausas/solicitacoes/{id}/responder
#[utoipa::path(
    post,
    path = "/api/pausas/solicitacoes/{id}/responder",
    tag = "Pausas",
    request_body = ResponderSolicitacaoPayload,
    params(
        ("id" = Uuid, Path, description = "ID da solicitação")
    ),
    responses(
        (status = 200, description = "Solicitação aprovada (com pausa aberta) ou rejeitada", body = RespostaSolicitacao),
        (status = 403, description = "Apenas supervisor"),
        (status = 404, description = "Solicitação não encontrada"),
        (status = 409, description = "Solicitação já respondida")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn responder_solicitacao(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeSupervisao>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResponderSolicitacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let resposta = app_state.pausa_service
        .responder(&mut *conn, user.0.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resposta)))
}

// POST /api/motos/{id}/retomar
#[utoipa::path(
    post,
    path = "/api/motos/{id}/retomar",
    tag = "Pausas",
    params(
        ("id" = Uuid, Path, description = "ID da moto")
    ),
    responses(
        (status = 200, description = "Produção retomada", body = Moto),
        (status = 403, description = "Apenas supervisor"),
        (status = 409, description = "Moto não está pausada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn retomar_producao(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeSupervisao>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let moto = app_state.pausa_service
        .retomar(&mut *conn, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(moto)))
}

// GET /api/pausas
#[utoipa::path(
    get,
    path = "/api/pausas",
    tag = "Pausas",
    params(FiltroPausas),
    responses(
        (status = 200, description = "Histórico de pausas", body = Vec<PausaProducao>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn historico_pausas(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Query(filtro): Query<FiltroPausas>,
) -> Result<impl IntoResponse, ApiError> {
    let pausas = app_state.pausa_service
        .historico(&filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(pausas)))
}
