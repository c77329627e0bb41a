// src/handlers/relatorios.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{ExigeSupervisao, RequireFuncao},
    },
    models::relatorio::{
        DesempenhoMontador, PeriodoRelatorio, ProducaoDiaria, ResumoPausas, ResumoProducao,
    },
};

// GET /api/relatorios/resumo
#[utoipa::path(
    get,
    path = "/api/relatorios/resumo",
    tag = "Relatorios",
    responses(
        (status = 200, description = "Motos por etapa, pausadas e pedidos pendentes", body = ResumoProducao),
        (status = 403, description = "Apenas supervisor")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_resumo(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeSupervisao>,
) -> Result<impl IntoResponse, ApiError> {
    let resumo = app_state.relatorio_service
        .resumo()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resumo)))
}

// GET /api/relatorios/producao-diaria
#[utoipa::path(
    get,
    path = "/api/relatorios/producao-diaria",
    tag = "Relatorios",
    params(PeriodoRelatorio),
    responses(
        (status = 200, description = "Escaneadas, montadas e aprovadas por dia", body = Vec<ProducaoDiaria>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_producao_diaria(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeSupervisao>,
    Query(periodo): Query<PeriodoRelatorio>,
) -> Result<impl IntoResponse, ApiError> {
    let serie = app_state.relatorio_service
        .producao_diaria(&periodo)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(serie)))
}

// GET /api/relatorios/montadores
#[utoipa::path(
    get,
    path = "/api/relatorios/montadores",
    tag = "Relatorios",
    responses(
        (status = 200, description = "Motos montadas e tempo médio por montador", body = Vec<DesempenhoMontador>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_desempenho_montadores(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeSupervisao>,
) -> Result<impl IntoResponse, ApiError> {
    let ranking = app_state.relatorio_service
        .desempenho_montadores()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ranking)))
}

// GET /api/relatorios/pausas
#[utoipa::path(
    get,
    path = "/api/relatorios/pausas",
    tag = "Relatorios",
    responses(
        (status = 200, description = "Pausas por motivo", body = Vec<ResumoPausas>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_resumo_pausas(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeSupervisao>,
) -> Result<impl IntoResponse, ApiError> {
    let resumo = app_state.relatorio_service
        .resumo_pausas()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resumo)))
}
