// src/handlers/estoque.rs

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
        rbac::{ExigeEstoque, RequireFuncao},
    },
    models::moto::{FiltroEstoque, Moto, ResumoEstoque},
};

// GET /api/estoque
#[utoipa::path(
    get,
    path = "/api/estoque",
    tag = "Estoque",
    params(FiltroEstoque),
    responses(
        (status = 200, description = "Motos aprovadas em estoque", body = Vec<Moto>),
        (status = 403, description = "Sem acesso ao estoque")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn listar_estoque(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeEstoque>,
    Query(filtro): Query<FiltroEstoque>,
) -> Result<impl IntoResponse, ApiError> {
    let motos = app_state.moto_service
        .listar_estoque(&filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(motos)))
}

// GET /api/estoque/resumo
#[utoipa::path(
    get,
    path = "/api/estoque/resumo",
    tag = "Estoque",
    responses(
        (status = 200, description = "Quantidade por modelo e cor", body = Vec<ResumoEstoque>),
        (status = 403, description = "Sem acesso ao estoque")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn resumo_estoque(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeEstoque>,
) -> Result<impl IntoResponse, ApiError> {
    let resumo = app_state.moto_service
        .resumo_estoque()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resumo)))
}
