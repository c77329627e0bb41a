// src/handlers/logs.rs

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
    models::log::{FiltroLogs, LogSistema},
};

// GET /api/logs
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    params(FiltroLogs),
    responses(
        (status = 200, description = "Trilha de auditoria, mais recentes primeiro", body = Vec<LogSistema>),
        (status = 403, description = "Apenas supervisor")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn listar_logs(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeSupervisao>,
    Query(filtro): Query<FiltroLogs>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = app_state.log_repo
        .listar(&filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(logs)))
}
