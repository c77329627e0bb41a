// src/handlers/motos.rs

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
        rbac::{ExigeMontagem, ExigeQualidade, RequireFuncao},
    },
    models::moto::{
        ConcluirMontagemPayload, ConcluirReparoPayload, FiltroMotos, InspecaoPayload, Moto,
        ScanPayload,
    },
};

// ---
// Handler: scan (entrada da moto na linha)
// ---
#[utoipa::path(
    post,
    path = "/api/motos/scan",
    tag = "Motos",
    request_body = ScanPayload,
    responses(
        (status = 201, description = "Moto registrada aguardando montagem", body = Moto),
        (status = 400, description = "Chassi inválido"),
        (status = 409, description = "Chassi já cadastrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn registrar_scan(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeMontagem>,
    Json(payload): Json<ScanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = ScanPayload { chassi: payload.chassi.trim().to_string(), ..payload };
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let moto = app_state.moto_service
        .registrar_scan(&mut *conn, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(moto)))
}

// GET /api/motos
#[utoipa::path(
    get,
    path = "/api/motos",
    tag = "Motos",
    params(FiltroMotos),
    responses(
        (status = 200, description = "Motos filtradas por etapa/busca", body = Vec<Moto>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn listar_motos(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Query(filtro): Query<FiltroMotos>,
) -> Result<impl IntoResponse, ApiError> {
    let motos = app_state.moto_service
        .listar(&filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(motos)))
}

// GET /api/motos/{id}
#[utoipa::path(
    get,
    path = "/api/motos/{id}",
    tag = "Motos",
    params(
        ("id" = Uuid, Path, description = "ID da moto")
    ),
    responses(
        (status = 200, description = "Moto", body = Moto),
        (status = 404, description = "Moto não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn buscar_moto(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let moto = app_state.moto_service
        .buscar(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(moto)))
}

// GET /api/motos/chassi/{chassi}
#[utoipa::path(
    get,
    path = "/api/motos/chassi/{chassi}",
    tag = "Motos",
    params(
        ("chassi" = String, Path, description = "Chassi (VIN)")
    ),
    responses(
        (status = 200, description = "Moto", body = Moto),
        (status = 404, description = "Moto não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn buscar_por_chassi(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(chassi): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let moto = app_state.moto_service
        .buscar_por_chassi(&chassi)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(moto)))
}

// ---
// MONTAGEM
// ---
#[utoipa::path(
    post,
    path = "/api/motos/{id}/montagem/iniciar",
    tag = "Montagem",
    params(
        ("id" = Uuid, Path, description = "ID da moto")
    ),
    responses(
        (status = 200, description = "Moto em produção", body = Moto),
        (status = 404, description = "Moto não encontrada"),
        (status = 409, description = "Etapa inválida ou moto pausada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn iniciar_montagem(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeMontagem>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let moto = app_state.moto_service
        .iniciar_montagem(&mut *conn, id, user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(moto)))
}

#[utoipa::path(
    post,
    path = "/api/motos/{id}/montagem/concluir",
    tag = "Montagem",
    request_body = ConcluirMontagemPayload,
    params(
        ("id" = Uuid, Path, description = "ID da moto")
    ),
    responses(
        (status = 200, description = "Checklist gravado; moto em análise ou com avaria de montagem", body = Moto),
        (status = 400, description = "Checklist vazio"),
        (status = 409, description = "Etapa inválida ou moto pausada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn concluir_montagem(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeMontagem>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConcluirMontagemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let moto = app_state.moto_service
        .concluir_montagem(&mut *conn, id, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(moto)))
}

// ---
// QUALIDADE
// ---
#[utoipa::path(
    post,
    path = "/api/motos/{id}/inspecao",
    tag = "Qualidade",
    request_body = InspecaoPayload,
    params(
        ("id" = Uuid, Path, description = "ID da moto")
    ),
    responses(
        (status = 200, description = "Moto aprovada (estoque) ou com avaria", body = Moto),
        (status = 400, description = "Reprovação sem tipo de avaria"),
        (status = 409, description = "Etapa inválida ou moto pausada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn inspecionar(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeQualidade>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InspecaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let moto = app_state.moto_service
        .inspecionar(&mut *conn, id, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(moto)))
}

// ---
// REPARO
// ---
#[utoipa::path(
    post,
    path = "/api/motos/{id}/reparo",
    tag = "Montagem",
    request_body = ConcluirReparoPayload,
    params(
        ("id" = Uuid, Path, description = "ID da moto")
    ),
    responses(
        (status = 200, description = "Moto volta para análise", body = Moto),
        (status = 409, description = "Moto sem avaria ou pausada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn concluir_reparo(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeMontagem>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConcluirReparoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_audited_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let moto = app_state.moto_service
        .concluir_reparo(&mut *conn, id, user.0.id, payload.observacoes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(moto)))
}
