// src/handlers/funcionarios.rs
//
// Cadastro de funcionários (somente admin).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{ExigeAdmin, RequireFuncao},
    },
    models::funcionario::{AlterarFuncaoPayload, CriarFuncionarioPayload, Funcionario},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroFuncionarios {
    /// Esconde os desativados
    #[serde(default)]
    pub apenas_ativos: bool,
}

// POST /api/funcionarios
#[utoipa::path(
    post,
    path = "/api/funcionarios",
    tag = "Funcionarios",
    request_body = CriarFuncionarioPayload,
    responses(
        (status = 201, description = "Funcionário criado", body = Funcionario),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas admin"),
        (status = 409, description = "Matrícula já existe")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn criar_funcionario(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeAdmin>,
    Json(payload): Json<CriarFuncionarioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let funcionario = app_state.funcionario_service
        .criar(&app_state.db_pool, Some(user.0.id), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(funcionario)))
}

// GET /api/funcionarios
#[utoipa::path(
    get,
    path = "/api/funcionarios",
    tag = "Funcionarios",
    params(FiltroFuncionarios),
    responses(
        (status = 200, description = "Lista de funcionários", body = Vec<Funcionario>),
        (status = 403, description = "Apenas admin")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn listar_funcionarios(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeAdmin>,
    Query(filtro): Query<FiltroFuncionarios>,
) -> Result<impl IntoResponse, ApiError> {
    let funcionarios = app_state.funcionario_service
        .listar(filtro.apenas_ativos)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(funcionarios)))
}

// PATCH /api/funcionarios/{id}/funcao
#[utoipa::path(
    patch,
    path = "/api/funcionarios/{id}/funcao",
    tag = "Funcionarios",
    request_body = AlterarFuncaoPayload,
    params(
        ("id" = Uuid, Path, description = "ID do funcionário")
    ),
    responses(
        (status = 200, description = "Função alterada", body = Funcionario),
        (status = 403, description = "Apenas admin (e nunca a própria conta)"),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 409, description = "Último admin ativo")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn alterar_funcao(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AlterarFuncaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let funcionario = app_state.funcionario_service
        .alterar_funcao(&app_state.db_pool, user.0.id, id, payload.funcao)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(funcionario)))
}

// DELETE /api/funcionarios/{id}
#[utoipa::path(
    delete,
    path = "/api/funcionarios/{id}",
    tag = "Funcionarios",
    params(
        ("id" = Uuid, Path, description = "ID do funcionário")
    ),
    responses(
        (status = 200, description = "Funcionário desativado", body = Funcionario),
        (status = 403, description = "Apenas admin (e nunca a própria conta)"),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 409, description = "Último admin ativo")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn desativar_funcionario(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireFuncao<ExigeAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let funcionario = app_state.funcionario_service
        .desativar(&app_state.db_pool, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(funcionario)))
}

// GET /api/funcionarios/{id}
#[utoipa::path(
    get,
    path = "/api/funcionarios/{id}",
    tag = "Funcionarios",
    params(
        ("id" = Uuid, Path, description = "ID do funcionário")
    ),
    responses(
        (status = 200, description = "Funcionário", body = Funcionario),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn buscar_funcionario(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFuncao<ExigeAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let funcionario = app_state.funcionario_service
        .buscar(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(funcionario)))
}
