// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::funcionario::Funcao,
};

/// 1. O Trait que define quais funções passam pelo guardião
pub trait FuncaoExigida: Send + Sync + 'static {
    /// Funções aceitas além do admin (que passa sempre).
    fn permitidas() -> &'static [Funcao];
}

/// 2. O Extractor (Guardião)
pub struct RequireFuncao<T>(pub PhantomData<T>);

pub fn verificar_funcao<T: FuncaoExigida>(funcao: Funcao) -> Result<(), AppError> {
    if funcao.pode(T::permitidas()) {
        return Ok(());
    }

    let exigidas: Vec<&str> = std::iter::once(Funcao::Admin)
        .chain(T::permitidas().iter().copied())
        .map(|f| f.as_str())
        .collect();
    Err(AppError::AcessoNegado(exigidas.join(", ")))
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireFuncao<T>
where
    T: FuncaoExigida,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();

        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        verificar_funcao::<T>(user.0.funcao)
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        Ok(RequireFuncao(PhantomData))
    }
}

// ---
// GUARDIÕES POR ETAPA
// ---

pub struct ExigeAdmin;
impl FuncaoExigida for ExigeAdmin {
    fn permitidas() -> &'static [Funcao] { &[] }
}

pub struct ExigeSupervisao;
impl FuncaoExigida for ExigeSupervisao {
    fn permitidas() -> &'static [Funcao] { &[Funcao::Supervisor] }
}

pub struct ExigeMontagem;
impl FuncaoExigida for ExigeMontagem {
    fn permitidas() -> &'static [Funcao] { &[Funcao::Montador, Funcao::Supervisor] }
}

pub struct ExigeQualidade;
impl FuncaoExigida for ExigeQualidade {
    fn permitidas() -> &'static [Funcao] { &[Funcao::Inspetor, Funcao::Supervisor] }
}

pub struct ExigeEstoque;
impl FuncaoExigida for ExigeEstoque {
    fn permitidas() -> &'static [Funcao] { &[Funcao::Estoquista, Funcao::Supervisor] }
}
