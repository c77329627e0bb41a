use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;

// ---
// Conexão "assinada" pelo funcionário
// ---
/// Adquire uma conexão da pool e grava `app.funcionario_id` na sessão.
/// Os triggers de notificação leem esse valor para preencher o campo `ator`
/// dos eventos em tempo real. O valor é sobrescrito a cada aquisição.
pub(crate) async fn get_audited_connection(
    app_state: &AppState,
    user: &AuthenticatedUser,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, AppError> {
    let mut conn = app_state.db_pool.acquire().await?;

    sqlx::query("SELECT set_config('app.funcionario_id', $1, false)")
        .bind(user.0.id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(conn)
}
