// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{FuncionarioRepository, LogRepository},
    models::{
        funcionario::{AuthResponse, Claims, Funcionario},
        log::AcaoLog,
    },
};

#[derive(Clone)]
pub struct AuthService {
    funcionario_repo: FuncionarioRepository,
    log_repo: LogRepository,
    jwt_secret: String,
    validade_horas: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        funcionario_repo: FuncionarioRepository,
        log_repo: LogRepository,
        jwt_secret: String,
        validade_horas: i64,
        pool: PgPool,
    ) -> Self {
        Self { funcionario_repo, log_repo, jwt_secret, validade_horas, pool }
    }

    pub async fn login(&self, matricula: &str, senha: &str) -> Result<AuthResponse, AppError> {
        let funcionario = self.funcionario_repo
            .find_by_matricula(matricula)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let senha_clone = senha.to_owned();
        let hash_clone = funcionario.senha_hash.clone();

        // bcrypt é caro: roda fora das threads do runtime
        let senha_valida = tokio::task::spawn_blocking(move || verify(&senha_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::InvalidCredentials);
        }
        if !funcionario.ativo {
            return Err(AppError::FuncionarioInativo);
        }

        self.log_repo
            .registrar(
                &self.pool,
                Some(funcionario.id),
                AcaoLog::Login,
                &format!("funcionarios/{}", funcionario.matricula),
                json!({ "funcao": funcionario.funcao }),
            )
            .await?;

        tracing::info!("🔑 Login de {} ({})", funcionario.matricula, funcionario.funcao);

        let token = self.create_token(&funcionario)?;
        Ok(AuthResponse { token, funcionario })
    }

    // Token válido não basta: o funcionário precisa continuar ativo
    pub async fn validate_token(&self, token: &str) -> Result<Funcionario, AppError> {
        let claims = ler_token(&self.jwt_secret, token)?;

        let funcionario = self.funcionario_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !funcionario.ativo {
            return Err(AppError::FuncionarioInativo);
        }
        Ok(funcionario)
    }

    pub fn create_token(&self, funcionario: &Funcionario) -> Result<String, AppError> {
        gerar_token(&self.jwt_secret, funcionario, self.validade_horas)
    }
}

pub fn gerar_token(
    segredo: &str,
    funcionario: &Funcionario,
    validade_horas: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(validade_horas);

    let claims = Claims {
        sub: funcionario.id,
        funcao: funcionario.funcao,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(segredo.as_ref()),
    )?)
}

pub fn ler_token(segredo: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(segredo.as_ref()),
        &Validation::default(),
    )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::funcionario::Funcao;
    use uuid::Uuid;

    fn funcionario() -> Funcionario {
        Funcionario {
            id: Uuid::new_v4(),
            nome: "Ana Prado".into(),
            matricula: "M-0001".into(),
            senha_hash: String::new(),
            funcao: Funcao::Inspetor,
            ativo: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_carrega_id_e_funcao() {
        let f = funcionario();
        let token = gerar_token("segredo", &f, 12).unwrap();
        let claims = ler_token("segredo", &token).unwrap();

        assert_eq!(claims.sub, f.id);
        assert_eq!(claims.funcao, Funcao::Inspetor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_com_outro_segredo_e_rejeitado() {
        let token = gerar_token("segredo", &funcionario(), 12).unwrap();
        assert!(matches!(ler_token("outro", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_token_expirado_e_rejeitado() {
        let token = gerar_token("segredo", &funcionario(), -2).unwrap();
        assert!(matches!(ler_token("segredo", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_lixo_nao_e_token() {
        assert!(matches!(ler_token("segredo", "abc.def"), Err(AppError::InvalidToken)));
    }
}
