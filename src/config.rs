// src/config.rs

use std::{env, time::Duration};

use anyhow::{bail, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::broadcast;

use crate::{
    common::i18n::I18nStore,
    db::{
        FuncionarioRepository, LogRepository, MotoRepository, PausaRepository,
        RelatorioRepository,
    },
    models::evento::EventoProducao,
    services::{
        eventos::CAPACIDADE_CANAL, AuthService, FuncionarioService, MotoService, PausaService,
        RelatorioService,
    },
};

#[derive(Debug, Clone)]
pub struct AdminInicial {
    pub matricula: String,
    pub senha: String,
}

// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub token_validade_horas: i64,
    pub admin_inicial: Option<AdminInicial>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|chave| env::var(chave).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DB_MAX_CONNECTIONS deve ser um número")?,
            None => 5,
        };

        let token_validade_horas = match get("TOKEN_VALIDADE_HORAS") {
            Some(v) => v.parse().context("TOKEN_VALIDADE_HORAS deve ser um número")?,
            None => 12,
        };
        if token_validade_horas <= 0 {
            bail!("TOKEN_VALIDADE_HORAS deve ser positivo");
        }

        // Só cria admin se as duas variáveis vierem juntas
        let admin_inicial = match (get("ADMIN_MATRICULA"), get("ADMIN_SENHA")) {
            (Some(matricula), Some(senha)) => Some(AdminInicial { matricula, senha }),
            (None, None) => None,
            _ => bail!("ADMIN_MATRICULA e ADMIN_SENHA devem ser definidas juntas"),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            token_validade_horas,
            admin_inicial,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub i18n_store: I18nStore,
    pub eventos: broadcast::Sender<EventoProducao>,

    pub auth_service: AuthService,
    pub funcionario_service: FuncionarioService,
    pub moto_service: MotoService,
    pub pausa_service: PausaService,
    pub relatorio_service: RelatorioService,
    pub log_repo: LogRepository,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_parts(config, db_pool)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(config: Config, db_pool: PgPool) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::carregar()?;
        let (eventos, _) = broadcast::channel(CAPACIDADE_CANAL);

        let funcionario_repo = FuncionarioRepository::new(db_pool.clone());
        let moto_repo = MotoRepository::new(db_pool.clone());
        let pausa_repo = PausaRepository::new(db_pool.clone());
        let log_repo = LogRepository::new(db_pool.clone());
        let relatorio_repo = RelatorioRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            funcionario_repo.clone(),
            log_repo.clone(),
            config.jwt_secret.clone(),
            config.token_validade_horas,
            db_pool.clone(),
        );
        let funcionario_service = FuncionarioService::new(funcionario_repo, log_repo.clone());
        let moto_service = MotoService::new(moto_repo.clone(), pausa_repo.clone(), log_repo.clone());
        let pausa_service = PausaService::new(pausa_repo, moto_repo, log_repo.clone());
        let relatorio_service = RelatorioService::new(relatorio_repo);

        Ok(Self {
            db_pool,
            config,
            i18n_store,
            eventos,
            auth_service,
            funcionario_service,
            moto_service,
            pausa_service,
            relatorio_service,
            log_repo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pares: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mapa: HashMap<String, String> =
            pares.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |chave: &str| mapa.get(chave).cloned()
    }

    #[test]
    fn test_valores_padrao() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/producao"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.token_validade_horas, 12);
        assert!(config.admin_inicial.is_none());
    }

    #[test]
    fn test_sem_database_url_falha() {
        assert!(Config::from_vars(vars(&[("JWT_SECRET", "segredo")])).is_err());
    }

    #[test]
    fn test_numero_invalido_falha() {
        let resultado = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/producao"),
            ("JWT_SECRET", "segredo"),
            ("DB_MAX_CONNECTIONS", "muitas"),
        ]));
        assert!(resultado.is_err());
    }

    #[test]
    fn test_admin_inicial_exige_as_duas_variaveis() {
        let base = [
            ("DATABASE_URL", "postgres://localhost/producao"),
            ("JWT_SECRET", "segredo"),
        ];

        let mut so_matricula = base.to_vec();
        so_matricula.push(("ADMIN_MATRICULA", "admin"));
        assert!(Config::from_vars(vars(&so_matricula)).is_err());

        let mut completo = so_matricula.clone();
        completo.push(("ADMIN_SENHA", "troque-me"));
        let config = Config::from_vars(vars(&completo)).unwrap();
        assert_eq!(config.admin_inicial.unwrap().matricula, "admin");
    }
}
