// src/services/funcionario_service.rs

use bcrypt::hash;
use serde_json::json;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FuncionarioRepository, LogRepository},
    models::{
        funcionario::{CriarFuncionarioPayload, Funcao, Funcionario},
        log::AcaoLog,
    },
};

#[derive(Clone)]
pub struct FuncionarioService {
    repo: FuncionarioRepository,
    log_repo: LogRepository,
}

impl FuncionarioService {
    pub fn new(repo: FuncionarioRepository, log_repo: LogRepository) -> Self {
        Self { repo, log_repo }
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        ator: Option<Uuid>,
        payload: &CriarFuncionarioPayload,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Hash fora da transação, não toca no banco
        let senha_hash = gerar_hash(&payload.senha).await?;

        let mut tx = executor.begin().await?;

        let funcionario = self.repo
            .create(&mut *tx, payload.nome.trim(), payload.matricula.trim(), &senha_hash, payload.funcao)
            .await?;

        self.log_repo
            .registrar(
                &mut *tx,
                ator,
                AcaoLog::FuncionarioCriado,
                &alvo(&funcionario),
                json!({ "nome": funcionario.nome, "funcao": funcionario.funcao }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("👤 Funcionário {} criado como {}", funcionario.matricula, funcionario.funcao);
        Ok(funcionario)
    }

    pub async fn listar(&self, apenas_ativos: bool) -> Result<Vec<Funcionario>, AppError> {
        self.repo.list_all(apenas_ativos).await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Funcionario, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::FuncionarioNaoEncontrado)
    }

    pub async fn alterar_funcao<'e, E>(
        &self,
        executor: E,
        ator: Uuid,
        id: Uuid,
        funcao: Funcao,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        verificar_nao_e_proprio(ator, id)?;

        let mut tx = executor.begin().await?;

        let admins_ativos = self.repo.travar_admins_ativos(&mut *tx).await?;
        let atual = self.repo.find_for_update(&mut *tx, id).await?;
        verificar_ultimo_admin(&atual, funcao == Funcao::Admin, admins_ativos)?;

        let funcionario = self.repo.update_funcao(&mut *tx, id, funcao).await?;

        self.log_repo
            .registrar(
                &mut *tx,
                Some(ator),
                AcaoLog::FuncaoAlterada,
                &alvo(&funcionario),
                json!({ "funcao": funcao }),
            )
            .await?;

        tx.commit().await?;
        Ok(funcionario)
    }

    pub async fn desativar<'e, E>(
        &self,
        executor: E,
        ator: Uuid,
        id: Uuid,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        verificar_nao_e_proprio(ator, id)?;

        let mut tx = executor.begin().await?;

        let admins_ativos = self.repo.travar_admins_ativos(&mut *tx).await?;
        let atual = self.repo.find_for_update(&mut *tx, id).await?;
        verificar_ultimo_admin(&atual, false, admins_ativos)?;

        let funcionario = self.repo.desativar(&mut *tx, id).await?;

        self.log_repo
            .registrar(&mut *tx, Some(ator), AcaoLog::FuncionarioDesativado, &alvo(&funcionario), json!({}))
            .await?;

        tx.commit().await?;

        tracing::info!("🚫 Funcionário {} desativado", funcionario.matricula);
        Ok(funcionario)
    }

    /// Cria o primeiro admin quando a tabela está vazia.
    pub async fn garantir_admin_inicial<'e, E>(
        &self,
        executor: E,
        matricula: &str,
        senha: &str,
    ) -> Result<Option<Funcionario>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if self.repo.count().await? > 0 {
            return Ok(None);
        }

        let payload = CriarFuncionarioPayload {
            nome: "Administrador".to_string(),
            matricula: matricula.to_string(),
            senha: senha.to_string(),
            funcao: Funcao::Admin,
        };
        let admin = self.criar(executor, None, &payload).await?;

        tracing::warn!("⚠️ Admin inicial criado com a matrícula {}. Troque a senha.", admin.matricula);
        Ok(Some(admin))
    }
}

// Ninguém tranca a própria porta
pub fn verificar_nao_e_proprio(ator: Uuid, id: Uuid) -> Result<(), AppError> {
    if ator == id {
        return Err(AppError::AcessoNegado(Funcao::Admin.to_string()));
    }
    Ok(())
}

/// O último admin ativo não perde a função nem é desativado.
pub fn verificar_ultimo_admin(
    alvo: &Funcionario,
    continua_admin: bool,
    admins_ativos: i64,
) -> Result<(), AppError> {
    let admin_ativo = alvo.funcao == Funcao::Admin && alvo.ativo;
    if admin_ativo && !continua_admin && admins_ativos <= 1 {
        return Err(AppError::UltimoAdmin);
    }
    Ok(())
}

async fn gerar_hash(senha: &str) -> Result<String, AppError> {
    let senha_clone = senha.to_owned();
    let senha_hash = tokio::task::spawn_blocking(move || hash(&senha_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(senha_hash)
}

fn alvo(funcionario: &Funcionario) -> String {
    format!("funcionarios/{}", funcionario.matricula)
}
