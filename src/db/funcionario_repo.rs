// src/db/funcionario_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{unique_violation_or, AppError},
    models::funcionario::{Funcao, Funcionario},
};

// Responsável por todas as interações com a tabela 'funcionarios'
#[derive(Clone)]
pub struct FuncionarioRepository {
    pool: PgPool,
}

impl FuncionarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_matricula(&self, matricula: &str) -> Result<Option<Funcionario>, AppError> {
        let funcionario = sqlx::query_as::<_, Funcionario>(
            "SELECT * FROM funcionarios WHERE matricula = $1",
        )
            .bind(matricula)
            .fetch_optional(&self.pool)
            .await?;
        Ok(funcionario)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Funcionario>, AppError> {
        let funcionario = sqlx::query_as::<_, Funcionario>("SELECT * FROM funcionarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(funcionario)
    }

    pub async fn list_all(&self, apenas_ativos: bool) -> Result<Vec<Funcionario>, AppError> {
        let funcionarios = sqlx::query_as::<_, Funcionario>(
            r#"
            SELECT * FROM funcionarios
            WHERE ($1 = false OR ativo = true)
            ORDER BY nome
            "#,
        )
            .bind(apenas_ativos)
            .fetch_all(&self.pool)
            .await?;
        Ok(funcionarios)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM funcionarios")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    // Converte violação de unicidade da matrícula em erro amigável
    pub async fn create<'e, E>(
        &self,
        executor: E,
        nome: &str,
        matricula: &str,
        senha_hash: &str,
        funcao: Funcao,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Funcionario>(
            r#"
            INSERT INTO funcionarios (nome, matricula, senha_hash, funcao)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(nome)
            .bind(matricula)
            .bind(senha_hash)
            .bind(funcao)
            .fetch_one(executor)
            .await
            .map_err(|e| unique_violation_or(e, || AppError::MatriculaJaExiste(matricula.to_string())))
    }

    pub async fn update_funcao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        funcao: Funcao,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Funcionario>(
            r#"
            UPDATE funcionarios
            SET funcao = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(funcao)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::FuncionarioNaoEncontrado)
    }

    // Trava o funcionário até o fim da transação
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Funcionario>("SELECT * FROM funcionarios WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::FuncionarioNaoEncontrado)
    }

    // Trava todos os admins ativos: duas remoções simultâneas não passam juntas
    pub async fn travar_admins_ativos<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM funcionarios WHERE funcao = 'admin' AND ativo = true ORDER BY id FOR UPDATE",
        )
            .fetch_all(executor)
            .await?;
        Ok(ids.len() as i64)
    }

    pub async fn desativar<'e, E>(&self, executor: E, id: Uuid) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Funcionario>(
            r#"
            UPDATE funcionarios
            SET ativo = false, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::FuncionarioNaoEncontrado)
    }
}
