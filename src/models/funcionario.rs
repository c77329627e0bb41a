// src/models/funcionario.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Cargo do funcionário na linha de produção
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "funcao_funcionario", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Funcao {
    Admin,
    Supervisor,
    Montador,
    Inspetor,
    Estoquista,
}

impl Funcao {
    pub fn as_str(&self) -> &'static str {
        match self {
            Funcao::Admin => "admin",
            Funcao::Supervisor => "supervisor",
            Funcao::Montador => "montador",
            Funcao::Inspetor => "inspetor",
            Funcao::Estoquista => "estoquista",
        }
    }

    /// Admin passa por qualquer restrição.
    pub fn pode(&self, permitidas: &[Funcao]) -> bool {
        *self == Funcao::Admin || permitidas.contains(self)
    }
}

impl fmt::Display for Funcao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Representa um funcionário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Funcionario {
    pub id: Uuid,
    #[schema(example = "Maria Souza")]
    pub nome: String,
    #[schema(example = "M-0042")]
    pub matricula: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub senha_hash: String,

    pub funcao: Funcao,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "validacao.obrigatorio"))]
    #[schema(example = "M-0042")]
    pub matricula: String,
    #[validate(length(min = 6, message = "validacao.tamanho_senha"))]
    pub senha: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub funcionario: Funcionario,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarFuncionarioPayload {
    #[validate(length(min = 1, message = "validacao.obrigatorio"))]
    #[schema(example = "João Lima")]
    pub nome: String,

    #[validate(length(min = 1, message = "validacao.obrigatorio"))]
    #[schema(example = "M-0107")]
    pub matricula: String,

    #[validate(length(min = 6, message = "validacao.tamanho_senha"))]
    pub senha: String,

    #[schema(example = "montador")]
    pub funcao: Funcao,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AlterarFuncaoPayload {
    pub funcao: Funcao,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,       // ID do funcionário
    pub funcao: Funcao,  // Cargo no momento da emissão
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_pode_tudo() {
        assert!(Funcao::Admin.pode(&[]));
        assert!(Funcao::Admin.pode(&[Funcao::Montador]));
    }

    #[test]
    fn test_funcao_restrita() {
        let montagem = [Funcao::Montador, Funcao::Supervisor];
        assert!(Funcao::Montador.pode(&montagem));
        assert!(Funcao::Supervisor.pode(&montagem));
        assert!(!Funcao::Inspetor.pode(&montagem));
        assert!(!Funcao::Estoquista.pode(&[]));
    }

    #[test]
    fn test_funcao_serializa_em_snake_case() {
        assert_eq!(serde_json::to_string(&Funcao::Estoquista).unwrap(), "\"estoquista\"");
        let f: Funcao = serde_json::from_str("\"inspetor\"").unwrap();
        assert_eq!(f, Funcao::Inspetor);
    }
}
