// src/db/teste_banco.rs
//
// Postgres de verdade para os testes que dependem de SQL.
// Sem DATABASE_URL os testes retornam cedo.

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::{FuncionarioRepository, MotoRepository},
    models::{
        funcionario::{Funcao, Funcionario},
        moto::Moto,
    },
};

pub async fn conectar() -> Option<PgPool> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("banco de teste inacessível");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("migrações do banco de teste");

    Some(pool)
}

// Hex maiúsculo: nunca gera I, O ou Q
fn sufixo() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

pub async fn funcionario(pool: &PgPool, funcao: Funcao) -> Funcionario {
    FuncionarioRepository::new(pool.clone())
        .create(pool, "Funcionário de teste", &format!("T-{}", &sufixo()[..12]), "sem-hash", funcao)
        .await
        .expect("funcionário de teste")
}

/// Moto recém escaneada e já com a montagem iniciada.
pub async fn moto_em_producao(pool: &PgPool, montador: &Funcionario) -> Moto {
    let repo = MotoRepository::new(pool.clone());
    let chassi = format!("9C2{}", &sufixo()[..14]);

    let moto = repo
        .insert(pool, &chassi, "CG 160 Titan", Some(2024), "Preto", None, montador.id)
        .await
        .expect("moto de teste");

    repo.iniciar_montagem(pool, moto.id, montador.id)
        .await
        .expect("início da montagem")
        .expect("moto aguardando montagem")
}
