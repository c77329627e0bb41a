pub mod funcionario_repo;
pub use funcionario_repo::FuncionarioRepository;
pub mod moto_repo;
pub use moto_repo::MotoRepository;
pub mod pausa_repo;
pub use pausa_repo::PausaRepository;
pub mod log_repo;
pub use log_repo::LogRepository;
pub mod relatorio_repo;
pub use relatorio_repo::RelatorioRepository;

#[cfg(test)]
pub(crate) mod teste_banco;
