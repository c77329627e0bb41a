pub mod auth;
pub mod eventos;
pub mod funcionario_service;
pub mod moto_service;
pub mod pausa_service;
pub mod relatorio_service;
pub mod vin_decoder;

pub use auth::AuthService;
pub use funcionario_service::FuncionarioService;
pub use moto_service::MotoService;
pub use pausa_service::PausaService;
pub use relatorio_service::RelatorioService;
