pub mod evento;
pub mod funcionario;
pub mod log;
pub mod moto;
pub mod pausa;
pub mod relatorio;
