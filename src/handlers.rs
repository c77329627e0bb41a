pub mod auth;
pub mod estoque;
pub mod eventos;
pub mod funcionarios;
pub mod logs;
pub mod motos;
pub mod pausas;
pub mod relatorios;
pub mod vin;
