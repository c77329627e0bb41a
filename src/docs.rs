// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Funcionários ---
        handlers::funcionarios::criar_funcionario,
        handlers::funcionarios::listar_funcionarios,
        handlers::funcionarios::buscar_funcionario,
        handlers::funcionarios::alterar_funcao,
        handlers::funcionarios::desativar_funcionario,

        // --- Motos ---
        handlers::motos::registrar_scan,
        handlers::motos::listar_motos,
        handlers::motos::buscar_moto,
        handlers::motos::buscar_por_chassi,
        handlers::vin::decodificar_vin,

        // --- Montagem / Qualidade ---
        handlers::motos::iniciar_montagem,
        handlers::motos::concluir_montagem,
        handlers::motos::inspecionar,
        handlers::motos::concluir_reparo,

        // --- Estoque ---
        handlers::estoque::listar_estoque,
        handlers::estoque::resumo_estoque,

        // --- Pausas ---
        handlers::pausas::solicitar_pausa,
        handlers::pausas::listar_solicitacoes,
        handlers::pausas::responder_solicitacao,
        handlers::pausas::retomar_producao,
        handlers::pausas::historico_pausas,

        // --- Relatórios ---
        handlers::relatorios::get_resumo,
        handlers::relatorios::get_producao_diaria,
        handlers::relatorios::get_desempenho_montadores,
        handlers::relatorios::get_resumo_pausas,

        // --- Logs / Eventos ---
        handlers::logs::listar_logs,
        handlers::eventos::stream_eventos,
    ),
    components(
        schemas(
            // --- Funcionários ---
            models::funcionario::Funcao,
            models::funcionario::Funcionario,
            models::funcionario::LoginPayload,
            models::funcionario::AuthResponse,
            models::funcionario::CriarFuncionarioPayload,
            models::funcionario::AlterarFuncaoPayload,

            // --- Motos ---
            models::moto::MotoStatus,
            models::moto::TipoAvaria,
            models::moto::Moto,
            models::moto::ItemChecklist,
            models::moto::ScanPayload,
            models::moto::ConcluirMontagemPayload,
            models::moto::InspecaoPayload,
            models::moto::ConcluirReparoPayload,
            models::moto::ResumoEstoque,
            services::vin_decoder::OrigemModelo,
            services::vin_decoder::ModeloDecodificado,

            // --- Pausas ---
            models::pausa::StatusSolicitacao,
            models::pausa::SolicitacaoPausa,
            models::pausa::SolicitacaoPausaDetalhe,
            models::pausa::PausaProducao,
            models::pausa::SolicitarPausaPayload,
            models::pausa::ResponderSolicitacaoPayload,
            models::pausa::RespostaSolicitacao,

            // --- Relatórios ---
            models::relatorio::ResumoProducao,
            models::relatorio::ContagemStatus,
            models::relatorio::ProducaoDiaria,
            models::relatorio::DesempenhoMontador,
            models::relatorio::ResumoPausas,

            // --- Logs / Eventos ---
            models::log::LogSistema,
            models::evento::EventoProducao,
        )
    ),
    tags(
        (name = "Auth", description = "Login por matrícula e dados do funcionário logado"),
        (name = "Funcionarios", description = "Cadastro de funcionários e funções"),
        (name = "Motos", description = "Scan de chassi e consulta de motos"),
        (name = "Montagem", description = "Montagem, checklist e reparo de avarias"),
        (name = "Qualidade", description = "Inspeção de qualidade"),
        (name = "Estoque", description = "Motos aprovadas"),
        (name = "Pausas", description = "Solicitação, aprovação e retomada de pausas"),
        (name = "Relatorios", description = "Indicadores da linha"),
        (name = "Logs", description = "Trilha de auditoria"),
        (name = "Eventos", description = "Atualizações em tempo real (SSE)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
