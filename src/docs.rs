// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Usuarios ---
        handlers::usuarios::create_usuario,
        handlers::usuarios::list_usuarios,
        handlers::usuarios::delete_usuario,

        // --- Alunos ---
        handlers::alunos::create_aluno,
        handlers::alunos::get_aluno_por_cpf,
        handlers::alunos::list_alunos,
        handlers::alunos::list_pendentes,
        handlers::alunos::list_matriculados,
        handlers::alunos::update_aluno,
        handlers::alunos::delete_aluno,

        // --- Matriculas ---
        handlers::matriculas::finalizar_matricula,
        handlers::matriculas::list_matriculas,

        // --- Pedidos ---
        handlers::pedidos::create_pedido,
        handlers::pedidos::list_pedidos,
        handlers::pedidos::list_pedidos_por_cpf,
        handlers::pedidos::cancelar_pedido,

        // --- Pagamentos ---
        handlers::pagamentos::criar_pix,
        handlers::pagamentos::list_pagamentos,
        handlers::pagamentos::list_pagamentos_por_cpf,

        // --- Configuracoes ---
        handlers::configuracoes::get_configuracoes,
        handlers::configuracoes::update_configuracoes,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Usuario,
            models::auth::LoginPayload,
            models::auth::CreateUsuarioPayload,
            models::auth::AuthResponse,

            // --- Alunos ---
            models::aluno::Aluno,
            models::aluno::CreateAlunoPayload,
            models::aluno::UpdateAlunoPayload,

            // --- Matriculas ---
            models::matricula::Matricula,
            models::matricula::FinalizarMatriculaPayload,

            // --- Pedidos ---
            models::pedido::Pedido,
            models::pedido::CreatePedidoPayload,

            // --- Pagamentos ---
            models::pagamento::StatusPagamento,
            models::pagamento::Pagamento,
            models::pagamento::CreatePixPayload,
            models::pagamento::PixResponse,

            // --- Configuracoes ---
            models::configuracao::Configuracao,
            models::configuracao::UpdateConfiguracaoPayload,

            // --- Chatbot ---
            models::chatbot::MensagemChat,
            models::chatbot::ChatbotPayload,
            models::chatbot::ChatbotResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação da secretaria"),
        (name = "Usuarios", description = "Usuários da secretaria"),
        (name = "Alunos", description = "Fichas de dados pessoais"),
        (name = "Matriculas", description = "Finalização e consulta de matrículas"),
        (name = "Pedidos", description = "Pedidos de livros"),
        (name = "Pagamentos", description = "Cobranças PIX via MercadoPago"),
        (name = "Configuracoes", description = "Configurações de notificação e chatbot")
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
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
