// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod clients;
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas: login, cadastro de aluno, fluxos de livro/checkout
    let rotas_publicas = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/alunos", post(handlers::alunos::create_aluno))
        .route("/api/alunos/cpf/{cpf}", get(handlers::alunos::get_aluno_por_cpf))
        .route("/api/pedidos", post(handlers::pedidos::create_pedido))
        .route("/api/pedidos/cpf/{cpf}", get(handlers::pedidos::list_pedidos_por_cpf))
        .route("/api/pedidos/{id}", axum::routing::delete(handlers::pedidos::cancelar_pedido))
        .route("/api/pagamentos/pix", post(handlers::pagamentos::criar_pix))
        .route("/api/pagamentos/cpf/{cpf}", get(handlers::pagamentos::list_pagamentos_por_cpf))
        .route("/api/chatbot", post(handlers::chatbot::conversar));

    // Callbacks dos provedores externos (sempre respondem 200)
    let rotas_webhooks = Router::new()
        .route("/api/webhooks/mercadopago", post(handlers::webhooks::webhook_mercadopago))
        .route("/api/webhooks/whatsapp", post(handlers::webhooks::webhook_whatsapp));

    // Painel da secretaria (protegido pelo middleware de autenticação)
    let rotas_secretaria = Router::new()
        .route("/api/usuarios/me", get(handlers::auth::get_me))
        .route(
            "/api/usuarios",
            post(handlers::usuarios::create_usuario).get(handlers::usuarios::list_usuarios),
        )
        .route("/api/usuarios/{id}", axum::routing::delete(handlers::usuarios::delete_usuario))
        .route("/api/alunos", get(handlers::alunos::list_alunos))
        .route("/api/alunos/pendentes", get(handlers::alunos::list_pendentes))
        .route("/api/alunos/matriculados", get(handlers::alunos::list_matriculados))
        .route(
            "/api/alunos/{id}",
            put(handlers::alunos::update_aluno).delete(handlers::alunos::delete_aluno),
        )
        .route(
            "/api/matriculas",
            post(handlers::matriculas::finalizar_matricula).get(handlers::matriculas::list_matriculas),
        )
        .route("/api/pedidos", get(handlers::pedidos::list_pedidos))
        .route("/api/pagamentos", get(handlers::pagamentos::list_pagamentos))
        .route(
            "/api/configuracoes",
            get(handlers::configuracoes::get_configuracoes)
                .put(handlers::configuracoes::update_configuracoes),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal. O front é servido de outro lugar,
    // então o CORS fica liberado como no sistema antigo.
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(rotas_publicas)
        .merge(rotas_webhooks)
        .merge(rotas_secretaria)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
