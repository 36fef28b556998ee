pub mod auth;
pub mod chatbot_service;
pub mod matricula_service;
pub mod notificacao_service;
pub mod pagamento_service;
pub mod rate_limit;
