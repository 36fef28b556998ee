pub mod alunos;
pub mod auth;
pub mod chatbot;
pub mod configuracoes;
pub mod matriculas;
pub mod pagamentos;
pub mod pedidos;
pub mod usuarios;
pub mod webhooks;
