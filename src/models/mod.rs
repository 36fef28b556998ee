pub mod aluno;
pub mod auth;
pub mod chatbot;
pub mod configuracao;
pub mod matricula;
pub mod pagamento;
pub mod pedido;
