use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário ou e-mail já cadastrado")]
    UserAlreadyExists,

    #[error("Não é permitido remover o último usuário da secretaria")]
    LastUserRemoval,

    #[error("CPF inválido")]
    CpfInvalido,

    #[error("Aluno não encontrado")]
    AlunoNotFound,

    #[error("CPF já cadastrado")]
    CpfAlreadyExists,

    #[error("Aluno já matriculado neste ciclo")]
    MatriculaDuplicada,

    #[error("Pedido não encontrado")]
    PedidoNotFound,

    #[error("Pagamento não encontrado")]
    PagamentoNotFound,

    #[error("Falha na comunicação com o MercadoPago: {0}")]
    MercadoPagoError(String),

    #[error("Falha na comunicação com o provedor de IA: {0}")]
    ChatbotError(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::UserAlreadyExists => (StatusCode::CONFLICT, "Este usuário ou e-mail já está em uso."),
            AppError::LastUserRemoval => (StatusCode::CONFLICT, "Não é permitido remover o último usuário da secretaria."),
            AppError::CpfInvalido => (StatusCode::BAD_REQUEST, "O CPF informado é inválido."),
            AppError::AlunoNotFound => (StatusCode::NOT_FOUND, "Aluno não encontrado."),
            AppError::CpfAlreadyExists => (StatusCode::CONFLICT, "Já existe um aluno cadastrado com este CPF."),
            AppError::MatriculaDuplicada => (StatusCode::CONFLICT, "Este aluno já está matriculado neste ciclo."),
            AppError::PedidoNotFound => (StatusCode::NOT_FOUND, "Pedido não encontrado."),
            AppError::PagamentoNotFound => (StatusCode::NOT_FOUND, "Pagamento não encontrado."),
            AppError::MercadoPagoError(ref msg) => {
                tracing::error!("MercadoPago: {}", msg);
                (StatusCode::BAD_GATEWAY, "Falha ao comunicar com o provedor de pagamentos.")
            }
            AppError::ChatbotError(ref msg) => {
                tracing::error!("Chatbot: {}", msg);
                (StatusCode::BAD_GATEWAY, "O assistente está indisponível no momento.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
