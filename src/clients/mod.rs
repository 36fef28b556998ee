pub mod evolution;
pub mod mailer;
pub mod mercadopago;
pub mod openai;
