// src/clients/mailer.rs
//
// Envio de e-mail via SMTP assíncrono (lettre). Usado só pelas
// notificações de melhor-esforço do webhook de pagamento.

use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    remetente: String,
}

impl Mailer {
    pub fn new(host: &str, usuario: String, senha: String, remetente: String) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(usuario, senha))
            .build();
        Ok(Self { transport, remetente })
    }

    pub async fn enviar(&self, para: &str, assunto: &str, corpo_html: &str) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.remetente.parse()?)
            .to(para.parse()?)
            .subject(assunto)
            .header(ContentType::TEXT_HTML)
            .body(corpo_html.to_string())?;

        self.transport.send(email).await?;
        tracing::info!("E-mail enviado para {}", para);
        Ok(())
    }
}
