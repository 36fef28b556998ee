// src/services/rate_limit.rs
//
// Limite de mensagens por telefone no webhook do WhatsApp. O contador do
// sistema antigo era um Map sem sincronização; aqui a janela fixa vive
// atrás de um mutex async.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const JANELA: Duration = Duration::from_secs(60);

struct Janela {
    inicio: Instant,
    contagem: u32,
}

#[derive(Clone)]
pub struct RateLimiter {
    janelas: Arc<Mutex<HashMap<String, Janela>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            janelas: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registra uma mensagem do telefone e diz se ela ainda cabe no limite.
    pub async fn permitir(&self, telefone: &str, limite: u32) -> bool {
        let agora = Instant::now();
        let mut janelas = self.janelas.lock().await;

        // Janelas velhas de outros números não podem acumular para sempre.
        janelas.retain(|_, j| agora.duration_since(j.inicio) < JANELA);

        let janela = janelas.entry(telefone.to_string()).or_insert(Janela {
            inicio: agora,
            contagem: 0,
        });

        if agora.duration_since(janela.inicio) >= JANELA {
            janela.inicio = agora;
            janela.contagem = 0;
        }

        janela.contagem += 1;
        janela.contagem <= limite
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn respeita_o_limite_na_janela() {
        let limiter = RateLimiter::new();

        for _ in 0..3 {
            assert!(limiter.permitir("5511999998888", 3).await);
        }
        assert!(!limiter.permitir("5511999998888", 3).await);
    }

    #[tokio::test]
    async fn telefones_diferentes_nao_interferem() {
        let limiter = RateLimiter::new();

        assert!(limiter.permitir("5511911111111", 1).await);
        assert!(!limiter.permitir("5511911111111", 1).await);
        assert!(limiter.permitir("5511922222222", 1).await);
    }
}
