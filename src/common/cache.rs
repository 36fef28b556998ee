// src/common/cache.rs
//
// Cache genérico com TTL. O painel da secretaria consulta as listagens de
// alunos (pendentes/matriculados) com muito mais frequência do que elas
// mudam; em vez de três caches quase idênticos espalhados pelos serviços,
// um único tipo parametrizado pelo valor carregado.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::common::error::AppError;

struct Entrada<T> {
    valor: T,
    carregado_em: Instant,
}

pub struct CacheTtl<T> {
    ttl: Duration,
    entrada: Mutex<Option<Entrada<Arc<T>>>>,
}

impl<T> CacheTtl<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entrada: Mutex::new(None),
        }
    }

    /// Devolve o valor em cache enquanto ele for mais novo que o TTL;
    /// senão executa o `loader`. O mutex fica preso durante o reload, de
    /// propósito: chamadas concorrentes esperam e compartilham o mesmo
    /// resultado em vez de disparar N consultas iguais ao banco.
    pub async fn get_or_recarregar<F, Fut>(&self, loader: F) -> Result<Arc<T>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut guard = self.entrada.lock().await;

        if let Some(entrada) = guard.as_ref() {
            if entrada.carregado_em.elapsed() < self.ttl {
                return Ok(Arc::clone(&entrada.valor));
            }
        }

        let valor = Arc::new(loader().await?);
        *guard = Some(Entrada {
            valor: Arc::clone(&valor),
            carregado_em: Instant::now(),
        });

        Ok(valor)
    }

    /// Esvazia o cache. Chamado pelos caminhos de escrita que mudam as
    /// listagens (nova matrícula, edição de aluno, etc).
    pub async fn invalidar(&self) {
        *self.entrada.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn reusa_valor_dentro_do_ttl() {
        let cache = CacheTtl::new(Duration::from_secs(60));
        let chamadas = AtomicU32::new(0);

        for _ in 0..3 {
            let v = cache
                .get_or_recarregar(|| async {
                    chamadas.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(*v, vec![1, 2, 3]);
        }

        assert_eq!(chamadas.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recarrega_depois_do_ttl() {
        let cache = CacheTtl::new(Duration::from_millis(10));
        let chamadas = AtomicU32::new(0);

        let _ = cache
            .get_or_recarregar(|| async {
                chamadas.fetch_add(1, Ordering::SeqCst);
                Ok(1u32)
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        let _ = cache
            .get_or_recarregar(|| async {
                chamadas.fetch_add(1, Ordering::SeqCst);
                Ok(2u32)
            })
            .await
            .unwrap();

        assert_eq!(chamadas.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidar_forca_reload() {
        let cache = CacheTtl::new(Duration::from_secs(60));
        let chamadas = AtomicU32::new(0);

        let _ = cache
            .get_or_recarregar(|| async {
                chamadas.fetch_add(1, Ordering::SeqCst);
                Ok("a".to_string())
            })
            .await
            .unwrap();

        cache.invalidar().await;

        let v = cache
            .get_or_recarregar(|| async {
                chamadas.fetch_add(1, Ordering::SeqCst);
                Ok("b".to_string())
            })
            .await
            .unwrap();

        assert_eq!(*v, "b");
        assert_eq!(chamadas.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn erro_do_loader_nao_fica_em_cache() {
        let cache: CacheTtl<u32> = CacheTtl::new(Duration::from_secs(60));

        let erro = cache
            .get_or_recarregar(|| async { Err(AppError::AlunoNotFound) })
            .await;
        assert!(erro.is_err());

        let v = cache.get_or_recarregar(|| async { Ok(7u32) }).await.unwrap();
        assert_eq!(*v, 7);
    }
}
