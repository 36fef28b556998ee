// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::{env, time::Duration};

use crate::{
    clients::{evolution::EvolutionClient, mailer::Mailer, mercadopago::MercadoPagoClient, openai::OpenAiClient},
    common::cache::CacheTtl,
    db::{
        AlunoRepository, ConfiguracaoRepository, MatriculaRepository, PagamentoRepository,
        PedidoRepository, UsuarioRepository,
    },
    models::aluno::Aluno,
    services::{
        auth::AuthService, chatbot_service::ChatbotService, matricula_service::MatriculaService,
        notificacao_service::NotificacaoService, pagamento_service::PagamentoService,
        rate_limit::RateLimiter,
    },
};

const TTL_LISTAGENS: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,

    // Repositórios acessados direto pelos handlers de CRUD simples
    pub aluno_repo: AlunoRepository,
    pub matricula_repo: MatriculaRepository,
    pub pedido_repo: PedidoRepository,
    pub pagamento_repo: PagamentoRepository,
    pub config_repo: ConfiguracaoRepository,

    // Serviços com regra de negócio
    pub auth_service: AuthService,
    pub matricula_service: MatriculaService,
    pub pagamento_service: PagamentoService,
    pub notificacao_service: NotificacaoService,
    pub chatbot_service: ChatbotService,

    // Listagens do painel, atrás de um cache com TTL
    pub cache_pendentes: Arc<CacheTtl<Vec<Aluno>>>,
    pub cache_matriculados: Arc<CacheTtl<Vec<Aluno>>>,

    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let mp_access_token =
            env::var("MP_ACCESS_TOKEN").expect("MP_ACCESS_TOKEN deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Clientes externos ---
        let mercadopago = MercadoPagoClient::new(mp_access_token);

        // Evolution, SMTP e OpenAI são opcionais: sem as variáveis, o
        // recurso fica desligado (e logado), mas o servidor sobe.
        let evolution = match (
            env::var("EVOLUTION_API_URL"),
            env::var("EVOLUTION_INSTANCE"),
            env::var("EVOLUTION_API_KEY"),
        ) {
            (Ok(url), Ok(instance), Ok(key)) => Some(EvolutionClient::new(url, instance, key)),
            _ => {
                tracing::warn!("Evolution API não configurada; WhatsApp desativado");
                None
            }
        };

        let mailer = match (
            env::var("SMTP_HOST"),
            env::var("SMTP_USER"),
            env::var("SMTP_PASS"),
            env::var("SMTP_FROM"),
        ) {
            (Ok(host), Ok(user), Ok(pass), Ok(from)) => Some(Mailer::new(&host, user, pass, from)?),
            _ => {
                tracing::warn!("SMTP não configurado; e-mail desativado");
                None
            }
        };

        let openai = match env::var("OPENAI_API_KEY") {
            Ok(key) => Some(OpenAiClient::new(key)),
            Err(_) => {
                tracing::warn!("OPENAI_API_KEY ausente; chatbot desativado");
                None
            }
        };

        let webhook_base_url = env::var("PUBLIC_BASE_URL").ok();

        // --- Monta o grafo de dependências ---
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let aluno_repo = AlunoRepository::new(db_pool.clone());
        let matricula_repo = MatriculaRepository::new(db_pool.clone());
        let pedido_repo = PedidoRepository::new(db_pool.clone());
        let pagamento_repo = PagamentoRepository::new(db_pool.clone());
        let config_repo = ConfiguracaoRepository::new(db_pool.clone());

        let auth_service = AuthService::new(usuario_repo, jwt_secret);
        let matricula_service =
            MatriculaService::new(aluno_repo.clone(), matricula_repo.clone(), db_pool.clone());
        let pagamento_service = PagamentoService::new(
            pagamento_repo.clone(),
            aluno_repo.clone(),
            mercadopago,
            webhook_base_url,
        );
        let notificacao_service = NotificacaoService::new(
            evolution,
            mailer,
            aluno_repo.clone(),
            config_repo.clone(),
        );
        let chatbot_service = ChatbotService::new(
            openai,
            aluno_repo.clone(),
            pedido_repo.clone(),
            pagamento_repo.clone(),
        );

        Ok(Self {
            db_pool,
            aluno_repo,
            matricula_repo,
            pedido_repo,
            pagamento_repo,
            config_repo,
            auth_service,
            matricula_service,
            pagamento_service,
            notificacao_service,
            chatbot_service,
            cache_pendentes: Arc::new(CacheTtl::new(TTL_LISTAGENS)),
            cache_matriculados: Arc::new(CacheTtl::new(TTL_LISTAGENS)),
            rate_limiter: RateLimiter::new(),
        })
    }

    // Escritas que mudam as listagens do painel derrubam os dois caches.
    pub async fn invalidar_caches(&self) {
        self.cache_pendentes.invalidar().await;
        self.cache_matriculados.invalidar().await;
    }
}
