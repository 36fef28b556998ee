// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::auth::{Claims, CreateUsuarioPayload, Usuario},
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository, jwt_secret: String) -> Self {
        Self { usuario_repo, jwt_secret }
    }

    pub async fn login(&self, username: &str, senha: &str) -> Result<(String, Usuario), AppError> {
        // A mesma mensagem de erro para usuário inexistente e senha errada.
        let usuario = self
            .usuario_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let senha_clone = senha.to_owned();
        let hash_clone = usuario.senha_hash.clone();

        // bcrypt é caro; roda fora do executor async.
        let senha_confere = tokio::task::spawn_blocking(move || verify(&senha_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_confere {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(usuario.id)?;
        Ok((token, usuario))
    }

    pub async fn create_usuario(&self, payload: &CreateUsuarioPayload) -> Result<Usuario, AppError> {
        let senha_clone = payload.senha.clone();
        let senha_hash = tokio::task::spawn_blocking(move || hash(&senha_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.usuario_repo
            .create(&payload.username, &payload.email, &payload.nome_completo, &senha_hash)
            .await
    }

    pub async fn list_usuarios(&self) -> Result<Vec<Usuario>, AppError> {
        self.usuario_repo.list_all().await
    }

    // O painel não pode ficar sem nenhum usuário capaz de logar.
    pub async fn delete_usuario(&self, id: Uuid) -> Result<(), AppError> {
        if self.usuario_repo.count().await? <= 1 {
            return Err(AppError::LastUserRemoval);
        }

        let removidos = self.usuario_repo.delete(id).await?;
        if removidos == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.usuario_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, usuario_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: usuario_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
