use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::SecurityConfig;
use crate::database::models::user::{NewUser, User};
use crate::database::{DatabaseError, UserRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(email: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            email: email.into(),
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Issues and verifies HS256 tokens with a shared secret
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiry_hours: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
    }

    pub fn issue(&self, email: &str) -> Result<String, JwtError> {
        self.encode(&Claims::new(email, self.expiry_hours))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Signature and expiry check, no leeway
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

/// bcrypt runs on the blocking pool so a hash never stalls a runtime worker
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))??;
    Ok(hash)
}

/// A malformed stored hash counts as a mismatch
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {}", e)))
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Auth internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Duplicate(_) => AuthError::DuplicateEmail,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthError::Internal(format!("password hashing failed: {}", err))
    }
}

/// Registration, login and token verification over the user store
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
    bcrypt_cost: u32,
    // Hash checked against when the email is unknown, so both login failures cost one verify
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn from_config(users: Arc<dyn UserRepository>, security: &SecurityConfig) -> Self {
        Self::new(users, TokenService::from_config(security), security.bcrypt_cost)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if self.users.email_exists(email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let dummy = self.dummy_hash().await?;
                verify_password(password, dummy).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&user.email)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok((user, token))
    }

    async fn dummy_hash(&self) -> Result<&str, AuthError> {
        let cost = self.bcrypt_cost;
        let hash = self
            .dummy_hash
            .get_or_try_init(|| hash_password("payment-api-placeholder", cost))
            .await?;
        Ok(hash.as_str())
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens
            .verify(token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryUsers;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Instant;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUsers::default()),
            TokenService::new("unit-test-secret", 2),
            4,
        )
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = service();
        let user = auth.register("jane@example.com", "s3cret").await.unwrap();
        assert!(user.id > 0);
        assert_ne!(user.password_hash, "s3cret");

        let (logged_in, token) = auth.login("jane@example.com", "s3cret").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.register("jane@example.com", "a").await.unwrap();
        let err = auth.register("jane@example.com", "b").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = service();
        auth.register("jane@example.com", "right").await.unwrap();

        let wrong = auth.login("jane@example.com", "wrong").await.unwrap_err();
        let unknown = auth.login("nobody@example.com", "right").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_email_still_pays_for_a_verify() {
        let auth = service();
        assert!(auth.dummy_hash.get().is_none());

        let err = auth.login("nobody@example.com", "whatever").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        // Placeholder hash exists and carries the configured cost
        let dummy = auth.dummy_hash.get().expect("placeholder hash initialized");
        assert!(dummy.starts_with("$2b$04$"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_does_not_stall_the_runtime() {
        let auth = AuthService::new(
            Arc::new(MemoryUsers::default()),
            TokenService::new("unit-test-secret", 2),
            10,
        );

        let max_gap_ms = Arc::new(AtomicU64::new(0));
        let ticker = {
            let max_gap_ms = max_gap_ms.clone();
            tokio::spawn(async move {
                let mut last = Instant::now();
                loop {
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                    let now = Instant::now();
                    let gap = now.duration_since(last).as_millis() as u64;
                    max_gap_ms.fetch_max(gap, Ordering::Relaxed);
                    last = now;
                }
            })
        };

        auth.register("jane@example.com", "s3cret").await.unwrap();
        auth.login("jane@example.com", "s3cret").await.unwrap();
        ticker.abort();

        let gap = max_gap_ms.load(Ordering::Relaxed);
        assert!(gap < 250, "runtime stalled for {}ms while hashing", gap);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("unit-test-secret", 2);
        let now = Utc::now().timestamp();
        let token = tokens
            .encode(&Claims {
                email: "jane@example.com".to_string(),
                iat: now - 7200,
                exp: now - 1,
            })
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenService::new("someone-else", 2).issue("jane@example.com").unwrap();
        let tokens = TokenService::new("unit-test-secret", 2);
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn empty_secret_cannot_issue_or_verify() {
        let tokens = TokenService::new("", 2);
        assert!(matches!(tokens.issue("jane@example.com"), Err(JwtError::InvalidSecret)));
        assert!(matches!(tokens.verify("a.b.c"), Err(JwtError::InvalidSecret)));
    }

    #[tokio::test]
    async fn password_hash_round_trip() {
        let hash = hash_password("hunter2", 4).await.unwrap();
        assert!(verify_password("hunter2", &hash).await.unwrap());
        assert!(!verify_password("hunter3", &hash).await.unwrap());
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash").await.unwrap());
    }
}
