use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::Duration;
use rand::rngs::OsRng;
use models::admin::normalize_email;
use tracing::{debug, info, instrument, warn};

use super::domain::{AdminAccount, LoginInput, RegisterInput, TokenPair};
use super::errors::AuthError;
use super::lockout::{Clock, LockoutPolicy, LoginAttempts};
use super::repository::AdminRepository;
use super::tokens::{TokenIssuer, TokenKind};

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub lockout: LockoutPolicy,
}

impl AuthConfig {
    pub fn with_secret(secret: &str) -> Self {
        Self {
            jwt_secret: secret.to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(30),
            lockout: LockoutPolicy::default(),
        }
    }
}

impl From<&configs::AuthSettings> for AuthConfig {
    fn from(s: &configs::AuthSettings) -> Self {
        Self {
            jwt_secret: s.jwt_secret.clone(),
            access_ttl: Duration::minutes(s.access_token_minutes),
            refresh_ttl: Duration::days(s.refresh_token_days),
            lockout: LockoutPolicy {
                max_failed_attempts: s.max_failed_attempts,
                window: Duration::minutes(s.lockout_minutes),
            },
        }
    }
}

/// Admin auth business service independent of web framework
pub struct AuthService<R: AdminRepository> {
    repo: Arc<R>,
    tokens: TokenIssuer,
    attempts: LoginAttempts,
}

impl<R: AdminRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        let attempts = LoginAttempts::new(cfg.lockout);
        Self::build(repo, cfg, attempts)
    }

    /// Same as [`AuthService::new`] with a caller-supplied clock for the lockout window.
    pub fn with_clock(repo: Arc<R>, cfg: AuthConfig, clock: Clock) -> Self {
        let attempts = LoginAttempts::with_clock(cfg.lockout, clock);
        Self::build(repo, cfg, attempts)
    }

    fn build(repo: Arc<R>, cfg: AuthConfig, attempts: LoginAttempts) -> Self {
        let tokens = TokenIssuer::new(&cfg.jwt_secret, cfg.access_ttl, cfg.refresh_ttl);
        Self { repo, tokens, attempts }
    }

    pub fn attempts(&self) -> &LoginAttempts { &self.attempts }

    /// Register a new admin with an Argon2 password hash.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAdminRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAdminRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::with_secret("secret"));
    /// let input = RegisterInput { name: "Admin".into(), email: "admin@example.com".into(), password: "Secret123".into() };
    /// let admin = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(admin.email, "admin@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AdminAccount, AuthError> {
        let name = input.name.trim();
        let email = normalize_email(&input.email);
        let email = email.as_str();
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".into()));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("invalid email".into()));
        }
        if input.password.chars().count() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if self.repo.exists_with_name_or_email(name, email).await? {
            debug!("admin exists: {}", email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let admin = self.repo.create_admin(name, email, hash).await?;
        info!(admin_id = admin.id, email = %admin.email, "admin_registered");
        Ok(admin)
    }

    /// Authenticate an admin and issue an access/refresh token pair.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAdminRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAdminRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::with_secret("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let pair = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert!(!pair.access_token.is_empty());
    /// assert!(!pair.refresh_token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<TokenPair, AuthError> {
        let email = normalize_email(&input.email);
        let email = email.as_str();
        if self.attempts.is_locked(email) {
            warn!("login rejected: account locked");
            return Err(AuthError::Locked);
        }

        let Some(record) = self.repo.find_by_email(email).await? else {
            self.attempts.record_failure(email);
            return Err(AuthError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&record.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            self.attempts.record_failure(email);
            debug!(failed = self.attempts.failed_attempts(email), "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        self.attempts.clear(email);
        let access_token = self.tokens.issue_for(TokenKind::Access, &record.account)?;
        let refresh_token = self.tokens.issue_for(TokenKind::Refresh, &record.account)?;
        info!(admin_id = record.account.id, "admin_logged_in");
        Ok(TokenPair { access_token, refresh_token })
    }

    /// Exchange a valid refresh token for a new access token.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        self.tokens.issue(TokenKind::Access, &claims.sub, &claims.email)
    }
}
