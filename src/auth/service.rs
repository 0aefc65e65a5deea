//! Registration and login for Fileshelf.

use std::sync::Arc;

use chrono::Duration;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::password::{hash_password, verify_password};
use super::token::TokenCodec;
use super::validation::validate_registration;
use crate::config::AuthConfig;
use crate::db::{Identity, IdentityRepository, NewIdentity};
use crate::{Result, ShelfError};

/// Message for every login failure, whatever the cause.
const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            display_name: display_name.into(),
        }
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// Signed bearer token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub identity: Identity,
}

/// Orchestrates registration and login and issues tokens.
#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    codec: Arc<TokenCodec>,
    access_ttl: Duration,
    remember_ttl: Duration,
}

impl AuthService {
    /// Create a new AuthService.
    pub fn new(
        pool: SqlitePool,
        codec: Arc<TokenCodec>,
        access_ttl: Duration,
        remember_ttl: Duration,
    ) -> Self {
        Self {
            pool,
            codec,
            access_ttl,
            remember_ttl,
        }
    }

    /// Create an AuthService from the `[auth]` configuration section.
    pub fn from_config(pool: SqlitePool, config: &AuthConfig) -> Self {
        let codec = TokenCodec::new(&config.jwt_secret, config.issuer.clone());
        Self::new(
            pool,
            Arc::new(codec),
            Duration::seconds(config.access_token_ttl_secs),
            Duration::seconds(config.remember_me_ttl_secs),
        )
    }

    /// The codec used to sign and verify tokens.
    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// Register a new identity and issue an access token.
    ///
    /// New identities cannot upload until an administrator grants it.
    pub async fn register(&self, request: RegistrationRequest) -> Result<AuthOutcome> {
        let email = request.email.trim();
        let display_name = request.display_name.trim();

        validate_registration(email, &request.password, display_name)?;

        let repo = IdentityRepository::new(&self.pool);
        if repo.email_exists(email).await? {
            return Err(ShelfError::Conflict("email already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let identity = repo
            .create(&NewIdentity::new(email, display_name, password_hash))
            .await?;

        info!(identity_id = identity.id, email = %identity.email, "New identity registered");

        self.outcome(identity, self.access_ttl)
    }

    /// Verify credentials and issue a token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<AuthOutcome> {
        let identity = IdentityRepository::new(&self.pool)
            .get_by_email(email.trim())
            .await?;

        let Some(identity) = identity else {
            warn!("Login failed: unknown email");
            return Err(ShelfError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        };

        if verify_password(password, &identity.password_hash).is_err() {
            warn!(identity_id = identity.id, "Login failed: wrong password");
            return Err(ShelfError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let ttl = if remember_me {
            self.remember_ttl
        } else {
            self.access_ttl
        };

        info!(identity_id = identity.id, remember_me, "Login succeeded");
        self.outcome(identity, ttl)
    }

    /// Load the identity behind a token subject from the store.
    ///
    /// Capability checks must use this rather than the token claims, so that a
    /// capability revoked after issuance is honored.
    pub async fn current_identity(&self, subject_id: i64) -> Result<Identity> {
        IdentityRepository::new(&self.pool)
            .get_by_id(subject_id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("identity".to_string()))
    }

    fn outcome(&self, identity: Identity, ttl: Duration) -> Result<AuthOutcome> {
        let token = self.codec.issue(&identity, ttl)?;
        Ok(AuthOutcome {
            token,
            expires_in: ttl.num_seconds(),
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::require_upload;
    use crate::Database;

    const SECRET: &str = "test-secret-key-0123456789abcdef";

    async fn setup() -> (Database, AuthService) {
        let db = Database::open_in_memory().await.unwrap();
        let service = AuthService::new(
            db.pool().clone(),
            Arc::new(TokenCodec::new(SECRET, "fileshelf")),
            Duration::seconds(900),
            Duration::days(30),
        );
        (db, service)
    }

    #[tokio::test]
    async fn test_register_success() {
        let (_db, service) = setup().await;

        let outcome = service
            .register(RegistrationRequest::new(" a@x.com ", "pw12345678", " A "))
            .await
            .unwrap();

        assert_eq!(outcome.identity.email, "a@x.com");
        assert_eq!(outcome.identity.display_name, "A");
        assert!(!outcome.identity.can_upload);
        assert_ne!(outcome.identity.password_hash, "pw12345678");
        assert_eq!(outcome.expires_in, 900);

        let claims = service.codec().verify(&outcome.token).unwrap();
        assert_eq!(claims.sub, outcome.identity.id);
        assert!(!claims.can_upload);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_case_insensitive() {
        let (_db, service) = setup().await;

        service
            .register(RegistrationRequest::new("a@x.com", "pw12345678", "A"))
            .await
            .unwrap();
        let result = service
            .register(RegistrationRequest::new("A@X.COM", "pw87654321", "B"))
            .await;

        assert!(matches!(result, Err(ShelfError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_invalid_input() {
        let (_db, service) = setup().await;

        for (email, password, name) in [
            ("not-an-email", "pw12345678", "A"),
            ("a@x.com", "short", "A"),
            ("a@x.com", "pw12345678", "   "),
        ] {
            let result = service
                .register(RegistrationRequest::new(email, password, name))
                .await;
            assert!(matches!(result, Err(ShelfError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn test_login_ttl() {
        let (_db, service) = setup().await;
        service
            .register(RegistrationRequest::new("a@x.com", "pw12345678", "A"))
            .await
            .unwrap();

        let outcome = service.login("a@x.com", "pw12345678", false).await.unwrap();
        assert_eq!(outcome.expires_in, 900);
        let claims = service.codec().verify(&outcome.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 900);

        let outcome = service.login("A@x.com", "pw12345678", true).await.unwrap();
        assert_eq!(outcome.expires_in, 30 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_login_failures_are_symmetric() {
        let (_db, service) = setup().await;
        service
            .register(RegistrationRequest::new("a@x.com", "pw12345678", "A"))
            .await
            .unwrap();

        let wrong_password = service.login("a@x.com", "wrong-password", false).await;
        let unknown_email = service.login("b@x.com", "pw12345678", false).await;

        match (wrong_password, unknown_email) {
            (Err(ShelfError::Unauthenticated(a)), Err(ShelfError::Unauthenticated(b))) => {
                assert_eq!(a, b);
            }
            other => panic!("unexpected results: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_current_identity_sees_capability_changes() {
        let (db, service) = setup().await;
        let outcome = service
            .register(RegistrationRequest::new("a@x.com", "pw12345678", "A"))
            .await
            .unwrap();
        let id = outcome.identity.id;

        let identity = service.current_identity(id).await.unwrap();
        assert!(require_upload(&identity).is_err());

        IdentityRepository::new(db.pool())
            .set_can_upload(id, true)
            .await
            .unwrap();
        let identity = service.current_identity(id).await.unwrap();
        assert!(require_upload(&identity).is_ok());

        // the earlier token still claims no capability
        let claims = service.codec().verify(&outcome.token).unwrap();
        assert!(!claims.can_upload);
    }

    #[tokio::test]
    async fn test_current_identity_not_found() {
        let (_db, service) = setup().await;
        let result = service.current_identity(999).await;
        assert!(matches!(result, Err(ShelfError::NotFound(_))));
    }
}
