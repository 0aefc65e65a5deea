//! Bearer token identity middleware.
//!
//! The middleware only attaches identity. It never rejects a request:
//! handlers that need a caller use [`AuthUser`], which turns a missing
//! identity into 401.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{TokenClaims, TokenCodec};
use crate::web::error::ApiError;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware function that verifies the bearer token, if any, and stores
/// its claims in the request extensions.
pub async fn identity_auth(
    codec: Arc<TokenCodec>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let claims = bearer_token(request.headers()).and_then(|token| codec.verify(token));

    if let Some(claims) = claims {
        request.extensions_mut().insert(claims);
    }

    next.run(request).await
}

/// Extractor for authenticated callers.
///
/// The handler receives the verified token claims. Capability checks should
/// still load the identity from the store.
#[derive(Debug, Clone)]
pub struct AuthUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use axum_test::TestServer;
    use chrono::Duration;

    use crate::db::Identity;

    const SECRET: &str = "test-secret-key-0123456789abcdef";

    fn identity() -> Identity {
        Identity {
            id: 42,
            email: "a@x.com".to_string(),
            display_name: "A".to_string(),
            password_hash: "hash".to_string(),
            can_upload: false,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    async fn whoami(claims: Option<Extension<TokenClaims>>) -> String {
        claims
            .map(|Extension(c)| c.sub.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    async fn protected(AuthUser(claims): AuthUser) -> String {
        claims.email
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    fn server(codec: Arc<TokenCodec>) -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .route("/protected", get(protected))
            .layer(middleware::from_fn(move |req, next| {
                let codec = codec.clone();
                identity_auth(codec, req, next)
            }));
        TestServer::new(app).unwrap()
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let codec = Arc::new(TokenCodec::new(SECRET, "fileshelf"));
        let token = codec.issue(&identity(), Duration::seconds(60)).unwrap();
        let server = server(codec);

        let response = server
            .get("/whoami")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        response.assert_status_ok();
        response.assert_text("42");

        let response = server
            .get("/protected")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        response.assert_text("a@x.com");
    }

    #[tokio::test]
    async fn test_missing_or_invalid_token_proceeds_anonymously() {
        let codec = Arc::new(TokenCodec::new(SECRET, "fileshelf"));
        let expired = codec.issue(&identity(), Duration::seconds(-60)).unwrap();
        let server = server(codec);

        server.get("/whoami").await.assert_text("anonymous");

        let expired_header = format!("Bearer {expired}");
        for header in ["Bearer garbage", "Basic abc", expired_header.as_str()] {
            let response = server
                .get("/whoami")
                .add_header(AUTHORIZATION, HeaderValue::from_str(header).unwrap())
                .await;
            response.assert_status_ok();
            response.assert_text("anonymous");
        }
    }

    #[tokio::test]
    async fn test_auth_user_rejects_anonymous() {
        let codec = Arc::new(TokenCodec::new(SECRET, "fileshelf"));
        let server = server(codec);

        let response = server.get("/protected").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
