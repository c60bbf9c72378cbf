use crate::config::{JwtConfig, TokenVerification};
use crate::error::app_error::AppError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

/// Identity attached to requests by the placeholder verifier.
pub const PLACEHOLDER_USER_ID: &str = "mock-user-id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,
    #[error("Bearer token is empty")]
    EmptyToken,
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    InvalidToken,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

/// Checks a presented bearer credential and resolves the caller.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Accepts any non-empty token. Token contents are not inspected.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderVerifier;

impl TokenVerifier for PlaceholderVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }

        Ok(Identity {
            user_id: PLACEHOLDER_USER_ID.to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// HS256 JWT verification against a shared secret.
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl JwtVerifier {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn issue_token(&self, subject: &str) -> Result<String, AuthError> {
        let now = unix_now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|_| AuthError::InvalidToken)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(Identity { user_id: data.claims.sub })
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

pub fn build_verifier(config: &JwtConfig) -> Arc<dyn TokenVerifier> {
    match config.verification {
        TokenVerification::Placeholder => {
            warn!("bearer tokens are not verified; every non-empty token maps to a placeholder identity");
            Arc::new(PlaceholderVerifier)
        }
        TokenVerification::Hmac => Arc::new(JwtVerifier::new(&config.secret, config.token_ttl_seconds)),
    }
}

/// Pulls the token out of an `Authorization` header value. The `Bearer`
/// scheme is optional. A bare `Bearer` counts as an empty token, since
/// HTTP parsers drop the trailing space of `Bearer `.
pub(crate) fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.map(str::trim).filter(|value| !value.is_empty()).ok_or(AuthError::MissingHeader)?;
    let token = match header.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => header,
    };

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    Ok(token)
}

/// Authenticated caller. Requires a bearer token accepted by the managed
/// [`TokenVerifier`]; otherwise the request fails with 401.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub user_id: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let result = extract_bearer(req.headers().get_one("Authorization")).and_then(|token| {
            match req.rocket().state::<Arc<dyn TokenVerifier>>() {
                Some(verifier) => verifier.verify(token),
                None => Err(AuthError::InvalidToken),
            }
        });

        match result {
            Ok(identity) => {
                let current_user = CurrentUser {
                    user_id: identity.user_id,
                };
                req.local_cache(|| Some(current_user.clone()));
                Outcome::Success(current_user)
            }
            Err(err) => {
                debug!(reason = %err, uri = %req.uri(), "rejected bearer token");
                req.local_cache(|| Some(err.clone()));
                Outcome::Error((Status::Unauthorized, err.into()))
            }
        }
    }
}
