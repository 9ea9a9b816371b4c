//! Bearer-token authentication
//!
//! Tokens are HS256 JWTs whose `sub` claim is the member's account id.

use actix_web::{dev::Payload, http::{header, StatusCode}, web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;
use crate::models::ErrorResponse;

/// Errors that can occur while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Authentication is not configured")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: self.to_string(),
            status_code: self.status_code().as_u16(),
        })
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Token verifier (and issuer, for tooling and tests)
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
}

impl JwtAuth {
    pub fn new(secret: &str, issuer: Option<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }

    /// Issue a token for `owner_id` valid for `ttl_secs`
    pub fn issue(&self, owner_id: &str, ttl_secs: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: owner_id.to_string(),
            exp: (chrono::Utc::now().timestamp() + ttl_secs).max(0) as usize,
            iss: self.issuer.clone(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

/// Extractor for the authenticated caller
#[derive(Debug, Clone)]
pub struct AuthenticatedMember {
    pub owner_id: String,
}

impl FromRequest for AuthenticatedMember {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedMember, AuthError> {
    let auth = req
        .app_data::<web::Data<JwtAuth>>()
        .ok_or(AuthError::NotConfigured)?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = auth.verify(token)?;
    tracing::trace!("Authenticated account {}", claims.sub);

    Ok(AuthenticatedMember { owner_id: claims.sub })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let auth = JwtAuth::new("secret", None);
        let token = auth.issue("acct-1", 60).unwrap();

        assert_eq!(auth.verify(&token).unwrap().sub, "acct-1");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtAuth::new("secret", None).issue("acct-1", 60).unwrap();
        let other = JwtAuth::new("other", None);

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = JwtAuth::new("secret", None);
        let token = auth.issue("acct-1", -3600).unwrap();

        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn test_issuer_enforced() {
        let issuer = JwtAuth::new("secret", Some("rapport".to_string()));
        let anonymous = JwtAuth::new("secret", None);

        let token = anonymous.issue("acct-1", 60).unwrap();
        assert!(issuer.verify(&token).is_err());

        let token = issuer.issue("acct-1", 60).unwrap();
        assert_eq!(issuer.verify(&token).unwrap().iss.as_deref(), Some("rapport"));
    }
}
