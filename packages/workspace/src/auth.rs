//! # Authorization Gate
//!
//! Validates the credential attached to a mutating request before anything
//! touches the store.
//!
//! Two schemes implement [`CredentialValidator`]:
//! - [`UnsignedClaimsValidator`]: base64-encoded JSON claims. Nothing is
//!   verified cryptographically; anyone can mint such a token.
//! - [`SignedTokenValidator`]: HS256 JWT with the same claims.
//!
//! Both check presence, expiry (Unix seconds) and the required role.

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
    Engine as _,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No credential supplied")]
    MissingCredential,

    #[error("Malformed credential: {0}")]
    Malformed(String),

    #[error("Credential is missing the '{0}' claim")]
    MissingField(&'static str),

    #[error("Credential expired at {expired_at}")]
    Expired { expired_at: i64 },

    #[error("Role '{actual}' does not grant '{required}'")]
    InsufficientRole { required: String, actual: String },
}

impl AuthError {
    /// Stable reason code
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::Malformed(_) => "malformed_credential",
            AuthError::MissingField(_) => "missing_claim",
            AuthError::Expired { .. } => "expired",
            AuthError::InsufficientRole { .. } => "insufficient_role",
        }
    }

    /// Whether the caller is known but lacks privilege
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::InsufficientRole { .. })
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Validated credential claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (editor identity)
    pub sub: String,

    pub role: String,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

/// Claims as they appear on the wire, before presence checks
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default, alias = "subject")]
    sub: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default, alias = "expiry")]
    exp: Option<i64>,
}

impl RawClaims {
    fn check(self, required_role: &str, now: i64) -> AuthResult<Claims> {
        let sub = self.sub.ok_or(AuthError::MissingField("sub"))?;
        let role = self.role.ok_or(AuthError::MissingField("role"))?;
        let exp = self.exp.ok_or(AuthError::MissingField("exp"))?;

        if exp < now {
            return Err(AuthError::Expired { expired_at: exp });
        }
        if role != required_role {
            return Err(AuthError::InsufficientRole {
                required: required_role.to_string(),
                actual: role,
            });
        }

        Ok(Claims { sub, role, exp })
    }
}

pub trait CredentialValidator: Send + Sync {
    /// Role a credential must carry to mutate content
    fn required_role(&self) -> &str;

    /// Validate against an explicit clock (Unix seconds)
    fn validate_at(&self, token: Option<&str>, now: i64) -> AuthResult<Claims>;

    fn validate(&self, token: Option<&str>) -> AuthResult<Claims> {
        self.validate_at(token, chrono::Utc::now().timestamp())
    }
}

fn present(token: Option<&str>) -> AuthResult<&str> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingCredential)
}

/// Base64 JSON claims, unsigned
#[derive(Debug, Clone)]
pub struct UnsignedClaimsValidator {
    required_role: String,
}

impl UnsignedClaimsValidator {
    pub fn new(required_role: impl Into<String>) -> Self {
        Self {
            required_role: required_role.into(),
        }
    }

    /// Encode claims the way this scheme expects them (standard base64)
    pub fn encode(claims: &Claims) -> String {
        let json = serde_json::to_vec(claims).unwrap_or_default();
        STANDARD.encode(json)
    }
}

fn decode_base64(token: &str) -> AuthResult<Vec<u8>> {
    [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(token).ok())
        .ok_or_else(|| AuthError::Malformed("not base64".to_string()))
}

impl CredentialValidator for UnsignedClaimsValidator {
    fn required_role(&self) -> &str {
        &self.required_role
    }

    fn validate_at(&self, token: Option<&str>, now: i64) -> AuthResult<Claims> {
        let token = present(token)?;
        let bytes = decode_base64(token)?;
        let raw: RawClaims =
            serde_json::from_slice(&bytes).map_err(|e| AuthError::Malformed(e.to_string()))?;
        raw.check(&self.required_role, now)
    }
}

/// HS256 JWT carrying the same claims
#[derive(Clone)]
pub struct SignedTokenValidator {
    required_role: String,
    decoding_key: DecodingKey,
}

impl SignedTokenValidator {
    pub fn new(secret: &str, required_role: impl Into<String>) -> Self {
        Self {
            required_role: required_role.into(),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl CredentialValidator for SignedTokenValidator {
    fn required_role(&self) -> &str {
        &self.required_role
    }

    fn validate_at(&self, token: Option<&str>, now: i64) -> AuthResult<Claims> {
        let token = present(token)?;

        // Expiry is checked below against the injected clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<RawClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AuthError::Malformed("invalid signature".to_string())
                }
                _ => AuthError::Malformed(e.to_string()),
            }
        })?;

        data.claims.check(&self.required_role, now)
    }
}
