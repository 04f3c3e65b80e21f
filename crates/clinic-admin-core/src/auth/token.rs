//! Compact HS256 JSON Web Tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::{AuthError, Identity};
use crate::models::Role;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

/// Token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub role: Role,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Issues and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Issue a token for `user_id` valid from now.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(user_id, role, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: &str, role: Role, now: i64) -> Result<String, AuthError> {
        let header = JwtHeader {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let exp = now.checked_add(self.ttl_secs).ok_or(AuthError::Lifetime)?;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now,
            exp,
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let message = format!("{header_b64}.{claims_b64}");

        let signature = self.mac(&message)?.finalize().into_bytes();
        Ok(format!("{message}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Verify a token and resolve it to an identity.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, AuthError> {
        let parts: Vec<&str> = token.trim().split('.').collect();
        let [header_b64, claims_b64, signature_b64] = parts[..] else {
            return Err(AuthError::Malformed);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::Malformed)?;
        self.mac(&format!("{header_b64}.{claims_b64}"))?
            .verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        let header: JwtHeader = URL_SAFE_NO_PAD
            .decode(header_b64)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(AuthError::Malformed)?;
        if header.alg != "HS256" {
            return Err(AuthError::Malformed);
        }

        let claims: Claims = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(AuthError::Malformed)?;
        if claims.exp <= now {
            return Err(AuthError::Expired);
        }

        Ok(Identity {
            user_id: claims.sub,
            role: claims.role,
        })
    }

    fn mac(&self, message: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|_| AuthError::Key)?;
        mac.update(message.as_bytes());
        Ok(mac)
    }
}
