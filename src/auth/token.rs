// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 bearer token issuing and verification.
//!
//! Verification checks structure and signature only. Expiration is left to
//! the caller, so a token without `exp` is accepted here.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use super::{claims::ISSUED_AT, AuthError, Claims};

/// Process-wide HMAC secret used to sign and verify tokens.
///
/// Loaded once at startup. Never printed: `Debug` is redacted.
#[derive(Clone, Default)]
pub struct SigningSecret(Arc<[u8]>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.0)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.0)
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    // `exp` and `nbf` are checked against `Claims` at sub-second precision.
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation
}

/// Verify a compact token against `secret` and return its claims.
pub fn verify(token: &str, secret: &SigningSecret) -> Result<Claims, AuthError> {
    let data = decode::<Map<String, Value>>(token, &secret.decoding_key(), &validation())?;
    Claims::from_map(data.claims)
}

/// Sign `claims` with `secret`, stamping `iat` with the current time.
pub fn issue(claims: Map<String, Value>, secret: &SigningSecret) -> Result<String, AuthError> {
    issue_at(claims, secret, Utc::now())
}

/// Like [`issue`], with an explicit issue time. Any caller-supplied `iat`
/// is overwritten.
pub fn issue_at(
    mut claims: Map<String, Value>,
    secret: &SigningSecret,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    claims.insert(ISSUED_AT.to_string(), Value::from(now.timestamp()));

    encode(&Header::new(Algorithm::HS256), &claims, &secret.encoding_key())
        .map_err(|e| AuthError::SigningFailed(e.to_string()))
}
