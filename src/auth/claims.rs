// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AuthError;

/// Issued-at claim name.
pub const ISSUED_AT: &str = "iat";
/// Expiration claim name.
pub const EXPIRES_AT: &str = "exp";
/// Not-before claim name.
pub const NOT_BEFORE: &str = "nbf";

/// Claims of a verified bearer token.
///
/// Attached to the request extensions by the gateway and dropped with the
/// request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Wrap a claim map, rejecting non-numeric registered timestamps.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, AuthError> {
        for key in [ISSUED_AT, EXPIRES_AT, NOT_BEFORE] {
            if let Some(value) = map.get(key) {
                if numeric_seconds(value).is_none() {
                    return Err(AuthError::MalformedToken);
                }
            }
        }
        Ok(Self(map))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Subject (`sub`), if present and a string.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// `iat` as a timestamp; `None` when absent or outside chrono's range.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.seconds(ISSUED_AT).and_then(to_datetime)
    }

    /// `exp` as a timestamp; `None` when absent or outside chrono's range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.seconds(EXPIRES_AT).and_then(to_datetime)
    }

    /// `nbf` as a timestamp; `None` when absent or outside chrono's range.
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.seconds(NOT_BEFORE).and_then(to_datetime)
    }

    /// A token without `exp` never expires; otherwise it is live strictly
    /// before `exp`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        match self.seconds(EXPIRES_AT) {
            Some(exp) => epoch_seconds(now) < exp,
            None => true,
        }
    }

    /// A token without `nbf` is active immediately; otherwise from `nbf`
    /// onwards.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.seconds(NOT_BEFORE) {
            Some(nbf) => epoch_seconds(now) >= nbf,
            None => true,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn seconds(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(numeric_seconds)
    }
}

/// A JSON NumericDate: seconds since the epoch, possibly fractional, with no
/// upper bound.
fn numeric_seconds(value: &Value) -> Option<f64> {
    value.as_f64().filter(|secs| secs.is_finite())
}

fn epoch_seconds(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}

fn to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    let millis = (secs * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}
