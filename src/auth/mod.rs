// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authorization for every RPC routed through the gateway.
//!
//! ## Auth Flow
//!
//! 1. At startup the `authentication.rules` of the API config are compiled
//!    into an immutable [`AuthPolicy`] of anonymous and protected selectors.
//! 2. Per request, the [`middleware::authorize`] middleware maps the URL path
//!    `/Service/Method` to the selector `Service.Method` and:
//!    - forwards `OPTIONS` preflights, anonymous and unlisted paths;
//!    - on protected paths, verifies `Authorization: Bearer <token>` (HS256,
//!      shared `APP_KEY` secret) and checks `nbf` and `exp` when present.
//! 3. Verified [`Claims`] ride in the request extensions; handlers read them
//!    through the [`Auth`] / [`OptionalAuth`] extractors.
//!
//! ## Security
//!
//! - Rejections are a bare 401; the reason is only logged
//! - Paths listed nowhere are NOT protected (fail-open)
//! - The signing secret is never logged

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod policy;
pub mod selector;
pub mod token;

pub use claims::Claims;
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use policy::{Access, AuthPolicy};
pub use selector::{InvalidSelector, Matcher, MatcherSet};
pub use token::SigningSecret;
