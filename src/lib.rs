// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maritima Gateway - Request Authorization Gateway
//!
//! This crate provides an axum middleware that decides, per request, whether
//! a caller must present a signed bearer token, verifies it, and hands the
//! verified claims to downstream handlers.
//!
//! ## Modules
//!
//! - `api` - HTTP surface and middleware composition (Axum)
//! - `auth` - Selector compilation, auth policy, token verification, gateway
//! - `config` - Environment configuration
//! - `service_config` - API configuration document (`authentication.rules`)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod service_config;
pub mod state;
