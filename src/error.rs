// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Startup errors.

use crate::config::ConfigError;
use crate::service_config::ServiceConfigError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ServiceConfig(#[from] ServiceConfigError),

    #[error("APP_KEY must be set in production")]
    MissingSigningSecret,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
