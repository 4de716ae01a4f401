// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthPolicy, SigningSecret};
use crate::config::Environment;

/// Shared, read-only request state.
#[derive(Clone, Default)]
pub struct AppState {
    pub policy: Arc<AuthPolicy>,
    pub secret: SigningSecret,
    pub environment: Environment,
}

impl AppState {
    pub fn new(policy: AuthPolicy, secret: SigningSecret) -> Self {
        Self {
            policy: Arc::new(policy),
            secret,
            environment: Environment::default(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}
