// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Service Configuration Document
//!
//! The gateway reads its authentication rules from the service's API
//! configuration document (a `google.api.Service` YAML or JSON file).
//! Only the `authentication.rules` section is modelled; every other field of
//! the document is ignored.
//!
//! ```yaml
//! type: google.api.Service
//! authentication:
//!   rules:
//!     - selector: TestService.Test
//!       allowWithoutCredential: true
//!     - selector: TestService.*
//!       requirements:
//!         - providerId: maritima
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigLoadPolicy;

/// Required value of the document's top-level `type` field.
pub const SERVICE_CONFIG_TYPE: &str = "google.api.Service";

#[derive(Debug, thiserror::Error)]
pub enum ServiceConfigError {
    #[error("Cannot read the API config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse the API config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid API config type: {0:?}")]
    InvalidType(Option<String>),
}

/// Parsed service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(rename = "type", default)]
    pub config_type: Option<String>,

    #[serde(default)]
    pub authentication: Authentication,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authentication {
    #[serde(default)]
    pub rules: Vec<AuthenticationRule>,
}

/// One entry of `authentication.rules`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRule {
    #[serde(default)]
    pub selector: String,

    #[serde(default, alias = "allow_without_credential")]
    pub allow_without_credential: bool,

    #[serde(default)]
    pub requirements: Vec<AuthRequirement>,
}

/// A credential requirement naming an authentication provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequirement {
    #[serde(default, alias = "provider_id")]
    pub provider_id: String,

    #[serde(default)]
    pub audiences: Option<String>,
}

impl AuthenticationRule {
    pub fn anonymous(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            allow_without_credential: true,
            requirements: Vec::new(),
        }
    }

    pub fn requiring(selector: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            allow_without_credential: false,
            requirements: vec![AuthRequirement {
                provider_id: provider_id.into(),
                audiences: None,
            }],
        }
    }

    /// Whether any requirement of this rule names `provider_id`.
    pub fn requires_provider(&self, provider_id: &str) -> bool {
        self.requirements.iter().any(|r| r.provider_id == provider_id)
    }
}

impl ServiceConfig {
    /// Parse a YAML (or JSON) document.
    ///
    /// The whole document is rejected unless `type` equals
    /// [`SERVICE_CONFIG_TYPE`].
    pub fn from_yaml(source: &str) -> Result<Self, ServiceConfigError> {
        let config: ServiceConfig = serde_yaml::from_str(source)?;

        match config.config_type.as_deref() {
            Some(SERVICE_CONFIG_TYPE) => Ok(config),
            other => Err(ServiceConfigError::InvalidType(other.map(str::to_string))),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ServiceConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    /// Load the document, degrading to an empty configuration on failure
    /// when `policy` is [`ConfigLoadPolicy::Lenient`].
    pub fn load_with_policy(
        path: &Path,
        policy: ConfigLoadPolicy,
    ) -> Result<Self, ServiceConfigError> {
        match Self::load(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    rules = config.authentication.rules.len(),
                    "Loaded API config"
                );
                Ok(config)
            }
            Err(e) if policy == ConfigLoadPolicy::Lenient => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Cannot load the API config, continuing with an empty auth policy"
                );
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
type: google.api.Service
config_version: 3
name: test.endpoints.example.cloud.goog
authentication:
  rules:
    - selector: TestService.Test
      allowWithoutCredential: true
    - selector: TestService.*
      requirements:
        - providerId: maritima
        - provider_id: firebase
"#;

    #[test]
    fn parses_rules_and_ignores_unknown_fields() {
        let config = ServiceConfig::from_yaml(SAMPLE).unwrap();
        let rules = &config.authentication.rules;

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector, "TestService.Test");
        assert!(rules[0].allow_without_credential);
        assert!(rules[1].requires_provider("maritima"));
        assert!(rules[1].requires_provider("firebase"));
        assert!(!rules[1].requires_provider("other"));
    }

    #[test]
    fn accepts_json_documents() {
        let json = r#"{"type":"google.api.Service","authentication":{"rules":[{"selector":"*","allow_without_credential":true}]}}"#;
        let config = ServiceConfig::from_yaml(json).unwrap();
        assert!(config.authentication.rules[0].allow_without_credential);
    }

    #[test]
    fn rejects_wrong_type() {
        let err = ServiceConfig::from_yaml("type: something.Else\n").unwrap_err();
        assert!(matches!(err, ServiceConfigError::InvalidType(Some(t)) if t == "something.Else"));

        let err = ServiceConfig::from_yaml("authentication: {}\n").unwrap_err();
        assert!(matches!(err, ServiceConfigError::InvalidType(None)));
    }

    #[test]
    fn lenient_load_of_missing_file_is_empty() {
        let path = Path::new("/nonexistent/maritima/api-config.yaml");

        let config = ServiceConfig::load_with_policy(path, ConfigLoadPolicy::Lenient).unwrap();
        assert!(config.authentication.rules.is_empty());

        let err = ServiceConfig::load_with_policy(path, ConfigLoadPolicy::Strict).unwrap_err();
        assert!(matches!(err, ServiceConfigError::Io(_)));
    }
}
