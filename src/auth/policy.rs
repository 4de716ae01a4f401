// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authentication policy: which paths bypass the gateway and which must
//! carry a valid bearer token.
//!
//! The policy is built once at startup and shared read-only (behind an
//! `Arc`) by every request.

use super::selector::{Matcher, MatcherSet};
use crate::service_config::{AuthenticationRule, ServiceConfig};

/// Provider id honoured by default in rule requirements.
pub const DEFAULT_PROVIDER_ID: &str = "maritima";

/// Access category of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Listed as `allowWithoutCredential`; never checked.
    Anonymous,
    /// Requires a valid, unexpired bearer token.
    Protected,
    /// Not listed at all; forwarded without checks.
    Unlisted,
}

#[derive(Debug, Clone, Default)]
pub struct AuthPolicy {
    allow_anonymous: MatcherSet,
    require_auth: MatcherSet,
}

impl AuthPolicy {
    /// Build the policy from authentication rules.
    ///
    /// Rules with a malformed selector are logged and skipped. Requirements
    /// naming a provider other than `provider_id` are ignored.
    pub fn build(rules: &[AuthenticationRule], provider_id: &str) -> Self {
        let mut allow_anonymous = MatcherSet::default();
        let mut require_auth = MatcherSet::default();

        for rule in rules {
            let target = if rule.allow_without_credential {
                &mut allow_anonymous
            } else if rule.requires_provider(provider_id) {
                &mut require_auth
            } else {
                continue;
            };

            match Matcher::compile(&rule.selector) {
                Ok(matcher) => target.insert(matcher),
                Err(e) => tracing::warn!(
                    selector = %rule.selector,
                    anonymous = rule.allow_without_credential,
                    error = %e,
                    "Skipping invalid auth rule"
                ),
            }
        }

        allow_anonymous.collapse();
        require_auth.collapse();

        tracing::debug!(
            anonymous = allow_anonymous.len(),
            protected = require_auth.len(),
            provider_id,
            "Built auth policy"
        );

        Self {
            allow_anonymous,
            require_auth,
        }
    }

    pub fn from_service_config(config: &ServiceConfig, provider_id: &str) -> Self {
        Self::build(&config.authentication.rules, provider_id)
    }

    /// Classify a path in selector form. Anonymous access wins over
    /// protection.
    pub fn classify(&self, path: &str) -> Access {
        if self.allow_anonymous.matches(path) {
            Access::Anonymous
        } else if self.require_auth.matches(path) {
            Access::Protected
        } else {
            Access::Unlisted
        }
    }

    pub fn allow_anonymous(&self) -> &MatcherSet {
        &self.allow_anonymous
    }

    pub fn require_auth(&self) -> &MatcherSet {
        &self.require_auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<AuthenticationRule> {
        vec![
            AuthenticationRule::anonymous("TestService.Test"),
            AuthenticationRule::requiring("TestService.*", DEFAULT_PROVIDER_ID),
            AuthenticationRule::requiring("Billing.*", "firebase"),
        ]
    }

    #[test]
    fn anonymous_takes_precedence() {
        let policy = AuthPolicy::build(&rules(), DEFAULT_PROVIDER_ID);

        assert_eq!(policy.classify("TestService.Test"), Access::Anonymous);
        assert_eq!(policy.classify("TestService.Test2"), Access::Protected);
    }

    #[test]
    fn foreign_provider_rules_are_ignored() {
        let policy = AuthPolicy::build(&rules(), DEFAULT_PROVIDER_ID);

        assert_eq!(policy.classify("Billing.Charge"), Access::Unlisted);
        assert_eq!(policy.require_auth().len(), 1);
    }

    #[test]
    fn own_provider_id_is_configurable() {
        let policy = AuthPolicy::build(&rules(), "firebase");

        assert_eq!(policy.classify("Billing.Charge"), Access::Protected);
        assert_eq!(policy.classify("TestService.Test2"), Access::Unlisted);
    }

    #[test]
    fn invalid_selectors_are_skipped() {
        let mut rules = rules();
        rules.push(AuthenticationRule::requiring("a**b", DEFAULT_PROVIDER_ID));
        rules.push(AuthenticationRule::requiring("", DEFAULT_PROVIDER_ID));
        rules.push(AuthenticationRule::anonymous("a*b"));

        let policy = AuthPolicy::build(&rules, DEFAULT_PROVIDER_ID);

        assert_eq!(policy.allow_anonymous().len(), 1);
        assert_eq!(policy.require_auth().len(), 1);
        assert_eq!(policy.classify("TestService.Test"), Access::Anonymous);
        assert_eq!(policy.classify("TestService.Test2"), Access::Protected);
    }

    #[test]
    fn wildcard_rule_collapses_set() {
        let rules = vec![
            AuthenticationRule::requiring("Foo.Bar", DEFAULT_PROVIDER_ID),
            AuthenticationRule::requiring("*", DEFAULT_PROVIDER_ID),
            AuthenticationRule::requiring("Baz.*", DEFAULT_PROVIDER_ID),
        ];
        let policy = AuthPolicy::build(&rules, DEFAULT_PROVIDER_ID);

        assert!(policy.require_auth().matches_everything());
        assert_eq!(policy.require_auth().len(), 1);
        assert_eq!(policy.classify("Anything.Else"), Access::Protected);
    }

    #[test]
    fn empty_policy_leaves_everything_unlisted() {
        let policy = AuthPolicy::default();
        assert_eq!(policy.classify("TestService.Test"), Access::Unlisted);
    }
}
