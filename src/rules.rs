//! Per-collection rules configuration, loaded from TOML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::policy::{self, Decision, DenyReason, Operation};
use crate::request::Principal;

/// Default owner field on bill documents.
pub const DEFAULT_OWNER_FIELD: &str = "user_id";

/// Collection protected by the default rules.
pub const BILLS_COLLECTION: &str = "Bills";

fn default_owner_field() -> String {
    DEFAULT_OWNER_FIELD.to_string()
}

/// Rule for a single collection: only the owner may read or write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRule {
    /// Collection name, e.g. `Bills`.
    pub name: String,

    /// Document field that holds the owner id.
    #[serde(default = "default_owner_field")]
    pub owner_field: String,
}

impl CollectionRule {
    /// Creates a rule with the default owner field.
    pub fn owner_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner_field: default_owner_field(),
        }
    }
}

/// The full rule set.
///
/// Collections without a rule deny every request.
///
/// # Examples
///
/// ```
/// use billwise_rules::{Decision, DenyReason, Operation, Principal, Rules};
///
/// let rules = Rules::parse(r#"
///     [[collections]]
///     name = "Bills"
///     owner_field = "user_id"
/// "#).unwrap();
///
/// let alice = Principal::new("alice");
/// assert!(rules.check(Some(&alice), "Bills", "alice", Operation::Read).is_permitted());
/// assert_eq!(
///     rules.check(Some(&alice), "Receipts", "alice", Operation::Read),
///     Decision::Denied(DenyReason::NoMatchingRule),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Protected collections.
    #[serde(default)]
    pub collections: Vec<CollectionRule>,
}

impl Default for Rules {
    /// Owner-only access on `Bills`, keyed by `user_id`.
    fn default() -> Self {
        Self {
            collections: vec![CollectionRule::owner_only(BILLS_COLLECTION)],
        }
    }
}

impl Rules {
    /// Load rules from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse rules from a TOML string and validate them.
    pub fn parse(content: &str) -> Result<Self, RulesError> {
        let rules: Rules = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks that names are non-empty and unique and owner fields are set.
    pub fn validate(&self) -> Result<(), RulesError> {
        let mut seen = HashSet::new();
        for rule in &self.collections {
            if rule.name.is_empty() || rule.name.contains('/') {
                return Err(RulesError::Invalid(format!(
                    "invalid collection name '{}'",
                    rule.name
                )));
            }
            if rule.owner_field.is_empty() {
                return Err(RulesError::Invalid(format!(
                    "collection '{}' has an empty owner_field",
                    rule.name
                )));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(RulesError::Invalid(format!(
                    "duplicate rule for collection '{}'",
                    rule.name
                )));
            }
        }
        Ok(())
    }

    /// Returns the rule for `collection`, if any.
    pub fn rule_for(&self, collection: &str) -> Option<&CollectionRule> {
        self.collections.iter().find(|r| r.name == collection)
    }

    /// Decides an access request against `collection`.
    pub fn check(
        &self,
        principal: Option<&Principal>,
        collection: &str,
        owner_id: &str,
        operation: Operation,
    ) -> Decision {
        if self.rule_for(collection).is_none() {
            return Decision::Denied(DenyReason::NoMatchingRule);
        }
        policy::decide(principal, owner_id, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_protect_bills_by_user_id() {
        let rules = Rules::default();
        let rule = rules.rule_for("Bills").unwrap();
        assert_eq!(rule.owner_field, "user_id");
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn parse_applies_default_owner_field() {
        let rules = Rules::parse(
            r#"
            [[collections]]
            name = "Bills"

            [[collections]]
            name = "Budgets"
            owner_field = "owner"
            "#,
        )
        .unwrap();

        assert_eq!(rules.rule_for("Bills").unwrap().owner_field, "user_id");
        assert_eq!(rules.rule_for("Budgets").unwrap().owner_field, "owner");
    }

    #[test]
    fn empty_file_denies_everything() {
        let rules = Rules::parse("").unwrap();
        let alice = Principal::new("alice");
        assert_eq!(
            rules.check(Some(&alice), "Bills", "alice", Operation::Write),
            Decision::Denied(DenyReason::NoMatchingRule)
        );
    }

    #[test]
    fn duplicate_collection_is_invalid() {
        let err = Rules::parse(
            r#"
            [[collections]]
            name = "Bills"

            [[collections]]
            name = "Bills"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RulesError::Invalid(_)));
    }

    #[test]
    fn empty_owner_field_is_invalid() {
        let err = Rules::parse(
            r#"
            [[collections]]
            name = "Bills"
            owner_field = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RulesError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Rules::parse("[[collections]\nname = ").unwrap_err();
        assert!(matches!(err, RulesError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Rules::load("/nonexistent/billwise/rules.toml").unwrap_err();
        assert!(matches!(err, RulesError::Io(_)));
    }

    #[test]
    fn check_delegates_to_owner_predicate() {
        let rules = Rules::default();
        let bob = Principal::new("bob");
        assert_eq!(
            rules.check(Some(&bob), "Bills", "alice", Operation::Read),
            Decision::Denied(DenyReason::NotOwner)
        );
        assert_eq!(
            rules.check(None, "Bills", "alice", Operation::Read),
            Decision::Denied(DenyReason::Unauthenticated)
        );
    }
}
