//! Advisory rule set for parsed queries.
//!
//! Each rule mirrors one optimization heuristic: it is a stateless, pure
//! analysis function from (query model, schema catalog) to zero or more
//! [`Finding`]s. Rules have no ordering coupling and are independently
//! testable; the [`Advisor`](crate::advisor::Advisor) evaluates them in
//! parallel and merges the results deterministically.
//!
//! # Built-in rules
//!
//! | ID | Name | Severity | Needs catalog |
//! |----|------|----------|---------------|
//! | ADV001 | Wildcard projection | Warning | no |
//! | ADV002 | Unindexed join column | Warning | yes |
//! | ADV003 | Outer join preference | Info | no |
//! | ADV004 | Missing limit | Warning | no |
//! | ADV005 | Function on indexed column | Warning | yes |
//! | ADV006 | IN rewritable to EXISTS | Info | no |
//! | ADV007 | OR on unindexed columns | Warning | yes |
//! | ADV008 | Unnecessary distinct | Info | no |
//! | ADV009 | Unindexed group/order column | Info | yes |
//!
//! Catalog-dependent rules fail with [`CatalogError`] when the query
//! references names absent from the schema; the engine skips such a rule for
//! that query and keeps the remaining findings.
//!
//! # Implementing custom rules
//!
//! ```ignore
//! use query_plan_advisor::rules::{Finding, Rule, RuleCategory, RuleInfo, RuleResult, Severity};
//!
//! pub struct MyRule;
//!
//! impl Rule for MyRule {
//!     fn info(&self) -> RuleInfo {
//!         RuleInfo {
//!             id:       "CUSTOM001",
//!             name:     "My custom rule",
//!             severity: Severity::Warning,
//!             category: RuleCategory::Rewrite
//!         }
//!     }
//!
//!     fn check(&self, query: &QueryModel, catalog: &SchemaCatalog) -> RuleResult {
//!         Ok(vec![])
//!     }
//! }
//! ```

mod index_aware;
mod shape;
mod types;

pub use index_aware::{
    FunctionOnIndexedColumn, OrOnUnindexed, UnindexedGroupOrOrderColumn, UnindexedJoin
};
pub use shape::{InVsExists, MissingLimit, OuterJoinPreference, UnnecessaryDistinct, WildcardProjection};
pub use types::{AdvisoryReport, Finding, RuleCategory, RuleInfo, Severity};

use crate::{
    catalog::SchemaCatalog,
    config::{AdvisorConfig, RulesConfig},
    error::CatalogError,
    query::QueryModel
};

/// Result of one rule evaluation: findings, or a catalog lookup failure that
/// makes the rule inapplicable to this query.
pub type RuleResult = Result<Vec<Finding>, CatalogError>;

/// Trait for implementing advisory rules.
///
/// Rules are stateless analyzers that examine a single query against the
/// schema catalog and return any findings. They must be `Send + Sync` for
/// parallel execution and must not mutate either input.
pub trait Rule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Analyzes a query and returns any findings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when a schema lookup fails; the engine
    /// treats this as "skip this rule for this query".
    fn check(&self, query: &QueryModel, catalog: &SchemaCatalog) -> RuleResult;
}

/// Build the default rule list, honoring the config's enabled/disabled sets.
///
/// The list is explicit and immutable once built; there is no global
/// registry. Rule ids follow the order rules are listed in, so equal-severity
/// findings sort stably by id.
pub fn default_rules(config: &AdvisorConfig) -> Vec<Box<dyn Rule>> {
    let all_rules: Vec<Box<dyn Rule>> = vec![
        Box::new(WildcardProjection),
        Box::new(UnindexedJoin),
        Box::new(OuterJoinPreference),
        Box::new(MissingLimit::new(config.row_count_threshold)),
        Box::new(FunctionOnIndexedColumn),
        Box::new(InVsExists),
        Box::new(OrOnUnindexed),
        Box::new(UnnecessaryDistinct),
        Box::new(UnindexedGroupOrOrderColumn),
    ];

    all_rules
        .into_iter()
        .filter(|r| rule_selected(&config.rules, r.info().id))
        .collect()
}

fn rule_selected(config: &RulesConfig, rule_id: &str) -> bool {
    if let Some(enabled) = &config.enabled
        && !enabled.iter().any(|e| e.eq_ignore_ascii_case(rule_id))
    {
        return false;
    }
    !config
        .disabled
        .iter()
        .any(|d| d.eq_ignore_ascii_case(rule_id))
}
