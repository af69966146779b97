//! Advisor engine: runs the rule set against queries and merges findings.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────────┐
//! │  QueryModel  │────▶│   Advisor    │────▶│  AdvisoryReport │
//! └──────────────┘     └──────────────┘     └─────────────────┘
//!                             │
//!                      ┌──────┴───────┐
//!                      │    Rules     │
//!                      │  (parallel)  │
//!                      └──────────────┘
//! ```
//!
//! The rule list is built once and injected; there is no global registry.
//! Rules run in parallel via [`rayon`] with order-preserving collection, so
//! parallel and sequential evaluation yield the same ordered output. A rule
//! failing a catalog lookup contributes zero findings for that query and is
//! noted at debug level; the remaining findings are still returned.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::{
    catalog::SchemaCatalog,
    config::AdvisorConfig,
    error::AppResult,
    query::QueryModel,
    rules::{AdvisoryReport, Finding, Rule, Severity, default_rules}
};

/// Rule execution engine with deterministic output.
///
/// # Example
///
/// ```ignore
/// let config = AdvisorConfig::default();
/// let advisor = Advisor::with_config(&config);
/// let report = advisor.analyze(&query, &catalog)?;
///
/// for finding in &report.findings {
///     println!("[{}] {} {}", finding.severity, finding.rule_id, finding.message);
/// }
/// ```
pub struct Advisor {
    rules:              Vec<Box<dyn Rule>>,
    severity_overrides: HashMap<&'static str, Severity>
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Advisor {
    /// Create an advisor with the default rule set and default config
    pub fn new() -> Self {
        Self::with_config(&AdvisorConfig::default())
    }

    /// Create an advisor with the default rule set, honoring the config's
    /// rule selection and severity overrides
    pub fn with_config(config: &AdvisorConfig) -> Self {
        Self::with_rules(default_rules(config), config)
    }

    /// Create an advisor from an explicit rule list (dependency injection
    /// for custom rule sets); the config contributes severity overrides only
    pub fn with_rules(rules: Vec<Box<dyn Rule>>, config: &AdvisorConfig) -> Self {
        let mut severity_overrides = HashMap::new();
        for rule in &rules {
            let rule_id = rule.info().id;
            if let Some(sev_str) = config.rules.severity.get(rule_id)
                && let Some(sev) = parse_severity(sev_str)
            {
                severity_overrides.insert(rule_id, sev);
            }
        }
        Self {
            rules,
            severity_overrides
        }
    }

    /// Number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run every registered rule exactly once against one query.
    ///
    /// Deterministic: the same (query, catalog, config) always yields the
    /// same ordered findings.
    ///
    /// # Errors
    ///
    /// Returns an error only for a structurally invalid query model. Catalog
    /// lookup failures inside rules are recovered by skipping the rule.
    pub fn analyze(
        &self,
        query: &QueryModel,
        catalog: &SchemaCatalog
    ) -> AppResult<AdvisoryReport> {
        query.validate()?;

        let outcomes: Vec<_> = self
            .rules
            .par_iter()
            .map(|rule| (rule.info(), rule.check(query, catalog)))
            .collect();

        let mut findings = Vec::new();
        let mut rules_skipped = 0;
        for (info, outcome) in outcomes {
            match outcome {
                Ok(rule_findings) => findings.extend(rule_findings),
                Err(err) => {
                    debug!(rule = info.id, error = %err, "rule skipped: catalog lookup failed");
                    rules_skipped += 1;
                }
            }
        }

        for finding in &mut findings {
            if let Some(&severity) = self.severity_overrides.get(finding.rule_id) {
                finding.severity = severity;
            }
        }

        sort_findings(&mut findings);
        findings.dedup();

        Ok(AdvisoryReport {
            findings,
            rules_run: self.rules.len() - rules_skipped,
            rules_skipped
        })
    }

    /// Analyze many queries against one shared read-only catalog.
    ///
    /// Each query is independent: a malformed query yields an error result
    /// in its slot without affecting the others.
    pub fn analyze_batch(
        &self,
        queries: &[QueryModel],
        catalog: &SchemaCatalog
    ) -> Vec<AppResult<AdvisoryReport>> {
        queries
            .par_iter()
            .map(|query| self.analyze(query, catalog))
            .collect()
    }
}

/// Sort by severity descending, then rule id, then position in the query
fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.rule_id.cmp(b.rule_id))
            .then_with(|| a.position.cmp(&b.position))
            .then_with(|| a.message.cmp(&b.message))
    });
}

/// Parse severity string to enum
fn parse_severity(s: &str) -> Option<Severity> {
    match s.to_lowercase().as_str() {
        "critical" | "error" => Some(Severity::Critical),
        "warning" | "warn" => Some(Severity::Warning),
        "info" => Some(Severity::Info),
        _ => None
    }
}
