//! Type definitions for the advisory rule system.
//!
//! This module defines the core types used throughout the rule engine:
//! - [`Severity`] - Finding severity levels (Info, Warning, Critical)
//! - [`RuleCategory`] - Rule categories for grouping
//! - [`Finding`] - Individual advisory results with context
//! - [`AdvisoryReport`] - Complete analysis results

use serde::Serialize;

/// Severity level of a finding.
///
/// Ordered from lowest to highest severity for sorting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Informational suggestion or manual-review flag
    Info,
    /// Likely performance problem
    Warning,
    /// Issue that must be addressed
    Critical
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Critical => write!(f, "CRITICAL")
        }
    }
}

/// Category of a rule for grouping and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleCategory {
    /// Projection shape issues
    Projection,
    /// Index usage and coverage issues
    Indexing,
    /// Result-set bounding issues
    Pagination,
    /// Equivalent-but-faster query formulations
    Rewrite,
    /// Heuristics that need human review before acting
    Semantics
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Projection => write!(f, "Projection"),
            Self::Indexing => write!(f, "Indexing"),
            Self::Pagination => write!(f, "Pagination"),
            Self::Rewrite => write!(f, "Rewrite"),
            Self::Semantics => write!(f, "Semantics")
        }
    }
}

/// A single advisory result produced by one rule for one query.
///
/// Immutable value object: created by rules, collected by the engine,
/// never mutated after severity overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Unique rule identifier (e.g., "ADV001")
    pub rule_id:    &'static str,
    /// Human-readable rule name
    pub rule_name:  &'static str,
    /// Detailed description with substituted values
    pub message:    String,
    /// Severity level of this finding
    pub severity:   Severity,
    /// Category for grouping findings
    pub category:   RuleCategory,
    /// Optional suggested rewrite, as text
    pub suggestion: Option<String>,
    /// Zero-based position of the construct the rule examined (join index,
    /// predicate-node preorder index, group/order column index)
    pub position:   usize
}

/// Metadata about a rule for identification and configuration.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "ADV001")
    pub id:       &'static str,
    /// Human-readable rule name
    pub name:     &'static str,
    /// Default severity level
    pub severity: Severity,
    /// Rule category
    pub category: RuleCategory
}

impl RuleInfo {
    /// Build a finding carrying this rule's identity and default severity
    pub fn finding(&self, message: String, suggestion: Option<String>, position: usize) -> Finding {
        Finding {
            rule_id: self.id,
            rule_name: self.name,
            message,
            severity: self.severity,
            category: self.category,
            suggestion,
            position
        }
    }
}

/// Complete analysis report for one query.
///
/// Findings are ordered by (severity descending, rule id ascending,
/// position ascending). Use [`critical_count`](Self::critical_count),
/// [`warning_count`](Self::warning_count), and
/// [`info_count`](Self::info_count) for counts by severity.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryReport {
    /// All findings, deduplicated and ordered
    pub findings:      Vec<Finding>,
    /// Number of rules that ran to completion
    pub rules_run:     usize,
    /// Number of rules skipped on catalog lookup failures
    pub rules_skipped: usize
}

impl AdvisoryReport {
    pub fn critical_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .count()
    }
}
