//! Rules that inspect the query shape alone, without catalog lookups.

use compact_str::CompactString;
use indexmap::IndexSet;

use super::{Rule, RuleCategory, RuleInfo, RuleResult, Severity};
use crate::{
    catalog::SchemaCatalog,
    query::{JoinKind, Predicate, Projection, QueryModel}
};

/// Projection marked "all" pulls every column over the wire
pub struct WildcardProjection;

impl Rule for WildcardProjection {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV001",
            name:     "Wildcard projection",
            severity: Severity::Warning,
            category: RuleCategory::Projection
        }
    }

    fn check(&self, query: &QueryModel, _catalog: &SchemaCatalog) -> RuleResult {
        let has_wildcard = query
            .select_parts()
            .iter()
            .any(|part| part.projection == Projection::All);
        if has_wildcard {
            let info = self.info();
            return Ok(vec![info.finding(
                "Query projects all columns instead of an explicit list".to_string(),
                Some("Project only the columns the caller consumes".to_string()),
                0
            )]);
        }
        Ok(vec![])
    }
}

/// Outer join whose NULL-extended side is never referenced by the predicate
pub struct OuterJoinPreference;

impl Rule for OuterJoinPreference {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV003",
            name:     "Outer join preference",
            severity: Severity::Info,
            category: RuleCategory::Semantics
        }
    }

    fn check(&self, query: &QueryModel, _catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        let mut findings = Vec::new();
        for part in query.select_parts() {
            let referenced: IndexSet<&CompactString> = part
                .predicate
                .iter()
                .flat_map(|p| p.comparison_columns())
                .map(|col| &col.table)
                .collect();
            for (position, join) in part.joins.iter().enumerate() {
                if !join.kind.is_outer() {
                    continue;
                }
                // Does the predicate touch the NULL-extended side(s)?
                let touches_nullable_side = match join.kind {
                    JoinKind::Left => referenced.contains(&join.right.table),
                    JoinKind::Right => referenced.contains(&join.left.table),
                    JoinKind::Full => {
                        referenced.contains(&join.left.table)
                            || referenced.contains(&join.right.table)
                    }
                    JoinKind::Inner => true
                };
                if !touches_nullable_side {
                    findings.push(info.finding(
                        format!(
                            "{} JOIN {} is never filtered on its NULL-extended side; \
                             outer semantics may be unnecessary",
                            join.kind, join.table
                        ),
                        Some(
                            "Review manually: an INNER join is cheaper if NULL-extended \
                             rows are not required"
                                .to_string()
                        ),
                        position
                    ));
                }
            }
        }
        Ok(findings)
    }
}

/// Unbounded result over a table the caller estimates as large
pub struct MissingLimit {
    threshold: u64
}

impl MissingLimit {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }
}

impl Rule for MissingLimit {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV004",
            name:     "Missing limit",
            severity: Severity::Warning,
            category: RuleCategory::Pagination
        }
    }

    fn check(&self, query: &QueryModel, _catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        let mut findings = Vec::new();
        for (position, part) in query.select_parts().into_iter().enumerate() {
            // Without a caller-supplied estimate the rule cannot evaluate
            // the threshold and stays silent.
            if part.limit.is_none()
                && let Some(rows) = part.estimated_rows
                && rows > self.threshold
            {
                findings.push(info.finding(
                    format!(
                        "No LIMIT on '{}' with an estimated {} rows (threshold {})",
                        part.table, rows, self.threshold
                    ),
                    Some("Add a LIMIT clause or keyset pagination".to_string()),
                    position
                ));
            }
        }
        Ok(findings)
    }
}

/// `IN (subquery)` correlating on one column is rewritable to `EXISTS`
pub struct InVsExists;

impl Rule for InVsExists {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV006",
            name:     "IN rewritable to EXISTS",
            severity: Severity::Info,
            category: RuleCategory::Rewrite
        }
    }

    fn check(&self, query: &QueryModel, _catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        let mut findings = Vec::new();
        for root in query.predicate_roots() {
            root.walk(&mut |position, node| {
                if let Predicate::In { column, subquery } = node
                    && subquery.correlated.len() == 1
                {
                    findings.push(info.finding(
                        format!(
                            "IN over a subquery on '{}' correlates on a single column \
                             ('{}'); EXISTS lets the planner stop at the first match",
                            subquery.table, subquery.correlated[0]
                        ),
                        Some(format!(
                            "Rewrite as EXISTS (SELECT 1 FROM {} WHERE {} = {})",
                            subquery.table, subquery.correlated[0], column
                        )),
                        position
                    ));
                }
            });
        }
        Ok(findings)
    }
}

/// DISTINCT on a query shape that cannot produce duplicates
pub struct UnnecessaryDistinct;

impl Rule for UnnecessaryDistinct {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV008",
            name:     "Unnecessary distinct",
            severity: Severity::Info,
            category: RuleCategory::Semantics
        }
    }

    fn check(&self, query: &QueryModel, _catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        let mut findings = Vec::new();
        for (position, part) in query.select_parts().into_iter().enumerate() {
            if part.distinct && part.joins.is_empty() && part.group_by.is_empty() {
                findings.push(info.finding(
                    format!(
                        "DISTINCT on single-table select from '{}' without joins or \
                         grouping; duplicates are unlikely to originate from the query shape",
                        part.table
                    ),
                    Some(
                        "Review manually: dropping DISTINCT avoids a sort/hash step \
                         if rows are already unique"
                            .to_string()
                    ),
                    position
                ));
            }
        }
        Ok(findings)
    }
}
