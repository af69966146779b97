//! Rules that consult the schema catalog for index coverage.
//!
//! Every lookup failure propagates as [`CatalogError`] so the engine can
//! skip the rule for the offending query instead of crashing the analysis.

use indexmap::IndexSet;

use super::{Rule, RuleCategory, RuleInfo, RuleResult, Severity};
use crate::{
    catalog::SchemaCatalog,
    query::{ColumnExpr, ColumnRef, Predicate, QueryModel}
};

/// Join columns lacking index coverage on either side
pub struct UnindexedJoin;

impl Rule for UnindexedJoin {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV002",
            name:     "Unindexed join column",
            severity: Severity::Warning,
            category: RuleCategory::Indexing
        }
    }

    fn check(&self, query: &QueryModel, catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        let mut findings = Vec::new();
        for part in query.select_parts() {
            for (position, join) in part.joins.iter().enumerate() {
                let mut unindexed: Vec<&ColumnRef> = Vec::new();
                for side in [&join.left, &join.right] {
                    if !catalog.has_index_on(&side.table, &side.column)? {
                        unindexed.push(side);
                    }
                }
                if unindexed.is_empty() {
                    continue;
                }
                let names: Vec<String> = unindexed.iter().map(|c| c.to_string()).collect();
                let ddl: Vec<String> = unindexed
                    .iter()
                    .map(|c| format!("CREATE INDEX ON {} ({})", c.table, c.column))
                    .collect();
                findings.push(info.finding(
                    format!(
                        "Join {} = {} has no index on {}",
                        join.left,
                        join.right,
                        names.join(", ")
                    ),
                    Some(ddl.join("; ")),
                    position
                ));
            }
        }
        Ok(findings)
    }
}

/// Function call wrapping an indexed column defeats index usage
pub struct FunctionOnIndexedColumn;

impl Rule for FunctionOnIndexedColumn {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV005",
            name:     "Function on indexed column",
            severity: Severity::Warning,
            category: RuleCategory::Indexing
        }
    }

    fn check(&self, query: &QueryModel, catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        // Collect first: catalog lookups cannot propagate out of the walk
        // closure.
        let mut wrapped: Vec<(usize, &str, &ColumnRef)> = Vec::new();
        for root in query.predicate_roots() {
            root.walk(&mut |position, node| {
                if let Predicate::Comparison {
                    column: ColumnExpr::Function { name, column },
                    ..
                } = node
                {
                    wrapped.push((position, name.as_str(), column));
                }
            });
        }
        let mut findings = Vec::new();
        for (position, func, column) in wrapped {
            if catalog.has_index_on(&column.table, &column.column)? {
                findings.push(info.finding(
                    format!(
                        "{}({}) in a comparison prevents the index on '{}' from being used",
                        func, column, column
                    ),
                    Some(format!(
                        "Compare the bare column, or add an expression index on {}({})",
                        func, column.column
                    )),
                    position
                ));
            }
        }
        Ok(findings)
    }
}

/// OR branches over columns with no index coverage
pub struct OrOnUnindexed;

impl Rule for OrOnUnindexed {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV007",
            name:     "OR on unindexed columns",
            severity: Severity::Warning,
            category: RuleCategory::Rewrite
        }
    }

    fn check(&self, query: &QueryModel, catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        let mut or_nodes: Vec<(usize, IndexSet<&ColumnRef>)> = Vec::new();
        for root in query.predicate_roots() {
            root.walk(&mut |position, node| {
                if let Predicate::Or { children } = node {
                    let mut columns = IndexSet::new();
                    for child in children {
                        match child {
                            Predicate::Comparison {
                                column: ColumnExpr::Column(col),
                                ..
                            } => {
                                columns.insert(col);
                            }
                            // Only plain comparison branches qualify
                            _ => return
                        }
                    }
                    or_nodes.push((position, columns));
                }
            });
        }
        let mut findings = Vec::new();
        for (position, columns) in or_nodes {
            let mut all_unindexed = true;
            for col in &columns {
                if catalog.has_index_on(&col.table, &col.column)? {
                    all_unindexed = false;
                    break;
                }
            }
            if all_unindexed && !columns.is_empty() {
                let names: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
                findings.push(info.finding(
                    format!(
                        "OR branches compare unindexed column(s) {} and force a scan",
                        names.join(", ")
                    ),
                    Some(
                        "Index the compared columns and consider a UNION rewrite so each \
                         branch can seek an index"
                            .to_string()
                    ),
                    position
                ));
            }
        }
        Ok(findings)
    }
}

/// GROUP BY / ORDER BY columns lacking an index
pub struct UnindexedGroupOrOrderColumn;

impl Rule for UnindexedGroupOrOrderColumn {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "ADV009",
            name:     "Unindexed group/order column",
            severity: Severity::Info,
            category: RuleCategory::Indexing
        }
    }

    fn check(&self, query: &QueryModel, catalog: &SchemaCatalog) -> RuleResult {
        let info = self.info();
        let mut findings = Vec::new();
        for part in query.select_parts() {
            let clauses = part
                .group_by
                .iter()
                .map(|c| ("GROUP BY", c))
                .chain(part.order_by.iter().map(|c| ("ORDER BY", c)));
            for (position, (clause, column)) in clauses.enumerate() {
                if !catalog.has_index_on(&column.table, &column.column)? {
                    findings.push(info.finding(
                        format!("{} column '{}' has no index", clause, column),
                        Some(format!(
                            "CREATE INDEX ON {} ({})",
                            column.table, column.column
                        )),
                        position
                    ));
                }
            }
        }
        Ok(findings)
    }
}
