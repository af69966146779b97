//! # Query Plan Advisor
//!
//! Static rule-evaluation engine over parsed queries and schema metadata.
//!
//! An external parser hands over a [`QueryModel`](query::QueryModel); an
//! external schema loader hands over a
//! [`SchemaCatalog`](catalog::SchemaCatalog). The
//! [`Advisor`](advisor::Advisor) runs an immutable, injected rule list
//! against the pair and returns an ordered, deduplicated sequence of
//! [`Finding`](rules::Finding)s, each mirroring one optimization heuristic.
//!
//! # Architecture
//!
//! ```text
//! external parser ──▶ QueryModel ──┐
//!                                  ├──▶ Advisor ──▶ ordered Findings ──▶ formatter
//! schema loader ──▶ SchemaCatalog ─┘       │
//!                                    Rules (parallel)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use query_plan_advisor::{
//!     advisor::Advisor,
//!     catalog::{ColumnInfo, IndexInfo, SchemaCatalog, TableInfo},
//!     query::{Projection, QueryModel, SelectQuery}
//! };
//!
//! let catalog = SchemaCatalog::from_tables(vec![TableInfo {
//!     name:    "users".into(),
//!     columns: vec![ColumnInfo::new("id", "INT", false)],
//!     indexes: vec![IndexInfo {
//!         name:    "users_pkey".into(),
//!         columns: vec!["id".into()],
//!         unique:  true
//!     }]
//! }])
//! .unwrap();
//!
//! let query = QueryModel::Select(SelectQuery::new("users", Projection::All));
//!
//! let advisor = Advisor::new();
//! let report = advisor.analyze(&query, &catalog).unwrap();
//! assert_eq!(report.findings[0].rule_id, "ADV001");
//! ```
//!
//! # Determinism
//!
//! Rules are pure with respect to shared mutable state and are evaluated in
//! parallel with order-preserving collection; findings are then sorted by
//! (severity descending, rule id ascending, position ascending). The same
//! (query, catalog, config) always produces the same ordered output.
//!
//! # Error handling
//!
//! Catalog lookups that reference unknown tables or columns skip only the
//! failing rule and are surfaced as debug-level notes. A structurally
//! invalid query model fails that single query's analysis; other queries in
//! a batch are unaffected.
//!
//! # Modules
//!
//! - [`advisor`] - Rule execution engine with deterministic merging
//! - [`catalog`] - Table/column/index metadata and leftmost-prefix lookups
//! - [`query`] - Abstract query model produced by an external parser
//! - [`rules`] - Rule trait, built-in rules, finding types
//! - [`report`] - Thin formatter for text/JSON/YAML output
//! - [`config`] - Layered configuration loading
//! - [`error`] - Error types and constructors

pub mod advisor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod report;
pub mod rules;
