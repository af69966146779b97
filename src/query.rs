//! Abstract query model consumed by the rule engine.
//!
//! The model is produced by an external parser collaborator and handed over
//! as structured data (or JSON via serde). It is read-only during analysis.
//!
//! The predicate tree is a closed tagged enum ([`Predicate`]) so every
//! consumer handles each node kind exhaustively at compile time. Owned enum
//! values cannot alias, which makes the tree acyclic by construction;
//! [`QueryModel::validate`] additionally bounds tree depth so hostile
//! deserialized input cannot exhaust the stack.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{AppResult, malformed_query_error};

/// Type alias for small column-reference vectors (typically < 4 elements)
pub type ColumnList = SmallVec<[ColumnRef; 4]>;

/// Maximum nesting depth accepted for a predicate tree
pub const MAX_PREDICATE_DEPTH: usize = 64;

/// A table-qualified column reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table:  CompactString,
    pub column: CompactString
}

impl ColumnRef {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table:  table.into(),
            column: column.into()
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Projected output of a select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// The "all columns" marker (`SELECT *`)
    All,
    /// Explicit column list
    Columns(Vec<ColumnRef>)
}

/// Join flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full
}

impl JoinKind {
    /// Whether this join can NULL-extend one or both sides
    pub fn is_outer(self) -> bool {
        !matches!(self, Self::Inner)
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inner => write!(f, "INNER"),
            Self::Left => write!(f, "LEFT"),
            Self::Right => write!(f, "RIGHT"),
            Self::Full => write!(f, "FULL")
        }
    }
}

/// One join clause: `<kind> JOIN <table> ON <left> = <right>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClause {
    /// Table being joined in
    pub table: CompactString,
    /// Join column on the existing side
    pub left:  ColumnRef,
    /// Join column on the joined-in side
    pub right: ColumnRef,
    pub kind:  JoinKind
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::NotEq => write!(f, "<>"),
            Self::Lt => write!(f, "<"),
            Self::LtEq => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtEq => write!(f, ">="),
            Self::Like => write!(f, "LIKE")
        }
    }
}

/// Column side of a comparison: bare, or wrapped in a function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnExpr {
    Column(ColumnRef),
    Function {
        name:   CompactString,
        column: ColumnRef
    }
}

impl ColumnExpr {
    /// The column referenced, regardless of wrapping
    pub fn column_ref(&self) -> &ColumnRef {
        match self {
            Self::Column(col) => col,
            Self::Function { column, .. } => column
        }
    }
}

/// Value side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Literal(CompactString),
    Column(ColumnRef),
    Null
}

/// A subquery referenced by `EXISTS` or `IN`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subquery {
    /// Table the subquery selects from
    pub table:      CompactString,
    /// Columns the subquery projects
    #[serde(default)]
    pub columns:    ColumnList,
    /// Outer-query columns the subquery correlates on
    #[serde(default)]
    pub correlated: ColumnList
}

/// Predicate tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Predicate {
    Comparison {
        column: ColumnExpr,
        op:     CompareOp,
        value:  Operand
    },
    And {
        children: Vec<Predicate>
    },
    Or {
        children: Vec<Predicate>
    },
    Exists {
        subquery: Subquery
    },
    In {
        column:   ColumnRef,
        subquery: Subquery
    }
}

impl Predicate {
    /// Preorder walk over the tree. The callback receives each node together
    /// with its zero-based preorder index, which findings use as a stable
    /// position for deterministic ordering.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(usize, &'a Predicate)) {
        let mut next = 0;
        self.walk_inner(&mut next, f);
    }

    fn walk_inner<'a>(&'a self, next: &mut usize, f: &mut impl FnMut(usize, &'a Predicate)) {
        let index = *next;
        *next += 1;
        f(index, self);
        if let Self::And { children } | Self::Or { children } = self {
            for child in children {
                child.walk_inner(next, f);
            }
        }
    }

    /// All plain (non-function-wrapped) column references in comparisons
    pub fn comparison_columns(&self) -> Vec<&ColumnRef> {
        let mut cols = Vec::new();
        self.walk(&mut |_, node| {
            if let Self::Comparison {
                column: ColumnExpr::Column(col),
                ..
            } = node
            {
                cols.push(col);
            }
        });
        cols
    }

    fn validate(&self, depth: usize) -> AppResult<()> {
        if depth > MAX_PREDICATE_DEPTH {
            return Err(malformed_query_error(format!(
                "predicate tree exceeds maximum depth {}",
                MAX_PREDICATE_DEPTH
            )));
        }
        match self {
            Self::Comparison { column, .. } => {
                let col = column.column_ref();
                if col.table.is_empty() || col.column.is_empty() {
                    return Err(malformed_query_error("comparison with empty column reference"));
                }
                Ok(())
            }
            Self::And { children } | Self::Or { children } => {
                if children.len() < 2 {
                    return Err(malformed_query_error(
                        "And/Or node must have at least two children"
                    ));
                }
                for child in children {
                    child.validate(depth + 1)?;
                }
                Ok(())
            }
            Self::Exists { subquery } => validate_subquery(subquery),
            Self::In { column, subquery } => {
                if column.table.is_empty() || column.column.is_empty() {
                    return Err(malformed_query_error("In node with empty column reference"));
                }
                validate_subquery(subquery)
            }
        }
    }
}

fn validate_subquery(subquery: &Subquery) -> AppResult<()> {
    if subquery.table.is_empty() {
        return Err(malformed_query_error("subquery with empty table name"));
    }
    Ok(())
}

/// A single `SELECT` (also used as a union arm)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    /// Base table the select reads from
    pub table:          CompactString,
    pub projection:     Projection,
    #[serde(default)]
    pub joins:          Vec<JoinClause>,
    #[serde(default)]
    pub predicate:      Option<Predicate>,
    #[serde(default)]
    pub group_by:       ColumnList,
    #[serde(default)]
    pub order_by:       ColumnList,
    #[serde(default)]
    pub limit:          Option<u64>,
    #[serde(default)]
    pub offset:         Option<u64>,
    #[serde(default)]
    pub distinct:       bool,
    /// Caller-supplied row estimate for the base table, if known
    #[serde(default)]
    pub estimated_rows: Option<u64>
}

impl SelectQuery {
    pub fn new(table: &str, projection: Projection) -> Self {
        Self {
            table: table.into(),
            projection,
            joins: Vec::new(),
            predicate: None,
            group_by: ColumnList::new(),
            order_by: ColumnList::new(),
            limit: None,
            offset: None,
            distinct: false,
            estimated_rows: None
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.table.is_empty() {
            return Err(malformed_query_error("select with empty table name"));
        }
        if let Projection::Columns(cols) = &self.projection {
            if cols.is_empty() {
                return Err(malformed_query_error("explicit projection with no columns"));
            }
            if cols.iter().any(|c| c.column.is_empty()) {
                return Err(malformed_query_error("projection with empty column name"));
            }
        }
        for join in &self.joins {
            if join.table.is_empty()
                || join.left.column.is_empty()
                || join.right.column.is_empty()
            {
                return Err(malformed_query_error("join clause with empty name"));
            }
        }
        if let Some(predicate) = &self.predicate {
            predicate.validate(0)?;
        }
        for col in self.group_by.iter().chain(self.order_by.iter()) {
            if col.table.is_empty() || col.column.is_empty() {
                return Err(malformed_query_error("group/order column with empty name"));
            }
        }
        Ok(())
    }
}

/// An `UPDATE` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuery {
    pub table:       CompactString,
    /// Columns assigned by the SET clause
    #[serde(default)]
    pub set_columns: SmallVec<[CompactString; 4]>,
    #[serde(default)]
    pub predicate:   Option<Predicate>
}

/// A `DELETE` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteQuery {
    pub table:     CompactString,
    #[serde(default)]
    pub predicate: Option<Predicate>
}

/// A `UNION` of two or more selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionQuery {
    pub arms: Vec<SelectQuery>,
    /// `UNION ALL` when set, plain deduplicating `UNION` otherwise
    #[serde(default)]
    pub all:  bool
}

/// Tagged variant over the statement kinds the advisor understands.
///
/// Constructed once from parser output, read-only during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryModel {
    Select(SelectQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
    Union(UnionQuery)
}

impl QueryModel {
    /// Every select shape in the query: the select itself, or all union arms
    pub fn select_parts(&self) -> Vec<&SelectQuery> {
        match self {
            Self::Select(select) => vec![select],
            Self::Union(union) => union.arms.iter().collect(),
            Self::Update(_) | Self::Delete(_) => Vec::new()
        }
    }

    /// Every predicate root in the query, across all statement kinds
    pub fn predicate_roots(&self) -> Vec<&Predicate> {
        match self {
            Self::Select(select) => select.predicate.iter().collect(),
            Self::Union(union) => union.arms.iter().filter_map(|a| a.predicate.as_ref()).collect(),
            Self::Update(update) => update.predicate.iter().collect(),
            Self::Delete(delete) => delete.predicate.iter().collect()
        }
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a malformed-query error if any invariant is violated; the
    /// engine surfaces this as a fatal result for this query only.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Select(select) => select.validate(),
            Self::Update(update) => {
                if update.table.is_empty() {
                    return Err(malformed_query_error("update with empty table name"));
                }
                if let Some(predicate) = &update.predicate {
                    predicate.validate(0)?;
                }
                Ok(())
            }
            Self::Delete(delete) => {
                if delete.table.is_empty() {
                    return Err(malformed_query_error("delete with empty table name"));
                }
                if let Some(predicate) = &delete.predicate {
                    predicate.validate(0)?;
                }
                Ok(())
            }
            Self::Union(union) => {
                if union.arms.len() < 2 {
                    return Err(malformed_query_error("union with fewer than two arms"));
                }
                for arm in &union.arms {
                    arm.validate()?;
                }
                Ok(())
            }
        }
    }
}
