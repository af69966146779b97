use query_plan_advisor::advisor::Advisor;
use query_plan_advisor::catalog::{ColumnInfo, IndexInfo, SchemaCatalog, TableInfo};
use query_plan_advisor::config::AdvisorConfig;
use query_plan_advisor::query::{
    ColumnExpr, ColumnRef, CompareOp, JoinClause, JoinKind, Operand, Predicate, Projection,
    QueryModel, SelectQuery, UnionQuery
};
use query_plan_advisor::rules::Severity;

fn shop_catalog() -> SchemaCatalog {
    SchemaCatalog::from_tables(vec![
        TableInfo {
            name:    "users".to_string(),
            columns: vec![
                ColumnInfo::new("id", "INT", false),
                ColumnInfo::new("email", "VARCHAR(255)", true),
            ],
            indexes: vec![IndexInfo {
                name:    "users_pkey".to_string(),
                columns: vec!["id".into()],
                unique:  true
            }]
        },
        TableInfo {
            name:    "orders".to_string(),
            columns: vec![
                ColumnInfo::new("id", "INT", false),
                ColumnInfo::new("user_id", "INT", false),
                ColumnInfo::new("status", "VARCHAR(20)", true),
            ],
            indexes: vec![IndexInfo {
                name:    "orders_pkey".to_string(),
                columns: vec!["id".into()],
                unique:  true
            }]
        },
    ])
    .unwrap()
}

/// `SELECT * FROM users JOIN orders ON users.id = orders.user_id`
fn wildcard_join_query() -> QueryModel {
    let mut select = SelectQuery::new("users", Projection::All);
    select.joins.push(JoinClause {
        table: "orders".into(),
        left:  ColumnRef::new("users", "id"),
        right: ColumnRef::new("orders", "user_id"),
        kind:  JoinKind::Inner
    });
    QueryModel::Select(select)
}

fn status_or_query() -> QueryModel {
    let mut select = SelectQuery::new(
        "orders",
        Projection::Columns(vec![ColumnRef::new("orders", "id")])
    );
    select.predicate = Some(Predicate::Or {
        children: vec![
            Predicate::Comparison {
                column: ColumnExpr::Column(ColumnRef::new("orders", "status")),
                op:     CompareOp::Eq,
                value:  Operand::Literal("shipped".into())
            },
            Predicate::Comparison {
                column: ColumnExpr::Column(ColumnRef::new("orders", "status")),
                op:     CompareOp::Eq,
                value:  Operand::Literal("delivered".into())
            },
        ]
    });
    QueryModel::Select(select)
}

#[test]
fn test_wildcard_then_unindexed_join_ordering() {
    let advisor = Advisor::new();
    let report = advisor.analyze(&wildcard_join_query(), &shop_catalog()).unwrap();

    assert_eq!(report.findings[0].rule_id, "ADV001");
    assert_eq!(report.findings[1].rule_id, "ADV002");
    assert!(report.findings[1].message.contains("orders.user_id"));
}

#[test]
fn test_or_on_unindexed_status_fires_once() {
    let advisor = Advisor::new();
    let report = advisor.analyze(&status_or_query(), &shop_catalog()).unwrap();

    let count = report
        .findings
        .iter()
        .filter(|f| f.rule_id == "ADV007")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_exactly_one_wildcard_finding_for_union() {
    let union = QueryModel::Union(UnionQuery {
        arms: vec![
            SelectQuery::new("users", Projection::All),
            SelectQuery::new("orders", Projection::All),
        ],
        all:  true
    });

    let advisor = Advisor::new();
    let report = advisor.analyze(&union, &shop_catalog()).unwrap();

    let count = report
        .findings
        .iter()
        .filter(|f| f.rule_id == "ADV001")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_analysis_is_idempotent() {
    let advisor = Advisor::new();
    let catalog = shop_catalog();
    let query = wildcard_join_query();

    let first = advisor.analyze(&query, &catalog).unwrap();
    let second = advisor.analyze(&query, &catalog).unwrap();

    assert_eq!(first.findings, second.findings);
}

#[test]
fn test_disabling_a_rule_removes_exactly_its_findings() {
    let catalog = shop_catalog();
    let query = wildcard_join_query();

    let full = Advisor::new().analyze(&query, &catalog).unwrap();

    let mut config = AdvisorConfig::default();
    config.rules.disabled = vec!["ADV001".to_string()];
    let filtered = Advisor::with_config(&config).analyze(&query, &catalog).unwrap();

    let expected: Vec<_> = full
        .findings
        .iter()
        .filter(|f| f.rule_id != "ADV001")
        .cloned()
        .collect();
    assert_eq!(filtered.findings, expected);
}

#[test]
fn test_enabled_allow_list_restricts_rules() {
    let mut config = AdvisorConfig::default();
    config.rules.enabled = Some(vec!["ADV001".to_string()]);

    let advisor = Advisor::with_config(&config);
    let report = advisor.analyze(&wildcard_join_query(), &shop_catalog()).unwrap();

    assert_eq!(advisor.rule_count(), 1);
    assert!(report.findings.iter().all(|f| f.rule_id == "ADV001"));
    assert_eq!(report.findings.len(), 1);
}

#[test]
fn test_severity_override() {
    let mut config = AdvisorConfig::default();
    config
        .rules
        .severity
        .insert("ADV001".to_string(), "critical".to_string());

    let advisor = Advisor::with_config(&config);
    let report = advisor.analyze(&wildcard_join_query(), &shop_catalog()).unwrap();

    let wildcard = report
        .findings
        .iter()
        .find(|f| f.rule_id == "ADV001")
        .unwrap();
    assert_eq!(wildcard.severity, Severity::Critical);
}

#[test]
fn test_malformed_query_is_an_error() {
    let mut select = SelectQuery::new("orders", Projection::All);
    select.predicate = Some(Predicate::Or {
        children: vec![Predicate::Comparison {
            column: ColumnExpr::Column(ColumnRef::new("orders", "status")),
            op:     CompareOp::Eq,
            value:  Operand::Literal("x".into())
        }]
    });

    let advisor = Advisor::new();
    assert!(advisor.analyze(&QueryModel::Select(select), &shop_catalog()).is_err());
}

#[test]
fn test_batch_isolates_malformed_queries() {
    let malformed = QueryModel::Union(UnionQuery {
        arms: vec![SelectQuery::new("users", Projection::All)],
        all:  false
    });
    let good = wildcard_join_query();

    let advisor = Advisor::new();
    let results = advisor.analyze_batch(&[malformed, good], &shop_catalog());

    assert_eq!(results.len(), 2);
    assert!(results[0].is_err());
    assert!(results[1].is_ok());
    assert!(!results[1].as_ref().unwrap().findings.is_empty());
}

#[test]
fn test_unknown_table_skips_rule_but_keeps_partial_results() {
    let mut select = SelectQuery::new("users", Projection::All);
    select.joins.push(JoinClause {
        table: "ghosts".into(),
        left:  ColumnRef::new("users", "id"),
        right: ColumnRef::new("ghosts", "user_id"),
        kind:  JoinKind::Inner
    });

    let advisor = Advisor::new();
    let report = advisor.analyze(&QueryModel::Select(select), &shop_catalog()).unwrap();

    // The join-index rule cannot evaluate, but the projection rule still ran.
    assert!(report.rules_skipped >= 1);
    assert!(report.findings.iter().any(|f| f.rule_id == "ADV001"));
    assert!(report.findings.iter().all(|f| f.rule_id != "ADV002"));
}

#[test]
fn test_sequential_and_parallel_runs_agree() {
    let advisor = Advisor::new();
    let catalog = shop_catalog();
    let query = wildcard_join_query();

    let parallel = advisor.analyze(&query, &catalog).unwrap();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap();
    let sequential = pool.install(|| advisor.analyze(&query, &catalog)).unwrap();

    assert_eq!(parallel.findings, sequential.findings);
}

#[test]
fn test_report_counts_match_findings() {
    let advisor = Advisor::new();
    let report = advisor.analyze(&wildcard_join_query(), &shop_catalog()).unwrap();

    let total = report.critical_count() + report.warning_count() + report.info_count();
    assert_eq!(total, report.findings.len());
    assert_eq!(report.rules_run + report.rules_skipped, advisor.rule_count());
}
