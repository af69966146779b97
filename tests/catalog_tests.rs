use query_plan_advisor::catalog::{ColumnInfo, IndexInfo, SchemaCatalog, TableInfo};
use query_plan_advisor::error::CatalogError;

fn events_table() -> TableInfo {
    TableInfo {
        name:    "events".to_string(),
        columns: vec![
            ColumnInfo::new("tenant", "INT", false),
            ColumnInfo::new("kind", "VARCHAR(50)", false),
            ColumnInfo::new("occurred_at", "TIMESTAMP", false),
            ColumnInfo::new("payload", "TEXT", true),
        ],
        indexes: vec![IndexInfo {
            name:    "events_tenant_kind_occurred".to_string(),
            columns: vec!["tenant".into(), "kind".into(), "occurred_at".into()],
            unique:  false
        }]
    }
}

fn catalog() -> SchemaCatalog {
    SchemaCatalog::from_tables(vec![events_table()]).unwrap()
}

#[test]
fn test_index_satisfies_leading_column() {
    assert!(catalog().index_exists("events", &["tenant"]).unwrap());
}

#[test]
fn test_index_satisfies_two_column_prefix() {
    assert!(catalog().index_exists("events", &["tenant", "kind"]).unwrap());
}

#[test]
fn test_index_does_not_satisfy_non_leading_column() {
    assert!(!catalog().index_exists("events", &["kind"]).unwrap());
}

#[test]
fn test_index_serves_lookup_longer_than_itself() {
    let found = catalog()
        .index_exists("events", &["tenant", "kind", "occurred_at", "payload"])
        .unwrap();
    assert!(found);
}

#[test]
fn test_index_lookup_is_case_insensitive() {
    assert!(catalog().index_exists("EVENTS", &["TENANT"]).unwrap());
}

#[test]
fn test_unknown_table_lookup_fails() {
    let err = catalog().index_exists("ghosts", &["tenant"]).unwrap_err();
    assert_eq!(err, CatalogError::unknown_table("ghosts"));
}

#[test]
fn test_unknown_column_lookup_fails() {
    let err = catalog().index_exists("events", &["missing"]).unwrap_err();
    assert_eq!(err, CatalogError::unknown_column("events", "missing"));
}

#[test]
fn test_column_type() {
    assert_eq!(catalog().column_type("events", "kind").unwrap(), "VARCHAR(50)");
}

#[test]
fn test_column_type_unknown_column() {
    assert!(catalog().column_type("events", "missing").is_err());
}

#[test]
fn test_is_nullable() {
    let catalog = catalog();
    assert!(catalog.is_nullable("events", "payload").unwrap());
    assert!(!catalog.is_nullable("events", "tenant").unwrap());
}

#[test]
fn test_index_referencing_missing_column_rejected() {
    let mut table = events_table();
    table.indexes.push(IndexInfo {
        name:    "bad".to_string(),
        columns: vec!["nope".into()],
        unique:  false
    });

    assert!(SchemaCatalog::from_tables(vec![table]).is_err());
}

#[test]
fn test_index_with_no_columns_rejected() {
    let mut table = events_table();
    table.indexes.push(IndexInfo {
        name:    "empty".to_string(),
        columns: vec![],
        unique:  false
    });

    assert!(SchemaCatalog::from_tables(vec![table]).is_err());
}

#[test]
fn test_from_json() {
    let json = r#"{
        "tables": {
            "users": {
                "name": "users",
                "columns": [
                    {"name": "id", "data_type": "INT", "nullable": false},
                    {"name": "email", "data_type": "VARCHAR(255)", "nullable": true}
                ],
                "indexes": [
                    {"name": "users_pkey", "columns": ["id"], "unique": true}
                ]
            }
        }
    }"#;

    let catalog = SchemaCatalog::from_json(json).unwrap();
    assert!(catalog.index_exists("users", &["id"]).unwrap());
    assert!(!catalog.index_exists("users", &["email"]).unwrap());
}

#[test]
fn test_from_json_invalid_input() {
    assert!(SchemaCatalog::from_json("not json").is_err());
}

#[test]
fn test_from_json_validates_indexes() {
    let json = r#"{
        "tables": {
            "users": {
                "name": "users",
                "columns": [{"name": "id", "data_type": "INT"}],
                "indexes": [{"name": "bad", "columns": ["ghost"]}]
            }
        }
    }"#;

    assert!(SchemaCatalog::from_json(json).is_err());
}
