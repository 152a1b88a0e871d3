//! Integration tests for the full pipeline: text to redundancy report.

use prefix_indices_rs::{Schema, analyze_schema, report};

#[test]
fn test_every_extension_is_reported_not_only_the_next() {
    let schema = Schema::parse(
        "CREATE TABLE t (a INT, b INT, c INT);
         CREATE INDEX idx_a ON t USING btree (a);
         CREATE INDEX idx_ab ON t USING btree (a, b);
         CREATE INDEX idx_abc ON t USING btree (a, b, c);",
    )
    .unwrap();

    let findings = analyze_schema(&schema);
    assert_eq!(findings.len(), 1);
    let families = &findings[0].families;
    assert_eq!(families.len(), 2);

    assert_eq!(families[0].representative.index_name, "idx_a");
    let redundant: Vec<&str> = families[0]
        .redundant
        .iter()
        .map(|i| i.index_name.as_str())
        .collect();
    assert_eq!(redundant, vec!["idx_ab", "idx_abc"]);

    assert_eq!(families[1].representative.index_name, "idx_ab");
    assert_eq!(families[1].redundant.len(), 1);
    assert_eq!(families[1].redundant[0].index_name, "idx_abc");
}

#[test]
fn test_embedded_and_standalone_indices_mix() {
    // The embedded UNIQUE KEY is btree by construction and matches the
    // standalone index built on its first column.
    let schema = Schema::parse(
        "CREATE TABLE accounts (
            id bigint NOT NULL,
            email varchar(255) NOT NULL,
            UNIQUE KEY uk_email_id (email, id)
         );
         CREATE INDEX idx_email ON accounts USING btree (email);",
    )
    .unwrap();

    let findings = analyze_schema(&schema);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].table_name, "accounts");
    let family = &findings[0].families[0];
    assert_eq!(family.representative.index_name, "idx_email");
    assert_eq!(family.redundant[0].index_name, "uk_email_id");
}

#[test]
fn test_non_btree_never_appears_in_output() {
    let schema = Schema::parse(
        "CREATE TABLE t (a INT, b INT);
         CREATE INDEX h_a ON t USING hash (a);
         CREATE INDEX b_a ON t USING btree (a);
         CREATE INDEX b_ab ON t USING btree (a, b);
         CREATE INDEX g_ab ON t USING gist (a, b);",
    )
    .unwrap();

    let findings = analyze_schema(&schema);
    for table in &findings {
        for family in &table.families {
            assert_eq!(family.representative.index_type, "btree");
            assert!(family.redundant.iter().all(|i| i.index_type == "btree"));
        }
    }
    // Exactly one family: b_a covering b_ab.
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].families.len(), 1);
    assert_eq!(findings[0].families[0].redundant.len(), 1);
}

#[test]
fn test_indices_on_different_tables_never_interact() {
    let schema = Schema::parse(
        "CREATE TABLE t1 (a INT, KEY k_a (a));
         CREATE TABLE t2 (a INT, b INT, KEY k_ab (a, b));",
    )
    .unwrap();
    assert!(analyze_schema(&schema).is_empty());
}

#[test]
fn test_clean_schema_reports_nothing() {
    let schema = Schema::parse(
        "CREATE TABLE t (a INT, b INT, KEY k_a (a), KEY k_ba (b, a));",
    )
    .unwrap();
    assert!(analyze_schema(&schema).is_empty());
    assert_eq!(report::render_schema(&schema), "");
}

#[test]
fn test_empty_input_reports_nothing() {
    let schema = Schema::parse("").unwrap();
    assert!(analyze_schema(&schema).is_empty());
}

#[test]
fn test_pipeline_is_stable() {
    let text = "
        CREATE TABLE t (
            a INT,
            b INT,
            PRIMARY KEY (a),
            UNIQUE KEY uk_ab (a, b),
            KEY k_a (a)
        );
        CREATE INDEX idx_b ON t USING btree (b);
        CREATE INDEX idx_ba ON t USING btree (b, a);
    ";
    let first = report::render_schema(&Schema::parse(text).unwrap());
    let second = report::render_schema(&Schema::parse(text).unwrap());
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_report_lists_tables_in_name_order() {
    let schema = Schema::parse(
        "CREATE TABLE zebra (a INT, KEY k_a (a), KEY k_ab (a, b));
         CREATE TABLE alpha (a INT, KEY k_a (a), KEY k_ab (a, b));",
    )
    .unwrap();
    let text = report::render_schema(&schema);
    let alpha = text.find("table alpha").unwrap();
    let zebra = text.find("table zebra").unwrap();
    assert!(alpha < zebra);
}
