//! Aggregation of parsed statements into a per-table schema model.

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;

use crate::sql::{Index, ParseError, Statement, Table, parse_schema};

/// `IndexMap` alias using hashbrown's default hasher for `no_std`
/// compatibility.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// The schema model built from an ordered list of statement records.
///
/// Build-once and read-only afterwards: the maps are populated by
/// [`Schema::from_statements`] and only exposed through accessors.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Tables by name. A later `CREATE TABLE` with the same name overwrites
    /// the earlier one outright; there is no merging.
    tables: IndexMap<String, Table>,
    /// Indices grouped by table name, in encounter order.
    indices: IndexMap<String, Vec<Index>>,
}

impl Schema {
    /// Parse a whole schema text and fold it into a model.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text is lexically or structurally
    /// malformed.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Self::from_statements(parse_schema(input)?))
    }

    /// Fold statement records into the model.
    ///
    /// `Table` records overwrite by name (last one wins), `Index` records
    /// accumulate per table, `Other` records are dropped.
    #[must_use]
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        let mut tables: IndexMap<String, Table> = IndexMap::default();
        let mut indices: IndexMap<String, Vec<Index>> = IndexMap::default();

        for statement in statements {
            match statement {
                Statement::Table(table) => {
                    tables.insert(table.name.clone(), table);
                }
                Statement::Index(index) => {
                    indices
                        .entry(index.table_name.clone())
                        .or_default()
                        .push(index);
                }
                Statement::Other(_) => {}
            }
        }

        Self { tables, indices }
    }

    /// Look up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Iterate over the tables in first-encounter order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// The indices of one table, in encounter order.
    #[must_use]
    pub fn indices_for(&self, table_name: &str) -> &[Index] {
        self.indices
            .get(table_name)
            .map_or(&[], Vec::as_slice)
    }

    /// Iterate over `(table name, indices)` groups in first-encounter order.
    ///
    /// Tables mentioned only by standalone `CREATE INDEX` statements appear
    /// here too, whether or not a `CREATE TABLE` was seen for them.
    pub fn indexed_tables(&self) -> impl Iterator<Item = (&str, &[Index])> {
        self.indices
            .iter()
            .map(|(name, indices)| (name.as_str(), indices.as_slice()))
    }

    /// Number of distinct tables.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_last_table_definition_wins() {
        let schema = Schema::parse(
            "CREATE TABLE t (a INT);\
             CREATE TABLE t (b INT);",
        )
        .unwrap();
        assert_eq!(schema.table_count(), 1);
        let table = schema.table("t").unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].column_name, "b");
    }

    #[test]
    fn test_indices_accumulate_in_encounter_order() {
        let schema = Schema::parse(
            "CREATE TABLE t (a INT, b INT, KEY k_b (b));\
             CREATE INDEX k_a ON t USING btree (a);\
             CREATE INDEX k_ab ON t USING btree (a, b);",
        )
        .unwrap();
        let names: Vec<&str> = schema
            .indices_for("t")
            .iter()
            .map(|i| i.index_name.as_str())
            .collect();
        assert_eq!(names, vec!["k_b", "k_a", "k_ab"]);
    }

    #[test]
    fn test_other_statements_are_dropped() {
        let schema = Schema::parse("SET NAMES utf8; CREATE TABLE t (a INT);").unwrap();
        assert_eq!(schema.table_count(), 1);
        assert_eq!(schema.tables().count(), 1);
    }

    #[test]
    fn test_index_on_unknown_table_is_kept() {
        let schema = Schema::parse("CREATE INDEX i ON missing USING btree (a);").unwrap();
        assert!(schema.table("missing").is_none());
        assert_eq!(schema.indices_for("missing").len(), 1);
        assert_eq!(schema.indexed_tables().count(), 1);
    }

    #[test]
    fn test_indices_for_unindexed_table_is_empty() {
        let schema = Schema::parse("CREATE TABLE t (a INT);").unwrap();
        assert!(schema.indices_for("t").is_empty());
    }
}
