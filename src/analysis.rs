//! Left-prefix redundancy analysis over the indices of one table.
//!
//! A btree index whose column list is a left prefix of another btree index
//! on the same table is redundant: every lookup it can serve is served by
//! the longer index. Non-btree indices (hash, gin, gist, ...) are excluded
//! from the analysis entirely.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::schema::Schema;
use crate::sql::Index;

/// One family of redundant indices: a representative and the indices whose
/// column tuples equal or extend the representative's as a left prefix.
///
/// The representative is the first index recorded for its column tuple in
/// the analysis order — an arbitrary but deterministic convention, not a
/// claim that it is the index worth keeping.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixFamily {
    /// The index whose column tuple the others equal or extend.
    pub representative: Index,
    /// The redundant indices, in analysis order.
    pub redundant: Vec<Index>,
}

/// The redundancy families of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableFamilies {
    /// The table the indices belong to.
    pub table_name: String,
    /// The families found, in the order each representative first acquired
    /// a redundant index.
    pub families: Vec<PrefixFamily>,
}

/// Find the left-prefix families among the indices of one table.
///
/// Only btree indices participate. The candidates are walked shortest
/// column tuple first (ties broken by column-name order), so a shorter
/// index is always on record before any longer index that extends it; two
/// indices with identical column tuples report the later-sorted one as
/// redundant of the earlier. Representatives with nothing redundant under
/// them are omitted. An index with no columns matches nothing and is
/// matched by nothing.
#[must_use]
pub fn find_left_prefixes(indices: &[Index]) -> Vec<PrefixFamily> {
    let mut ordered: Vec<&Index> = indices.iter().filter(|index| index.is_btree()).collect();
    // Stable, so identical column tuples keep their encounter order.
    ordered.sort_by(|a, b| {
        a.columns
            .len()
            .cmp(&b.columns.len())
            .then_with(|| a.columns.cmp(&b.columns))
    });

    // Column tuple -> position (in `ordered`) of the first index seen with
    // exactly that tuple.
    let mut seen: HashMap<&[String], usize> = HashMap::new();
    // Representative position -> slot in `families`.
    let mut family_slots: HashMap<usize, usize> = HashMap::new();
    let mut families: Vec<(usize, Vec<usize>)> = Vec::new();

    for (pos, index) in ordered.iter().enumerate() {
        for len in 1..=index.columns.len() {
            let Some(&representative) = seen.get(&index.columns[..len]) else {
                continue;
            };
            let slot = *family_slots.entry(representative).or_insert_with(|| {
                families.push((representative, Vec::new()));
                families.len() - 1
            });
            families[slot].1.push(pos);
        }
        // Recorded only after its own prefixes were checked, so an index is
        // never a prefix of itself; the first index with a given tuple stays
        // the representative for all later ones.
        seen.entry(index.columns.as_slice()).or_insert(pos);
    }

    families
        .into_iter()
        .map(|(representative, redundant)| PrefixFamily {
            representative: ordered[representative].clone(),
            redundant: redundant.into_iter().map(|pos| ordered[pos].clone()).collect(),
        })
        .collect()
}

/// Run the left-prefix analysis over every table of a schema.
///
/// Tables are reported in ascending name order; tables without redundancy
/// families are omitted.
#[must_use]
pub fn analyze_schema(schema: &Schema) -> Vec<TableFamilies> {
    let mut groups: Vec<(&str, &[Index])> = schema.indexed_tables().collect();
    groups.sort_by_key(|&(table_name, _)| table_name);

    groups
        .into_iter()
        .filter_map(|(table_name, indices)| {
            let families = find_left_prefixes(indices);
            if families.is_empty() {
                None
            } else {
                Some(TableFamilies {
                    table_name: String::from(table_name),
                    families,
                })
            }
        })
        .collect()
}
