//! Plain-text rendering of the analysis results.

use alloc::string::String;
use core::fmt::Write;

use crate::analysis::{TableFamilies, analyze_schema};
use crate::schema::Schema;

/// Render the findings as the report the CLI prints.
///
/// One block per table: the representative index with its column list,
/// followed by one indented line per redundant index. Returns an empty
/// string when there is nothing to report.
#[must_use]
pub fn render(findings: &[TableFamilies]) -> String {
    let mut out = String::new();
    for table in findings {
        writeln!(out, "Found duplicate indices for table {}", table.table_name).unwrap();
        for family in &table.families {
            writeln!(
                out,
                "\t{} ({}) is a left prefix of:",
                family.representative.index_name,
                family.representative.columns.join(",")
            )
            .unwrap();
            for index in &family.redundant {
                writeln!(out, "\t\t{} ({})", index.index_name, index.columns.join(","))
                    .unwrap();
            }
        }
    }
    out
}

/// Analyze a schema and render the report in one step.
#[must_use]
pub fn render_schema(schema: &Schema) -> String {
    render(&analyze_schema(schema))
}
