//! CLI entry point: report redundant left-prefix indices in a schema dump.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use prefix_indices_rs::{Schema, analyze_schema, report};

#[derive(Parser)]
#[command(
    name = "find-prefix-indices",
    about = "Find redundant SQL indices whose column list is a left prefix of another index"
)]
struct Cli {
    /// Schema dump file containing CREATE TABLE / CREATE INDEX statements
    schema_file: PathBuf,

    /// Print a summary of the parsed schema to stderr
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let text = match std::fs::read_to_string(&cli.schema_file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.schema_file.display());
            process::exit(2);
        }
    };

    let schema = match Schema::parse(&text) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Schema parse error: {e}");
            process::exit(2);
        }
    };

    if cli.verbose {
        eprintln!(
            "Parsed {} tables, {} indexed tables",
            schema.table_count(),
            schema.indexed_tables().count()
        );
    }

    let findings = analyze_schema(&schema);
    print!("{}", report::render(&findings));
}
