#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod analysis;
pub mod report;
pub mod schema;
pub mod sql;

// Re-export main types
pub use analysis::{PrefixFamily, TableFamilies, analyze_schema, find_left_prefixes};
pub use schema::Schema;
pub use sql::{
    ColumnDefinition, Index, LexerError, OtherStatement, PRIMARY_KEY_NAME, ParseError, Statement,
    Table, parse_schema,
};
