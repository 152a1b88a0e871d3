//! Restricted DDL parser for schema dump files.
//!
//! This module provides a lightweight tokenizer and statement parser that
//! only handle the syntax actually found in schema dumps:
//! - `CREATE TABLE` statements, including embedded `PRIMARY KEY`/`UNIQUE KEY`
//!   clauses and opaque `CONSTRAINT` runs
//! - `CREATE INDEX ... USING ...` statements
//!
//! Everything else is captured as an opaque [`Statement::Other`] record so
//! the cursor can advance past it. This is intentionally limited compared to
//! a full SQL parser: there is no expression grammar, no semantic
//! validation, and no error recovery.

mod lexer;
mod parser;

pub use lexer::{Lexer, LexerError, Token, TokenKind};
pub use parser::{
    ColumnDefinition, Index, IndexDefinition, OtherStatement, PRIMARY_KEY_NAME, ParseError,
    Parser, Statement, Table,
};

use alloc::vec::Vec;

/// Tokenize and parse a whole schema text into statement records.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is lexically or structurally
/// malformed; there is no partial output.
pub fn parse_schema(input: &str) -> Result<Vec<Statement>, ParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    Parser::new(&tokens).parse_all()
}
