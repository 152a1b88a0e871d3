//! Recursive-descent parser for `CREATE TABLE` and `CREATE INDEX` statements.
//!
//! The parser consumes the token sequence through an immutable cursor that
//! only ever moves forward. Statements it does not recognize are captured
//! opaquely so the cursor can advance past them; structurally malformed
//! input aborts the whole run with a [`ParseError`].

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use super::lexer::{LexerError, Token, TokenKind};

/// Sentinel index name assigned to `PRIMARY KEY` clauses, which carry no
/// name of their own in a table body.
pub const PRIMARY_KEY_NAME: &str = "(primary)";

/// A column definition inside a `CREATE TABLE` body.
///
/// The type and constraint clause is kept as an opaque token run and never
/// interpreted further.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDefinition {
    /// The column name.
    pub column_name: String,
    /// The raw type/constraint tokens following the name.
    pub definition: Vec<String>,
}

/// A key clause found inside a `CREATE TABLE` body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexDefinition {
    /// The marker before `KEY`: `PRIMARY`, `UNIQUE`, or empty for a bare
    /// `KEY` clause.
    pub kind: String,
    /// The index name, or [`PRIMARY_KEY_NAME`] for a primary key.
    pub name: String,
    /// The indexed columns, in order.
    pub columns: Vec<String>,
}

/// A parsed table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// The table name.
    pub name: String,
    /// The column definitions, in declaration order. Duplicate names pass
    /// through unchanged.
    pub columns: Vec<ColumnDefinition>,
}

/// A parsed index, either from a standalone `CREATE INDEX` statement or from
/// a key clause embedded in a `CREATE TABLE` body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    /// The index name.
    pub index_name: String,
    /// The table this index belongs to.
    pub table_name: String,
    /// The index type: the literal `USING` argument for standalone indices,
    /// [`Index::BTREE`] for embedded key clauses.
    pub index_type: String,
    /// The indexed columns, in order.
    pub columns: Vec<String>,
}

impl Index {
    /// The index type assigned to key clauses embedded in a table body, and
    /// the only type subject to left-prefix analysis.
    pub const BTREE: &'static str = "btree";

    /// Whether this index is an ordered btree index.
    #[must_use]
    pub fn is_btree(&self) -> bool {
        self.index_type == Self::BTREE
    }
}

/// A statement that matched neither `CREATE TABLE` nor `CREATE INDEX`,
/// retained only so the cursor could advance past it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OtherStatement {
    /// The raw token texts, never interpreted.
    pub tokens: Vec<String>,
}

/// A parsed statement record.
///
/// One `CREATE TABLE` statement yields several records: one [`Index`] per
/// embedded key clause, then the [`Table`] itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// A `CREATE TABLE` statement.
    Table(Table),
    /// A `CREATE INDEX` statement or an embedded key clause.
    Index(Index),
    /// Anything else.
    Other(OtherStatement),
}

/// One entry of a table body or index column list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyEntry {
    /// A column definition.
    Column(ColumnDefinition),
    /// An embedded key clause.
    Key(IndexDefinition),
    /// A `CONSTRAINT ...` run, skipped opaquely.
    Opaque(Vec<String>),
}

/// Statement parser errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Lexer error.
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),
    /// Unexpected token.
    #[error("Unexpected token {found:?} at position {pos}, expected {expected}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: TokenKind,
        /// Byte offset of the offending token.
        pos: usize,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },
}

/// Statement parser over a token buffer.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given tokens.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse every statement in the buffer.
    ///
    /// Each statement's records are appended in order; a single trailing
    /// `;` per statement is consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement is structurally malformed, or if a
    /// statement is followed by anything other than `;` or end of input.
    /// There is no partial output.
    pub fn parse_all(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        while self.peek().is_some() {
            statements.extend(self.parse_statement()?);

            match self.peek() {
                None => break,
                Some(token) if token.kind == TokenKind::Semicolon => {
                    self.advance();
                }
                Some(token) => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "\";\"".into(),
                        found: token.kind.clone(),
                        pos: token.pos,
                    });
                }
            }
        }

        Ok(statements)
    }

    /// Parse a single statement, dispatching on its first two tokens.
    fn parse_statement(&mut self) -> Result<Vec<Statement>, ParseError> {
        if self.at_keyword(0, "CREATE") && self.at_keyword(1, "TABLE") {
            self.parse_create_table()
        } else if self.at_keyword(0, "CREATE") && self.at_keyword(1, "INDEX") {
            self.parse_create_index()
        } else {
            self.parse_other()
        }
    }

    /// Parse `CREATE TABLE name ( body ) tail ;`.
    ///
    /// The tail between the closing parenthesis and the terminator (storage
    /// engine options and the like) is skipped unread. Embedded key clauses
    /// become [`Index`] records with the type forced to btree.
    fn parse_create_table(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.advance();
        self.advance();
        let table_name = self.parse_name()?;
        self.expect(&TokenKind::LParen)?;
        let body = self.parse_entry_list()?;
        self.expect(&TokenKind::RParen)?;
        self.skip_to_semicolon()?;

        let mut statements = Vec::new();
        let mut columns = Vec::new();
        for entry in body {
            match entry {
                BodyEntry::Column(column) => columns.push(column),
                BodyEntry::Key(key) => statements.push(Statement::Index(Index {
                    index_name: key.name,
                    table_name: table_name.clone(),
                    index_type: Index::BTREE.into(),
                    columns: key.columns,
                })),
                BodyEntry::Opaque(_) => {}
            }
        }
        statements.push(Statement::Table(Table {
            name: table_name,
            columns,
        }));
        Ok(statements)
    }

    /// Parse `CREATE INDEX name ON table USING type ( columns ) [WHERE|WITH ...] ;`.
    fn parse_create_index(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.advance();
        self.advance();
        let index_name = self.parse_name()?;
        self.expect_keyword("ON")?;
        let table_name = self.parse_name()?;
        self.expect_keyword("USING")?;
        let index_type = self.expect_identifier("index type")?;
        self.expect(&TokenKind::LParen)?;
        let entries = self.parse_entry_list()?;
        self.expect(&TokenKind::RParen)?;

        // Partial-index predicates and storage parameters are discarded.
        if self.at_keyword(0, "WHERE") || self.at_keyword(0, "WITH") {
            self.capture_balanced(&[TokenKind::Semicolon])?;
        }

        // Only each entry's leading name is kept; trailing expressions per
        // entry are discarded.
        let columns = entries
            .into_iter()
            .filter_map(|entry| match entry {
                BodyEntry::Column(column) => Some(column.column_name),
                BodyEntry::Key(_) | BodyEntry::Opaque(_) => None,
            })
            .collect();

        Ok(vec![Statement::Index(Index {
            index_name,
            table_name,
            index_type,
            columns,
        })])
    }

    /// Capture an unrecognized statement up to (not including) the next `;`.
    fn parse_other(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token.kind == TokenKind::Semicolon => break,
                Some(token) => {
                    tokens.push(String::from(token.kind.text()));
                    self.advance();
                }
                None => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "\";\"".into(),
                    });
                }
            }
        }
        Ok(vec![Statement::Other(OtherStatement { tokens })])
    }

    /// Parse a comma-separated list of body entries, ending at a top-level
    /// `)` or end of input. A dangling comma ends the list.
    fn parse_entry_list(&mut self) -> Result<Vec<BodyEntry>, ParseError> {
        let mut entries = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(token) if token.kind == TokenKind::RParen => break,
                Some(_) => {}
            }
            entries.push(self.parse_entry()?);
            match self.peek() {
                Some(token) if token.kind == TokenKind::Comma => {
                    self.advance();
                }
                _ => break,
            }
        }
        Ok(entries)
    }

    /// Classify and parse one body entry.
    fn parse_entry(&mut self) -> Result<BodyEntry, ParseError> {
        // A KEY within the first three tokens marks a key clause; the name
        // may be backquoted, hence the window.
        if (0..3).any(|offset| self.at_keyword(offset, "KEY")) {
            return self.parse_key_clause().map(BodyEntry::Key);
        }
        if self.at_keyword(0, "CONSTRAINT") {
            // Swallowed balanced up to the body's closing parenthesis,
            // commas included.
            return Ok(BodyEntry::Opaque(self.capture_balanced(&[])?));
        }
        let column_name = self.parse_name()?;
        let definition = self.capture_balanced(&[TokenKind::Comma, TokenKind::Semicolon])?;
        Ok(BodyEntry::Column(ColumnDefinition {
            column_name,
            definition,
        }))
    }

    /// Parse `[PRIMARY|UNIQUE|...] KEY [name] ( columns )`.
    fn parse_key_clause(&mut self) -> Result<IndexDefinition, ParseError> {
        // Everything before KEY is the kind marker; only its first token
        // matters.
        let mut kind = String::new();
        while !self.at_keyword(0, "KEY") {
            match self.advance() {
                Some(token) => {
                    if kind.is_empty() {
                        kind = String::from(token.kind.text());
                    }
                }
                None => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "\"KEY\"".into(),
                    });
                }
            }
        }
        self.advance();

        let name = if kind == "PRIMARY" {
            String::from(PRIMARY_KEY_NAME)
        } else {
            self.parse_name()?
        };
        let columns = self.parse_name_list()?;
        Ok(IndexDefinition {
            kind,
            name,
            columns,
        })
    }

    /// Parse a parenthesized, comma-separated list of names.
    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut names = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token.kind == TokenKind::RParen => break,
                // On end of input the expect below reports the missing ")".
                None => break,
                Some(_) => {}
            }
            names.push(self.parse_name()?);
            match self.peek() {
                Some(token) if token.kind == TokenKind::Comma => {
                    self.advance();
                }
                _ => break,
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(names)
    }

    /// Parse a possibly backquoted name.
    fn parse_name(&mut self) -> Result<String, ParseError> {
        if matches!(self.peek(), Some(token) if token.kind == TokenKind::Backtick) {
            self.advance();
            let name = self.expect_identifier("identifier")?;
            self.expect(&TokenKind::Backtick)?;
            Ok(name)
        } else {
            self.expect_identifier("identifier")
        }
    }

    /// Capture tokens verbatim, tracking parenthesis depth. Stops without
    /// consuming when depth is zero and the next token is `)`, one of the
    /// caller's stop tokens, or end of input.
    fn capture_balanced(&mut self, stops: &[TokenKind]) -> Result<Vec<String>, ParseError> {
        let mut captured = Vec::new();
        let mut depth = 0usize;
        loop {
            let Some(token) = self.peek() else {
                if depth == 0 {
                    break;
                }
                return Err(ParseError::UnexpectedEof {
                    expected: "\")\"".into(),
                });
            };
            if depth == 0 && (token.kind == TokenKind::RParen || stops.contains(&token.kind)) {
                break;
            }
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            captured.push(String::from(token.kind.text()));
            self.advance();
        }
        Ok(captured)
    }

    /// Advance to the next `;` without consuming it.
    fn skip_to_semicolon(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(token) if token.kind == TokenKind::Semicolon => return Ok(()),
                Some(_) => {
                    self.advance();
                }
                None => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "\";\"".into(),
                    });
                }
            }
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Whether the token at `offset` is the given bare keyword.
    fn at_keyword(&self, offset: usize, keyword: &str) -> bool {
        matches!(
            self.peek_at(offset),
            Some(Token { kind: TokenKind::Identifier(name), .. }) if name == keyword
        )
    }

    /// Consume the next token, requiring an exact kind.
    fn expect(&mut self, expected: &TokenKind) -> Result<&'a Token, ParseError> {
        match self.advance() {
            Some(token) if token.kind == *expected => Ok(token),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: format!("{expected:?}"),
                found: token.kind.clone(),
                pos: token.pos,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: format!("{expected:?}"),
            }),
        }
    }

    /// Consume the next token, requiring the given bare keyword.
    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) if name == keyword => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: format!("\"{keyword}\""),
                found: token.kind.clone(),
                pos: token.pos,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: format!("\"{keyword}\""),
            }),
        }
    }

    /// Consume the next token, requiring any identifier, and return its text.
    fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => Ok(name.clone()),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: what.into(),
                found: token.kind.clone(),
                pos: token.pos,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: what.into(),
            }),
        }
    }
}
