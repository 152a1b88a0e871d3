//! Tokenizer for schema dump text.
//!
//! Splits raw DDL into identifiers and the handful of punctuation marks the
//! statement grammar cares about. Single- and double-quoted text is unwrapped
//! into plain identifier tokens, backquotes are emitted as their own tokens
//! (the parser's name rule consumes them), and `--` line comments are
//! stripped before anything else is considered.

use alloc::string::String;
use alloc::vec::Vec;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Byte offset in the input where this token starts.
    pub pos: usize,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier or keyword, case preserved, quoting already unwrapped.
    Identifier(String),
    /// A backquote delimiting a quoted name.
    Backtick,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// Comma.
    Comma,
    /// Statement terminator.
    Semicolon,
}

impl TokenKind {
    /// The textual form of this token, as it appeared in the input.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            TokenKind::Identifier(name) => name,
            TokenKind::Backtick => "`",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
        }
    }
}

/// The punctuation set that both ends a pending identifier and is emitted as
/// a token of its own.
fn split_token(c: char) -> Option<TokenKind> {
    match c {
        '`' => Some(TokenKind::Backtick),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        _ => None,
    }
}

/// The quote characters whose content is unwrapped into one identifier token.
fn is_quote_char(c: char) -> bool {
    matches!(c, '\'' | '"')
}

/// Errors that can occur during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// A quoted run was still open at end of input.
    #[error("Unterminated {quote} quote starting at position {pos}")]
    UnterminatedQuote {
        /// The quote character that was never closed.
        quote: char,
        /// Byte offset where the quote was opened.
        pos: usize,
    },
}

/// Lexer that turns schema text into a flat token sequence in one pass.
pub struct Lexer {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Lexer {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    /// Tokenize the whole input.
    ///
    /// Comments are stripped with line-level semantics: a `--` starts a
    /// comment even inside a quoted run, mirroring tools that strip comments
    /// per line before parsing. Whitespace separates tokens and is never
    /// emitted.
    ///
    /// # Errors
    ///
    /// Returns [`LexerError::UnterminatedQuote`] if a single or double quote
    /// is still open at end of input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        let mut pending = String::new();
        let mut pending_pos = 0;
        // Active quote character and the offset where it was opened.
        let mut quote: Option<(char, usize)> = None;

        while let Some(&(offset, c)) = self.chars.get(self.pos) {
            if c == '-' && matches!(self.chars.get(self.pos + 1), Some(&(_, '-'))) {
                // Line comment. The newline survives and is handled below as
                // whitespace (or as a literal character inside a quote).
                while let Some(&(_, skipped)) = self.chars.get(self.pos) {
                    if skipped == '\n' {
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            self.pos += 1;

            if let Some((open, _)) = quote {
                if c == open {
                    flush(&mut tokens, &mut pending, pending_pos);
                    quote = None;
                } else {
                    if pending.is_empty() {
                        pending_pos = offset;
                    }
                    pending.push(c);
                }
            } else if is_quote_char(c) {
                // Entering a quote neither flushes nor emits anything: the
                // quoted content joins whatever identifier is pending.
                quote = Some((c, offset));
            } else if let Some(kind) = split_token(c) {
                flush(&mut tokens, &mut pending, pending_pos);
                tokens.push(Token { kind, pos: offset });
            } else if c.is_whitespace() {
                flush(&mut tokens, &mut pending, pending_pos);
            } else {
                if pending.is_empty() {
                    pending_pos = offset;
                }
                pending.push(c);
            }
        }

        if let Some((open, open_pos)) = quote {
            return Err(LexerError::UnterminatedQuote {
                quote: open,
                pos: open_pos,
            });
        }
        flush(&mut tokens, &mut pending, pending_pos);
        Ok(tokens)
    }
}

/// Emit the pending identifier, if any, as a token.
fn flush(tokens: &mut Vec<Token>, pending: &mut String, pos: usize) {
    if !pending.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Identifier(core::mem::take(pending)),
            pos,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::borrow::ToOwned;
    use alloc::vec;
    use alloc::vec::Vec;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_owned())
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            kinds("CREATE TABLE t (a INT);"),
            vec![
                ident("CREATE"),
                ident("TABLE"),
                ident("t"),
                TokenKind::LParen,
                ident("a"),
                ident("INT"),
                TokenKind::RParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_backticks_are_emitted() {
        assert_eq!(
            kinds("`a`,`b`"),
            vec![
                TokenKind::Backtick,
                ident("a"),
                TokenKind::Backtick,
                TokenKind::Comma,
                TokenKind::Backtick,
                ident("b"),
                TokenKind::Backtick,
            ]
        );
    }

    #[test]
    fn test_quotes_are_unwrapped() {
        assert_eq!(
            kinds("'hello' \"world\""),
            vec![ident("hello"), ident("world")]
        );
    }

    #[test]
    fn test_quote_joins_pending_identifier() {
        // A quote opened mid-identifier extends the same token.
        assert_eq!(kinds("abc'def'"), vec![ident("abcdef")]);
    }

    #[test]
    fn test_other_quote_style_is_literal_inside_quote() {
        assert_eq!(kinds("\"it's\""), vec![ident("it's")]);
        assert_eq!(kinds("'a(b);c'"), vec![ident("a(b);c")]);
    }

    #[test]
    fn test_empty_quotes_emit_nothing() {
        assert_eq!(kinds("a '' b"), vec![ident("a"), ident("b")]);
    }

    #[test]
    fn test_line_comment_is_invisible() {
        assert_eq!(kinds("a -- note\nb"), vec![ident("a"), ident("b")]);
        assert_eq!(kinds("-- only a comment"), vec![]);
    }

    #[test]
    fn test_comment_strips_even_inside_quote() {
        // Line-level stripping: the newline itself stays part of the quote.
        assert_eq!(kinds("'ab--cd\nef'"), vec![ident("ab\nef")]);
    }

    #[test]
    fn test_lone_dash_is_part_of_identifier() {
        assert_eq!(kinds("a-b"), vec![ident("a-b")]);
    }

    #[test]
    fn test_pending_identifier_flushed_at_end() {
        assert_eq!(
            kinds("CREATE TABLE t"),
            vec![ident("CREATE"), ident("TABLE"), ident("t")]
        );
    }

    #[test]
    fn test_unterminated_quote_is_fatal() {
        assert_eq!(
            Lexer::new("a 'oops").tokenize(),
            Err(LexerError::UnterminatedQuote {
                quote: '\'',
                pos: 2
            })
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = Lexer::new("ab (").tokenize().unwrap();
        assert_eq!(tokens[0].pos, 0);
        assert_eq!(tokens[1].pos, 3);
    }
}
