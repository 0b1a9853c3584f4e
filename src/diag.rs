// SPDX-License-Identifier: GPL-3.0-or-later

//! The error taxonomy of §7 and the diagnostic rendering that backs it.
//!
//! There is exactly one family of failures a formatting run can produce,
//! so this stays a hand-rolled enum rather than a derive-macro error type:
//! each variant carries everything a caller needs to render it.

use std::fmt::{self, Display, Formatter};
use std::io;

use colored::Colorize;

use crate::lang::token::TokenId;
use crate::util::SourceLocation;

/// The error taxonomy of §7.
#[derive(Debug)]
pub enum CanonError {
    /// A string or number literal ran into an unexpected newline or EOF
    /// before it was closed.
    LexTermination { path: String, loc: SourceLocation, line: String },

    /// The parser found a token whose id was not in the expected set at
    /// the current state.
    UnexpectedToken {
        path: String,
        loc: SourceLocation,
        line: String,
        expected: &'static str,
        found: TokenId,
    },

    /// A grammar-valid construct whose implementation is intentionally
    /// deferred (§9 Open Questions).
    UnsupportedConstruct { path: String, loc: SourceLocation, line: String, what: &'static str },

    /// Reading the source or writing formatted output failed.
    Io { path: String, source: io::Error },
}

impl CanonError {
    fn path(&self) -> &str {
        match self {
            CanonError::LexTermination { path, .. } => path,
            CanonError::UnexpectedToken { path, .. } => path,
            CanonError::UnsupportedConstruct { path, .. } => path,
            CanonError::Io { path, .. } => path,
        }
    }
}

impl Display for CanonError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            CanonError::LexTermination { loc, line, .. } => {
                writeln!(f, "{}: {}: unterminated literal", self.path(), loc)?;
                write_caret(f, loc, line)
            }
            CanonError::UnexpectedToken { loc, line, expected, found, .. } => {
                writeln!(f, "{}: {}: expected {}, found {}", self.path(), loc, expected, found)?;
                write_caret(f, loc, line)
            }
            CanonError::UnsupportedConstruct { loc, line, what, .. } => {
                writeln!(f, "{}: {}: unsupported construct: {}", self.path(), loc, what)?;
                write_caret(f, loc, line)
            }
            CanonError::Io { path, source } => write!(f, "{}: {}", path, source),
        }
    }
}

impl std::error::Error for CanonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CanonError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Emits the offending source line followed by a caret under its column.
/// Coloring goes through `colored`, which already no-ops when stderr isn't
/// a terminal.
fn write_caret(f: &mut Formatter, loc: &SourceLocation, line: &str) -> fmt::Result {
    writeln!(f, "{}", line)?;
    let prefix = " ".repeat(loc.column as usize);
    writeln!(f, "{}{}", prefix, "^".red().bold())
}

/// Builds a [`CanonError::LexTermination`] from a source buffer and the
/// offset where the literal broke off.
pub fn lex_termination(path: &str, source: &[u8], at: usize) -> CanonError {
    let (loc, line) = locate(source, at);
    CanonError::LexTermination { path: path.to_string(), loc, line }
}

/// Builds a [`CanonError::UnexpectedToken`] from a source buffer, path, and
/// offending token, doing the §3.2 location lookup and line extraction.
pub fn unexpected_token(
    path: &str,
    source: &[u8],
    at: usize,
    expected: &'static str,
    found: TokenId,
) -> CanonError {
    let (loc, line) = locate(source, at);
    CanonError::UnexpectedToken { path: path.to_string(), loc, line, expected, found }
}

/// Builds a [`CanonError::UnsupportedConstruct`].
pub fn unsupported_construct(
    path: &str,
    source: &[u8],
    at: usize,
    what: &'static str,
) -> CanonError {
    let (loc, line) = locate(source, at);
    CanonError::UnsupportedConstruct { path: path.to_string(), loc, line, what }
}

fn locate(source: &[u8], at: usize) -> (SourceLocation, String) {
    let loc = SourceLocation::locate(source, at);
    let line = String::from_utf8_lossy(loc.line_text(source)).into_owned();
    (loc, line)
}
