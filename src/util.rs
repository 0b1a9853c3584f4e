// SPDX-License-Identifier: GPL-3.0-or-later

//! Source locations, derived on demand from a token's byte offset.
//!
//! Locating a token is never done during lexing or parsing itself — only
//! when a diagnostic actually needs to be rendered, per the line/column
//! fields on [`Token`](crate::lang::token::Token) being absent from the
//! token itself.

use std::fmt::{self, Display, Formatter};

use crate::lang::token::Token;

/// A location within a source buffer.
///
/// `line` is 0-indexed and `column` counts bytes from the start of the
/// line; both are also 0-indexed internally. Diagnostic rendering uses
/// [`SourceLocation::display_line`] and [`SourceLocation::display_column`]
/// to present the 1-indexed coordinates a human expects.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourceLocation {
    /// 0-indexed line number.
    pub line: u32,

    /// 0-indexed column, in bytes from the start of the line.
    pub column: u32,

    /// Byte offset of the first byte of the line.
    pub line_start: usize,

    /// Byte offset one past the last byte of the line, not counting its
    /// terminating `\n` (or the end of the buffer, for the final line).
    pub line_end: usize,
}

impl SourceLocation {
    /// Locates byte offset `at` within `source`.
    pub fn locate(source: &[u8], at: usize) -> Self {
        let at = at.min(source.len());

        let line_start = source[..at]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);

        let line = source[..line_start]
            .iter()
            .filter(|&&b| b == b'\n')
            .count() as u32;

        let line_end = source[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| line_start + i)
            .unwrap_or(source.len());

        let column = (at - line_start) as u32;

        Self { line, column, line_start, line_end }
    }

    /// Locates the start of `token` within `source`.
    pub fn of_token(source: &[u8], token: Token) -> Self {
        Self::locate(source, token.start)
    }

    /// The line, as a byte slice of `source`, that this location falls on.
    pub fn line_text<'s>(&self, source: &'s [u8]) -> &'s [u8] {
        &source[self.line_start..self.line_end]
    }

    /// 1-indexed line number, for display.
    #[inline]
    pub fn display_line(&self) -> u32 {
        self.line + 1
    }

    /// 1-indexed column, for display.
    #[inline]
    pub fn display_column(&self) -> u32 {
        self.column + 1
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.display_line(), self.display_column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::token::{Token, TokenId};

    fn tok(start: usize, end: usize) -> Token {
        Token { id: TokenId::Identifier, start, end }
    }

    #[test]
    fn locate_first_line() {
        let loc = SourceLocation::locate(b"const = 1;", 6);
        assert_eq!(loc.line, 0);
        assert_eq!(loc.column, 6);
        assert_eq!(loc.display_line(), 1);
        assert_eq!(loc.display_column(), 7);
        assert_eq!(loc.line_start, 0);
        assert_eq!(loc.line_end, 10);
    }

    #[test]
    fn locate_second_line() {
        let src = b"const a = b;\nconst c = d;\n";
        let loc = SourceLocation::locate(src, 13);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 0);
        assert_eq!(loc.line_start, 13);
    }

    #[test]
    fn locate_end_of_buffer() {
        let src = b"abc";
        let loc = SourceLocation::locate(src, 3);
        assert_eq!(loc.column, 3);
        assert_eq!(loc.line_end, 3);
    }

    #[test]
    fn of_token_uses_start() {
        let src = b"a bc";
        let loc = SourceLocation::of_token(src, tok(2, 4));
        assert_eq!(loc.column, 2);
    }

    #[test]
    fn display_format() {
        let loc = SourceLocation::locate(b"const = 1;", 6);
        assert_eq!(format!("{}", loc), "1:7");
    }
}
