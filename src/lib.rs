// SPDX-License-Identifier: GPL-3.0-or-later

//! Canonical source formatter: lexer, explicit-stack parser, AST, and
//! printer for a small statically-typed systems-language subset.
//!
//! [`format_source`] is the crate's whole public contract: feed it a path
//! (used only for diagnostics) and a source buffer, get back canonical
//! text or the first [`diag::CanonError`] encountered. Everything else in
//! this crate exists to implement that one function.

pub mod diag;
pub mod driver;
pub mod lang;
pub mod util;

pub use diag::CanonError;
pub use driver::Formatter;

/// Formats `source` in its entirety.
pub fn format_source(path: impl Into<String>, source: &[u8]) -> Result<String, CanonError> {
    Formatter::new(path).format(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_canonical_scenario_one() {
        let out = format_source("t.zig", b"const a=1;").unwrap();
        assert_eq!(out, "const a = 1;\n");
    }

    #[test]
    fn reports_the_canonical_unexpected_token_diagnostic() {
        let err = format_source("t.zig", b"const = 1;").unwrap_err();
        assert!(format!("{}", err).contains("t.zig: 1:7: expected identifier, found '='"));
    }
}
