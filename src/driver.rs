// SPDX-License-Identifier: GPL-3.0-or-later

//! The formatting pipeline's orchestrator: owns the path/session-level
//! state, invokes each phase in order, and surfaces the first error.

use crate::diag::CanonError;
use crate::lang::ast::Ast;
use crate::lang::lexer::Lexer;
use crate::lang::parser::Parser;
use crate::lang::printer::Printer;
use crate::lang::token::Token;

/// Runs one source buffer through lex → parse → print.
pub struct Formatter {
    path: String,
}

impl Formatter {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Formats `source`, returning the canonical text.
    pub fn format(&self, source: &[u8]) -> Result<String, CanonError> {
        let ast = self.parse(source)?;
        let printed = Printer::new(source).print(&ast)?;
        ast.teardown();
        Ok(printed)
    }

    /// Runs only the lexer, returning every token including the
    /// terminating `Eof`. Used by the CLI's `====tokenization:====`
    /// section and by tests that check lexer behavior in isolation.
    pub fn tokenize(&self, source: &[u8]) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let t = lexer.next();
            let done = t.id == crate::lang::token::TokenId::Eof;
            tokens.push(t);
            if done {
                break;
            }
        }
        tokens
    }

    /// Runs the lexer and parser, returning the AST without printing it.
    /// Used by the CLI's `====parse:====` section.
    pub fn parse(&self, source: &[u8]) -> Result<Ast, CanonError> {
        Parser::new(self.path.clone(), source).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_runs_full_pipeline() {
        let f = Formatter::new("t.zig");
        assert_eq!(f.format(b"const a=1;").unwrap(), "const a = 1;\n");
    }

    #[test]
    fn tokenize_ends_with_eof() {
        let f = Formatter::new("t.zig");
        let tokens = f.tokenize(b"const a = 1;");
        assert_eq!(tokens.last().unwrap().id, crate::lang::token::TokenId::Eof);
    }
}
