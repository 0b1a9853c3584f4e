// SPDX-License-Identifier: GPL-3.0-or-later

//! The canonical printer (§4.4): an independent explicit-stack walk over
//! the AST that renders fixed-point, idempotent source text (P1/P2).
//!
//! Indentation is a single scalar mutated by explicit `Indent` frames on
//! the same work stack that walks the tree — there is no recursive
//! "indent level" parameter threaded through function calls. A node's
//! render step builds its output in natural left-to-right order and hands
//! the whole sequence to [`Printer::push_seq`], which reverses it onto the
//! LIFO stack so it pops back out in the order it was written.

use crate::diag::CanonError;
use crate::lang::ast::{Ast, Node, NodeId};
use crate::lang::token::Token;

const INDENT_UNIT: &str = "    ";

/// One frame of the printer's explicit work stack.
enum RenderState {
    /// Print the node and (via further pushed frames) its children.
    Node(NodeId),
    /// Emit a literal string as-is.
    Text(&'static str),
    /// Emit a token's source text verbatim.
    TokenText(Token),
    /// Adjust the current indent level by `delta`.
    Indent(i32),
    /// Emit a newline followed by the current indent.
    NewlineIndent,
}

pub struct Printer<'s> {
    source: &'s [u8],
    out: String,
    indent: u32,
    stack: Vec<RenderState>,
}

impl<'s> Printer<'s> {
    pub fn new(source: &'s [u8]) -> Self {
        Self { source, out: String::new(), indent: 0, stack: Vec::new() }
    }

    /// Renders `ast` to canonical source text.
    pub fn print(mut self, ast: &Ast) -> Result<String, CanonError> {
        self.stack.push(RenderState::Node(ast.root()));
        while let Some(state) = self.stack.pop() {
            self.step(ast, state)?;
        }
        Ok(self.out)
    }

    /// Pushes `items` (given in the order they should print) onto the
    /// LIFO work stack so they come back off in that same order.
    fn push_seq(&mut self, items: Vec<RenderState>) {
        for item in items.into_iter().rev() {
            self.stack.push(item);
        }
    }

    fn step(&mut self, ast: &Ast, state: RenderState) -> Result<(), CanonError> {
        match state {
            RenderState::Text(s) => self.out.push_str(s),
            RenderState::TokenText(t) => {
                self.out.push_str(&String::from_utf8_lossy(t.text(self.source)));
            }
            RenderState::Indent(delta) => {
                self.indent = (self.indent as i32 + delta).max(0) as u32;
            }
            RenderState::NewlineIndent => {
                self.out.push('\n');
                for _ in 0..self.indent {
                    self.out.push_str(INDENT_UNIT);
                }
            }
            RenderState::Node(id) => self.render_node(ast, id)?,
        }
        Ok(())
    }

    fn render_node(&mut self, ast: &Ast, id: NodeId) -> Result<(), CanonError> {
        use RenderState::{Node as N, Text as S, TokenText as T};

        match ast.node(id) {
            Node::Root(n) => {
                let mut seq = Vec::new();
                for decl in n.decls.iter() {
                    seq.push(N(*decl));
                    seq.push(S("\n"));
                }
                self.push_seq(seq);
            }

            Node::VarDecl(n) => {
                let mut seq = Vec::new();
                if n.visib.is_some() {
                    seq.push(S("pub "));
                }
                if n.r#extern.is_some() {
                    seq.push(S("extern "));
                }
                if n.comptime.is_some() {
                    seq.push(S("comptime "));
                }
                seq.push(T(n.mutability));
                seq.push(S(" "));
                seq.push(T(n.name));
                if let Some(ty) = n.ty {
                    seq.push(S(": "));
                    seq.push(N(ty));
                }
                if let Some(init) = n.init {
                    seq.push(S(" = "));
                    seq.push(N(init));
                }
                seq.push(T(n.semicolon));
                self.push_seq(seq);
            }

            Node::Identifier(n) => self.push_seq(vec![T(n.name)]),

            Node::FnProto(n) => {
                let mut seq = Vec::new();
                if n.visib.is_some() {
                    seq.push(S("pub "));
                }
                if n.r#extern.is_some() {
                    seq.push(S("extern "));
                }
                if n.inline.is_some() {
                    seq.push(S("inline "));
                }
                if let Some(cc) = n.calling_convention {
                    seq.push(T(cc));
                    seq.push(S(" "));
                }
                seq.push(S("fn"));
                if let Some(name) = n.name {
                    seq.push(S(" "));
                    seq.push(T(name));
                }
                seq.push(S("("));
                for (i, param) in n.params.iter().enumerate() {
                    if i > 0 {
                        seq.push(S(", "));
                    }
                    seq.push(N(*param));
                }
                seq.push(S(")"));
                if let Some(rt) = n.return_type {
                    seq.push(S(" -> "));
                    seq.push(N(rt));
                }
                match n.body {
                    Some(body) => {
                        seq.push(S(" "));
                        seq.push(N(body));
                    }
                    None => seq.push(S(";")),
                }
                self.push_seq(seq);
            }

            Node::ParamDecl(n) => {
                let mut seq = Vec::new();
                if n.comptime.is_some() {
                    seq.push(S("comptime "));
                }
                if n.noalias.is_some() {
                    seq.push(S("noalias "));
                }
                if let (Some(name), Some(_)) = (n.name, n.colon) {
                    seq.push(T(name));
                    seq.push(S(": "));
                }
                if n.var_args.is_some() {
                    seq.push(S("..."));
                } else if let Some(ty) = n.ty {
                    seq.push(N(ty));
                }
                self.push_seq(seq);
            }

            Node::AddrOfExpr(n) => {
                let mut seq = vec![S("&")];
                if n.const_token.is_some() {
                    seq.push(S("const "));
                }
                if n.volatile_token.is_some() {
                    seq.push(S("volatile "));
                }
                seq.push(N(n.operand));
                self.push_seq(seq);
            }

            Node::Block(n) => {
                let mut seq = vec![S("{"), RenderState::Indent(1)];
                for stmt in n.stmts.iter().copied() {
                    seq.push(RenderState::NewlineIndent);
                    seq.push(N(stmt));
                }
                seq.push(RenderState::Indent(-1));
                seq.push(RenderState::NewlineIndent);
                seq.push(S("}"));
                self.push_seq(seq);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::parser::parse_source;

    fn roundtrip(src: &str) -> String {
        let ast = parse_source("t.zig", src.as_bytes()).expect("parse");
        Printer::new(src.as_bytes()).print(&ast).expect("print")
    }

    #[test]
    fn canonicalizes_spacing_around_const_decl() {
        assert_eq!(roundtrip("const a=1;"), "const a = 1;\n");
    }

    #[test]
    fn is_a_fixed_point_on_already_canonical_input() {
        let canonical = "const a = b;\n";
        assert_eq!(roundtrip(canonical), canonical);
    }

    #[test]
    fn printing_twice_is_idempotent() {
        let once = roundtrip("const   a   =   b ;");
        let twice = {
            let ast = parse_source("t.zig", once.as_bytes()).unwrap();
            Printer::new(once.as_bytes()).print(&ast).unwrap()
        };
        assert_eq!(once, twice);
    }

    #[test]
    fn extern_var_without_initializer() {
        assert_eq!(roundtrip("extern var foo:c_int;"), "extern var foo: c_int;\n");
    }

    #[test]
    fn fn_proto_with_params_and_block_body() {
        let src = "fn add(a:c_int,b:c_int)->c_int{const r=a;}";
        let expected = "fn add(a: c_int, b: c_int) -> c_int {\n    const r = a;\n}\n";
        assert_eq!(roundtrip(src), expected);
    }

    #[test]
    fn extern_fn_forward_declaration_ends_in_semicolon() {
        assert_eq!(roundtrip("extern fn abort() ;"), "extern fn abort();\n");
    }

    #[test]
    fn address_of_with_modifiers() {
        assert_eq!(
            roundtrip("const p=&const volatile x;"),
            "const p = &const volatile x;\n"
        );
    }

    #[test]
    fn variadic_param_keeps_ellipsis() {
        assert_eq!(
            roundtrip("extern fn printf(fmt:c_int,...) ;"),
            "extern fn printf(fmt: c_int, ...);\n"
        );
    }

    #[test]
    fn nested_address_of_stacks_prefix_operators() {
        assert_eq!(roundtrip("const p = &&u8;"), "const p = &&u8;\n");
    }
}
