// SPDX-License-Identifier: GPL-3.0-or-later

//! The explicit-stack, non-recursive parser (§4.2, §6.2).
//!
//! The parser's own call stack never grows with input depth: every
//! "recursive descent" step pushes a successor state onto an explicit work
//! stack instead of calling itself. A pushback buffer of capacity two lets
//! a state peek one or two tokens ahead and put them back.
//!
//! Because the stack runs LIFO, a state that needs a value produced by a
//! deeper sub-parse (say, a `VarDecl`'s optional type expression) opens a
//! pending slot, pushes its own continuation first, then pushes the
//! sub-parse on top of it. The sub-parse always finishes and writes the
//! slot before the continuation is popped back off.

use crate::diag::{lex_termination, unexpected_token, unsupported_construct, CanonError};
use crate::lang::ast::{
    AddrOfExprNode, Ast, AstBuilder, BlockNode, FnProtoNode, IdentifierNode, Node, NodeId,
    ParamDeclNode, RootNode, VarDeclNode,
};
use crate::lang::lexer::Lexer;
use crate::lang::token::{StringKind, Token, TokenId};

/// Index into the parser's table of pending sub-parse results. Every
/// `(n)`-suffixed production in §6.2 writes its finished node here exactly
/// once; the state that requested the sub-parse reads it back exactly
/// once.
#[derive(Clone, Copy, Debug)]
struct Dest(usize);

/// Visibility/linkage modifiers threaded from a top-level declaration's
/// leading keywords down into its `VarDecl`/`FnProto` production.
#[derive(Clone, Copy, Debug, Default)]
struct DeclCtx {
    visib: Option<Token>,
    r#extern: Option<Token>,
}

#[derive(Clone, Copy, Debug)]
struct VarDeclCtx {
    visib: Option<Token>,
    r#extern: Option<Token>,
    comptime: Option<Token>,
}

#[derive(Clone, Copy, Debug)]
struct FnProtoCtx {
    visib: Option<Token>,
    r#extern: Option<Token>,
    calling_convention: Option<Token>,
}

/// The fixed context captured at `&`, threaded to the continuation that
/// assembles the finished `AddrOfExpr` once its operand is parsed.
#[derive(Clone, Copy, Debug)]
struct AddrOfCtx {
    amp: Token,
    align: Option<NodeId>,
    const_token: Option<Token>,
    volatile_token: Option<Token>,
}

/// One frame of the explicit work stack. Most variants carry the [`Dest`]
/// their finished node should be written to, plus whatever bookkeeping is
/// needed to resume after a nested sub-parse completes.
enum PState {
    TopLevel,
    TopLevelExtern(Option<Token>),
    TopLevelDecl(DeclCtx),
    TopLevelDeclDone(Dest),

    VarDecl(VarDeclCtx, Dest),
    VarDeclType(VarDeclNode, Dest, Dest),
    VarDeclAlign(VarDeclNode, Dest),
    VarDeclEq(VarDeclNode, Dest),
    VarDeclInit(VarDeclNode, Dest, Dest),
    VarDeclFinish(VarDeclNode, Dest),

    FnProto(FnProtoCtx, Dest),
    FnProtoParams(FnProtoNode, Dest),
    FnProtoParam(FnProtoNode, Dest, Dest),
    FnProtoRParen(FnProtoNode, Dest),
    FnProtoReturnType(FnProtoNode, Dest, Dest),
    FnProtoBody(FnProtoNode, Dest),
    FnProtoFinish(FnProtoNode, Dest, Dest),

    ParamDecl(Dest),
    ParamDeclType(ParamDeclNode, Dest, Dest),

    Block(Dest),
    BlockLoop(BlockNode, Dest),
    BlockAfterStmt(BlockNode, Dest, Dest),
    Statement(Dest),
    StatementSemi(Dest, Dest),

    Expression(Dest),
    GroupedExpression(usize),
    UnwrapExpression(Dest),
    BoolOrExpression(Dest),
    BoolAndExpression(Dest),
    ComparisonExpression(Dest),
    BinaryOrExpression(Dest),
    BinaryXorExpression(Dest),
    BinaryAndExpression(Dest),
    BitShiftExpression(Dest),
    AdditionExpression(Dest),
    MultiplyExpression(Dest),
    BraceSuffixExpression(Dest),
    PrefixOpExpression(Dest),
    PrefixOpFinish(AddrOfCtx, Dest, Dest),
    SuffixOpExpression(Dest),
    PrimaryExpression(Dest),
    TypeExpr(Dest),
}

/// A capacity-two LIFO of tokens returned to the stream. Exceeding the
/// capacity is a parser bug, not a recoverable condition (§6.2: pushback
/// never holds more than two tokens at once).
#[derive(Default)]
struct Pushback {
    buf: [Option<Token>; 2],
    len: u8,
}

impl Pushback {
    fn push(&mut self, t: Token) {
        assert!((self.len as usize) < self.buf.len(), "pushback exceeded capacity 2");
        self.buf[self.len as usize] = Some(t);
        self.len += 1;
    }

    fn pop(&mut self) -> Option<Token> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.buf[self.len as usize].take()
    }
}

/// The explicit-stack parser. Consumes a lexer and produces an [`Ast`] or
/// the first [`CanonError`] encountered; there is no error recovery, so
/// parsing stops at the first bad token (§7).
pub struct Parser<'s> {
    path: String,
    source: &'s [u8],
    lexer: Lexer<'s>,
    pushback: Pushback,
    stack: Vec<PState>,
    pending: Vec<Option<NodeId>>,
    ast: AstBuilder,
    decls: Vec<NodeId>,
}

impl<'s> Parser<'s> {
    pub fn new(path: impl Into<String>, source: &'s [u8]) -> Self {
        Self {
            path: path.into(),
            source,
            lexer: Lexer::new(source),
            pushback: Pushback::default(),
            stack: Vec::new(),
            pending: Vec::new(),
            ast: AstBuilder::new(),
            decls: Vec::new(),
        }
    }

    /// Runs the explicit-stack main loop to completion.
    pub fn parse(mut self) -> Result<Ast, CanonError> {
        self.stack.push(PState::TopLevel);
        while let Some(state) = self.stack.pop() {
            self.step(state)?;
        }
        let decls = std::mem::take(&mut self.decls);
        let root = self.ast.alloc(Node::Root(RootNode { decls }));
        Ok(self.ast.finish(root))
    }

    fn advance(&mut self) -> Token {
        self.pushback.pop().unwrap_or_else(|| self.lexer.next())
    }

    fn push_back(&mut self, t: Token) {
        self.pushback.push(t);
    }

    /// Looks at the next token without consuming it. Safe to call any
    /// number of times in a row; it restores exactly what it read.
    fn peek(&mut self) -> Token {
        let t = self.advance();
        self.push_back(t);
        t
    }

    fn expect(&mut self, id: TokenId, expected: &'static str) -> Result<Token, CanonError> {
        let t = self.advance();
        if t.id == id {
            Ok(t)
        } else {
            Err(unexpected_token(&self.path, self.source, t.start, expected, t.id))
        }
    }

    fn new_pending(&mut self) -> Dest {
        let dest = Dest(self.pending.len());
        self.pending.push(None);
        dest
    }

    fn take_pending(&mut self, dest: Dest) -> NodeId {
        self.pending[dest.0].take().expect("pending slot read before write")
    }

    fn write_pending(&mut self, dest: Dest, id: NodeId) {
        self.pending[dest.0] = Some(id);
    }

    fn step(&mut self, state: PState) -> Result<(), CanonError> {
        match state {
            PState::TopLevel => {
                let t = self.advance();
                if t.id == TokenId::Eof {
                    return Ok(());
                }
                let visib = if matches!(t.id, TokenId::KeywordPub | TokenId::KeywordExport) {
                    Some(t)
                } else {
                    self.push_back(t);
                    None
                };
                self.stack.push(PState::TopLevel);
                self.stack.push(PState::TopLevelExtern(visib));
            }

            PState::TopLevelExtern(visib) => {
                let t = self.advance();
                if t.id == TokenId::KeywordExtern {
                    let t2 = self.advance();
                    if let TokenId::StringLiteral(_) = t2.id {
                        return Err(unsupported_construct(
                            &self.path,
                            self.source,
                            t.start,
                            "extern declaration naming a library",
                        ));
                    }
                    self.push_back(t2);
                    self.stack
                        .push(PState::TopLevelDecl(DeclCtx { visib, r#extern: Some(t) }));
                } else {
                    self.push_back(t);
                    self.stack.push(PState::TopLevelDecl(DeclCtx { visib, r#extern: None }));
                }
            }

            PState::TopLevelDecl(ctx) => {
                let t = self.peek();
                match t.id {
                    TokenId::KeywordVar | TokenId::KeywordConst => {
                        let dest = self.new_pending();
                        self.stack.push(PState::TopLevelDeclDone(dest));
                        self.stack.push(PState::VarDecl(
                            VarDeclCtx { visib: ctx.visib, r#extern: ctx.r#extern, comptime: None },
                            dest,
                        ));
                    }
                    TokenId::KeywordColdcc | TokenId::KeywordNakedcc | TokenId::KeywordStdcallcc => {
                        self.advance();
                        let fnk = self.peek();
                        if fnk.id != TokenId::KeywordFn {
                            return Err(unexpected_token(
                                &self.path,
                                self.source,
                                fnk.start,
                                "keyword 'fn'",
                                fnk.id,
                            ));
                        }
                        let dest = self.new_pending();
                        self.stack.push(PState::TopLevelDeclDone(dest));
                        self.stack.push(PState::FnProto(
                            FnProtoCtx {
                                visib: ctx.visib,
                                r#extern: ctx.r#extern,
                                calling_convention: Some(t),
                            },
                            dest,
                        ));
                    }
                    TokenId::KeywordFn => {
                        let dest = self.new_pending();
                        self.stack.push(PState::TopLevelDeclDone(dest));
                        self.stack.push(PState::FnProto(
                            FnProtoCtx { visib: ctx.visib, r#extern: ctx.r#extern, calling_convention: None },
                            dest,
                        ));
                    }
                    _ => {
                        return Err(unexpected_token(
                            &self.path,
                            self.source,
                            t.start,
                            "'var', 'const', 'fn', or a calling convention",
                            t.id,
                        ));
                    }
                }
            }

            PState::TopLevelDeclDone(dest) => {
                let id = self.take_pending(dest);
                self.decls.push(id);
            }

            // --- var decl -----------------------------------------------

            PState::VarDecl(ctx, dest) => {
                let mutability = self.advance();
                if !mutability.id.is_mutability() {
                    return Err(unexpected_token(
                        &self.path,
                        self.source,
                        mutability.start,
                        "'var' or 'const'",
                        mutability.id,
                    ));
                }
                let name = self.expect(TokenId::Identifier, "identifier")?;
                let n = VarDeclNode {
                    visib: ctx.visib,
                    mutability,
                    name,
                    equals: None,
                    comptime: ctx.comptime,
                    r#extern: ctx.r#extern,
                    lib_name: None,
                    ty: None,
                    align: None,
                    init: None,
                    semicolon: name, // overwritten in VarDeclFinish before the node is ever read
                };

                let t = self.peek();
                if t.id == TokenId::Colon {
                    self.advance();
                    let ty_dest = self.new_pending();
                    self.stack.push(PState::VarDeclType(n, dest, ty_dest));
                    self.stack.push(PState::TypeExpr(ty_dest));
                } else {
                    self.stack.push(PState::VarDeclAlign(n, dest));
                }
            }

            PState::VarDeclType(mut n, dest, ty_dest) => {
                n.ty = Some(self.take_pending(ty_dest));
                self.stack.push(PState::VarDeclAlign(n, dest));
            }

            PState::VarDeclAlign(n, dest) => {
                let t = self.peek();
                if t.id == TokenId::KeywordAlign {
                    self.advance();
                    self.expect(TokenId::LParen, "'('")?;
                    self.stack.push(PState::GroupedExpression(t.start));
                    return Ok(());
                }
                self.stack.push(PState::VarDeclEq(n, dest));
            }

            PState::VarDeclEq(mut n, dest) => {
                let t = self.peek();
                if t.id == TokenId::Equal {
                    n.equals = Some(self.advance());
                    let init_dest = self.new_pending();
                    self.stack.push(PState::VarDeclInit(n, dest, init_dest));
                    self.stack.push(PState::Expression(init_dest));
                } else {
                    self.stack.push(PState::VarDeclFinish(n, dest));
                }
            }

            PState::VarDeclInit(mut n, dest, init_dest) => {
                n.init = Some(self.take_pending(init_dest));
                self.stack.push(PState::VarDeclFinish(n, dest));
            }

            PState::VarDeclFinish(mut n, dest) => {
                n.semicolon = self.expect(TokenId::Semicolon, "';'")?;
                let id = self.ast.alloc(Node::VarDecl(n));
                self.write_pending(dest, id);
            }

            // --- fn proto ------------------------------------------------

            PState::FnProto(ctx, dest) => {
                let fn_token = self.expect(TokenId::KeywordFn, "keyword 'fn'")?;
                let t = self.peek();
                let name = if t.id == TokenId::Identifier { Some(self.advance()) } else { None };
                let lparen = self.expect(TokenId::LParen, "'('")?;
                let n = FnProtoNode {
                    visib: ctx.visib,
                    fn_token,
                    name,
                    lparen,
                    params: Vec::new(),
                    rparen: lparen, // overwritten once ')' is consumed
                    var_args: None,
                    align: None,
                    return_type: None,
                    r#extern: ctx.r#extern,
                    inline: None,
                    calling_convention: ctx.calling_convention,
                    lib_name: None,
                    body: None,
                };
                self.stack.push(PState::FnProtoParams(n, dest));
            }

            PState::FnProtoParams(mut n, dest) => {
                let t = self.peek();
                if t.id == TokenId::RParen {
                    n.rparen = self.advance();
                    self.stack.push(PState::FnProtoRParen(n, dest));
                } else {
                    let param_dest = self.new_pending();
                    self.stack.push(PState::FnProtoParam(n, dest, param_dest));
                    self.stack.push(PState::ParamDecl(param_dest));
                }
            }

            PState::FnProtoParam(mut n, dest, param_dest) => {
                let param = self.take_pending(param_dest);
                n.params.push(param);
                let t = self.peek();
                if t.id == TokenId::Comma {
                    self.advance();
                    self.stack.push(PState::FnProtoParams(n, dest));
                } else {
                    n.rparen = self.expect(TokenId::RParen, "')'")?;
                    self.stack.push(PState::FnProtoRParen(n, dest));
                }
            }

            PState::FnProtoRParen(n, dest) => {
                let t = self.peek();
                if t.id == TokenId::KeywordAlign {
                    self.advance();
                    self.expect(TokenId::LParen, "'('")?;
                    self.stack.push(PState::GroupedExpression(t.start));
                    return Ok(());
                }
                let t2 = self.peek();
                if t2.id == TokenId::Arrow {
                    self.advance();
                    let ret_dest = self.new_pending();
                    self.stack.push(PState::FnProtoReturnType(n, dest, ret_dest));
                    self.stack.push(PState::TypeExpr(ret_dest));
                } else {
                    self.stack.push(PState::FnProtoBody(n, dest));
                }
            }

            PState::FnProtoReturnType(mut n, dest, ret_dest) => {
                n.return_type = Some(self.take_pending(ret_dest));
                self.stack.push(PState::FnProtoBody(n, dest));
            }

            PState::FnProtoBody(n, dest) => {
                let t = self.advance();
                match t.id {
                    TokenId::Semicolon => {
                        let id = self.ast.alloc(Node::FnProto(n));
                        self.write_pending(dest, id);
                    }
                    TokenId::LBrace => {
                        self.push_back(t);
                        let body_dest = self.new_pending();
                        self.stack.push(PState::FnProtoFinish(n, dest, body_dest));
                        self.stack.push(PState::Block(body_dest));
                    }
                    _ => {
                        return Err(unexpected_token(
                            &self.path,
                            self.source,
                            t.start,
                            "';' or a block",
                            t.id,
                        ));
                    }
                }
            }

            PState::FnProtoFinish(mut n, dest, body_dest) => {
                n.body = Some(self.take_pending(body_dest));
                let id = self.ast.alloc(Node::FnProto(n));
                self.write_pending(dest, id);
            }

            // --- param decl ----------------------------------------------

            PState::ParamDecl(dest) => {
                let t = self.peek();
                let comptime = if t.id == TokenId::KeywordComptime { Some(self.advance()) } else { None };
                let t2 = self.peek();
                let noalias = if t2.id == TokenId::KeywordNoalias { Some(self.advance()) } else { None };

                let t3 = self.advance();
                if t3.id == TokenId::Ellipsis3 {
                    let node = Node::ParamDecl(ParamDeclNode {
                        comptime,
                        noalias,
                        name: None,
                        colon: None,
                        ty: None,
                        var_args: Some(t3),
                    });
                    let id = self.ast.alloc(node);
                    self.write_pending(dest, id);
                    return Ok(());
                }

                let (name, colon) = if t3.id == TokenId::Identifier {
                    let t4 = self.advance();
                    if t4.id == TokenId::Colon {
                        (Some(t3), Some(t4))
                    } else {
                        self.push_back(t4);
                        self.push_back(t3);
                        (None, None)
                    }
                } else {
                    self.push_back(t3);
                    (None, None)
                };

                let n = ParamDeclNode { comptime, noalias, name, colon, ty: None, var_args: None };
                let ty_dest = self.new_pending();
                self.stack.push(PState::ParamDeclType(n, dest, ty_dest));
                self.stack.push(PState::TypeExpr(ty_dest));
            }

            PState::ParamDeclType(mut n, dest, ty_dest) => {
                n.ty = Some(self.take_pending(ty_dest));
                let id = self.ast.alloc(Node::ParamDecl(n));
                self.write_pending(dest, id);
            }

            // --- block / statement ---------------------------------------

            PState::Block(dest) => {
                let lbrace = self.expect(TokenId::LBrace, "'{'")?;
                let n = BlockNode { lbrace, stmts: Vec::new(), rbrace: lbrace };
                self.stack.push(PState::BlockLoop(n, dest));
            }

            PState::BlockLoop(mut n, dest) => {
                let t = self.peek();
                if t.id == TokenId::RBrace {
                    n.rbrace = self.advance();
                    let id = self.ast.alloc(Node::Block(n));
                    self.write_pending(dest, id);
                } else {
                    let stmt_dest = self.new_pending();
                    self.stack.push(PState::BlockAfterStmt(n, dest, stmt_dest));
                    self.stack.push(PState::Statement(stmt_dest));
                }
            }

            PState::BlockAfterStmt(mut n, dest, stmt_dest) => {
                let id = self.take_pending(stmt_dest);
                n.stmts.push(id);
                self.stack.push(PState::BlockLoop(n, dest));
            }

            PState::Statement(dest) => {
                let t = self.peek();
                match t.id {
                    TokenId::KeywordComptime => {
                        self.advance();
                        let t2 = self.peek();
                        if !t2.id.is_mutability() {
                            return Err(unexpected_token(
                                &self.path,
                                self.source,
                                t2.start,
                                "'var' or 'const'",
                                t2.id,
                            ));
                        }
                        self.stack.push(PState::VarDecl(
                            VarDeclCtx { visib: None, r#extern: None, comptime: Some(t) },
                            dest,
                        ));
                    }
                    TokenId::KeywordVar | TokenId::KeywordConst => {
                        self.stack.push(PState::VarDecl(
                            VarDeclCtx { visib: None, r#extern: None, comptime: None },
                            dest,
                        ));
                    }
                    _ => {
                        let expr_dest = self.new_pending();
                        self.stack.push(PState::StatementSemi(expr_dest, dest));
                        self.stack.push(PState::Expression(expr_dest));
                    }
                }
            }

            PState::StatementSemi(expr_dest, dest) => {
                self.expect(TokenId::Semicolon, "';'")?;
                let id = self.take_pending(expr_dest);
                self.write_pending(dest, id);
            }

            // --- expression layering (§4.2) -------------------------------
            //
            // Every layer below Expression and above PrefixOpExpression is a
            // pass-through: it exists so the precedence chain can grow new
            // operators without renumbering states, not because it does
            // anything today.

            PState::Expression(dest) => self.stack.push(PState::UnwrapExpression(dest)),
            PState::UnwrapExpression(dest) => self.stack.push(PState::BoolOrExpression(dest)),
            PState::BoolOrExpression(dest) => self.stack.push(PState::BoolAndExpression(dest)),
            PState::BoolAndExpression(dest) => self.stack.push(PState::ComparisonExpression(dest)),
            PState::ComparisonExpression(dest) => self.stack.push(PState::BinaryOrExpression(dest)),
            PState::BinaryOrExpression(dest) => self.stack.push(PState::BinaryXorExpression(dest)),
            PState::BinaryXorExpression(dest) => self.stack.push(PState::BinaryAndExpression(dest)),
            PState::BinaryAndExpression(dest) => self.stack.push(PState::BitShiftExpression(dest)),
            PState::BitShiftExpression(dest) => self.stack.push(PState::AdditionExpression(dest)),
            PState::AdditionExpression(dest) => self.stack.push(PState::MultiplyExpression(dest)),
            PState::MultiplyExpression(dest) => self.stack.push(PState::BraceSuffixExpression(dest)),
            PState::BraceSuffixExpression(dest) => self.stack.push(PState::PrefixOpExpression(dest)),

            PState::PrefixOpExpression(dest) => {
                let t = self.advance();
                if t.id != TokenId::Ampersand {
                    self.push_back(t);
                    self.stack.push(PState::SuffixOpExpression(dest));
                    return Ok(());
                }

                let t2 = self.peek();
                if t2.id == TokenId::KeywordAlign {
                    self.advance();
                    self.expect(TokenId::LParen, "'('")?;
                    self.stack.push(PState::GroupedExpression(t2.start));
                    return Ok(());
                }

                let t3 = self.peek();
                let const_token = if t3.id == TokenId::KeywordConst { Some(self.advance()) } else { None };
                let t4 = self.peek();
                let volatile_token =
                    if t4.id == TokenId::KeywordVolatile { Some(self.advance()) } else { None };

                let ctx = AddrOfCtx { amp: t, align: None, const_token, volatile_token };
                let operand_dest = self.new_pending();
                self.stack.push(PState::PrefixOpFinish(ctx, operand_dest, dest));
                self.stack.push(PState::PrefixOpExpression(operand_dest));
            }

            PState::PrefixOpFinish(ctx, operand_dest, dest) => {
                let operand = self.take_pending(operand_dest);
                let node = Node::AddrOfExpr(AddrOfExprNode {
                    amp: ctx.amp,
                    align: ctx.align,
                    bit_offset_start: None,
                    bit_offset_end: None,
                    const_token: ctx.const_token,
                    volatile_token: ctx.volatile_token,
                    operand,
                });
                let id = self.ast.alloc(node);
                self.write_pending(dest, id);
            }

            PState::SuffixOpExpression(dest) => self.stack.push(PState::PrimaryExpression(dest)),

            PState::PrimaryExpression(dest) => {
                let t = self.advance();
                if let TokenId::StringLiteral(kind) = t.id {
                    if string_literal_is_unterminated(kind, t.start, t.end, self.source) {
                        return Err(lex_termination(&self.path, self.source, t.end));
                    }
                }
                if t.id != TokenId::Identifier {
                    return Err(unexpected_token(&self.path, self.source, t.start, "identifier", t.id));
                }
                let id = self.ast.alloc(Node::Identifier(IdentifierNode { name: t }));
                self.write_pending(dest, id);
            }

            PState::TypeExpr(dest) => {
                let t = self.peek();
                if t.id == TokenId::KeywordVar {
                    return Err(unsupported_construct(
                        &self.path,
                        self.source,
                        t.start,
                        "'var' in type position",
                    ));
                }
                self.stack.push(PState::Expression(dest));
            }

            PState::GroupedExpression(at) => {
                return Err(unsupported_construct(&self.path, self.source, at, "align(...) expression"));
            }
        }
        Ok(())
    }
}

/// A string literal token's lexer only ever breaks out of its scanning loop
/// by consuming a real closing quote, or by stopping at a bare newline or
/// EOF instead. So the token is unterminated unless its last byte is a
/// quote distinct from its opening one.
fn string_literal_is_unterminated(kind: StringKind, start: usize, end: usize, source: &[u8]) -> bool {
    let quote_pos = start + if kind == StringKind::CPrefixed { 1 } else { 0 };
    !(end > quote_pos + 1 && source.get(end - 1) == Some(&b'"'))
}

/// Parses `source` in its entirety, reporting diagnostics against `path`.
pub fn parse_source(path: impl Into<String>, source: &[u8]) -> Result<Ast, CanonError> {
    Parser::new(path, source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ast::NodeKind;

    #[test]
    fn parses_simple_const_decl() {
        let ast = parse_source("t.zig", b"const a = b;").unwrap();
        let root = ast.node(ast.root());
        let Node::Root(r) = root else { panic!("expected root") };
        assert_eq!(r.decls.len(), 1);
        let decl = ast.node(r.decls[0]);
        assert_eq!(decl.kind(), NodeKind::VarDecl);
    }

    #[test]
    fn reports_unexpected_token_at_equals() {
        let err = parse_source("t.zig", b"const = 1;").unwrap_err();
        let rendered = format!("{}", err);
        assert!(rendered.contains("t.zig: 1:7: expected identifier, found '='"), "{rendered}");
    }

    #[test]
    fn parses_extern_var_without_initializer() {
        let ast = parse_source("t.zig", b"extern var foo: c_int;").unwrap();
        let Node::Root(r) = ast.node(ast.root()) else { panic!() };
        let Node::VarDecl(v) = ast.node(r.decls[0]) else { panic!("expected VarDecl") };
        assert!(v.r#extern.is_some());
        assert!(v.init.is_none());
        assert!(v.ty.is_some());
    }

    #[test]
    fn parses_fn_proto_with_params_and_body() {
        let src = b"fn add(a: c_int, b: c_int) -> c_int { const r = a; }";
        let ast = parse_source("t.zig", src).unwrap();
        let Node::Root(r) = ast.node(ast.root()) else { panic!() };
        let Node::FnProto(f) = ast.node(r.decls[0]) else { panic!("expected FnProto") };
        assert_eq!(f.params.len(), 2);
        assert!(f.return_type.is_some());
        assert!(f.body.is_some());
    }

    #[test]
    fn parses_variadic_param() {
        let ast = parse_source("t.zig", b"extern fn printf(fmt: c_int, ...) ;").unwrap();
        let Node::Root(r) = ast.node(ast.root()) else { panic!() };
        let Node::FnProto(f) = ast.node(r.decls[0]) else { panic!("expected FnProto") };
        assert_eq!(f.params.len(), 2);
        let Node::ParamDecl(p) = ast.node(f.params[1]) else { panic!("expected ParamDecl") };
        assert!(p.var_args.is_some());
        assert!(p.ty.is_none());
    }

    #[test]
    fn parses_address_of_with_modifiers() {
        let ast = parse_source("t.zig", b"const p = &const volatile x;").unwrap();
        let Node::Root(r) = ast.node(ast.root()) else { panic!() };
        let Node::VarDecl(v) = ast.node(r.decls[0]) else { panic!() };
        let Node::AddrOfExpr(a) = ast.node(v.init.unwrap()) else { panic!("expected AddrOfExpr") };
        assert!(a.const_token.is_some());
        assert!(a.volatile_token.is_some());
    }

    #[test]
    fn nested_address_of_parses_as_two_stacked_prefix_ops() {
        let ast = parse_source("t.zig", b"const argv = &&u8;").unwrap();
        let Node::Root(r) = ast.node(ast.root()) else { panic!() };
        let Node::VarDecl(v) = ast.node(r.decls[0]) else { panic!() };
        let Node::AddrOfExpr(outer) = ast.node(v.init.unwrap()) else {
            panic!("expected outer AddrOfExpr")
        };
        let Node::AddrOfExpr(_inner) = ast.node(outer.operand) else {
            panic!("expected nested AddrOfExpr as operand")
        };
    }

    #[test]
    fn align_expression_is_unsupported() {
        let err = parse_source("t.zig", b"const a align(4) = 1;").unwrap_err();
        assert!(matches!(err, CanonError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn extern_library_string_is_unsupported() {
        let err = parse_source("t.zig", b"extern \"c\" fn foo() ;").unwrap_err();
        assert!(matches!(err, CanonError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn terminated_string_literal_used_as_an_expression_is_an_unexpected_token() {
        let err = parse_source("t.zig", b"const a = \"hi\";").unwrap_err();
        assert!(matches!(err, CanonError::UnexpectedToken { .. }));
    }

    #[test]
    fn unterminated_string_literal_reports_lex_termination() {
        let err = parse_source("t.zig", b"const a = \"oops\nconst b = 1;").unwrap_err();
        assert!(matches!(err, CanonError::LexTermination { .. }));
    }
}
