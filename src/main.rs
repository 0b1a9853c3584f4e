// SPDX-License-Identifier: GPL-3.0-or-later

use std::env::args;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, stderr, stdout, Read, Write};
use std::process::ExitCode;

use canonfmt::lang::ast::{Ast, NodeId};
use canonfmt::lang::printer::Printer;
use canonfmt::Formatter;

/// The name of the program, used in diagnostics.
pub const PROGRAM_NAME: &str = "canonfmt";

fn main() -> ExitCode {
    let mut dump_tree = false;
    let mut path = None;

    for arg in args().skip(1) {
        if arg == "--dump-tree" {
            dump_tree = true;
        } else {
            path = Some(arg);
        }
    }

    let Some(path) = path else {
        let _ = writeln!(stderr(), "usage: {} [--dump-tree] <source-file>", PROGRAM_NAME);
        return ExitCode::FAILURE;
    };

    match run(&path, dump_tree) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let _ = writeln!(stderr(), "{}: {}", PROGRAM_NAME, err);
            ExitCode::FAILURE
        }
    }
}

/// Reads `path`, runs it through the formatter, and writes the four
/// stderr sections plus the canonical text on stdout. Returns `Ok(false)`
/// on a formatting diagnostic (already printed) and `Err` only for I/O
/// failure reading the source.
fn run(path: &str, dump_tree: bool) -> io::Result<bool> {
    let mut source = Vec::new();
    File::open(path)?.read_to_end(&mut source)?;

    let mut err = stderr();

    writeln!(err, "====input:====")?;
    err.write_all(&source)?;
    if !source.ends_with(b"\n") {
        writeln!(err)?;
    }

    let formatter = Formatter::new(path);

    writeln!(err, "====tokenization:====")?;
    for token in formatter.tokenize(&source) {
        writeln!(err, "{:?} {:?}", token.id, String::from_utf8_lossy(token.text(&source)))?;
    }

    writeln!(err, "====parse:====")?;
    let ast = match formatter.parse(&source) {
        Ok(ast) => ast,
        Err(diag) => {
            writeln!(err, "{}", diag)?;
            return Ok(false);
        }
    };
    if dump_tree {
        write!(err, "{}", dump_tree_text(&ast))?;
    } else {
        writeln!(err, "ok")?;
    }

    writeln!(err, "====fmt:====")?;
    let printed = match Printer::new(&source).print(&ast) {
        Ok(printed) => printed,
        Err(diag) => {
            writeln!(err, "{}", diag)?;
            ast.teardown();
            return Ok(false);
        }
    };
    ast.teardown();

    let mut out = stdout();
    out.write_all(printed.as_bytes())?;
    Ok(true)
}

/// Renders an indented pre-order dump of every node, for `--dump-tree`.
/// Walks the same [`Ast::child`] enumeration `Ast::teardown` uses, so a
/// bug in one traversal tends to surface in the other too.
fn dump_tree_text(ast: &Ast) -> String {
    let mut out = String::new();
    let mut stack: Vec<(NodeId, usize)> = vec![(ast.root(), 0)];
    let mut depth = 0usize;

    let _ = writeln!(out, "{:indent$}{:?}", "", ast.node(ast.root()).kind(), indent = depth * 2);

    while let Some(frame) = stack.last_mut() {
        let (id, next) = *frame;
        match ast.child(id, next) {
            Some(child_id) => {
                frame.1 += 1;
                depth += 1;
                let _ = writeln!(
                    out,
                    "{:indent$}{:?}",
                    "",
                    ast.node(child_id).kind(),
                    indent = depth * 2
                );
                stack.push((child_id, 0));
            }
            None => {
                stack.pop();
                depth = depth.saturating_sub(1);
            }
        }
    }

    out
}
