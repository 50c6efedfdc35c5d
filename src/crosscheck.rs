// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cross-engine agreement (spec.md §8): for any pattern containing
//! neither look-around, back-references, nor lazy quantifiers, the
//! Thompson VM and the backtracking engine must agree on match presence,
//! start, and end when run over the very same AST. This lives inside the
//! crate (rather than `tests/`) because it drives the backtracking engine
//! directly on patterns dispatch would normally route to Thompson, which
//! needs the private `nfa`/`backtrack`/`parser` modules.

#![cfg(test)]

use crate::backtrack;
use crate::compile::Compiler;
use crate::flags::{Flags, Limits};
use crate::nfa;
use crate::parser::Parser;
use crate::program::{Engine, Program};

/// Force a normally-Thompson-eligible pattern through both engines and
/// compare match presence/bounds over every starting position in `text`.
fn check_agreement(pattern: &str, text: &[u8]) {
    let parsed = Parser::new(pattern).parse().unwrap();
    assert!(
        !parsed.ast.requires_backtracking(),
        "fixture pattern {pattern:?} must be Thompson-eligible"
    );

    let compiler = Compiler::new(false, false, false);
    let insts = compiler.compile(&parsed.ast).unwrap();
    let prog = Program {
        original: pattern.to_string(),
        flags: Flags::new(),
        limits: Limits::default(),
        engine: Engine::Thompson,
        insts,
        ast: Some(parsed.ast.clone()),
        capture_count: parsed.capture_count,
        cap_names: Vec::new(),
        name_to_index: Default::default(),
        prefix: None,
        anchored_begin: false,
        anchored_end: false,
        risk: crate::analyzer::analyze(&parsed.ast).risk,
    };

    for start in 0..=text.len() {
        let thompson = nfa::exec(&prog, text, start);
        let bt = backtrack::exec(&prog, text, start).unwrap();
        let thompson_span = thompson.as_ref().map(|c| (c[0], c[1]));
        let bt_span = bt.as_ref().map(|c| (c[0], c[1]));
        assert_eq!(
            thompson_span, bt_span,
            "engines disagree on {pattern:?} at start {start} over {text:?}"
        );
    }
}

#[test]
fn agreement_on_simple_alternation() {
    check_agreement("cat|dog", b"hotdog and cat");
}

#[test]
fn agreement_on_digit_run() {
    check_agreement(r"\d+", b"abc123def456");
}

#[test]
fn agreement_on_greedy_star_over_class() {
    check_agreement(r"[a-z]*c", b"aaabbbccc");
}

#[test]
fn agreement_on_bounded_repeat() {
    check_agreement(r"a{2,4}b", b"aaaaab a b aab");
}

#[test]
fn agreement_on_nested_group_without_backreference() {
    check_agreement(r"(\w+)@(\w+)", b"alice@example not-an-email bob@test");
}

#[test]
fn agreement_on_no_match() {
    check_agreement(r"xyz+", b"abcdef");
}
