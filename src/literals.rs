// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Literal-prefix extraction: the one "optimizer" hint spec.md keeps in
//! scope (§4.6, §9 — the broader AST-rewrite optimizer is out of scope).
//!
//! If a pattern opens with a run of required literal bytes, `find` can
//! skip straight to the next candidate occurrence of that run with a
//! byte search instead of stepping the matching engine one position at a
//! time through text that can never start a match.

use memchr::memmem;

use crate::ast::Ast;

/// A literal byte-string prefix extracted from the front of a pattern,
/// when one exists and is long enough to be worth using (spec.md §4.6:
/// "a literal prefix of ≥ 2 bytes").
#[derive(Clone, Debug)]
pub struct Prefix {
    bytes: Vec<u8>,
}

impl Prefix {
    /// Locate the next occurrence of this prefix at or after `from` in
    /// `haystack`. Returns the byte offset where the *match* would have to
    /// start, or `None` if the prefix does not occur again.
    pub fn find_from(&self, haystack: &[u8], from: usize) -> Option<usize> {
        if from > haystack.len() {
            return None;
        }
        memmem::find(&haystack[from..], &self.bytes).map(|rel| from + rel)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Walk the front of `ast` collecting a run of unconditional literal
/// bytes. Stops at the first node that isn't a guaranteed-present literal
/// (a quantifier, alternation, class, anchor, ...). Case-insensitive
/// patterns never get a prefix here: dispatch only uses this fast path
/// when `!case_insensitive` anyway (spec.md §4.6), so there is no need to
/// special-case folding in the byte search itself.
pub fn extract_prefix(ast: &Ast) -> Option<Prefix> {
    let mut bytes = Vec::new();
    collect(ast, &mut bytes);
    if bytes.len() >= 2 {
        Some(Prefix { bytes })
    } else {
        None
    }
}

fn collect(ast: &Ast, out: &mut Vec<u8>) {
    match *ast {
        Ast::Literal { c, .. } => out.push(c),
        Ast::Concat { ref left, ref right, .. } => {
            let before = out.len();
            collect(left, out);
            // Only continue into the right side if the left side was
            // entirely a fixed literal run (didn't stop early because it
            // hit something non-literal).
            if is_fixed_literal(left) && out.len() == before + literal_len(left) {
                collect(right, out);
            }
        }
        Ast::Group { ref child, capture: None, .. } => collect(child, out),
        _ => {}
    }
}

fn is_fixed_literal(ast: &Ast) -> bool {
    match *ast {
        Ast::Literal { .. } => true,
        Ast::Concat { ref left, ref right, .. } => is_fixed_literal(left) && is_fixed_literal(right),
        Ast::Group { ref child, capture: None, .. } => is_fixed_literal(child),
        _ => false,
    }
}

fn literal_len(ast: &Ast) -> usize {
    match *ast {
        Ast::Literal { .. } => 1,
        Ast::Concat { ref left, ref right, .. } => literal_len(left) + literal_len(right),
        Ast::Group { ref child, capture: None, .. } => literal_len(child),
        _ => 0,
    }
}
