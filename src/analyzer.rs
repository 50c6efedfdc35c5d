// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The pre-compilation ReDoS safety analyzer (spec.md §4.2).
//!
//! This is the static half of the crate's two-layer ReDoS defense; the
//! runtime half is the backtracking engine's step budget
//! (`backtrack::MAX_STEPS`). The analyzer never inspects input — it only
//! ever sees the AST, once, before any matching engine is built.

use crate::ast::Ast;

/// The risk bucket a pattern's `explosion_factor` falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    fn from_factor(factor: f64) -> RiskLevel {
        if factor < 10.0 {
            RiskLevel::Safe
        } else if factor < 100.0 {
            RiskLevel::Low
        } else if factor < 10_000.0 {
            RiskLevel::Medium
        } else if factor < 1_000_000.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

/// The result of analyzing a pattern's AST.
#[derive(Clone, Copy, Debug)]
pub struct Report {
    pub explosion_factor: f64,
    pub risk: RiskLevel,
    /// False iff the AST contains look-around or a back-reference — the
    /// two constructs the Thompson compiler cannot lower (spec.md §4.3).
    pub can_use_thompson: bool,
}

/// Analyze `ast` and compute its risk report.
///
/// This walks the tree once. Quantifier nesting is tracked via a small
/// running depth counter passed down through recursion rather than
/// re-walking subtrees, so the whole pass is linear in AST size.
pub fn analyze(ast: &Ast) -> Report {
    let mut factor = 1.0f64;
    walk(ast, 0, &mut factor);
    let can_use_thompson = !ast.requires_backtracking()
        || !contains_lookaround_or_backref(ast);
    // `requires_backtracking` also trips on lazy quantifiers, which the
    // Thompson VM still *cannot* honor (spec.md §4.3's note on ordering),
    // so Thompson-eligibility is specifically about look-around/back-ref,
    // tracked separately here and authoritative over the engine-selection
    // helper on `Ast`.
    Report {
        explosion_factor: factor,
        risk: RiskLevel::from_factor(factor),
        can_use_thompson,
    }
}

fn contains_lookaround_or_backref(ast: &Ast) -> bool {
    match *ast {
        Ast::Lookahead { .. } | Ast::Lookbehind { .. } | Ast::Backref { .. } => true,
        Ast::Star { ref child, .. }
        | Ast::Plus { ref child, .. }
        | Ast::Optional { ref child, .. }
        | Ast::Repeat { ref child, .. }
        | Ast::Group { ref child, .. } => contains_lookaround_or_backref(child),
        Ast::Concat { ref left, ref right, .. }
        | Ast::Alternation { ref left, ref right, .. } => {
            contains_lookaround_or_backref(left) || contains_lookaround_or_backref(right)
        }
        Ast::Literal { .. }
        | Ast::Any { .. }
        | Ast::Anchor { .. }
        | Ast::CharClass { .. }
        | Ast::Empty { .. } => false,
    }
}

/// True iff `ast` is "atomic" in the sense spec.md §4.2 uses for the
/// medium-penalty case: a quantifier directly over a character class or
/// `.`, or a concatenation ending in those (e.g. the body of `(?:\d+)+`).
fn is_atomic(ast: &Ast) -> bool {
    match *ast {
        Ast::CharClass { .. } | Ast::Any { .. } => true,
        Ast::Group { ref child, .. } => is_atomic(child),
        Ast::Concat { ref right, .. } => is_atomic(right),
        _ => false,
    }
}

/// True iff `ast` itself directly contains a quantifier at its top level
/// (through transparent wrappers: group, concat-tail).
fn has_quantifier(ast: &Ast) -> bool {
    match *ast {
        Ast::Star { .. } | Ast::Plus { .. } | Ast::Optional { .. } | Ast::Repeat { .. } => true,
        Ast::Group { ref child, .. } => has_quantifier(child),
        Ast::Concat { ref left, ref right, .. } => has_quantifier(left) || has_quantifier(right),
        _ => false,
    }
}

fn walk(ast: &Ast, quant_depth: u32, factor: &mut f64) {
    match *ast {
        Ast::Star { ref child, greedy, .. }
        | Ast::Plus { ref child, greedy, .. }
        | Ast::Optional { ref child, greedy, .. } => {
            score_quantifier(child, greedy, quant_depth, factor);
            walk(child, quant_depth + 1, factor);
        }
        Ast::Repeat { ref child, greedy, .. } => {
            score_quantifier(child, greedy, quant_depth, factor);
            walk(child, quant_depth + 1, factor);
        }
        Ast::Group { ref child, .. } => walk(child, quant_depth, factor),
        Ast::Lookahead { ref child, .. } | Ast::Lookbehind { ref child, .. } => {
            // Look-around bodies are independent sub-problems; a pathological
            // body still costs the backtracker real work, so analyze it too,
            // but don't let its nesting depth compound with the outer scope.
            walk(child, 0, factor);
        }
        Ast::Concat { ref left, ref right, .. } => {
            score_identical_alternation(left, right);
            walk(left, quant_depth, factor);
            walk(right, quant_depth, factor);
        }
        Ast::Alternation { ref left, ref right, .. } => {
            if ast_equal(left, right) {
                *factor *= 10_000.0;
            }
            walk(left, quant_depth, factor);
            walk(right, quant_depth, factor);
        }
        Ast::Literal { .. }
        | Ast::Any { .. }
        | Ast::Anchor { .. }
        | Ast::CharClass { .. }
        | Ast::Backref { .. }
        | Ast::Empty { .. } => {}
    }
}

fn score_quantifier(child: &Ast, greedy: bool, quant_depth: u32, factor: &mut f64) {
    if has_quantifier(child) {
        if is_atomic_quantified(child) {
            *factor *= 100.0; // e.g. (?:\d+)+
        } else {
            *factor *= 1_000_000.0; // e.g. (a+)+
        }
    }
    if quant_depth >= 2 {
        *factor *= 1_000.0; // triple+ nesting
    }
    if !greedy {
        *factor *= 1.5;
    }
}

/// True iff `child` is itself a quantifier directly wrapping an atomic
/// expression — the `(?:\d+)+` medium-risk shape from spec.md's table.
fn is_atomic_quantified(child: &Ast) -> bool {
    match *child {
        Ast::Star { child: ref inner, .. }
        | Ast::Plus { child: ref inner, .. }
        | Ast::Optional { child: ref inner, .. }
        | Ast::Repeat { child: ref inner, .. } => is_atomic(inner),
        Ast::Group { child: ref inner, .. } => is_atomic_quantified(inner),
        Ast::Concat { ref right, .. } => is_atomic_quantified(right),
        _ => false,
    }
}

fn score_identical_alternation(_left: &Ast, _right: &Ast) {
    // Alternation scoring happens at the Alternation node itself; concat
    // does not introduce alternation risk directly.
}

fn ast_equal(a: &Ast, b: &Ast) -> bool {
    use Ast::*;
    match (a, b) {
        (Literal { c: c1, .. }, Literal { c: c2, .. }) => c1 == c2,
        (Any { .. }, Any { .. }) => true,
        (Anchor { kind: k1, .. }, Anchor { kind: k2, .. }) => k1 == k2,
        (CharClass { class: c1, .. }, CharClass { class: c2, .. }) => c1 == c2,
        (Empty { .. }, Empty { .. }) => true,
        (Concat { left: l1, right: r1, .. }, Concat { left: l2, right: r2, .. }) => {
            ast_equal(l1, l2) && ast_equal(r1, r2)
        }
        (Alternation { left: l1, right: r1, .. }, Alternation { left: l2, right: r2, .. }) => {
            ast_equal(l1, l2) && ast_equal(r1, r2)
        }
        (Star { child: c1, greedy: g1, .. }, Star { child: c2, greedy: g2, .. }) => {
            g1 == g2 && ast_equal(c1, c2)
        }
        (Plus { child: c1, greedy: g1, .. }, Plus { child: c2, greedy: g2, .. }) => {
            g1 == g2 && ast_equal(c1, c2)
        }
        (Optional { child: c1, greedy: g1, .. }, Optional { child: c2, greedy: g2, .. }) => {
            g1 == g2 && ast_equal(c1, c2)
        }
        (
            Repeat { child: c1, min: m1, max: x1, greedy: g1, .. },
            Repeat { child: c2, min: m2, max: x2, greedy: g2, .. },
        ) => m1 == m2 && x1 == x2 && g1 == g2 && ast_equal(c1, c2),
        (Group { child: c1, .. }, Group { child: c2, .. }) => ast_equal(c1, c2),
        (Backref { index: i1, .. }, Backref { index: i2, .. }) => i1 == i2,
        _ => false,
    }
}
