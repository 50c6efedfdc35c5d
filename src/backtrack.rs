// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The recursive backtracking engine: runs directly over the AST rather
//! than a compiled instruction stream, and is the only engine that can
//! represent look-around, back-references and lazy quantifiers
//! (spec.md §4.5).
//!
//! Every recursive step is continuation-passing: matching a node takes
//! "the rest of the pattern" as a closure and calls it once the node has
//! consumed its share of the input. This is what lets `Concat` just
//! recurse into its left child with a continuation that matches the
//! right child, instead of needing to first enumerate every place the
//! left child could stop — backtracking falls out of the closure
//! returning "no match" and the caller trying its next option.
//!
//! Capture state (`Vec<Option<usize>>`) is threaded by value, exactly as
//! in the NFA's `add()`: a branch point clones it once per alternative,
//! so a failed alternative can never leak its captures into a sibling.
//!
//! The whole walk is metered by a single step counter shared across the
//! recursion; exceeding `Limits::max_steps` aborts the search immediately
//! with `StepBudgetExceeded` rather than ever running unbounded.

use crate::ast::Ast;
use crate::nfa::empty_look_matches;
use crate::program::Program;

/// Raised when a single `find_at` call exceeds its step budget. Never
/// exposed as an `Error` variant (see `error.rs`): the caller treats it
/// the same as "no match at this position" for public-API purposes, but
/// `exec.rs` uses it to stop scanning further start positions rather
/// than silently pretending the text is clean.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepBudgetExceeded;

type Caps = Vec<Option<usize>>;
type BtResult = Result<Option<Caps>, StepBudgetExceeded>;
type Cont<'c> = &'c mut dyn FnMut(&mut Backtracker, usize, Caps) -> BtResult;

/// Try an anchored match of `prog`'s AST starting exactly at `start`.
pub fn exec(prog: &Program, input: &[u8], start: usize) -> BtResult {
    let ast = prog.ast.as_ref().expect("backtracking engine requires a retained AST");
    let ncaps = 2 * (prog.capture_count as usize + 1);
    let mut caps = vec![None; ncaps];
    caps[0] = Some(start);

    let mut bt = Backtracker {
        input,
        case_insensitive: prog.flags.case_insensitive,
        dot_all: prog.flags.dot_all,
        multiline: prog.flags.multiline,
        steps: 0,
        max_steps: prog.limits.max_steps,
    };
    bt.m(ast, start, caps, &mut |_, pos, mut c| {
        c[1] = Some(pos);
        Ok(Some(c))
    })
}

struct Backtracker<'t> {
    input: &'t [u8],
    case_insensitive: bool,
    dot_all: bool,
    multiline: bool,
    steps: u64,
    max_steps: u64,
}

fn lower(b: u8) -> u8 {
    if b.is_ascii_uppercase() { b + 32 } else { b }
}

impl<'t> Backtracker<'t> {
    fn tick(&mut self) -> Result<(), StepBudgetExceeded> {
        self.steps += 1;
        if self.steps > self.max_steps {
            Err(StepBudgetExceeded)
        } else {
            Ok(())
        }
    }

    fn byte_eq(&self, a: u8, b: u8) -> bool {
        if self.case_insensitive { lower(a) == lower(b) } else { a == b }
    }

    /// Match `ast` starting at `pos` with capture state `caps`, then
    /// invoke `k` with whatever position `ast` stopped at. Returns the
    /// final capture vector from the first successful continuation, in
    /// the node's own preference order (greedy tries "more" before
    /// "less", lazy the reverse, alternation tries left before right).
    fn m(&mut self, ast: &Ast, pos: usize, caps: Caps, k: Cont) -> BtResult {
        self.tick()?;
        match *ast {
            Ast::Literal { c, .. } => match self.input.get(pos) {
                Some(&b) if self.byte_eq(b, c) => k(self, pos + 1, caps),
                _ => Ok(None),
            },
            Ast::Any { .. } => match self.input.get(pos) {
                Some(&b) if self.dot_all || b != b'\n' => k(self, pos + 1, caps),
                _ => Ok(None),
            },
            Ast::CharClass { ref class, .. } => match self.input.get(pos) {
                Some(&b) => {
                    let hit = class.matches(b)
                        || (self.case_insensitive && (class.matches(lower(b)) || class.matches(b.to_ascii_uppercase())));
                    if hit { k(self, pos + 1, caps) } else { Ok(None) }
                }
                None => Ok(None),
            },
            Ast::Anchor { kind, .. } => {
                if empty_look_matches(kind, self.input, pos, self.multiline) {
                    k(self, pos, caps)
                } else {
                    Ok(None)
                }
            }
            Ast::Empty { .. } => k(self, pos, caps),
            Ast::Concat { ref left, ref right, .. } => {
                self.m(left, pos, caps, &mut |slf, p2, c2| slf.m(right, p2, c2, k))
            }
            Ast::Alternation { ref left, ref right, .. } => {
                let alt = caps.clone();
                match self.m(left, pos, caps, k)? {
                    Some(c) => Ok(Some(c)),
                    None => self.m(right, pos, alt, k),
                }
            }
            Ast::Group { ref child, capture: Some(idx), .. } => {
                let slot = 2 * idx as usize;
                self.m(child, pos, caps, &mut |slf, p2, mut c2| {
                    if slot + 1 < c2.len() {
                        c2[slot] = Some(pos);
                        c2[slot + 1] = Some(p2);
                    }
                    k(slf, p2, c2)
                })
            }
            Ast::Group { ref child, capture: None, .. } => self.m(child, pos, caps, k),
            Ast::Star { ref child, greedy, .. } => self.repeat(child, pos, caps, 0, None, greedy, 0, k),
            Ast::Plus { ref child, greedy, .. } => self.repeat(child, pos, caps, 1, None, greedy, 0, k),
            Ast::Optional { ref child, greedy, .. } => {
                self.repeat(child, pos, caps, 0, Some(1), greedy, 0, k)
            }
            Ast::Repeat { ref child, min, max, greedy, .. } => {
                self.repeat(child, pos, caps, min, max, greedy, 0, k)
            }
            Ast::Lookahead { ref child, positive, .. } => {
                let probe = caps.clone();
                let hit = self.m(child, pos, probe, &mut |_, _, c| Ok(Some(c)))?.is_some();
                if hit == positive { k(self, pos, caps) } else { Ok(None) }
            }
            Ast::Lookbehind { ref child, positive, .. } => {
                let mut hit = false;
                for s in (0..=pos).rev() {
                    let probe = caps.clone();
                    let reached = self
                        .m(child, s, probe, &mut |_, p2, c| if p2 == pos { Ok(Some(c)) } else { Ok(None) })?
                        .is_some();
                    if reached {
                        hit = true;
                        break;
                    }
                }
                if hit == positive { k(self, pos, caps) } else { Ok(None) }
            }
            Ast::Backref { index, .. } => {
                let slot = 2 * index as usize;
                match (caps.get(slot).copied().flatten(), caps.get(slot + 1).copied().flatten()) {
                    (Some(s), Some(e)) => {
                        let len = e - s;
                        if pos + len <= self.input.len()
                            && (0..len).all(|i| self.byte_eq(self.input[s + i], self.input[pos + i]))
                        {
                            k(self, pos + len, caps)
                        } else {
                            Ok(None)
                        }
                    }
                    _ => Ok(None),
                }
            }
        }
    }

    /// Try repeating `child` `count..` more times starting at `pos`,
    /// honoring `min`/`max` and `greedy`, then hand off to `k`. A
    /// zero-width repetition that makes no progress never recurses
    /// further — `(a*)*` would otherwise diverge.
    #[allow(clippy::too_many_arguments)]
    fn repeat(
        &mut self,
        child: &Ast,
        pos: usize,
        caps: Caps,
        min: u32,
        max: Option<u32>,
        greedy: bool,
        count: u32,
        k: Cont,
    ) -> BtResult {
        self.tick()?;
        let can_stop = count >= min;
        let can_continue = max.map_or(true, |m| count < m);

        let try_more = |slf: &mut Self, caps: Caps| -> BtResult {
            if !can_continue {
                return Ok(None);
            }
            let guard_count = count;
            slf.m(child, pos, caps, &mut |slf, p2, c2| {
                if p2 == pos && guard_count >= min.max(1) {
                    return Ok(None);
                }
                slf.repeat(child, p2, c2, min, max, greedy, guard_count + 1, k)
            })
        };

        if greedy {
            let attempt = caps.clone();
            if let Some(c) = try_more(self, attempt)? {
                return Ok(Some(c));
            }
            if can_stop { k(self, pos, caps) } else { Ok(None) }
        } else {
            if can_stop {
                let attempt = caps.clone();
                if let Some(c) = k(self, pos, attempt)? {
                    return Ok(Some(c));
                }
            }
            try_more(self, caps)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Flags;
    use crate::program::Program;

    fn run(pat: &str, input: &[u8], start: usize) -> Option<Vec<Option<usize>>> {
        let prog = Program::new(pat, Flags::new()).unwrap();
        exec(&prog, input, start).unwrap()
    }

    #[test]
    fn backreference_matches_repeated_word() {
        let caps = run(r"(\w+) \1", b"abc abc", 0).unwrap();
        assert_eq!((caps[0], caps[1]), (Some(0), Some(7)));
    }

    #[test]
    fn backreference_rejects_mismatch() {
        assert!(run(r"(\w+) \1", b"abc xyz", 0).is_none());
    }

    #[test]
    fn positive_lookahead_requires_suffix() {
        let caps = run(r"foo(?=bar)", b"foobar", 0).unwrap();
        assert_eq!((caps[0], caps[1]), (Some(0), Some(3)));
        assert!(run(r"foo(?=bar)", b"foobaz", 0).is_none());
    }

    #[test]
    fn negative_lookbehind_blocks_match() {
        assert!(run(r"(?<!not )foo", b"not foo", 4).is_none());
        let caps = run(r"(?<!not )foo", b"big foo", 4).unwrap();
        assert_eq!(caps[0], Some(4));
    }

    #[test]
    fn lazy_quantifier_stops_as_soon_as_possible() {
        let caps = run(r"a.*?b", b"axbxb", 0).unwrap();
        assert_eq!((caps[0], caps[1]), (Some(0), Some(3)));
    }

    #[test]
    fn nested_empty_star_does_not_diverge() {
        // `(a?)*` can match the child zero-width forever; the no-progress
        // guard must cut this off rather than blow the step budget.
        let caps = run(r"(a?)*b", b"b", 0).unwrap();
        assert_eq!((caps[0], caps[1]), (Some(0), Some(1)));
    }

    #[test]
    fn caret_respects_multiline_flag_on_backtracking_engine() {
        // `\1` forces this pattern onto the backtracking engine even though
        // it has no quantifier-driven risk; `^` must still only match the
        // very start of the text unless `multiline` is set.
        let prog = Program::new(r"^(a)\1", Flags::new()).unwrap();
        assert!(exec(&prog, b"b\naa", 2).unwrap().is_none());

        let flags = Flags::new().multiline(true);
        let prog = Program::new(r"^(a)\1", flags).unwrap();
        assert!(exec(&prog, b"b\naa", 2).unwrap().is_some());
    }
}
