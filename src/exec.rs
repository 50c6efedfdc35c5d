// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The dispatch layer: picks an engine per `Program::engine`, drives the
//! literal-prefix fast path, and turns a single anchored match primitive
//! into "find the first match at or after a given position" (spec.md
//! §4.6, §5).

use crate::backtrack;
use crate::nfa;
use crate::program::{Engine, Program};

/// Run one anchored match attempt at `start`, dispatched to whichever
/// engine `prog` was bound to at compile time. A backtracking step-budget
/// overrun is treated as "no match here" rather than surfaced to the
/// caller — `find` below still won't advance past it silently forever
/// because each call only burns the budget once per start position.
pub fn find_at(prog: &Program, text: &[u8], start: usize) -> Option<Vec<Option<usize>>> {
    match prog.engine {
        Engine::Thompson => nfa::exec(prog, text, start),
        Engine::Backtrack => match backtrack::exec(prog, text, start) {
            Ok(caps) => caps,
            Err(backtrack::StepBudgetExceeded) => {
                log::debug!("step budget exceeded matching {:?} at byte {}", prog.original, start);
                None
            }
        },
    }
}

/// Find the leftmost match starting at or after `from`. Uses the
/// extracted literal prefix to skip straight to candidate start
/// positions when one is available, and gives up after the first failed
/// attempt for `\A`-anchored patterns rather than scanning the rest of
/// the text uselessly.
pub fn find(prog: &Program, text: &[u8], from: usize) -> Option<Vec<Option<usize>>> {
    let mut start = from;
    if let Some(ref prefix) = prog.prefix {
        start = prefix.find_from(text, start)?;
    }
    loop {
        if start > text.len() {
            return None;
        }
        if let Some(caps) = find_at(prog, text, start) {
            return Some(caps);
        }
        if prog.anchored_begin {
            return None;
        }
        if start >= text.len() {
            return None;
        }
        start += 1;
        if let Some(ref prefix) = prog.prefix {
            start = prefix.find_from(text, start)?;
        }
    }
}

/// The position `find_all`/`find_iter` should resume searching from
/// after a match spanning `[start, end)`: past the match, except a
/// zero-width match steps one byte forward so iteration always makes
/// progress (spec.md §5 "zero-width advance rule").
pub fn next_search_start(start: usize, end: usize) -> usize {
    if end > start { end } else { end + 1 }
}

pub fn is_match(prog: &Program, text: &[u8], from: usize) -> bool {
    find(prog, text, from).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Flags;
    use crate::program::Program;

    #[test]
    fn prefix_fast_path_skips_to_occurrence() {
        let prog = Program::new("dog", Flags::new()).unwrap();
        let caps = find(&prog, b"hotdog barking dog", 0).unwrap();
        assert_eq!((caps[0], caps[1]), (Some(3), Some(6)));
    }

    #[test]
    fn anchored_pattern_gives_up_after_one_try() {
        let prog = Program::new(r"\Afoo", Flags::new()).unwrap();
        assert!(find(&prog, b"xxxfoo", 0).is_none());
        assert!(find(&prog, b"fooxxx", 0).is_some());
    }

    #[test]
    fn next_search_start_advances_past_zero_width_match() {
        assert_eq!(next_search_start(2, 2), 3);
        assert_eq!(next_search_start(2, 5), 5);
    }
}
