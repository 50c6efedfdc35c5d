// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A regular expression engine with a pre-compilation ReDoS safety
//! analyzer, a linear-time Thompson-NFA backend and a bounded
//! backtracking backend for look-around, back-references and lazy
//! quantifiers.
//!
//! ```
//! use saferegex::Regex;
//!
//! let re = Regex::new(r"(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})").unwrap();
//! let caps = re.captures("born 1997-04-12 today").unwrap();
//! assert_eq!(caps.name("year").unwrap().as_str(), Some("1997"));
//! ```
//!
//! Every pattern is risk-scored before it is ever run against text
//! (`analyzer`); patterns whose AST can only be matched correctly with
//! backtracking are rejected outright above [`Limits::reject_at`] rather
//! than compiled and left to blow the step budget on the first adversarial
//! input.

mod analyzer;
mod ast;
mod backtrack;
mod captures;
mod charclass;
mod compile;
#[cfg(test)]
mod crosscheck;
mod error;
mod exec;
mod flags;
mod inst;
mod literals;
mod nfa;
mod parser;
mod program;

pub use crate::analyzer::RiskLevel;
pub use crate::captures::{Captures, Match};
pub use crate::error::Error;
pub use crate::flags::{Flags, Limits};
pub use crate::program::Engine;

use crate::captures::expand_template;
use crate::program::Program;

/// A compiled regular expression.
///
/// Cloning a `Regex` is cheap-ish (it clones the compiled program) but
/// not free; build one per pattern and reuse it, the way every example
/// in this crate's test suite does.
#[derive(Clone, Debug)]
pub struct Regex {
    prog: Program,
}

impl Regex {
    /// Compile `pattern` with default flags and limits.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Regex::with_flags(pattern, Flags::default())
    }

    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Regex, Error> {
        Ok(Regex { prog: Program::new(pattern, flags)? })
    }

    /// Compile with an explicit [`Limits`] override, e.g. to allow
    /// `Medium`-risk patterns through or to raise the backtracking step
    /// budget for a known-safe but expensive pattern.
    pub fn compile_with_limits(pattern: &str, flags: Flags, limits: Limits) -> Result<Regex, Error> {
        Ok(Regex { prog: Program::with_limits(pattern, flags, limits)? })
    }

    pub fn as_str(&self) -> &str {
        &self.prog.original
    }

    /// Which engine this pattern was bound to at compile time.
    pub fn engine(&self) -> Engine {
        self.prog.engine
    }

    /// The safety analyzer's risk bucket for this pattern.
    pub fn risk(&self) -> RiskLevel {
        self.prog.risk
    }

    pub fn is_match(&self, text: &str) -> bool {
        exec::is_match(&self.prog, text.as_bytes(), 0)
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_at(text, 0)
    }

    pub fn find_at<'t>(&self, text: &'t str, start: usize) -> Option<Match<'t>> {
        let bytes = text.as_bytes();
        let slots = exec::find(&self.prog, bytes, start)?;
        let (s, e) = (slots[0]?, slots[1]?);
        Some(captures::match_from(bytes, s, e))
    }

    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        let bytes = text.as_bytes();
        let slots = exec::find(&self.prog, bytes, 0)?;
        Some(Captures::new(&self.prog, bytes, slots))
    }

    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> FindMatches<'r, 't> {
        FindMatches { prog: &self.prog, text, last_end: 0, done: false }
    }

    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        CaptureMatches { prog: &self.prog, text, last_end: 0, done: false }
    }

    /// Split `text` on every non-overlapping match of this pattern.
    pub fn split<'r, 't>(&'r self, text: &'t str) -> Split<'r, 't> {
        Split { finder: self.find_iter(text), text, last: 0, done: false }
    }

    pub fn replace<'t>(&self, text: &'t str, template: &str) -> std::borrow::Cow<'t, str> {
        self.replace_impl(text, template, Some(1))
    }

    pub fn replace_all<'t>(&self, text: &'t str, template: &str) -> std::borrow::Cow<'t, str> {
        self.replace_impl(text, template, None)
    }

    fn replace_impl<'t>(&self, text: &'t str, template: &str, limit: Option<usize>) -> std::borrow::Cow<'t, str> {
        let mut it = self.captures_iter(text).peekable();
        if it.peek().is_none() {
            return std::borrow::Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;
        for caps in it {
            if let Some(n) = limit {
                if count >= n {
                    break;
                }
            }
            let m = caps.get(0).expect("group 0 always set on a successful match");
            out.push_str(&text[last..m.start()]);
            out.push_str(&expand_template(template, &caps));
            last = m.end();
            count += 1;
        }
        out.push_str(&text[last..]);
        std::borrow::Cow::Owned(out)
    }
}

/// Iterator over non-overlapping matches, advancing one byte past a
/// zero-width match so it always makes progress (spec.md §5).
pub struct FindMatches<'r, 't> {
    prog: &'r Program,
    text: &'t str,
    last_end: usize,
    done: bool,
}

impl<'r, 't> Iterator for FindMatches<'r, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        if self.done {
            return None;
        }
        let bytes = self.text.as_bytes();
        let slots = exec::find(self.prog, bytes, self.last_end)?;
        let (s, e) = (slots[0].unwrap(), slots[1].unwrap());
        self.last_end = exec::next_search_start(s, e);
        if self.last_end > bytes.len() {
            self.done = true;
        }
        Some(captures::match_from(bytes, s, e))
    }
}

pub struct CaptureMatches<'r, 't> {
    prog: &'r Program,
    text: &'t str,
    last_end: usize,
    done: bool,
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Captures<'t>> {
        if self.done {
            return None;
        }
        let bytes = self.text.as_bytes();
        let slots = exec::find(self.prog, bytes, self.last_end)?;
        let (s, e) = (slots[0].unwrap(), slots[1].unwrap());
        self.last_end = exec::next_search_start(s, e);
        if self.last_end > bytes.len() {
            self.done = true;
        }
        Some(Captures::new(self.prog, bytes, slots))
    }
}

pub struct Split<'r, 't> {
    finder: FindMatches<'r, 't>,
    text: &'t str,
    last: usize,
    done: bool,
}

impl<'r, 't> Iterator for Split<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        if self.done {
            return None;
        }
        match self.finder.next() {
            Some(m) => {
                let piece = &self.text[self.last..m.start()];
                self.last = m.end();
                Some(piece)
            }
            None => {
                self.done = true;
                Some(&self.text[self.last..])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_captures_roundtrip() {
        let re = Regex::new(r"(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})").unwrap();
        let caps = re.captures("born 1997-04-12 today").unwrap();
        assert_eq!(caps.name("year").unwrap().as_bytes(), b"1997");
        assert_eq!(caps.name("month").unwrap().as_bytes(), b"04");
    }

    #[test]
    fn find_iter_yields_all_non_overlapping_matches() {
        let re = Regex::new(r"\d+").unwrap();
        let found: Vec<_> = re.find_iter("a1 b22 c333").map(|m| m.as_bytes().to_vec()).collect();
        assert_eq!(found, vec![b"1".to_vec(), b"22".to_vec(), b"333".to_vec()]);
    }

    #[test]
    fn replace_all_expands_named_and_numbered_groups() {
        let re = Regex::new(r"(\w+)@(\w+)").unwrap();
        let out = re.replace_all("alice@example, bob@example", "$2:$1");
        assert_eq!(out, "example:alice, example:bob");
    }

    #[test]
    fn split_on_whitespace() {
        let re = Regex::new(r"\s+").unwrap();
        let parts: Vec<_> = re.split("one  two\tthree").collect();
        assert_eq!(parts, vec!["one", "two", "three"]);
    }

    #[test]
    fn critical_risk_pattern_is_rejected() {
        assert!(matches!(Regex::new("(a+)+$"), Err(Error::PatternTooComplex(_))));
    }
}
