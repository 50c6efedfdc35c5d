// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compile-time configuration (spec.md §6). There is no file, env, or CLI
//! surface for this library — the only "config" is what gets passed
//! directly to `compile`/`compile_with_limits`.

use crate::analyzer::RiskLevel;

/// The boolean compile flags spec.md §6 names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// ASCII case folding at match time.
    pub case_insensitive: bool,
    /// `^`/`$` match at line boundaries rather than only text boundaries.
    pub multiline: bool,
    /// `.` matches `\n` too.
    pub dot_all: bool,
    /// Reserved; parsed but has no effect in the core engine.
    pub extended: bool,
    /// Reserved; the core engine is ASCII-only regardless of this flag.
    pub unicode: bool,
}

impl Flags {
    pub fn new() -> Flags {
        Flags::default()
    }

    pub fn case_insensitive(mut self, yes: bool) -> Flags {
        self.case_insensitive = yes;
        self
    }

    pub fn multiline(mut self, yes: bool) -> Flags {
        self.multiline = yes;
        self
    }

    pub fn dot_all(mut self, yes: bool) -> Flags {
        self.dot_all = yes;
        self
    }
}

/// Tunable safety thresholds (spec.md §4.2, §4.5: "default: reject
/// `critical` only", "default 10 000 000" steps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Compilation fails with `PatternTooComplex` at or above this risk
    /// level.
    pub reject_at: RiskLevel,
    /// The backtracking engine's per-call step budget.
    pub max_steps: u64,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits { reject_at: RiskLevel::Critical, max_steps: 10_000_000 }
    }
}
