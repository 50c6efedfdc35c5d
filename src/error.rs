// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The error taxonomy for pattern compilation.
//!
//! Every variant here is a *compile-time* failure (spec category 1 in the
//! design notes): the parser, the safety analyzer or the Thompson compiler
//! rejected the pattern outright. Match-time failures (no match, step budget
//! exceeded) are never represented as `Error` — they surface as `None` from
//! `find`, by design (see `backtrack::MAX_STEPS`).

use thiserror::Error;

use crate::analyzer::RiskLevel;

/// A byte offset into the original pattern string.
pub type Offset = usize;

/// Everything that can go wrong compiling a pattern.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The pattern string was empty.
    #[error("empty pattern")]
    EmptyPattern,

    /// The tokenizer ran out of input while a construct was still open
    /// (an unterminated group, character class or escape).
    #[error("unexpected end of pattern at offset {0}")]
    UnexpectedEndOfPattern(Offset),

    /// A character appeared where the grammar did not expect one, e.g. a
    /// dangling `)` or a quantifier with nothing to quantify.
    #[error("unexpected character at offset {0}")]
    UnexpectedCharacter(Offset),

    /// `\x` for some `x` that is not a recognized escape.
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscapeSequence(Offset),

    /// Malformed `[...]`: bad range, bad `[:name:]`, unterminated class.
    #[error("invalid character class at offset {0}")]
    InvalidCharacterClass(Offset),

    /// `{m,n}` with `m > n`, or either bound exceeding
    /// [`crate::parser::MAX_QUANTIFIER_BOUND`].
    #[error("invalid quantifier at offset {0}")]
    InvalidQuantifier(Offset),

    /// Parenthesis nesting exceeded [`crate::parser::MAX_NESTING_DEPTH`].
    #[error("parenthesis nesting too deep at offset {0}")]
    NestingTooDeep(Offset),

    /// The safety analyzer's risk score exceeded the configured threshold.
    #[error("pattern too complex (risk level {0:?})")]
    PatternTooComplex(RiskLevel),

    /// The Thompson compiler was asked to lower a construct it cannot
    /// represent (look-around, back-reference). Dispatch never actually
    /// triggers this: it routes such patterns to the backtracking engine
    /// first. Kept for parity with spec.md's taxonomy and as a defensive
    /// bound on `compile::Compiler`.
    #[error("construct not representable in the Thompson NFA")]
    NotImplemented,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = ::std::result::Result<T, Error>;
