// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `Program` is a compiled pattern: immutable after construction, and the
//! thing both matching engines execute against (spec.md §3 "Lifecycle").

use std::collections::HashMap;

use crate::analyzer::{self, RiskLevel};
use crate::ast::{anchored_end, anchored_start, Ast};
use crate::compile::Compiler;
use crate::error::{Error, Result};
use crate::flags::{Flags, Limits};
use crate::inst::Inst;
use crate::literals::{self, Prefix};
use crate::parser::Parser;

/// Which matching engine a compiled pattern was bound to. Decided once,
/// at compile time, never re-evaluated per call (spec.md §4.6, §9
/// "Engine selection is static").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    /// The pattern contains no look-around, back-reference or lazy
    /// quantifier: it runs on the linear-time NFA simulation.
    Thompson,
    /// The pattern needs a feature the NFA can't represent: it runs on
    /// the recursive backtracking engine directly over the AST.
    Backtrack,
}

/// A compiled regular expression. Once built, every field here is
/// immutable for the program's lifetime.
#[derive(Clone, Debug)]
pub struct Program {
    pub original: String,
    pub flags: Flags,
    pub limits: Limits,
    pub engine: Engine,
    /// Populated iff `engine == Thompson`.
    pub insts: Vec<Inst>,
    /// Populated iff `engine == Backtrack` (spec.md §3: "AST ... owned by
    /// the pattern object if backtracking is needed, otherwise freed
    /// after NFA build").
    pub ast: Option<Ast>,
    pub capture_count: u32,
    pub cap_names: Vec<Option<String>>,
    pub name_to_index: HashMap<String, u32>,
    pub prefix: Option<Prefix>,
    pub anchored_begin: bool,
    pub anchored_end: bool,
    pub risk: RiskLevel,
}

impl Program {
    pub fn new(pattern: &str, flags: Flags) -> Result<Program> {
        Program::with_limits(pattern, flags, Limits::default())
    }

    pub fn with_limits(pattern: &str, flags: Flags, limits: Limits) -> Result<Program> {
        let parsed = Parser::new(pattern).parse()?;
        let report = analyzer::analyze(&parsed.ast);
        if report.risk >= limits.reject_at {
            log::debug!(
                "rejecting pattern {:?}: risk {:?} (factor {})",
                pattern,
                report.risk,
                report.explosion_factor
            );
            return Err(Error::PatternTooComplex(report.risk));
        }

        let use_backtrack = parsed.ast.requires_backtracking();
        let engine = if use_backtrack { Engine::Backtrack } else { Engine::Thompson };
        log::trace!("pattern {:?} dispatched to {:?}", pattern, engine);

        let anchored_begin = anchored_start(&parsed.ast);
        let anchored_end_flag = anchored_end(&parsed.ast);
        let prefix = if flags.case_insensitive { None } else { literals::extract_prefix(&parsed.ast) };

        let mut cap_names = vec![None; parsed.capture_count as usize + 1];
        let mut name_to_index = HashMap::new();
        for (name, idx) in &parsed.names {
            cap_names[*idx as usize] = Some(name.clone());
            name_to_index.insert(name.clone(), *idx);
        }

        let (insts, ast) = match engine {
            Engine::Thompson => {
                let compiler = Compiler::new(flags.case_insensitive, flags.dot_all, flags.multiline);
                (compiler.compile(&parsed.ast)?, None)
            }
            Engine::Backtrack => (Vec::new(), Some(parsed.ast)),
        };

        Ok(Program {
            original: pattern.to_string(),
            flags,
            limits,
            engine,
            insts,
            ast,
            capture_count: parsed.capture_count,
            cap_names,
            name_to_index,
            prefix,
            anchored_begin,
            anchored_end: anchored_end_flag,
            risk: report.risk,
        })
    }

    pub fn num_captures(&self) -> usize {
        self.capture_count as usize + 1
    }

    pub fn named_capture_index(&self, name: &str) -> Option<u32> {
        self.name_to_index.get(name).copied()
    }
}
