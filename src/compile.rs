// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! McNaughton-Yamada-Thompson construction: `Ast` -> `Vec<Inst>`.
//!
//! Each node compiles to a fragment with an implicit entry at the first
//! instruction it pushes and an implicit exit that falls through to
//! whatever the caller emits next; `Split`/jump targets are back-patched
//! once both sides of a branch are known, the same two-pass trick the
//! teacher's compiler uses for `Alternate`/`Repeat`.

use crate::ast::{AnchorKind, Ast};
use crate::error::{Error, Result};
use crate::inst::{Inst, InstAny, InstByte, InstEmptyLook, InstRanges, InstSave, InstSplit};

/// A `{m,n}` repeat is compiled by literal unrolling (`m` forced copies
/// plus `n - m` optional copies). Bounding the *expanded* instruction
/// count, not just the parsed `n`, catches `{0,100000}` applied to a
/// multi-instruction body blowing the program up even though the parser's
/// 100 000 check on the bound itself already passed (spec.md §4.3).
const MAX_REPEAT_EXPANSION: u32 = 10_000;

pub struct Compiler {
    insts: Vec<Inst>,
    case_insensitive: bool,
    dot_all: bool,
    multiline: bool,
}

impl Compiler {
    pub fn new(case_insensitive: bool, dot_all: bool, multiline: bool) -> Compiler {
        Compiler { insts: Vec::new(), case_insensitive, dot_all, multiline }
    }

    /// Compile `ast` into a complete program: `Save(0)`, the body, `Save(1)`,
    /// `Match`. The outer `Save` slots bracket the whole match (group 0) so
    /// `Program::anchored_begin`/`anchored_end` can inspect fixed offsets
    /// from either end, as the teacher's `Program::new` does.
    pub fn compile(mut self, ast: &Ast) -> Result<Vec<Inst>> {
        self.push(Inst::Save(InstSave { goto: 0, slot: 0 }));
        self.fix_goto(0);
        self.compile_node(ast)?;
        let save_end = self.push(Inst::Save(InstSave { goto: 0, slot: 1 }));
        self.fix_goto(save_end);
        self.push(Inst::Match);
        Ok(self.insts)
    }

    fn push(&mut self, inst: Inst) -> usize {
        self.insts.push(inst);
        self.insts.len() - 1
    }

    /// Point instruction `at`'s `goto` at "the next instruction to be
    /// pushed" (i.e. here-and-now). Used immediately before emitting the
    /// fragment that instruction should fall through into.
    fn fix_goto(&mut self, at: usize) {
        let here = self.insts.len();
        self.set_goto(at, here);
    }

    fn set_goto(&mut self, at: usize, target: usize) {
        match self.insts[at] {
            Inst::Save(ref mut i) => i.goto = target,
            Inst::EmptyLook(ref mut i) => i.goto = target,
            Inst::Byte(ref mut i) => i.goto = target,
            Inst::Ranges(ref mut i) => i.goto = target,
            Inst::Any(ref mut i) => i.goto = target,
            Inst::Split(_) | Inst::Match => unreachable!("set_goto on non-goto inst"),
        }
    }

    fn set_split(&mut self, at: usize, goto1: usize, goto2: usize) {
        match self.insts[at] {
            Inst::Split(ref mut s) => {
                s.goto1 = goto1;
                s.goto2 = goto2;
            }
            _ => unreachable!("set_split on non-split inst"),
        }
    }

    fn check_size(&self) -> Result<()> {
        if self.insts.len() > 1_000_000 {
            return Err(Error::PatternTooComplex(crate::analyzer::RiskLevel::Critical));
        }
        Ok(())
    }

    fn compile_node(&mut self, ast: &Ast) -> Result<()> {
        match *ast {
            Ast::Empty { .. } => {}
            Ast::Literal { c, .. } => {
                self.push(Inst::Byte(InstByte { goto: 0, byte: c, case_insensitive: self.case_insensitive }));
                self.fix_goto(self.insts.len() - 1);
            }
            Ast::Any { .. } => {
                self.push(Inst::Any(InstAny { goto: 0, exclude_newline: !self.dot_all }));
                self.fix_goto(self.insts.len() - 1);
            }
            Ast::Anchor { kind, .. } => {
                self.push(Inst::EmptyLook(InstEmptyLook { goto: 0, look: kind, multiline: self.multiline }));
                self.fix_goto(self.insts.len() - 1);
            }
            Ast::CharClass { ref class, .. } => {
                self.push(Inst::Ranges(InstRanges {
                    goto: 0,
                    class: class.clone(),
                    case_insensitive: self.case_insensitive,
                }));
                self.fix_goto(self.insts.len() - 1);
            }
            Ast::Concat { ref left, ref right, .. } => {
                self.compile_node(left)?;
                self.compile_node(right)?;
            }
            Ast::Alternation { ref left, ref right, .. } => {
                let split = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }));
                let j1 = self.insts.len();
                self.compile_node(left)?;
                // Jump from the end of the left branch past the right
                // branch: modeled as a Split whose two targets coincide.
                let jmp = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }));
                let j2 = self.insts.len();
                self.compile_node(right)?;
                let j3 = self.insts.len();
                self.set_split(split, j1, j2);
                self.set_split(jmp, j3, j3);
            }
            Ast::Star { ref child, greedy, .. } => self.compile_star(child, greedy)?,
            Ast::Plus { ref child, greedy, .. } => self.compile_plus(child, greedy)?,
            Ast::Optional { ref child, greedy, .. } => self.compile_optional(child, greedy)?,
            Ast::Repeat { ref child, min, max, greedy, .. } => {
                self.compile_repeat(child, min, max, greedy)?
            }
            Ast::Group { ref child, capture, .. } => {
                if let Some(idx) = capture {
                    let s = self.push(Inst::Save(InstSave { goto: 0, slot: 2 * idx as usize }));
                    self.fix_goto(s);
                    self.compile_node(child)?;
                    let e = self.push(Inst::Save(InstSave { goto: 0, slot: 2 * idx as usize + 1 }));
                    self.fix_goto(e);
                } else {
                    self.compile_node(child)?;
                }
            }
            Ast::Lookahead { .. } | Ast::Lookbehind { .. } | Ast::Backref { .. } => {
                return Err(Error::NotImplemented);
            }
        }
        self.check_size()
    }

    /// Greedy: `Split(body, exit)`, body loops back to the split. Lazy:
    /// `Split(exit, body)` — transitions appended in reversed preference
    /// order, per spec.md §4.3's note that topology is identical and only
    /// transition order encodes greedy-vs-lazy. (Dispatch never actually
    /// routes a lazy quantifier here; kept symmetric with Plus/Optional so
    /// the compiler is total over the AST shapes it accepts.)
    fn compile_star(&mut self, child: &Ast, greedy: bool) -> Result<()> {
        let split = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }));
        let body_start = self.insts.len();
        self.compile_node(child)?;
        // Unconditional jump back to the split, modeled as a Split whose
        // two branches coincide.
        self.push(Inst::Split(InstSplit { goto1: split, goto2: split }));
        let exit = self.insts.len();
        if greedy {
            self.set_split(split, body_start, exit);
        } else {
            self.set_split(split, exit, body_start);
        }
        Ok(())
    }

    fn compile_plus(&mut self, child: &Ast, greedy: bool) -> Result<()> {
        let body_start = self.insts.len();
        self.compile_node(child)?;
        let split = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }));
        let exit = self.insts.len();
        if greedy {
            self.set_split(split, body_start, exit);
        } else {
            self.set_split(split, exit, body_start);
        }
        Ok(())
    }

    fn compile_optional(&mut self, child: &Ast, greedy: bool) -> Result<()> {
        let split = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }));
        let body_start = self.insts.len();
        self.compile_node(child)?;
        let exit = self.insts.len();
        if greedy {
            self.set_split(split, body_start, exit);
        } else {
            self.set_split(split, exit, body_start);
        }
        Ok(())
    }

    fn compile_repeat(
        &mut self,
        child: &Ast,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    ) -> Result<()> {
        let expansion = max.unwrap_or(min.max(1)).max(min);
        if expansion > MAX_REPEAT_EXPANSION {
            return Err(Error::PatternTooComplex(crate::analyzer::RiskLevel::Critical));
        }
        for _ in 0..min {
            self.compile_node(child)?;
        }
        match max {
            None => self.compile_star(child, greedy)?,
            Some(max) => {
                for _ in min..max {
                    self.compile_optional(child, greedy)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn compile_str(pat: &str) -> Vec<Inst> {
        let parsed = Parser::new(pat).parse().unwrap();
        Compiler::new(false, false, false).compile(&parsed.ast).unwrap()
    }

    #[test]
    fn literal_compiles_to_byte_plus_bracket() {
        let insts = compile_str("a");
        assert!(matches!(insts[0], Inst::Save(_)));
        assert!(matches!(insts[1], Inst::Byte(_)));
        assert!(matches!(insts.last().unwrap(), Inst::Match));
    }

    #[test]
    fn lookaround_is_not_representable() {
        let parsed = Parser::new("(?=a)b").parse().unwrap();
        assert!(matches!(
            Compiler::new(false, false, false).compile(&parsed.ast),
            Err(Error::NotImplemented)
        ));
    }

    #[test]
    fn huge_repeat_expansion_is_rejected() {
        let parsed = Parser::new("a{100000}").parse().unwrap();
        assert!(matches!(
            Compiler::new(false, false, false).compile(&parsed.ast),
            Err(Error::PatternTooComplex(_))
        ));
    }
}
