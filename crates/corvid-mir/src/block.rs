//! Basic Blocks
//!
//! A basic block is a straight-line list of assignments followed by one
//! terminator.

use crate::place::Place;
use crate::rvalue::RValue;
use crate::terminator::Terminator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basic block identifier (index into the owning body's block list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BasicBlockId(pub u32);

impl BasicBlockId {
    /// The entry block of every body
    pub const ENTRY: BasicBlockId = BasicBlockId(0);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BasicBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// `dst = src`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub dst: Place,
    pub src: RValue,
}

impl Statement {
    pub fn assign(dst: Place, src: RValue) -> Self {
        Self { dst, src }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {};", self.dst, self.src)
    }
}

/// A sequence of statements with a single exit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub statements: Vec<Statement>,
    /// How this block exits (must be set before the body is validated)
    pub terminator: Terminator,
}

impl BasicBlock {
    /// Create an empty, not yet terminated block
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn assign(&mut self, dst: Place, src: RValue) {
        self.statements.push(Statement::assign(dst, src));
    }

    pub fn set_terminator(&mut self, term: Terminator) {
        self.terminator = term;
    }

    pub fn is_terminated(&self) -> bool {
        !self.terminator.is_incomplete()
    }

    pub fn successors(&self) -> Vec<BasicBlockId> {
        self.terminator.successors()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
