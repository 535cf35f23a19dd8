//! MIR Visitors
//!
//! `Visitor` walks a body read-only (analyses); `MutVisitor` walks it with
//! mutable access (rewrites such as substituting one local for another).
//!
//! Each `visit_*` hook defaults to the matching `super_*` walker. Override the
//! hook for the nodes you care about and call `super_*` to keep descending.
//!
//! ```ignore
//! struct CountTemps(usize);
//!
//! impl Visitor for CountTemps {
//!     fn visit_place(&mut self, place: &Place, ctx: PlaceContext, loc: Location) {
//!         if matches!(place, Place::Temporary(_)) {
//!             self.0 += 1;
//!         }
//!         self.super_place(place, ctx, loc);
//!     }
//! }
//! ```

use crate::block::{BasicBlock, BasicBlockId, Statement};
use crate::body::FunctionBody;
use crate::constant::Constant;
use crate::operand::Operand;
use crate::place::Place;
use crate::rvalue::RValue;
use crate::terminator::{CallTarget, Terminator};

/// A statement or terminator position within a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub block: BasicBlockId,
    /// Statement index, or `TERMINATOR` for the block's terminator
    pub statement_index: usize,
}

impl Location {
    pub const TERMINATOR: usize = usize::MAX;

    pub fn statement(block: BasicBlockId, index: usize) -> Self {
        Self {
            block,
            statement_index: index,
        }
    }

    pub fn terminator(block: BasicBlockId) -> Self {
        Self {
            block,
            statement_index: Self::TERMINATOR,
        }
    }

    pub fn is_terminator(&self) -> bool {
        self.statement_index == Self::TERMINATOR
    }
}

/// How a place is used at the point it is visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceContext {
    /// Written: assignment destination or call return slot
    Store,
    /// Read through an operand or as an index
    Read,
    /// Borrowed by `RValue::Borrow`
    Borrow,
    /// Base of a projection (field, deref, index, downcast)
    Projection,
}

pub trait Visitor {
    fn visit_body(&mut self, body: &FunctionBody) {
        self.super_body(body);
    }

    fn visit_block(&mut self, id: BasicBlockId, block: &BasicBlock) {
        self.super_block(id, block);
    }

    fn visit_statement(&mut self, statement: &Statement, location: Location) {
        self.super_statement(statement, location);
    }

    fn visit_terminator(&mut self, terminator: &Terminator, location: Location) {
        self.super_terminator(terminator, location);
    }

    fn visit_rvalue(&mut self, rvalue: &RValue, location: Location) {
        self.super_rvalue(rvalue, location);
    }

    fn visit_operand(&mut self, operand: &Operand, location: Location) {
        self.super_operand(operand, location);
    }

    fn visit_place(&mut self, place: &Place, context: PlaceContext, location: Location) {
        self.super_place(place, context, location);
    }

    fn visit_constant(&mut self, _constant: &Constant, _location: Location) {}

    fn super_body(&mut self, body: &FunctionBody) {
        for (id, block) in body.iter_blocks() {
            self.visit_block(id, block);
        }
    }

    fn super_block(&mut self, id: BasicBlockId, block: &BasicBlock) {
        for (i, statement) in block.statements.iter().enumerate() {
            self.visit_statement(statement, Location::statement(id, i));
        }
        self.visit_terminator(&block.terminator, Location::terminator(id));
    }

    fn super_statement(&mut self, statement: &Statement, location: Location) {
        self.visit_place(&statement.dst, PlaceContext::Store, location);
        self.visit_rvalue(&statement.src, location);
    }

    fn super_terminator(&mut self, terminator: &Terminator, location: Location) {
        match terminator {
            Terminator::Incomplete
            | Terminator::Return
            | Terminator::Diverge
            | Terminator::Goto(_)
            | Terminator::Panic { .. } => {}
            Terminator::If { cond, .. } => self.visit_operand(cond, location),
            Terminator::Switch { value, .. } => self.visit_operand(value, location),
            Terminator::Call {
                target,
                args,
                ret_val,
                ..
            } => {
                if let CallTarget::Value(callee) = target {
                    self.visit_operand(callee, location);
                }
                for arg in args {
                    self.visit_operand(arg, location);
                }
                self.visit_place(ret_val, PlaceContext::Store, location);
            }
        }
    }

    fn super_rvalue(&mut self, rvalue: &RValue, location: Location) {
        match rvalue {
            RValue::Constant(c) => self.visit_constant(c, location),
            RValue::Borrow { place, .. } => self.visit_place(place, PlaceContext::Borrow, location),
            _ => {
                for operand in rvalue.operands() {
                    self.visit_operand(operand, location);
                }
            }
        }
    }

    fn super_operand(&mut self, operand: &Operand, location: Location) {
        match operand {
            Operand::Place(place) => self.visit_place(place, PlaceContext::Read, location),
            Operand::Constant(c) => self.visit_constant(c, location),
        }
    }

    fn super_place(&mut self, place: &Place, _context: PlaceContext, location: Location) {
        match place {
            Place::Variable(_)
            | Place::Temporary(_)
            | Place::Argument(_)
            | Place::Static(_)
            | Place::Return => {}
            Place::Field { base, .. } | Place::Deref { base } | Place::Downcast { base, .. } => {
                self.visit_place(base, PlaceContext::Projection, location);
            }
            Place::Index { base, index } => {
                self.visit_place(base, PlaceContext::Projection, location);
                self.visit_place(index, PlaceContext::Read, location);
            }
        }
    }
}

pub trait MutVisitor {
    fn visit_body(&mut self, body: &mut FunctionBody) {
        self.super_body(body);
    }

    fn visit_block(&mut self, id: BasicBlockId, block: &mut BasicBlock) {
        self.super_block(id, block);
    }

    fn visit_statement(&mut self, statement: &mut Statement, location: Location) {
        self.super_statement(statement, location);
    }

    fn visit_terminator(&mut self, terminator: &mut Terminator, location: Location) {
        self.super_terminator(terminator, location);
    }

    fn visit_rvalue(&mut self, rvalue: &mut RValue, location: Location) {
        self.super_rvalue(rvalue, location);
    }

    fn visit_operand(&mut self, operand: &mut Operand, location: Location) {
        self.super_operand(operand, location);
    }

    fn visit_place(&mut self, place: &mut Place, context: PlaceContext, location: Location) {
        self.super_place(place, context, location);
    }

    fn visit_constant(&mut self, _constant: &mut Constant, _location: Location) {}

    fn super_body(&mut self, body: &mut FunctionBody) {
        for (id, block) in body.iter_blocks_mut() {
            self.visit_block(id, block);
        }
    }

    fn super_block(&mut self, id: BasicBlockId, block: &mut BasicBlock) {
        for (i, statement) in block.statements.iter_mut().enumerate() {
            self.visit_statement(statement, Location::statement(id, i));
        }
        self.visit_terminator(&mut block.terminator, Location::terminator(id));
    }

    fn super_statement(&mut self, statement: &mut Statement, location: Location) {
        self.visit_place(&mut statement.dst, PlaceContext::Store, location);
        self.visit_rvalue(&mut statement.src, location);
    }

    fn super_terminator(&mut self, terminator: &mut Terminator, location: Location) {
        match terminator {
            Terminator::Incomplete
            | Terminator::Return
            | Terminator::Diverge
            | Terminator::Goto(_)
            | Terminator::Panic { .. } => {}
            Terminator::If { cond, .. } => self.visit_operand(cond, location),
            Terminator::Switch { value, .. } => self.visit_operand(value, location),
            Terminator::Call {
                target,
                args,
                ret_val,
                ..
            } => {
                if let CallTarget::Value(callee) = target {
                    self.visit_operand(callee, location);
                }
                for arg in args {
                    self.visit_operand(arg, location);
                }
                self.visit_place(ret_val, PlaceContext::Store, location);
            }
        }
    }

    fn super_rvalue(&mut self, rvalue: &mut RValue, location: Location) {
        match rvalue {
            RValue::Constant(c) => self.visit_constant(c, location),
            RValue::Borrow { place, .. } => self.visit_place(place, PlaceContext::Borrow, location),
            RValue::Use(value)
            | RValue::SizedArray { value, .. }
            | RValue::Cast { value, .. }
            | RValue::UniOp { value, .. }
            | RValue::DstMeta(value)
            | RValue::DstPtr(value)
            | RValue::Variant { value, .. } => self.visit_operand(value, location),
            RValue::BinOp { lhs, rhs, .. } => {
                self.visit_operand(lhs, location);
                self.visit_operand(rhs, location);
            }
            RValue::MakeDst { ptr, meta } => {
                self.visit_operand(ptr, location);
                self.visit_operand(meta, location);
            }
            RValue::Tuple(vals) | RValue::Array(vals) | RValue::Struct { fields: vals, .. } => {
                for value in vals {
                    self.visit_operand(value, location);
                }
            }
        }
    }

    fn super_operand(&mut self, operand: &mut Operand, location: Location) {
        match operand {
            Operand::Place(place) => self.visit_place(place, PlaceContext::Read, location),
            Operand::Constant(c) => self.visit_constant(c, location),
        }
    }

    fn super_place(&mut self, place: &mut Place, _context: PlaceContext, location: Location) {
        match place {
            Place::Variable(_)
            | Place::Temporary(_)
            | Place::Argument(_)
            | Place::Static(_)
            | Place::Return => {}
            Place::Field { base, .. } | Place::Deref { base } | Place::Downcast { base, .. } => {
                self.visit_place(base, PlaceContext::Projection, location);
            }
            Place::Index { base, index } => {
                self.visit_place(base, PlaceContext::Projection, location);
                self.visit_place(index, PlaceContext::Read, location);
            }
        }
    }
}

/// Replaces every occurrence of one place with another, including inside
/// projections.
pub struct ReplacePlace {
    pub from: Place,
    pub to: Place,
    /// Number of replacements made
    pub replaced: usize,
}

impl ReplacePlace {
    pub fn new(from: Place, to: Place) -> Self {
        Self {
            from,
            to,
            replaced: 0,
        }
    }
}

impl MutVisitor for ReplacePlace {
    fn visit_place(&mut self, place: &mut Place, context: PlaceContext, location: Location) {
        if *place == self.from {
            *place = self.to.clone();
            self.replaced += 1;
            return;
        }
        self.super_place(place, context, location);
    }
}
