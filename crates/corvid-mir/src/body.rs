//! Function Bodies
//!
//! A function body owns its local declarations and its control-flow graph.
//! Bodies never share MIR nodes with each other, so distinct bodies may be
//! processed on different threads; a single body is owned by one pass at a
//! time.

use crate::block::{BasicBlock, BasicBlockId};
use crate::error::{MirError, MirResult};
use crate::path::TypeRef;
use crate::place::Place;
use crate::visit::{Location, PlaceContext, Visitor};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionBody {
    /// Argument types, indexed by `Place::Argument`
    pub arguments: Vec<TypeRef>,
    /// Type of the return slot
    pub return_ty: TypeRef,
    /// User variable types, indexed by `Place::Variable`
    pub variables: Vec<TypeRef>,
    /// Temporary types, indexed by `Place::Temporary`
    pub temporaries: Vec<TypeRef>,
    /// Blocks, indexed by `BasicBlockId`; block 0 is the entry
    pub blocks: Vec<BasicBlock>,
}

impl FunctionBody {
    pub fn new(arguments: Vec<TypeRef>, return_ty: TypeRef) -> Self {
        Self {
            arguments,
            return_ty,
            variables: Vec::new(),
            temporaries: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Allocate a new block with an `Incomplete` terminator
    pub fn new_block(&mut self) -> BasicBlockId {
        let id = BasicBlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock::new());
        tracing::trace!(block = %id, "allocated block");
        id
    }

    pub fn new_variable(&mut self, ty: TypeRef) -> Place {
        let idx = self.variables.len() as u32;
        tracing::trace!(index = idx, ty = %ty, "declared variable");
        self.variables.push(ty);
        Place::Variable(idx)
    }

    pub fn new_temporary(&mut self, ty: TypeRef) -> Place {
        let idx = self.temporaries.len() as u32;
        tracing::trace!(index = idx, ty = %ty, "declared temporary");
        self.temporaries.push(ty);
        Place::Temporary(idx)
    }

    pub fn block(&self, id: BasicBlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    pub fn block_mut(&mut self, id: BasicBlockId) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(id.index())
    }

    pub fn entry(&self) -> Option<&BasicBlock> {
        self.block(BasicBlockId::ENTRY)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn statement_count(&self) -> usize {
        self.blocks.iter().map(BasicBlock::len).sum()
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BasicBlockId> {
        (0..self.blocks.len() as u32).map(BasicBlockId)
    }

    pub fn iter_blocks(&self) -> impl Iterator<Item = (BasicBlockId, &BasicBlock)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (BasicBlockId(i as u32), block))
    }

    pub fn iter_blocks_mut(&mut self) -> impl Iterator<Item = (BasicBlockId, &mut BasicBlock)> {
        self.blocks
            .iter_mut()
            .enumerate()
            .map(|(i, block)| (BasicBlockId(i as u32), block))
    }

    /// Map from each block to the blocks that branch to it
    ///
    /// A block listed several times as a successor (e.g. by a `Switch`) appears
    /// once per edge.
    pub fn predecessors(&self) -> FxHashMap<BasicBlockId, Vec<BasicBlockId>> {
        let mut preds: FxHashMap<BasicBlockId, Vec<BasicBlockId>> = FxHashMap::default();
        for (id, block) in self.iter_blocks() {
            for succ in block.successors() {
                preds.entry(succ).or_default().push(id);
            }
        }
        preds
    }

    /// Blocks reachable from the entry block
    pub fn reachable_blocks(&self) -> FxHashSet<BasicBlockId> {
        let mut seen = FxHashSet::default();
        if self.blocks.is_empty() {
            return seen;
        }
        let mut stack = vec![BasicBlockId::ENTRY];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(block) = self.block(id) {
                stack.extend(block.successors());
            }
        }
        seen
    }

    /// Check that lowering finished the body
    ///
    /// Every block must have a real terminator, every successor must exist
    /// and every local a place names must be declared.
    pub fn validate(&self) -> MirResult<()> {
        if self.blocks.is_empty() {
            return Err(MirError::EmptyBody);
        }

        for (id, block) in self.iter_blocks() {
            if !block.is_terminated() {
                return Err(MirError::IncompleteTerminator { block: id });
            }
            for succ in block.successors() {
                if self.block(succ).is_none() {
                    return Err(MirError::InvalidSuccessor {
                        block: id,
                        target: succ,
                    });
                }
            }
        }

        let mut locals = LocalCheck {
            body: self,
            error: None,
        };
        locals.visit_body(self);
        if let Some(err) = locals.error {
            return Err(err);
        }

        let reachable = self.reachable_blocks();
        for id in self.block_ids().filter(|id| !reachable.contains(id)) {
            tracing::warn!(block = %id, "block is unreachable from entry");
        }

        tracing::debug!(
            blocks = self.block_count(),
            statements = self.statement_count(),
            "validated function body"
        );
        Ok(())
    }
}

impl Index<BasicBlockId> for FunctionBody {
    type Output = BasicBlock;

    fn index(&self, id: BasicBlockId) -> &BasicBlock {
        match self.blocks.get(id.index()) {
            Some(block) => block,
            None => crate::mir_bug!("{} out of range ({} blocks)", id, self.blocks.len()),
        }
    }
}

impl IndexMut<BasicBlockId> for FunctionBody {
    fn index_mut(&mut self, id: BasicBlockId) -> &mut BasicBlock {
        let count = self.blocks.len();
        match self.blocks.get_mut(id.index()) {
            Some(block) => block,
            None => crate::mir_bug!("{} out of range ({} blocks)", id, count),
        }
    }
}

/// Finds the first place naming a local the body never declared
struct LocalCheck<'a> {
    body: &'a FunctionBody,
    error: Option<MirError>,
}

impl Visitor for LocalCheck<'_> {
    fn visit_place(&mut self, place: &Place, context: PlaceContext, location: Location) {
        if self.error.is_some() {
            return;
        }
        let declared = match place {
            Place::Variable(idx) => (*idx as usize) < self.body.variables.len(),
            Place::Temporary(idx) => (*idx as usize) < self.body.temporaries.len(),
            Place::Argument(idx) => (*idx as usize) < self.body.arguments.len(),
            _ => true,
        };
        if !declared {
            self.error = Some(MirError::UndeclaredLocal {
                block: location.block,
                place: place.to_string(),
            });
            return;
        }
        self.super_place(place, context, location);
    }
}
