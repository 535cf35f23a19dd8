//! MIR Places
//!
//! A place names a storage location. Leaf places are locals, statics and the
//! return slot; compound places project into a base place they exclusively
//! own, so every place is a tree with no sharing.
//!
//! # Ordering
//!
//! Places are totally ordered. Different variants order by declaration
//! position (`Variable < Temporary < Argument < Static < Return < Field <
//! Deref < Index < Downcast`); within a variant the owned base place is
//! compared first, then the index or discriminant. The order is derived, so
//! `a.cmp(&b) == Ordering::Equal` exactly when `a == b`.

use crate::path::GenericPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An addressable storage location
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Place {
    /// User-declared local variable
    Variable(u32),
    /// Compiler-introduced temporary
    Temporary(u32),
    /// Function argument
    Argument(u32),
    /// Named static item
    Static(GenericPath),
    /// Implicit return slot
    Return,
    /// Field `field_index` of `base`
    Field { base: Box<Place>, field_index: u32 },
    /// `*base`
    Deref { base: Box<Place> },
    /// `base[index]`
    Index { base: Box<Place>, index: Box<Place> },
    /// `base` viewed as enum/union variant `variant_index`
    Downcast { base: Box<Place>, variant_index: u32 },
}

impl Place {
    pub fn field(base: Place, field_index: u32) -> Self {
        Place::Field {
            base: Box::new(base),
            field_index,
        }
    }

    pub fn deref(base: Place) -> Self {
        Place::Deref {
            base: Box::new(base),
        }
    }

    pub fn index(base: Place, index: Place) -> Self {
        Place::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    pub fn downcast(base: Place, variant_index: u32) -> Self {
        Place::Downcast {
            base: Box::new(base),
            variant_index,
        }
    }

    /// Stable tag naming the active variant
    pub fn tag_name(&self) -> &'static str {
        match self {
            Place::Variable(_) => "Variable",
            Place::Temporary(_) => "Temporary",
            Place::Argument(_) => "Argument",
            Place::Static(_) => "Static",
            Place::Return => "Return",
            Place::Field { .. } => "Field",
            Place::Deref { .. } => "Deref",
            Place::Index { .. } => "Index",
            Place::Downcast { .. } => "Downcast",
        }
    }

    /// True for places that own no sub-place
    pub fn is_leaf(&self) -> bool {
        self.base().is_none()
    }

    /// The place this one projects from
    pub fn base(&self) -> Option<&Place> {
        match self {
            Place::Variable(_)
            | Place::Temporary(_)
            | Place::Argument(_)
            | Place::Static(_)
            | Place::Return => None,
            Place::Field { base, .. }
            | Place::Deref { base }
            | Place::Index { base, .. }
            | Place::Downcast { base, .. } => Some(&**base),
        }
    }

    /// The leaf at the bottom of the projection chain
    ///
    /// Index places also own their index place; that is not part of the chain.
    pub fn root(&self) -> &Place {
        let mut place = self;
        while let Some(base) = place.base() {
            place = base;
        }
        place
    }

    /// Number of projections between this place and its root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut place = self;
        while let Some(base) = place.base() {
            depth += 1;
            place = base;
        }
        depth
    }

    /// Whether reaching this place goes through a pointer
    pub fn is_indirect(&self) -> bool {
        let mut place = self;
        loop {
            match place {
                Place::Deref { .. } => return true,
                _ => match place.base() {
                    Some(base) => place = base,
                    None => return false,
                },
            }
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Variable(idx) => write!(f, "Variable({})", idx),
            Place::Temporary(idx) => write!(f, "Temporary({})", idx),
            Place::Argument(idx) => write!(f, "Argument({})", idx),
            Place::Static(path) => write!(f, "Static({})", path),
            Place::Return => write!(f, "Return"),
            Place::Field { base, field_index } => write!(f, "Field({}, {})", field_index, base),
            Place::Deref { base } => write!(f, "Deref({})", base),
            Place::Index { base, index } => write!(f, "Index({}, {})", base, index),
            Place::Downcast {
                base,
                variant_index,
            } => write!(f, "Downcast({}, {})", variant_index, base),
        }
    }
}
