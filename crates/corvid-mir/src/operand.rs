//! MIR Operands
//!
//! The value source consumed by most expressions: either read a place or use
//! a constant directly.

use crate::constant::Constant;
use crate::place::Place;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value read from a place or given as a constant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Place(Place),
    Constant(Constant),
}

impl Operand {
    /// Variant name used as the serialization tag
    pub fn tag_name(&self) -> &'static str {
        match self {
            Operand::Place(_) => "Place",
            Operand::Constant(_) => "Constant",
        }
    }

    /// The place read, if this is a place operand
    pub fn as_place(&self) -> Option<&Place> {
        match self {
            Operand::Place(place) => Some(place),
            Operand::Constant(_) => None,
        }
    }

    /// The constant, if this is a constant operand
    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Operand::Constant(c) => Some(c),
            Operand::Place(_) => None,
        }
    }
}

impl From<Place> for Operand {
    fn from(place: Place) -> Self {
        Operand::Place(place)
    }
}

impl From<Constant> for Operand {
    fn from(c: Constant) -> Self {
        Operand::Constant(c)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Place(place) => write!(f, "{}", place),
            Operand::Constant(c) => write!(f, "{}", c),
        }
    }
}
