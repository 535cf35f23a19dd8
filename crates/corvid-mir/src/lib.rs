//! Corvid MIR - Middle Intermediate Representation
//!
//! The control-flow-graph form a function body takes after type checking, as
//! consumed by the optimizer and the code generator.
//!
//! # Structure
//!
//! - `FunctionBody` - local declarations plus a list of `BasicBlock`s
//! - `BasicBlock` - `Statement`s (`Place = RValue`) ending in a `Terminator`
//! - `RValue` - value-producing expressions over `Operand`s
//! - `Operand` - a `Place` or a `Constant`
//! - `Place` - an addressable location, possibly projected from another
//!
//! Every node supports rendering (`Display`), structural equality
//! (`PartialEq`/`Eq`), deep copy (`Clone`); places additionally have a total
//! order (`Ord`). Sub-trees are exclusively owned, so a clone never shares
//! anything with its source.

#![warn(rust_2018_idioms)]

pub mod block;
pub mod body;
pub mod constant;
pub mod error;
pub mod operand;
pub mod path;
pub mod place;
pub mod pretty;
pub mod rvalue;
pub mod serial;
pub mod terminator;
pub mod visit;

pub use block::{BasicBlock, BasicBlockId, Statement};
pub use body::FunctionBody;
pub use constant::Constant;
pub use error::{MirError, MirResult};
pub use operand::Operand;
pub use path::{BorrowKind, CoreType, GenericPath, PathParams, SimplePath, TypeRef};
pub use place::Place;
pub use pretty::PrettyPrint;
pub use rvalue::{BinOp, RValue, UniOp};
pub use serial::{decode_body, encode_body, DecodeError, MirReader, MirWriter, Serialise};
pub use terminator::{CallTarget, Terminator};
pub use visit::{Location, MutVisitor, PlaceContext, ReplacePlace, Visitor};
