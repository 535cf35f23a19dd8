//! Block Terminators
//!
//! Every basic block ends in exactly one terminator naming its successors. A
//! freshly allocated block starts out `Incomplete`; lowering must replace it
//! before the body is handed to any pass. Passes rewrite a terminator
//! wholesale rather than editing it in place.

use crate::block::BasicBlockId;
use crate::operand::Operand;
use crate::path::{GenericPath, PathParams};
use crate::place::Place;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a `Call` terminator invokes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallTarget {
    /// A callable value (function pointer, closure)
    Value(Operand),
    /// A statically resolved function
    Path(GenericPath),
    /// A compiler intrinsic with explicit type parameters
    Intrinsic { name: String, params: PathParams },
}

impl CallTarget {
    /// Create an intrinsic call target
    pub fn intrinsic(name: impl Into<String>, params: PathParams) -> Self {
        CallTarget::Intrinsic {
            name: name.into(),
            params,
        }
    }

    /// Variant name used as the serialization tag
    pub fn tag_name(&self) -> &'static str {
        match self {
            CallTarget::Value(_) => "Value",
            CallTarget::Path(_) => "Path",
            CallTarget::Intrinsic { .. } => "Intrinsic",
        }
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTarget::Value(value) => write!(f, "({})", value),
            CallTarget::Path(path) => write!(f, "{}", path),
            CallTarget::Intrinsic { name, params } => write!(f, "\"{}\"::{}", name, params),
        }
    }
}

/// How control leaves a basic block
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminator {
    /// Not built yet; never valid after lowering
    #[default]
    Incomplete,
    /// Return through the return slot
    Return,
    /// Control never leaves this point
    Diverge,
    Goto(BasicBlockId),
    /// Unwind into a cleanup block
    Panic { dst: BasicBlockId },
    If {
        cond: Operand,
        then_block: BasicBlockId,
        else_block: BasicBlockId,
    },
    /// Branch to `targets[v]` where `v` is the value of `value`
    Switch {
        value: Operand,
        targets: Vec<BasicBlockId>,
    },
    Call {
        target: CallTarget,
        args: Vec<Operand>,
        ret_val: Place,
        ret_block: BasicBlockId,
        panic_block: BasicBlockId,
    },
}

impl Terminator {
    /// Variant name used as the serialization tag
    pub fn tag_name(&self) -> &'static str {
        match self {
            Terminator::Incomplete => "Incomplete",
            Terminator::Return => "Return",
            Terminator::Diverge => "Diverge",
            Terminator::Goto(_) => "Goto",
            Terminator::Panic { .. } => "Panic",
            Terminator::If { .. } => "If",
            Terminator::Switch { .. } => "Switch",
            Terminator::Call { .. } => "Call",
        }
    }

    /// Whether the block is still waiting for its terminator
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Terminator::Incomplete)
    }

    /// Successor blocks in declaration order (duplicates kept)
    pub fn successors(&self) -> Vec<BasicBlockId> {
        match self {
            Terminator::Incomplete | Terminator::Return | Terminator::Diverge => Vec::new(),
            Terminator::Goto(target) => vec![*target],
            Terminator::Panic { dst } => vec![*dst],
            Terminator::If {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            Terminator::Switch { targets, .. } => targets.clone(),
            Terminator::Call {
                ret_block,
                panic_block,
                ..
            } => vec![*ret_block, *panic_block],
        }
    }

    /// Mutable access to every successor, for block renumbering
    pub fn successors_mut(&mut self) -> Vec<&mut BasicBlockId> {
        match self {
            Terminator::Incomplete | Terminator::Return | Terminator::Diverge => Vec::new(),
            Terminator::Goto(target) => vec![target],
            Terminator::Panic { dst } => vec![dst],
            Terminator::If {
                then_block,
                else_block,
                ..
            } => vec![then_block, else_block],
            Terminator::Switch { targets, .. } => targets.iter_mut().collect(),
            Terminator::Call {
                ret_block,
                panic_block,
                ..
            } => vec![ret_block, panic_block],
        }
    }

    /// Switch target for discriminant `value`
    ///
    /// Panics if `value` is outside the target list; lowering emits one target
    /// per discriminant, so a miss means the switch is malformed.
    pub fn switch_target(&self, value: usize) -> BasicBlockId {
        match self {
            Terminator::Switch { targets, .. } => match targets.get(value) {
                Some(target) => *target,
                None => crate::mir_bug!(
                    "switch discriminant {} out of range ({} targets)",
                    value,
                    targets.len()
                ),
            },
            other => crate::mir_bug!("switch_target on {} terminator", other.tag_name()),
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Incomplete => write!(f, "Invalid"),
            Terminator::Return => write!(f, "Return"),
            Terminator::Diverge => write!(f, "Diverge"),
            Terminator::Goto(target) => write!(f, "Goto({})", target.as_u32()),
            Terminator::Panic { dst } => write!(f, "Panic({};)", dst.as_u32()),
            Terminator::If {
                cond,
                then_block,
                else_block,
            } => write!(
                f,
                "If( {} : {}, {})",
                cond,
                then_block.as_u32(),
                else_block.as_u32()
            ),
            Terminator::Switch { value, targets } => {
                write!(f, "Switch( {} : ", value)?;
                for (i, target) in targets.iter().enumerate() {
                    write!(f, "{} => {}, ", i, target)?;
                }
                write!(f, ")")
            }
            Terminator::Call {
                target,
                args,
                ret_val,
                ret_block,
                panic_block,
            } => {
                write!(f, "Call( {} = {}( ", ret_val, target)?;
                for arg in args {
                    write!(f, "{}, ", arg)?;
                }
                write!(f, "), {}, {})", ret_block, panic_block)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::Constant;
    use crate::path::{CoreType, SimplePath};

    fn bb(id: u32) -> BasicBlockId {
        BasicBlockId::new(id)
    }

    #[test]
    fn test_default_is_incomplete() {
        let term = Terminator::default();
        assert!(term.is_incomplete());
        assert_eq!(format!("{}", term), "Invalid");
    }

    #[test]
    fn test_simple_display() {
        assert_eq!(format!("{}", Terminator::Return), "Return");
        assert_eq!(format!("{}", Terminator::Diverge), "Diverge");
        assert_eq!(format!("{}", Terminator::Goto(bb(3))), "Goto(3)");
        assert_eq!(format!("{}", Terminator::Panic { dst: bb(7) }), "Panic(7;)");
        let branch = Terminator::If {
            cond: Place::Variable(0).into(),
            then_block: bb(1),
            else_block: bb(2),
        };
        assert_eq!(format!("{}", branch), "If( Variable(0) : 1, 2)");
    }

    #[test]
    fn test_switch_display_and_targets() {
        let switch = Terminator::Switch {
            value: Place::Temporary(0).into(),
            targets: vec![bb(1), bb(2), bb(2)],
        };
        assert_eq!(
            format!("{}", switch),
            "Switch( Temporary(0) : 0 => bb1, 1 => bb2, 2 => bb2, )"
        );
        assert_eq!(switch.successors(), vec![bb(1), bb(2), bb(2)]);
        assert_eq!(switch.switch_target(2), bb(2));
        assert_eq!(switch, switch.clone());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_switch_target_out_of_range_panics() {
        let switch = Terminator::Switch {
            value: Place::Temporary(0).into(),
            targets: vec![bb(1)],
        };
        switch.switch_target(1);
    }

    #[test]
    fn test_call_display() {
        let call = Terminator::Call {
            target: CallTarget::intrinsic("size_of", PathParams::new(vec![CoreType::U32.into()])),
            args: vec![],
            ret_val: Place::Temporary(1),
            ret_block: bb(4),
            panic_block: bb(5),
        };
        assert_eq!(
            format!("{}", call),
            "Call( Temporary(1) = \"size_of\"::<u32>( ), bb4, bb5)"
        );

        let by_path = Terminator::Call {
            target: CallTarget::Path(SimplePath::new("app", ["helper"]).into()),
            args: vec![Place::Argument(0).into(), Constant::Int(-1).into()],
            ret_val: Place::Return,
            ret_block: bb(1),
            panic_block: bb(2),
        };
        assert_eq!(
            format!("{}", by_path),
            "Call( Return = ::app::helper( Argument(0), -1, ), bb1, bb2)"
        );

        let by_value = Terminator::Call {
            target: CallTarget::Value(Place::deref(Place::Variable(2)).into()),
            args: vec![],
            ret_val: Place::Temporary(0),
            ret_block: bb(1),
            panic_block: bb(2),
        };
        assert_eq!(
            format!("{}", by_value),
            "Call( Temporary(0) = (Deref(Variable(2)))( ), bb1, bb2)"
        );
        assert_eq!(by_value.successors(), vec![bb(1), bb(2)]);
    }

    #[test]
    fn test_successors_mut_renumbers() {
        let mut branch = Terminator::If {
            cond: Constant::Bool(true).into(),
            then_block: bb(1),
            else_block: bb(2),
        };
        for succ in branch.successors_mut() {
            *succ = BasicBlockId::new(succ.as_u32() + 10);
        }
        assert_eq!(branch.successors(), vec![bb(11), bb(12)]);
        assert!(Terminator::Return.successors().is_empty());
    }
}
