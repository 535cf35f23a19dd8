//! MIR Value Expressions
//!
//! The right-hand side of an assignment. Every operand and place inside an
//! `RValue` is owned by it; two rvalues never alias.
//!
//! Rvalues have no ordering; passes looking for repeated expressions key on
//! equality and hashing.

use crate::constant::Constant;
use crate::operand::Operand;
use crate::path::{write_comma_list, BorrowKind, GenericPath, TypeRef};
use crate::place::Place;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    // Wrapping arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Overflow-checked arithmetic
    AddOv,
    SubOv,
    MulOv,
    DivOv,
    // Bitwise
    BitOr,
    BitAnd,
    BitXor,
    BitShl,
    BitShr,
    // Comparison
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl BinOp {
    pub const ALL: [BinOp; 20] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Mod,
        BinOp::AddOv,
        BinOp::SubOv,
        BinOp::MulOv,
        BinOp::DivOv,
        BinOp::BitOr,
        BinOp::BitAnd,
        BinOp::BitXor,
        BinOp::BitShl,
        BinOp::BitShr,
        BinOp::Eq,
        BinOp::Ne,
        BinOp::Gt,
        BinOp::Ge,
        BinOp::Lt,
        BinOp::Le,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            BinOp::Mod => "MOD",
            BinOp::AddOv => "ADD_OV",
            BinOp::SubOv => "SUB_OV",
            BinOp::MulOv => "MUL_OV",
            BinOp::DivOv => "DIV_OV",
            BinOp::BitOr => "BIT_OR",
            BinOp::BitAnd => "BIT_AND",
            BinOp::BitXor => "BIT_XOR",
            BinOp::BitShl => "BIT_SHL",
            BinOp::BitShr => "BIT_SHR",
            BinOp::Eq => "EQ",
            BinOp::Ne => "NE",
            BinOp::Gt => "GT",
            BinOp::Ge => "GE",
            BinOp::Lt => "LT",
            BinOp::Le => "LE",
        }
    }

    pub fn from_mnemonic(name: &str) -> Option<BinOp> {
        BinOp::ALL.into_iter().find(|op| op.mnemonic() == name)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Gt | BinOp::Ge | BinOp::Lt | BinOp::Le
        )
    }

    pub fn is_overflow_checked(self) -> bool {
        matches!(self, BinOp::AddOv | BinOp::SubOv | BinOp::MulOv | BinOp::DivOv)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniOp {
    /// Bitwise/logical inversion (`!`)
    Inv,
    /// Arithmetic negation (`-`)
    Neg,
}

impl UniOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            UniOp::Inv => "INV",
            UniOp::Neg => "NEG",
        }
    }

    pub fn from_mnemonic(name: &str) -> Option<UniOp> {
        match name {
            "INV" => Some(UniOp::Inv),
            "NEG" => Some(UniOp::Neg),
            _ => None,
        }
    }
}

impl fmt::Display for UniOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A value-producing expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RValue {
    /// Copy or move an operand unchanged
    Use(Operand),
    /// A literal
    Constant(Constant),
    /// `[value; count]`
    SizedArray { value: Operand, count: u64 },
    /// `&place` within `region`
    Borrow {
        region: u32,
        kind: BorrowKind,
        place: Place,
    },
    /// `value as ty`
    Cast { value: Operand, ty: TypeRef },
    BinOp {
        lhs: Operand,
        op: BinOp,
        rhs: Operand,
    },
    UniOp { value: Operand, op: UniOp },
    /// Metadata word (length or vtable) of a fat pointer
    DstMeta(Operand),
    /// Data word of a fat pointer
    DstPtr(Operand),
    /// Build a fat pointer from a thin pointer and metadata
    MakeDst { ptr: Operand, meta: Operand },
    Tuple(Vec<Operand>),
    Array(Vec<Operand>),
    /// Enum or union variant `index` of `path` holding `value`
    Variant {
        path: GenericPath,
        index: u32,
        value: Operand,
    },
    /// Struct (or struct-like enum variant) built from fields in order
    Struct {
        path: GenericPath,
        variant_index: Option<u32>,
        fields: Vec<Operand>,
    },
}

impl RValue {
    pub fn tag_name(&self) -> &'static str {
        match self {
            RValue::Use(_) => "Use",
            RValue::Constant(_) => "Constant",
            RValue::SizedArray { .. } => "SizedArray",
            RValue::Borrow { .. } => "Borrow",
            RValue::Cast { .. } => "Cast",
            RValue::BinOp { .. } => "BinOp",
            RValue::UniOp { .. } => "UniOp",
            RValue::DstMeta(_) => "DstMeta",
            RValue::DstPtr(_) => "DstPtr",
            RValue::MakeDst { .. } => "MakeDst",
            RValue::Tuple(_) => "Tuple",
            RValue::Array(_) => "Array",
            RValue::Variant { .. } => "Variant",
            RValue::Struct { .. } => "Struct",
        }
    }

    pub fn binary(lhs: impl Into<Operand>, op: BinOp, rhs: impl Into<Operand>) -> Self {
        RValue::BinOp {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    /// Every operand read by this expression, in field order
    pub fn operands(&self) -> Vec<&Operand> {
        match self {
            RValue::Use(value)
            | RValue::SizedArray { value, .. }
            | RValue::Cast { value, .. }
            | RValue::UniOp { value, .. }
            | RValue::DstMeta(value)
            | RValue::DstPtr(value)
            | RValue::Variant { value, .. } => vec![value],
            RValue::BinOp { lhs, rhs, .. } => vec![lhs, rhs],
            RValue::MakeDst { ptr, meta } => vec![ptr, meta],
            RValue::Tuple(vals) | RValue::Array(vals) | RValue::Struct { fields: vals, .. } => {
                vals.iter().collect()
            }
            RValue::Constant(_) | RValue::Borrow { .. } => Vec::new(),
        }
    }

    /// True when evaluating the expression reads no place
    pub fn is_constant(&self) -> bool {
        match self {
            RValue::Constant(_) => true,
            RValue::Borrow { .. } => false,
            _ => self
                .operands()
                .iter()
                .all(|op| matches!(op, Operand::Constant(_))),
        }
    }
}

impl fmt::Display for RValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RValue::Use(value) => write!(f, "Use({})", value),
            RValue::Constant(c) => write!(f, "Constant({})", c),
            RValue::SizedArray { value, count } => write!(f, "SizedArray({}; {})", value, count),
            RValue::Borrow {
                region,
                kind,
                place,
            } => write!(f, "Borrow({}, {}, {})", region, kind, place),
            RValue::Cast { value, ty } => write!(f, "Cast({} as {})", value, ty),
            RValue::BinOp { lhs, op, rhs } => write!(f, "BinOp({} {} {})", lhs, op, rhs),
            RValue::UniOp { value, op } => write!(f, "UniOp({} {})", value, op),
            RValue::DstMeta(value) => write!(f, "DstMeta({})", value),
            RValue::DstPtr(value) => write!(f, "DstPtr({})", value),
            RValue::MakeDst { ptr, meta } => write!(f, "MakeDst({}, {})", ptr, meta),
            RValue::Tuple(vals) => {
                write!(f, "Tuple([")?;
                write_comma_list(f, vals)?;
                write!(f, "])")
            }
            RValue::Array(vals) => {
                write!(f, "Array([")?;
                write_comma_list(f, vals)?;
                write!(f, "])")
            }
            RValue::Variant { path, index, value } => {
                write!(f, "Variant({} #{}, {})", path, index, value)
            }
            RValue::Struct {
                path,
                variant_index,
                fields,
            } => {
                write!(f, "Struct({}", path)?;
                if let Some(idx) = variant_index {
                    write!(f, " #{}", idx)?;
                }
                write!(f, ", {{[")?;
                write_comma_list(f, fields)?;
                write!(f, "]}})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{CoreType, SimplePath};

    fn tmp(idx: u32) -> Operand {
        Place::Temporary(idx).into()
    }

    fn path(name: &str) -> GenericPath {
        SimplePath::new("app", [name]).into()
    }

    #[test]
    fn test_binop_mnemonics() {
        let names: Vec<_> = BinOp::ALL.iter().map(|op| op.mnemonic()).collect();
        assert_eq!(
            names,
            vec![
                "ADD", "SUB", "MUL", "DIV", "MOD", "ADD_OV", "SUB_OV", "MUL_OV", "DIV_OV", "BIT_OR",
                "BIT_AND", "BIT_XOR", "BIT_SHL", "BIT_SHR", "EQ", "NE", "GT", "GE", "LT", "LE",
            ]
        );
        for op in BinOp::ALL {
            assert_eq!(BinOp::from_mnemonic(op.mnemonic()), Some(op));
        }
        assert!(BinOp::Le.is_comparison());
        assert!(!BinOp::BitAnd.is_comparison());
        assert!(BinOp::MulOv.is_overflow_checked());
    }

    #[test]
    fn test_rvalue_display() {
        assert_eq!(format!("{}", RValue::Use(tmp(0))), "Use(Temporary(0))");
        assert_eq!(format!("{}", RValue::Constant(Constant::Bool(true))), "Constant(true)");
        let sized = RValue::SizedArray {
            value: Constant::Uint(0).into(),
            count: 8,
        };
        assert_eq!(format!("{}", sized), "SizedArray(0; 8)");
        let borrow = RValue::Borrow {
            region: 0,
            kind: BorrowKind::Unique,
            place: Place::Variable(1),
        };
        assert_eq!(format!("{}", borrow), "Borrow(0, Unique, Variable(1))");
        let cast = RValue::Cast {
            value: tmp(1),
            ty: CoreType::U8.into(),
        };
        assert_eq!(format!("{}", cast), "Cast(Temporary(1) as u8)");
        assert_eq!(
            format!("{}", RValue::binary(tmp(0), BinOp::AddOv, Constant::Int(1))),
            "BinOp(Temporary(0) ADD_OV +1)"
        );
        let neg = RValue::UniOp {
            value: tmp(2),
            op: UniOp::Neg,
        };
        assert_eq!(format!("{}", neg), "UniOp(Temporary(2) NEG)");
        assert_eq!(format!("{}", RValue::DstMeta(tmp(0))), "DstMeta(Temporary(0))");
        assert_eq!(format!("{}", RValue::DstPtr(tmp(0))), "DstPtr(Temporary(0))");
        let make_dst = RValue::MakeDst {
            ptr: tmp(0),
            meta: Constant::Uint(4).into(),
        };
        assert_eq!(format!("{}", make_dst), "MakeDst(Temporary(0), 4)");
        assert_eq!(
            format!("{}", RValue::Tuple(vec![tmp(0), Constant::Bool(false).into()])),
            "Tuple([Temporary(0), false])"
        );
        assert_eq!(format!("{}", RValue::Array(vec![])), "Array([])");
        let variant = RValue::Variant {
            path: path("Opt"),
            index: 1,
            value: tmp(3),
        };
        assert_eq!(format!("{}", variant), "Variant(::app::Opt #1, Temporary(3))");
        let pair = RValue::Struct {
            path: path("Pair"),
            variant_index: None,
            fields: vec![tmp(0), tmp(1)],
        };
        assert_eq!(
            format!("{}", pair),
            "Struct(::app::Pair, {[Temporary(0), Temporary(1)]})"
        );
        let shape = RValue::Struct {
            path: path("Shape"),
            variant_index: Some(2),
            fields: vec![],
        };
        assert_eq!(format!("{}", shape), "Struct(::app::Shape #2, {[]})");
    }

    #[test]
    fn test_sequence_equality_is_ordered() {
        let ab = RValue::Tuple(vec![tmp(0), tmp(1)]);
        let ba = RValue::Tuple(vec![tmp(1), tmp(0)]);
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
        assert_ne!(RValue::Tuple(vec![tmp(0)]), RValue::Array(vec![tmp(0)]));
        assert_ne!(RValue::Tuple(vec![tmp(0)]), RValue::Tuple(vec![tmp(0), tmp(0)]));
    }

    #[test]
    fn test_struct_equality_checks_variant_index() {
        let a = RValue::Struct {
            path: path("E"),
            variant_index: Some(0),
            fields: vec![tmp(0)],
        };
        let b = RValue::Struct {
            path: path("E"),
            variant_index: Some(1),
            fields: vec![tmp(0)],
        };
        assert_ne!(a, b);
    }

    #[test]
    fn test_clone_mutation_does_not_leak() {
        let original = RValue::Struct {
            path: path("Point"),
            variant_index: None,
            fields: vec![Place::field(Place::Variable(0), 0).into(), tmp(1)],
        };
        let mut copy = original.clone();
        if let RValue::Struct { fields, .. } = &mut copy {
            fields[0] = Constant::Int(0).into();
        }
        assert_ne!(original, copy);
        assert_eq!(
            format!("{}", original),
            "Struct(::app::Point, {[Field(0, Variable(0)), Temporary(1)]})"
        );
    }

    #[test]
    fn test_operands_and_constness() {
        let expr = RValue::binary(tmp(0), BinOp::Mul, Constant::Int(2));
        assert_eq!(expr.operands().len(), 2);
        assert!(!expr.is_constant());
        assert!(RValue::binary(Constant::Int(1), BinOp::Add, Constant::Int(2)).is_constant());
        let borrow = RValue::Borrow {
            region: 0,
            kind: BorrowKind::Shared,
            place: Place::Return,
        };
        assert!(!borrow.is_constant());
        assert_eq!(RValue::Array(vec![]).tag_name(), "Array");
    }
}
