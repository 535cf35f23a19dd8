//! MIR Constants
//!
//! Literal values embedded directly in the IR. Constants are leaves: they are
//! built once during lowering and copied by value afterwards.

use crate::path::GenericPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An immediate value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constant {
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point
    Float(#[serde(with = "float_bits")] f64),
    /// Boolean
    Bool(bool),
    /// Byte string literal
    Bytes(Vec<u8>),
    /// Interned string literal
    StaticString(String),
    /// Value of a named `const` item
    Const { path: GenericPath },
    /// Address of a function or static, optionally offset by a byte count
    ItemAddr {
        path: GenericPath,
        offset: Option<u64>,
    },
}

impl Constant {
    /// Address of an item with no offset
    pub fn item_addr(path: GenericPath) -> Self {
        Constant::ItemAddr { path, offset: None }
    }

    /// Stable tag naming the active variant
    pub fn tag_name(&self) -> &'static str {
        match self {
            Constant::Int(_) => "Int",
            Constant::Uint(_) => "Uint",
            Constant::Float(_) => "Float",
            Constant::Bool(_) => "Bool",
            Constant::Bytes(_) => "Bytes",
            Constant::StaticString(_) => "StaticString",
            Constant::Const { .. } => "Const",
            Constant::ItemAddr { .. } => "ItemAddr",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Constant::Int(_) | Constant::Uint(_) | Constant::Float(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Constant::Uint(v) => Some(*v),
            Constant::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so that every constant equals itself (NaN
// included) and hashing agrees with equality.
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Int(a), Constant::Int(b)) => a == b,
            (Constant::Uint(a), Constant::Uint(b)) => a == b,
            (Constant::Float(a), Constant::Float(b)) => a.to_bits() == b.to_bits(),
            (Constant::Bool(a), Constant::Bool(b)) => a == b,
            (Constant::Bytes(a), Constant::Bytes(b)) => a == b,
            (Constant::StaticString(a), Constant::StaticString(b)) => a == b,
            (Constant::Const { path: a }, Constant::Const { path: b }) => a == b,
            (
                Constant::ItemAddr { path: pa, offset: oa },
                Constant::ItemAddr { path: pb, offset: ob },
            ) => pa == pb && oa == ob,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Constant::Int(v) => v.hash(state),
            Constant::Uint(v) => v.hash(state),
            Constant::Float(v) => v.to_bits().hash(state),
            Constant::Bool(v) => v.hash(state),
            Constant::Bytes(v) => v.hash(state),
            Constant::StaticString(v) => v.hash(state),
            Constant::Const { path } => path.hash(state),
            Constant::ItemAddr { path, offset } => {
                path.hash(state);
                offset.hash(state);
            }
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => {
                let sign = if *v < 0 { '-' } else { '+' };
                write!(f, "{}{}", sign, v.unsigned_abs())
            }
            Constant::Uint(v) => write!(f, "{}", v),
            Constant::Float(v) => write!(f, "{}", v),
            Constant::Bool(v) => write!(f, "{}", v),
            Constant::Bytes(bytes) => {
                write!(f, "[")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:x}", b)?;
                }
                write!(f, "]")
            }
            Constant::StaticString(s) => {
                write!(f, "\"")?;
                write_escaped(f, s.as_bytes())?;
                write!(f, "\"")
            }
            Constant::Const { path } => write!(f, "{}", path),
            Constant::ItemAddr { path, offset: None } => write!(f, "&{}", path),
            Constant::ItemAddr {
                path,
                offset: Some(offset),
            } => write!(f, "&{}+{}", path, offset),
        }
    }
}

/// Escape a byte string for display: quotes, backslashes and newlines get
/// their usual escapes, anything else outside printable ASCII becomes `\u{xx}`.
fn write_escaped(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for &b in bytes {
        match b {
            b'"' => write!(f, "\\\"")?,
            b'\\' => write!(f, "\\\\")?,
            b'\n' => write!(f, "\\n")?,
            b' '..=0x7E => write!(f, "{}", b as char)?,
            _ => write!(f, "\\u{{{:x}}}", b)?,
        }
    }
    Ok(())
}

/// Floats pass through serde as their raw bits, so NaN payloads, infinities
/// and signed zeros survive text formats such as JSON.
mod float_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.to_bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        u64::deserialize(deserializer).map(f64::from_bits)
    }
}

impl From<bool> for Constant {
    fn from(v: bool) -> Self {
        Constant::Bool(v)
    }
}

impl From<i64> for Constant {
    fn from(v: i64) -> Self {
        Constant::Int(v)
    }
}

impl From<u64> for Constant {
    fn from(v: u64) -> Self {
        Constant::Uint(v)
    }
}

impl From<f64> for Constant {
    fn from(v: f64) -> Self {
        Constant::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::SimplePath;

    fn item(name: &str) -> GenericPath {
        SimplePath::new("app", [name]).into()
    }

    #[test]
    fn test_integer_display_has_sign() {
        assert_eq!(format!("{}", Constant::Int(42)), "+42");
        assert_eq!(format!("{}", Constant::Int(0)), "+0");
        assert_eq!(format!("{}", Constant::Int(-7)), "-7");
        assert_eq!(format!("{}", Constant::Int(i64::MIN)), "-9223372036854775808");
        assert_eq!(format!("{}", Constant::Uint(42)), "42");
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(format!("{}", Constant::Float(1.5)), "1.5");
        assert_eq!(format!("{}", Constant::Float(2.0)), "2");
        assert_eq!(format!("{}", Constant::Bool(true)), "true");
        assert_eq!(format!("{}", Constant::Bool(false)), "false");
    }

    #[test]
    fn test_bytes_display_is_hex() {
        assert_eq!(format!("{}", Constant::Bytes(vec![0x01, 0xff, 0x10])), "[1 ff 10]");
        assert_eq!(format!("{}", Constant::Bytes(vec![])), "[]");
    }

    #[test]
    fn test_string_display_escapes() {
        let s = Constant::StaticString("say \"hi\"\n".to_string());
        assert_eq!(format!("{}", s), "\"say \\\"hi\\\"\\n\"");

        let s = Constant::StaticString("tab\there\\".to_string());
        assert_eq!(format!("{}", s), "\"tab\\u{9}here\\\\\"");

        let s = Constant::StaticString("é".to_string());
        assert_eq!(format!("{}", s), "\"\\u{c3}\\u{a9}\"");
    }

    #[test]
    fn test_path_constants_display() {
        assert_eq!(format!("{}", Constant::Const { path: item("LIMIT") }), "::app::LIMIT");
        assert_eq!(format!("{}", Constant::item_addr(item("main"))), "&::app::main");
        let offset = Constant::ItemAddr {
            path: item("TABLE"),
            offset: Some(16),
        };
        assert_eq!(format!("{}", offset), "&::app::TABLE+16");
    }

    #[test]
    fn test_equality_requires_same_variant() {
        assert_ne!(Constant::Int(1), Constant::Uint(1));
        assert_eq!(Constant::Int(1), Constant::Int(1));
        assert_ne!(
            Constant::Const { path: item("A") },
            Constant::item_addr(item("A"))
        );
    }

    #[test]
    fn test_float_equality_is_reflexive() {
        let nan = Constant::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_ne!(Constant::Float(0.0), Constant::Float(-0.0));
    }

    #[test]
    fn test_float_json_keeps_bits() {
        let inf = Constant::Float(f64::INFINITY);
        let text = serde_json::to_string(&inf).unwrap();
        assert_eq!(text, format!("{{\"Float\":{}}}", f64::INFINITY.to_bits()));

        let payload_nan = f64::from_bits(0x7ff8_0000_0000_beef);
        for value in [payload_nan, f64::NEG_INFINITY, -0.0, 1.5] {
            let text = serde_json::to_string(&Constant::Float(value)).unwrap();
            match serde_json::from_str::<Constant>(&text).unwrap() {
                Constant::Float(back) => assert_eq!(back.to_bits(), value.to_bits()),
                other => panic!("expected float, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Constant::Bool(true).as_bool(), Some(true));
        assert_eq!(Constant::Int(3).as_uint(), Some(3));
        assert_eq!(Constant::Int(-3).as_uint(), None);
        assert!(Constant::Float(1.0).is_numeric());
        assert!(!Constant::Bytes(vec![]).is_numeric());
        assert_eq!(Constant::Bytes(vec![]).tag_name(), "Bytes");
    }
}
