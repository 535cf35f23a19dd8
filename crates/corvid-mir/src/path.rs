//! Resolved paths and types
//!
//! Name resolution and type checking happen upstream. By the time a body is
//! lowered to MIR every path is absolute and every type is concrete, so these
//! are plain structural values: compared, hashed and ordered field by field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute, non-generic path to an item (`::core::mem::size_of`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimplePath {
    pub crate_name: String,
    pub components: Vec<String>,
}

impl SimplePath {
    pub fn new<I, S>(crate_name: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            crate_name: crate_name.into(),
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// Last path component, if any
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }
}

impl fmt::Display for SimplePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}", self.crate_name)?;
        for component in &self.components {
            write!(f, "::{}", component)?;
        }
        Ok(())
    }
}

/// Generic arguments attached to a path
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathParams {
    pub types: Vec<TypeRef>,
}

impl PathParams {
    pub fn new(types: Vec<TypeRef>) -> Self {
        Self { types }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Display for PathParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.types.is_empty() {
            return Ok(());
        }
        write!(f, "<")?;
        write_comma_list(f, &self.types)?;
        write!(f, ">")
    }
}

/// A path together with its generic arguments
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenericPath {
    pub path: SimplePath,
    pub params: PathParams,
}

impl GenericPath {
    pub fn new(path: SimplePath, params: PathParams) -> Self {
        Self { path, params }
    }
}

impl From<SimplePath> for GenericPath {
    fn from(path: SimplePath) -> Self {
        Self {
            path,
            params: PathParams::default(),
        }
    }
}

impl fmt::Display for GenericPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.params)
    }
}

/// Primitive scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoreType {
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    F32,
    F64,
    Bool,
    Char,
    Str,
}

impl CoreType {
    pub const ALL: [CoreType; 17] = [
        CoreType::U8,
        CoreType::U16,
        CoreType::U32,
        CoreType::U64,
        CoreType::U128,
        CoreType::Usize,
        CoreType::I8,
        CoreType::I16,
        CoreType::I32,
        CoreType::I64,
        CoreType::I128,
        CoreType::Isize,
        CoreType::F32,
        CoreType::F64,
        CoreType::Bool,
        CoreType::Char,
        CoreType::Str,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoreType::U8 => "u8",
            CoreType::U16 => "u16",
            CoreType::U32 => "u32",
            CoreType::U64 => "u64",
            CoreType::U128 => "u128",
            CoreType::Usize => "usize",
            CoreType::I8 => "i8",
            CoreType::I16 => "i16",
            CoreType::I32 => "i32",
            CoreType::I64 => "i64",
            CoreType::I128 => "i128",
            CoreType::Isize => "isize",
            CoreType::F32 => "f32",
            CoreType::F64 => "f64",
            CoreType::Bool => "bool",
            CoreType::Char => "char",
            CoreType::Str => "str",
        }
    }

    pub fn from_name(name: &str) -> Option<CoreType> {
        CoreType::ALL.into_iter().find(|ty| ty.name() == name)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            CoreType::I8
                | CoreType::I16
                | CoreType::I32
                | CoreType::I64
                | CoreType::I128
                | CoreType::Isize
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, CoreType::F32 | CoreType::F64)
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer-kind qualifier shared by borrows and reference types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BorrowKind {
    /// `&T`
    Shared,
    /// `&mut T`
    Unique,
    /// `&move T`
    Owned,
}

impl BorrowKind {
    pub fn name(self) -> &'static str {
        match self {
            BorrowKind::Shared => "Shared",
            BorrowKind::Unique => "Unique",
            BorrowKind::Owned => "Owned",
        }
    }

    pub fn from_name(name: &str) -> Option<BorrowKind> {
        match name {
            "Shared" => Some(BorrowKind::Shared),
            "Unique" => Some(BorrowKind::Unique),
            "Owned" => Some(BorrowKind::Owned),
            _ => None,
        }
    }

    fn reference_prefix(self) -> &'static str {
        match self {
            BorrowKind::Shared => "&",
            BorrowKind::Unique => "&mut ",
            BorrowKind::Owned => "&move ",
        }
    }

    fn pointer_prefix(self) -> &'static str {
        match self {
            BorrowKind::Shared => "*const ",
            BorrowKind::Unique => "*mut ",
            BorrowKind::Owned => "*move ",
        }
    }
}

impl fmt::Display for BorrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully resolved type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(CoreType),
    Tuple(Vec<TypeRef>),
    Path(GenericPath),
    Borrow { kind: BorrowKind, inner: Box<TypeRef> },
    Pointer { kind: BorrowKind, inner: Box<TypeRef> },
    Array { inner: Box<TypeRef>, size: u64 },
    Slice(Box<TypeRef>),
}

impl TypeRef {
    pub fn unit() -> Self {
        TypeRef::Tuple(Vec::new())
    }

    pub fn borrow(kind: BorrowKind, inner: TypeRef) -> Self {
        TypeRef::Borrow {
            kind,
            inner: Box::new(inner),
        }
    }

    pub fn pointer(kind: BorrowKind, inner: TypeRef) -> Self {
        TypeRef::Pointer {
            kind,
            inner: Box::new(inner),
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, TypeRef::Tuple(elems) if elems.is_empty())
    }
}

impl From<CoreType> for TypeRef {
    fn from(ty: CoreType) -> Self {
        TypeRef::Primitive(ty)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(ty) => write!(f, "{}", ty),
            TypeRef::Tuple(elems) => {
                write!(f, "(")?;
                write_comma_list(f, elems)?;
                if elems.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            TypeRef::Path(path) => write!(f, "{}", path),
            TypeRef::Borrow { kind, inner } => write!(f, "{}{}", kind.reference_prefix(), inner),
            TypeRef::Pointer { kind, inner } => write!(f, "{}{}", kind.pointer_prefix(), inner),
            TypeRef::Array { inner, size } => write!(f, "[{}; {}]", inner, size),
            TypeRef::Slice(inner) => write!(f, "[{}]", inner),
        }
    }
}

pub(crate) fn write_comma_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
