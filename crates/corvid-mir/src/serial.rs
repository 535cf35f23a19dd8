//! MIR serialization
//!
//! Bodies are stored as tagged records. Enums write their variant name as a
//! string tag followed by the variant's fields in declared order; structs
//! write their fields only. Integers are little-endian and fixed width,
//! floats are stored as raw bits, and strings, byte strings and sequences are
//! prefixed with a `u32` length.
//!
//! An encoded body starts with the `CMIR` magic and a `u16` format version.
//!
//! The JSON helpers at the bottom use the serde derives instead and exist for
//! tooling. Float constants are stored there as their `u64` bit pattern.

use crate::block::{BasicBlock, BasicBlockId, Statement};
use crate::body::FunctionBody;
use crate::constant::Constant;
use crate::error::MirResult;
use crate::operand::Operand;
use crate::path::{BorrowKind, CoreType, GenericPath, PathParams, SimplePath, TypeRef};
use crate::place::Place;
use crate::rvalue::{BinOp, RValue, UniOp};
use crate::terminator::{CallTarget, Terminator};
use thiserror::Error;

/// File magic for encoded bodies
pub const MAGIC: [u8; 4] = *b"CMIR";

/// Current encoding version
pub const FORMAT_VERSION: u16 = 1;

/// Deepest nesting of places and types the decoder accepts
pub const MAX_DEPTH: usize = 256;

/// Errors that can occur while decoding MIR
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unexpected end of input at offset {0}")]
    UnexpectedEnd(usize),

    #[error("Invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    #[error("Invalid boolean byte {0} at offset {1}")]
    InvalidBool(u8, usize),

    #[error("Unknown {entity} tag `{tag}`")]
    UnknownTag { entity: &'static str, tag: String },

    #[error("Missing CMIR header")]
    BadMagic,

    #[error("Unsupported format version {0}")]
    UnsupportedVersion(u16),

    #[error("{0} trailing bytes after encoded body")]
    TrailingBytes(usize),

    #[error("Records nested deeper than {max} levels at offset {0}", max = MAX_DEPTH)]
    TooDeep(usize),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Writer for tagged MIR records
#[derive(Debug, Default)]
pub struct MirWriter {
    buffer: Vec<u8>,
}

impl MirWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Get the bytes written so far
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Finish writing and take the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Emit a raw byte
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Emit a little-endian u16
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a little-endian u32
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a little-endian u64
    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit a little-endian i64
    pub fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Emit an f64 as its bit pattern
    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    /// Emit a bool as a single byte
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    /// Emit a length-prefixed byte string
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_len(bytes.len());
        self.buffer.extend_from_slice(bytes);
    }

    /// Emit a length-prefixed UTF-8 string
    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Write a variant tag
    pub fn write_tag(&mut self, tag: &str) {
        self.write_str(tag);
    }

    /// Emit a length-prefixed sequence of records
    pub fn write_seq<T: Serialise>(&mut self, items: &[T]) {
        self.write_len(items.len());
        for item in items {
            item.serialise(self);
        }
    }

    /// Emit a presence flag followed by the record, if any
    pub fn write_option<T: Serialise>(&mut self, value: Option<&T>) {
        match value {
            Some(v) => {
                self.write_bool(true);
                v.serialise(self);
            }
            None => self.write_bool(false),
        }
    }

    fn write_len(&mut self, len: usize) {
        match u32::try_from(len) {
            Ok(len) => self.write_u32(len),
            Err(_) => crate::mir_bug!("sequence of {} elements is too long to encode", len),
        }
    }
}

/// Reader for tagged MIR records
#[derive(Debug)]
pub struct MirReader<'a> {
    data: &'a [u8],
    offset: usize,
    depth: usize,
}

impl<'a> MirReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            depth: 0,
        }
    }

    /// Get the current offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether every byte has been consumed
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    fn take(&mut self, count: usize) -> DecodeResult<&'a [u8]> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::UnexpectedEnd(self.offset))?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a raw byte
    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a little-endian u16
    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u64
    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian i64
    pub fn read_i64(&mut self) -> DecodeResult<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    /// Read an f64 from its bit pattern
    pub fn read_f64(&mut self) -> DecodeResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a bool, rejecting bytes other than 0 and 1
    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other, offset)),
        }
    }

    /// Read a length-prefixed byte string
    pub fn read_bytes(&mut self) -> DecodeResult<Vec<u8>> {
        let len = self.read_u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> DecodeResult<String> {
        let offset = self.offset;
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(offset))
    }

    /// Read a variant tag
    pub fn read_tag(&mut self) -> DecodeResult<String> {
        self.read_string()
    }

    /// Read a length-prefixed sequence of records
    pub fn read_seq<T: Serialise>(&mut self) -> DecodeResult<Vec<T>> {
        let len = self.read_u32()? as usize;
        // Each element takes at least one byte
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::deserialise(self)?);
        }
        Ok(items)
    }

    /// Read a presence flag and, if set, the record
    pub fn read_option<T: Serialise>(&mut self) -> DecodeResult<Option<T>> {
        if self.read_bool()? {
            Ok(Some(T::deserialise(self)?))
        } else {
            Ok(None)
        }
    }

    /// Run `read` one nesting level down, failing past `MAX_DEPTH`
    pub fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(DecodeError::TooDeep(self.offset));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }
}

fn unknown_tag<T>(entity: &'static str, tag: String) -> DecodeResult<T> {
    Err(DecodeError::UnknownTag { entity, tag })
}

/// A MIR entity that can be written as a tagged record and read back
pub trait Serialise: Sized {
    fn serialise(&self, w: &mut MirWriter);
    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self>;
}

impl Serialise for u32 {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_u32(*self);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        r.read_u32()
    }
}

impl Serialise for u64 {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_u64(*self);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        r.read_u64()
    }
}

impl Serialise for String {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_str(self);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        r.read_string()
    }
}

impl<T: Serialise> Serialise for Box<T> {
    fn serialise(&self, w: &mut MirWriter) {
        self.as_ref().serialise(w);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(Box::new(T::deserialise(r)?))
    }
}

// =============================================================================
// Paths and types
// =============================================================================

impl Serialise for SimplePath {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_str(&self.crate_name);
        w.write_seq(&self.components);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(SimplePath {
            crate_name: r.read_string()?,
            components: r.read_seq()?,
        })
    }
}

impl Serialise for PathParams {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_seq(&self.types);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(PathParams { types: r.read_seq()? })
    }
}

impl Serialise for GenericPath {
    fn serialise(&self, w: &mut MirWriter) {
        self.path.serialise(w);
        self.params.serialise(w);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(GenericPath {
            path: SimplePath::deserialise(r)?,
            params: PathParams::deserialise(r)?,
        })
    }
}

impl Serialise for CoreType {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.name());
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        match CoreType::from_name(&tag) {
            Some(ty) => Ok(ty),
            None => unknown_tag("CoreType", tag),
        }
    }
}

impl Serialise for BorrowKind {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.name());
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        match BorrowKind::from_name(&tag) {
            Some(kind) => Ok(kind),
            None => unknown_tag("BorrowKind", tag),
        }
    }
}

impl Serialise for TypeRef {
    fn serialise(&self, w: &mut MirWriter) {
        match self {
            TypeRef::Primitive(ty) => {
                w.write_tag("Primitive");
                ty.serialise(w);
            }
            TypeRef::Tuple(elems) => {
                w.write_tag("Tuple");
                w.write_seq(elems);
            }
            TypeRef::Path(path) => {
                w.write_tag("Path");
                path.serialise(w);
            }
            TypeRef::Borrow { kind, inner } => {
                w.write_tag("Borrow");
                kind.serialise(w);
                inner.serialise(w);
            }
            TypeRef::Pointer { kind, inner } => {
                w.write_tag("Pointer");
                kind.serialise(w);
                inner.serialise(w);
            }
            TypeRef::Array { inner, size } => {
                w.write_tag("Array");
                inner.serialise(w);
                w.write_u64(*size);
            }
            TypeRef::Slice(inner) => {
                w.write_tag("Slice");
                inner.serialise(w);
            }
        }
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        r.nested(Self::deserialise_record)
    }
}

impl TypeRef {
    fn deserialise_record(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        Ok(match tag.as_str() {
            "Primitive" => TypeRef::Primitive(CoreType::deserialise(r)?),
            "Tuple" => TypeRef::Tuple(r.read_seq()?),
            "Path" => TypeRef::Path(GenericPath::deserialise(r)?),
            "Borrow" => TypeRef::Borrow {
                kind: BorrowKind::deserialise(r)?,
                inner: Box::new(Self::deserialise(r)?),
            },
            "Pointer" => TypeRef::Pointer {
                kind: BorrowKind::deserialise(r)?,
                inner: Box::new(Self::deserialise(r)?),
            },
            "Array" => TypeRef::Array {
                inner: Box::new(Self::deserialise(r)?),
                size: r.read_u64()?,
            },
            "Slice" => TypeRef::Slice(Box::new(Self::deserialise(r)?)),
            _ => return unknown_tag("TypeRef", tag),
        })
    }
}

// =============================================================================
// Values
// =============================================================================

impl Serialise for Constant {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.tag_name());
        match self {
            Constant::Int(v) => w.write_i64(*v),
            Constant::Uint(v) => w.write_u64(*v),
            Constant::Float(v) => w.write_f64(*v),
            Constant::Bool(v) => w.write_bool(*v),
            Constant::Bytes(v) => w.write_bytes(v),
            Constant::StaticString(v) => w.write_str(v),
            Constant::Const { path } => path.serialise(w),
            Constant::ItemAddr { path, offset } => {
                path.serialise(w);
                w.write_option(offset.as_ref());
            }
        }
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        Ok(match tag.as_str() {
            "Int" => Constant::Int(r.read_i64()?),
            "Uint" => Constant::Uint(r.read_u64()?),
            "Float" => Constant::Float(r.read_f64()?),
            "Bool" => Constant::Bool(r.read_bool()?),
            "Bytes" => Constant::Bytes(r.read_bytes()?),
            "StaticString" => Constant::StaticString(r.read_string()?),
            "Const" => Constant::Const {
                path: GenericPath::deserialise(r)?,
            },
            "ItemAddr" => Constant::ItemAddr {
                path: GenericPath::deserialise(r)?,
                offset: r.read_option()?,
            },
            _ => return unknown_tag("Constant", tag),
        })
    }
}

impl Serialise for Place {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.tag_name());
        match self {
            Place::Variable(idx) | Place::Temporary(idx) | Place::Argument(idx) => {
                w.write_u32(*idx)
            }
            Place::Static(path) => path.serialise(w),
            Place::Return => {}
            Place::Field { base, field_index } => {
                base.serialise(w);
                w.write_u32(*field_index);
            }
            Place::Deref { base } => base.serialise(w),
            Place::Index { base, index } => {
                base.serialise(w);
                index.serialise(w);
            }
            Place::Downcast {
                base,
                variant_index,
            } => {
                base.serialise(w);
                w.write_u32(*variant_index);
            }
        }
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        r.nested(Self::deserialise_record)
    }
}

impl Place {
    fn deserialise_record(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        Ok(match tag.as_str() {
            "Variable" => Place::Variable(r.read_u32()?),
            "Temporary" => Place::Temporary(r.read_u32()?),
            "Argument" => Place::Argument(r.read_u32()?),
            "Static" => Place::Static(GenericPath::deserialise(r)?),
            "Return" => Place::Return,
            "Field" => Place::Field {
                base: Box::new(Self::deserialise(r)?),
                field_index: r.read_u32()?,
            },
            "Deref" => Place::Deref {
                base: Box::new(Self::deserialise(r)?),
            },
            "Index" => Place::Index {
                base: Box::new(Self::deserialise(r)?),
                index: Box::new(Self::deserialise(r)?),
            },
            "Downcast" => Place::Downcast {
                base: Box::new(Self::deserialise(r)?),
                variant_index: r.read_u32()?,
            },
            _ => return unknown_tag("Place", tag),
        })
    }
}

impl Serialise for Operand {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.tag_name());
        match self {
            Operand::Place(place) => place.serialise(w),
            Operand::Constant(c) => c.serialise(w),
        }
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        match tag.as_str() {
            "Place" => Ok(Operand::Place(Place::deserialise(r)?)),
            "Constant" => Ok(Operand::Constant(Constant::deserialise(r)?)),
            _ => unknown_tag("Operand", tag),
        }
    }
}

impl Serialise for BinOp {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.mnemonic());
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        match BinOp::from_mnemonic(&tag) {
            Some(op) => Ok(op),
            None => unknown_tag("BinOp", tag),
        }
    }
}

impl Serialise for UniOp {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.mnemonic());
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        match UniOp::from_mnemonic(&tag) {
            Some(op) => Ok(op),
            None => unknown_tag("UniOp", tag),
        }
    }
}

impl Serialise for RValue {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.tag_name());
        match self {
            RValue::Use(value) | RValue::DstMeta(value) | RValue::DstPtr(value) => {
                value.serialise(w)
            }
            RValue::Constant(c) => c.serialise(w),
            RValue::SizedArray { value, count } => {
                value.serialise(w);
                w.write_u64(*count);
            }
            RValue::Borrow {
                region,
                kind,
                place,
            } => {
                w.write_u32(*region);
                kind.serialise(w);
                place.serialise(w);
            }
            RValue::Cast { value, ty } => {
                value.serialise(w);
                ty.serialise(w);
            }
            RValue::BinOp { lhs, op, rhs } => {
                lhs.serialise(w);
                op.serialise(w);
                rhs.serialise(w);
            }
            RValue::UniOp { value, op } => {
                value.serialise(w);
                op.serialise(w);
            }
            RValue::MakeDst { ptr, meta } => {
                ptr.serialise(w);
                meta.serialise(w);
            }
            RValue::Tuple(vals) | RValue::Array(vals) => w.write_seq(vals),
            RValue::Variant { path, index, value } => {
                path.serialise(w);
                w.write_u32(*index);
                value.serialise(w);
            }
            RValue::Struct {
                path,
                variant_index,
                fields,
            } => {
                path.serialise(w);
                w.write_option(variant_index.as_ref());
                w.write_seq(fields);
            }
        }
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        Ok(match tag.as_str() {
            "Use" => RValue::Use(Operand::deserialise(r)?),
            "Constant" => RValue::Constant(Constant::deserialise(r)?),
            "SizedArray" => RValue::SizedArray {
                value: Operand::deserialise(r)?,
                count: r.read_u64()?,
            },
            "Borrow" => RValue::Borrow {
                region: r.read_u32()?,
                kind: BorrowKind::deserialise(r)?,
                place: Place::deserialise(r)?,
            },
            "Cast" => RValue::Cast {
                value: Operand::deserialise(r)?,
                ty: TypeRef::deserialise(r)?,
            },
            "BinOp" => RValue::BinOp {
                lhs: Operand::deserialise(r)?,
                op: BinOp::deserialise(r)?,
                rhs: Operand::deserialise(r)?,
            },
            "UniOp" => RValue::UniOp {
                value: Operand::deserialise(r)?,
                op: UniOp::deserialise(r)?,
            },
            "DstMeta" => RValue::DstMeta(Operand::deserialise(r)?),
            "DstPtr" => RValue::DstPtr(Operand::deserialise(r)?),
            "MakeDst" => RValue::MakeDst {
                ptr: Operand::deserialise(r)?,
                meta: Operand::deserialise(r)?,
            },
            "Tuple" => RValue::Tuple(r.read_seq()?),
            "Array" => RValue::Array(r.read_seq()?),
            "Variant" => RValue::Variant {
                path: GenericPath::deserialise(r)?,
                index: r.read_u32()?,
                value: Operand::deserialise(r)?,
            },
            "Struct" => RValue::Struct {
                path: GenericPath::deserialise(r)?,
                variant_index: r.read_option()?,
                fields: r.read_seq()?,
            },
            _ => return unknown_tag("RValue", tag),
        })
    }
}

// =============================================================================
// Control flow
// =============================================================================

impl Serialise for BasicBlockId {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_u32(self.0);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(BasicBlockId(r.read_u32()?))
    }
}

impl Serialise for CallTarget {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.tag_name());
        match self {
            CallTarget::Value(value) => value.serialise(w),
            CallTarget::Path(path) => path.serialise(w),
            CallTarget::Intrinsic { name, params } => {
                w.write_str(name);
                params.serialise(w);
            }
        }
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        Ok(match tag.as_str() {
            "Value" => CallTarget::Value(Operand::deserialise(r)?),
            "Path" => CallTarget::Path(GenericPath::deserialise(r)?),
            "Intrinsic" => CallTarget::Intrinsic {
                name: r.read_string()?,
                params: PathParams::deserialise(r)?,
            },
            _ => return unknown_tag("CallTarget", tag),
        })
    }
}

impl Serialise for Terminator {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_tag(self.tag_name());
        match self {
            Terminator::Incomplete | Terminator::Return | Terminator::Diverge => {}
            Terminator::Goto(target) => target.serialise(w),
            Terminator::Panic { dst } => dst.serialise(w),
            Terminator::If {
                cond,
                then_block,
                else_block,
            } => {
                cond.serialise(w);
                then_block.serialise(w);
                else_block.serialise(w);
            }
            Terminator::Switch { value, targets } => {
                value.serialise(w);
                w.write_seq(targets);
            }
            Terminator::Call {
                target,
                args,
                ret_val,
                ret_block,
                panic_block,
            } => {
                target.serialise(w);
                w.write_seq(args);
                ret_val.serialise(w);
                ret_block.serialise(w);
                panic_block.serialise(w);
            }
        }
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        let tag = r.read_tag()?;
        Ok(match tag.as_str() {
            "Incomplete" => Terminator::Incomplete,
            "Return" => Terminator::Return,
            "Diverge" => Terminator::Diverge,
            "Goto" => Terminator::Goto(BasicBlockId::deserialise(r)?),
            "Panic" => Terminator::Panic {
                dst: BasicBlockId::deserialise(r)?,
            },
            "If" => Terminator::If {
                cond: Operand::deserialise(r)?,
                then_block: BasicBlockId::deserialise(r)?,
                else_block: BasicBlockId::deserialise(r)?,
            },
            "Switch" => Terminator::Switch {
                value: Operand::deserialise(r)?,
                targets: r.read_seq()?,
            },
            "Call" => Terminator::Call {
                target: CallTarget::deserialise(r)?,
                args: r.read_seq()?,
                ret_val: Place::deserialise(r)?,
                ret_block: BasicBlockId::deserialise(r)?,
                panic_block: BasicBlockId::deserialise(r)?,
            },
            _ => return unknown_tag("Terminator", tag),
        })
    }
}

impl Serialise for Statement {
    fn serialise(&self, w: &mut MirWriter) {
        self.dst.serialise(w);
        self.src.serialise(w);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(Statement {
            dst: Place::deserialise(r)?,
            src: RValue::deserialise(r)?,
        })
    }
}

impl Serialise for BasicBlock {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_seq(&self.statements);
        self.terminator.serialise(w);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(BasicBlock {
            statements: r.read_seq()?,
            terminator: Terminator::deserialise(r)?,
        })
    }
}

impl Serialise for FunctionBody {
    fn serialise(&self, w: &mut MirWriter) {
        w.write_seq(&self.arguments);
        self.return_ty.serialise(w);
        w.write_seq(&self.variables);
        w.write_seq(&self.temporaries);
        w.write_seq(&self.blocks);
    }

    fn deserialise(r: &mut MirReader<'_>) -> DecodeResult<Self> {
        Ok(FunctionBody {
            arguments: r.read_seq()?,
            return_ty: TypeRef::deserialise(r)?,
            variables: r.read_seq()?,
            temporaries: r.read_seq()?,
            blocks: r.read_seq()?,
        })
    }
}

// =============================================================================
// Whole-body helpers
// =============================================================================

/// Encode a body with the `CMIR` header
pub fn encode_body(body: &FunctionBody) -> Vec<u8> {
    let mut w = MirWriter::new();
    for b in MAGIC {
        w.write_u8(b);
    }
    w.write_u16(FORMAT_VERSION);
    body.serialise(&mut w);
    w.into_bytes()
}

/// Decode a body produced by `encode_body`
pub fn decode_body(bytes: &[u8]) -> MirResult<FunctionBody> {
    let mut r = MirReader::new(bytes);
    let magic: [u8; 4] = r.take_array().map_err(|_| DecodeError::BadMagic)?;
    if magic != MAGIC {
        return Err(DecodeError::BadMagic.into());
    }
    let version = r.read_u16()?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version).into());
    }
    let body = FunctionBody::deserialise(&mut r)?;
    if !r.is_at_end() {
        return Err(DecodeError::TrailingBytes(r.remaining()).into());
    }
    tracing::debug!(
        bytes = bytes.len(),
        blocks = body.block_count(),
        "decoded function body"
    );
    Ok(body)
}

pub fn to_json(body: &FunctionBody) -> MirResult<String> {
    Ok(serde_json::to_string_pretty(body)?)
}

pub fn from_json(text: &str) -> MirResult<FunctionBody> {
    Ok(serde_json::from_str(text)?)
}
