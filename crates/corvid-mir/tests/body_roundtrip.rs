//! Whole-body tests: building, validating, rewriting and storing a body that
//! uses every node kind.

use corvid_mir::serial::{from_json, to_json, MAGIC};
use corvid_mir::{
    decode_body, encode_body, BasicBlockId, BinOp, BorrowKind, CallTarget, Constant, CoreType,
    DecodeError, FunctionBody, GenericPath, Location, MirError, MutVisitor, Operand, PathParams,
    Place, PlaceContext, PrettyPrint, RValue, ReplacePlace, SimplePath, Terminator, TypeRef,
    UniOp, Visitor,
};

fn item(name: &str) -> GenericPath {
    SimplePath::new("demo", [name]).into()
}

/// fn(arg0: &[u8], arg1: u64) -> u64
fn kitchen_sink() -> FunctionBody {
    let slice = TypeRef::borrow(BorrowKind::Shared, TypeRef::Slice(Box::new(CoreType::U8.into())));
    let mut body = FunctionBody::new(vec![slice, CoreType::U64.into()], CoreType::U64.into());

    let len = body.new_variable(CoreType::U64.into());
    let flag = body.new_temporary(CoreType::Bool.into());
    let sel = body.new_temporary(CoreType::U32.into());
    let size = body.new_temporary(CoreType::Usize.into());
    let tup = body.new_temporary(TypeRef::Tuple(vec![CoreType::U64.into(), CoreType::Bool.into()]));

    let entry = body.new_block();
    let check = body.new_block();
    let small = body.new_block();
    let large = body.new_block();
    let call = body.new_block();
    let done = body.new_block();
    let unwind = body.new_block();

    body[entry].assign(len.clone(), RValue::DstMeta(Place::Argument(0).into()));
    body[entry].assign(
        flag.clone(),
        RValue::binary(len.clone(), BinOp::Lt, Place::Argument(1)),
    );
    body[entry].assign(
        Place::field(tup.clone(), 0),
        RValue::Cast {
            value: Constant::Int(-1).into(),
            ty: CoreType::U64.into(),
        },
    );
    body[entry].assign(
        Place::field(tup.clone(), 1),
        RValue::UniOp {
            value: flag.clone().into(),
            op: UniOp::Inv,
        },
    );
    body[entry].set_terminator(Terminator::If {
        cond: flag.clone().into(),
        then_block: check,
        else_block: unwind,
    });

    body[check].assign(
        sel.clone(),
        RValue::Use(Place::index(Place::deref(Place::Argument(0)), Place::Variable(0)).into()),
    );
    body[check].set_terminator(Terminator::Switch {
        value: sel.clone().into(),
        targets: vec![small, large, large],
    });

    body[small].assign(
        Place::Return,
        RValue::Constant(Constant::Const {
            path: item("SMALL"),
        }),
    );
    body[small].set_terminator(Terminator::Goto(done));

    body[large].assign(
        Place::Static(item("LAST")),
        RValue::Struct {
            path: item("Record"),
            variant_index: Some(1),
            fields: vec![
                Constant::StaticString("tab\there".to_string()).into(),
                Constant::Bytes(vec![0, 0x7f, 0xff]).into(),
                Constant::Float(-0.0).into(),
                Constant::ItemAddr {
                    path: item("table"),
                    offset: Some(16),
                }
                .into(),
            ],
        },
    );
    body[large].set_terminator(Terminator::Goto(call));

    body[call].set_terminator(Terminator::Call {
        target: CallTarget::intrinsic("size_of", PathParams::new(vec![CoreType::U64.into()])),
        args: vec![],
        ret_val: size.clone(),
        ret_block: done,
        panic_block: unwind,
    });

    body[done].assign(
        Place::Return,
        RValue::Borrow {
            region: 2,
            kind: BorrowKind::Owned,
            place: Place::downcast(Place::deref(Place::Temporary(3)), 1),
        },
    );
    body[done].set_terminator(Terminator::Return);

    body[unwind].assign(
        tup,
        RValue::MakeDst {
            ptr: Operand::Place(size),
            meta: Constant::Uint(3).into(),
        },
    );
    body[unwind].set_terminator(Terminator::Diverge);

    body
}

#[test]
fn test_kitchen_sink_is_well_formed() {
    let body = kitchen_sink();
    body.validate().expect("body should validate");
    assert_eq!(body.block_count(), 7);
    assert_eq!(body.reachable_blocks().len(), 7);
}

#[test]
fn test_binary_round_trip() {
    let body = kitchen_sink();
    let bytes = encode_body(&body);
    assert_eq!(&bytes[..4], &MAGIC);
    let decoded = decode_body(&bytes).expect("decode");
    assert_eq!(decoded, body);
    assert_eq!(decoded.pretty_print(), body.pretty_print());
}

#[test]
fn test_json_round_trip() {
    let body = kitchen_sink();
    let text = to_json(&body).expect("to json");
    let decoded = from_json(&text).expect("from json");
    assert_eq!(decoded, body);
}

#[test]
fn test_decode_rejects_damaged_input() {
    let bytes = encode_body(&kitchen_sink());

    let mut wrong_magic = bytes.clone();
    wrong_magic[0] = b'X';
    assert!(matches!(
        decode_body(&wrong_magic),
        Err(MirError::Decode(DecodeError::BadMagic))
    ));

    let truncated = &bytes[..bytes.len() - 1];
    assert!(matches!(
        decode_body(truncated),
        Err(MirError::Decode(DecodeError::UnexpectedEnd(_)))
    ));

    let mut padded = bytes;
    padded.push(0);
    let err = decode_body(&padded).unwrap_err();
    assert!(matches!(err, MirError::Decode(DecodeError::TrailingBytes(1))));
    assert!(!err.is_internal());
}

#[test]
fn test_decode_rejects_runaway_nesting() {
    let mut body = FunctionBody::new(vec![], TypeRef::unit());
    let var = body.new_variable(CoreType::U8.into());
    let entry = body.new_block();
    body[entry].assign(var, RValue::Constant(Constant::Uint(1)));
    body[entry].set_terminator(Terminator::Return);
    let bytes = encode_body(&body);

    // Wrap the statement's destination in a long chain of derefs
    let mut variable_tag = 8u32.to_le_bytes().to_vec();
    variable_tag.extend_from_slice(b"Variable");
    let at = bytes
        .windows(variable_tag.len())
        .position(|w| w == variable_tag.as_slice())
        .expect("destination place in encoding");
    let mut deref_tag = 5u32.to_le_bytes().to_vec();
    deref_tag.extend_from_slice(b"Deref");

    let mut crafted = bytes[..at].to_vec();
    for _ in 0..200_000 {
        crafted.extend_from_slice(&deref_tag);
    }
    crafted.extend_from_slice(&bytes[at..]);

    let err = decode_body(&crafted).unwrap_err();
    assert!(matches!(err, MirError::Decode(DecodeError::TooDeep(_))));
    assert!(!err.is_internal());
}

#[test]
fn test_json_keeps_special_floats() {
    let specials = [
        f64::from_bits(0x7ff8_0000_0000_beef),
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        -0.0,
    ];
    let mut body = FunctionBody::new(vec![], CoreType::F64.into());
    let entry = body.new_block();
    for value in specials {
        body[entry].assign(Place::Return, RValue::Constant(Constant::Float(value)));
    }
    body[entry].set_terminator(Terminator::Return);

    let text = to_json(&body).expect("to json");
    assert!(!text.contains("null"));
    let decoded = from_json(&text).expect("from json");
    assert_eq!(decoded, body);

    let bits: Vec<u64> = decoded[BasicBlockId::ENTRY]
        .statements
        .iter()
        .map(|stmt| match &stmt.src {
            RValue::Constant(Constant::Float(v)) => v.to_bits(),
            other => panic!("expected float constant, got {}", other),
        })
        .collect();
    let expected: Vec<u64> = specials.iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits, expected);
}

#[test]
fn test_decode_rejects_future_version() {
    let mut bytes = encode_body(&kitchen_sink());
    bytes[4] = 0xff;
    assert!(matches!(
        decode_body(&bytes),
        Err(MirError::Decode(DecodeError::UnsupportedVersion(_)))
    ));
}

#[test]
fn test_pretty_print_shape() {
    let text = kitchen_sink().pretty_print();
    assert!(text.starts_with("fn(arg0: &[u8], arg1: u64) -> u64 {\n"));
    assert!(text.contains("  let var0: u64;\n"));
    assert!(text.contains("  let tmp3: (u64, bool);\n"));
    assert!(text.contains("    Switch( Temporary(1) : 0 => bb2, 1 => bb3, 2 => bb3, )\n"));
    assert!(text.contains("Borrow(2, Owned, Downcast(1, Deref(Temporary(3))))"));
    assert!(text.ends_with("}\n"));
}

struct StoreCounter {
    stores: Vec<(Location, Place)>,
    borrows: usize,
}

impl Visitor for StoreCounter {
    fn visit_place(&mut self, place: &Place, context: PlaceContext, location: Location) {
        match context {
            PlaceContext::Store => self.stores.push((location, place.clone())),
            PlaceContext::Borrow => self.borrows += 1,
            _ => {}
        }
        self.super_place(place, context, location);
    }
}

#[test]
fn test_visitor_sees_stores_in_order() {
    let body = kitchen_sink();
    let mut counter = StoreCounter {
        stores: Vec::new(),
        borrows: 0,
    };
    counter.visit_body(&body);

    assert_eq!(counter.borrows, 1);
    assert_eq!(counter.stores.len(), 10);
    assert_eq!(
        counter.stores[0],
        (Location::statement(BasicBlockId(0), 0), Place::Variable(0))
    );
    let call_store = counter
        .stores
        .iter()
        .find(|(loc, _)| loc.is_terminator())
        .expect("call return slot");
    assert_eq!(call_store.0.block, BasicBlockId(4));
    assert_eq!(call_store.1, Place::Temporary(2));
}

#[test]
fn test_replace_place_rewrites_clone_only() {
    let original = kitchen_sink();
    let mut rewritten = original.clone();
    let mut replace = ReplacePlace::new(Place::Temporary(3), Place::Variable(0));
    replace.visit_body(&mut rewritten);

    assert_eq!(replace.replaced, 4);
    assert_ne!(rewritten, original);
    assert!(original.pretty_print().contains("Field(0, Temporary(3))"));
    assert!(rewritten.pretty_print().contains("Field(0, Variable(0))"));
    rewritten.validate().expect("rewrite keeps the body valid");
}
