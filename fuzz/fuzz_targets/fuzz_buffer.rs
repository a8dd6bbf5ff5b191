#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tokenbuffer::{
    BufferOptions, ContainerKind, Embedded, EventSink, NativeId, Number, Scalar, TokenBuffer,
    recording::Recorder,
};

#[derive(Debug, Arbitrary)]
enum Token {
    StartObject,
    StartArray,
    EndObject,
    EndArray,
    Name(String),
    Str(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Null,
    Binary(Vec<u8>),
}

/// A token plus the native ids staged in front of it.
#[derive(Debug, Arbitrary)]
struct Op {
    type_id: Option<String>,
    object_id: Option<i64>,
    token: Token,
}

fn apply<W: EventSink>(sink: &mut W, op: &Op) {
    if let Some(id) = op.object_id {
        sink.write_object_id(NativeId::Int(id)).unwrap();
    }
    if let Some(id) = &op.type_id {
        sink.write_type_id(NativeId::from(id.as_str())).unwrap();
    }
    let result = match &op.token {
        Token::StartObject => sink.start_container(ContainerKind::Object),
        Token::StartArray => sink.start_container(ContainerKind::Array),
        Token::EndObject => sink.end_container(ContainerKind::Object),
        Token::EndArray => sink.end_container(ContainerKind::Array),
        Token::Name(name) => sink.field_name(name.as_str().into()),
        Token::Str(s) => sink.scalar(Scalar::String(s.as_str().into())),
        Token::Int(i) => sink.scalar(Scalar::Number(Number::from(*i))),
        // NaN never compares equal to itself
        Token::Double(d) if d.is_nan() => sink.scalar(Scalar::Null),
        Token::Double(d) => sink.scalar(Scalar::Number(Number::Double(*d))),
        Token::Bool(b) => sink.scalar(Scalar::Bool(*b)),
        Token::Null => sink.scalar(Scalar::Null),
        Token::Binary(bytes) => sink.embedded(Embedded::Binary(bytes.clone().into())),
    };
    result.unwrap();
}

fn replay(buffer: &TokenBuffer) -> Recorder {
    let mut out = Recorder::new();
    buffer.serialize(&mut out).unwrap();
    out
}

fuzz_target!(|ops: Vec<Op>| {
    let options = BufferOptions {
        has_native_ids: true,
        ..Default::default()
    };
    let mut buffer = TokenBuffer::new(options);
    let mut direct = Recorder::new();
    for op in &ops {
        apply(&mut buffer, op);
        apply(&mut direct, op);
    }
    assert_eq!(buffer.len(), ops.len());
    assert_eq!(replay(&buffer), direct);

    let mut appended = TokenBuffer::default();
    if appended.append(&buffer).is_ok() {
        assert_eq!(replay(&appended), direct);
    }

    let _ = buffer.to_string();
    let _ = buffer.to_values();
});
