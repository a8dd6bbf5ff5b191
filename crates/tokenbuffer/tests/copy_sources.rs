#![expect(missing_docs)]

use std::borrow::Cow;

use tokenbuffer::{
    BufferError, Embedded, EventSource, NativeId, Number, NumberType, TokenBuffer, TokenKind,
    Value,
};

#[derive(Debug, Clone)]
enum Ev {
    Start(TokenKind),
    End(TokenKind),
    Name(&'static str),
    Str(&'static str),
    Num(Number),
    Tagged(Box<Ev>, NativeId),
}

/// A minimal live-reader stand-in over a fixed list of events.
struct VecSource {
    events: Vec<Ev>,
    at: Option<usize>,
    type_ids: bool,
}

impl VecSource {
    fn new(events: Vec<Ev>) -> Self {
        Self {
            events,
            at: None,
            type_ids: false,
        }
    }

    fn with_type_ids(mut self) -> Self {
        self.type_ids = true;
        self
    }

    fn current(&self) -> Option<&Ev> {
        let ev = self.events.get(self.at?)?;
        Some(match ev {
            Ev::Tagged(inner, _) => &**inner,
            ev => ev,
        })
    }
}

impl EventSource for VecSource {
    fn advance(&mut self) -> Option<TokenKind> {
        let next = self.at.map_or(0, |i| i + 1);
        self.at = Some(next.min(self.events.len()));
        self.current_kind()
    }

    fn current_kind(&self) -> Option<TokenKind> {
        Some(match self.current()? {
            Ev::Start(k) | Ev::End(k) => *k,
            Ev::Name(_) => TokenKind::FieldName,
            Ev::Str(_) => TokenKind::String,
            Ev::Num(n) if n.is_integral() => TokenKind::Int,
            Ev::Num(_) => TokenKind::Float,
            Ev::Tagged(..) => unreachable!(),
        })
    }

    fn current_text(&self) -> Option<Cow<'_, str>> {
        match self.current()? {
            Ev::Name(s) | Ev::Str(s) => Some(Cow::Borrowed(*s)),
            Ev::Num(n) => Some(Cow::Owned(n.to_string())),
            _ => self.current_kind()?.as_literal().map(Cow::Borrowed),
        }
    }

    fn number_value(&self) -> Result<Number, BufferError> {
        let kind = self.current_kind().ok_or(BufferError::EndOfStream)?;
        match self.current() {
            Some(Ev::Num(n)) => Ok(n.clone()),
            _ => Err(BufferError::TypeMismatch {
                expected: "numeric",
                found: kind,
            }),
        }
    }

    fn current_embedded(&self) -> Option<&Embedded> {
        None
    }

    fn current_type_id(&self) -> Option<&NativeId> {
        match self.events.get(self.at?)? {
            Ev::Tagged(_, id) => Some(id),
            _ => None,
        }
    }

    fn supports_type_ids(&self) -> bool {
        self.type_ids
    }
}

#[test]
fn dangling_field_name_is_wrapped_in_an_object() {
    let mut source = VecSource::new(vec![Ev::Name("a"), Ev::Num(Number::Int(1))]);
    source.advance();

    let mut buffer = TokenBuffer::for_source(&source, false);
    buffer.copy_structure(&mut source).unwrap();
    assert_eq!(
        buffer.to_string(),
        "[TokenBuffer: StartObject, FieldName(a), Int, EndObject]"
    );
    let mut reader = buffer.reader();
    reader.advance();
    reader.advance();
    reader.advance();
    assert_eq!(reader.as_i32(), Ok(1));
}

#[test]
fn field_name_alone_is_a_structural_error() {
    let mut source = VecSource::new(vec![Ev::Name("a")]);
    source.advance();
    let mut buffer = TokenBuffer::default();
    assert_eq!(
        buffer.copy_current_structure(&mut source),
        Err(BufferError::Structural("field name without a value"))
    );
}

#[test]
fn source_ids_follow_the_source_capabilities() {
    let events = vec![
        Ev::Tagged(Box::new(Ev::Start(TokenKind::StartArray)), NativeId::from("!!seq")),
        Ev::Str("x"),
        Ev::End(TokenKind::EndArray),
    ];

    let mut tagged = VecSource::new(events.clone()).with_type_ids();
    tagged.advance();
    let captured = TokenBuffer::capture(&mut tagged).unwrap();
    assert!(captured.can_write_type_id());
    assert!(!captured.can_write_object_id());
    let reader = captured.reader_on_first_token();
    assert_eq!(reader.current_type_id(), Some(&NativeId::from("!!seq")));

    let mut untagged = VecSource::new(events);
    untagged.advance();
    let captured = TokenBuffer::capture(&mut untagged).unwrap();
    assert!(!captured.may_have_native_ids());
    assert_eq!(captured.reader_on_first_token().current_type_id(), None);
}

#[test]
fn wide_decimal_capture_from_a_live_source() {
    let mut source = VecSource::new(vec![
        Ev::Start(TokenKind::StartArray),
        Ev::Num(Number::Double(2.5)),
        Ev::Num(Number::Long(9)),
        Ev::End(TokenKind::EndArray),
    ]);
    source.advance();

    let mut buffer = TokenBuffer::for_source(&source, true);
    buffer.copy_structure(&mut source).unwrap();
    let mut reader = buffer.reader();
    reader.advance();
    reader.advance();
    assert_eq!(reader.number_type(), Ok(NumberType::BigDecimal));
    assert_eq!(reader.as_f64(), Ok(2.5));
    reader.advance();
    assert_eq!(reader.number_type(), Ok(NumberType::Long));
}

#[test]
fn read_value_from_a_live_source() {
    let mut source = VecSource::new(vec![
        Ev::Start(TokenKind::StartObject),
        Ev::Name("k"),
        Ev::Str("v"),
        Ev::End(TokenKind::EndObject),
        Ev::Str("next"),
    ]);
    source.advance();
    let value = tokenbuffer::read_value(&mut source).unwrap();
    assert_eq!(value.get("k"), Some(&Value::from("v")));
    assert_eq!(source.advance(), Some(TokenKind::String));
}
