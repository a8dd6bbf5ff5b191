#![expect(missing_docs)]

use rstest::rstest;
use tokenbuffer::{EventSink, EventSource, TokenBuffer, TokenKind};

fn ints(values: &[i64]) -> TokenBuffer {
    let mut buffer = TokenBuffer::default();
    for &v in values {
        buffer.write_number(v).unwrap();
    }
    buffer
}

fn read_ints(buffer: &TokenBuffer) -> Vec<i64> {
    let mut reader = buffer.reader();
    let mut out = Vec::new();
    while let Some(kind) = reader.advance() {
        assert_eq!(kind, TokenKind::Int);
        out.push(reader.as_i64().unwrap());
    }
    out
}

#[test]
fn append_leaves_the_source_untouched() {
    let mut a = ints(&[1, 2]);
    let b = ints(&[3, 4]);
    a.append(&b).unwrap();
    assert_eq!(read_ints(&a), [1, 2, 3, 4]);
    assert_eq!(read_ints(&b), [3, 4]);
    assert_eq!(b.len(), 2);
}

#[rstest]
#[case(0, 0)]
#[case(0, 5)]
#[case(1, 15)]
#[case(15, 1)]
#[case(16, 16)]
#[case(17, 40)]
fn append_across_segment_boundaries(#[case] left: i64, #[case] right: i64) {
    let first: Vec<i64> = (0..left).collect();
    let second: Vec<i64> = (left..left + right).collect();
    let mut a = ints(&first);
    a.append(&ints(&second)).unwrap();
    assert_eq!(read_ints(&a), (0..left + right).collect::<Vec<_>>());
    assert_eq!(a.is_empty(), left + right == 0);
}

#[test]
fn append_copies_unbalanced_content_verbatim() {
    let mut suffix = TokenBuffer::default();
    suffix.write_name("tail").unwrap();
    suffix.write_bool(false).unwrap();
    suffix.end_object().unwrap();

    let mut head = TokenBuffer::default();
    head.start_object().unwrap();
    head.write_name("head").unwrap();
    head.write_null().unwrap();
    head.append(&suffix).unwrap();

    assert_eq!(
        head.to_string(),
        "[TokenBuffer: StartObject, FieldName(head), Null, FieldName(tail), False, EndObject]"
    );
    assert!(head.write_context().in_root());
    assert_eq!(head.to_values().unwrap().len(), 1);
}

#[test]
fn append_is_chainable() {
    let mut a = ints(&[1]);
    a.append(&ints(&[2])).unwrap().append(&ints(&[3])).unwrap();
    assert_eq!(read_ints(&a), [1, 2, 3]);
    assert_eq!(a.first_token(), Some(TokenKind::Int));
}

#[test]
fn trailing_field_name_cannot_be_appended() {
    let mut dangling = TokenBuffer::default();
    dangling.write_name("orphan").unwrap();
    let mut target = TokenBuffer::default();
    assert!(target.append(&dangling).is_err());
}
