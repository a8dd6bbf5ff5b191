#![expect(missing_docs)]

use tokenbuffer::{BufferOptions, EventSink, EventSource, NativeId, TokenBuffer};

fn sample() -> TokenBuffer {
    let mut buffer = TokenBuffer::default();
    buffer.start_object().unwrap();
    buffer.write_name("id").unwrap();
    buffer.write_number(7).unwrap();
    buffer.write_name("tags").unwrap();
    buffer.start_array().unwrap();
    buffer.write_string("a").unwrap();
    buffer.write_bool(true).unwrap();
    buffer.end_array().unwrap();
    buffer.write_name("score").unwrap();
    buffer.write_number(1.5).unwrap();
    buffer.write_name("none").unwrap();
    buffer.write_null().unwrap();
    buffer.end_object().unwrap();
    buffer
}

fn render_events(buffer: &TokenBuffer) -> String {
    let mut reader = buffer.reader();
    let mut lines = Vec::new();
    while let Some(kind) = reader.advance() {
        let text = reader.current_text().unwrap_or_default();
        lines.push(format!("{kind} [{}] {text}", reader.context().pointer()));
    }
    lines.join("\n")
}

#[test]
fn snapshot_display() {
    insta::assert_snapshot!(sample().to_string(), @"[TokenBuffer: StartObject, FieldName(id), Int, FieldName(tags), StartArray, String, True, EndArray, FieldName(score), Float, FieldName(none), Null, EndObject]");
}

#[test]
fn snapshot_events_with_paths() {
    insta::assert_snapshot!(render_events(&sample()), @r"
    StartObject [] {
    FieldName [/id] id
    Int [/id] 7
    FieldName [/tags] tags
    StartArray [/tags] [
    String [/tags/0] a
    True [/tags/1] true
    EndArray [/tags] ]
    FieldName [/score] score
    Float [/score] 1.5
    FieldName [/none] none
    Null [/none] null
    EndObject [] }
    ");
}

#[test]
fn snapshot_display_with_native_ids() {
    let mut buffer = TokenBuffer::new(BufferOptions {
        has_native_ids: true,
        ..Default::default()
    });
    buffer.write_object_id(NativeId::from("&a")).unwrap();
    buffer.start_array().unwrap();
    buffer.write_type_id(NativeId::from("!!str")).unwrap();
    buffer.write_string("x").unwrap();
    buffer.end_array().unwrap();
    insta::assert_snapshot!(buffer.to_string(), @"[TokenBuffer: [objectId=&a]StartArray, [typeId=!!str]String, EndArray]");
}

#[test]
fn snapshot_display_truncation() {
    let mut buffer = TokenBuffer::default();
    for i in 0..101 {
        buffer.write_number(i).unwrap();
    }
    let text = buffer.to_string();
    insta::assert_snapshot!(text.rsplit(", ").next().unwrap(), @"Int ... (truncated 1 entries)]");
}

#[test]
fn snapshot_materialized_values() {
    let mut buffer = TokenBuffer::default();
    buffer.start_object().unwrap();
    buffer.write_name("id").unwrap();
    buffer.write_number(7).unwrap();
    buffer.end_object().unwrap();
    insta::assert_debug_snapshot!(buffer.to_values().unwrap(), @r#"
    [
        Object(
            {
                "id": Number(
                    Int(
                        7,
                    ),
                ),
            },
        ),
    ]
    "#);
}
