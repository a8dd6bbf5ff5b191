use alloc::vec::Vec;
use std::thread;

use crate::{EventSink, EventSource, TokenBuffer};

#[test]
fn independent_readers_share_one_buffer() {
    let mut buffer = TokenBuffer::default();
    buffer.start_array().unwrap();
    for i in 0..100i64 {
        buffer.start_object().unwrap();
        buffer.write_name("i").unwrap();
        buffer.write_number(i).unwrap();
        buffer.end_object().unwrap();
    }
    buffer.end_array().unwrap();
    let buffer = &buffer;

    let sums: Vec<i64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|skip| {
                scope.spawn(move || {
                    let mut reader = buffer.reader();
                    // interleave a second reader on the same thread
                    let mut other = buffer.reader();
                    let mut sum = 0;
                    while reader.advance().is_some() {
                        other.advance();
                        assert_eq!(reader.current_kind(), other.current_kind());
                        if let Ok(i) = reader.as_i64() {
                            if i % 4 == skip {
                                sum += i;
                            }
                            assert_eq!(reader.current_name(), Some("i"));
                        }
                    }
                    sum
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sums.iter().sum::<i64>(), (0..100).sum::<i64>());
}
