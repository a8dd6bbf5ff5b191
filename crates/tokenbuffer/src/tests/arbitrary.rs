use alloc::{format, string::String, vec::Vec};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use quickcheck::{Arbitrary, Gen};

use crate::{Embedded, Map, Number, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteDouble(pub(crate) f64);

impl Arbitrary for FiniteDouble {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

impl Arbitrary for Number {
    fn arbitrary(g: &mut Gen) -> Self {
        match usize::arbitrary(g) % 7 {
            0 => Number::Int(i32::arbitrary(g)),
            1 => Number::Long(i64::arbitrary(g)),
            // wider than i64 most of the time
            2 => Number::BigInt(BigInt::from(i128::arbitrary(g)) * BigInt::from(1_000_003)),
            3 => Number::Double(FiniteDouble::arbitrary(g).0),
            4 => {
                let scale = i64::from(i8::arbitrary(g) % 40);
                Number::BigDecimal(BigDecimal::new(BigInt::from(i64::arbitrary(g)), scale))
            }
            // deferred text, sometimes with a fraction or exponent
            5 => Number::Textual(
                match usize::arbitrary(g) % 3 {
                    0 => format!("{}", i64::arbitrary(g)),
                    1 => format!("{}.{}", i32::arbitrary(g), u16::arbitrary(g)),
                    _ => format!("{}e{}", i32::arbitrary(g), i8::arbitrary(g)),
                }
                .into(),
            ),
            _ => {
                let mut value = f32::arbitrary(g);
                while !value.is_finite() {
                    value = f32::arbitrary(g);
                }
                Number::Float(value)
            }
        }
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_scalar(g: &mut Gen) -> Value {
            match usize::arbitrary(g) % 5 {
                0 => Value::Null,
                1 => Value::Bool(bool::arbitrary(g)),
                2 => Value::Number(Number::arbitrary(g)),
                3 => Value::Embedded(Embedded::from(Vec::<u8>::arbitrary(g))),
                _ => Value::String(String::arbitrary(g)),
            }
        }

        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                return gen_scalar(g);
            }
            match usize::arbitrary(g) % 4 {
                0 | 1 => gen_scalar(g),
                2 => {
                    let len = usize::arbitrary(g) % 4;
                    Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let mut map = Map::new();
                    for _ in 0..len {
                        map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    Value::Object(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }
}
