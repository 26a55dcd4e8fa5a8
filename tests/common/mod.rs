#![allow(dead_code)]

use cjson::{Map, Value};
use proptest::prelude::*;

/// Any finite double.
pub fn arb_finite_f64() -> BoxedStrategy<f64> {
    any::<f64>()
        .prop_map(|f| if f.is_finite() { f } else { 0.0 })
        .boxed()
}

/// Doubles the condensed form keeps bit-exact at every precision preference:
/// integers, and values whose mantissa fits the one-byte half-float form.
pub fn arb_exact_f64() -> BoxedStrategy<f64> {
    prop_oneof![
        any::<i32>().prop_map(|i| i as f64),
        (any::<bool>(), 0u64..=255, -28i32..=28).prop_map(|(neg, mantissa, exponent)| {
            let magnitude = (1.0 + mantissa as f64 / 256.0) * (exponent as f64).exp2();
            if neg {
                -magnitude
            } else {
                magnitude
            }
        }),
    ]
    .boxed()
}

pub fn arb_key() -> BoxedStrategy<String> {
    prop_oneof![
        "[a-z]{0,6}",
        // Keys the shape descriptor cannot carry.
        "[a-zé]{1,4}",
    ]
    .boxed()
}

fn arb_value_with(numbers: BoxedStrategy<f64>) -> BoxedStrategy<Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        numbers.prop_map(Value::from),
        "[ -~]{0,40}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::hash_map(arb_key(), inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map>())),
        ]
    })
    .boxed()
}

/// An arbitrary value tree with finite numbers.
pub fn arb_value() -> BoxedStrategy<Value> { arb_value_with(arb_finite_f64()) }

/// An arbitrary value tree whose numbers survive the condensed form exactly.
pub fn arb_condensable_value() -> BoxedStrategy<Value> { arb_value_with(arb_exact_f64()) }
