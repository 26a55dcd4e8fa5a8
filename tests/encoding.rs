mod common;

use cjson::prelude::*;
use common::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode(value in arb_condensable_value()) {
        let enc = encode_full(&value);
        let dec = decode_full(&enc);
        if dec.as_ref() != Ok(&value) {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", value, enc, dec)
        }
    }

    #[test]
    fn encode_decode_integers(i in proptest::num::i64::ANY) {
        // Whole numbers survive exactly whenever the double held them exactly.
        let value = Value::from(i as f64);
        let enc = encode_full(&value);
        let dec = decode_full(&enc);
        if dec.as_ref() != Ok(&value) {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", i, enc, dec)
        }
    }

    #[test]
    fn half_precision_stays_within_tolerance(x in arb_finite_f64()) {
        let enc = encode_full(&Value::from(x));
        if enc[0] & 0x80 != 0 {
            let dec = decode_full(&enc).unwrap().to_f64().unwrap();
            let relative = ((dec - x) / x).abs();
            prop_assert!(relative <= 1.0 / 256.0, "{} decoded as {}", x, dec);
        }
    }

    #[test]
    fn truncations_never_panic(value in arb_condensable_value(), cut in 0usize..32) {
        let mut enc = encode_full(&value);
        if cut < enc.len() {
            enc.truncate(enc.len() - cut - 1);
            let _ = decode_full(&enc);
        }
    }
}

#[test]
fn small_object_scenario() {
    let mut obj = Value::new_object();
    obj.insert("a", 1).unwrap();
    obj.insert("b", true).unwrap();
    obj.insert("c", ()).unwrap();

    let out = encode_full(&obj);
    assert_eq!(out, [0x33, 0xe1, 0xe2, 0xe3, 0x41, 0x03, 0x01]);
    assert_eq!(decode_full(&out).unwrap(), obj);
}

#[test]
fn tiny_integer_array_scenario() {
    let arr = Value::from(vec![1, -1, 15, -16]);
    assert_eq!(encode_full(&arr), [0x24, 0x41, 0x5f, 0x4f, 0x50]);
}

#[test]
fn integer_valued_zero_scenario() {
    assert_eq!(encode_full(&Value::from(0.0)), [0x40]);
}

#[test]
fn repeated_shape_scenario() {
    let mut arr = Value::new_array();
    for i in 0..5 {
        let mut obj = Value::new_object();
        obj.insert("k", 10 + i).unwrap();
        arr.push(obj).unwrap();
    }

    let out = encode_full(&arr);
    // The key set travels exactly once.
    let descriptor_occurrences = out
        .windows(2)
        .filter(|w| w[0] == 0xeb && w[1] == 0x00)
        .count();
    assert_eq!(descriptor_occurrences, 1);
    // Five tag references of one byte each; four carry no shape bytes.
    assert_eq!(out.iter().filter(|&&b| b == 0x38).count(), 5);
    assert_eq!(out.len(), 1 + (1 + 2 + 1) + 4 * 2);

    assert_eq!(decode_full(&out).unwrap(), arr);
}

#[test]
fn uncommon_ids_round_trip() {
    // Seven distinct repeated shapes push the least frequent past the
    // six in-tag dictionary slots.
    let mut arr = Value::new_array();
    for shape in 0..7u8 {
        let key: String = (b'a'..=b'a' + shape).map(char::from).collect();
        // Frequency falls with the shape number, fixing the ranking.
        for i in 0..(9 - shape as i64) {
            let mut obj = Value::new_object();
            obj.insert(key.clone(), i).unwrap();
            arr.push(obj).unwrap();
        }
    }

    let out = encode_full(&arr);
    assert!(out.contains(&0x3e), "expected an uncommon-object tag");
    assert_eq!(decode_full(&out).unwrap(), arr);
}

#[test]
fn deep_nesting_round_trips() {
    let mut value = Value::from(0);
    for _ in 0..40 {
        value = Value::from(vec![value]);
    }
    let out = encode_full(&value);
    assert_eq!(decode_full(&out).unwrap(), value);
}

#[test]
fn long_array_of_mixed_values_round_trips() {
    let mut arr = Value::new_array();
    for i in 0..50 {
        arr.push(i).unwrap();
        arr.push(format!("s{}", i)).unwrap();
        arr.push(i % 2 == 0).unwrap();
        arr.push(()).unwrap();
    }
    assert_eq!(decode_full(&encode_full(&arr)).unwrap(), arr);
}

#[cfg(feature = "prefer-double")]
#[test]
fn double_preference_is_bit_exact() {
    for x in [0.1, 1.5, -2.625e-7, 3.1415926535897932, 1.0e300, 5.0e-324] {
        let enc = encode_full(&Value::from(x));
        assert_eq!(decode_full(&enc).unwrap().to_f64().unwrap(), x);
    }
}
