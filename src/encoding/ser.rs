//! The condensed encoder.
//!
//! Each value is written as a tag byte followed by as little payload as the
//! grammar allows: integers take the smallest of seven widths, floats the
//! narrowest of three precisions that keeps enough of the mantissa, and
//! repeated object layouts collapse to dictionary ids handed out by the
//! [`ShapeIndex`](super::shape::ShapeIndex) pre-pass.

use super::{
    constants::*,
    shape::{self, ShapeIndex},
};
use crate::{
    Map,
    Value::{self, *},
};
use bytes::BytesMut;

/// Byte-oriented serializer sink.
pub trait SerializerBytes {
    /// Add a byte to the output.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::encoding::SerializerBytes;
    ///
    /// let buf = &mut Vec::new();
    /// buf.put_byte(1);
    /// ```
    fn put_byte(&mut self, byte: u8);

    /// Add a slice to the output.
    fn put_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put_byte(byte);
        }
    }
}

impl SerializerBytes for Vec<u8> {
    fn put_byte(&mut self, byte: u8) { self.push(byte) }

    fn put_slice(&mut self, bytes: &[u8]) { self.extend_from_slice(bytes) }
}

impl SerializerBytes for BytesMut {
    fn put_byte(&mut self, byte: u8) { self.extend_from_slice(&[byte]) }

    fn put_slice(&mut self, bytes: &[u8]) { self.extend_from_slice(bytes) }
}

pub(crate) fn write_value<S: SerializerBytes>(value: &Value, out: &mut S, shapes: &mut ShapeIndex) {
    match value {
        Null => out.put_byte(CON_NULL),
        Bool(true) => out.put_byte(CON_TRUE),
        Bool(false) => out.put_byte(CON_FALSE),
        Num(n) => write_number(*n, out),
        Str(s) => write_string(s, out),
        Array(items) => {
            if items.len() <= MAX_SHORT_ARRAY_LEN {
                out.put_byte(SHORT_ARRAY | items.len() as u8);
                for item in items {
                    write_value(item, out, shapes);
                }
            } else {
                out.put_byte(LONG_ARRAY);
                for item in items {
                    write_value(item, out, shapes);
                }
                out.put_byte(TERMINATOR);
            }
        }
        Object(map) => write_object(map, out, shapes),
    }
}

fn write_string<S: SerializerBytes>(s: &str, out: &mut S) {
    let bytes = s.as_bytes();
    if bytes.len() <= MAX_SHORT_STRING_LEN {
        out.put_byte(SHORT_STRING | bytes.len() as u8);
        out.put_slice(bytes);
    } else {
        // The long form cannot carry an embedded NUL; it would read back
        // truncated.
        out.put_byte(LONG_STRING);
        out.put_slice(bytes);
        out.put_byte(TERMINATOR);
    }
}

fn write_number<S: SerializerBytes>(n: f64, out: &mut S) {
    match integer_value(n) {
        Some(i) => write_integer(i, out),
        None => write_float(n, out),
    }
}

// An f64 holds an exact integer iff it is its own truncation and within the
// i64 span; 2^63 itself is already out.
fn integer_value(n: f64) -> Option<i64> {
    const SPAN: f64 = 9_223_372_036_854_775_808.0;
    if n.trunc() == n && n >= -SPAN && n < SPAN {
        Some(n as i64)
    } else {
        None
    }
}

fn write_integer<S: SerializerBytes>(i: i64, out: &mut S) {
    if (-16..=15).contains(&i) {
        out.put_byte(TINY_INTEGER | (i as i8 as u8 & TINY_INTEGER_MASK));
    } else if (-2048..=2047).contains(&i) {
        out.put_byte(SHORT_INTEGER | ((i >> 8) as u8 & 0x0f));
        out.put_byte(i as u8);
    } else if (i16::MIN as i64..=i16::MAX as i64).contains(&i) {
        out.put_byte(SIGNED_SHORT_INTEGER);
        out.put_slice(&(i as i16).to_le_bytes());
    } else if (0..=u16::MAX as i64).contains(&i) {
        out.put_byte(UNSIGNED_SHORT_INTEGER);
        out.put_slice(&(i as u16).to_le_bytes());
    } else if (i32::MIN as i64..=i32::MAX as i64).contains(&i) {
        out.put_byte(SIGNED_INTEGER);
        out.put_slice(&(i as i32).to_le_bytes());
    } else if (0..=u32::MAX as i64).contains(&i) {
        out.put_byte(UNSIGNED_INTEGER);
        out.put_slice(&(i as u32).to_le_bytes());
    } else {
        // The unsigned 64-bit form exists in the grammar but a signed holder
        // never needs it.
        out.put_byte(SIGNED_LONG_INTEGER);
        out.put_slice(&i.to_le_bytes());
    }
}

fn write_float<S: SerializerBytes>(x: f64, out: &mut S) {
    let bits = x.to_bits();
    let magnitude = x.abs();

    if x.is_nan() || magnitude > f32::MAX as f64 || magnitude < f32::MIN_POSITIVE as f64 {
        return write_double(x, out);
    }

    let single_lossless = (x as f32) as f64 == x;
    let low34_blank = bits & 0x0000_0003_ffff_ffff == 0;
    if PREFERRED_PRECISION == Precision::Double || !(single_lossless || low34_blank) {
        return write_double(x, out);
    }

    if magnitude > MAX_HALF_PRECISION || magnitude < MIN_HALF_PRECISION_POSITIVE {
        return write_single(x, out);
    }
    let low50_blank = bits & 0x0003_ffff_ffff_ffff == 0;
    if PREFERRED_PRECISION == Precision::Half || low50_blank {
        write_half(bits, out)
    } else {
        write_single(x, out)
    }
}

fn write_half<S: SerializerBytes>(bits: u64, out: &mut S) {
    // Identification prefix and sign, then the rebased exponent (6 bits).
    let mut tag = HALF_FLOAT | (((bits >> 57) as u8) & HALF_FLOAT_SIGN_BIT);
    tag |= (((bits >> 52) & 0x7ff) - HALF_FLOAT_EXPONENT_BIAS) as u8;
    out.put_byte(tag);
    // Topmost mantissa byte.
    out.put_byte((bits >> 44) as u8);
}

fn write_single<S: SerializerBytes>(x: f64, out: &mut S) {
    out.put_byte(FLOAT);
    out.put_slice(&(x as f32).to_le_bytes());
}

fn write_double<S: SerializerBytes>(x: f64, out: &mut S) {
    out.put_byte(DOUBLE);
    out.put_slice(&x.to_le_bytes());
}

fn write_object<S: SerializerBytes>(map: &Map, out: &mut S, shapes: &mut ShapeIndex) {
    if map.is_empty() {
        out.put_byte(SMALL_OBJECT);
        return;
    }
    let descriptor = match shape::descriptor(map) {
        Some(d) => d,
        None => return write_hashtable_object(map, out, shapes),
    };

    if let Some(entry) = shapes.entry_mut(&descriptor) {
        let id = entry.id;
        if id <= MAX_COMMON_OBJECT_ID {
            out.put_byte(COMMON_OBJECT | id as u8);
        } else if id <= MAX_UNCOMMON_OBJECT_ID {
            out.put_byte(UNCOMMON_OBJECT);
            out.put_byte((id - (MAX_COMMON_OBJECT_ID + 1)) as u8);
        } else {
            out.put_byte(RARE_OBJECT);
            let rebased = (id - (MAX_UNCOMMON_OBJECT_ID + 1)) as u16;
            out.put_slice(&rebased.to_be_bytes());
        }
        // The first reference to an id carries the shape definition.
        if !entry.defined {
            entry.defined = true;
            out.put_slice(&descriptor);
            out.put_byte(TERMINATOR);
        }
    } else if map.len() <= MAX_SMALL_OBJECT_SIZE {
        out.put_byte(SMALL_OBJECT | map.len() as u8);
        out.put_slice(&descriptor);
    } else {
        out.put_byte(LARGE_OBJECT);
        out.put_slice(&descriptor);
        out.put_byte(TERMINATOR);
    }

    for (_, inner) in shape::sorted_entries(map) {
        write_value(inner, out, shapes);
    }
}

// Keys that cannot travel in a descriptor are written out verbatim, each
// closed by a NUL. The empty key has no bytes of its own, so it is signalled
// by one extra NUL and must come last, values included.
fn write_hashtable_object<S: SerializerBytes>(map: &Map, out: &mut S, shapes: &mut ShapeIndex) {
    out.put_byte(HASHTABLE_OBJECT);
    let mut entries = shape::sorted_entries(map);
    let has_empty_key = entries.first().map_or(false, |(k, _)| k.is_empty());
    if has_empty_key {
        let front = entries.remove(0);
        entries.push(front);
    }

    for (key, _) in &entries {
        if !key.is_empty() {
            out.put_slice(key.as_bytes());
            out.put_byte(TERMINATOR);
        }
    }
    if has_empty_key {
        out.put_byte(TERMINATOR);
    }
    out.put_byte(TERMINATOR);

    for (_, inner) in &entries {
        write_value(inner, out, shapes);
    }
}
