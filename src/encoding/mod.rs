//! # Condensed binary encoder and decoder
//!
//! The condensed form is a compact, self-describing byte encoding that is
//! semantically lossless with respect to JSON. Every value starts with a tag
//! byte; small payloads ride inside the tag itself, and object key sets that
//! repeat are written once and referenced by a dictionary id afterwards.
//!
//! # Example
//!
//! ```
//! use cjson::prelude::*;
//!
//! let mut obj = Value::new_object();
//! obj.insert("x", 1).unwrap();
//! obj.insert("y", vec![2, 3]).unwrap();
//!
//! let bytes = encode_full(&obj);
//! let back = decode_full(&bytes).unwrap();
//! assert_eq!(back, obj);
//! ```

use crate::{
    errors::{Error, Result},
    Map, Value,
};
use bytes::Buf;
use std::rc::Rc;

mod constants;
pub(crate) use constants::*;
mod ser;
pub use ser::SerializerBytes;
mod shape;

/// Encodes a value into its condensed representation, storing output in
/// `out`.
///
/// # Arguments
///
/// * `value: &Value` - A reference to the [`Value`] to be encoded.
/// * `out: &mut S` - A mutable reference to the sink where the encoder
///   output will be stored.
///
/// # Example
///
/// ```
/// use cjson::prelude::*;
///
/// let out = &mut Vec::new();
/// encode(&Value::Null, out);
/// assert_eq!(out.as_slice(), [0x01]);
/// ```
pub fn encode<S: SerializerBytes>(value: &Value, out: &mut S) {
    let mut shapes = shape::ShapeIndex::build(value);
    ser::write_value(value, out, &mut shapes);
}

/// Encodes a value into a fresh vector of bytes.
///
/// # Arguments
///
/// * `value: &Value` - A reference to the [`Value`] to be encoded.
pub fn encode_full(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode(value, &mut out);
    out
}

/// Tries to decode a buffer of condensed bytes into a [`Value`].
///
/// # Arguments
///
/// * `data` - A buffer containing binary condensed data.
///
/// # Example
///
/// ```
/// use cjson::prelude::*;
///
/// let bytes = encode_full(&Value::from(12));
/// let dec = decode(&mut bytes.as_slice()).unwrap();
/// assert_eq!(dec, Value::from(12));
/// ```
pub fn decode<B: Buf>(data: &mut B) -> Result<Value> {
    let mut decoder = Decoder {
        data,
        shapes: Vec::new(),
    };
    decoder.read_value()
}

/// Tries to decode a slice of condensed bytes into a [`Value`].
///
/// # Arguments
///
/// * `bytes` - The slice holding the condensed data.
///
/// # Example
///
/// ```
/// use cjson::prelude::*;
///
/// let bytes = encode_full(&Value::from("hi"));
/// assert_eq!(decode_full(&bytes).unwrap(), Value::from("hi"));
/// ```
pub fn decode_full(mut bytes: &[u8]) -> Result<Value> { decode(&mut bytes) }

#[derive(Copy, Clone, Debug)]
/// Condensed tags, with the payload bits already unpacked.
enum Tag {
    HalfFloat(u8),
    ShortString(usize),
    LongString,
    TinyInteger(u8),
    CommonObject(usize),
    UncommonObject,
    RareObject,
    SmallObject(usize),
    LargeObject,
    HashtableObject,
    ShortArray(usize),
    LongArray,
    ShortInteger(u8),
    Double,
    Float,
    SignedLong,
    UnsignedLong,
    Signed,
    Unsigned,
    SignedShort,
    UnsignedShort,
    True,
    False,
    Null,
    Terminator,
    Reserved,
}

use Tag::*;

fn tag_of(byte: u8) -> Tag {
    if byte & HALF_FLOAT != 0 {
        HalfFloat(byte)
    } else if byte == constants::LONG_STRING {
        LongString
    } else if byte == RESERVED_1 {
        Reserved
    } else if byte & 0b1110_0000 == constants::SHORT_STRING {
        ShortString((byte & SHORT_STRING_MASK) as usize)
    } else if byte & 0b1110_0000 == TINY_INTEGER {
        TinyInteger(byte & TINY_INTEGER_MASK)
    } else if byte == constants::UNCOMMON_OBJECT {
        UncommonObject
    } else if byte == constants::RARE_OBJECT {
        RareObject
    } else if byte & 0b1111_1000 == constants::COMMON_OBJECT {
        CommonObject((byte & OBJECT_MASK) as usize)
    } else if byte == constants::LARGE_OBJECT {
        LargeObject
    } else if byte == constants::HASHTABLE_OBJECT {
        HashtableObject
    } else if byte & 0b1111_1000 == constants::SMALL_OBJECT {
        SmallObject((byte & OBJECT_MASK) as usize)
    } else if byte == constants::LONG_ARRAY {
        LongArray
    } else if byte == RESERVED_2 {
        Reserved
    } else if byte & 0b1111_0000 == constants::SHORT_ARRAY {
        ShortArray((byte & SHORT_ARRAY_MASK) as usize)
    } else if byte & 0b1111_0000 == constants::SHORT_INTEGER {
        ShortInteger(byte & 0x0f)
    } else {
        match byte {
            constants::DOUBLE => Double,
            constants::FLOAT => Float,
            SIGNED_LONG_INTEGER => SignedLong,
            UNSIGNED_LONG_INTEGER => UnsignedLong,
            SIGNED_INTEGER => Signed,
            UNSIGNED_INTEGER => Unsigned,
            SIGNED_SHORT_INTEGER => SignedShort,
            UNSIGNED_SHORT_INTEGER => UnsignedShort,
            CON_TRUE => True,
            CON_FALSE => False,
            CON_NULL => Null,
            constants::TERMINATOR => Terminator,
            b if b & !RESERVED_3_MASK == RESERVED_3 => Reserved,
            _ => Reserved,
        }
    }
}

struct Decoder<'a, B: Buf> {
    data:   &'a mut B,
    /// Shape dictionary, grown lazily as ids are first referenced.
    shapes: Vec<Option<Rc<Vec<String>>>>,
}

impl<'a, B: Buf> Decoder<'a, B> {
    fn read_u8(&mut self) -> Result<u8> {
        if self.data.has_remaining() {
            Ok(self.data.get_u8())
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    fn peek(&self) -> Result<u8> {
        if self.data.has_remaining() {
            Ok(self.data.chunk()[0])
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    fn read_many(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.data.remaining() >= len {
            let mut bytes = vec![0; len];
            self.data.copy_to_slice(&mut bytes);
            Ok(bytes)
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    fn read_array(&mut self, len: usize) -> Result<Value> {
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.read_value()?);
        }
        Ok(Value::Array(out))
    }

    fn read_value(&mut self) -> Result<Value> {
        match tag_of(self.read_u8()?) {
            Null => Ok(Value::Null),
            True => Ok(Value::Bool(true)),
            False => Ok(Value::Bool(false)),

            TinyInteger(bits) => {
                let mut made = (bits & TINY_INTEGER_NUMBER_MASK) as i64;
                if bits & TINY_INTEGER_SIGN_MASK != 0 {
                    made |= !0x0f;
                }
                Ok(Value::from(made))
            }
            ShortInteger(high) => {
                let low = self.read_u8()?;
                let mut made = ((high & SHORT_INTEGER_PREFIX_MASK) as i64) << 8 | low as i64;
                if high & SHORT_INTEGER_SIGN_MASK != 0 {
                    made |= !0x7ff;
                }
                Ok(Value::from(made))
            }
            SignedShort => Ok(Value::from(self.read_u16()? as i16)),
            UnsignedShort => Ok(Value::from(self.read_u16()?)),
            Signed => Ok(Value::from(self.read_u32()? as i32)),
            Unsigned => Ok(Value::from(self.read_u32()?)),
            SignedLong => Ok(Value::from(self.read_u64()? as i64)),
            UnsignedLong => Ok(Value::from(self.read_u64()?)),

            Double => Ok(Value::from(f64::from_bits(self.read_u64()?))),
            Float => Ok(Value::from(f32::from_bits(self.read_u32()?))),
            HalfFloat(tag) => {
                let mantissa = self.read_u8()?;
                let mut bits = ((tag & HALF_FLOAT_SIGN_BIT) as u64) << 57;
                bits |= (HALF_FLOAT_EXPONENT_BIAS + (tag & HALF_FLOAT_EXPONENT_MASK) as u64) << 52;
                bits |= (mantissa as u64) << 44;
                Ok(Value::from(f64::from_bits(bits)))
            }

            ShortString(len) => {
                let bytes = self.read_many(len)?;
                Ok(Value::Str(utf8(bytes)?))
            }
            LongString => {
                let mut bytes = Vec::new();
                loop {
                    match self.read_u8()? {
                        constants::TERMINATOR => break,
                        byte => bytes.push(byte),
                    }
                }
                Ok(Value::Str(utf8(bytes)?))
            }

            ShortArray(len) => self.read_array(len),
            LongArray => {
                let mut out = Vec::new();
                while self.peek()? != constants::TERMINATOR {
                    out.push(self.read_value()?);
                }
                self.data.advance(1);
                Ok(Value::Array(out))
            }

            SmallObject(size) => {
                let mut names = Vec::with_capacity(size);
                for _ in 0..size {
                    names.push(self.read_code_string()?);
                }
                self.read_object_entries(&names)
            }
            LargeObject => {
                let names = self.read_shape_definition()?;
                self.read_object_entries(&names)
            }
            HashtableObject => self.read_hashtable_object(),
            CommonObject(id) => self.read_indexed_object(id),
            UncommonObject => {
                let id = self.read_u8()? as usize + MAX_COMMON_OBJECT_ID + 1;
                self.read_indexed_object(id)
            }
            RareObject => {
                let bytes = self.read_many(2)?;
                let id = u16::from_be_bytes([bytes[0], bytes[1]]) as usize
                    + MAX_UNCOMMON_OBJECT_ID
                    + 1;
                self.read_indexed_object(id)
            }

            Reserved => Err(Error::UnsupportedVersion),
            Terminator => Err(Error::corrupt("unexpected ending symbol")),
        }
    }

    fn read_u16(&mut self) -> Result<u16> {
        if self.data.remaining() >= 2 {
            Ok(self.data.get_u16_le())
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    fn read_u32(&mut self) -> Result<u32> {
        if self.data.remaining() >= 4 {
            Ok(self.data.get_u32_le())
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    fn read_u64(&mut self) -> Result<u64> {
        if self.data.remaining() >= 8 {
            Ok(self.data.get_u64_le())
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    // One key of a shape descriptor: plain bytes until one with the high bit
    // set, which is the final character; a lone flip byte is the empty key.
    fn read_code_string(&mut self) -> Result<String> {
        let first = self.read_u8()?;
        if first == KEY_FINAL_BIT {
            return Ok(String::new());
        }
        let mut made = Vec::new();
        let mut byte = first;
        loop {
            if byte < KEY_FINAL_BIT {
                made.push(byte);
                byte = self.read_u8()?;
            } else {
                made.push(byte & 0x7f);
                return utf8(made);
            }
        }
    }

    fn read_shape_definition(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        while self.peek()? != constants::TERMINATOR {
            names.push(self.read_code_string()?);
        }
        self.data.advance(1);
        Ok(names)
    }

    fn read_indexed_object(&mut self, id: usize) -> Result<Value> {
        if self.shapes.len() < id + 1 {
            self.shapes.resize(id + 1, None);
        }
        // The first reference to an id is followed by its definition.
        if self.shapes[id].is_none() {
            let definition = Rc::new(self.read_shape_definition()?);
            self.shapes[id] = Some(definition);
        }
        let names = self.shapes[id]
            .clone()
            .ok_or_else(|| Error::corrupt("missing shape definition"))?;
        self.read_object_entries(&names)
    }

    fn read_object_entries(&mut self, names: &[String]) -> Result<Value> {
        let mut made = Map::with_capacity(names.len());
        for name in names {
            let value = self.read_value()?;
            made.insert(name.clone(), value);
        }
        Ok(Value::Object(made))
    }

    fn read_hashtable_object(&mut self) -> Result<Value> {
        let mut names = Vec::new();
        loop {
            if self.peek()? == constants::TERMINATOR {
                self.data.advance(1);
                break;
            }
            let mut made = Vec::new();
            loop {
                match self.read_u8()? {
                    constants::TERMINATOR => break,
                    byte => made.push(byte),
                }
            }
            names.push(utf8(made)?);
        }
        // A second terminator right after the key list marks an empty key,
        // whose value comes last.
        if self.peek()? == constants::TERMINATOR {
            names.push(String::new());
            self.data.advance(1);
        }
        self.read_object_entries(&names)
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::corrupt("string is not valid utf-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: Value) {
        let encoded = encode_full(&value);
        let decoded = decode_full(&encoded);
        assert_eq!(decoded.as_ref(), Ok(&value), "bytes were {:x?}", encoded);
    }

    #[test]
    fn scalars_round_trip() {
        round_trip(Value::Null);
        round_trip(Value::from(true));
        round_trip(Value::from(false));
        for i in [-16i64, -1, 0, 15, 16, -17, 2047, -2048, 40_000, -40_000] {
            round_trip(Value::from(i));
        }
        round_trip(Value::from(i64::MAX));
        round_trip(Value::from(i64::MIN));
        round_trip(Value::from(0.5));
        round_trip(Value::from(-1.5));
        round_trip(Value::from(0.1));
        round_trip(Value::from(1.0e19));
    }

    #[test]
    fn strings_round_trip() {
        round_trip(Value::from(""));
        round_trip(Value::from("hello"));
        round_trip(Value::from("ünïcødé"));
        round_trip(Value::from("x".repeat(29).as_str()));
        round_trip(Value::from("x".repeat(30).as_str()));
        round_trip(Value::from("y".repeat(5000).as_str()));
        // A NUL survives the length-prefixed short form.
        round_trip(Value::from("a\0b"));
    }

    #[test]
    fn containers_round_trip() {
        round_trip(Value::new_array());
        round_trip(Value::from(vec![1, 2, 3]));
        round_trip(Value::from((0..100).collect::<Vec<i64>>()));
        round_trip(Value::new_object());

        let mut obj = Value::new_object();
        obj.insert("a", 1).unwrap();
        obj.insert("b", "two").unwrap();
        obj.insert("c", vec![3, 4]).unwrap();
        obj.insert("", ()).unwrap();
        round_trip(obj);
    }

    #[test]
    fn non_ascii_keys_round_trip() {
        let mut obj = Value::new_object();
        obj.insert("clé", 1).unwrap();
        obj.insert("fleißig", true).unwrap();
        obj.insert("plain", ()).unwrap();
        round_trip(obj.clone());

        obj.insert("", "empty").unwrap();
        round_trip(obj);
    }

    #[test]
    fn shape_dictionary_round_trips() {
        let mut arr = Value::new_array();
        for i in 0..40 {
            let mut obj = Value::new_object();
            obj.insert("id", i).unwrap();
            obj.insert("name", format!("n{}", i)).unwrap();
            arr.push(obj).unwrap();
        }
        round_trip(arr);
    }

    #[test]
    fn nested_dictionary_objects_round_trip() {
        // The same shape on both sides of a nesting boundary.
        let mut leaf_a = Value::new_object();
        leaf_a.insert("v", 1).unwrap();
        let mut leaf_b = Value::new_object();
        leaf_b.insert("v", 2).unwrap();
        let mut mid = Value::new_object();
        mid.insert("v", leaf_a).unwrap();
        round_trip(Value::from(vec![mid, leaf_b]));
    }

    #[test]
    fn dictionary_reference_decodes_from_raw_bytes() {
        // Two common-object references; only the first carries the shape.
        let bytes = [
            0b0010_0010, // array of 2
            0x38, 0xeb, 0x00, 0x41, // {"k": 1} with inline definition
            0x38, 0x42, // {"k": 2} by reference
        ];
        let decoded = decode_full(&bytes).unwrap();
        assert_eq!(decoded.get(0).unwrap().at("k").unwrap().to_f64().unwrap(), 1.0);
        assert_eq!(decoded.get(1).unwrap().at("k").unwrap().to_f64().unwrap(), 2.0);
    }

    #[test]
    fn common_id_five_uses_the_last_in_tag_slot() {
        // 0x3d carries dictionary id 5, definition inline.
        let decoded = decode_full(&[0x3d, 0xeb, 0x00, 0x41]).unwrap();
        assert_eq!(decoded.at("k").unwrap(), &Value::from(1));
    }

    #[test]
    fn uncommon_id_reads_one_extra_byte() {
        // id byte 0 means dictionary id 6.
        let bytes = [0x22, 0x3e, 0x00, 0xf6, 0x00, 0x41, 0x3e, 0x00, 0x42];
        let decoded = decode_full(&bytes).unwrap();
        assert_eq!(decoded.get(0).unwrap().at("v").unwrap(), &Value::from(1));
        assert_eq!(decoded.get(1).unwrap().at("v").unwrap(), &Value::from(2));
    }

    #[test]
    fn rare_id_reads_two_big_endian_bytes() {
        let bytes = [
            0x22, 0x3f, 0x01, 0x00, 0xfa, 0x00, 0x41, 0x3f, 0x01, 0x00, 0x42,
        ];
        let decoded = decode_full(&bytes).unwrap();
        assert_eq!(decoded.get(0).unwrap().at("z").unwrap(), &Value::from(1));
        assert_eq!(decoded.get(1).unwrap().at("z").unwrap(), &Value::from(2));
    }

    #[test]
    fn many_shapes_spill_into_wide_ids() {
        // More repeated shapes than the in-tag and one-byte id spaces hold.
        let mut arr = Value::new_array();
        for shape in 0..300 {
            for value in 0..2 {
                let mut obj = Value::new_object();
                obj.insert(format!("k{:03}", shape), value).unwrap();
                arr.push(obj).unwrap();
            }
        }
        round_trip(arr);
    }

    #[test]
    fn unsigned_long_is_accepted_on_decode() {
        let mut bytes = vec![UNSIGNED_LONG_INTEGER];
        bytes.extend_from_slice(&123_456_789_012u64.to_le_bytes());
        let decoded = decode_full(&bytes).unwrap();
        assert_eq!(decoded, Value::from(123_456_789_012i64));
    }

    #[test]
    fn half_float_reconstruction() {
        // 0x9f 0x80 is 1.5: exponent 0x3ff, mantissa 0x80 in the top byte.
        let decoded = decode_full(&[0x9f, 0x80]).unwrap();
        assert_eq!(decoded, Value::from(1.5));

        let decoded = decode_full(&[0xdf, 0x80]).unwrap();
        assert_eq!(decoded, Value::from(-1.5));
    }

    #[test]
    fn reserved_tags_mean_a_newer_version() {
        assert_eq!(decode_full(&[0x7e]), Err(Error::UnsupportedVersion));
        assert_eq!(decode_full(&[0x2e]), Err(Error::UnsupportedVersion));
        assert_eq!(decode_full(&[0x04]), Err(Error::UnsupportedVersion));
        assert_eq!(decode_full(&[0x07]), Err(Error::UnsupportedVersion));
    }

    #[test]
    fn stray_terminator_is_corrupt() {
        assert!(matches!(decode_full(&[0x00]), Err(Error::Corrupt(_))));
    }

    #[test]
    fn truncated_input_fails() {
        assert_eq!(decode_full(&[]), Err(Error::UnexpectedEnd));
        // Short string announcing three bytes, carrying one.
        assert_eq!(decode_full(&[0x63, b'a']), Err(Error::UnexpectedEnd));
        // Long array with no terminator.
        assert_eq!(decode_full(&[0x2f, 0x41]), Err(Error::UnexpectedEnd));
        // Half float missing its mantissa byte.
        assert_eq!(decode_full(&[0x9f]), Err(Error::UnexpectedEnd));
        // Double missing payload bytes.
        assert_eq!(decode_full(&[0x0f, 1, 2, 3]), Err(Error::UnexpectedEnd));
    }

    #[test]
    fn decoded_nan_reads_as_null() {
        let mut bytes = vec![constants::DOUBLE];
        bytes.extend_from_slice(&f64::NAN.to_le_bytes());
        assert_eq!(decode_full(&bytes).unwrap(), Value::Null);
    }
}
