//! Tag bytes of the condensed grammar. Every value begins with one of these;
//! the high bits discriminate the form and the low bits carry a small payload
//! where one fits.

/// Half-precision float flag bit; the rest of the byte is 1 sign bit and a
/// 6-bit exponent, with one mantissa byte following.
pub(crate) const HALF_FLOAT: u8 = 0b1000_0000;
/// Sign bit inside a half-float tag.
pub(crate) const HALF_FLOAT_SIGN_BIT: u8 = 0b0100_0000;
/// Exponent field inside a half-float tag.
pub(crate) const HALF_FLOAT_EXPONENT_MASK: u8 = 0b0011_1111;
/// Bias of the half-float exponent, in IEEE-754 double biased-exponent terms.
pub(crate) const HALF_FLOAT_EXPONENT_BIAS: u64 = 0x3e0;

/// Short string type bits; length is in the low five bits.
pub(crate) const SHORT_STRING: u8 = 0b0110_0000;
pub(crate) const SHORT_STRING_MASK: u8 = 0b0001_1111;
/// Longest string encodable in the short form.
pub(crate) const MAX_SHORT_STRING_LEN: usize = 29;
pub(crate) const RESERVED_1: u8 = 0b0111_1110;
/// Zero-terminated string.
pub(crate) const LONG_STRING: u8 = 0b0111_1111;

/// 5-bit two's complement integer packed into the tag byte.
pub(crate) const TINY_INTEGER: u8 = 0b0100_0000;
pub(crate) const TINY_INTEGER_MASK: u8 = 0b0001_1111;
pub(crate) const TINY_INTEGER_NUMBER_MASK: u8 = 0b0000_1111;
pub(crate) const TINY_INTEGER_SIGN_MASK: u8 = 0b0001_0000;

/// Dictionary object with the id in the low three bits.
pub(crate) const COMMON_OBJECT: u8 = 0b0011_1000;
pub(crate) const OBJECT_MASK: u8 = 0b0000_0111;
/// Dictionary object with a one-byte id following.
pub(crate) const UNCOMMON_OBJECT: u8 = 0b0011_1110;
/// Dictionary object with a two-byte big-endian id following.
pub(crate) const RARE_OBJECT: u8 = 0b0011_1111;
/// Highest dictionary id carried in the tag byte itself.
pub(crate) const MAX_COMMON_OBJECT_ID: usize = 5;
/// Highest dictionary id carried in one extra byte.
pub(crate) const MAX_UNCOMMON_OBJECT_ID: usize = MAX_COMMON_OBJECT_ID + 1 + 0xff;
/// Highest dictionary id carried in two extra bytes.
pub(crate) const MAX_RARE_OBJECT_ID: usize = MAX_UNCOMMON_OBJECT_ID + 1 + 0xffff;

/// Non-dictionary object with the size in the low three bits.
pub(crate) const SMALL_OBJECT: u8 = 0b0011_0000;
pub(crate) const MAX_SMALL_OBJECT_SIZE: usize = 5;
/// Non-dictionary object with a zero-terminated shape descriptor.
pub(crate) const LARGE_OBJECT: u8 = 0b0011_0110;
/// Object whose keys cannot be expressed as a shape descriptor.
pub(crate) const HASHTABLE_OBJECT: u8 = 0b0011_0111;

/// Short array type bits; length is in the low four bits.
pub(crate) const SHORT_ARRAY: u8 = 0b0010_0000;
pub(crate) const SHORT_ARRAY_MASK: u8 = 0b0000_1111;
/// Longest array encodable in the short form.
pub(crate) const MAX_SHORT_ARRAY_LEN: usize = 13;
pub(crate) const RESERVED_2: u8 = 0b0010_1110;
/// Zero-terminated array.
pub(crate) const LONG_ARRAY: u8 = 0b0010_1111;

/// 12-bit two's complement integer: four bits in the tag, one byte following.
pub(crate) const SHORT_INTEGER: u8 = 0b0001_0000;
pub(crate) const SHORT_INTEGER_PREFIX_MASK: u8 = 0b0000_0111;
pub(crate) const SHORT_INTEGER_SIGN_MASK: u8 = 0b0000_1000;

/// 8 bytes little-endian IEEE-754 double.
pub(crate) const DOUBLE: u8 = 0x0f;
/// 4 bytes little-endian IEEE-754 single.
pub(crate) const FLOAT: u8 = 0x0e;
pub(crate) const SIGNED_LONG_INTEGER: u8 = 0x0d;
pub(crate) const UNSIGNED_LONG_INTEGER: u8 = 0x0c;
pub(crate) const SIGNED_INTEGER: u8 = 0x0b;
pub(crate) const UNSIGNED_INTEGER: u8 = 0x0a;
pub(crate) const SIGNED_SHORT_INTEGER: u8 = 0x09;
pub(crate) const UNSIGNED_SHORT_INTEGER: u8 = 0x08;
/// 0x04 through 0x07.
pub(crate) const RESERVED_3: u8 = 0b0000_0100;
pub(crate) const RESERVED_3_MASK: u8 = 0b0000_0011;
pub(crate) const CON_TRUE: u8 = 0x03;
pub(crate) const CON_FALSE: u8 = 0x02;
pub(crate) const CON_NULL: u8 = 0x01;
/// Context-dependent end marker closing the zero-terminated forms.
pub(crate) const TERMINATOR: u8 = 0x00;

/// Set on the final byte of each key inside a shape descriptor; a lone
/// `KEY_FINAL_BIT` stands for the empty key.
pub(crate) const KEY_FINAL_BIT: u8 = 0x80;

/// Magnitudes beyond these cannot take the half-float form.
pub(crate) const MAX_HALF_PRECISION: f64 = 8.573_16e9;
pub(crate) const MIN_HALF_PRECISION_POSITIVE: f64 = 9.349_61e-10;

/// Floating-point forms the encoder may prefer.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Precision {
    Half,
    Single,
    Double,
}

#[cfg(feature = "prefer-double")]
pub(crate) const PREFERRED_PRECISION: Precision = Precision::Double;
#[cfg(all(feature = "prefer-single", not(feature = "prefer-double")))]
pub(crate) const PREFERRED_PRECISION: Precision = Precision::Single;
#[cfg(not(any(feature = "prefer-single", feature = "prefer-double")))]
pub(crate) const PREFERRED_PRECISION: Precision = Precision::Half;
