//! A prelude containing everyday imports.
pub use crate::{
    encoding::{decode, decode_full, encode, encode_full, SerializerBytes},
    errors::{Error, Result},
    rep::{load, load_into, save, Describe, Factory, FieldCodec, Fields},
    text::{from_text, to_text},
    Kind, Map, Value,
};
