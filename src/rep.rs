//! # Types representable as values.
//!
//! A type opts in by implementing [`Describe`]: one routine that lists its
//! fields in a fixed order, used for both directions. The core drives two
//! traversals through it. Saving pulls each slot into an object, loading
//! pushes object entries back into the slots, and both dispatch through the
//! same per-type [`FieldCodec`] table.
//!
//! # Example
//!
//! ```
//! use cjson::prelude::*;
//!
//! #[derive(Default, PartialEq, Debug)]
//! struct Preferences {
//!     name:  String,
//!     count: u32,
//!     debug: bool,
//! }
//!
//! impl Describe for Preferences {
//!     fn describe(&mut self, fields: &mut Fields<'_>) -> Result<()> {
//!         fields.field("name", &mut self.name)?;
//!         fields.field("count", &mut self.count)?;
//!         fields.field("debug", &mut self.debug)?;
//!         Ok(())
//!     }
//! }
//!
//! let mut prefs = Preferences {
//!     name:  "example".to_string(),
//!     count: 3,
//!     debug: false,
//! };
//!
//! let value = save(&mut prefs).unwrap();
//! let restored: Preferences = load(&value).unwrap();
//! assert_eq!(restored, prefs);
//! ```

use crate::{
    errors::{Error, Result},
    Map,
    Value::{self, *},
};
use base64::prelude::*;
use bytes::Bytes;
use half::f16;
use hashbrown::HashMap;

/// The object member naming the variant of a polymorphic value.
pub const TYPE_KEY: &str = "type";

/// A value representable as a single [`Value`]; the per-type codec table the
/// field traversals dispatch through.
pub trait FieldCodec: Sized {
    /// Encodes the slot as a value.
    fn to_value(&self) -> Value;

    /// Decodes a value into a fresh slot.
    fn from_value(value: &Value) -> Result<Self>;
}

impl FieldCodec for Value {
    fn to_value(&self) -> Value { self.clone() }

    fn from_value(value: &Value) -> Result<Self> { Ok(value.clone()) }
}

impl FieldCodec for bool {
    fn to_value(&self) -> Value { Bool(*self) }

    fn from_value(value: &Value) -> Result<Self> { value.to_bool() }
}

impl FieldCodec for String {
    fn to_value(&self) -> Value { Str(self.clone()) }

    fn from_value(value: &Value) -> Result<Self> { value.to_str().map(str::to_string) }
}

impl FieldCodec for f64 {
    fn to_value(&self) -> Value { Value::from(*self) }

    fn from_value(value: &Value) -> Result<Self> { value.to_f64() }
}

impl FieldCodec for f16 {
    fn to_value(&self) -> Value { Value::from(self.to_f64()) }

    fn from_value(value: &Value) -> Result<Self> { Ok(f16::from_f64(value.to_f64()?)) }
}

/// Arithmetic slots travel as doubles; reading one back narrows with Rust
/// cast semantics.
macro_rules! arithmetic_codec {
    ($typ:ty) => {
        impl FieldCodec for $typ {
            fn to_value(&self) -> Value { Value::from(*self as f64) }

            fn from_value(value: &Value) -> Result<Self> { Ok(value.to_f64()? as $typ) }
        }
    };
}

arithmetic_codec!(u8);
arithmetic_codec!(u16);
arithmetic_codec!(u32);
arithmetic_codec!(u64);
arithmetic_codec!(usize);
arithmetic_codec!(i8);
arithmetic_codec!(i16);
arithmetic_codec!(i32);
arithmetic_codec!(i64);
arithmetic_codec!(isize);
arithmetic_codec!(f32);

impl FieldCodec for char {
    fn to_value(&self) -> Value { Str(self.to_string()) }

    fn from_value(value: &Value) -> Result<Self> {
        let mut chars = value.to_str()?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::parse("expected a one-character string")),
        }
    }
}

impl<T: FieldCodec> FieldCodec for Box<T> {
    fn to_value(&self) -> Value { self.as_ref().to_value() }

    fn from_value(value: &Value) -> Result<Self> { Ok(Box::new(T::from_value(value)?)) }
}

// Byte vectors travel as base64 strings.
impl FieldCodec for Bytes {
    fn to_value(&self) -> Value { Str(to_base64(self)) }

    fn from_value(value: &Value) -> Result<Self> {
        Ok(Bytes::from(from_base64(value.to_str()?)?))
    }
}

impl<T: FieldCodec> FieldCodec for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            None => Null,
            Some(inner) => inner.to_value(),
        }
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Null => Ok(None),
            other => Ok(Some(T::from_value(other)?)),
        }
    }
}

impl<T: FieldCodec> FieldCodec for Vec<T> {
    fn to_value(&self) -> Value { Array(self.iter().map(T::to_value).collect()) }

    fn from_value(value: &Value) -> Result<Self> {
        value.as_array()?.iter().map(T::from_value).collect()
    }
}

impl<T: FieldCodec> FieldCodec for HashMap<String, T> {
    fn to_value(&self) -> Value {
        Object(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_object()?
            .iter()
            .map(|(k, v)| Ok((k.clone(), T::from_value(v)?)))
            .collect()
    }
}

/// Tuples travel as fixed-length arrays.
macro_rules! tuple_codec {
    ($len:expr, $($idx:tt : $typ:ident),*) => {
        impl<$($typ: FieldCodec),*> FieldCodec for ($($typ,)*) {
            fn to_value(&self) -> Value {
                Array(vec![$(self.$idx.to_value()),*])
            }

            fn from_value(value: &Value) -> Result<Self> {
                let items = value.as_array()?;
                if items.len() != $len {
                    return Err(Error::parse(format!(
                        "expected a tuple of {} elements, found {}",
                        $len,
                        items.len()
                    )));
                }
                Ok(($($typ::from_value(&items[$idx])?,)*))
            }
        }
    };
}

tuple_codec!(1, 0: A);
tuple_codec!(2, 0: A, 1: B);
tuple_codec!(3, 0: A, 1: B, 2: C);
tuple_codec!(4, 0: A, 1: B, 2: C, 3: D);
tuple_codec!(5, 0: A, 1: B, 2: C, 3: D, 4: E);
tuple_codec!(6, 0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
tuple_codec!(7, 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
tuple_codec!(8, 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H);

/// Implements [`FieldCodec`](crate::rep::FieldCodec) for a C-like enum,
/// saving each variant under a name.
///
/// # Example
///
/// ```
/// use cjson::{describe_enum, rep::FieldCodec, Value};
///
/// #[derive(PartialEq, Debug)]
/// enum Mode {
///     Fast,
///     Safe,
/// }
///
/// describe_enum!(Mode { Fast => "fast", Safe => "safe" });
///
/// assert_eq!(Mode::Fast.to_value(), Value::from("fast"));
/// assert_eq!(Mode::from_value(&Value::from("safe")).unwrap(), Mode::Safe);
/// ```
#[macro_export]
macro_rules! describe_enum {
    ($typ:ty { $($variant:ident => $name:expr),+ $(,)? }) => {
        impl $crate::rep::FieldCodec for $typ {
            fn to_value(&self) -> $crate::Value {
                match self {
                    $(<$typ>::$variant => $crate::Value::Str($name.to_string())),+
                }
            }

            fn from_value(value: &$crate::Value) -> $crate::Result<Self> {
                match value.to_str()? {
                    $($name => Ok(<$typ>::$variant),)+
                    other => {
                        Err($crate::Error::Parse(format!(
                            "unknown variant {:?}",
                            other
                        )))
                    }
                }
            }
        }
    };
}

/// Encodes bytes as base64 with the standard alphabet and `=` padding.
///
/// # Example
///
/// ```
/// use cjson::rep::to_base64;
///
/// assert_eq!(to_base64(b"Man"), "TWFu");
/// ```
pub fn to_base64(bytes: &[u8]) -> String { BASE64_STANDARD.encode(bytes) }

/// Decodes a standard-alphabet base64 string.
pub fn from_base64(s: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(s)
        .map_err(|e| Error::parse(format!("invalid base64: {}", e)))
}

enum Direction<'a> {
    Save(&'a mut Map),
    Load(&'a Map),
}

/// The traversal state handed to a [`Describe`] routine. One of two
/// directions is active: saving binds every listed field into an object
/// under its key; loading looks each key up and fills the slot when the key
/// is present.
pub struct Fields<'a>(Direction<'a>);

impl<'a> Fields<'a> {
    /// Reports whether the structure is being saved (loaded if false).
    pub fn saving(&self) -> bool { matches!(self.0, Direction::Save(_)) }

    /// Saves or loads one field.
    ///
    /// Returns `Ok(false)` if the key was absent while loading, in which
    /// case the slot is left unchanged; `Ok(true)` otherwise.
    pub fn field<T: FieldCodec>(&mut self, key: &str, slot: &mut T) -> Result<bool> {
        match &mut self.0 {
            Direction::Save(map) => {
                map.insert(key.to_string(), slot.to_value());
                Ok(true)
            }
            Direction::Load(map) => {
                match map.get(key) {
                    Some(value) => {
                        *slot = T::from_value(value)?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    /// Saves or loads a nested described structure.
    pub fn record<T: Describe>(&mut self, key: &str, slot: &mut T) -> Result<bool> {
        match &mut self.0 {
            Direction::Save(map) => {
                let mut inner = Map::new();
                slot.describe(&mut Fields(Direction::Save(&mut inner)))?;
                map.insert(key.to_string(), Object(inner));
                Ok(true)
            }
            Direction::Load(map) => {
                match map.get(key) {
                    Some(value) => {
                        slot.describe(&mut Fields(Direction::Load(value.as_object()?)))?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    /// Saves or loads a sequence of described structures. Loading replaces
    /// the previous contents; an absent key leaves the sequence empty.
    pub fn records<T: Describe + Default>(&mut self, key: &str, slot: &mut Vec<T>) -> Result<bool> {
        match &mut self.0 {
            Direction::Save(map) => {
                let mut made = Vec::with_capacity(slot.len());
                for item in slot.iter_mut() {
                    let mut inner = Map::new();
                    item.describe(&mut Fields(Direction::Save(&mut inner)))?;
                    made.push(Object(inner));
                }
                map.insert(key.to_string(), Array(made));
                Ok(true)
            }
            Direction::Load(map) => {
                slot.clear();
                match map.get(key) {
                    Some(value) => {
                        for item in value.as_array()? {
                            let mut filled = T::default();
                            filled.describe(&mut Fields(Direction::Load(item.as_object()?)))?;
                            slot.push(filled);
                        }
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    /// Writes the polymorphic discriminator while saving; a no-op while
    /// loading.
    pub fn tag(&mut self, name: &str) -> Result<()> {
        if let Direction::Save(map) = &mut self.0 {
            map.insert(TYPE_KEY.to_string(), Str(name.to_string()));
        }
        Ok(())
    }
}

/// A type that can describe its fields for saving and loading.
pub trait Describe {
    /// Lists every serialised field, in a fixed order, against the given
    /// traversal.
    fn describe(&mut self, fields: &mut Fields<'_>) -> Result<()>;
}

/// Runs the description routine in the saving direction, producing an
/// object.
pub fn save<T: Describe>(value: &mut T) -> Result<Value> {
    let mut map = Map::new();
    value.describe(&mut Fields(Direction::Save(&mut map)))?;
    Ok(Object(map))
}

/// Runs the description routine in the loading direction against an
/// existing structure.
pub fn load_into<T: Describe>(value: &mut T, source: &Value) -> Result<()> {
    value.describe(&mut Fields(Direction::Load(source.as_object()?)))
}

/// Builds a default structure and loads it from the source object.
pub fn load<T: Describe + Default>(source: &Value) -> Result<T> {
    let mut made = T::default();
    load_into(&mut made, source)?;
    Ok(made)
}

/// An explicit registry of variant constructors for loading polymorphic
/// values by their discriminator.
///
/// # Example
///
/// ```
/// use cjson::prelude::*;
///
/// #[derive(Default)]
/// struct Shape {
///     sides: u32,
/// }
///
/// impl Describe for Shape {
///     fn describe(&mut self, fields: &mut Fields<'_>) -> Result<()> {
///         fields.tag("polygon")?;
///         fields.field("sides", &mut self.sides)?;
///         Ok(())
///     }
/// }
///
/// let mut factory = Factory::new();
/// factory.register("polygon", Shape::default);
///
/// let mut square = Shape { sides: 4 };
/// let value = save(&mut square).unwrap();
/// let restored = factory.load(&value).unwrap();
/// assert_eq!(restored.sides, 4);
/// ```
pub struct Factory<T> {
    constructors: HashMap<String, fn() -> T>,
}

impl<T: Describe> Factory<T> {
    /// Creates an empty registry.
    pub fn new() -> Factory<T> {
        Factory {
            constructors: HashMap::new(),
        }
    }

    /// Registers a constructor under a discriminator name.
    pub fn register(&mut self, name: impl Into<String>, constructor: fn() -> T) {
        self.constructors.insert(name.into(), constructor);
    }

    /// Reads the discriminator member of the source object and loads the
    /// matching variant. Fails with [`Error::MissingKey`] when the
    /// discriminator is absent.
    pub fn load(&self, source: &Value) -> Result<T> {
        let name = source.at(TYPE_KEY)?.to_str()?;
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| Error::parse(format!("no constructor registered for {:?}", name)))?;
        let mut made = constructor();
        load_into(&mut made, source)?;
        Ok(made)
    }
}

impl<T: Describe> Default for Factory<T> {
    fn default() -> Self { Self::new() }
}
