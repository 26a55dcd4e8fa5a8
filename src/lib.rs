//! In-memory JSON values with two interchangeable codecs: a human-readable
//! textual form and a condensed, self-describing binary form that deduplicates
//! repeated object layouts.

/// Condensed binary encoder and decoder.
pub mod encoding;
/// Error taxonomy.
pub mod errors;
/// Filesystem convenience wrappers.
pub mod io;
/// Prelude
pub mod prelude;
/// Types describable as `Value`.
pub mod rep;
/// Textual JSON encoder and parser.
pub mod text;
/// Helper macros.
pub mod util;

pub use errors::{Error, Result};
pub use hashbrown::HashMap;

/// The object payload: a mapping from string keys to values. Insertion order
/// is not preserved.
pub type Map = HashMap<String, Value>;

/// The six JSON kinds, as reported by [`Value::kind`] and carried by
/// [`Error::WrongKind`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Debug)]
pub enum Kind {
    /// Null type.
    Null,
    /// Boolean type.
    Bool,
    /// Number type, an IEEE-754 double.
    Number,
    /// String type.
    String,
    /// Array type.
    Array,
    /// Object type.
    Object,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        };
        f.write_str(name)
    }
}

#[derive(PartialEq, Clone, Debug, Default)]
/// JSON value types.
pub enum Value {
    /// Null type. Equivalent to `None`.
    #[default]
    Null,
    /// Boolean type.
    Bool(bool),
    /// Number type. NaN is not representable; constructing a `Value` from a
    /// NaN yields `Null` instead.
    Num(f64),
    /// String type.
    Str(String),
    /// Array type.
    Array(Vec<Value>),
    /// Object type.
    Object(Map),
}

use Value::*;

impl Value {
    /// Creates an empty array value.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// let mut arr = Value::new_array();
    /// arr.push(1).unwrap();
    /// ```
    pub fn new_array() -> Value { Array(Vec::new()) }

    /// Creates an empty object value.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// let mut obj = Value::new_object();
    /// obj.insert("answer", 42).unwrap();
    /// ```
    pub fn new_object() -> Value { Object(Map::new()) }

    /// Reports which of the six kinds this value holds.
    pub fn kind(&self) -> Kind {
        match self {
            Null => Kind::Null,
            Bool(_) => Kind::Bool,
            Num(_) => Kind::Number,
            Str(_) => Kind::String,
            Array(_) => Kind::Array,
            Object(_) => Kind::Object,
        }
    }

    /// Indicates whether a value is `Null`.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// ```
    pub fn is_null(&self) -> bool { matches!(self, Null) }

    /// Tries to read the value as a `bool`.
    /// Fails with [`Error::WrongKind`] if the value is not a boolean.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// let b = Value::from(true);
    /// assert!(b.to_bool().unwrap());
    /// ```
    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Bool(b) => Ok(*b),
            v => Err(Error::wrong_kind(Kind::Bool, v.kind())),
        }
    }

    /// Tries to read the value as an `f64`.
    /// Fails with [`Error::WrongKind`] if the value is not a number.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// let n = Value::from(5);
    /// assert_eq!(n.to_f64().unwrap(), 5.0);
    /// ```
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Num(n) => Ok(*n),
            v => Err(Error::wrong_kind(Kind::Number, v.kind())),
        }
    }

    /// Tries to read the value as a string slice.
    /// Fails with [`Error::WrongKind`] if the value is not a string.
    pub fn to_str(&self) -> Result<&str> {
        match self {
            Str(s) => Ok(s),
            v => Err(Error::wrong_kind(Kind::String, v.kind())),
        }
    }

    /// Consumes the value, converting it into a `String`.
    pub fn into_string(self) -> Result<String> {
        match self {
            Str(s) => Ok(s),
            v => Err(Error::wrong_kind(Kind::String, v.kind())),
        }
    }

    /// Borrows the array elements.
    /// Fails with [`Error::WrongKind`] if the value is not an array.
    pub fn as_array(&self) -> Result<&Vec<Value>> {
        match self {
            Array(a) => Ok(a),
            v => Err(Error::wrong_kind(Kind::Array, v.kind())),
        }
    }

    /// Mutably borrows the array elements.
    pub fn as_array_mut(&mut self) -> Result<&mut Vec<Value>> {
        match self {
            Array(a) => Ok(a),
            v => Err(Error::wrong_kind(Kind::Array, v.kind())),
        }
    }

    /// Consumes the value, converting it into a vector of values.
    pub fn into_vec(self) -> Result<Vec<Value>> {
        match self {
            Array(a) => Ok(a),
            v => Err(Error::wrong_kind(Kind::Array, v.kind())),
        }
    }

    /// Borrows the object entries.
    /// Fails with [`Error::WrongKind`] if the value is not an object.
    pub fn as_object(&self) -> Result<&Map> {
        match self {
            Object(m) => Ok(m),
            v => Err(Error::wrong_kind(Kind::Object, v.kind())),
        }
    }

    /// Mutably borrows the object entries.
    pub fn as_object_mut(&mut self) -> Result<&mut Map> {
        match self {
            Object(m) => Ok(m),
            v => Err(Error::wrong_kind(Kind::Object, v.kind())),
        }
    }

    /// Consumes the value, converting it into its object map.
    pub fn into_map(self) -> Result<Map> {
        match self {
            Object(m) => Ok(m),
            v => Err(Error::wrong_kind(Kind::Object, v.kind())),
        }
    }

    /// The number of elements of an array or entries of an object.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// let arr = Value::from(vec![1, 2, 3]);
    /// assert_eq!(arr.len().unwrap(), 3);
    /// ```
    pub fn len(&self) -> Result<usize> {
        match self {
            Array(a) => Ok(a.len()),
            Object(m) => Ok(m.len()),
            v => Err(Error::wrong_kind(Kind::Array, v.kind())),
        }
    }

    /// Indicates whether an array or object is empty.
    pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }

    /// Indexed access into an array. Fails with [`Error::WrongKind`] on
    /// non-arrays and [`Error::MissingKey`] when the index is out of range.
    pub fn get(&self, index: usize) -> Result<&Value> {
        self.as_array()?
            .get(index)
            .ok_or_else(|| Error::MissingKey(index.to_string()))
    }

    /// Mutable indexed access into an array.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Value> {
        self.as_array_mut()?
            .get_mut(index)
            .ok_or_else(|| Error::MissingKey(index.to_string()))
    }

    /// Keyed access into an object. Fails with [`Error::WrongKind`] on
    /// non-objects and [`Error::MissingKey`] when the key is absent.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// let mut obj = Value::new_object();
    /// obj.insert("a", 1).unwrap();
    ///
    /// assert_eq!(obj.at("a").unwrap().to_f64().unwrap(), 1.0);
    /// assert!(obj.at("b").is_err());
    /// ```
    pub fn at(&self, key: &str) -> Result<&Value> {
        self.as_object()?
            .get(key)
            .ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    /// Mutable keyed access into an object.
    pub fn at_mut(&mut self, key: &str) -> Result<&mut Value> {
        self.as_object_mut()?
            .get_mut(key)
            .ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    /// Appends a value to an array.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        self.as_array_mut()?.push(value.into());
        Ok(())
    }

    /// Binds a value under a key in an object, returning the previous value
    /// bound under that key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        Ok(self.as_object_mut()?.insert(key.into(), value.into()))
    }

    /// Consumes the value, loading a described structure out of it.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::prelude::*;
    ///
    /// #[derive(Default)]
    /// struct Point {
    ///     x: f64,
    ///     y: f64,
    /// }
    ///
    /// impl Describe for Point {
    ///     fn describe(&mut self, fields: &mut Fields<'_>) -> Result<()> {
    ///         fields.field("x", &mut self.x)?;
    ///         fields.field("y", &mut self.y)?;
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let source = from_text("{\"x\": 1.0, \"y\": 2.0}").unwrap();
    /// let point: Point = source.into_described().unwrap();
    /// assert_eq!(point.y, 2.0);
    /// ```
    pub fn into_described<T: rep::Describe + Default>(self) -> Result<T> { rep::load(&self) }

    /// Takes the value out, leaving `Null` behind.
    ///
    /// # Example
    ///
    /// ```
    /// use cjson::Value;
    ///
    /// let mut v = Value::from("moved");
    /// let taken = v.take();
    /// assert!(v.is_null());
    /// assert_eq!(taken.to_str().unwrap(), "moved");
    /// ```
    pub fn take(&mut self) -> Value { std::mem::take(self) }
}

/// Printing a value produces its textual encoding.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&text::to_text(self))
    }
}

/// Parsing accepts anything the textual decoder does.
///
/// # Example
///
/// ```
/// use cjson::Value;
///
/// let v: Value = "[1, 2, 3]".parse().unwrap();
/// assert_eq!(v.len().unwrap(), 3);
/// ```
impl std::str::FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Value> { text::from_text(s) }
}

impl From<()> for Value {
    fn from(_: ()) -> Value { Null }
}

impl From<f64> for Value {
    /// NaN is not a JSON number; storing one yields `Null`.
    fn from(f: f64) -> Value {
        if f.is_nan() {
            Null
        } else {
            Num(f)
        }
    }
}

from_fn!(Value, bool, Bool);
from_fn!(Value, String, Str);

impl From<&str> for Value {
    fn from(s: &str) -> Value { Str(s.to_string()) }
}

from_prims!(Value);

macro_rules! try_from_ctor {
    ($from:ty, $to:ty, $ctor:tt) => {
        impl TryFrom<$from> for $to {
            type Error = $from;

            fn try_from(from: $from) -> std::result::Result<$to, $from> {
                match from {
                    $ctor(a) => Ok(a),
                    f => Err(f),
                }
            }
        }
    };
}

try_from_ctor!(Value, bool, Bool);
try_from_ctor!(Value, f64, Num);
try_from_ctor!(Value, String, Str);
try_from_ctor!(Value, Vec<Value>, Array);
try_from_ctor!(Value, Map, Object);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Value { Array(v.into_iter().map(T::into).collect()) }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(m: HashMap<String, T>) -> Value {
        Object(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
