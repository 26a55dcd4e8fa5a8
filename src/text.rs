//! # Textual JSON encoder and parser
//!
//! The writer produces tab-indented UTF-8 text; the parser is a recursive
//! descent over a byte cursor. The dialect is deliberately permissive on
//! input: commas are treated as whitespace everywhere, so they may separate
//! object members and array elements or be omitted entirely.
//!
//! # Example
//!
//! ```
//! use cjson::prelude::*;
//!
//! let parsed = from_text("{\"a\": [1, 2], \"b\": true}").unwrap();
//! assert_eq!(parsed.at("a").unwrap().len().unwrap(), 2);
//!
//! let reprinted = to_text(&parsed);
//! assert_eq!(from_text(&reprinted).unwrap(), parsed);
//! ```

use crate::{
    errors::{Error, Result},
    Value::{self, *},
};

/// Encodes a value as tab-indented JSON text.
///
/// Object member order is unspecified and need not be stable across runs.
///
/// # Example
///
/// ```
/// use cjson::{text::to_text, Value};
///
/// assert_eq!(to_text(&Value::Null), "null");
/// assert_eq!(to_text(&Value::from(1)), "1.0");
/// ```
pub fn to_text(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out, 0);
    out
}

/// Writes the textual encoding of a value into an [`std::io::Write`].
pub fn write_text<W: std::io::Write>(value: &Value, writer: &mut W) -> Result<()> {
    writer.write_all(to_text(value).as_bytes())?;
    Ok(())
}

fn write_value(value: &Value, out: &mut String, depth: usize) {
    match value {
        Null => out.push_str("null"),
        Bool(true) => out.push_str("true"),
        Bool(false) => out.push_str("false"),
        Num(n) => write_number(*n, out),
        Str(s) => write_string(s, out),
        Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                indent(out, depth + 1);
                write_value(item, out, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push(']');
        }
        Object(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                indent(out, depth + 1);
                write_string(key, out);
                out.push_str(": ");
                write_value(item, out, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push('}');
        }
    }
}

// Display for f64 is the shortest representation that parses back exactly; it
// drops the decimal point on integral values, which the grammar wants back.
fn write_number(n: f64, out: &mut String) {
    let printed = n.to_string();
    let integral = n.is_finite() && !printed.contains('.');
    out.push_str(&printed);
    if integral {
        out.push_str(".0");
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Parses JSON text into a [`Value`].
///
/// Empty or whitespace-only input yields `Null`; content after the top-level
/// value is ignored.
///
/// # Example
///
/// ```
/// use cjson::text::from_text;
///
/// let v = from_text("[true, false, null]").unwrap();
/// assert_eq!(v.len().unwrap(), 3);
/// ```
pub fn from_text(source: &str) -> Result<Value> { from_slice(source.as_bytes()) }

/// Parses JSON text from a reader, consuming it to the end.
pub fn from_reader<R: std::io::Read>(mut reader: R) -> Result<Value> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    from_slice(&data)
}

/// Parses JSON text from raw bytes. The bytes must be valid UTF-8 wherever
/// string content is read.
pub fn from_slice(source: &[u8]) -> Result<Value> {
    let mut parser = Parser { data: source, pos: 0 };
    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Ok(Null);
    }
    parser.parse_value()
}

struct Parser<'a> {
    data: &'a [u8],
    pos:  usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> { self.data.get(self.pos).copied() }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    // Commas count as whitespace, which is what makes them optional
    // separators everywhere.
    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b',') = self.peek() {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        let letter = self.next().ok_or(Error::UnexpectedEnd)?;
        match letter {
            b'"' => Ok(Str(self.read_string()?)),
            b't' => self.read_keyword("true", b"rue", Bool(true)),
            b'f' => self.read_keyword("false", b"alse", Bool(false)),
            b'n' => self.read_keyword("null", b"ull", Null),
            b'-' | b'0'..=b'9' => self.read_number(letter),
            b'{' => self.read_object(),
            b'[' => self.read_array(),
            other => {
                Err(Error::parse(format!(
                    "unexpected character {:?}",
                    other as char
                )))
            }
        }
    }

    fn read_keyword(&mut self, name: &str, rest: &[u8], result: Value) -> Result<Value> {
        for &expected in rest {
            match self.next() {
                Some(b) if b == expected => {}
                Some(_) => {
                    return Err(Error::parse(format!("misspelled keyword '{}'", name)));
                }
                None => return Err(Error::UnexpectedEnd),
            }
        }
        Ok(result)
    }

    fn read_string(&mut self) -> Result<String> {
        let mut collected = Vec::new();
        loop {
            match self.next().ok_or(Error::UnexpectedEnd)? {
                b'"' => break,
                b'\\' => {
                    // The recognised escapes; any other escaped byte is taken
                    // literally.
                    match self.next().ok_or(Error::UnexpectedEnd)? {
                        b'n' => collected.push(b'\n'),
                        other => collected.push(other),
                    }
                }
                other => collected.push(other),
            }
        }
        String::from_utf8(collected).map_err(|_| Error::parse("string is not valid utf-8"))
    }

    fn read_number(&mut self, first: u8) -> Result<Value> {
        let mut token = vec![first];
        while let Some(b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') = self.peek() {
            token.push(self.next().ok_or(Error::UnexpectedEnd)?);
        }
        // The token is ASCII by construction.
        let token = String::from_utf8(token).map_err(|_| Error::parse("malformed number"))?;
        let number: f64 = token
            .parse()
            .map_err(|_| Error::parse(format!("malformed number {:?}", token)))?;
        Ok(Num(number))
    }

    fn read_object(&mut self) -> Result<Value> {
        let mut made = Value::new_object();
        loop {
            self.skip_whitespace();
            match self.next().ok_or(Error::UnexpectedEnd)? {
                b'}' => return Ok(made),
                b'"' => {
                    let name = self.read_string()?;
                    self.skip_whitespace();
                    match self.next() {
                        Some(b':') => {}
                        Some(_) => return Err(Error::parse("expected an additional ':' somewhere")),
                        None => return Err(Error::UnexpectedEnd),
                    }
                    let value = self.parse_value()?;
                    made.insert(name, value)?;
                }
                other => {
                    return Err(Error::parse(format!(
                        "unexpected character {:?} in object",
                        other as char
                    )));
                }
            }
        }
    }

    fn read_array(&mut self) -> Result<Value> {
        let mut made = Value::new_array();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(made);
                }
                Some(_) => {
                    let value = self.parse_value()?;
                    made.push(value)?;
                }
                None => return Err(Error::UnexpectedEnd),
            }
        }
    }
}
