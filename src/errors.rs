use crate::Kind;
use thiserror::Error;

/// Everything that can go wrong while inspecting or transcoding a
/// [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Structurally malformed textual input.
    #[error("parse error: {0}")]
    Parse(String),

    /// The input ended in the middle of a token or payload.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A typed accessor or container operation was used on a value of another
    /// kind.
    #[error("expected {expected}, found {found}")]
    WrongKind {
        /// The kind the accessor requires.
        expected: Kind,
        /// The kind the value actually holds.
        found: Kind,
    },

    /// Keyed access to an object that does not contain the key.
    #[error("missing key: {0:?}")]
    MissingKey(String),

    /// The decoder met a reserved tag byte.
    #[error("condensed data version is too low")]
    UnsupportedVersion,

    /// A grammatically impossible byte sequence.
    #[error("corrupt condensed data: {0}")]
    Corrupt(String),

    /// A filesystem wrapper failed.
    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    pub(crate) fn parse(msg: impl Into<String>) -> Self { Error::Parse(msg.into()) }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self { Error::Corrupt(msg.into()) }

    pub(crate) fn wrong_kind(expected: Kind, found: Kind) -> Self {
        Error::WrongKind { expected, found }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::Io(e.to_string()) }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            Error::parse("misspelled keyword 'true'").to_string(),
            "parse error: misspelled keyword 'true'"
        );
        assert_eq!(Error::UnexpectedEnd.to_string(), "unexpected end of input");
        assert_eq!(
            Error::wrong_kind(Kind::Object, Kind::Array).to_string(),
            "expected object, found array"
        );
        assert_eq!(
            Error::MissingKey("lost".to_string()).to_string(),
            "missing key: \"lost\""
        );
        assert_eq!(
            Error::UnsupportedVersion.to_string(),
            "condensed data version is too low"
        );
    }

    #[test]
    fn io_failures_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(Error::from(io), Error::Io(_)));
    }
}
