//! The single error type returned by every fallible operation in this crate.

use crate::value::Tag;

/// Errors produced by the value tree, the binary codec, and the message
/// container.
///
/// This mirrors the taxonomy in the specification's error handling design:
/// [`Error::Overflow`] and [`Error::Underflow`] are not logical errors (the
/// caller is expected to retry with a bigger buffer / more bytes), while the
/// others indicate the input or the requested conversion is simply invalid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The output buffer was too small to hold the encoded value. The
    /// caller should grow the buffer and retry; no partial write is
    /// observable.
    #[error("buffer too small to encode value")]
    Overflow,

    /// The input did not contain a complete value. `consumed` is always 0
    /// for this variant, and no tree state is mutated.
    #[error("input does not contain a complete value")]
    Underflow,

    /// The input bytes violate the wire grammar: a bad constructor, a size
    /// prefix that runs past the top-level boundary, invalid UTF-8 in a
    /// STRING, a non-ASCII SYMBOL, and so on.
    #[error("malformed AMQP wire data: {0}")]
    Malformed(String),

    /// A value in the tree violates an encoding invariant (array element
    /// tag mismatch, odd-length map, non-UTF8 string payload, non-ASCII
    /// symbol payload) and cannot be serialized.
    #[error("cannot encode value: {0}")]
    Encoding(String),

    /// A host value could not be mapped to any AMQP type, or an argument to
    /// an API call was otherwise invalid (e.g. wrong tag passed to a
    /// cursor `get_*`/`put_*` call).
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The AMQP decimal32/64/128 types appeared on the wire. They are not
    /// supported by this crate.
    #[error("unsupported AMQP type: {0}")]
    Unsupported(String),

    /// An AMQP [`Value`](crate::value::Value) could not be converted into the requested host type.
    #[error("cannot unmarshal {amqp_tag:?} into {host_type}: {message}")]
    Unmarshal {
        /// The AMQP tag that was actually found.
        amqp_tag: Tag,
        /// The host type the caller asked for.
        host_type: &'static str,
        /// Human readable detail.
        message: String,
    },

    /// Wraps an underlying I/O error when decoding from a `std::io::Read`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Error::Encoding(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::Malformed(msg.into())
    }

    pub(crate) fn unmarshal(amqp_tag: Tag, host_type: &'static str, msg: impl Into<String>) -> Self {
        Error::Unmarshal {
            amqp_tag,
            host_type,
            message: msg.into(),
        }
    }
}
