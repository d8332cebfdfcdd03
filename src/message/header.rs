//! Transport header for a message (descriptor ULONG 0x70).

use crate::error::Error;
use crate::value::Value;

use super::field_list::{field_at, trim_trailing_nulls};

const DEFAULT_PRIORITY: u8 = 4;

/// Transport headers for a message (spec section 3.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Whether the message is durable. Default `false`.
    pub durable: bool,
    /// Relative priority of the message. Default `4`.
    pub priority: u8,
    /// Time-to-live, in milliseconds. Absent means "no expiry".
    pub ttl: Option<u32>,
    /// Whether this is the first acquisition of the message by any link.
    /// Default `false`.
    pub first_acquirer: bool,
    /// Number of prior unsuccessful delivery attempts. Default `0`.
    pub delivery_count: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            durable: false,
            priority: DEFAULT_PRIORITY,
            ttl: None,
            first_acquirer: false,
            delivery_count: 0,
        }
    }
}

impl Header {
    /// Creates a builder for [`Header`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(super) fn to_fields(&self) -> Vec<Value> {
        trim_trailing_nulls(vec![
            Value::Bool(self.durable),
            Value::UByte(self.priority),
            self.ttl.map(Value::UInt).unwrap_or(Value::Null),
            Value::Bool(self.first_acquirer),
            Value::UInt(self.delivery_count),
        ])
    }

    pub(super) fn from_fields(fields: &[Value]) -> Result<Self, Error> {
        Ok(Self {
            durable: optional_bool(field_at(fields, 0))?.unwrap_or(false),
            priority: optional_ubyte(field_at(fields, 1))?.unwrap_or(DEFAULT_PRIORITY),
            ttl: optional_uint(field_at(fields, 2))?,
            first_acquirer: optional_bool(field_at(fields, 3))?.unwrap_or(false),
            delivery_count: optional_uint(field_at(fields, 4))?.unwrap_or(0),
        })
    }
}

fn optional_bool(value: Value) -> Result<Option<bool>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(v) => Ok(Some(v)),
        other => Err(Error::unmarshal(other.tag(), "bool", "header field")),
    }
}

fn optional_ubyte(value: Value) -> Result<Option<u8>, Error> {
    match value {
        Value::Null => Ok(None),
        other => Ok(Some(u8::try_from(other)?)),
    }
}

fn optional_uint(value: Value) -> Result<Option<u32>, Error> {
    match value {
        Value::Null => Ok(None),
        other => Ok(Some(u32::try_from(other)?)),
    }
}

/// Builder for [`Header`].
#[derive(Debug, Default, Clone)]
pub struct Builder {
    inner: Header,
}

impl Builder {
    /// Sets `durable`.
    pub fn durable(mut self, value: bool) -> Self {
        self.inner.durable = value;
        self
    }

    /// Sets `priority`.
    pub fn priority(mut self, value: u8) -> Self {
        self.inner.priority = value;
        self
    }

    /// Sets `ttl`.
    pub fn ttl(mut self, value: impl Into<Option<u32>>) -> Self {
        self.inner.ttl = value.into();
        self
    }

    /// Sets `first_acquirer`.
    pub fn first_acquirer(mut self, value: bool) -> Self {
        self.inner.first_acquirer = value;
        self
    }

    /// Sets `delivery_count`.
    pub fn delivery_count(mut self, value: u32) -> Self {
        self.inner.delivery_count = value;
        self
    }

    /// Builds the [`Header`].
    pub fn build(self) -> Header {
        self.inner
    }
}

impl From<Builder> for Header {
    fn from(builder: Builder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_priority_is_four() {
        assert_eq!(Header::default().priority, 4);
    }

    #[test]
    fn trims_trailing_defaults_but_keeps_interior_fields() {
        let header = Header::builder().durable(true).build();
        let fields = header.to_fields();
        assert_eq!(fields, vec![Value::Bool(true)]);
    }

    #[test]
    fn decoding_short_list_fills_defaults() {
        let header = Header::from_fields(&[Value::Bool(true)]).unwrap();
        assert_eq!(header.priority, 4);
        assert!(!header.first_acquirer);
    }
}
