//! The body of a message: `data`, `amqp-sequence`, or `amqp-value`
//! (descriptors ULONG 0x75/0x76/0x77, spec section 6.1).

use crate::primitives::Binary;
use crate::value::Value;

/// A message body section.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// An opaque binary payload (descriptor 0x75).
    Data(Binary),
    /// A list of AMQP values carried as a single section (descriptor 0x76).
    Sequence(Vec<Value>),
    /// A single typed AMQP value (descriptor 0x77).
    Value(Value),
}

impl Body {
    /// Wraps a raw byte payload, honoring `inferred` the way spec section
    /// 6.1 describes: `true` serializes as a `data` section, `false` as an
    /// `amqp-value` section wrapping a `BINARY`.
    pub fn from_bytes(bytes: impl Into<Binary>, inferred: bool) -> Self {
        let bytes = bytes.into();
        if inferred {
            Body::Data(bytes)
        } else {
            Body::Value(Value::Binary(bytes))
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Value(value)
    }
}

impl From<Vec<Value>> for Body {
    fn from(values: Vec<Value>) -> Self {
        Body::Sequence(values)
    }
}
