//! The two restricted scalar unions the message API exposes in place of a
//! bare [`crate::value::Value`] (spec section 3.4).

use crate::error::Error;
use crate::primitives::{Binary, Symbol, Uuid};
use crate::value::Value;

/// The type of `Properties::message_id`/`Properties::correlation_id`.
/// AMQP 1.0 permits exactly these four underlying types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// encoding code = 0x80/0x44/0x53.
    ULong(u64),
    /// encoding code = 0x98.
    Uuid(Uuid),
    /// encoding codes = 0xa0/0xb0.
    Binary(Binary),
    /// encoding codes = 0xa1/0xb1.
    String(String),
}

impl From<MessageId> for Value {
    fn from(id: MessageId) -> Self {
        match id {
            MessageId::ULong(v) => Value::ULong(v),
            MessageId::Uuid(v) => Value::Uuid(v),
            MessageId::Binary(v) => Value::Binary(v),
            MessageId::String(v) => Value::String(v),
        }
    }
}

impl TryFrom<Value> for MessageId {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::ULong(v) => Ok(MessageId::ULong(v)),
            Value::Uuid(v) => Ok(MessageId::Uuid(v)),
            Value::Binary(v) => Ok(MessageId::Binary(v)),
            Value::String(v) => Ok(MessageId::String(v)),
            other => Err(Error::unmarshal(other.tag(), "MessageId", "must be ulong, uuid, binary, or string")),
        }
    }
}

impl From<u64> for MessageId {
    fn from(v: u64) -> Self {
        MessageId::ULong(v)
    }
}

impl From<Uuid> for MessageId {
    fn from(v: Uuid) -> Self {
        MessageId::Uuid(v)
    }
}

impl From<Binary> for MessageId {
    fn from(v: Binary) -> Self {
        MessageId::Binary(v)
    }
}

impl From<String> for MessageId {
    fn from(v: String) -> Self {
        MessageId::String(v)
    }
}

/// The key type of `message-annotations`/`delivery-annotations`/`footer`
/// maps. A raw text key is interpreted as [`AnnotationKey::Symbol`] (spec
/// section 3.4).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationKey {
    /// encoding code = 0x80/0x44/0x53.
    ULong(u64),
    /// encoding codes = 0xa3/0xb3.
    Symbol(Symbol),
}

impl From<AnnotationKey> for Value {
    fn from(key: AnnotationKey) -> Self {
        match key {
            AnnotationKey::ULong(v) => Value::ULong(v),
            AnnotationKey::Symbol(v) => Value::Symbol(v),
        }
    }
}

impl TryFrom<Value> for AnnotationKey {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::ULong(v) => Ok(AnnotationKey::ULong(v)),
            Value::Symbol(v) => Ok(AnnotationKey::Symbol(v)),
            other => Err(Error::unmarshal(other.tag(), "AnnotationKey", "must be ulong or symbol")),
        }
    }
}

impl From<u64> for AnnotationKey {
    fn from(v: u64) -> Self {
        AnnotationKey::ULong(v)
    }
}

impl From<Symbol> for AnnotationKey {
    fn from(v: Symbol) -> Self {
        AnnotationKey::Symbol(v)
    }
}

impl From<&str> for AnnotationKey {
    fn from(v: &str) -> Self {
        AnnotationKey::Symbol(Symbol::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_key_is_interpreted_as_symbol() {
        let key: AnnotationKey = "x-opt-foo".into();
        assert_eq!(key, AnnotationKey::Symbol(Symbol::new("x-opt-foo")));
    }
}
