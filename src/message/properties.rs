//! Immutable application properties of a message (descriptor ULONG 0x73).

use crate::error::Error;
use crate::primitives::{Binary, Symbol, Timestamp};
use crate::value::Value;

use super::field_list::{field_at, trim_trailing_nulls};
use super::id::MessageId;

/// The 13 wire fields of the AMQP `properties` section, plus `inferred`
/// (spec section 3.5), which is host-side only: it picks how
/// [`super::Body`] serializes a raw binary body and is never itself written
/// to the wire (there is no such field in AMQP 1.0's `properties` list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    /// Application-supplied message identifier.
    pub message_id: Option<MessageId>,
    /// Identity of the user responsible for producing the message.
    pub user_id: Option<Binary>,
    /// Address of the node the message is destined for.
    pub address: Option<String>,
    /// Application-specific message subject.
    pub subject: Option<String>,
    /// Address for replies.
    pub reply_to: Option<String>,
    /// Identifies the message to which this one is a reply.
    pub correlation_id: Option<MessageId>,
    /// MIME content type of the body.
    pub content_type: Option<Symbol>,
    /// MIME content encoding of the body.
    pub content_encoding: Option<Symbol>,
    /// Absolute time past which the message is considered expired.
    pub absolute_expiry_time: Option<Timestamp>,
    /// Absolute time the message was created.
    pub creation_time: Option<Timestamp>,
    /// Identifies the group the message belongs to.
    pub group_id: Option<String>,
    /// Position of this message within its group.
    pub group_sequence: Option<i32>,
    /// Group to which replies to this message should belong.
    pub reply_to_group_id: Option<String>,
    /// Whether a raw binary body should serialize as `data` (`true`) or as
    /// `amqp-value` (`false`). Host-side only, see struct docs.
    pub inferred: bool,
}

impl Properties {
    pub(super) fn to_fields(&self) -> Vec<Value> {
        trim_trailing_nulls(vec![
            opt_to_value(self.message_id.clone().map(Value::from)),
            opt_to_value(self.user_id.clone().map(Value::Binary)),
            opt_to_value(self.address.clone().map(Value::String)),
            opt_to_value(self.subject.clone().map(Value::String)),
            opt_to_value(self.reply_to.clone().map(Value::String)),
            opt_to_value(self.correlation_id.clone().map(Value::from)),
            opt_to_value(self.content_type.clone().map(Value::Symbol)),
            opt_to_value(self.content_encoding.clone().map(Value::Symbol)),
            opt_to_value(self.absolute_expiry_time.map(Value::Timestamp)),
            opt_to_value(self.creation_time.map(Value::Timestamp)),
            opt_to_value(self.group_id.clone().map(Value::String)),
            opt_to_value(self.group_sequence.map(Value::Int)),
            opt_to_value(self.reply_to_group_id.clone().map(Value::String)),
        ])
    }

    pub(super) fn from_fields(fields: &[Value]) -> Result<Self, Error> {
        Ok(Self {
            message_id: optional(field_at(fields, 0))?,
            user_id: optional_binary(field_at(fields, 1))?,
            address: optional_string(field_at(fields, 2))?,
            subject: optional_string(field_at(fields, 3))?,
            reply_to: optional_string(field_at(fields, 4))?,
            correlation_id: optional(field_at(fields, 5))?,
            content_type: optional_symbol(field_at(fields, 6))?,
            content_encoding: optional_symbol(field_at(fields, 7))?,
            absolute_expiry_time: optional_timestamp(field_at(fields, 8))?,
            creation_time: optional_timestamp(field_at(fields, 9))?,
            group_id: optional_string(field_at(fields, 10))?,
            group_sequence: optional_int(field_at(fields, 11))?,
            reply_to_group_id: optional_string(field_at(fields, 12))?,
            inferred: false,
        })
    }
}

fn opt_to_value(v: Option<Value>) -> Value {
    v.unwrap_or(Value::Null)
}

fn optional<T>(value: Value) -> Result<Option<T>, Error>
where
    T: TryFrom<Value, Error = Error>,
{
    match value {
        Value::Null => Ok(None),
        other => Ok(Some(T::try_from(other)?)),
    }
}

fn optional_string(value: Value) -> Result<Option<String>, Error> {
    optional(value)
}

fn optional_symbol(value: Value) -> Result<Option<Symbol>, Error> {
    optional(value)
}

fn optional_timestamp(value: Value) -> Result<Option<Timestamp>, Error> {
    optional(value)
}

fn optional_binary(value: Value) -> Result<Option<Binary>, Error> {
    optional(value)
}

fn optional_int(value: Value) -> Result<Option<i32>, Error> {
    optional(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_nulls() {
        let mut props = Properties::default();
        props.address = Some("queue-a".into());
        assert_eq!(props.to_fields().len(), 3);
    }

    #[test]
    fn roundtrips_through_fields() {
        let mut props = Properties::default();
        props.message_id = Some(MessageId::ULong(7));
        props.group_sequence = Some(-1);
        let fields = props.to_fields();
        let back = Properties::from_fields(&fields).unwrap();
        assert_eq!(back.message_id, Some(MessageId::ULong(7)));
        assert_eq!(back.group_sequence, Some(-1));
    }
}
