//! The AMQP 1.0 message container: a fixed `Header`, `Properties`, three
//! lazily-cached annotation/property maps, a `Body`, and a `Footer` map
//! (spec sections 3.5 and 4.5).

mod body;
mod field_list;
mod header;
mod id;
mod properties;
mod section;

pub use body::Body;
pub use header::Header;
pub use id::{AnnotationKey, MessageId};
pub use properties::Properties;

use crate::codec;
use crate::described::Described;
use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::primitives::{Binary, OrderedMap};
use crate::value::Value;

use section::LazySection;

const HEADER_CODE: u64 = 0x70;
const DELIVERY_ANNOTATIONS_CODE: u64 = 0x71;
const MESSAGE_ANNOTATIONS_CODE: u64 = 0x72;
const PROPERTIES_CODE: u64 = 0x73;
const APPLICATION_PROPERTIES_CODE: u64 = 0x74;
const DATA_CODE: u64 = 0x75;
const SEQUENCE_CODE: u64 = 0x76;
const AMQP_VALUE_CODE: u64 = 0x77;
const FOOTER_CODE: u64 = 0x78;

/// An AMQP 1.0 message.
///
/// `application-properties`, `message-annotations`, `delivery-annotations`,
/// and `footer` each have a dual representation — see
/// [`Message::application_properties`]/[`Message::annotations`]/
/// [`Message::instructions`]/[`Message::footer`] — with the authority
/// invariant from spec section 4.5: at any moment exactly one of {host map,
/// wire subtree} holds the data for each of those four sections.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Transport header fields.
    pub header: Header,
    /// Message properties.
    pub properties: Properties,
    /// The message body, if any.
    pub body: Option<Body>,
    application_properties: LazySection<String>,
    message_annotations: LazySection<AnnotationKey>,
    delivery_annotations: LazySection<AnnotationKey>,
    footer: LazySection<AnnotationKey>,
}

impl Message {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipes all state back to an empty message.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The `application-properties` map (keys restricted to `STRING`,
    /// spec section 3.4). Decodes the wire subtree into the host map on
    /// first access if the subtree currently holds the data.
    pub fn application_properties(&mut self) -> Result<&mut OrderedMap<String, Value>, Error> {
        self.application_properties.map_mut()
    }

    /// The `message-annotations` map.
    pub fn annotations(&mut self) -> Result<&mut OrderedMap<AnnotationKey, Value>, Error> {
        self.message_annotations.map_mut()
    }

    /// The `delivery-annotations` map, called "instructions" at the API
    /// surface per spec section 6.2.
    pub fn instructions(&mut self) -> Result<&mut OrderedMap<AnnotationKey, Value>, Error> {
        self.delivery_annotations.map_mut()
    }

    /// The `footer` map.
    pub fn footer(&mut self) -> Result<&mut OrderedMap<AnnotationKey, Value>, Error> {
        self.footer.map_mut()
    }

    fn to_top_level_values(&mut self) -> Result<Vec<Value>, Error> {
        let mut out = Vec::new();
        if self.header != Header::default() {
            out.push(described(HEADER_CODE, Value::List(self.header.to_fields())));
        }
        if !self.delivery_annotations.is_empty() {
            out.push(described(
                DELIVERY_ANNOTATIONS_CODE,
                Value::Map(self.delivery_annotations.to_wire()?.to_vec()),
            ));
        }
        if !self.message_annotations.is_empty() {
            out.push(described(
                MESSAGE_ANNOTATIONS_CODE,
                Value::Map(self.message_annotations.to_wire()?.to_vec()),
            ));
        }
        let properties_fields = self.properties.to_fields();
        if !properties_fields.is_empty() {
            out.push(described(PROPERTIES_CODE, Value::List(properties_fields)));
        }
        if !self.application_properties.is_empty() {
            out.push(described(
                APPLICATION_PROPERTIES_CODE,
                Value::Map(self.application_properties.to_wire()?.to_vec()),
            ));
        }
        if let Some(body) = &self.body {
            out.push(match body {
                Body::Data(b) => described(DATA_CODE, Value::Binary(b.clone())),
                Body::Sequence(v) => described(SEQUENCE_CODE, Value::List(v.clone())),
                Body::Value(v) => described(AMQP_VALUE_CODE, v.clone()),
            });
        }
        if !self.footer.is_empty() {
            out.push(described(FOOTER_CODE, Value::Map(self.footer.to_wire()?.to_vec())));
        }
        Ok(out)
    }

    /// Applies the put-phase map transition for every section, then
    /// encodes the whole message into `buf`. Returns
    /// [`Error::Overflow`] if `buf` is too small; the caller should grow
    /// the buffer and retry, or call [`Message::encode_grow`] instead.
    pub fn encode(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let values = self.to_top_level_values()?;
        codec::encode(&values, buf)
    }

    /// Encodes into a freshly allocated buffer, growing it (starting at 512
    /// bytes, doubling) until it fits.
    pub fn encode_grow(&mut self) -> Result<Vec<u8>, Error> {
        let values = self.to_top_level_values()?;
        codec::encode_to_vec(&values)
    }

    /// Clears the host maps (their authority moves back to the wire
    /// subtree) and parses `bytes` into a fresh message.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.clear();
        let values = codec::decode_all(bytes)?;
        for value in values {
            let described = match value {
                Value::Described(d) => *d,
                other => {
                    return Err(Error::malformed(format!(
                        "top-level message value has tag {:?}, expected a described section",
                        other.tag()
                    )))
                }
            };
            let code = match described.descriptor {
                Descriptor::Code(code) => code,
                Descriptor::Name(name) => {
                    return Err(Error::malformed(format!(
                        "named section descriptors are not supported: {name}"
                    )))
                }
            };
            match code {
                HEADER_CODE => self.header = Header::from_fields(&as_list(described.value)?)?,
                DELIVERY_ANNOTATIONS_CODE => self.delivery_annotations.load_wire(as_map(described.value)?),
                MESSAGE_ANNOTATIONS_CODE => self.message_annotations.load_wire(as_map(described.value)?),
                PROPERTIES_CODE => self.properties = Properties::from_fields(&as_list(described.value)?)?,
                APPLICATION_PROPERTIES_CODE => self.application_properties.load_wire(as_map(described.value)?),
                DATA_CODE => self.body = Some(Body::Data(Binary::try_from(described.value)?)),
                SEQUENCE_CODE => self.body = Some(Body::Sequence(Vec::try_from(described.value)?)),
                AMQP_VALUE_CODE => self.body = Some(Body::Value(described.value)),
                FOOTER_CODE => self.footer.load_wire(as_map(described.value)?),
                other => {
                    return Err(Error::malformed(format!(
                        "unknown message section descriptor 0x{other:x}"
                    )))
                }
            }
        }
        Ok(bytes.len())
    }
}

fn described(code: u64, value: Value) -> Value {
    Value::Described(Box::new(Described::new(code, value)))
}

fn as_list(value: Value) -> Result<Vec<Value>, Error> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(Error::unmarshal(other.tag(), "message section", "expected a list")),
    }
}

fn as_map(value: Value) -> Result<Vec<Value>, Error> {
    match value {
        Value::Map(items) => Ok(items),
        other => Err(Error::unmarshal(other.tag(), "message section", "expected a map")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_encodes_to_nothing() {
        let mut msg = Message::new();
        let bytes = msg.encode_grow().unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn roundtrips_header_properties_and_body() {
        let mut msg = Message::new();
        msg.header = Header::builder().durable(true).build();
        msg.properties.subject = Some("hello".into());
        msg.body = Some(Body::Value(Value::String("payload".into())));

        let bytes = msg.encode_grow().unwrap();

        let mut decoded = Message::new();
        decoded.decode(&bytes).unwrap();
        assert!(decoded.header.durable);
        assert_eq!(decoded.properties.subject, Some("hello".into()));
        assert_eq!(decoded.body, Some(Body::Value(Value::String("payload".into()))));
    }

    #[test]
    fn annotation_map_survives_lazy_round_trip() {
        let mut msg = Message::new();
        msg.annotations()
            .unwrap()
            .insert(AnnotationKey::Symbol("x-opt".into()), Value::Int(1));

        let bytes = msg.encode_grow().unwrap();

        let mut decoded = Message::new();
        decoded.decode(&bytes).unwrap();
        let map = decoded.annotations().unwrap();
        assert_eq!(map.get(&AnnotationKey::Symbol("x-opt".into())), Some(&Value::Int(1)));
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut msg = Message::new();
        msg.properties.subject = Some("x".into());
        msg.clear();
        assert_eq!(msg.properties, Properties::default());
    }
}
