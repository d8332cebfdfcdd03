//! Host <-> AMQP value conversions (spec section 4.4).
//!
//! `Value` itself plays the role of the "any" (dynamically typed) host slot:
//! a polymorphic host value is simply a `Value`, so no separate `AnyValue`
//! wrapper is needed. Unmarshalling into a concrete host type goes through
//! `TryFrom<Value>`; marshalling a concrete host type into the tree goes
//! through `From<T>`/`Into<Value>`. Forbidden host inputs (functions,
//! channels, anything with no conversion defined) simply have no `From`
//! impl, which is the Rust-idiomatic rendering of spec section 4.4's
//! "must fail with a typed 'no conversion' error" — the failure happens at
//! compile time instead of at run time wherever static typing allows it;
//! [`crate::value::Cursor::put_any`] is the one place it is a runtime error,
//! because it accepts an already-erased `Value`.

use ordered_float::OrderedFloat;

use crate::described::Described;
use crate::error::Error;
use crate::primitives::{Binary, OrderedMap, Symbol, Timestamp, Uuid};

use super::{Tag, Value};

fn unwrap_described(value: Value) -> Value {
    match value {
        Value::Described(d) => d.value,
        other => other,
    }
}

macro_rules! from_variant {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

from_variant!(Bool, bool);
from_variant!(UByte, u8);
from_variant!(Byte, i8);
from_variant!(UShort, u16);
from_variant!(Short, i16);
from_variant!(UInt, u32);
from_variant!(Int, i32);
from_variant!(ULong, u64);
from_variant!(Long, i64);
from_variant!(Char, char);
from_variant!(Timestamp, Timestamp);
from_variant!(Uuid, Uuid);
from_variant!(Binary, Binary);
from_variant!(String, String);
from_variant!(Symbol, Symbol);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(OrderedFloat(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(OrderedFloat(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// A sequence of values of a single concrete host type, converting to
/// [`Value::Array`] rather than [`Value::List`]. `Vec<T>`'s own `From` impl
/// above always produces a `List`; wrap it in `ArraySeq` when the elements
/// share one AMQP type and should round-trip as an `Array` instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArraySeq<T>(pub Vec<T>);

impl<T> From<Vec<T>> for ArraySeq<T> {
    fn from(v: Vec<T>) -> Self {
        Self(v)
    }
}

impl<T> std::ops::Deref for ArraySeq<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for ArraySeq<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> TryFrom<ArraySeq<T>> for Value
where
    T: Into<Value>,
{
    type Error = Error;

    fn try_from(seq: ArraySeq<T>) -> Result<Self, Self::Error> {
        let elements: Vec<Value> = seq.0.into_iter().map(Into::into).collect();
        let tag = elements.first().map(Value::tag).unwrap_or(Tag::Null);
        Ok(Value::Array(super::Array::from_elements(tag, elements)?))
    }
}

impl From<Described<Value>> for Value {
    fn from(d: Described<Value>) -> Self {
        Value::Described(Box::new(d))
    }
}

impl From<super::Array> for Value {
    fn from(a: super::Array) -> Self {
        Value::Array(a)
    }
}

impl<K, V> From<OrderedMap<K, V>> for Value
where
    K: Into<Value>,
    V: Into<Value>,
{
    fn from(map: OrderedMap<K, V>) -> Self {
        let mut flat = Vec::with_capacity(map.len() * 2);
        for (k, v) in map.into_iter() {
            flat.push(k.into());
            flat.push(v.into());
        }
        Value::Map(flat)
    }
}

macro_rules! try_from_variant {
    ($variant:ident, $ty:ty, $host_name:literal) => {
        impl TryFrom<Value> for $ty {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match unwrap_described(value) {
                    Value::$variant(v) => Ok(v),
                    other => Err(Error::unmarshal(other.tag(), $host_name, "tag mismatch")),
                }
            }
        }
    };
}

try_from_variant!(Bool, bool, "bool");
try_from_variant!(Char, char, "char");
try_from_variant!(Timestamp, Timestamp, "Timestamp");
try_from_variant!(Uuid, Uuid, "Uuid");
try_from_variant!(String, String, "String");
try_from_variant!(Symbol, Symbol, "Symbol");

impl TryFrom<Value> for Binary {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match unwrap_described(value) {
            Value::Binary(b) => Ok(b),
            Value::String(s) => Ok(Binary(s.into_bytes())),
            Value::Symbol(s) => Ok(Binary(s.into_inner().into_bytes())),
            other => Err(Error::unmarshal(other.tag(), "Binary", "tag mismatch")),
        }
    }
}

macro_rules! try_from_widened_int {
    ($ty:ty, $widen:ident) => {
        impl TryFrom<Value> for $ty {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                let value = unwrap_described(value);
                let tag = value.tag();
                let wide = value.$widen()?;
                <$ty>::try_from(wide)
                    .map_err(|_| Error::unmarshal(tag, stringify!($ty), "value out of range"))
            }
        }
    };
}

try_from_widened_int!(i8, as_i64);
try_from_widened_int!(i16, as_i64);
try_from_widened_int!(i32, as_i64);
try_from_widened_int!(i64, as_i64);
try_from_widened_int!(u8, as_u64);
try_from_widened_int!(u16, as_u64);
try_from_widened_int!(u32, as_u64);
try_from_widened_int!(u64, as_u64);

impl TryFrom<Value> for f32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match unwrap_described(value) {
            Value::Float(v) => Ok(v.0),
            other => Err(Error::unmarshal(other.tag(), "f32", "tag mismatch")),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let value = unwrap_described(value);
        let tag = value.tag();
        value.as_f64().map_err(|_| Error::unmarshal(tag, "f64", "tag mismatch"))
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match unwrap_described(value) {
            Value::List(items) => Ok(items),
            Value::Array(arr) => Ok(arr.into_elements()),
            other => Err(Error::unmarshal(other.tag(), "Vec<Value>", "tag mismatch")),
        }
    }
}

impl TryFrom<Value> for super::Array {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match unwrap_described(value) {
            Value::Array(arr) => Ok(arr),
            other => Err(Error::unmarshal(other.tag(), "Array", "tag mismatch")),
        }
    }
}

impl TryFrom<Value> for OrderedMap<Value, Value> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match unwrap_described(value) {
            Value::Map(flat) => {
                if flat.len() % 2 != 0 {
                    return Err(Error::unmarshal(
                        Tag::Map,
                        "OrderedMap<Value, Value>",
                        "odd number of map children",
                    ));
                }
                let mut map = OrderedMap::new();
                let mut iter = flat.into_iter();
                while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
                    map.insert(k, v);
                }
                Ok(map)
            }
            other => Err(Error::unmarshal(
                other.tag(),
                "OrderedMap<Value, Value>",
                "tag mismatch",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_int_read_succeeds_when_lossless() {
        let v = Value::Short(-1);
        let widened: i32 = i32::try_from(v).unwrap();
        assert_eq!(widened, -1);
    }

    #[test]
    fn narrowing_int_read_fails() {
        let v = Value::Int(1000);
        let narrowed: Result<i16, _> = i16::try_from(v.clone());
        assert!(narrowed.is_err());
        let ok: Result<i16, _> = {
            let v2 = Value::Int(100);
            i16::try_from(v2)
        };
        assert!(ok.is_ok());
        let _ = v;
    }

    #[test]
    fn float_widens_but_double_does_not_narrow() {
        let f: f64 = f64::try_from(Value::Float(OrderedFloat(1.5))).unwrap();
        assert_eq!(f, 1.5);
        assert!(f32::try_from(Value::Double(OrderedFloat(1.5))).is_err());
    }

    #[test]
    fn described_unmarshal_drops_descriptor() {
        let described = Value::Described(Box::new(Described::new(0x73u64, Value::Int(7))));
        let i: i32 = i32::try_from(described).unwrap();
        assert_eq!(i, 7);
    }

    #[test]
    fn map_round_trips_through_ordered_map() {
        let mut map = OrderedMap::new();
        map.insert(Value::String("a".into()), Value::Int(1));
        map.insert(Value::String("b".into()), Value::Int(2));
        let value: Value = map.into();
        let back: OrderedMap<Value, Value> = value.try_into().unwrap();
        assert_eq!(back.get(&Value::String("a".into())), Some(&Value::Int(1)));
    }

    #[test]
    fn array_seq_converts_to_array_not_list() {
        let seq = ArraySeq::from(vec![1i32, 2, 3]);
        let value: Value = seq.try_into().unwrap();
        match value {
            Value::Array(arr) => {
                assert_eq!(arr.element_tag(), Tag::Int);
                assert_eq!(arr.elements(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
            }
            other => panic!("expected an array, got {other:?}"),
        }
    }

    #[test]
    fn plain_vec_still_converts_to_list() {
        let value: Value = vec![1i32, 2, 3].into();
        assert!(matches!(value, Value::List(_)));
    }
}
