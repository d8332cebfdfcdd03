//! Navigable position over a [`Value`] tree.

use crate::descriptor::Descriptor;
use crate::described::Described;
use crate::error::Error;
use crate::primitives::{Binary, Symbol, Timestamp, Uuid};

use super::{Array, Tag, Value};

/// A cursor over a tree of AMQP values, rooted at an implicit top-level
/// sequence (spec section 3.3).
///
/// The cursor owns the tree: [`Cursor::clear`] drops every value in it, and
/// dropping the cursor releases every owned byte payload. There is no
/// separate "tree" object — the root is represented internally as a
/// synthetic `Value::List`, so the navigation logic for the root and for
/// any nested LIST/MAP/ARRAY/DESCRIBED is exactly the same code path
/// (`composite_ref`/`composite_mut` below).
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    root: Value,
    frames: Vec<usize>,
    pos: Option<usize>,
}

impl Cursor {
    /// Creates a new, empty cursor.
    pub fn new() -> Self {
        Self {
            root: Value::List(Vec::new()),
            frames: Vec::new(),
            pos: None,
        }
    }

    /// Drops every value in the tree and rewinds to the start. Equivalent
    /// to the C API's "free tree, allocate a new one" — there is nothing
    /// further to release in safe Rust beyond what `Drop` already does.
    pub fn clear(&mut self) {
        self.root = Value::List(Vec::new());
        self.frames.clear();
        self.pos = None;
    }

    /// Returns to the top level, before the first top-level value.
    pub fn rewind(&mut self) {
        self.frames.clear();
        self.pos = None;
    }

    fn composite_ref(&self) -> Result<&Value, Error> {
        let mut node = &self.root;
        for &idx in &self.frames {
            node = Self::step_ref(node, idx)?;
        }
        Ok(node)
    }

    fn composite_mut(&mut self) -> Result<&mut Value, Error> {
        let mut node = &mut self.root;
        for &idx in &self.frames {
            node = Self::step_mut(node, idx)?;
        }
        Ok(node)
    }

    fn step_ref(node: &Value, idx: usize) -> Result<&Value, Error> {
        match node {
            Value::List(v) | Value::Map(v) => v
                .get(idx)
                .ok_or_else(|| Error::Argument("cursor: stale frame index".into())),
            Value::Array(arr) => arr
                .elements()
                .get(idx)
                .ok_or_else(|| Error::Argument("cursor: stale frame index".into())),
            Value::Described(d) => {
                if idx == 0 {
                    Ok(&d.value)
                } else {
                    Err(Error::Argument("cursor: described body has one slot".into()))
                }
            }
            _ => Err(Error::Argument("cursor: frame index into non-composite".into())),
        }
    }

    fn step_mut(node: &mut Value, idx: usize) -> Result<&mut Value, Error> {
        match node {
            Value::List(v) | Value::Map(v) => v
                .get_mut(idx)
                .ok_or_else(|| Error::Argument("cursor: stale frame index".into())),
            Value::Array(arr) => arr
                .elements_mut()
                .get_mut(idx)
                .ok_or_else(|| Error::Argument("cursor: stale frame index".into())),
            Value::Described(d) => {
                if idx == 0 {
                    Ok(&mut d.value)
                } else {
                    Err(Error::Argument("cursor: described body has one slot".into()))
                }
            }
            _ => Err(Error::Argument("cursor: frame index into non-composite".into())),
        }
    }

    /// Number of direct children of the currently entered composite (the
    /// root counts as a List of the top-level values). For MAP this is the
    /// number of flattened children, i.e. twice the pair count (spec
    /// section 4.2).
    pub fn count(&self) -> usize {
        match self.composite_ref() {
            Ok(node) => node.child_count(),
            Err(_) => 0,
        }
    }

    fn item_ref(&self) -> Option<&Value> {
        let idx = self.pos?;
        match self.composite_ref().ok()? {
            Value::List(v) | Value::Map(v) => v.get(idx),
            Value::Array(arr) => arr.elements().get(idx),
            Value::Described(d) => (idx == 0).then_some(&d.value),
            _ => None,
        }
    }

    /// Advances to the next sibling. Returns `false` (and does not move)
    /// once past the last child of the currently entered composite.
    pub fn next(&mut self) -> bool {
        let len = self.count();
        let next_pos = match self.pos {
            None => 0,
            Some(p) => p + 1,
        };
        if next_pos < len {
            self.pos = Some(next_pos);
            true
        } else {
            false
        }
    }

    /// The [`Tag`] at the current position, or [`Tag::Invalid`] if there is
    /// no value there.
    pub fn tag(&self) -> Tag {
        self.item_ref().map(Value::tag).unwrap_or(Tag::Invalid)
    }

    /// Descends into the composite value at the current position. Returns
    /// `false` (and does not move) if the current position holds nothing,
    /// or holds a non-composite value.
    pub fn enter(&mut self) -> bool {
        match self.item_ref() {
            Some(v) if v.is_composite() => {
                self.frames.push(self.pos.expect("item_ref implies pos"));
                self.pos = None;
                true
            }
            _ => false,
        }
    }

    /// Ascends back to the parent, leaving the just-exited composite as the
    /// current position (so a further [`Cursor::next`] continues iterating
    /// its siblings). Returns `false` if already at the root.
    pub fn exit(&mut self) -> bool {
        match self.frames.pop() {
            Some(idx) => {
                self.pos = Some(idx);
                true
            }
            None => false,
        }
    }

    fn append(&mut self, value: Value) -> Result<(), Error> {
        let pos_is_some = self.pos.is_some();
        let node = self.composite_mut()?;
        match node {
            Value::List(v) | Value::Map(v) => {
                v.push(value);
                self.pos = Some(v.len() - 1);
            }
            Value::Array(arr) => {
                arr.push(value)?;
                self.pos = Some(arr.elements().len() - 1);
            }
            Value::Described(d) => {
                if pos_is_some || !matches!(d.value, Value::Null) {
                    return Err(Error::Argument(
                        "cursor: described body already written".into(),
                    ));
                }
                d.value = value;
                self.pos = Some(0);
            }
            _ => return Err(Error::Argument("cursor: not positioned inside a composite".into())),
        }
        Ok(())
    }

    /// Appends any already-erased [`Value`] at the current position. This
    /// is the one place host "any"-typed input is accepted at run time
    /// rather than through a `From` impl (see `value::convert`'s module
    /// docs).
    pub fn put_any(&mut self, value: Value) -> Result<(), Error> {
        self.append(value)
    }

    /// Appends a `NULL`.
    pub fn put_null(&mut self) -> Result<(), Error> {
        self.append(Value::Null)
    }

    /// Appends a described value with the given descriptor and a `NULL`
    /// placeholder body. Call [`Cursor::enter`] and then a `put_*` to fill
    /// in the body.
    pub fn put_described(&mut self, descriptor: impl Into<Descriptor>) -> Result<(), Error> {
        self.append(Value::Described(Box::new(Described::new(
            descriptor,
            Value::Null,
        ))))
    }

    /// Appends an empty LIST. Call [`Cursor::enter`] to start filling it.
    pub fn put_list(&mut self) -> Result<(), Error> {
        self.append(Value::List(Vec::new()))
    }

    /// Appends an empty MAP. Call [`Cursor::enter`] to start filling it
    /// with alternating key, value children.
    pub fn put_map(&mut self) -> Result<(), Error> {
        self.append(Value::Map(Vec::new()))
    }

    /// Appends an empty ARRAY declared to hold `element_tag` elements.
    pub fn put_array(&mut self, element_tag: Tag) -> Result<(), Error> {
        self.append(Value::Array(Array::new(element_tag)))
    }

    /// Reads the descriptor of the DESCRIBED value at the current
    /// position.
    pub fn descriptor(&self) -> Result<&Descriptor, Error> {
        match self.item_ref() {
            Some(Value::Described(d)) => Ok(&d.descriptor),
            Some(other) => Err(Error::unmarshal(other.tag(), "Descriptor", "not a described value")),
            None => Err(Error::unmarshal(Tag::Invalid, "Descriptor", "no value at cursor")),
        }
    }

    /// Clones the value at `other`'s current position and appends it at
    /// `self`'s current position (copy by value, per spec section 4.2).
    pub fn copy_from(&mut self, other: &Cursor) -> Result<(), Error> {
        let value = other
            .item_ref()
            .ok_or_else(|| Error::Argument("cursor: source has no value to copy".into()))?
            .clone();
        self.append(value)
    }

    fn get(&self) -> Result<&Value, Error> {
        self.item_ref()
            .ok_or_else(|| Error::unmarshal(Tag::Invalid, "Value", "no value at cursor"))
    }

    /// Borrows the value at the current position as a generic [`Value`].
    pub fn get_value(&self) -> Result<&Value, Error> {
        self.get()
    }
}

macro_rules! put_scalar {
    ($name:ident, $variant:ident, $ty:ty) => {
        impl Cursor {
            #[doc = concat!("Appends a `", stringify!($variant), "`.")]
            pub fn $name(&mut self, value: $ty) -> Result<(), Error> {
                self.append(Value::$variant(value.into()))
            }
        }
    };
}

put_scalar!(put_bool, Bool, bool);
put_scalar!(put_ubyte, UByte, u8);
put_scalar!(put_byte, Byte, i8);
put_scalar!(put_ushort, UShort, u16);
put_scalar!(put_short, Short, i16);
put_scalar!(put_uint, UInt, u32);
put_scalar!(put_int, Int, i32);
put_scalar!(put_ulong, ULong, u64);
put_scalar!(put_long, Long, i64);
put_scalar!(put_char, Char, char);
put_scalar!(put_timestamp, Timestamp, Timestamp);
put_scalar!(put_uuid, Uuid, Uuid);
put_scalar!(put_binary, Binary, Binary);
put_scalar!(put_string, String, String);
put_scalar!(put_symbol, Symbol, Symbol);

impl Cursor {
    /// Appends a `FLOAT`.
    pub fn put_float(&mut self, value: f32) -> Result<(), Error> {
        self.append(Value::from(value))
    }

    /// Appends a `DOUBLE`.
    pub fn put_double(&mut self, value: f64) -> Result<(), Error> {
        self.append(Value::from(value))
    }
}

macro_rules! get_scalar {
    ($name:ident, $ty:ty) => {
        impl Cursor {
            #[doc = concat!("Reads the value at the current position as `", stringify!($ty), "`, widening if lossless.")]
            pub fn $name(&self) -> Result<$ty, Error> {
                <$ty>::try_from(self.get()?.clone())
            }
        }
    };
}

get_scalar!(get_bool, bool);
get_scalar!(get_i8, i8);
get_scalar!(get_i16, i16);
get_scalar!(get_i32, i32);
get_scalar!(get_i64, i64);
get_scalar!(get_u8, u8);
get_scalar!(get_u16, u16);
get_scalar!(get_u32, u32);
get_scalar!(get_u64, u64);
get_scalar!(get_f32, f32);
get_scalar!(get_f64, f64);
get_scalar!(get_char, char);
get_scalar!(get_timestamp, Timestamp);
get_scalar!(get_uuid, Uuid);
get_scalar!(get_string, String);
get_scalar!(get_symbol, Symbol);
get_scalar!(get_binary, Binary);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_roundtrip_scalars() {
        let mut cur = Cursor::new();
        cur.put_int(42).unwrap();
        cur.rewind();
        assert!(cur.next());
        assert_eq!(cur.tag(), Tag::Int);
        assert_eq!(cur.get_i32().unwrap(), 42);
    }

    #[test]
    fn nested_list_navigation() {
        let mut cur = Cursor::new();
        cur.put_list().unwrap();
        cur.enter();
        cur.put_int(1).unwrap();
        cur.put_string("x".into()).unwrap();
        cur.put_null().unwrap();
        cur.exit();

        cur.rewind();
        assert!(cur.next());
        assert_eq!(cur.tag(), Tag::List);
        assert_eq!(cur.count(), 3);
        assert!(cur.enter());
        assert!(cur.next());
        assert_eq!(cur.get_i32().unwrap(), 1);
        assert!(cur.next());
        assert_eq!(cur.get_string().unwrap(), "x");
        assert!(cur.next());
        assert_eq!(cur.tag(), Tag::Null);
        assert!(!cur.next());
    }

    #[test]
    fn map_reports_flattened_count() {
        let mut cur = Cursor::new();
        cur.put_map().unwrap();
        cur.enter();
        cur.put_string("a".into()).unwrap();
        cur.put_int(1).unwrap();
        cur.exit();

        cur.rewind();
        cur.next();
        cur.enter();
        assert_eq!(cur.count(), 2);
    }

    #[test]
    fn array_rejects_mismatched_push() {
        let mut cur = Cursor::new();
        cur.put_array(Tag::Int).unwrap();
        cur.enter();
        cur.put_int(1).unwrap();
        assert!(cur.put_string("oops".into()).is_err());
    }

    #[test]
    fn described_body_can_be_written_once() {
        let mut cur = Cursor::new();
        cur.put_described(0x73u64).unwrap();
        cur.enter();
        cur.put_int(9).unwrap();
        assert!(cur.put_int(10).is_err());
        cur.exit();

        cur.rewind();
        cur.next();
        assert_eq!(*cur.descriptor().unwrap(), Descriptor::Code(0x73));
    }

    #[test]
    fn exit_past_root_returns_false() {
        let mut cur = Cursor::new();
        assert!(!cur.exit());
    }
}
