//! The lazy host-map/wire-subtree cache shared by `application-properties`,
//! `message-annotations`, `delivery-annotations`, and `footer` (spec section
//! 4.5's three-state machine: AUTH-WIRE, AUTH-MAP, EMPTY).

use std::hash::Hash;

use crate::error::Error;
use crate::primitives::OrderedMap;
use crate::value::Value;

/// At most one of `map` / `wire` is non-empty at any observable moment —
/// whichever one is non-empty is authoritative; both empty is the `EMPTY`
/// state.
#[derive(Debug, Clone)]
pub(super) struct LazySection<K> {
    map: OrderedMap<K, Value>,
    wire: Vec<Value>,
}

impl<K> Default for LazySection<K> {
    fn default() -> Self {
        LazySection { map: OrderedMap::default(), wire: Vec::new() }
    }
}

impl<K> LazySection<K>
where
    K: Clone + Hash + Eq + Into<Value> + TryFrom<Value, Error = Error>,
{
    pub(super) fn is_empty(&self) -> bool {
        self.map.is_empty() && self.wire.is_empty()
    }

    pub(super) fn clear(&mut self) {
        self.map.clear();
        self.wire.clear();
    }

    /// AUTH-WIRE -> AUTH-MAP: decodes the wire subtree into the host map if
    /// the wire subtree currently holds the data.
    pub(super) fn map_mut(&mut self) -> Result<&mut OrderedMap<K, Value>, Error> {
        if self.map.is_empty() && !self.wire.is_empty() {
            let flat = std::mem::take(&mut self.wire);
            if flat.len() % 2 != 0 {
                return Err(Error::malformed("annotation map has an odd number of children"));
            }
            let mut iter = flat.into_iter();
            while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
                self.map.insert(K::try_from(k)?, v);
            }
        }
        Ok(&mut self.map)
    }

    /// AUTH-MAP -> AUTH-WIRE: encodes the host map into the flat wire form
    /// if the host map currently holds the data. Returns the flat children
    /// (key, value, key, value, ...).
    pub(super) fn to_wire(&mut self) -> Result<&[Value], Error> {
        if self.wire.is_empty() && !self.map.is_empty() {
            let map = std::mem::take(&mut self.map);
            for (k, v) in map.into_iter() {
                self.wire.push(k.into());
                self.wire.push(v);
            }
        }
        Ok(&self.wire)
    }

    /// EMPTY -> AUTH-WIRE: loads a freshly decoded subtree, discarding any
    /// stale host map.
    pub(super) fn load_wire(&mut self, flat: Vec<Value>) {
        self.map.clear();
        self.wire = flat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::id::AnnotationKey;

    #[test]
    fn starts_empty() {
        let section: LazySection<AnnotationKey> = LazySection::default();
        assert!(section.is_empty());
    }

    #[test]
    fn wire_to_map_transition_then_back() {
        let mut section: LazySection<AnnotationKey> = LazySection::default();
        section.load_wire(vec![Value::Symbol("k".into()), Value::Int(1)]);
        {
            let map = section.map_mut().unwrap();
            assert_eq!(map.get(&AnnotationKey::Symbol("k".into())), Some(&Value::Int(1)));
            map.insert(AnnotationKey::ULong(9), Value::Bool(true));
        }
        let wire = section.to_wire().unwrap().to_vec();
        assert_eq!(wire.len(), 4);
    }

    #[test]
    fn odd_wire_length_is_malformed() {
        let mut section: LazySection<AnnotationKey> = LazySection::default();
        section.load_wire(vec![Value::Symbol("k".into())]);
        assert!(section.map_mut().is_err());
    }
}
