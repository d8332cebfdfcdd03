use crate::error::Error;

use super::{Tag, Value};

/// A sequence of values of a single element type, plus the single
/// "constructor" (element tag) recorded once for the whole sequence — the
/// point of ARRAY over LIST on the wire (spec section 3.2/4.2).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Array {
    element_tag: Tag,
    /// Whether the element constructor itself is a described type.
    ///
    /// The wire format for this ("write the descriptor once, then the
    /// body-type constructor once, then N bodies") is left unimplemented:
    /// spec section 9's open questions mark this "TODO: described arrays"
    /// in the source this was distilled from, and direct it be treated as
    /// an encoding error until a decision is made. See
    /// [`crate::codec::encode`]/[`crate::codec::decode`].
    described: bool,
    elements: Vec<Value>,
}

impl Array {
    /// Creates an empty array with the given element tag.
    pub fn new(element_tag: Tag) -> Self {
        Self {
            element_tag,
            described: false,
            elements: Vec::new(),
        }
    }

    /// Creates an array whose element constructor is itself a described
    /// type. Always fails to encode/decode today (see [`Array::described`]).
    pub fn new_described(element_tag: Tag) -> Self {
        Self {
            element_tag,
            described: true,
            elements: Vec::new(),
        }
    }

    /// Builds an array from a vector of values, checking every element
    /// shares `element_tag`.
    pub fn from_elements(element_tag: Tag, elements: Vec<Value>) -> Result<Self, Error> {
        for (i, el) in elements.iter().enumerate() {
            if el.tag() != element_tag {
                return Err(Error::encoding(format!(
                    "array element {i} has tag {:?}, expected {:?}",
                    el.tag(),
                    element_tag
                )));
            }
        }
        Ok(Self {
            element_tag,
            described: false,
            elements,
        })
    }

    /// The declared element tag.
    pub fn element_tag(&self) -> Tag {
        self.element_tag
    }

    /// Whether the element constructor is a described type.
    pub fn described(&self) -> bool {
        self.described
    }

    /// Borrows the elements.
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    /// Mutably borrows the elements, for [`crate::value::Cursor`] navigation.
    pub(crate) fn elements_mut(&mut self) -> &mut Vec<Value> {
        &mut self.elements
    }

    /// Appends a value, rejecting it if its tag does not match
    /// [`Array::element_tag`].
    pub fn push(&mut self, value: Value) -> Result<(), Error> {
        if value.tag() != self.element_tag {
            return Err(Error::encoding(format!(
                "cannot push {:?} into an array of {:?}",
                value.tag(),
                self.element_tag
            )));
        }
        self.elements.push(value);
        Ok(())
    }

    /// Consumes the array, returning its elements.
    pub fn into_elements(self) -> Vec<Value> {
        self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_element_tag() {
        let mut arr = Array::new(Tag::Int);
        assert!(arr.push(Value::Int(1)).is_ok());
        assert!(arr.push(Value::String("x".into())).is_err());
    }

    #[test]
    fn from_elements_validates_every_item() {
        let elements = vec![Value::Int(1), Value::Int(2), Value::Bool(true)];
        assert!(Array::from_elements(Tag::Int, elements).is_err());
    }
}
