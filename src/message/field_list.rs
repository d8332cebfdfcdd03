//! Shared helpers for the two list-encoded composite sections (`Header` and
//! `Properties`): both serialize as a LIST whose trailing `NULL` fields may
//! be omitted (spec section 6.1's described-list sections), so decode must
//! tolerate a list shorter than the full field count.

use crate::value::Value;

/// Drops trailing `Value::Null` entries, which is what lets the encoder
/// write `ttl` (say) only when later fields are also absent, instead of
/// always writing every field.
pub(super) fn trim_trailing_nulls(mut fields: Vec<Value>) -> Vec<Value> {
    while matches!(fields.last(), Some(Value::Null)) {
        fields.pop();
    }
    fields
}

/// Returns the field at `index`, or `Value::Null` if the decoded list was
/// shorter (fields omitted from the wire default to absent/default).
pub(super) fn field_at(fields: &[Value], index: usize) -> Value {
    fields.get(index).cloned().unwrap_or(Value::Null)
}
