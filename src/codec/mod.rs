//! The binary codec: encoding a [`crate::value::Value`] tree to AMQP 1.0
//! wire bytes and back (spec section 4.3).
//!
//! Encoding always picks the narrowest constructor that losslessly
//! represents the value (spec section 4.3's "minimal encoding" rule); array
//! elements are the one exception, since every element of an ARRAY shares a
//! single constructor chosen up front (spec section 3.2).
//!
//! [`encode`] writes into a caller-sized buffer and reports
//! [`crate::error::Error::Overflow`] without having mutated anything
//! observable beyond the write cursor if the buffer is too small; the
//! caller is expected to retry with a bigger buffer, which is exactly what
//! [`encode_to_vec`] does (starting at 512 bytes, doubling each retry).
//! [`decode`] reports [`crate::error::Error::Underflow`] the same way: zero
//! bytes consumed, nothing mutated, if the input holds less than one
//! complete value.

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;

use crate::error::Error;
use crate::value::Value;

/// Starting capacity for [`encode_to_vec`]'s buffer-growth loop.
const INITIAL_CAPACITY: usize = 512;

/// Encodes every value in `values` into a freshly allocated buffer, growing
/// it by doubling (starting at 512 bytes) until the encode fits.
pub fn encode_to_vec(values: &[Value]) -> Result<Vec<u8>, Error> {
    let mut capacity = INITIAL_CAPACITY;
    loop {
        let mut buf = vec![0u8; capacity];
        match encode(values, &mut buf) {
            Ok(len) => {
                buf.truncate(len);
                return Ok(buf);
            }
            Err(Error::Overflow) => {
                capacity *= 2;
            }
            Err(other) => return Err(other),
        }
    }
}

/// Decodes every top-level value present in `bytes`, per spec section 3.3's
/// "a document is zero or more top-level values". Returns
/// [`crate::error::Error::Underflow`] if the trailing bytes do not contain a
/// complete value.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Value>, Error> {
    let mut values = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (value, consumed) = decode(&bytes[offset..])?;
        values.push(value);
        offset += consumed;
    }
    Ok(values)
}
