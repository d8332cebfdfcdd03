#![deny(missing_docs, missing_debug_implementations)]

//! A typed AMQP 1.0 value tree, binary codec, and message container.
//!
//! # Untyped values
//!
//! [`value::Value`] is the "any" AMQP type: a tagged union over every
//! primitive, plus LIST, MAP, ARRAY, and DESCRIBED. [`value::Cursor`]
//! navigates and builds a tree of them:
//!
//! ```rust
//! use amqp_value::value::{Cursor, Tag};
//!
//! let mut cursor = Cursor::new();
//! cursor.put_list().unwrap();
//! cursor.enter();
//! cursor.put_int(1).unwrap();
//! cursor.put_string("two".into()).unwrap();
//! cursor.exit();
//!
//! cursor.rewind();
//! assert!(cursor.next());
//! assert_eq!(cursor.tag(), Tag::List);
//! ```
//!
//! # Host type conversions
//!
//! Concrete Rust types convert to and from [`value::Value`] via `From`/
//! `TryFrom` (see [`value`]'s module docs) rather than through a
//! `Serialize`/`Deserialize` trait pair — there is no derive macro here,
//! only direct construction and the cursor API above.
//!
//! # Binary codec
//!
//! [`codec::encode`]/[`codec::decode`] convert between a slice of
//! [`value::Value`] and AMQP 1.0 wire bytes. [`codec::encode_to_vec`] hides
//! the grow-and-retry loop the raw [`codec::encode`] contract requires on
//! [`error::Error::Overflow`].
//!
//! # Messages
//!
//! [`message::Message`] is the AMQP 1.0 message container: fixed header and
//! properties fields, a body, and four annotation-shaped map sections that
//! are lazily materialized into host-side [`primitives::OrderedMap`]s on
//! first access (see [`message::Message::annotations`] and friends).

pub mod codec;
pub mod described;
pub mod descriptor;
pub mod error;
pub mod message;
pub mod primitives;
pub mod value;

mod fixed_width;
mod format_code;

pub use error::Error;
pub use value::{Cursor, Value};
