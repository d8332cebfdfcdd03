//! AMQP 1.0 primitive types that do not map cleanly onto a Rust built-in.
//!
//! `bool`, `u8`..`u64`, `i8`..`i64`, `f32`, `f64`, `char`, and `String` are
//! used directly as host types (see [`crate::value`]'s `From`/`TryFrom`
//! impls); the types here exist because AMQP 1.0 distinguishes them from any
//! built-in Rust type (`Symbol` vs. `String`, `Timestamp`/`Uuid`/`Binary`
//! vs. raw integers/bytes) or because they need ordering semantics `std`
//! does not provide (`OrderedMap`).

mod binary;
mod map;
mod symbol;
mod timestamp;
mod uuid;

pub use binary::Binary;
pub use map::OrderedMap;
pub use symbol::Symbol;
pub use timestamp::Timestamp;
pub use uuid::Uuid;
