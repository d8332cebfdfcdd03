/// An absolute point in time.
///
/// encoding name = "ms64", code = 0x83, category = fixed, width = 8.
/// A signed 64-bit two's-complement integer counting milliseconds since the
/// Unix epoch. Negative values (points before 1970) are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a new `Timestamp` from a millisecond count.
    pub fn from_milliseconds(milliseconds: i64) -> Self {
        Self(milliseconds)
    }

    /// Returns the timestamp as a millisecond count.
    pub fn milliseconds(&self) -> i64 {
        self.0
    }

    /// Consumes the wrapper, returning the inner `i64`.
    pub fn into_inner(self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(val: i64) -> Self {
        Self(val)
    }
}

impl From<Timestamp> for i64 {
    fn from(val: Timestamp) -> Self {
        val.0
    }
}
