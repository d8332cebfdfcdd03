/// Opaque, length-prefixed binary data.
///
/// A thin `Vec<u8>` wrapper so the AMQP BINARY type reads distinctly from a
/// bare byte vector at call sites (e.g. `Properties::user_id`), matching
/// how [`super::Symbol`] distinguishes ASCII symbols from UTF-8 strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    /// Borrows the binary payload.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the wrapper, returning the inner `Vec<u8>`.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(val: Vec<u8>) -> Self {
        Self(val)
    }
}

impl From<&[u8]> for Binary {
    fn from(val: &[u8]) -> Self {
        Self(val.to_vec())
    }
}

impl From<Binary> for Vec<u8> {
    fn from(val: Binary) -> Self {
        val.0
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
