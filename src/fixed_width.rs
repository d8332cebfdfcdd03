//! Byte widths of the fixed-width primitive categories.

pub(crate) const UUID_WIDTH: usize = 16;

/// Decimal widths are only needed to skip over/report the unsupported types.
pub(crate) const DECIMAL32_WIDTH: usize = 4;
pub(crate) const DECIMAL64_WIDTH: usize = 8;
pub(crate) const DECIMAL128_WIDTH: usize = 16;
