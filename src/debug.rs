//! Formatting helpers shared by the machine's Debug impls.

use std::fmt::{self, Debug};

/// A byte rendered as two lowercase hex digits.
pub(crate) struct HexByte(pub u8);

impl Debug for HexByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// An address rendered as four hex digits.
pub(crate) struct HexWord(pub u16);

impl Debug for HexWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

/// Write one hexdump row, eight bytes to a group.
pub(crate) fn write_row(f: &mut fmt::Formatter<'_>, row: &[u8]) -> fmt::Result {
    for (i, byte) in row.iter().enumerate() {
        if i == 0 {
            write!(f, "{byte:02x}")?;
        } else if i % 8 == 0 {
            write!(f, "  {byte:02x}")?;
        } else {
            write!(f, " {byte:02x}")?;
        }
    }
    Ok(())
}
