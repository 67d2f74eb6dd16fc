use crate::debug;
use std::fmt::{self, Debug};
use std::ops::{Index, IndexMut};

/// The sixteen 8-bit registers, indexed by the nibble pulled out of an
/// opcode. `v[0xF]` doubles as the carry/borrow/collision flag.
#[derive(Clone)]
pub struct Regs {
    v: [u8; 16],
}

impl Regs {
    pub fn new() -> Self {
        Self { v: [0; 16] }
    }

    /// Write the flag register.
    ///
    /// Arithmetic, shifts and sprite drawing report through here. Callers
    /// that also store a result into `V[x]` must do so after this call, so
    /// that the result wins when `x` is 0xF itself.
    pub fn set_flag(&mut self, set: bool) {
        self.v[0xF] = set as u8;
    }
}

impl Index<u8> for Regs {
    type Output = u8;

    fn index(&self, index: u8) -> &Self::Output {
        &self.v[index as usize]
    }
}

impl IndexMut<u8> for Regs {
    fn index_mut(&mut self, index: u8) -> &mut Self::Output {
        &mut self.v[index as usize]
    }
}

impl Debug for Regs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        debug::write_row(f, &self.v)?;
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_by_nibble() {
        let mut regs = Regs::new();
        regs[0x3] = 0xAB;
        assert_eq!(regs[0x3], 0xAB);
        assert_eq!(regs[0x4], 0);
    }

    #[test]
    fn flag_lands_in_v15() {
        let mut regs = Regs::new();
        regs.set_flag(true);
        assert_eq!(regs[0xF], 1);
        regs.set_flag(false);
        assert_eq!(regs[0xF], 0);
    }
}
