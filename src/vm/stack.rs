use crate::debug::HexWord;
use crate::error::VmError;
use std::fmt::{self, Debug};

/// Return-address stack for `2nnn`/`00EE`, fixed at the machine's sixteen
/// slots. Overflow and underflow were out-of-bounds array accesses in the
/// reference interpreter; here they are defined, fatal errors.
#[derive(Clone)]
pub struct CallStack {
    slots: [u16; Self::DEPTH],
    sp: u8,
}

impl CallStack {
    const DEPTH: usize = 16;

    pub fn new() -> Self {
        Self {
            slots: [0; Self::DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), VmError> {
        if self.depth() == Self::DEPTH {
            return Err(VmError::StackOverflow);
        }
        self.slots[self.sp as usize] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, VmError> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.slots[self.sp as usize])
    }

    fn depth(&self) -> usize {
        self.sp as usize
    }
}

impl Debug for CallStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots[..self.depth()].iter().map(|&a| HexWord(a)))
            .finish()
    }
}
