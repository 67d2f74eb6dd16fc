use crate::error::VmError;

/// One decoded instruction form, operands extracted.
///
/// Decoding is a pure function of the 16-bit word; execution is a separate
/// exhaustive match over this enum, so each half can be tested on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`: clear the framebuffer.
    Clear,
    /// `00EE`: return from subroutine.
    Return,
    /// `0nnn`: legacy machine-code call. Diagnosed and ignored, and `pc`
    /// does not advance.
    Sys { nnn: u16 },
    /// `1nnn`: jump.
    Jump { nnn: u16 },
    /// `2nnn`: call subroutine.
    Call { nnn: u16 },
    /// `3xkk`: skip next if `V[x] == kk`.
    SkipEqImm { x: u8, kk: u8 },
    /// `4xkk`: skip next if `V[x] != kk`.
    SkipNeImm { x: u8, kk: u8 },
    /// `5xy0`: skip next if `V[x] == V[y]`.
    SkipEqReg { x: u8, y: u8 },
    /// `6xkk`: `V[x] = kk`.
    SetImm { x: u8, kk: u8 },
    /// `7xkk`: `V[x] += kk`, flag untouched.
    AddImm { x: u8, kk: u8 },
    /// `8xy0`: `V[x] = V[y]`.
    Copy { x: u8, y: u8 },
    /// `8xy1`: `V[x] |= V[y]`.
    Or { x: u8, y: u8 },
    /// `8xy2`: `V[x] &= V[y]`.
    And { x: u8, y: u8 },
    /// `8xy3`: `V[x] ^= V[y]`.
    Xor { x: u8, y: u8 },
    /// `8xy4`: `V[x] += V[y]`, carry into the flag.
    Add { x: u8, y: u8 },
    /// `8xy5`: `V[x] -= V[y]`, flag set iff `V[x] > V[y]`.
    Sub { x: u8, y: u8 },
    /// `8xy6`: shift `V[x]` right one, old bit 0 into the flag.
    ShiftRight { x: u8 },
    /// `8xy7`: `V[x] = V[y] - V[x]`, flag set iff `V[y] > V[x]`.
    SubFrom { x: u8, y: u8 },
    /// `8xyE`: shift `V[x]` left one, old bit 7 into the flag.
    ShiftLeft { x: u8 },
    /// `9xy0`: skip next if `V[x] != V[y]`.
    SkipNeReg { x: u8, y: u8 },
    /// `Annn`: `I = nnn`.
    SetIndex { nnn: u16 },
    /// `Bnnn`: jump to `nnn + V[0]`.
    JumpOffset { nnn: u16 },
    /// `Cxkk`: `V[x] = random byte & kk`.
    Random { x: u8, kk: u8 },
    /// `Dxyn`: draw the `n`-row sprite at `I` to `(V[x], V[y])`.
    Draw { x: u8, y: u8, n: u8 },
    /// `Ex9E`: skip next if key `V[x]` is down.
    SkipKeyDown { x: u8 },
    /// `ExA1`: skip next if key `V[x]` is up.
    SkipKeyUp { x: u8 },
    /// `Fx07`: `V[x] = delay timer`.
    ReadDelay { x: u8 },
    /// `Fx0A`: busy-wait for a key, its code into `V[x]`.
    WaitKey { x: u8 },
    /// `Fx15`: `delay timer = V[x]`.
    SetDelay { x: u8 },
    /// `Fx18`: `sound timer = V[x]`.
    SetSound { x: u8 },
    /// `Fx1E`: `I += V[x]`, wrapping.
    AddIndex { x: u8 },
    /// `Fx29`: point `I` at the font glyph for `V[x]`.
    FontGlyph { x: u8 },
    /// `Fx33`: BCD of `V[x]` into `memory[I..=I+2]`.
    StoreBcd { x: u8 },
    /// `Fx55`: store `V[0..=x]` to memory at `I`.
    StoreRegs { x: u8 },
    /// `Fx65`: load `V[0..=x]` from memory at `I`.
    LoadRegs { x: u8 },
}

impl Instruction {
    /// Decode one big-endian opcode word.
    ///
    /// Words that match no form, including unassigned sub-forms of the
    /// `0`/`5`/`8`/`9`/`E`/`F` groups, are errors rather than no-ops.
    pub fn decode(opcode: u16) -> Result<Self, VmError> {
        let x = ((opcode >> 8) & 0x0F) as u8;
        let y = ((opcode >> 4) & 0x0F) as u8;
        let n = (opcode & 0x0F) as u8;
        let kk = opcode as u8;
        let nnn = opcode & 0x0FFF;

        let instr = match opcode >> 12 {
            0x0 => match opcode {
                0x00E0 => Self::Clear,
                0x00EE => Self::Return,
                _ => Self::Sys { nnn },
            },
            0x1 => Self::Jump { nnn },
            0x2 => Self::Call { nnn },
            0x3 => Self::SkipEqImm { x, kk },
            0x4 => Self::SkipNeImm { x, kk },
            0x5 if n == 0 => Self::SkipEqReg { x, y },
            0x6 => Self::SetImm { x, kk },
            0x7 => Self::AddImm { x, kk },
            0x8 => match n {
                0x0 => Self::Copy { x, y },
                0x1 => Self::Or { x, y },
                0x2 => Self::And { x, y },
                0x3 => Self::Xor { x, y },
                0x4 => Self::Add { x, y },
                0x5 => Self::Sub { x, y },
                0x6 => Self::ShiftRight { x },
                0x7 => Self::SubFrom { x, y },
                0xE => Self::ShiftLeft { x },
                _ => return Err(VmError::UnknownOpcode { opcode }),
            },
            0x9 if n == 0 => Self::SkipNeReg { x, y },
            0xA => Self::SetIndex { nnn },
            0xB => Self::JumpOffset { nnn },
            0xC => Self::Random { x, kk },
            0xD => Self::Draw { x, y, n },
            0xE => match kk {
                0x9E => Self::SkipKeyDown { x },
                0xA1 => Self::SkipKeyUp { x },
                _ => return Err(VmError::UnknownOpcode { opcode }),
            },
            0xF => match kk {
                0x07 => Self::ReadDelay { x },
                0x0A => Self::WaitKey { x },
                0x15 => Self::SetDelay { x },
                0x18 => Self::SetSound { x },
                0x1E => Self::AddIndex { x },
                0x29 => Self::FontGlyph { x },
                0x33 => Self::StoreBcd { x },
                0x55 => Self::StoreRegs { x },
                0x65 => Self::LoadRegs { x },
                _ => return Err(VmError::UnknownOpcode { opcode }),
            },
            _ => return Err(VmError::UnknownOpcode { opcode }),
        };
        Ok(instr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_forms() {
        assert_eq!(Instruction::decode(0x00E0), Ok(Instruction::Clear));
        assert_eq!(Instruction::decode(0x00EE), Ok(Instruction::Return));
        assert_eq!(Instruction::decode(0x0123), Ok(Instruction::Sys { nnn: 0x123 }));
        assert_eq!(Instruction::decode(0x1ABC), Ok(Instruction::Jump { nnn: 0xABC }));
        assert_eq!(Instruction::decode(0x2ABC), Ok(Instruction::Call { nnn: 0xABC }));
        assert_eq!(
            Instruction::decode(0xB123),
            Ok(Instruction::JumpOffset { nnn: 0x123 })
        );
    }

    #[test]
    fn skip_forms() {
        assert_eq!(
            Instruction::decode(0x3A7F),
            Ok(Instruction::SkipEqImm { x: 0xA, kk: 0x7F })
        );
        assert_eq!(
            Instruction::decode(0x4A7F),
            Ok(Instruction::SkipNeImm { x: 0xA, kk: 0x7F })
        );
        assert_eq!(
            Instruction::decode(0x5AB0),
            Ok(Instruction::SkipEqReg { x: 0xA, y: 0xB })
        );
        assert_eq!(
            Instruction::decode(0x9AB0),
            Ok(Instruction::SkipNeReg { x: 0xA, y: 0xB })
        );
        assert_eq!(Instruction::decode(0xE29E), Ok(Instruction::SkipKeyDown { x: 2 }));
        assert_eq!(Instruction::decode(0xE2A1), Ok(Instruction::SkipKeyUp { x: 2 }));
    }

    #[test]
    fn alu_forms() {
        assert_eq!(
            Instruction::decode(0x6C42),
            Ok(Instruction::SetImm { x: 0xC, kk: 0x42 })
        );
        assert_eq!(
            Instruction::decode(0x7C42),
            Ok(Instruction::AddImm { x: 0xC, kk: 0x42 })
        );
        assert_eq!(Instruction::decode(0x8120), Ok(Instruction::Copy { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x8121), Ok(Instruction::Or { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x8122), Ok(Instruction::And { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x8123), Ok(Instruction::Xor { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x8124), Ok(Instruction::Add { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x8125), Ok(Instruction::Sub { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x8126), Ok(Instruction::ShiftRight { x: 1 }));
        assert_eq!(Instruction::decode(0x8127), Ok(Instruction::SubFrom { x: 1, y: 2 }));
        assert_eq!(Instruction::decode(0x812E), Ok(Instruction::ShiftLeft { x: 1 }));
    }

    #[test]
    fn memory_and_misc_forms() {
        assert_eq!(
            Instruction::decode(0xA123),
            Ok(Instruction::SetIndex { nnn: 0x123 })
        );
        assert_eq!(
            Instruction::decode(0xC2F0),
            Ok(Instruction::Random { x: 2, kk: 0xF0 })
        );
        assert_eq!(
            Instruction::decode(0xD12F),
            Ok(Instruction::Draw { x: 1, y: 2, n: 0xF })
        );
        assert_eq!(Instruction::decode(0xF407), Ok(Instruction::ReadDelay { x: 4 }));
        assert_eq!(Instruction::decode(0xF40A), Ok(Instruction::WaitKey { x: 4 }));
        assert_eq!(Instruction::decode(0xF415), Ok(Instruction::SetDelay { x: 4 }));
        assert_eq!(Instruction::decode(0xF418), Ok(Instruction::SetSound { x: 4 }));
        assert_eq!(Instruction::decode(0xF41E), Ok(Instruction::AddIndex { x: 4 }));
        assert_eq!(Instruction::decode(0xF429), Ok(Instruction::FontGlyph { x: 4 }));
        assert_eq!(Instruction::decode(0xF433), Ok(Instruction::StoreBcd { x: 4 }));
        assert_eq!(Instruction::decode(0xF455), Ok(Instruction::StoreRegs { x: 4 }));
        assert_eq!(Instruction::decode(0xF465), Ok(Instruction::LoadRegs { x: 4 }));
    }

    #[test]
    fn unassigned_forms_are_errors() {
        for opcode in [0x5AB1, 0x8AB8, 0x8ABF, 0x9AB5, 0xE29F, 0xE200, 0xF400, 0xF4FF] {
            assert_eq!(
                Instruction::decode(opcode),
                Err(VmError::UnknownOpcode { opcode }),
                "opcode {opcode:#06x}"
            );
        }
    }
}
