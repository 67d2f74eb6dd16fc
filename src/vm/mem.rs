use crate::debug::{self, HexByte};
use crate::error::VmError;
use std::fmt::{self, Debug};
use std::ops::Index;

/// The 4 KiB address space. The font glyphs sit at `FONT_BASE`; a loaded
/// program occupies `ROM_START` upward.
#[derive(Clone)]
pub struct Mem {
    bytes: Box<[u8; Self::LEN]>,
}

/// Bitmaps for the built-in hex digit glyphs, five bytes each.
const FONT: [[u8; 5]; 16] = [
    [0xF0, 0x90, 0x90, 0x90, 0xF0], // 0
    [0x20, 0x60, 0x20, 0x20, 0x70], // 1
    [0xF0, 0x10, 0xF0, 0x80, 0xF0], // 2
    [0xF0, 0x10, 0xF0, 0x10, 0xF0], // 3
    [0x90, 0x90, 0xF0, 0x10, 0x10], // 4
    [0xF0, 0x80, 0xF0, 0x10, 0xF0], // 5
    [0xF0, 0x80, 0xF0, 0x90, 0xF0], // 6
    [0xF0, 0x10, 0x20, 0x40, 0x40], // 7
    [0xF0, 0x90, 0xF0, 0x90, 0xF0], // 8
    [0xF0, 0x90, 0xF0, 0x10, 0xF0], // 9
    [0xF0, 0x90, 0xF0, 0x90, 0x90], // A
    [0xE0, 0x90, 0xE0, 0x90, 0xE0], // B
    [0xF0, 0x80, 0x80, 0x80, 0xF0], // C
    [0xE0, 0x90, 0x90, 0x90, 0xE0], // D
    [0xF0, 0x80, 0xF0, 0x80, 0xF0], // E
    [0xF0, 0x80, 0xF0, 0x80, 0x80], // F
];

const GLYPH_BYTES: u16 = 5;

impl Mem {
    pub const LEN: usize = 4 * 1024;
    pub const ROM_START: u16 = 0x0200;
    pub const FONT_BASE: u16 = 0x0050;

    /// Space left for a program above `ROM_START`.
    pub const ROM_CAPACITY: usize = Self::LEN - Self::ROM_START as usize;

    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; Self::LEN]);
        for (i, glyph) in FONT.iter().enumerate() {
            let at = Self::FONT_BASE as usize + i * GLYPH_BYTES as usize;
            bytes[at..at + GLYPH_BYTES as usize].copy_from_slice(glyph);
        }
        Self { bytes }
    }

    /// Copy a ROM image in at `ROM_START`.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), VmError> {
        if rom.len() > Self::ROM_CAPACITY {
            return Err(VmError::RomTooLarge {
                size: rom.len(),
                max: Self::ROM_CAPACITY,
            });
        }
        let start = Self::ROM_START as usize;
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Where the glyph for a hex digit lives.
    pub fn glyph_addr(digit: u8) -> u16 {
        Self::FONT_BASE + digit as u16 * GLYPH_BYTES
    }

    /// Bounds-checked read for instruction operands (sprite rows, `Fx65`).
    pub fn read(&self, addr: usize) -> Result<u8, VmError> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(VmError::MemoryOutOfBounds { addr })
    }

    /// Bounds-checked write (`Fx33`, `Fx55`).
    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), VmError> {
        match self.bytes.get_mut(addr) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(VmError::MemoryOutOfBounds { addr }),
        }
    }
}

/// Unchecked access for the fetch path, which validates `pc` up front.
impl Index<u16> for Mem {
    type Output = u8;

    fn index(&self, index: u16) -> &Self::Output {
        &self.bytes[index as usize]
    }
}

impl Debug for Mem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return self.fmt_trimmed(f);
        }

        // hexdump-style rows, with runs of zeros elided
        writeln!(f)?;
        let mut eliding = false;
        for (i, row) in self.bytes.chunks(16).enumerate() {
            if row.iter().all(|&b| b == 0) {
                if !eliding {
                    writeln!(f, "...")?;
                }
                eliding = true;
                continue;
            }
            eliding = false;

            write!(f, "{:03x}0: ", i)?;
            debug::write_row(f, row)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Mem {
    /// List form, cut after the last nonzero byte.
    fn fmt_trimmed(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let entries = self.bytes[..end].iter().copied().map(HexByte);
        f.debug_list().entries(entries).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_sits_at_0x50() {
        let mem = Mem::new();
        assert_eq!(mem.read(0x50).unwrap(), 0xF0); // top row of the 0 glyph
        assert_eq!(mem.read(0x9F).unwrap(), 0x80); // bottom row of the F glyph
        assert_eq!(mem.read(0x4F).unwrap(), 0);
        assert_eq!(mem.read(0xA0).unwrap(), 0);
    }

    #[test]
    fn glyph_addresses_step_by_five() {
        assert_eq!(Mem::glyph_addr(0x0), 0x50);
        assert_eq!(Mem::glyph_addr(0x1), 0x55);
        assert_eq!(Mem::glyph_addr(0xF), 0x9B);
    }

    #[test]
    fn rom_lands_at_0x200() {
        let mut mem = Mem::new();
        mem.load_rom(&[0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(mem.read(0x200).unwrap(), 0xAA);
        assert_eq!(mem.read(0x202).unwrap(), 0xCC);
        assert_eq!(mem.read(0x203).unwrap(), 0);
    }

    #[test]
    fn rom_may_fill_memory_exactly() {
        let mut mem = Mem::new();
        let rom = vec![0x11; Mem::ROM_CAPACITY];
        mem.load_rom(&rom).unwrap();
        assert_eq!(mem.read(0xFFF).unwrap(), 0x11);
    }

    #[test]
    fn oversized_rom_is_rejected() {
        let mut mem = Mem::new();
        let rom = vec![0x11; Mem::ROM_CAPACITY + 1];
        assert_eq!(
            mem.load_rom(&rom),
            Err(VmError::RomTooLarge {
                size: 3585,
                max: 3584
            })
        );
    }

    #[test]
    fn reads_and_writes_are_bounds_checked() {
        let mut mem = Mem::new();
        mem.write(0xFFF, 7).unwrap();
        assert_eq!(mem.read(0xFFF).unwrap(), 7);
        assert_eq!(mem.read(0x1000), Err(VmError::MemoryOutOfBounds { addr: 0x1000 }));
        assert_eq!(
            mem.write(0x1000, 7),
            Err(VmError::MemoryOutOfBounds { addr: 0x1000 })
        );
    }
}
