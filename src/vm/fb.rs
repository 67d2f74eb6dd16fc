use std::fmt::{self, Debug};

/// The 64x32 monochrome framebuffer: one byte per pixel holding 0 or 1,
/// row-major. Sprite drawing addresses it as the flat array it is.
#[derive(Clone)]
pub struct FrameBuffer {
    cells: [u8; Self::CELLS],
}

impl FrameBuffer {
    pub const WIDTH: usize = 64;
    pub const HEIGHT: usize = 32;
    pub const CELLS: usize = Self::WIDTH * Self::HEIGHT;

    pub fn new() -> Self {
        Self {
            cells: [0; Self::CELLS],
        }
    }

    pub fn clear(&mut self) {
        self.cells = [0; Self::CELLS];
    }

    /// XOR one sprite row (eight bits, leftmost first) into the buffer.
    /// Returns true if any lit cell went dark.
    ///
    /// Cells are addressed flat as `x + bit + y * 64` with no coordinate
    /// wraparound, so a row crossing column 63 bleeds onto the start of the
    /// next row exactly as the reference interpreter's did. Indices past
    /// the end of the buffer are skipped.
    pub fn xor_row(&mut self, x: usize, y: usize, bits: u8) -> bool {
        let mut collision = false;
        for bit in 0..8 {
            if bits & (0x80 >> bit) == 0 {
                continue;
            }
            let Some(cell) = self.cells.get_mut(x + bit + y * Self::WIDTH) else {
                continue;
            };
            if *cell == 1 {
                collision = true;
            }
            *cell ^= 1;
        }
        collision
    }

    pub fn cells(&self) -> &[u8; Self::CELLS] {
        &self.cells
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in self.cells.chunks(Self::WIDTH) {
            for &cell in row {
                let c = if cell != 0 { '#' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_lights_set_bits() {
        let mut fb = FrameBuffer::new();
        let collision = fb.xor_row(4, 2, 0b1010_0001);
        assert!(!collision);
        assert_eq!(fb.cells()[2 * 64 + 4], 1);
        assert_eq!(fb.cells()[2 * 64 + 5], 0);
        assert_eq!(fb.cells()[2 * 64 + 6], 1);
        assert_eq!(fb.cells()[2 * 64 + 11], 1);
    }

    #[test]
    fn xor_of_lit_cells_clears_and_collides() {
        let mut fb = FrameBuffer::new();
        fb.xor_row(0, 0, 0xFF);
        let collision = fb.xor_row(0, 0, 0xFF);
        assert!(collision);
        assert!(fb.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn overlap_of_a_single_cell_is_a_collision() {
        let mut fb = FrameBuffer::new();
        fb.xor_row(0, 0, 0b0000_0001);
        let collision = fb.xor_row(7, 0, 0b1000_0000);
        assert!(collision);
    }

    #[test]
    fn row_crossing_column_63_bleeds_to_the_next_row() {
        let mut fb = FrameBuffer::new();
        fb.xor_row(60, 5, 0xFF);
        // Flat addressing carries the last four bits past column 63 into
        // row 6, columns 0..=3.
        for i in 0..4 {
            assert_eq!(fb.cells()[5 * 64 + 60 + i], 1);
            assert_eq!(fb.cells()[6 * 64 + i], 1);
        }
    }

    #[test]
    fn cells_past_the_buffer_are_skipped() {
        let mut fb = FrameBuffer::new();
        let collision = fb.xor_row(0, 32, 0xFF);
        assert!(!collision);
        assert!(fb.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn bottom_right_row_is_partially_drawn() {
        let mut fb = FrameBuffer::new();
        fb.xor_row(60, 31, 0xFF);
        for i in 0..4 {
            assert_eq!(fb.cells()[31 * 64 + 60 + i], 1);
        }
    }

    #[test]
    fn clear_turns_every_cell_off() {
        let mut fb = FrameBuffer::new();
        fb.xor_row(10, 10, 0xFF);
        fb.clear();
        assert!(fb.cells().iter().all(|&c| c == 0));
    }
}
