//! The machine itself: state, the fetch/decode/execute cycle, the timers.

mod fb;
mod instr;
mod mem;
mod regs;
mod stack;

pub use fb::FrameBuffer;
pub use instr::Instruction;

use crate::error::VmError;
use crate::key::Keypad;
use mem::Mem;
use regs::Regs;
use stack::CallStack;
use std::fmt::{self, Debug};

/// A CHIP-8 machine.
///
/// The driving loop owns one of these exclusively. [`Chip8::execute_cycle`]
/// runs one instruction; [`Chip8::tick_timers`] runs on its own, coarser
/// cadence. Nothing in here schedules itself or touches the outside world,
/// beyond reading the injected key state.
pub struct Chip8 {
    pc: u16,
    i: u16,
    v: Regs,
    stack: CallStack,
    mem: Mem,
    fb: FrameBuffer,
    delay_timer: u8,
    sound_timer: u8,
    should_render: bool,
    /// The word most recently fetched. Kept for state dumps.
    opcode: u16,
}

impl Chip8 {
    pub fn new() -> Self {
        Self {
            pc: Mem::ROM_START,
            i: 0,
            v: Regs::new(),
            stack: CallStack::new(),
            mem: Mem::new(),
            fb: FrameBuffer::new(),
            delay_timer: 0,
            sound_timer: 0,
            should_render: false,
            opcode: 0,
        }
    }

    /// Copy a ROM image into memory at 0x200. Call once, before the first
    /// cycle.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), VmError> {
        self.mem.load_rom(rom)?;
        log::debug!("loaded {} byte ROM at {:#05x}", rom.len(), Mem::ROM_START);
        Ok(())
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// `keys` is only read by `Ex9E`, `ExA1` and `Fx0A`. Any error is fatal:
    /// the machine must not be cycled again after one.
    pub fn execute_cycle(&mut self, keys: &dyn Keypad) -> Result<(), VmError> {
        let instr = self.fetch_and_decode()?;
        self.execute(instr, keys)
    }

    fn fetch_and_decode(&mut self) -> Result<Instruction, VmError> {
        // The second opcode byte must be addressable too.
        if self.pc as usize + 1 >= Mem::LEN {
            return Err(VmError::PcOutOfBounds { pc: self.pc });
        }
        self.opcode = u16::from_be_bytes([self.mem[self.pc], self.mem[self.pc + 1]]);
        Instruction::decode(self.opcode)
    }

    /// Dispatch one decoded instruction. Every arm leaves `pc` where the
    /// next fetch should happen; there is no shared pre-advance.
    fn execute(&mut self, instr: Instruction, keys: &dyn Keypad) -> Result<(), VmError> {
        match instr {
            Instruction::Clear => {
                self.fb.clear();
                self.should_render = true;
                self.pc += 2;
            }
            Instruction::Return => {
                self.pc = self.stack.pop()?;
                self.pc += 2;
            }
            Instruction::Sys { nnn } => {
                // Machine-code calls never worked on this interpreter's
                // predecessor either: it dropped them without advancing pc,
                // and a ROM that reaches one spins here forever.
                log::warn!(
                    "ignoring machine-code call {nnn:#05x}; pc holds at {:#05x}",
                    self.pc
                );
            }
            Instruction::Jump { nnn } => {
                self.pc = nnn;
            }
            Instruction::Call { nnn } => {
                self.stack.push(self.pc)?;
                self.pc = nnn;
            }
            Instruction::SkipEqImm { x, kk } => {
                self.skip_if(self.v[x] == kk);
            }
            Instruction::SkipNeImm { x, kk } => {
                self.skip_if(self.v[x] != kk);
            }
            Instruction::SkipEqReg { x, y } => {
                self.skip_if(self.v[x] == self.v[y]);
            }
            Instruction::SetImm { x, kk } => {
                self.v[x] = kk;
                self.pc += 2;
            }
            Instruction::AddImm { x, kk } => {
                self.v[x] = self.v[x].wrapping_add(kk);
                self.pc += 2;
            }
            Instruction::Copy { x, y } => {
                self.v[x] = self.v[y];
                self.pc += 2;
            }
            Instruction::Or { x, y } => {
                self.v[x] |= self.v[y];
                self.pc += 2;
            }
            Instruction::And { x, y } => {
                self.v[x] &= self.v[y];
                self.pc += 2;
            }
            Instruction::Xor { x, y } => {
                self.v[x] ^= self.v[y];
                self.pc += 2;
            }
            Instruction::Add { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v.set_flag(carry);
                self.v[x] = sum;
                self.pc += 2;
            }
            Instruction::Sub { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                // Strictly greater: equal operands clear the flag.
                self.v.set_flag(vx > vy);
                self.v[x] = vx.wrapping_sub(vy);
                self.pc += 2;
            }
            Instruction::ShiftRight { x } => {
                let vx = self.v[x];
                self.v.set_flag(vx & 0x01 != 0);
                self.v[x] = vx >> 1;
                self.pc += 2;
            }
            Instruction::SubFrom { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.v.set_flag(vy > vx);
                self.v[x] = vy.wrapping_sub(vx);
                self.pc += 2;
            }
            Instruction::ShiftLeft { x } => {
                let vx = self.v[x];
                self.v.set_flag(vx & 0x80 != 0);
                self.v[x] = vx << 1;
                self.pc += 2;
            }
            Instruction::SkipNeReg { x, y } => {
                self.skip_if(self.v[x] != self.v[y]);
            }
            Instruction::SetIndex { nnn } => {
                self.i = nnn;
                self.pc += 2;
            }
            Instruction::JumpOffset { nnn } => {
                // May land past 0xFFF; the next fetch reports it.
                self.pc = nnn + self.v[0] as u16;
            }
            Instruction::Random { x, kk } => {
                self.v[x] = rand::random::<u8>() & kk;
                self.pc += 2;
            }
            Instruction::Draw { x, y, n } => {
                let (col, row) = (self.v[x] as usize, self.v[y] as usize);
                let mut collision = false;
                for line in 0..n as usize {
                    let bits = self.mem.read(self.i as usize + line)?;
                    collision |= self.fb.xor_row(col, row + line, bits);
                }
                self.v.set_flag(collision);
                self.should_render = true;
                self.pc += 2;
            }
            Instruction::SkipKeyDown { x } => {
                self.skip_if(keys.is_key_down(self.v[x] & 0x0F));
            }
            Instruction::SkipKeyUp { x } => {
                self.skip_if(!keys.is_key_down(self.v[x] & 0x0F));
            }
            Instruction::ReadDelay { x } => {
                self.v[x] = self.delay_timer;
                self.pc += 2;
            }
            Instruction::WaitKey { x } => {
                // Busy-wait: with no key down, pc stays put and this same
                // instruction runs again next cycle. Timers keep ticking in
                // the meantime.
                if let Some(key) = (0..16).find(|&k| keys.is_key_down(k)) {
                    self.v[x] = key;
                    self.pc += 2;
                }
            }
            Instruction::SetDelay { x } => {
                self.delay_timer = self.v[x];
                self.pc += 2;
            }
            Instruction::SetSound { x } => {
                self.sound_timer = self.v[x];
                self.pc += 2;
            }
            Instruction::AddIndex { x } => {
                self.i = self.i.wrapping_add(self.v[x] as u16);
                self.pc += 2;
            }
            Instruction::FontGlyph { x } => {
                self.i = Mem::glyph_addr(self.v[x]);
                self.pc += 2;
            }
            Instruction::StoreBcd { x } => {
                for (offset, digit) in bcd(self.v[x]).into_iter().enumerate() {
                    self.mem.write(self.i as usize + offset, digit)?;
                }
                self.pc += 2;
            }
            Instruction::StoreRegs { x } => {
                for idx in 0..=x {
                    self.mem.write(self.i as usize + idx as usize, self.v[idx])?;
                }
                self.pc += 2;
            }
            Instruction::LoadRegs { x } => {
                for idx in 0..=x {
                    self.v[idx] = self.mem.read(self.i as usize + idx as usize)?;
                }
                self.pc += 2;
            }
        }
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        self.pc += if cond { 4 } else { 2 };
    }

    /// One tick of both countdown timers, on whatever cadence the caller
    /// keeps. Returns true while the sound timer is still running after the
    /// tick; the host turns that into noise.
    pub fn tick_timers(&mut self) -> bool {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
        self.sound_timer != 0
    }

    /// The 2048-cell framebuffer, row-major, one byte per pixel.
    pub fn framebuffer(&self) -> &[u8; FrameBuffer::CELLS] {
        self.fb.cells()
    }

    /// True when an instruction has touched the framebuffer since the last
    /// call. Reading it clears it; hosts repaint on true.
    pub fn take_render_flag(&mut self) -> bool {
        std::mem::take(&mut self.should_render)
    }
}

/// Decimal digits of a byte, hundreds first.
fn bcd(value: u8) -> [u8; 3] {
    [value / 100, value / 10 % 10, value % 10]
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Chip8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chip8")
            .field("pc", &format_args!("{:#06x}", self.pc))
            .field("i", &format_args!("{:#06x}", self.i))
            .field("opcode", &format_args!("{:#06x}", self.opcode))
            .field("v", &self.v)
            .field("stack", &self.stack)
            .field("delay_timer", &self.delay_timer)
            .field("sound_timer", &self.sound_timer)
            .field("mem", &self.mem)
            .field("fb", &self.fb)
            .finish()
    }
}
