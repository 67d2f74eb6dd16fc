//! A CHIP-8 virtual machine.
//!
//! This crate is the interpreter core only: machine state, the
//! fetch/decode/execute cycle, and the countdown timers. Everything a host
//! has to supply, it injects or polls from outside: key state through
//! [`Keypad`], pixels through [`Chip8::framebuffer`], and the instruction
//! and timer cadences through its own clock.
//!
//! ```
//! use chip8emu::Chip8;
//!
//! let mut vm = Chip8::new();
//! vm.load_rom(&[0x60, 0x0A])?; // V0 = 10
//! vm.execute_cycle(&[false; 16])?;
//! if vm.tick_timers() {
//!     // make some noise
//! }
//! # Ok::<(), chip8emu::VmError>(())
//! ```

mod debug;
mod error;
mod key;
mod vm;

pub use error::VmError;
pub use key::Keypad;
pub use vm::{Chip8, FrameBuffer, Instruction};
