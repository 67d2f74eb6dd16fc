use thiserror::Error;

/// Conditions that end a run.
///
/// The machine executes one trusted ROM per process and there is no recovery
/// path: every variant here stops the interpreter with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VmError {
    /// The fetched word matches no known instruction form.
    #[error("unrecognized opcode {opcode:#06x}")]
    UnknownOpcode { opcode: u16 },

    /// The ROM image does not fit in the space above 0x200.
    #[error("ROM is {size} bytes, at most {max} fit")]
    RomTooLarge { size: usize, max: usize },

    /// A seventeenth nested call.
    #[error("call stack overflow")]
    StackOverflow,

    /// Return with no call in flight.
    #[error("call stack underflow")]
    StackUnderflow,

    /// An instruction operand addressed memory past 0xFFF.
    #[error("memory access out of bounds at {addr:#07x}")]
    MemoryOutOfBounds { addr: usize },

    /// The program counter left addressable memory.
    #[error("program counter out of bounds at {pc:#07x}")]
    PcOutOfBounds { pc: u16 },
}
