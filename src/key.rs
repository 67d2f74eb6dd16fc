/// Key state as seen by `Ex9E`, `ExA1` and `Fx0A`.
///
/// Key codes are the machine's logical 0x0..=0xF. How physical input maps
/// onto them is entirely the host's business; the interpreter only reads.
pub trait Keypad {
    /// Is the given logical key currently held down?
    fn is_key_down(&self, key: u8) -> bool;
}

/// Fixed key state. Handy in tests.
impl Keypad for [bool; 16] {
    fn is_key_down(&self, key: u8) -> bool {
        self[(key & 0x0f) as usize]
    }
}
