//! Crossterm front end: raw-mode lifecycle, the physical-to-logical key
//! map, frame painting, and the terminal bell as the sound device.

use anyhow::Result;
use chip8emu::{FrameBuffer, Keypad};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io;
use std::time::Duration;

/// What draining the input queue said about continuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Continue,
    Quit,
}

/// Pressed-state of the sixteen virtual keys, kept current by
/// [`Terminal::drain_input`].
#[derive(Debug, Default)]
pub struct Keyboard {
    pressed: [bool; 16],
}

impl Keypad for Keyboard {
    fn is_key_down(&self, key: u8) -> bool {
        self.pressed[(key & 0x0f) as usize]
    }
}

/// Translate a key from the physical keyboard into one of the 16 virtual
/// keys: the 4x4 square from `1` through `v`, in the classic arrangement
///
/// ```text
/// 1 2 3 4        1 2 3 C
/// q w e r   ->   4 5 6 D
/// a s d f        7 8 9 E
/// z x c v        A 0 B F
/// ```
fn keycode_to_chip8(c: char) -> Option<u8> {
    let key = match c.to_ascii_lowercase() {
        'x' => 0x0,
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        'q' => 0x4,
        'w' => 0x5,
        'e' => 0x6,
        'a' => 0x7,
        's' => 0x8,
        'd' => 0x9,
        'z' => 0xa,
        'c' => 0xb,
        '4' => 0xc,
        'r' => 0xd,
        'f' => 0xe,
        'v' => 0xf,
        _ => return None,
    };
    Some(key)
}

/// A raw-mode terminal session.
///
/// Construction switches the terminal over; dropping restores it, on error
/// paths too, and then prints the final frame again so it survives leaving
/// the alternate screen.
pub struct Terminal {
    keyboard: Keyboard,
    last_frame: Option<String>,
}

impl Terminal {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        io::stdout()
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?
            .execute(EnterAlternateScreen)?
            .execute(Hide)?
            .execute(Clear(ClearType::All))?;

        Ok(Self {
            keyboard: Keyboard::default(),
            last_frame: None,
        })
    }

    /// Consume pending input events into the key state. Esc or ctrl-c is a
    /// quit request.
    pub fn drain_input(&mut self) -> Result<InputStatus> {
        while event::poll(Duration::from_secs(0))? {
            let Event::Key(e) = event::read()? else {
                continue;
            };
            let pressed = match e.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => true,
                KeyEventKind::Release => false,
            };
            match e.code {
                KeyCode::Esc => return Ok(InputStatus::Quit),
                KeyCode::Char(c) => {
                    if matches!(c, 'c' | 'C') && e.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(InputStatus::Quit);
                    }
                    if let Some(k) = keycode_to_chip8(c) {
                        self.keyboard.pressed[k as usize] = pressed;
                    }
                }
                _ => {}
            }
        }
        Ok(InputStatus::Continue)
    }

    pub fn keypad(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Repaint the whole frame at the home position.
    pub fn paint(&mut self, cells: &[u8; FrameBuffer::CELLS]) -> Result<()> {
        // '█' is three bytes of utf-8.
        let mut frame = String::with_capacity(3 * FrameBuffer::CELLS + 2 * FrameBuffer::HEIGHT);
        for row in cells.chunks(FrameBuffer::WIDTH) {
            for &cell in row {
                frame.push(if cell != 0 { '█' } else { ' ' });
            }
            // Raw-mode terminals need the carriage return.
            frame.push_str("\r\n");
        }

        io::stdout().execute(MoveTo(0, 0))?.execute(Print(&frame))?;
        self.last_frame = Some(frame);
        Ok(())
    }

    /// Ring the terminal bell once.
    pub fn bell(&mut self) -> Result<()> {
        io::stdout().execute(Print('\x07'))?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        fn restore() -> Result<()> {
            // Reset the terminal mode. Otherwise it stays wonky, and you
            // have to close it and open a new one.
            io::stdout()
                .execute(Show)?
                .execute(LeaveAlternateScreen)?
                .execute(PopKeyboardEnhancementFlags)?;
            terminal::disable_raw_mode()?;
            Ok(())
        }

        // Ignore errors.
        restore().ok();

        // Leaving the alternate screen discards its contents, so print the
        // final frame again. This shows the state the machine exited in.
        if let Some(frame) = &self.last_frame {
            print!("{}", frame.replace("\r\n", "\n"));
        }
    }
}
