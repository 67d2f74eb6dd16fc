mod terminal;

use anyhow::{bail, Context, Result};
use chip8emu::Chip8;
use log::{info, trace};
use std::time::{Duration, Instant};
use std::{env, fs, thread};
use terminal::{InputStatus, Terminal};

/// The reference cadence: roughly 900 instructions per second.
const INSTRUCTION_PERIOD: Duration = Duration::from_nanos(1_100_000);
/// Timer ticks at roughly 60 Hz.
const TIMER_PERIOD: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let rom_path = match args.as_slice() {
        [path] => path.clone(),
        _ => bail!("usage: chip8emu <path-to-rom>"),
    };

    let rom =
        fs::read(&rom_path).with_context(|| format!("could not read ROM {rom_path}"))?;
    let mut vm = Chip8::new();
    vm.load_rom(&rom)
        .with_context(|| format!("could not load ROM {rom_path}"))?;
    info!("running {} ({} bytes)", rom_path, rom.len());

    let mut terminal = Terminal::enter()?;
    let result = run(&mut vm, &mut terminal);

    // Restore the terminal before any error gets printed.
    drop(terminal);
    result
}

/// Drive the machine: instructions on one deadline, timer ticks on another,
/// input drained between cycles. Returns when the user asks to quit.
fn run(vm: &mut Chip8, term: &mut Terminal) -> Result<()> {
    let mut next_instruction = Instant::now();
    let mut next_tick = Instant::now();
    let mut sounding = false;

    loop {
        if term.drain_input()? == InputStatus::Quit {
            info!("quit requested");
            return Ok(());
        }

        let now = Instant::now();
        if now >= next_instruction {
            next_instruction = now + INSTRUCTION_PERIOD;
            vm.execute_cycle(term.keypad())?;
            trace!("{:#?}", vm);
            if vm.take_render_flag() {
                term.paint(vm.framebuffer())?;
            }
        }

        let now = Instant::now();
        if now >= next_tick {
            next_tick = now + TIMER_PERIOD;
            let active = vm.tick_timers();
            // The bell rings once per burst, on the rising edge.
            if active && !sounding {
                term.bell()?;
            }
            sounding = active;
        }

        sleep_until(next_instruction.min(next_tick));
    }
}

fn sleep_until(deadline: Instant) {
    thread::sleep(deadline.saturating_duration_since(Instant::now()));
}
