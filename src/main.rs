extern crate sdl2;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use chip8::chip8::TIMER_HZ;
use chip8::{Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use clap::Parser;
use log::info;
use sdl2::event::Event;
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Keycode;
use sdl2::pixels;

#[derive(Parser, Debug)]
#[command(version, about = "Run a CHIP-8 program in an SDL window", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    #[arg(short, long, default_value_t = 700, help = "Instructions per second")]
    ips: u64,

    #[arg(short, long, default_value_t = 10, help = "Window pixels per CHIP-8 pixel")]
    scale: u32,
}

// 1 2 3 C      1 2 3 4
// 4 5 6 D  <-  Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
fn keypad(keycode: Keycode) -> Option<u8> {
    let key = match keycode {
        Keycode::Num1 => 0x1,
        Keycode::Num2 => 0x2,
        Keycode::Num3 => 0x3,
        Keycode::Num4 => 0xC,
        Keycode::Q => 0x4,
        Keycode::W => 0x5,
        Keycode::E => 0x6,
        Keycode::R => 0xD,
        Keycode::A => 0x7,
        Keycode::S => 0x8,
        Keycode::D => 0x9,
        Keycode::F => 0xE,
        Keycode::Z => 0xA,
        Keycode::X => 0x0,
        Keycode::C => 0xB,
        Keycode::V => 0xF,
        _ => return None,
    };
    Some(key)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("reading ROM {}", args.rom.display()))?;
    let mut emu = Chip8::new();
    emu.load(&rom)?;

    let scale = args.scale.max(1);
    let sdl_ctx = sdl2::init().map_err(anyhow::Error::msg)?;
    let video = sdl_ctx.video().map_err(anyhow::Error::msg)?;

    let window = video
        .window(
            "CHIP-8",
            DISPLAY_WIDTH as u32 * scale,
            DISPLAY_HEIGHT as u32 * scale,
        )
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().build()?;

    let black = pixels::Color::RGB(0, 0, 0);
    let white = pixels::Color::RGB(255, 255, 255);
    canvas.set_draw_color(black);
    canvas.clear();
    canvas.present();

    let mut event_pump = sdl_ctx.event_pump().map_err(anyhow::Error::msg)?;

    // instructions run in 60Hz batches, timers follow the wall clock
    let steps_per_frame = (args.ips / TIMER_HZ).max(1);
    let frame = Duration::from_micros(1_000_000 / TIMER_HZ);
    let start = Instant::now();
    info!(
        "Running {} [ips: {}, steps per frame: {}]",
        args.rom.display(),
        args.ips,
        steps_per_frame
    );

    'main: loop {
        let frame_start = Instant::now();

        for e in event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = keypad(k) {
                        emu.press_key(key);
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(key) = keypad(k) {
                        emu.release_key(key);
                    }
                }
                _ => {}
            }
        }

        for _ in 0..steps_per_frame {
            emu.step()?;
        }
        emu.advance_timers(start.elapsed().as_millis() as u64);

        if emu.take_draw_flag() {
            canvas.set_draw_color(black);
            canvas.clear();
            for (i, p) in emu.gfx().iter().enumerate() {
                if !*p {
                    continue;
                }
                let x = ((i % DISPLAY_WIDTH) as u32 * scale) as i16;
                let y = ((i / DISPLAY_WIDTH) as u32 * scale) as i16;
                let size = scale as i16 - 1;
                canvas
                    .box_(x, y, x + size, y + size, white)
                    .map_err(anyhow::Error::msg)?;
            }
            canvas.present();
        }

        std::thread::sleep(frame.saturating_sub(frame_start.elapsed()));
    }

    Ok(())
}
