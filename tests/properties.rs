use chip8::{Chip8, Chip8Error, RunState};
use proptest::prelude::*;

fn machine(words: &[u16]) -> Chip8 {
    let image: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes().to_vec()).collect();
    let mut c = Chip8::with_seed(0);
    c.load(&image).unwrap();
    c
}

fn run(c: &mut Chip8, steps: usize) -> Result<(), Chip8Error> {
    for _ in 0..steps {
        c.step()?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn ld_then_add_wraps(x in 0u16..15, kk in any::<u8>(), kk2 in any::<u8>()) {
        let mut c = machine(&[0x6000 | x << 8 | kk as u16, 0x7000 | x << 8 | kk2 as u16]);
        run(&mut c, 2).unwrap();
        prop_assert_eq!(c.register(x as usize), kk.wrapping_add(kk2));
    }

    #[test]
    fn sub_sets_no_borrow_flag(a in any::<u8>(), b in any::<u8>()) {
        prop_assume!(a != b);
        // V1 = a, V2 = b, V1 -= V2
        let mut c = machine(&[0x6100 | a as u16, 0x6200 | b as u16, 0x8125]);
        run(&mut c, 3).unwrap();
        prop_assert_eq!(c.register(1), a.wrapping_sub(b));
        prop_assert_eq!(c.register(0xF), (a > b) as u8);
    }

    #[test]
    fn add_sets_carry_flag(a in any::<u8>(), b in any::<u8>()) {
        let mut c = machine(&[0x6100 | a as u16, 0x6200 | b as u16, 0x8124]);
        run(&mut c, 3).unwrap();
        prop_assert_eq!(c.register(1), a.wrapping_add(b));
        prop_assert_eq!(c.register(0xF), (a as u16 + b as u16 > 0xFF) as u8);
    }

    #[test]
    fn call_ret_resumes_after_call(target in 0x102u16..0x7FF) {
        // keep the subroutine away from the CALL at 0x200
        let target = target * 2;
        let mut image = vec![0u8; target as usize - 0x200 + 2];
        image[..2].copy_from_slice(&(0x2000 | target).to_be_bytes());
        image[target as usize - 0x200..].copy_from_slice(&[0x00, 0xEE]);
        let mut c = Chip8::with_seed(0);
        c.load(&image).unwrap();
        run(&mut c, 1).unwrap();
        prop_assert_eq!(c.pc(), target);
        run(&mut c, 1).unwrap();
        prop_assert_eq!(c.pc(), 0x202);
        prop_assert_eq!(c.stack_depth(), 0);
    }

    #[test]
    fn bcd_digits(value in any::<u8>()) {
        let mut c = machine(&[0x6300 | value as u16, 0xA400, 0xF333]);
        run(&mut c, 3).unwrap();
        let digits = &c.memory()[0x400..0x403];
        prop_assert_eq!(digits[0] as u32 * 100 + digits[1] as u32 * 10 + digits[2] as u32, value as u32);
        prop_assert!(digits.iter().all(|&d| d < 10));
    }

    #[test]
    fn draw_twice_is_identity(vx in any::<u8>(), vy in any::<u8>(), glyph in 0u16..16) {
        // V0 = glyph, V1 = vx, V2 = vy, I = font glyph, draw twice
        let mut c = machine(&[
            0x6000 | glyph,
            0x6100 | vx as u16,
            0x6200 | vy as u16,
            0xF029,
            0xD125,
            0xD125,
        ]);
        run(&mut c, 5).unwrap();
        prop_assert_eq!(c.register(0xF), 0);
        prop_assert!(c.gfx().iter().any(|&p| p));
        run(&mut c, 1).unwrap();
        prop_assert_eq!(c.register(0xF), 1);
        prop_assert!(c.gfx().iter().all(|&p| !p));
    }

    #[test]
    fn timer_decay_is_split_invariant(start in any::<u8>(), stamps in proptest::collection::vec(0u64..200, 1..20)) {
        let mut times = Vec::with_capacity(stamps.len());
        let mut now = 0;
        for d in stamps {
            now += d;
            times.push(now);
        }

        let mut split = machine(&[0x6000 | start as u16, 0xF015]);
        let mut whole = machine(&[0x6000 | start as u16, 0xF015]);
        run(&mut split, 2).unwrap();
        run(&mut whole, 2).unwrap();

        split.advance_timers(0);
        for &t in &times {
            split.advance_timers(t);
        }
        whole.advance_timers(0);
        whole.advance_timers(now);

        prop_assert_eq!(split.delay_timer(), whole.delay_timer());
        let frames = now * 60 / 1000;
        prop_assert_eq!(whole.delay_timer() as u64, (start as u64).saturating_sub(frames));
    }

    #[test]
    fn jumps_outside_program_memory_halt(addr in 0u16..0x200) {
        let mut c = machine(&[0x1000 | addr]);
        prop_assert_eq!(c.step(), Err(Chip8Error::InvalidJump { addr }));
        prop_assert_eq!(c.run_state(), RunState::Halted);
        prop_assert_eq!(c.step(), Ok(()));
    }
}

#[test]
fn oversized_rom_never_runs() {
    let mut c = Chip8::with_seed(0);
    assert!(c.load(&vec![0x12; 3600]).is_err());
    assert!(!c.is_running());
    assert!(matches!(c.fault(), Some(Chip8Error::RomTooLarge { .. })));
}
