pub const TIMER_HZ: u64 = 60;
const MS_PER_SECOND: u64 = 1000;

/// Delay and sound timers, decaying at 60Hz of wall-clock time.
///
/// Elapsed time is kept in units of `1/(1000 * 60)` s so a frame is exactly
/// 1000 units and no rounding error builds up between calls.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
    last_ms: Option<u64>,
    carry: u64, // leftover frame units from previous calls, always < MS_PER_SECOND
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decays both timers by however many whole frames passed since the last
    /// call and returns that frame count. The first call only records `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> u64 {
        let last = match self.last_ms {
            Some(last) => last,
            None => {
                self.last_ms = Some(now_ms);
                return 0;
            }
        };
        // a clock that steps backwards contributes nothing
        let elapsed = now_ms.saturating_sub(last);
        self.last_ms = Some(last.max(now_ms));

        let units = elapsed.saturating_mul(TIMER_HZ).saturating_add(self.carry);
        let frames = units / MS_PER_SECOND;
        self.carry = units % MS_PER_SECOND;

        let step = frames.min(u8::MAX as u64) as u8;
        self.delay = self.delay.saturating_sub(step);
        self.sound = self.sound.saturating_sub(step);
        frames
    }
}
