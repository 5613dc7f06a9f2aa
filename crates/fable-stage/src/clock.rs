/// Virtual time in milliseconds plus a frame counter.
///
/// Nothing reads the wall clock; the owner advances time explicitly, which
/// keeps every playthrough reproducible.
#[derive(Debug, Clone, Default)]
pub struct StageClock {
    now_ms: u64,
    frames: u64,
}

impl StageClock {
    /// A clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt_ms` and count one frame. Returns the new time.
    pub fn advance(&mut self, dt_ms: u64) -> u64 {
        self.now_ms += dt_ms;
        self.frames += 1;
        self.now_ms
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of frames stepped so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
