/// Render-loop frame metadata.
///
/// Frames are driven by the host's animation-frame timestamps. The first
/// tick has a zero delta; later deltas are clamped so a backgrounded tab
/// does not produce one huge step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt_s: f64,
    /// Host timestamp of this frame (milliseconds).
    pub timestamp_ms: f64,
}

pub const MAX_FRAME_DT_S: f64 = 0.25;

impl Frame {
    pub fn first(timestamp_ms: f64) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            timestamp_ms,
        }
    }

    pub fn next(self, timestamp_ms: f64) -> Self {
        let dt_s = ((timestamp_ms - self.timestamp_ms) / 1000.0).clamp(0.0, MAX_FRAME_DT_S);
        Self {
            index: self.index + 1,
            dt_s,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Default)]
pub struct FrameClock {
    current: Option<Frame>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, timestamp_ms: f64) -> Frame {
        let frame = match self.current {
            Some(prev) => prev.next(timestamp_ms),
            None => Frame::first(timestamp_ms),
        };
        self.current = Some(frame);
        frame
    }

    pub fn current(&self) -> Option<Frame> {
        self.current
    }

    pub fn frame_index(&self) -> u64 {
        self.current.map(|f| f.index).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameClock, MAX_FRAME_DT_S};

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        let f = clock.tick(1000.0);
        assert_eq!(f.index, 0);
        assert_eq!(f.dt_s, 0.0);
    }

    #[test]
    fn next_advances_index_and_delta() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0);
        let f1 = clock.tick(1016.0);
        assert_eq!(f1.index, 1);
        assert!((f1.dt_s - 0.016).abs() < 1e-9);
        assert_eq!(clock.frame_index(), 1);
    }

    #[test]
    fn long_pauses_are_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        let f = clock.tick(10_000.0);
        assert_eq!(f.dt_s, MAX_FRAME_DT_S);
    }

    #[test]
    fn time_going_backwards_is_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(500.0);
        assert_eq!(clock.tick(400.0).dt_s, 0.0);
    }
}
