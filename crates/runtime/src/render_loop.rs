use crate::frame::Frame;

/// 60 Hz.
pub const DEFAULT_FRAME_DT_S: f64 = 1.0 / 60.0;

#[derive(Debug, Copy, Clone, PartialEq)]
enum LoopState {
    Stopped,
    Running { next: Frame },
}

/// Cancellable frame clock. The host calls [`RenderLoop::tick`] once per
/// display refresh and draws only when it yields a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLoop {
    dt_s: f64,
    state: LoopState,
    frames_run: u64,
}

impl RenderLoop {
    pub fn new(dt_s: f64) -> Self {
        Self {
            dt_s,
            state: LoopState::Stopped,
            frames_run: 0,
        }
    }

    /// Restarts from frame 0. Starting a running loop is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.state = LoopState::Running {
            next: Frame::new(0, self.dt_s),
        };
    }

    /// Stops the loop; returns whether it was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = LoopState::Stopped;
        was_running
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Total frames produced over the loop's lifetime.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn tick(&mut self) -> Option<Frame> {
        let LoopState::Running { next } = self.state else {
            return None;
        };
        self.state = LoopState::Running { next: next.next() };
        self.frames_run += 1;
        Some(next)
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_DT_S)
    }
}

#[cfg(test)]
mod tests {
    use super::RenderLoop;

    #[test]
    fn stopped_loop_yields_nothing() {
        let mut rl = RenderLoop::default();
        assert!(!rl.is_running());
        assert_eq!(rl.tick(), None);
    }

    #[test]
    fn ticks_advance_until_cancelled() {
        let mut rl = RenderLoop::new(0.5);
        rl.start();
        assert_eq!(rl.tick().map(|f| f.index), Some(0));
        let f1 = rl.tick().expect("running");
        assert_eq!(f1.index, 1);
        assert_eq!(f1.elapsed_s, 0.5);

        assert!(rl.cancel());
        assert!(!rl.cancel());
        assert_eq!(rl.tick(), None);
        assert_eq!(rl.frames_run(), 2);
    }

    #[test]
    fn restart_begins_at_frame_zero() {
        let mut rl = RenderLoop::default();
        rl.start();
        rl.tick();
        rl.start();
        assert_eq!(rl.tick().map(|f| f.index), Some(1));

        rl.cancel();
        rl.start();
        assert_eq!(rl.tick().map(|f| f.index), Some(0));
    }
}
