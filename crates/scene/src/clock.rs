use std::time::Duration;

use pwasson_common::CoreError;

/// One step released by the [`FrameClock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTick {
    /// Sequence number of the step, starting at 1.
    pub frame: u64,
    /// Real time since the previous frame, in seconds. Handed to the world
    /// as `dt`.
    pub dt: f32,
    /// Real time accumulated since the previous step, in seconds, remainder
    /// included. Handed to the scene handler.
    pub elapsed: f32,
}

/// Fixed-step scheduler.
///
/// Real elapsed time is accumulated on every frame. Once the accumulated time
/// strictly exceeds the interval (`1000 / max_fps` ms) a step is released and
/// the remainder modulo the interval is carried over, so the step rate does
/// not drift.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval_ms: f64,
    accumulated_ms: f64,
    frames: u64,
    fps: u32,
    paused: bool,
}

impl FrameClock {
    pub fn new(max_fps: u32) -> Result<Self, CoreError> {
        if max_fps == 0 {
            return Err(CoreError::InvalidArgument("max_fps must be at least 1".into()));
        }
        Ok(Self {
            interval_ms: 1000.0 / f64::from(max_fps),
            accumulated_ms: 0.0,
            frames: 0,
            fps: 0,
            paused: false,
        })
    }

    /// Step interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_ms / 1000.0)
    }

    /// Feed one frame's elapsed real time. Returns a step when one is due.
    pub fn tick(&mut self, elapsed: Duration) -> Option<StepTick> {
        if self.paused {
            return None;
        }

        let frame_secs = elapsed.as_secs_f64();
        self.fps = if frame_secs > 0.0 {
            (1.0 / frame_secs).floor() as u32
        } else {
            0
        };

        self.accumulated_ms += frame_secs * 1000.0;
        if self.accumulated_ms <= self.interval_ms {
            return None;
        }

        let elapsed_ms = self.accumulated_ms;
        self.accumulated_ms %= self.interval_ms;
        self.frames += 1;

        Some(StepTick {
            frame: self.frames,
            dt: frame_secs as f32,
            elapsed: (elapsed_ms / 1000.0) as f32,
        })
    }

    /// Frames per second measured from the last frame's elapsed time.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Steps released so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time carried towards the next step.
    pub fn pending(&self) -> Duration {
        Duration::from_secs_f64(self.accumulated_ms / 1000.0)
    }

    /// Stop releasing steps. Time fed while paused is dropped.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
