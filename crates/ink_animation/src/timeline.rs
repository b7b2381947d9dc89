//! Reveal timeline
//!
//! Maps a monotonic host clock (milliseconds) onto normalized reveal
//! progress. The start timestamp is captured lazily on the first tick so
//! the time between scheduling and the first frame does not count.

/// Scalar playback state for one reveal
#[derive(Clone, Debug)]
pub struct RevealTimeline {
    /// Host timestamp of the first animated frame
    start_ms: Option<f64>,
    duration_ms: u32,
    /// Elapsed time as of the last running tick
    elapsed_ms: f64,
    progress: f32,
    paused: bool,
    /// Re-anchor `start_ms` on the next tick so paused time is not counted
    rebase: bool,
}

impl RevealTimeline {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            start_ms: None,
            duration_ms,
            elapsed_ms: 0.0,
            progress: 0.0,
            paused: false,
            rebase: false,
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn start_timestamp(&self) -> Option<f64> {
        self.start_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Last computed progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_started(&self) -> bool {
        self.start_ms.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Freeze the clock. Ticks while paused leave progress untouched.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unfreeze the clock; the next tick continues from the frozen progress
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.rebase = self.start_ms.is_some();
        }
    }

    /// Forget the start timestamp and progress
    pub fn restart(&mut self) {
        *self = Self::new(self.duration_ms);
    }

    /// Advance to the host timestamp `now_ms` and return the new progress.
    ///
    /// Progress never decreases, even if the host clock steps backwards.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        if self.paused {
            return self.progress;
        }

        if self.rebase {
            self.start_ms = Some(now_ms - self.elapsed_ms);
            self.rebase = false;
            tracing::trace!(elapsed_ms = self.elapsed_ms, now_ms, "timeline rebased after pause");
        }
        let start = *self.start_ms.get_or_insert(now_ms);

        let elapsed = (now_ms - start).max(0.0);
        self.elapsed_ms = self.elapsed_ms.max(elapsed);

        let progress = if self.duration_ms == 0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms as f64).min(1.0) as f32
        };
        self.progress = self.progress.max(progress);
        self.progress
    }

    /// Cross-fade opacity of the final image layer.
    ///
    /// `None` until progress passes `fade_in_start`, then ramps linearly to 1.
    pub fn cross_fade(&self, fade_in_start: f32) -> Option<f32> {
        if self.progress <= fade_in_start {
            return None;
        }
        if fade_in_start >= 1.0 {
            return Some(1.0);
        }
        Some(((self.progress - fade_in_start) / (1.0 - fade_in_start)).clamp(0.0, 1.0))
    }
}
