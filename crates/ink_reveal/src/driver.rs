//! Reveal animation driver
//!
//! Owns the timeline of one reveal and the frame/delay handles it has
//! outstanding with the host scheduler. Each frame maps elapsed time to
//! progress, asks a [`FrameRenderer`] to redraw, reports progress and
//! derives the cross-fade opacity.
//!
//! ```text
//!            trigger          delay fires
//!   Idle ───────────▶ Delayed ───────────▶ Running ◀──▶ Paused
//!     │                                       │
//!     └──── trigger (animation disabled) ─────┴──▶ Complete
//! ```
//!
//! Any state can fail into `Failed` or reset back to `Idle`.

use crate::error::Result;
use ink_animation::{DelayHandle, FrameHandle, FrameScheduler, ManualScheduler, RevealTimeline, Wakeup};
use ink_core::{EventKind, RevealEvent, RevealListeners, StateMachine};

/// Lifecycle state of a reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealState {
    /// No timeline started
    Idle,
    /// Triggered, waiting for the start delay
    Delayed,
    /// Frames are advancing the timeline
    Running,
    /// Frames keep coming but the clock is frozen
    Paused,
    /// Progress reached 1
    Complete,
    /// The source image failed to load; terminal until reset
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DriverSignal {
    Trigger,
    Start,
    Pause,
    Resume,
    Finish,
    Fail,
    Reset,
}

const ALL_STATES: [RevealState; 6] = [
    RevealState::Idle,
    RevealState::Delayed,
    RevealState::Running,
    RevealState::Paused,
    RevealState::Complete,
    RevealState::Failed,
];

fn state_machine() -> StateMachine<RevealState, DriverSignal> {
    use DriverSignal::*;
    use RevealState::*;

    StateMachine::builder(Idle)
        .on(Idle, Trigger, Delayed)
        .on_any(&[Idle, Delayed], Start, Running)
        .on(Running, Pause, Paused)
        .on(Paused, Resume, Running)
        .on_any(&[Idle, Running, Paused], Finish, Complete)
        .on_any(&[Idle, Delayed, Running, Paused, Complete], Fail, Failed)
        .on_any(&ALL_STATES, Reset, Idle)
        .on_enter(Complete, || tracing::debug!("reveal complete"))
        .on_enter(Failed, || tracing::debug!("reveal failed"))
        .build()
}

/// Playback parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriverOptions {
    pub duration_ms: u32,
    /// Wait between trigger and the first running frame
    pub start_delay_ms: u32,
    /// Progress after which the final image fades in
    pub fade_in_start: f32,
    /// When false, a trigger jumps straight to `Complete`
    pub animate: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            duration_ms: 2500,
            start_delay_ms: 0,
            fade_in_start: 0.7,
            animate: true,
        }
    }
}

/// Redraws the reveal for a given progress.
///
/// Errors mean the redraw was skipped for this frame; the driver logs them
/// and keeps the timeline going.
pub trait FrameRenderer {
    fn render(&mut self, progress: f32) -> Result<()>;
}

impl<F> FrameRenderer for F
where
    F: FnMut(f32) -> Result<()>,
{
    fn render(&mut self, progress: f32) -> Result<()> {
        self(progress)
    }
}

/// Drives one reveal's timeline through a host scheduler
pub struct RevealDriver<S: FrameScheduler = ManualScheduler> {
    scheduler: S,
    fsm: StateMachine<RevealState, DriverSignal>,
    timeline: RevealTimeline,
    options: DriverOptions,
    frame: Option<FrameHandle>,
    delay: Option<DelayHandle>,
    /// Pause requested before the timeline started
    hold: bool,
    opacity: f32,
    completed: bool,
    listeners: RevealListeners,
}

impl<S: FrameScheduler> RevealDriver<S> {
    pub fn new(scheduler: S, options: DriverOptions) -> Self {
        Self {
            scheduler,
            fsm: state_machine(),
            timeline: RevealTimeline::new(options.duration_ms),
            options,
            frame: None,
            delay: None,
            hold: false,
            opacity: 0.0,
            completed: false,
            listeners: RevealListeners::new(),
        }
    }

    pub fn state(&self) -> RevealState {
        self.fsm.current_state()
    }

    pub fn options(&self) -> DriverOptions {
        self.options
    }

    /// Replace playback options. Duration changes apply from the next start.
    pub fn set_options(&mut self, options: DriverOptions) {
        self.options = options;
    }

    /// Last reported progress
    pub fn progress(&self) -> f32 {
        self.timeline.progress()
    }

    /// Opacity of the unmasked final image layer
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn timeline(&self) -> &RevealTimeline {
        &self.timeline
    }

    pub fn is_complete(&self) -> bool {
        self.fsm.is_in(RevealState::Complete)
    }

    /// Whether a frame or delay is outstanding with the scheduler
    pub fn has_pending(&self) -> bool {
        self.frame.is_some() || self.delay.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Subscribe to lifecycle events
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static,
    {
        self.listeners.on(kind, handler);
    }

    /// Subscribe to every lifecycle event
    pub fn on_any<F>(&mut self, handler: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static,
    {
        self.listeners.on_any(handler);
    }

    pub(crate) fn emit(&self, event: RevealEvent) {
        self.listeners.dispatch(&event);
    }

    /// Begin the reveal. Only meaningful from `Idle`.
    pub fn trigger(&mut self) {
        if !self.fsm.is_in(RevealState::Idle) {
            tracing::trace!(state = ?self.state(), "trigger ignored");
            return;
        }

        if !self.options.animate {
            self.timeline.restart();
            self.finish();
            return;
        }

        if self.options.start_delay_ms > 0 {
            self.fsm.send(DriverSignal::Trigger);
            self.delay = Some(
                self.scheduler
                    .schedule_delay(self.options.start_delay_ms as f64),
            );
            tracing::debug!(delay_ms = self.options.start_delay_ms, "reveal delayed");
        } else {
            self.start();
        }
    }

    /// Handle the start delay elapsing. Stale handles are ignored.
    pub fn fire_delay(&mut self, handle: DelayHandle) {
        if self.delay != Some(handle) {
            return;
        }
        self.delay = None;
        if self.fsm.is_in(RevealState::Delayed) {
            self.start();
        }
    }

    fn start(&mut self) {
        self.fsm.send(DriverSignal::Start);
        self.timeline = RevealTimeline::new(self.options.duration_ms);
        self.opacity = 0.0;
        tracing::debug!(duration_ms = self.options.duration_ms, "reveal started");
        self.emit(RevealEvent::RevealStart);

        if self.hold {
            self.fsm.send(DriverSignal::Pause);
            self.timeline.pause();
        }
        self.request_frame();
    }

    /// Freeze the clock. Requested before the start, the reveal starts paused.
    pub fn pause(&mut self) {
        self.hold = true;
        if self.fsm.is_in(RevealState::Running) {
            self.fsm.send(DriverSignal::Pause);
            self.timeline.pause();
        }
    }

    /// Continue from exactly where the clock froze
    pub fn resume(&mut self) {
        self.hold = false;
        if self.fsm.is_in(RevealState::Paused) {
            self.fsm.send(DriverSignal::Resume);
            self.timeline.resume();
            if self.frame.is_none() {
                self.request_frame();
            }
        }
    }

    /// Advance one frame at host time `now_ms`.
    ///
    /// Returns whether a redraw happened. While paused, the next frame is
    /// requested but nothing else changes.
    pub fn tick<R: FrameRenderer + ?Sized>(&mut self, now_ms: f64, renderer: &mut R) -> bool {
        // A direct call supersedes whatever frame was outstanding
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }

        match self.state() {
            RevealState::Running => {}
            RevealState::Paused => {
                self.request_frame();
                return false;
            }
            _ => return false,
        }

        let progress = self.timeline.advance(now_ms);

        let drawn = match renderer.render(progress) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, progress, "skipped redraw");
                false
            }
        };

        self.emit(RevealEvent::Progress(progress));

        if let Some(fade) = self.timeline.cross_fade(self.options.fade_in_start) {
            self.opacity = fade;
        }

        if progress >= 1.0 {
            self.finish();
        } else {
            self.request_frame();
        }
        drawn
    }

    /// Poll the scheduler and run whatever came due.
    ///
    /// Returns whether any frame redrew.
    pub fn pump<R: FrameRenderer + ?Sized>(&mut self, now_ms: f64, renderer: &mut R) -> bool {
        let mut drawn = false;
        for wakeup in self.scheduler.poll(now_ms) {
            match wakeup {
                Wakeup::Delay(handle) => self.fire_delay(handle),
                Wakeup::Frame(handle) if self.frame == Some(handle) => {
                    self.frame = None;
                    drawn |= self.tick(now_ms, renderer);
                }
                Wakeup::Frame(_) => {}
            }
        }
        drawn
    }

    fn finish(&mut self) {
        self.cancel_pending();
        self.fsm.send(DriverSignal::Finish);
        self.opacity = 1.0;
        if !self.completed {
            self.completed = true;
            self.emit(RevealEvent::RevealComplete);
        }
    }

    /// Enter the terminal `Failed` state
    pub fn fail(&mut self) {
        self.cancel_pending();
        self.fsm.send(DriverSignal::Fail);
    }

    /// Tear down the timeline and return to `Idle`
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.fsm.send(DriverSignal::Reset);
        self.timeline = RevealTimeline::new(self.options.duration_ms);
        self.opacity = 0.0;
        self.completed = false;
    }

    /// Cancel everything outstanding; nothing scheduled fires afterwards
    pub fn dispose(&mut self) {
        self.reset();
    }

    fn request_frame(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(handle) = self.delay.take() {
            self.scheduler.cancel_delay(handle);
        }
    }
}

impl<S: FrameScheduler> Drop for RevealDriver<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
