//! Frame and delay scheduling
//!
//! The reveal never blocks: it asks the host for "the next display refresh"
//! or "a callback in N milliseconds" and gets back a cancellable handle.
//! Hosts with their own frame loop implement [`FrameScheduler`]; headless
//! hosts and tests drive [`ManualScheduler`] from an explicit clock.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct FrameHandle;
    pub struct DelayHandle;
}

/// A scheduled callback that became due
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wakeup {
    Frame(FrameHandle),
    Delay(DelayHandle),
}

/// Wakeups returned from a single poll
pub type Wakeups = SmallVec<[Wakeup; 4]>;

/// Host scheduling primitives used by the reveal driver
pub trait FrameScheduler {
    /// Request a callback on the next display refresh
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending frame request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Request a callback after `delay_ms` milliseconds
    fn schedule_delay(&mut self, delay_ms: f64) -> DelayHandle;

    /// Cancel a pending delay. Unknown or already-fired handles are ignored.
    fn cancel_delay(&mut self, handle: DelayHandle);

    /// Collect every callback due at `now_ms`, removing it from the queue.
    ///
    /// Delays come first, in deadline order, followed by frames.
    fn poll(&mut self, now_ms: f64) -> Wakeups;

    /// Report the host's current time without polling.
    ///
    /// Delays scheduled afterwards are measured from `now_ms`. Schedulers
    /// that read their own clock ignore this.
    fn set_now(&mut self, _now_ms: f64) {}
}

/// Scheduler driven by an explicit host clock
pub struct ManualScheduler {
    frames: SlotMap<FrameHandle, ()>,
    delays: SlotMap<DelayHandle, f64>,
    now_ms: f64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            frames: SlotMap::with_key(),
            delays: SlotMap::with_key(),
            now_ms: 0.0,
        }
    }

    /// The latest host time seen by `poll` or `set_now`
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_delays(&self) -> usize {
        self.delays.len()
    }

    /// Check if anything is still waiting to fire
    pub fn has_pending(&self) -> bool {
        !self.frames.is_empty() || !self.delays.is_empty()
    }

    /// Earliest pending delay deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.delays.values().copied().reduce(f64::min)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.frames.insert(())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.remove(handle);
    }

    fn schedule_delay(&mut self, delay_ms: f64) -> DelayHandle {
        self.delays.insert(self.now_ms + delay_ms.max(0.0))
    }

    fn cancel_delay(&mut self, handle: DelayHandle) {
        self.delays.remove(handle);
    }

    fn poll(&mut self, now_ms: f64) -> Wakeups {
        self.now_ms = self.now_ms.max(now_ms);

        let mut due: SmallVec<[(f64, DelayHandle); 4]> = self
            .delays
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now_ms)
            .map(|(handle, deadline)| (*deadline, handle))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut wakeups = Wakeups::new();
        for (_, handle) in due {
            self.delays.remove(handle);
            wakeups.push(Wakeup::Delay(handle));
        }
        for handle in self.frames.keys().collect::<SmallVec<[FrameHandle; 2]>>() {
            self.frames.remove(handle);
            wakeups.push(Wakeup::Frame(handle));
        }
        wakeups
    }

    fn set_now(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_fire_on_next_poll() {
        let mut scheduler = ManualScheduler::new();
        let frame = scheduler.request_frame();
        assert_eq!(scheduler.pending_frames(), 1);

        let wakeups = scheduler.poll(16.0);
        assert_eq!(wakeups.as_slice(), &[Wakeup::Frame(frame)]);
        assert!(!scheduler.has_pending());

        // Fired handles do not fire twice
        assert!(scheduler.poll(32.0).is_empty());
    }

    #[test]
    fn test_delay_fires_at_deadline() {
        let mut scheduler = ManualScheduler::new();
        scheduler.poll(100.0);
        let delay = scheduler.schedule_delay(250.0);
        assert_eq!(scheduler.next_deadline(), Some(350.0));

        assert!(scheduler.poll(300.0).is_empty());
        assert_eq!(scheduler.poll(350.0).as_slice(), &[Wakeup::Delay(delay)]);
        assert_eq!(scheduler.pending_delays(), 0);
    }

    #[test]
    fn test_delays_before_frames() {
        let mut scheduler = ManualScheduler::new();
        let frame = scheduler.request_frame();
        let late = scheduler.schedule_delay(20.0);
        let early = scheduler.schedule_delay(10.0);

        let wakeups = scheduler.poll(30.0);
        assert_eq!(
            wakeups.as_slice(),
            &[Wakeup::Delay(early), Wakeup::Delay(late), Wakeup::Frame(frame)]
        );
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = ManualScheduler::new();
        let frame = scheduler.request_frame();
        let delay = scheduler.schedule_delay(5.0);

        scheduler.cancel_frame(frame);
        scheduler.cancel_delay(delay);
        // Cancelling twice is harmless
        scheduler.cancel_frame(frame);

        assert!(!scheduler.has_pending());
        assert!(scheduler.poll(1000.0).is_empty());
    }

    #[test]
    fn test_delay_measured_from_host_time() {
        let mut scheduler = ManualScheduler::new();
        scheduler.poll(100.0);

        // Idle gap with no polls, then the host reports the time
        scheduler.set_now(5000.0);
        let delay = scheduler.schedule_delay(250.0);
        assert_eq!(scheduler.next_deadline(), Some(5250.0));

        assert!(scheduler.poll(5249.0).is_empty());
        assert_eq!(scheduler.poll(5250.0).as_slice(), &[Wakeup::Delay(delay)]);

        // The clock never runs backwards
        scheduler.set_now(10.0);
        assert_eq!(scheduler.now_ms(), 5250.0);
    }
}
