//! Boundary enforcement for the active loop range.
//!
//! While active, a recurring check seeks playback back to the loop start
//! whenever it reaches the loop end. The range lives in a shared cell that
//! only the session writes and only the check reads.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use looper_shared::LoopRange;

use crate::logging;
use crate::platform::{PlaybackHandle, Scheduler};

pub struct LoopController<I> {
    range: Rc<Cell<LoopRange>>,
    /// At most one recurring check per controller.
    interval: Option<I>,
    period_ms: u32,
}

impl<I: 'static> LoopController<I> {
    pub fn new(period_ms: u32) -> Self {
        Self {
            range: Rc::new(Cell::new(LoopRange::default())),
            interval: None,
            period_ms,
        }
    }

    pub fn set_range(&self, range: LoopRange) {
        self.range.set(range);
    }

    pub fn range(&self) -> LoopRange {
        self.range.get()
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    pub fn activate<S, H>(&mut self, scheduler: &S, handle: &Rc<H>)
    where
        S: Scheduler<Interval = I>,
        H: PlaybackHandle,
    {
        if self.is_active() {
            return;
        }
        let handle = Rc::downgrade(handle);
        let range = Rc::clone(&self.range);
        self.interval = Some(scheduler.every(
            self.period_ms,
            Box::new(move || {
                enforce_boundary(&handle, range.get());
            }),
        ));
    }

    /// Stops the recurring check before returning.
    pub fn deactivate(&mut self) {
        self.interval = None;
    }
}

/// One tick of the recurring check. Returns whether playback was moved.
///
/// A handle that went away or left the page makes the tick a no-op.
pub fn enforce_boundary<H: PlaybackHandle>(handle: &Weak<H>, range: LoopRange) -> bool {
    let Some(handle) = handle.upgrade() else {
        return false;
    };
    if !handle.is_available() {
        return false;
    }
    match range.seek_target(handle.current_time()) {
        Some(target) => {
            logging::debug_throttled(format_args!("loop end reached, seeking to {target}s"));
            handle.seek(target);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePlatform, FakeVideo};

    fn range(start_seconds: f64, end_seconds: f64) -> LoopRange {
        LoopRange {
            start_seconds,
            end_seconds,
        }
    }

    #[test]
    fn reaching_loop_end_seeks_back_exactly_once() {
        let platform = FakePlatform::new();
        let video = Rc::new(FakeVideo::new(1, 90.0));
        let mut looping = LoopController::new(100);
        looping.set_range(range(10.0, 80.0));
        looping.activate(&platform, &video);

        video.play_to(79.0);
        platform.fire_intervals();
        assert!(video.seeks().is_empty());

        video.play_to(80.0);
        platform.fire_intervals();
        platform.fire_intervals();
        assert_eq!(video.seeks(), vec![10.0]);
        assert_eq!(video.current_time(), 10.0);
    }

    #[test]
    fn activation_keeps_a_single_interval() {
        let platform = FakePlatform::new();
        let video = Rc::new(FakeVideo::new(1, 90.0));
        let mut looping = LoopController::new(100);

        looping.activate(&platform, &video);
        looping.activate(&platform, &video);
        assert_eq!(platform.live_intervals(), 1);
        assert_eq!(platform.interval_periods(), vec![100]);
    }

    #[test]
    fn deactivate_stops_ticks_synchronously() {
        let platform = FakePlatform::new();
        let video = Rc::new(FakeVideo::new(1, 90.0));
        let mut looping = LoopController::new(100);
        looping.set_range(range(0.0, 5.0));
        looping.activate(&platform, &video);

        looping.deactivate();
        assert!(!looping.is_active());
        assert_eq!(platform.live_intervals(), 0);

        video.play_to(30.0);
        platform.fire_intervals();
        assert!(video.seeks().is_empty());
    }

    #[test]
    fn missing_handle_makes_ticks_no_ops() {
        let platform = FakePlatform::new();
        let video = Rc::new(FakeVideo::new(1, 90.0));
        let mut looping = LoopController::new(100);
        looping.set_range(range(0.0, 5.0));
        looping.activate(&platform, &video);

        video.play_to(30.0);
        video.set_available(false);
        platform.fire_intervals();
        assert!(video.seeks().is_empty());

        let weak = Rc::downgrade(&video);
        drop(video);
        platform.fire_intervals();
        assert!(looping.is_active());
        assert!(!enforce_boundary(&weak, range(0.0, 5.0)));
    }

    #[test]
    fn range_updates_are_seen_by_the_running_check() {
        let platform = FakePlatform::new();
        let video = Rc::new(FakeVideo::new(1, 90.0));
        let mut looping = LoopController::new(100);
        looping.set_range(range(0.0, 50.0));
        looping.activate(&platform, &video);

        looping.set_range(range(20.0, 40.0));
        video.play_to(45.0);
        platform.fire_intervals();
        assert_eq!(video.seeks(), vec![20.0]);
    }
}
