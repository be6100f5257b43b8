//! Test doubles for the platform layer: a scripted page, a fake video, a
//! recording view, and manually driven timers and frames.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use looper_shared::{InsertionStrategy, LooperError, StepModel};

use crate::interaction::TrackBounds;
use crate::mount::PageRegions;
use crate::platform::{ControlView, Platform, PlaybackHandle, Scheduler};
use crate::session::SharedSession;
use crate::visual::VisualFrame;

/// Track used by views the fake page builds: one pixel per step of a 90s video.
pub const FAKE_TRACK: TrackBounds = TrackBounds {
    left: 0.0,
    width: 180.0,
};

// ===== VIDEO =====

#[derive(Debug)]
pub struct FakeVideo {
    id: u32,
    current_time: Cell<f64>,
    duration: Cell<f64>,
    available: Cell<bool>,
    seeks: RefCell<Vec<f64>>,
}

impl FakeVideo {
    pub fn new(id: u32, duration: f64) -> Self {
        Self {
            id,
            current_time: Cell::new(0.0),
            duration: Cell::new(duration),
            available: Cell::new(true),
            seeks: RefCell::new(Vec::new()),
        }
    }

    pub fn play_to(&self, seconds: f64) {
        self.current_time.set(seconds);
    }

    pub fn set_duration(&self, seconds: f64) {
        self.duration.set(seconds);
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.borrow().clone()
    }
}

/// Identity is the element id, like `===` on DOM nodes.
impl PartialEq for FakeVideo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl PlaybackHandle for FakeVideo {
    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn seek(&self, seconds: f64) {
        self.seeks.borrow_mut().push(seconds);
        self.current_time.set(seconds);
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn is_available(&self) -> bool {
        self.available.get()
    }
}

// ===== VIEW =====

pub struct RecordingView {
    bounds: TrackBounds,
    frames: RefCell<Vec<VisualFrame>>,
    connected: Rc<Cell<bool>>,
}

impl RecordingView {
    pub fn new(bounds: TrackBounds) -> Self {
        Self {
            bounds,
            frames: RefCell::new(Vec::new()),
            connected: Rc::new(Cell::new(true)),
        }
    }

    pub fn render_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last_frame(&self) -> Option<VisualFrame> {
        self.frames.borrow().last().cloned()
    }
}

impl ControlView for RecordingView {
    fn track_bounds(&self) -> TrackBounds {
        self.bounds
    }

    fn render(&self, frame: &VisualFrame) -> Result<(), LooperError> {
        self.frames.borrow_mut().push(frame.clone());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn remove(&self) {
        self.connected.set(false);
    }
}

// ===== SCHEDULER =====

struct IntervalSlot {
    period_ms: u32,
    tick: Option<Box<dyn FnMut()>>,
    live: bool,
}

type IntervalSlots = Rc<RefCell<Vec<IntervalSlot>>>;

/// Cancels its slot on drop, like `clearInterval`.
pub struct ManualInterval {
    slots: IntervalSlots,
    index: usize,
}

impl Drop for ManualInterval {
    fn drop(&mut self) {
        let mut slots = self.slots.borrow_mut();
        let slot = &mut slots[self.index];
        slot.live = false;
        slot.tick = None;
    }
}

pub struct FakeBindings {
    live: Rc<Cell<bool>>,
}

impl Drop for FakeBindings {
    fn drop(&mut self) {
        self.live.set(false);
    }
}

// ===== PAGE =====

/// A scripted host page. Nothing runs until the test fires it.
#[derive(Default)]
pub struct FakePlatform {
    video: RefCell<Option<Rc<FakeVideo>>>,
    regions: RefCell<Vec<String>>,
    foreign_control: Cell<bool>,
    views: RefCell<Vec<Rc<Cell<bool>>>>,
    mounts: RefCell<Vec<String>>,
    bindings: RefCell<Vec<Rc<Cell<bool>>>>,
    intervals: IntervalSlots,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_video(&self, video: Option<Rc<FakeVideo>>) {
        *self.video.borrow_mut() = video;
    }

    pub fn add_region(&self, selector: &str) {
        self.regions.borrow_mut().push(selector.to_string());
    }

    /// Pretend another copy of the control is already in the document.
    pub fn set_foreign_control(&self, present: bool) {
        self.foreign_control.set(present);
    }

    /// Simulate the host re-rendering our fragment away.
    pub fn disconnect_views(&self) {
        for connected in self.views.borrow().iter() {
            connected.set(false);
        }
    }

    /// Selectors of every strategy a control was mounted at, in order.
    pub fn mounts(&self) -> Vec<String> {
        self.mounts.borrow().clone()
    }

    pub fn live_bindings(&self) -> usize {
        self.bindings.borrow().iter().filter(|live| live.get()).count()
    }

    pub fn live_intervals(&self) -> usize {
        self.intervals.borrow().iter().filter(|slot| slot.live).count()
    }

    pub fn interval_periods(&self) -> Vec<u32> {
        self.intervals
            .borrow()
            .iter()
            .filter(|slot| slot.live)
            .map(|slot| slot.period_ms)
            .collect()
    }

    /// Fire one tick on every live interval.
    pub fn fire_intervals(&self) {
        let count = self.intervals.borrow().len();
        for index in 0..count {
            let tick = self.intervals.borrow_mut()[index].tick.take();
            if let Some(mut tick) = tick {
                tick();
                let mut slots = self.intervals.borrow_mut();
                if slots[index].live {
                    slots[index].tick = Some(tick);
                }
            }
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Run frame callbacks until none are left.
    pub fn flush_frames(&self) {
        loop {
            let batch = std::mem::take(&mut *self.frames.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for task in batch {
                task();
            }
        }
    }
}

impl Scheduler for FakePlatform {
    type Interval = ManualInterval;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> ManualInterval {
        let mut slots = self.intervals.borrow_mut();
        slots.push(IntervalSlot {
            period_ms,
            tick: Some(tick),
            live: true,
        });
        ManualInterval {
            slots: Rc::clone(&self.intervals),
            index: slots.len() - 1,
        }
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push(task);
    }
}

impl PageRegions for FakePlatform {
    type Region = String;

    fn locate(&self, strategy: &InsertionStrategy) -> Option<String> {
        self.regions
            .borrow()
            .iter()
            .find(|selector| **selector == strategy.selector)
            .cloned()
    }
}

impl Platform for FakePlatform {
    type Handle = FakeVideo;
    type View = RecordingView;
    type Bindings = FakeBindings;

    fn find_video(&self, _selector: &str) -> Option<Rc<FakeVideo>> {
        self.video.borrow().clone()
    }

    fn control_present(&self) -> bool {
        self.foreign_control.get() || self.views.borrow().iter().any(|connected| connected.get())
    }

    fn build_control(
        &self,
        region: String,
        _strategy: &InsertionStrategy,
        _model: &StepModel,
    ) -> Result<RecordingView, LooperError> {
        let view = RecordingView::new(FAKE_TRACK);
        self.views.borrow_mut().push(Rc::clone(&view.connected));
        self.mounts.borrow_mut().push(region);
        Ok(view)
    }

    fn bind(&self, _session: &SharedSession<Self>) -> Result<FakeBindings, LooperError> {
        let live = Rc::new(Cell::new(true));
        self.bindings.borrow_mut().push(Rc::clone(&live));
        Ok(FakeBindings { live })
    }
}
