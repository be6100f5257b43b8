//! Platform abstraction layer for the looper
//!
//! The session, watcher and mount logic only talk to the host page through
//! these traits. The browser backend lives in [`web`]; tests use the doubles
//! in `crate::testing`.

use std::rc::Rc;

use looper_shared::{InsertionStrategy, LooperError, StepModel};

use crate::interaction::TrackBounds;
use crate::mount::PageRegions;
use crate::session::SharedSession;
use crate::visual::VisualFrame;

pub mod web;

/// The page's current playback element.
pub trait PlaybackHandle: 'static {
    fn current_time(&self) -> f64;

    fn seek(&self, seconds: f64);

    /// Duration in seconds; NaN while metadata is not loaded.
    fn duration(&self) -> f64;

    /// Whether the element can still be driven (e.g. still in the document).
    fn is_available(&self) -> bool {
        true
    }
}

/// The mounted slider owned by one session.
pub trait ControlView: 'static {
    fn track_bounds(&self) -> TrackBounds;

    fn render(&self, frame: &VisualFrame) -> Result<(), LooperError>;

    /// False once the host page removed the fragment from the document.
    fn is_connected(&self) -> bool;

    fn remove(&self);
}

/// Timers and rendering-frame callbacks.
pub trait Scheduler: 'static {
    /// Recurring timer guard. Dropping it cancels the timer synchronously.
    type Interval: 'static;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Interval;

    /// Run `task` before the next repaint.
    fn next_frame(&self, task: Box<dyn FnOnce()>);
}

/// Everything the attachment watcher needs from the host page.
pub trait Platform: Scheduler + PageRegions + Sized {
    /// Compared by element identity.
    type Handle: PlaybackHandle + PartialEq;
    type View: ControlView;
    /// Event listeners bound to one session. Dropping them unregisters them.
    type Bindings: 'static;

    fn find_video(&self, selector: &str) -> Option<Rc<Self::Handle>>;

    /// Whether any loop control is already in the document.
    fn control_present(&self) -> bool;

    /// Build the slider fragment at `region` with both thumbs at full span.
    fn build_control(
        &self,
        region: Self::Region,
        strategy: &InsertionStrategy,
        model: &StepModel,
    ) -> Result<Self::View, LooperError>;

    /// Wire pointer, touch and media events to the session.
    fn bind(&self, session: &SharedSession<Self>) -> Result<Self::Bindings, LooperError>;
}
