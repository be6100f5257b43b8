//! One mounted control bound to one playback handle.
//!
//! Data flows: pointer/media events → session → (frame-coalesced) recompute →
//! loop range + visual sync + loop activation.

use std::cell::RefCell;
use std::rc::Rc;

use looper_shared::config::LoopingSection;
use looper_shared::step_model::is_known_duration;
use looper_shared::{DurationChangePolicy, LoopRange, LooperError, StepModel, Thumb, ThumbPair};

use crate::frame::PendingFrame;
use crate::interaction::DragState;
use crate::loop_controller::LoopController;
use crate::platform::{ControlView, Platform, PlaybackHandle};
use crate::visual::VisualFrame;

pub type SharedSession<P> = Rc<RefCell<LoopSession<P>>>;

pub struct LoopSession<P: Platform> {
    platform: Rc<P>,
    handle: Option<Rc<P::Handle>>,
    view: P::View,
    model: StepModel,
    thumbs: ThumbPair,
    drag: DragState,
    looping: LoopController<P::Interval>,
    frame: PendingFrame,
    policy: DurationChangePolicy,
}

impl<P: Platform> LoopSession<P> {
    /// Start a session on a freshly built view; thumbs begin at full span and
    /// a first recompute is scheduled.
    pub fn attach(
        platform: Rc<P>,
        handle: Rc<P::Handle>,
        view: P::View,
        settings: &LoopingSection,
    ) -> SharedSession<P> {
        let model = StepModel::for_duration(handle.duration());
        let session = Rc::new(RefCell::new(Self {
            platform,
            handle: Some(handle),
            view,
            model,
            thumbs: ThumbPair::full_span(&model),
            drag: DragState::default(),
            looping: LoopController::new(settings.check_interval_ms),
            frame: PendingFrame::default(),
            policy: settings.duration_change_policy,
        }));
        request_recompute(&session);
        session
    }

    /// Release everything bound to the handle: the loop check stops, pending
    /// frames become no-ops and the fragment leaves the page.
    pub fn detach(&mut self) {
        self.looping.deactivate();
        self.drag.release();
        self.handle = None;
        self.view.remove();
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&Rc<P::Handle>> {
        self.handle.as_ref()
    }

    pub fn view(&self) -> &P::View {
        &self.view
    }

    pub fn model(&self) -> StepModel {
        self.model
    }

    pub fn thumbs(&self) -> ThumbPair {
        self.thumbs
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn loop_range(&self) -> LoopRange {
        self.looping.range()
    }

    pub fn is_looping(&self) -> bool {
        self.looping.is_active()
    }

    fn press(&mut self, thumb: Thumb) {
        if self.is_attached() {
            self.drag.press(thumb);
        }
    }

    fn drag_to(&mut self, client_x: f64) -> bool {
        let bounds = self.view.track_bounds();
        self.drag.drag_to(client_x, bounds, &self.model, &mut self.thumbs)
    }

    fn refit_to_duration(&mut self) -> Result<(), LooperError> {
        let handle = self.handle.as_ref().ok_or(LooperError::MissingHandle)?;
        let duration = handle.duration();
        let model = StepModel::for_duration(duration);
        self.thumbs.refit(self.policy, &self.model, &model);
        self.model = model;
        if is_known_duration(duration) {
            Ok(())
        } else {
            Err(LooperError::MalformedDuration(duration))
        }
    }

    fn recompute(&mut self) {
        self.frame.complete();
        let Some(handle) = self.handle.clone() else {
            return;
        };

        self.looping.set_range(self.thumbs.loop_range(&self.model));

        if let Err(error) = self.view.render(&VisualFrame::compute(self.thumbs, &self.model)) {
            log::warn!("failed to render loop controls: {error}");
        }

        let custom = self.thumbs.is_custom(&self.model);
        if custom && !self.looping.is_active() {
            self.looping.activate(&*self.platform, &handle);
            let range = self.looping.range();
            log::info!("looping {}s..{}s", range.start_seconds, range.end_seconds);
        } else if !custom && self.looping.is_active() {
            self.looping.deactivate();
            log::info!("full range selected, looping off");
        }
    }
}

// === EVENT ENTRY POINTS ===

/// Begin dragging `thumb`.
pub fn thumb_pressed<P: Platform>(session: &SharedSession<P>, thumb: Thumb) {
    session.borrow_mut().press(thumb);
}

/// Pointer moved to `client_x` anywhere on the page.
pub fn pointer_moved<P: Platform>(session: &SharedSession<P>, client_x: f64) {
    let changed = session.borrow_mut().drag_to(client_x);
    if changed {
        request_recompute(session);
    }
}

pub fn pointer_released<P: Platform>(session: &SharedSession<P>) {
    session.borrow_mut().drag.release();
}

/// `loadedmetadata` / `durationchange` on the handle.
pub fn duration_changed<P: Platform>(session: &SharedSession<P>) {
    let refit = session.borrow_mut().refit_to_duration();
    match refit {
        Ok(()) => {
            let model = session.borrow().model;
            log::debug!(
                "duration known: {} steps of {}s",
                model.step_count(),
                model.step_size_seconds()
            );
        }
        Err(LooperError::MissingHandle) => return,
        Err(error) if error.is_transient() => log::debug!("{error}"),
        Err(error) => log::warn!("{error}"),
    }
    request_recompute(session);
}

/// Schedule a recompute for the next rendering frame unless one is pending.
pub fn request_recompute<P: Platform>(session: &SharedSession<P>) {
    let platform = {
        let mut state = session.borrow_mut();
        if !state.frame.try_schedule() {
            return;
        }
        Rc::clone(&state.platform)
    };

    let weak = Rc::downgrade(session);
    platform.next_frame(Box::new(move || {
        if let Some(session) = weak.upgrade() {
            session.borrow_mut().recompute();
        }
    }));
}
