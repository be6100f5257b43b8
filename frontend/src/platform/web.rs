//! Browser platform implementation using `web-sys`
//!
//! Finds the page's `<video>`, builds the slider fragment, wires DOM events
//! into the session and provides `setInterval`/`requestAnimationFrame`.
//! Every listener is registered through [`Listener`], which unregisters itself
//! on drop, so releasing a session's bindings leaves nothing behind.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use looper_shared::{
    InsertionStrategy, LooperError, Placement, StepModel, Thumb, VALUE_ATTRIBUTE, class_names,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlVideoElement, MouseEvent,
    MutationObserver, MutationObserverInit, Node, TouchEvent, Window,
};

use crate::interaction::TrackBounds;
use crate::mount::PageRegions;
use crate::platform::{ControlView, Platform, PlaybackHandle, Scheduler};
use crate::relay::{Relay, RelayError};
use crate::session::{self, LoopSession, SharedSession};
use crate::visual::{VisualFrame, percent};

fn dom_error(value: JsValue) -> LooperError {
    LooperError::Dom(format!("{value:?}"))
}

// ===== PLAYBACK =====

#[derive(Clone, PartialEq)]
pub struct VideoHandle {
    element: HtmlVideoElement,
}

impl PlaybackHandle for VideoHandle {
    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn seek(&self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn is_available(&self) -> bool {
        self.element.is_connected()
    }
}

// ===== CONTROL FRAGMENT =====

pub struct DomControl {
    container: HtmlElement,
    track: HtmlElement,
    progress: HtmlElement,
    start_thumb: HtmlElement,
    end_thumb: HtmlElement,
    start_tooltip: HtmlElement,
    end_tooltip: HtmlElement,
}

impl DomControl {
    /// container > slider > track > (progress, start thumb > tooltip, end thumb > tooltip)
    fn build(document: &Document, model: &StepModel) -> Result<Self, LooperError> {
        let container = create_div(document, class_names::CONTAINER)?;
        let slider = create_div(document, class_names::SLIDER)?;
        let track = create_div(document, class_names::TRACK)?;
        let progress = create_div(document, class_names::PROGRESS)?;

        let start_thumb = create_div(
            document,
            &format!("{} {}", class_names::THUMB, class_names::THUMB_START),
        )?;
        let start_tooltip = create_div(document, class_names::TOOLTIP)?;
        start_thumb.append_child(&start_tooltip).map_err(dom_error)?;
        start_thumb.set_attribute(VALUE_ATTRIBUTE, "0").map_err(dom_error)?;

        let end_thumb = create_div(
            document,
            &format!("{} {}", class_names::THUMB, class_names::THUMB_END),
        )?;
        let end_tooltip = create_div(document, class_names::TOOLTIP)?;
        end_thumb.append_child(&end_tooltip).map_err(dom_error)?;
        end_thumb
            .set_attribute(VALUE_ATTRIBUTE, &model.step_count().to_string())
            .map_err(dom_error)?;

        track.append_child(&progress).map_err(dom_error)?;
        track.append_child(&start_thumb).map_err(dom_error)?;
        track.append_child(&end_thumb).map_err(dom_error)?;
        slider.append_child(&track).map_err(dom_error)?;
        container.append_child(&slider).map_err(dom_error)?;

        Ok(Self {
            container,
            track,
            progress,
            start_thumb,
            end_thumb,
            start_tooltip,
            end_tooltip,
        })
    }

    fn insert(&self, anchor: &Element, placement: Placement) -> Result<(), LooperError> {
        match placement {
            Placement::Before => {
                let parent = anchor.parent_node().ok_or(LooperError::MissingAnchor)?;
                let anchor_node: &Node = anchor;
                parent.insert_before(&self.container, Some(anchor_node))
            }
            Placement::FirstChild => {
                anchor.insert_before(&self.container, anchor.first_child().as_ref())
            }
            Placement::After => {
                let parent = anchor.parent_node().ok_or(LooperError::MissingAnchor)?;
                parent.insert_before(&self.container, anchor.next_sibling().as_ref())
            }
        }
        .map_err(dom_error)?;
        Ok(())
    }

    fn thumb(&self, thumb: Thumb) -> &HtmlElement {
        match thumb {
            Thumb::Start => &self.start_thumb,
            Thumb::End => &self.end_thumb,
        }
    }
}

impl ControlView for DomControl {
    fn track_bounds(&self) -> TrackBounds {
        let rect = self.track.get_bounding_client_rect();
        TrackBounds {
            left: rect.left(),
            width: rect.width(),
        }
    }

    fn render(&self, frame: &VisualFrame) -> Result<(), LooperError> {
        let progress = self.progress.style();
        progress
            .set_property("left", &percent(frame.progress_left))
            .map_err(dom_error)?;
        progress
            .set_property("width", &percent(frame.progress_width))
            .map_err(dom_error)?;

        self.start_thumb
            .style()
            .set_property("left", &percent(frame.start_left))
            .map_err(dom_error)?;
        self.end_thumb
            .style()
            .set_property("left", &percent(frame.end_left))
            .map_err(dom_error)?;

        self.start_thumb
            .set_attribute(VALUE_ATTRIBUTE, &frame.start_value.to_string())
            .map_err(dom_error)?;
        self.end_thumb
            .set_attribute(VALUE_ATTRIBUTE, &frame.end_value.to_string())
            .map_err(dom_error)?;

        self.start_tooltip.set_text_content(Some(&frame.start_label));
        self.end_tooltip.set_text_content(Some(&frame.end_label));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.container.is_connected()
    }

    fn remove(&self) {
        self.container.remove();
    }
}

fn create_div(document: &Document, class_name: &str) -> Result<HtmlElement, LooperError> {
    let element = document.create_element("div").map_err(dom_error)?;
    element.set_class_name(class_name);
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| LooperError::Dom("created div is not an HtmlElement".to_string()))
}

// ===== EVENT LISTENERS =====

/// A registered DOM listener. Dropping it removes the listener.
pub struct Listener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        event_type: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, LooperError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref());
    }
}

type WeakSession = Weak<RefCell<LoopSession<WebPlatform>>>;

fn with_session(weak: &WeakSession, action: impl FnOnce(&SharedSession<WebPlatform>)) {
    if let Some(session) = weak.upgrade() {
        action(&session);
    }
}

fn touch_client_x(event: &Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(f64::from(touch.client_x()))
}

// ===== MUTATION OBSERVER =====

/// Keeps the `MutationObserver` alive; disconnects it on drop.
pub struct MutationWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

// ===== PLATFORM =====

pub struct WebPlatform {
    window: Window,
    document: Document,
}

impl WebPlatform {
    pub fn new() -> Result<Self, LooperError> {
        let window = web_sys::window().ok_or_else(|| LooperError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| LooperError::Dom("no document".to_string()))?;
        Ok(Self { window, document })
    }

    /// Send one event per mutation batch under `document.body`. The observer
    /// disconnects itself once nobody consumes the batches.
    pub fn observe_mutations(&self, page_mutated_relay: Relay<u32>) -> Result<MutationWatch, LooperError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| LooperError::Dom("document has no body".to_string()))?;

        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |records: js_sys::Array, observer: MutationObserver| {
                let sent = page_mutated_relay.try_send(records.length());
                if let Err(RelayError::ChannelClosed) = sent {
                    log::debug!("mutation stream closed, disconnecting observer");
                    observer.disconnect();
                }
            },
        );
        let observer =
            MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(dom_error)?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(&body, &options)
            .map_err(dom_error)?;

        Ok(MutationWatch {
            observer,
            _callback: callback,
        })
    }
}

impl Scheduler for WebPlatform {
    type Interval = Interval;

    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, move || tick())
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) {
        schedule_frame(task, |callback| self.window.request_animation_frame(callback));
    }
}

/// Hand `task` to `request`; a refused request runs it right away.
fn schedule_frame(
    task: Box<dyn FnOnce()>,
    request: impl FnOnce(&js_sys::Function) -> Result<i32, JsValue>,
) {
    // Shared so the task can still run if the frame request is refused.
    let slot = Rc::new(RefCell::new(Some(task)));
    let frame_slot = Rc::clone(&slot);
    let callback = Closure::once_into_js(move || {
        if let Some(task) = frame_slot.borrow_mut().take() {
            task();
        }
    });

    if let Err(error) = request(callback.unchecked_ref()) {
        log::warn!("requestAnimationFrame failed: {error:?}");
        let task = slot.borrow_mut().take();
        if let Some(task) = task {
            task();
        }
    }
}

impl PageRegions for WebPlatform {
    type Region = Element;

    fn locate(&self, strategy: &InsertionStrategy) -> Option<Element> {
        let anchor = self
            .document
            .query_selector(&strategy.selector)
            .ok()
            .flatten()?;
        if strategy.placement.needs_parent() && anchor.parent_node().is_none() {
            return None;
        }
        Some(anchor)
    }
}

impl Platform for WebPlatform {
    type Handle = VideoHandle;
    type View = DomControl;
    type Bindings = Vec<Listener>;

    fn find_video(&self, selector: &str) -> Option<Rc<VideoHandle>> {
        let element = self.document.query_selector(selector).ok().flatten()?;
        let element = element.dyn_into::<HtmlVideoElement>().ok()?;
        Some(Rc::new(VideoHandle { element }))
    }

    fn control_present(&self) -> bool {
        let selector = format!(".{}", class_names::CONTAINER);
        matches!(self.document.query_selector(&selector), Ok(Some(_)))
    }

    fn build_control(
        &self,
        region: Element,
        strategy: &InsertionStrategy,
        model: &StepModel,
    ) -> Result<DomControl, LooperError> {
        let control = DomControl::build(&self.document, model)?;
        control.insert(&region, strategy.placement)?;
        Ok(control)
    }

    fn bind(&self, session: &SharedSession<Self>) -> Result<Vec<Listener>, LooperError> {
        let (start_thumb, end_thumb, video) = {
            let state = session.borrow();
            let video = state
                .handle()
                .ok_or(LooperError::MissingHandle)?
                .element
                .clone();
            let view = state.view();
            (
                view.thumb(Thumb::Start).clone(),
                view.thumb(Thumb::End).clone(),
                video,
            )
        };
        let document: &EventTarget = &self.document;
        let weak = Rc::downgrade(session);
        let mut listeners = Vec::new();

        // Press: element-scoped, default drag/selection suppressed.
        for (element, thumb) in [(start_thumb, Thumb::Start), (end_thumb, Thumb::End)] {
            for event_type in ["mousedown", "touchstart"] {
                let weak = weak.clone();
                listeners.push(Listener::new(&element, event_type, move |event| {
                    event.prevent_default();
                    with_session(&weak, |session| session::thumb_pressed(session, thumb));
                })?);
            }
        }

        // Move and release: document-wide so drags may leave the track.
        let mouse_weak = weak.clone();
        listeners.push(Listener::new(document, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let client_x = f64::from(event.client_x());
            with_session(&mouse_weak, |session| session::pointer_moved(session, client_x));
        })?);

        let touch_weak = weak.clone();
        listeners.push(Listener::new(document, "touchmove", move |event| {
            let Some(client_x) = touch_client_x(&event) else {
                return;
            };
            with_session(&touch_weak, |session| session::pointer_moved(session, client_x));
        })?);

        for event_type in ["mouseup", "touchend", "touchcancel"] {
            let weak = weak.clone();
            listeners.push(Listener::new(document, event_type, move |_event| {
                with_session(&weak, session::pointer_released);
            })?);
        }

        // Media: duration becomes known or changes.
        for event_type in ["loadedmetadata", "durationchange"] {
            let weak = weak.clone();
            listeners.push(Listener::new(&video, event_type, move |_event| {
                with_session(&weak, session::duration_changed);
            })?);
        }

        Ok(listeners)
    }
}
