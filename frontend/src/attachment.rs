//! Attachment watcher: follows the page's video element across host
//! re-renders and single-page navigations.
//!
//! Every mutation batch (and one eager pass at startup) re-checks the page.
//! A video that differs by identity from the tracked one triggers a full
//! re-attachment: the previous session is detached and its listeners are
//! released before anything new is mounted.

use std::rc::Rc;

use futures::{Stream, StreamExt};
use looper_shared::{LooperConfig, LooperError, StepModel};

use crate::logging;
use crate::mount::choose_insertion;
use crate::platform::{ControlView, Platform, PlaybackHandle};
use crate::session::{LoopSession, SharedSession};

/// Result of one page check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    NoVideo,
    Unchanged,
    Mounted,
    /// Some loop control is already in the document.
    AlreadyPresent,
    MissingAnchor,
    Failed,
}

struct MountedSession<P: Platform> {
    session: SharedSession<P>,
    bindings: P::Bindings,
}

pub struct AttachmentWatcher<P: Platform> {
    platform: Rc<P>,
    config: Rc<LooperConfig>,
    tracked: Option<Rc<P::Handle>>,
    mounted: Option<MountedSession<P>>,
}

impl<P: Platform> AttachmentWatcher<P> {
    pub fn new(platform: Rc<P>, config: Rc<LooperConfig>) -> Self {
        Self {
            platform,
            config,
            tracked: None,
            mounted: None,
        }
    }

    /// Check eagerly, then once per mutation batch until the stream ends.
    /// Each batch item carries the number of mutation records.
    pub async fn run<S>(mut self, mut batches: S)
    where
        S: Stream<Item = u32> + Unpin,
    {
        self.check();
        while let Some(records) = batches.next().await {
            logging::debug_throttled(format_args!("page mutated ({records} records)"));
            self.check();
        }
        self.release();
    }

    pub fn check(&mut self) -> CheckOutcome {
        let Some(video) = self.platform.find_video(&self.config.playback.video_selector) else {
            return CheckOutcome::NoVideo;
        };

        let replaced = self
            .tracked
            .as_ref()
            .is_none_or(|tracked| **tracked != *video);
        if replaced {
            log::info!("video element attached");
            self.release();
            self.tracked = Some(video);
            return self.mount();
        }

        let connected = self
            .mounted
            .as_ref()
            .map(|mounted| mounted.session.borrow().view().is_connected());
        match connected {
            Some(true) => CheckOutcome::Unchanged,
            Some(false) => {
                log::debug!("loop controls were removed by the page, remounting");
                self.release_session();
                self.mount()
            }
            None => self.mount(),
        }
    }

    pub fn session(&self) -> Option<&SharedSession<P>> {
        self.mounted.as_ref().map(|mounted| &mounted.session)
    }

    pub fn tracked(&self) -> Option<&Rc<P::Handle>> {
        self.tracked.as_ref()
    }

    /// Drop the tracked handle together with its session.
    pub fn release(&mut self) {
        self.release_session();
        self.tracked = None;
    }

    fn release_session(&mut self) {
        if let Some(MountedSession { session, bindings }) = self.mounted.take() {
            session.borrow_mut().detach();
            drop(bindings);
        }
    }

    fn mount(&mut self) -> CheckOutcome {
        let Some(handle) = self.tracked.clone() else {
            return CheckOutcome::NoVideo;
        };
        if self.platform.control_present() {
            return CheckOutcome::AlreadyPresent;
        }

        match self.mount_session(handle) {
            Ok(mounted) => {
                self.mounted = Some(mounted);
                CheckOutcome::Mounted
            }
            Err(LooperError::MissingAnchor) => {
                logging::debug_throttled(format_args!("no insertion point yet, waiting for the page"));
                CheckOutcome::MissingAnchor
            }
            Err(error) => {
                log::warn!("could not mount loop controls: {error}");
                CheckOutcome::Failed
            }
        }
    }

    fn mount_session(&self, handle: Rc<P::Handle>) -> Result<MountedSession<P>, LooperError> {
        let (strategy, region) = choose_insertion(&*self.platform, &self.config.mount.strategies)
            .ok_or(LooperError::MissingAnchor)?;

        let model = StepModel::for_duration(handle.duration());
        let view = self.platform.build_control(region, strategy, &model)?;
        let session = LoopSession::attach(
            Rc::clone(&self.platform),
            handle,
            view,
            &self.config.looping,
        );

        let bindings = match self.platform.bind(&session) {
            Ok(bindings) => bindings,
            Err(error) => {
                session.borrow_mut().detach();
                return Err(error);
            }
        };

        log::info!("loop controls mounted at {}", strategy.selector);
        Ok(MountedSession { session, bindings })
    }
}
