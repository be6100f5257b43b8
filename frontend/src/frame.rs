/// Single-slot pending task for frame-aligned recomputes.
///
/// While a recompute is scheduled, further requests are dropped rather than
/// queued; the slot frees up when the scheduled pass runs.
#[derive(Debug, Default)]
pub struct PendingFrame {
    pending: bool,
}

impl PendingFrame {
    /// Claim the slot. Returns false when a pass is already scheduled.
    pub fn try_schedule(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn complete(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
