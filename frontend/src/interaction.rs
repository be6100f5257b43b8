//! Thumb drag state machine.
//!
//! `Idle --press(thumb)--> Dragging(thumb) --move(x)--> Dragging --release--> Idle`.
//! Mouse and touch input both land here as plain client X coordinates.

use looper_shared::{StepModel, Thumb, ThumbPair};

/// Horizontal extent of the track in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackBounds {
    pub left: f64,
    pub width: f64,
}

impl TrackBounds {
    /// Track-relative position of `client_x`, clamped to `[0, 1]`.
    /// A track without layout (zero width) maps everything to 0.
    pub fn fraction_at(&self, client_x: f64) -> f64 {
        if self.width <= 0.0 || !self.width.is_finite() {
            return 0.0;
        }
        ((client_x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Thumb),
}

impl DragState {
    pub fn press(&mut self, thumb: Thumb) {
        *self = DragState::Dragging(thumb);
    }

    pub fn release(&mut self) {
        *self = DragState::Idle;
    }

    pub fn active_thumb(&self) -> Option<Thumb> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(thumb) => Some(*thumb),
        }
    }

    /// Move the active thumb under the pointer. Returns whether a thumb value
    /// changed; moves while idle are ignored.
    pub fn drag_to(
        &self,
        client_x: f64,
        bounds: TrackBounds,
        model: &StepModel,
        thumbs: &mut ThumbPair,
    ) -> bool {
        let Some(thumb) = self.active_thumb() else {
            return false;
        };
        let candidate = model.step_at_fraction(bounds.fraction_at(client_x));
        thumbs.move_thumb(thumb, candidate, model)
    }
}
