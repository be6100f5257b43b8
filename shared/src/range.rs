use serde::{Deserialize, Serialize};

use crate::step_model::StepModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Thumb {
    Start,
    End,
}

/// Step values of both thumbs.
///
/// `start < end` holds after every [`ThumbPair::move_thumb`] on an ordered
/// pair. A [`DurationChangePolicy::ResetEnd`] refit can leave `start` past
/// `end`; End drags stay capped at `step_count` then, so only a Start drag
/// restores the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbPair {
    pub start: u32,
    pub end: u32,
}

impl ThumbPair {
    pub fn full_span(model: &StepModel) -> Self {
        Self {
            start: 0,
            end: model.step_count(),
        }
    }

    pub fn value(&self, thumb: Thumb) -> u32 {
        match thumb {
            Thumb::Start => self.start,
            Thumb::End => self.end,
        }
    }

    /// Any configuration other than `0..step_count`.
    pub fn is_custom(&self, model: &StepModel) -> bool {
        self.start > 0 || self.end < model.step_count()
    }

    /// Move one thumb to `candidate`, keeping it strictly on its side of the
    /// other thumb. Returns whether the value changed.
    pub fn move_thumb(&mut self, thumb: Thumb, candidate: u32, model: &StepModel) -> bool {
        let previous = *self;
        match thumb {
            Thumb::Start => {
                self.start = candidate.min(self.end.saturating_sub(1));
            }
            Thumb::End => {
                self.end = candidate.max(self.start + 1).min(model.step_count());
            }
        }
        *self != previous
    }

    pub fn loop_range(&self, model: &StepModel) -> LoopRange {
        LoopRange {
            start_seconds: model.seconds_at(self.start),
            end_seconds: model.seconds_at(self.end),
        }
    }

    /// Re-fit the thumbs after the step model changed from `old` to `new`.
    pub fn refit(&mut self, policy: DurationChangePolicy, old: &StepModel, new: &StepModel) {
        match policy {
            DurationChangePolicy::ResetEnd => {
                self.end = new.step_count();
            }
            DurationChangePolicy::Rescale => {
                if !self.is_custom(old) {
                    *self = Self::full_span(new);
                    return;
                }
                let max = new.step_count();
                let rescale = |value: u32| {
                    let seconds = old.seconds_at(value);
                    ((seconds / new.step_size_seconds()).round() as u32).min(max)
                };
                let end = rescale(self.end).max(1);
                let start = rescale(self.start).min(end - 1);
                self.start = start;
                self.end = end;
            }
        }
    }
}

/// Loop boundaries in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopRange {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl LoopRange {
    /// Seek target for a playback position, if the position has reached the end.
    pub fn seek_target(&self, current_time: f64) -> Option<f64> {
        (current_time >= self.end_seconds).then_some(self.start_seconds)
    }
}

/// What happens to the thumbs when the duration becomes known or changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationChangePolicy {
    /// End thumb jumps to the new maximum; start keeps its step value.
    #[default]
    ResetEnd,
    /// Both thumbs keep their time meaning under the new step size.
    Rescale,
}
