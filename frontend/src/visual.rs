use looper_shared::{StepModel, ThumbPair, format_time};

/// Everything the view writes for one thumb configuration.
/// Positions are percentages of the track length.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFrame {
    pub progress_left: f64,
    pub progress_width: f64,
    pub start_left: f64,
    pub end_left: f64,
    pub start_value: u32,
    pub end_value: u32,
    pub start_label: String,
    pub end_label: String,
}

impl VisualFrame {
    pub fn compute(thumbs: ThumbPair, model: &StepModel) -> Self {
        let start_left = model.fraction_of(thumbs.start) * 100.0;
        let end_left = model.fraction_of(thumbs.end) * 100.0;
        Self {
            progress_left: start_left,
            progress_width: end_left - start_left,
            start_left,
            end_left,
            start_value: thumbs.start,
            end_value: thumbs.end,
            start_label: format_time(model.seconds_at(thumbs.start)),
            end_label: format_time(model.seconds_at(thumbs.end)),
        }
    }
}

/// CSS percentage value, e.g. `12.5%`.
pub fn percent(value: f64) -> String {
    format!("{value}%")
}
