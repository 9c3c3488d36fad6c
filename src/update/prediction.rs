//! Debounced line prediction
//!
//! Each keystroke bumps the prediction generation. In insert mode it also
//! starts a timer tagged with that generation; when the timer fires and no
//! newer keystroke has arrived, the plugin predicts a continuation of the
//! current line.

use crate::commands::Cmd;
use crate::messages::PredictionMsg;
use crate::model::{AppModel, Mode};

/// Called for every key press after the mode handler ran
pub fn on_keystroke(model: &mut AppModel) -> Option<Cmd> {
    let generation = model.prediction.bump();
    if model.mode != Mode::Insert || !model.plugin.is_loaded() {
        return None;
    }
    Some(Cmd::PredictionDebounce {
        generation,
        delay_ms: model.config.prediction_debounce_ms,
    })
}

pub fn update_prediction(model: &mut AppModel, msg: PredictionMsg) -> Option<Cmd> {
    match msg {
        PredictionMsg::DebounceElapsed { generation } => {
            if !model.prediction.is_current(generation) || model.mode != Mode::Insert {
                tracing::trace!(generation, "Prediction timer superseded");
                return None;
            }
            let line = model.buffer().current_line().to_string();
            if line.trim().is_empty() {
                return None;
            }
            match model.plugin.predict(&line) {
                Ok(Some(text)) => model.prediction.offer(generation, text).then_some(Cmd::Redraw),
                Ok(None) => None,
                Err(e) => {
                    tracing::debug!(error = %e, "Prediction failed");
                    None
                }
            }
        }
    }
}
