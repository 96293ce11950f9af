//! Renderer seam
//!
//! The engine never touches presentation state. A renderer receives each
//! outcome and decides how to move highlights, slide the carousel, toggle the
//! reaction card or show a gate message.

use crate::session::AdvanceOutcome;
use crate::state::PendingInsight;

/// Presentation layer driven by session outcomes
pub trait Renderer {
    /// Apply the result of one navigation request
    fn render(&mut self, outcome: &AdvanceOutcome);

    /// React to a change of the pending insight selection
    fn selection_changed(&mut self, _pending: &PendingInsight) {}
}

/// Renderer that only emits tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn render(&mut self, outcome: &AdvanceOutcome) {
        if outcome.accepted {
            tracing::info!(
                action = %outcome.action,
                paragraph = %outcome.paragraph_id,
                question = %outcome.question_id,
                boundary = outcome.crossed_paragraph_boundary,
                paragraph_end = outcome.is_at_paragraph_end,
                "focus"
            );
        } else if let Some(message) = &outcome.message {
            tracing::info!(action = %outcome.action, %message, "navigation refused");
        }
    }

    fn selection_changed(&mut self, pending: &PendingInsight) {
        tracing::debug!(category = ?pending.category, value = ?pending.value, "selection");
    }
}
