//! Navigation state: the cursor plus the in-progress insight selection

use serde::{Deserialize, Serialize};
use socratic_model::{Dialogue, ParagraphId, QuestionId};
use std::fmt;

/// A `(paragraph, question)` position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    /// Current paragraph
    pub paragraph_id: ParagraphId,
    /// Current question within that paragraph
    pub question_id: QuestionId,
}

impl Focus {
    /// Create a focus pair
    #[must_use]
    pub fn new(paragraph_id: ParagraphId, question_id: QuestionId) -> Self {
        Self {
            paragraph_id,
            question_id,
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.paragraph_id, self.question_id)
    }
}

/// Insight selection made before the paragraph boundary is crossed
///
/// All fields are reset after every successful transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInsight {
    /// Selected reaction category
    pub category: Option<String>,
    /// `None` is treated like `Some(true)` by the gate
    pub requires_reflection: Option<bool>,
    /// Weight of the spotted insight icon
    pub value: Option<f64>,
}

impl PendingInsight {
    /// Whether nothing has been selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.requires_reflection.is_none() && self.value.is_none()
    }

    /// Reset every field to unset
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Mutable cursor of one dialogue instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    /// Paragraph holding the focused question
    pub current_paragraph_id: ParagraphId,
    /// Focused question
    pub current_question_id: QuestionId,
    /// In-progress insight selection
    #[serde(default)]
    pub pending: PendingInsight,
}

impl NavigationState {
    /// State focused on `focus` with nothing pending
    #[must_use]
    pub fn new(focus: Focus) -> Self {
        Self {
            current_paragraph_id: focus.paragraph_id,
            current_question_id: focus.question_id,
            pending: PendingInsight::default(),
        }
    }

    /// Initial state of a dialogue
    ///
    /// Focuses the active paragraph's active question, falling back to the
    /// first paragraph and first question. `None` when the dialogue has no
    /// question to focus.
    #[must_use]
    pub fn from_dialogue(dialogue: &Dialogue) -> Option<Self> {
        let paragraph = dialogue
            .active_paragraph()
            .or_else(|| dialogue.paragraph_at(0))?;
        let question = paragraph
            .active_question()
            .or_else(|| paragraph.first_question())?;

        Some(Self::new(Focus::new(
            paragraph.id.clone(),
            question.id.clone(),
        )))
    }

    /// Current focus
    #[must_use]
    pub fn focus(&self) -> Focus {
        Focus::new(
            self.current_paragraph_id.clone(),
            self.current_question_id.clone(),
        )
    }

    /// Whether the focused question is the last of its paragraph
    ///
    /// `false` when the focus does not resolve.
    #[must_use]
    pub fn is_at_paragraph_end(&self, dialogue: &Dialogue) -> bool {
        dialogue
            .paragraph(&self.current_paragraph_id)
            .is_some_and(|p| p.is_last_question(&self.current_question_id))
    }

    /// Whether the focus resolves to a question of the focused paragraph
    #[must_use]
    pub fn is_consistent_with(&self, dialogue: &Dialogue) -> bool {
        dialogue
            .paragraph(&self.current_paragraph_id)
            .and_then(|p| p.question_index(&self.current_question_id))
            .is_some()
    }
}
