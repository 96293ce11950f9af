//! Load-time normalization of active flags
//!
//! After [`Dialogue::normalize`] exactly one paragraph is active and every
//! paragraph has exactly one active question (assuming none are empty, which
//! [`Dialogue::validate`](crate::Dialogue::validate) guarantees). The first
//! flagged entry wins; when nothing is flagged the first entry is.

use crate::dialogue::{Dialogue, Paragraph};

impl Dialogue {
    /// Normalize active flags in place
    ///
    /// Idempotent. Returns `true` when any flag was changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        let mut seen_active = false;

        for paragraph in &mut self.paragraphs {
            if paragraph.is_active {
                if seen_active {
                    paragraph.is_active = false;
                    changed = true;
                } else {
                    seen_active = true;
                }
            }
            changed |= normalize_questions(paragraph);
        }

        if !seen_active {
            if let Some(first) = self.paragraphs.first_mut() {
                first.is_active = true;
                changed = true;
            }
        }

        if changed {
            tracing::debug!(title = %self.title, "normalized active flags");
        }
        changed
    }

    /// Whether the active flags already satisfy the normalization rules
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        let active_paragraphs = self.paragraphs.iter().filter(|p| p.is_active).count();
        let paragraphs_ok = self.paragraphs.is_empty() || active_paragraphs == 1;

        paragraphs_ok
            && self.paragraphs.iter().all(|p| {
                let active = p.questions.iter().filter(|q| q.is_active).count();
                p.questions.is_empty() || active == 1
            })
    }
}

fn normalize_questions(paragraph: &mut Paragraph) -> bool {
    let mut changed = false;
    let mut seen_active = false;

    for question in &mut paragraph.questions {
        if question.is_active {
            if seen_active {
                question.is_active = false;
                changed = true;
            } else {
                seen_active = true;
            }
        }
    }

    if !seen_active {
        if let Some(first) = paragraph.questions.first_mut() {
            first.is_active = true;
            changed = true;
        }
    }

    changed
}
