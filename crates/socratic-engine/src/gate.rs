//! Validation gate guarding forward paragraph boundaries
//!
//! Pure functions of the pending selection, the supplied reflection and the
//! configured threshold. No model or state access.

use crate::config::DEFAULT_MIN_REFLECTION_CHARS;
use crate::state::PendingInsight;
use socratic_model::InsightRecord;

/// Reasons the gate refuses a forward boundary crossing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    /// No reaction category selected
    #[error("Spot an insight before proceeding.")]
    InsightNotSelected,

    /// Reflection missing or not longer than the threshold
    #[error("Please complete writing reflection before proceeding.")]
    ReflectionTooShort {
        /// Threshold that must be exceeded
        min_chars: usize,
        /// Trimmed character count supplied
        actual_chars: usize,
    },
}

/// Insight and reflection checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationGate {
    min_reflection_chars: usize,
}

impl ValidationGate {
    /// Gate with the given threshold
    #[inline]
    #[must_use]
    pub fn new(min_reflection_chars: usize) -> Self {
        Self {
            min_reflection_chars,
        }
    }

    /// Configured threshold
    #[inline]
    #[must_use]
    pub fn min_reflection_chars(&self) -> usize {
        self.min_reflection_chars
    }

    /// Run both checks
    ///
    /// The category check runs first.
    pub fn check(
        &self,
        pending: &PendingInsight,
        reflection: Option<&str>,
    ) -> Result<(), GateRejection> {
        self.admit(pending, reflection).map(|_| ())
    }

    /// Run both checks and build the record to commit on success
    ///
    /// The stored content is the trimmed reflection; it is empty when none
    /// was supplied.
    pub fn admit(
        &self,
        pending: &PendingInsight,
        reflection: Option<&str>,
    ) -> Result<InsightRecord, GateRejection> {
        let category = pending
            .category
            .as_ref()
            .ok_or(GateRejection::InsightNotSelected)?;
        let content = reflection.map(str::trim).unwrap_or_default();

        if pending.requires_reflection != Some(false) && !self.reflection_ready(content) {
            return Err(GateRejection::ReflectionTooShort {
                min_chars: self.min_reflection_chars,
                actual_chars: content.chars().count(),
            });
        }

        Ok(InsightRecord {
            category: category.clone(),
            content: content.to_string(),
            value: pending.value,
        })
    }

    /// Whether `text` satisfies the reflection threshold
    ///
    /// Also drives the "show navigation while typing" affordance.
    #[must_use]
    pub fn reflection_ready(&self, text: &str) -> bool {
        let trimmed = text.trim();
        !trimmed.is_empty() && trimmed.chars().count() > self.min_reflection_chars
    }
}

impl Default for ValidationGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REFLECTION_CHARS)
    }
}
