//! Error types for the navigation engine
//!
//! Nothing here is fatal:
//! - Gate rejections are shown to the user, who may retry
//! - Exhaustion and malformed focus are silent no-ops

use crate::config::{ConfigError, DialogueMode};
use crate::gate::GateRejection;
use serde::{Deserialize, Serialize};
use socratic_model::{ModelError, ParagraphId, QuestionId};

/// Why a navigation request left the state unchanged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Forward boundary attempted with no reaction category selected
    #[error("Spot an insight before proceeding.")]
    InsightNotSelected,

    /// Forward boundary attempted with an insufficient reflection
    #[error("Please complete writing reflection before proceeding.")]
    ReflectionTooShort {
        /// Threshold that must be exceeded
        min_chars: usize,
        /// Trimmed character count supplied
        actual_chars: usize,
    },

    /// No paragraph before the first or after the last
    #[error("no further question in this direction")]
    SequenceExhausted,

    /// Focus does not resolve to a question of the focused paragraph
    #[error("focus {paragraph}/{question} does not resolve")]
    MalformedState {
        /// Focused paragraph
        paragraph: ParagraphId,
        /// Focused question
        question: QuestionId,
    },
}

impl NavigationError {
    /// Classification used in outcomes and the journal
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            NavigationError::InsightNotSelected => FailureKind::InsightNotSelected,
            NavigationError::ReflectionTooShort { .. } => FailureKind::ReflectionTooShort,
            NavigationError::SequenceExhausted => FailureKind::SequenceExhausted,
            NavigationError::MalformedState { .. } => FailureKind::MalformedState,
        }
    }

    /// Gate rejections, which must be surfaced to the user
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            NavigationError::InsightNotSelected | NavigationError::ReflectionTooShort { .. }
        )
    }

    /// Failures that correspond to an absent affordance and are ignored
    #[inline]
    #[must_use]
    pub fn is_silent(&self) -> bool {
        !self.is_user_facing()
    }
}

impl From<GateRejection> for NavigationError {
    fn from(value: GateRejection) -> Self {
        match value {
            GateRejection::InsightNotSelected => NavigationError::InsightNotSelected,
            GateRejection::ReflectionTooShort {
                min_chars,
                actual_chars,
            } => NavigationError::ReflectionTooShort {
                min_chars,
                actual_chars,
            },
        }
    }
}

/// Serializable failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// See [`NavigationError::InsightNotSelected`]
    InsightNotSelected,
    /// See [`NavigationError::ReflectionTooShort`]
    ReflectionTooShort,
    /// See [`NavigationError::SequenceExhausted`]
    SequenceExhausted,
    /// See [`NavigationError::MalformedState`]
    MalformedState,
}

/// Errors raised by session setup and catalogue lookups
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Dialogue data is invalid
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration is invalid
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Sessions only navigate in answer mode
    #[error("mode '{mode}' has no navigation")]
    UnsupportedMode {
        /// Configured mode
        mode: DialogueMode,
    },

    /// Reaction category not in the configured catalogue
    #[error("unknown reaction category: '{category}'")]
    UnknownReaction {
        /// Requested category
        category: String,
    },

    /// Spotter name not in the configured catalogue
    #[error("unknown insight spotter: '{name}'")]
    UnknownSpotter {
        /// Requested spotter
        name: String,
    },

    /// Serializing the model failed
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}
