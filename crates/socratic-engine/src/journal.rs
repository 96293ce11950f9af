//! Append-only record of navigation requests

use crate::error::{FailureKind, NavigationError};
use crate::navigator::{NavAction, Transition};
use crate::state::Focus;
use serde::{Deserialize, Serialize};

/// One navigation request and how it ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Position in the journal, starting at 0
    pub seq: u64,
    /// Requested action
    pub action: NavAction,
    /// Focus when the request arrived
    pub from: Focus,
    /// Focus afterwards (equal to `from` when rejected)
    pub to: Focus,
    /// Whether the request was accepted
    pub accepted: bool,
    /// Failure classification for rejected requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Whether a paragraph boundary was crossed
    pub crossed_paragraph_boundary: bool,
    /// Whether an insight was recorded
    pub insight_committed: bool,
}

/// Navigation history of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionJournal {
    entries: Vec<JournalEntry>,
}

impl TransitionJournal {
    /// Empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Append an accepted transition
    pub fn record_transition(&mut self, transition: &Transition) -> &JournalEntry {
        let entry = JournalEntry {
            seq: self.next_seq(),
            action: transition.action,
            from: transition.from.clone(),
            to: transition.to.clone(),
            accepted: true,
            failure: None,
            crossed_paragraph_boundary: transition.crossed_paragraph_boundary(),
            insight_committed: transition.insight_committed,
        };
        self.push(entry)
    }

    /// Append a rejected request
    pub fn record_rejection(
        &mut self,
        action: NavAction,
        focus: Focus,
        error: &NavigationError,
    ) -> &JournalEntry {
        let entry = JournalEntry {
            seq: self.next_seq(),
            action,
            from: focus.clone(),
            to: focus,
            accepted: false,
            failure: Some(error.kind()),
            crossed_paragraph_boundary: false,
            insight_committed: false,
        };
        self.push(entry)
    }

    fn push(&mut self, entry: JournalEntry) -> &JournalEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// All entries in order
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of accepted requests
    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.entries.iter().filter(|e| e.accepted).count()
    }

    /// Number of rejected requests of the given kind
    #[must_use]
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.entries
            .iter()
            .filter(|e| e.failure == Some(kind))
            .count()
    }
}
