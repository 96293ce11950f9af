//! The navigation state machine
//!
//! States are `(paragraph, question)` pairs. A transition is planned against
//! an immutable view of the model and state, then committed in one step, so
//! a rejected request never leaves partial mutation behind.
//!
//! | from | action | result |
//! |---|---|---|
//! | inner question | `next` / `force-next` / `prev` | neighbouring question, same paragraph |
//! | last question | `next` | gate, record insight, first question of next paragraph |
//! | last question | `force-next` | first question of next paragraph, nothing recorded |
//! | first question | `prev` | last question of previous paragraph |
//! | last question of the dialogue | `next` | gate, record insight, [`TransitionKind::Completed`] |
//! | last question of the dialogue, insight recorded, nothing selected | `next` | [`NavigationError::SequenceExhausted`] |
//! | last question of the dialogue | `force-next` | [`NavigationError::SequenceExhausted`] |
//! | first question of the dialogue | `prev` | [`NavigationError::SequenceExhausted`] |

use crate::error::NavigationError;
use crate::gate::ValidationGate;
use crate::state::{Focus, NavigationState};
use serde::{Deserialize, Serialize};
use socratic_model::{Dialogue, InsightRecord};
use std::fmt;
use std::str::FromStr;

/// Navigation action tokens raised by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavAction {
    /// Forward, gated at the paragraph boundary
    Next,
    /// Backward, never gated
    Prev,
    /// Forward, bypassing the gate
    ForceNext,
}

impl NavAction {
    /// Every action, for exhaustive iteration
    pub const ALL: [NavAction; 3] = [NavAction::Next, NavAction::Prev, NavAction::ForceNext];

    /// Direction of travel
    #[inline]
    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            NavAction::Next | NavAction::ForceNext => Direction::Forward,
            NavAction::Prev => Direction::Backward,
        }
    }

    /// Token as used in markup and scripts
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NavAction::Next => "next",
            NavAction::Prev => "prev",
            NavAction::ForceNext => "force-next",
        }
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown action token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown navigation action: '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for NavAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(NavAction::Next),
            "prev" => Ok(NavAction::Prev),
            "force-next" => Ok(NavAction::ForceNext),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Direction of travel through the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the end
    Forward,
    /// Toward the start
    Backward,
}

impl Direction {
    fn step(self, index: usize) -> Option<usize> {
        match self {
            Direction::Forward => index.checked_add(1),
            Direction::Backward => index.checked_sub(1),
        }
    }
}

/// Shape of an accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
    /// Focus moved within the same paragraph
    WithinParagraph,
    /// Focus moved into the adjacent paragraph
    ParagraphBoundary,
    /// Final paragraph's insight recorded; focus unchanged
    Completed,
}

/// Result of an accepted transition, for the renderer to apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Action that produced this transition
    pub action: NavAction,
    /// Focus before the transition; the renderer clears its highlight
    pub from: Focus,
    /// Focus after the transition
    pub to: Focus,
    /// Within a paragraph, across a boundary, or completion
    pub kind: TransitionKind,
    /// Whether `to` is the last question of its paragraph
    pub is_at_paragraph_end: bool,
    /// Whether an insight record was written for `from.paragraph_id`
    pub insight_committed: bool,
}

impl Transition {
    /// Whether the carousel/stepper should move to another paragraph
    #[inline]
    #[must_use]
    pub fn crossed_paragraph_boundary(&self) -> bool {
        self.kind == TransitionKind::ParagraphBoundary
    }

    /// Whether the final paragraph was completed
    #[inline]
    #[must_use]
    pub fn completed(&self) -> bool {
        self.kind == TransitionKind::Completed
    }
}

/// Planned, not yet committed, transition
#[derive(Debug)]
struct Plan {
    to: Focus,
    kind: TransitionKind,
    insight: Option<InsightRecord>,
}

/// Drives transitions over an explicitly owned model and state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    gate: ValidationGate,
}

impl Navigator {
    /// Navigator with the given gate
    #[inline]
    #[must_use]
    pub fn new(gate: ValidationGate) -> Self {
        Self { gate }
    }

    /// Navigator with a gate using `chars` as reflection threshold
    #[inline]
    #[must_use]
    pub fn with_min_reflection_chars(chars: usize) -> Self {
        Self::new(ValidationGate::new(chars))
    }

    /// The gate applied at forward boundaries
    #[inline]
    #[must_use]
    pub fn gate(&self) -> &ValidationGate {
        &self.gate
    }

    /// Record a reaction selection without transitioning
    ///
    /// Replaces all three pending fields.
    pub fn select_insight_category(
        &self,
        state: &mut NavigationState,
        category: impl Into<String>,
        requires_reflection: Option<bool>,
        value: Option<f64>,
    ) {
        let category = category.into();
        tracing::debug!(%category, ?requires_reflection, ?value, "insight category selected");

        state.pending.category = Some(category);
        state.pending.requires_reflection = requires_reflection;
        state.pending.value = value;
    }

    /// Record the weight of a spotted insight icon without transitioning
    pub fn spot_insight(&self, state: &mut NavigationState, value: f64) {
        tracing::debug!(value, "insight spotted");
        state.pending.value = Some(value);
    }

    /// Apply one navigation action
    ///
    /// `reflection` is only consulted by `next` at a paragraph boundary.
    ///
    /// # Errors
    /// Any error leaves `dialogue` and `state` unchanged:
    /// - [`NavigationError::MalformedState`] when the focus does not resolve
    /// - [`NavigationError::InsightNotSelected`] / [`NavigationError::ReflectionTooShort`]
    ///   when the gate rejects a `next` boundary crossing
    /// - [`NavigationError::SequenceExhausted`] at either end of the dialogue
    pub fn advance(
        &self,
        dialogue: &mut Dialogue,
        state: &mut NavigationState,
        action: NavAction,
        reflection: Option<&str>,
    ) -> Result<Transition, NavigationError> {
        let plan = match self.plan(dialogue, state, action, reflection) {
            Ok(plan) => plan,
            Err(err @ NavigationError::MalformedState { .. }) => {
                tracing::warn!(%action, error = %err, "navigation aborted");
                return Err(err);
            }
            Err(err) => {
                tracing::debug!(%action, error = %err, "navigation rejected");
                return Err(err);
            }
        };

        Ok(Self::commit(dialogue, state, action, plan))
    }

    fn plan(
        &self,
        dialogue: &Dialogue,
        state: &NavigationState,
        action: NavAction,
        reflection: Option<&str>,
    ) -> Result<Plan, NavigationError> {
        let malformed = || NavigationError::MalformedState {
            paragraph: state.current_paragraph_id.clone(),
            question: state.current_question_id.clone(),
        };

        let paragraph_index = dialogue
            .paragraph_index(&state.current_paragraph_id)
            .ok_or_else(malformed)?;
        let paragraph = &dialogue.paragraphs[paragraph_index];
        let question_index = paragraph
            .question_index(&state.current_question_id)
            .ok_or_else(malformed)?;
        let direction = action.direction();

        if let Some(question) = direction
            .step(question_index)
            .and_then(|i| paragraph.question_at(i))
        {
            return Ok(Plan {
                to: Focus::new(paragraph.id.clone(), question.id.clone()),
                kind: TransitionKind::WithinParagraph,
                insight: None,
            });
        }

        let neighbour = direction
            .step(paragraph_index)
            .and_then(|i| dialogue.paragraph_at(i));

        // A completed dialogue has nothing left to record without a new selection
        if neighbour.is_none() && paragraph.insight.is_some() && state.pending.category.is_none() {
            return Err(NavigationError::SequenceExhausted);
        }

        let insight = match action {
            NavAction::Next => Some(self.gate.admit(&state.pending, reflection)?),
            NavAction::Prev | NavAction::ForceNext => None,
        };

        let Some(neighbour) = neighbour else {
            return match insight {
                Some(record) => Ok(Plan {
                    to: state.focus(),
                    kind: TransitionKind::Completed,
                    insight: Some(record),
                }),
                None => Err(NavigationError::SequenceExhausted),
            };
        };

        let entry = match direction {
            Direction::Forward => neighbour.first_question(),
            Direction::Backward => neighbour.last_question(),
        };
        // Only reachable for unvalidated models with an empty paragraph
        let entry = entry.ok_or(NavigationError::SequenceExhausted)?;

        Ok(Plan {
            to: Focus::new(neighbour.id.clone(), entry.id.clone()),
            kind: TransitionKind::ParagraphBoundary,
            insight,
        })
    }

    fn commit(
        dialogue: &mut Dialogue,
        state: &mut NavigationState,
        action: NavAction,
        plan: Plan,
    ) -> Transition {
        let from = state.focus();

        let insight_committed = match plan.insight {
            Some(record) => {
                tracing::info!(
                    paragraph = %from.paragraph_id,
                    category = %record.category,
                    "insight recorded"
                );
                dialogue.set_insight(&from.paragraph_id, record).is_some()
            }
            None => false,
        };

        state.current_paragraph_id = plan.to.paragraph_id.clone();
        state.current_question_id = plan.to.question_id.clone();
        state.pending.clear();

        let is_at_paragraph_end = state.is_at_paragraph_end(dialogue);

        match plan.kind {
            TransitionKind::ParagraphBoundary => {
                tracing::info!(%action, %from, to = %plan.to, "paragraph boundary crossed");
            }
            TransitionKind::Completed => {
                tracing::info!(paragraph = %from.paragraph_id, "dialogue completed");
            }
            TransitionKind::WithinParagraph => {
                tracing::debug!(%action, %from, to = %plan.to, "question changed");
            }
        }

        Transition {
            action,
            from,
            to: plan.to,
            kind: plan.kind,
            is_at_paragraph_end,
            insight_committed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socratic_model::{Paragraph, ParagraphId, Question, QuestionId};

    fn setup() -> (Dialogue, NavigationState) {
        let mut dialogue = Dialogue::new(
            "t",
            vec![
                Paragraph::new("a", "")
                    .with_question(Question::new("q1", ""))
                    .with_question(Question::new("q2", "")),
                Paragraph::new("b", "").with_question(Question::new("q1", "")),
            ],
        );
        dialogue.prepare().unwrap();
        let state = NavigationState::from_dialogue(&dialogue).unwrap();
        (dialogue, state)
    }

    fn at(paragraph: &str, question: &str) -> Focus {
        Focus::new(ParagraphId::new(paragraph), QuestionId::new(question))
    }

    #[test]
    fn parses_action_tokens() {
        for action in NavAction::ALL {
            assert_eq!(action.as_str().parse::<NavAction>().unwrap(), action);
        }
        assert!("skip".parse::<NavAction>().is_err());
    }

    #[test]
    fn inner_next_moves_one_question() {
        let (mut dialogue, mut state) = setup();
        let nav = Navigator::default();

        let t = nav
            .advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap();

        assert_eq!(t.from, at("a", "q1"));
        assert_eq!(t.to, at("a", "q2"));
        assert_eq!(t.kind, TransitionKind::WithinParagraph);
        assert!(t.is_at_paragraph_end);
        assert!(!t.insight_committed);
        assert_eq!(dialogue.insights().count(), 0);
    }

    #[test]
    fn example_auto_advance_records_insight() {
        let (mut dialogue, mut state) = setup();
        let nav = Navigator::default();
        nav.advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap();

        nav.select_insight_category(&mut state, "confused", Some(false), None);
        let t = nav
            .advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap();

        assert_eq!(t.to, at("b", "q1"));
        assert!(t.crossed_paragraph_boundary());
        assert!(t.insight_committed);
        assert_eq!(
            dialogue.insight(&ParagraphId::new("a")).unwrap().category,
            "confused"
        );
        assert!(state.pending.is_empty());
    }

    #[test]
    fn malformed_focus_is_rejected_without_change() {
        let (mut dialogue, _) = setup();
        let mut state = NavigationState::new(at("a", "missing"));
        let before = state.clone();

        let err = Navigator::default()
            .advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap_err();

        assert!(matches!(err, NavigationError::MalformedState { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn next_after_completion_is_exhausted() {
        let (mut dialogue, _) = setup();
        let mut state = NavigationState::new(at("b", "q1"));
        let nav = Navigator::default();
        nav.select_insight_category(&mut state, "confused", Some(false), None);
        nav.advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap();
        let before = (dialogue.clone(), state.clone());

        let err = nav
            .advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap_err();

        assert_eq!(err, NavigationError::SequenceExhausted);
        assert!(err.is_silent());
        assert_eq!((dialogue.clone(), state.clone()), before);

        nav.select_insight_category(&mut state, "insightful", Some(false), None);
        let t = nav
            .advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap();
        assert!(t.completed());
        assert_eq!(
            dialogue.insight(&ParagraphId::new("b")).unwrap().category,
            "insightful"
        );
    }

    #[test]
    fn completion_keeps_focus_and_clears_pending() {
        let (mut dialogue, _) = setup();
        let mut state = NavigationState::new(at("b", "q1"));
        let nav = Navigator::default();
        nav.select_insight_category(&mut state, "confused", Some(false), Some(1.0));

        let t = nav
            .advance(&mut dialogue, &mut state, NavAction::Next, None)
            .unwrap();

        assert!(t.completed());
        assert!(!t.crossed_paragraph_boundary());
        assert_eq!(t.to, at("b", "q1"));
        assert!(state.pending.is_empty());
        assert_eq!(
            dialogue.insight(&ParagraphId::new("b")).unwrap().value,
            Some(1.0)
        );
    }
}
