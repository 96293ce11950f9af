//! One dialogue instance: model, cursor, configuration and history
//!
//! Each session exclusively owns its data, so any number of sessions can
//! coexist without shared state.

use crate::config::{DialogueConfig, DialogueMode};
use crate::error::{FailureKind, NavigationError, SessionError};
use crate::journal::TransitionJournal;
use crate::navigator::{NavAction, Navigator, Transition};
use crate::render::Renderer;
use crate::state::{Focus, NavigationState, PendingInsight};
use serde::{Deserialize, Serialize};
use socratic_model::{Dialogue, DialogueId, InsightRecord, ModelError, ParagraphId, QuestionId};

/// Renderer-facing report of one navigation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceOutcome {
    /// Requested action
    pub action: NavAction,
    /// Whether the request was accepted
    pub accepted: bool,
    /// Failure classification when rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Message to show the user for gate rejections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Focused paragraph after the request
    pub paragraph_id: ParagraphId,
    /// Focused question after the request
    pub question_id: QuestionId,
    /// Whether a paragraph boundary was crossed
    pub crossed_paragraph_boundary: bool,
    /// Whether the focused question is the last of its paragraph
    pub is_at_paragraph_end: bool,
    /// Whether the final paragraph was just completed
    pub completed: bool,
}

impl AdvanceOutcome {
    fn accepted(transition: &Transition) -> Self {
        Self {
            action: transition.action,
            accepted: true,
            failure: None,
            message: None,
            paragraph_id: transition.to.paragraph_id.clone(),
            question_id: transition.to.question_id.clone(),
            crossed_paragraph_boundary: transition.crossed_paragraph_boundary(),
            is_at_paragraph_end: transition.is_at_paragraph_end,
            completed: transition.completed(),
        }
    }

    fn rejected(
        action: NavAction,
        error: &NavigationError,
        dialogue: &Dialogue,
        state: &NavigationState,
    ) -> Self {
        Self {
            action,
            accepted: false,
            failure: Some(error.kind()),
            message: error.is_user_facing().then(|| error.to_string()),
            paragraph_id: state.current_paragraph_id.clone(),
            question_id: state.current_question_id.clone(),
            crossed_paragraph_boundary: false,
            is_at_paragraph_end: state.is_at_paragraph_end(dialogue),
            completed: false,
        }
    }

    /// Current focus as a pair
    #[must_use]
    pub fn focus(&self) -> Focus {
        Focus::new(self.paragraph_id.clone(), self.question_id.clone())
    }
}

/// A user intent as raised by the renderer or a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "kebab-case")]
pub enum Intent {
    /// Arrow or button navigation
    Navigate {
        /// `next`, `prev` or `force-next`
        action: NavAction,
        /// Text of the reflection area
        #[serde(default)]
        reflection: Option<String>,
    },
    /// Reaction category button
    React {
        /// Configured category
        category: String,
        /// Reflection used if the reaction auto-advances
        #[serde(default)]
        reflection: Option<String>,
    },
    /// Insight-spotter icon
    Spot {
        /// Configured spotter name
        name: String,
    },
}

/// Owned dialogue instance in answer mode
#[derive(Debug, Clone)]
pub struct DialogueSession {
    id: DialogueId,
    config: DialogueConfig,
    dialogue: Dialogue,
    state: NavigationState,
    navigator: Navigator,
    journal: TransitionJournal,
}

impl DialogueSession {
    /// Open a session, validating and normalizing the dialogue
    ///
    /// # Errors
    /// - [`SessionError::Config`] for an invalid configuration
    /// - [`SessionError::UnsupportedMode`] unless the mode is `answer`
    /// - [`SessionError::Model`] for structurally invalid dialogue data
    pub fn open(config: DialogueConfig, mut dialogue: Dialogue) -> Result<Self, SessionError> {
        config.validate()?;
        if config.mode != DialogueMode::Answer {
            return Err(SessionError::UnsupportedMode { mode: config.mode });
        }

        dialogue.prepare()?;
        let state = NavigationState::from_dialogue(&dialogue).ok_or(ModelError::Empty)?;
        let navigator = Navigator::with_min_reflection_chars(config.min_reflection_chars);
        let id = DialogueId::new();

        tracing::info!(
            %id,
            title = %dialogue.title,
            paragraphs = dialogue.len(),
            focus = %state.focus(),
            "dialogue session opened"
        );

        Ok(Self {
            id,
            config,
            dialogue,
            state,
            navigator,
            journal: TransitionJournal::new(),
        })
    }

    /// Apply one navigation action and report the outcome
    pub fn advance(&mut self, action: NavAction, reflection: Option<&str>) -> AdvanceOutcome {
        let from = self.state.focus();
        match self
            .navigator
            .advance(&mut self.dialogue, &mut self.state, action, reflection)
        {
            Ok(transition) => {
                self.journal.record_transition(&transition);
                AdvanceOutcome::accepted(&transition)
            }
            Err(err) => {
                self.journal.record_rejection(action, from, &err);
                AdvanceOutcome::rejected(action, &err, &self.dialogue, &self.state)
            }
        }
    }

    /// Set the pending selection directly
    pub fn select_insight_category(
        &mut self,
        category: impl Into<String>,
        requires_reflection: Option<bool>,
        value: Option<f64>,
    ) {
        self.navigator
            .select_insight_category(&mut self.state, category, requires_reflection, value);
    }

    /// Select a configured reaction
    ///
    /// Keeps any spotted value. A reaction that needs no reflection
    /// auto-advances with `next` and returns that outcome, but only on the
    /// last question of a paragraph; elsewhere the selection is kept for
    /// the boundary.
    pub fn choose_reaction(
        &mut self,
        category: &str,
        reflection: Option<&str>,
    ) -> Result<Option<AdvanceOutcome>, SessionError> {
        let reaction = self
            .config
            .reaction(category)
            .ok_or_else(|| SessionError::UnknownReaction {
                category: category.to_string(),
            })?;
        let requires_reflection = reaction.requires_reflection;
        let value = self.state.pending.value;

        self.navigator.select_insight_category(
            &mut self.state,
            category,
            Some(requires_reflection),
            value,
        );

        if requires_reflection || !self.is_at_paragraph_end() {
            Ok(None)
        } else {
            Ok(Some(self.advance(NavAction::Next, reflection)))
        }
    }

    /// Select a configured insight spotter, returning its value
    pub fn spot_insight(&mut self, name: &str) -> Result<f64, SessionError> {
        let value = self
            .config
            .spotter(name)
            .map(|s| s.value)
            .ok_or_else(|| SessionError::UnknownSpotter {
                name: name.to_string(),
            })?;

        self.navigator.spot_insight(&mut self.state, value);
        Ok(value)
    }

    /// Run one intent
    ///
    /// Returns the navigation outcome if the intent caused one.
    pub fn apply(&mut self, intent: &Intent) -> Result<Option<AdvanceOutcome>, SessionError> {
        match intent {
            Intent::Navigate { action, reflection } => {
                Ok(Some(self.advance(*action, reflection.as_deref())))
            }
            Intent::React {
                category,
                reflection,
            } => self.choose_reaction(category, reflection.as_deref()),
            Intent::Spot { name } => self.spot_insight(name).map(|_| None),
        }
    }

    /// Run one intent and hand the result to a renderer
    pub fn dispatch<R: Renderer + ?Sized>(
        &mut self,
        intent: &Intent,
        renderer: &mut R,
    ) -> Result<Option<AdvanceOutcome>, SessionError> {
        let pending_before = self.state.pending.clone();
        let outcome = self.apply(intent)?;

        if let Some(outcome) = &outcome {
            renderer.render(outcome);
        } else if self.state.pending != pending_before {
            renderer.selection_changed(&self.state.pending);
        }
        Ok(outcome)
    }

    /// Whether `text` would satisfy the reflection gate
    #[must_use]
    pub fn reflection_ready(&self, text: &str) -> bool {
        self.navigator.gate().reflection_ready(text)
    }

    /// Instance id
    #[must_use]
    pub fn id(&self) -> DialogueId {
        self.id
    }

    /// Current focus
    #[must_use]
    pub fn focus(&self) -> Focus {
        self.state.focus()
    }

    /// Whether the focused question is the last of its paragraph
    #[must_use]
    pub fn is_at_paragraph_end(&self) -> bool {
        self.state.is_at_paragraph_end(&self.dialogue)
    }

    /// Current pending selection
    #[must_use]
    pub fn pending(&self) -> &PendingInsight {
        &self.state.pending
    }

    /// Navigation state
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Dialogue model
    #[must_use]
    pub fn dialogue(&self) -> &Dialogue {
        &self.dialogue
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Insight recorded for a paragraph
    #[must_use]
    pub fn insight(&self, paragraph: &ParagraphId) -> Option<&InsightRecord> {
        self.dialogue.insight(paragraph)
    }

    /// Navigation history
    #[must_use]
    pub fn journal(&self) -> &TransitionJournal {
        &self.journal
    }

    /// Pretty JSON of the model, in source data shape
    pub fn export_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(&self.dialogue)?)
    }

    /// Consume the session, returning the model
    #[must_use]
    pub fn into_dialogue(self) -> Dialogue {
        self.dialogue
    }
}
