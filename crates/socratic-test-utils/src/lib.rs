//! Testing utilities for the Socratic workspace
//!
//! Shared fixtures, sessions and a recording renderer.

#![allow(missing_docs)]

use socratic_engine::{
    AdvanceOutcome, DialogueConfig, DialogueSession, PendingInsight, ReactionOption, Renderer,
    SpotterReaction,
};
use socratic_model::{Dialogue, Paragraph, Question};

/// Reflection that fails the default gate (10 chars)
pub const SHORT_REFLECTION: &str = "too brief.";

/// Reflection that passes the default gate
pub const LONG_REFLECTION: &str = "Knowing that I do not know is where thinking starts.";

/// `A{q1,q2}, B{q1}`
pub fn two_paragraph_dialogue() -> Dialogue {
    Dialogue::new(
        "Two paragraphs",
        vec![
            Paragraph::new("A", "First")
                .with_question(Question::new("q1", "What is virtue?"))
                .with_question(Question::new("q2", "Can it be taught?")),
            Paragraph::new("B", "Second").with_question(Question::new("q1", "Who teaches it?")),
        ],
    )
}

/// Dialogue with one paragraph per entry of `shape`, each holding that many questions
pub fn dialogue_with_shape(shape: &[usize]) -> Dialogue {
    let paragraphs = shape
        .iter()
        .enumerate()
        .map(|(p, &questions)| {
            (0..questions).fold(
                Paragraph::new(format!("p{p}"), format!("Paragraph {p}")),
                |paragraph, q| {
                    paragraph.with_question(Question::new(format!("q{q}"), format!("Question {q}?")))
                },
            )
        })
        .collect();
    Dialogue::new("Shaped", paragraphs)
}

/// Answer-mode config with one reflective and one immediate reaction
pub fn answer_config() -> DialogueConfig {
    DialogueConfig::answer()
        .with_reaction(ReactionOption::reflective("insightful"))
        .with_reaction(ReactionOption::immediate("confused"))
        .with_spotter(SpotterReaction::new("spark", 1.0))
        .with_spotter(SpotterReaction::new("flame", 2.5))
}

/// Open a session over `dialogue` with [`answer_config`]
pub fn open_session(dialogue: Dialogue) -> DialogueSession {
    DialogueSession::open(answer_config(), dialogue).unwrap()
}

/// Reflection of exactly `chars` characters
pub fn reflection_of(chars: usize) -> String {
    "x".repeat(chars)
}

/// Renderer that keeps everything it was handed
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub outcomes: Vec<AdvanceOutcome>,
    pub selections: Vec<PendingInsight>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, outcome: &AdvanceOutcome) {
        self.outcomes.push(outcome.clone());
    }

    fn selection_changed(&mut self, pending: &PendingInsight) {
        self.selections.push(pending.clone());
    }
}

impl RecordingRenderer {
    /// Messages of rejected outcomes, in order
    pub fn messages(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.message.as_deref())
            .collect()
    }
}
