//! Dialogue Simulator - randomized invariant checking
//!
//! Builds a random dialogue from a seed, drives random intents through a
//! session and checks after every step:
//! - the focus resolves to a question of the focused paragraph
//! - rejected requests leave model and state untouched
//! - accepted requests clear the pending selection
//! - insights change only through gated `next` boundary crossings
//! - in-paragraph moves shift the focus by exactly one question

use crate::config::{DialogueConfig, ReactionOption, SpotterReaction};
use crate::navigator::NavAction;
use crate::session::{AdvanceOutcome, DialogueSession, Intent};
use crate::state::NavigationState;
use rand::{rngs::StdRng, Rng, SeedableRng};
use socratic_model::{Dialogue, Paragraph, Question};

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of intents to drive
    pub steps: u64,
    /// Paragraphs in the generated dialogue
    pub paragraphs: usize,
    /// Upper bound on questions per paragraph
    pub max_questions: usize,
    /// Gate threshold
    pub min_reflection_chars: usize,
    /// Stop at the first violation
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            steps: 10_000,
            paragraphs: 5,
            max_questions: 4,
            min_reflection_chars: 25,
            stop_on_first_violation: true,
        }
    }
}

/// An invariant broken during simulation
#[derive(Debug, Clone)]
pub enum Violation {
    /// Focus no longer resolves
    InconsistentFocus {
        /// Step index
        step: u64,
    },
    /// A rejected request mutated model or state
    RejectedButMutated {
        /// Step index
        step: u64,
        /// Offending outcome
        outcome: AdvanceOutcome,
    },
    /// An accepted request left a pending selection behind
    PendingNotCleared {
        /// Step index
        step: u64,
    },
    /// Insights changed without a gated forward crossing
    UngatedInsightChange {
        /// Step index
        step: u64,
        /// Outcome, absent for pure selections
        outcome: Option<AdvanceOutcome>,
    },
    /// An in-paragraph move skipped or repeated questions
    IrregularStep {
        /// Step index
        step: u64,
        /// Offending outcome
        outcome: AdvanceOutcome,
    },
    /// The session refused an intent drawn from its own catalogue
    IntentFailed {
        /// Step index
        step: u64,
        /// Session error text
        error: String,
    },
}

/// Statistics for simulation
#[derive(Debug, Clone, Default)]
pub struct SimulatorStats {
    /// Intents driven
    pub steps: u64,
    /// Intents that only changed the selection
    pub selections: u64,
    /// Accepted navigation requests
    pub accepted: u64,
    /// Requests refused with a user-facing message
    pub rejected_by_gate: u64,
    /// Requests refused silently
    pub rejected_silently: u64,
    /// Paragraph boundaries crossed in either direction
    pub boundaries_crossed: u64,
    /// Insight records written
    pub insights_committed: u64,
    /// Final paragraph completions
    pub completions: u64,
}

/// Final report from simulator
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    /// Configuration the run used
    pub config: SimulatorConfig,
    /// Counters
    pub stats: SimulatorStats,
    /// Broken invariants, in order of detection
    pub violations: Vec<Violation>,
}

impl SimulatorReport {
    /// Check if simulation passed all criteria
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Generate text report
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Dialogue Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Steps: {}\n", self.stats.steps));
        report.push_str(&format!("Selections: {}\n", self.stats.selections));
        report.push_str(&format!("Accepted: {}\n", self.stats.accepted));
        report.push_str(&format!("Rejected By Gate: {}\n", self.stats.rejected_by_gate));
        report.push_str(&format!("Rejected Silently: {}\n", self.stats.rejected_silently));
        report.push_str(&format!("Boundaries Crossed: {}\n", self.stats.boundaries_crossed));
        report.push_str(&format!("Insights Committed: {}\n", self.stats.insights_committed));
        report.push_str(&format!("Completions: {}\n", self.stats.completions));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

const SHORT_REFLECTION: &str = "too short";
const LONG_REFLECTION: &str =
    "a reflection that is long enough to satisfy any reasonable reflection threshold";

/// Build a random dialogue for the given configuration
pub fn generate_dialogue(rng: &mut StdRng, config: &SimulatorConfig) -> Dialogue {
    let paragraphs = (0..config.paragraphs.max(1))
        .map(|p| {
            let questions = rng.random_range(1..=config.max_questions.max(1));
            (0..questions).fold(
                Paragraph::new(format!("p{p}"), format!("Paragraph {p}")),
                |paragraph, q| {
                    paragraph.with_question(Question::new(format!("q{q}"), format!("Question {q}?")))
                },
            )
        })
        .collect();

    Dialogue::new(format!("simulated-{}", config.seed), paragraphs)
}

fn session_config(config: &SimulatorConfig) -> DialogueConfig {
    DialogueConfig::answer()
        .with_min_reflection_chars(config.min_reflection_chars)
        .with_reaction(ReactionOption::reflective("insightful"))
        .with_reaction(ReactionOption::immediate("confused"))
        .with_spotter(SpotterReaction::new("spark", 1.0))
        .with_spotter(SpotterReaction::new("flame", 2.0))
}

fn random_reflection(rng: &mut StdRng) -> Option<String> {
    match rng.random_range(0..3) {
        0 => None,
        1 => Some(SHORT_REFLECTION.to_string()),
        _ => Some(LONG_REFLECTION.to_string()),
    }
}

fn generate_intent(rng: &mut StdRng) -> Intent {
    match rng.random_range(0..10) {
        0..=3 => Intent::Navigate {
            action: NavAction::Next,
            reflection: random_reflection(rng),
        },
        4 | 5 => Intent::Navigate {
            action: NavAction::Prev,
            reflection: None,
        },
        6 => Intent::Navigate {
            action: NavAction::ForceNext,
            reflection: None,
        },
        7 | 8 => Intent::React {
            category: if rng.random_bool(0.5) {
                "insightful".to_string()
            } else {
                "confused".to_string()
            },
            reflection: random_reflection(rng),
        },
        _ => Intent::Spot {
            name: if rng.random_bool(0.5) {
                "spark".to_string()
            } else {
                "flame".to_string()
            },
        },
    }
}

/// Run the Dialogue Simulator
pub fn run(config: SimulatorConfig) -> SimulatorReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let dialogue = generate_dialogue(&mut rng, &config);

    let mut stats = SimulatorStats::default();
    let mut violations = Vec::new();

    let mut session = match DialogueSession::open(session_config(&config), dialogue) {
        Ok(session) => session,
        Err(e) => {
            violations.push(Violation::IntentFailed {
                step: 0,
                error: e.to_string(),
            });
            return SimulatorReport {
                config,
                stats,
                violations,
            };
        }
    };

    for step in 0..config.steps {
        let intent = generate_intent(&mut rng);
        let dialogue_before = session.dialogue().clone();
        let state_before = session.state().clone();

        stats.steps += 1;
        let outcome = match session.apply(&intent) {
            Ok(outcome) => outcome,
            Err(e) => {
                violations.push(Violation::IntentFailed {
                    step,
                    error: e.to_string(),
                });
                if config.stop_on_first_violation {
                    break;
                }
                continue;
            }
        };

        let found = check_step(
            step,
            &session,
            &dialogue_before,
            &state_before,
            outcome.as_ref(),
            &mut stats,
        );
        if !found.is_empty() {
            violations.extend(found);
            if config.stop_on_first_violation {
                break;
            }
        }
    }

    SimulatorReport {
        config,
        stats,
        violations,
    }
}

fn check_step(
    step: u64,
    session: &DialogueSession,
    dialogue_before: &Dialogue,
    state_before: &NavigationState,
    outcome: Option<&AdvanceOutcome>,
    stats: &mut SimulatorStats,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let dialogue = session.dialogue();
    let state = session.state();

    if !state.is_consistent_with(dialogue) {
        violations.push(Violation::InconsistentFocus { step });
    }

    let insights_changed = dialogue_before
        .paragraphs
        .iter()
        .zip(&dialogue.paragraphs)
        .any(|(a, b)| a.insight != b.insight);

    let Some(outcome) = outcome else {
        stats.selections += 1;
        if insights_changed {
            violations.push(Violation::UngatedInsightChange {
                step,
                outcome: None,
            });
        }
        return violations;
    };

    if !outcome.accepted {
        if outcome.message.is_some() {
            stats.rejected_by_gate += 1;
        } else {
            stats.rejected_silently += 1;
        }
        if dialogue != dialogue_before || state != state_before {
            violations.push(Violation::RejectedButMutated {
                step,
                outcome: outcome.clone(),
            });
        }
        return violations;
    }

    stats.accepted += 1;
    if outcome.crossed_paragraph_boundary {
        stats.boundaries_crossed += 1;
    }
    if outcome.completed {
        stats.completions += 1;
    }

    if !state.pending.is_empty() {
        violations.push(Violation::PendingNotCleared { step });
    }

    let gated_forward = outcome.action == NavAction::Next
        && (outcome.crossed_paragraph_boundary || outcome.completed);
    if gated_forward {
        stats.insights_committed += 1;
        if dialogue.insight(&state_before.current_paragraph_id).is_none() {
            violations.push(Violation::UngatedInsightChange {
                step,
                outcome: Some(outcome.clone()),
            });
        }
    } else if insights_changed {
        violations.push(Violation::UngatedInsightChange {
            step,
            outcome: Some(outcome.clone()),
        });
    }

    if !outcome.crossed_paragraph_boundary && !outcome.completed {
        let before = dialogue_before
            .paragraph(&state_before.current_paragraph_id)
            .and_then(|p| p.question_index(&state_before.current_question_id));
        let after = dialogue
            .paragraph(&state.current_paragraph_id)
            .and_then(|p| p.question_index(&state.current_question_id));
        let regular = match (before, after, outcome.action) {
            (Some(b), Some(a), NavAction::Prev) => a + 1 == b,
            (Some(b), Some(a), _) => a == b + 1,
            _ => false,
        };
        if !regular || state.current_paragraph_id != state_before.current_paragraph_id {
            violations.push(Violation::IrregularStep {
                step,
                outcome: outcome.clone(),
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_passes() {
        let report = run(SimulatorConfig {
            steps: 2_000,
            ..Default::default()
        });

        assert!(report.passed(), "{}", report.generate_text());
        assert_eq!(report.stats.steps, 2_000);
        assert!(report.stats.accepted > 0);
        assert!(report.stats.rejected_by_gate > 0);
        assert!(report.stats.boundaries_crossed > 0);
    }

    #[test]
    fn rejection_that_touches_pending_is_a_violation() {
        let config = SimulatorConfig::default();
        let dialogue = generate_dialogue(&mut StdRng::seed_from_u64(1), &config);
        let mut session = DialogueSession::open(session_config(&config), dialogue).unwrap();
        let dialogue_before = session.dialogue().clone();
        let mut state_before = session.state().clone();
        state_before.pending.category = Some("insightful".to_string());

        let outcome = session.advance(NavAction::Prev, None);
        assert!(!outcome.accepted);

        let mut stats = SimulatorStats::default();
        let violations = check_step(
            0,
            &session,
            &dialogue_before,
            &state_before,
            Some(&outcome),
            &mut stats,
        );

        assert!(matches!(
            violations.as_slice(),
            [Violation::RejectedButMutated { step: 0, .. }]
        ));
        assert_eq!(stats.rejected_silently, 1);
    }

    #[test]
    fn same_seed_same_dialogue() {
        let config = SimulatorConfig::default();
        let a = generate_dialogue(&mut StdRng::seed_from_u64(7), &config);
        let b = generate_dialogue(&mut StdRng::seed_from_u64(7), &config);

        assert_eq!(a, b);
        assert_eq!(a.len(), config.paragraphs);
    }

    #[test]
    fn report_text_states_result() {
        let report = run(SimulatorConfig {
            steps: 50,
            seed: 3,
            ..Default::default()
        });

        let text = report.generate_text();
        assert!(text.contains("Seed: 3"));
        assert!(text.contains("=== Result: PASS ==="));
    }
}
