//! Socratic Dialogue Engine
//!
//! Navigation through a [`socratic_model::Dialogue`] one question at a time,
//! with an insight gate at each forward paragraph boundary.
//!
//! # Overview
//!
//! - **Navigator**: the `(paragraph, question)` state machine
//! - **Validation Gate**: category and reflection checks before a boundary
//! - **Session**: owned model, cursor, config and journal for one instance
//! - **Renderer**: presentation seam driven by [`AdvanceOutcome`]s
//! - **Simulator**: seeded random walks checking navigation invariants
//!
//! # Example
//!
//! ```rust
//! use socratic_engine::prelude::*;
//! use socratic_model::{Dialogue, Paragraph, Question};
//!
//! let dialogue = Dialogue::new("Reflection", vec![
//!     Paragraph::new("a", "Start").with_question(Question::new("q1", "Why?")),
//!     Paragraph::new("b", "End").with_question(Question::new("q1", "How?")),
//! ]);
//! let config = DialogueConfig::answer().with_reaction(ReactionOption::immediate("confused"));
//! let mut session = DialogueSession::open(config, dialogue).unwrap();
//!
//! let outcome = session.choose_reaction("confused", None).unwrap().unwrap();
//! assert!(outcome.crossed_paragraph_boundary);
//! assert_eq!(outcome.paragraph_id.as_str(), "b");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod gate;
pub mod journal;
pub mod navigator;
pub mod render;
pub mod session;
pub mod simulator;
pub mod state;

// Re-exports
pub use config::{ConfigError, DialogueConfig, DialogueMode, ReactionOption, SpotterReaction};
pub use error::{FailureKind, NavigationError, SessionError};
pub use gate::{GateRejection, ValidationGate};
pub use journal::{JournalEntry, TransitionJournal};
pub use navigator::{Direction, NavAction, Navigator, Transition, TransitionKind};
pub use render::{Renderer, TracingRenderer};
pub use session::{AdvanceOutcome, DialogueSession, Intent};
pub use state::{Focus, NavigationState, PendingInsight};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a dialogue
    pub use crate::{
        AdvanceOutcome, DialogueConfig, DialogueMode, DialogueSession, Focus, Intent, NavAction,
        NavigationError, NavigationState, Navigator, ReactionOption, Renderer, SessionError,
        SpotterReaction, Transition,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
