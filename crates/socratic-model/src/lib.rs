//! Socratic Dialogue Model
//!
//! The data container navigated by the dialogue engine.
//!
//! # Overview
//!
//! - **Dialogue**: ordered paragraphs plus a title
//! - **Paragraph**: ordered questions plus the captured [`InsightRecord`]
//! - **Normalization**: exactly one active paragraph, one active question per paragraph
//!
//! # Example
//!
//! ```rust
//! use socratic_model::Dialogue;
//!
//! let dialogue = Dialogue::from_json_str(r#"{
//!     "title": "Reflection",
//!     "questionParagraphs": [
//!         { "id": "p1", "questions": [ { "id": "q1", "question": "Why?" } ] }
//!     ]
//! }"#).unwrap();
//!
//! assert!(dialogue.paragraphs[0].is_active);
//! assert!(dialogue.paragraphs[0].questions[0].is_active);
//! ```

#![warn(missing_docs)]

pub mod dialogue;
pub mod error;
pub mod id;
pub mod load;
mod normalize;

// Re-exports
pub use dialogue::{Dialogue, InsightRecord, Paragraph, Question};
pub use error::ModelError;
pub use id::{DialogueId, ParagraphId, QuestionId};
pub use load::DialogueFormat;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with dialogue data
    pub use crate::{
        Dialogue, DialogueId, InsightRecord, ModelError, Paragraph, ParagraphId, Question,
        QuestionId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
