//! Error types for loading dialogue data

use crate::id::{ParagraphId, QuestionId};

/// Errors raised while loading or validating a dialogue
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The dialogue holds no paragraphs at all
    #[error("dialogue has no paragraphs")]
    Empty,

    /// A paragraph holds no questions
    #[error("paragraph '{paragraph}' has no questions")]
    EmptyParagraph {
        /// Offending paragraph
        paragraph: ParagraphId,
    },

    /// Two paragraphs share an id
    #[error("duplicate paragraph id '{paragraph}'")]
    DuplicateParagraph {
        /// Repeated id
        paragraph: ParagraphId,
    },

    /// Two questions in one paragraph share an id
    #[error("duplicate question id '{question}' in paragraph '{paragraph}'")]
    DuplicateQuestion {
        /// Paragraph holding the questions
        paragraph: ParagraphId,
        /// Repeated id
        question: QuestionId,
    },

    /// A question names a different owning paragraph than the one holding it
    #[error("question '{question}' in paragraph '{paragraph}' claims paragraph '{claimed}'")]
    ForeignQuestion {
        /// Paragraph holding the question
        paragraph: ParagraphId,
        /// Question id
        question: QuestionId,
        /// Paragraph named by the question
        claimed: ParagraphId,
    },

    /// File extension is not one of json/yaml/yml
    #[error("unsupported dialogue format: '{extension}'")]
    UnsupportedFormat {
        /// Lowercased file extension
        extension: String,
    },

    /// JSON decoding failed
    #[error("invalid dialogue JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding failed
    #[error("invalid dialogue YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Reading the source file failed
    #[error("failed to read dialogue: {0}")]
    Io(#[from] std::io::Error),
}
