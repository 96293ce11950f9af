//! Loading and structural validation
//!
//! Every loader runs [`Dialogue::prepare`], so a dialogue obtained from a
//! string or file is validated and normalized.

use crate::dialogue::Dialogue;
use crate::error::ModelError;
use crate::id::ParagraphId;
use std::collections::HashSet;
use std::path::Path;

/// Serialization formats accepted for dialogue data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DialogueFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ModelError::UnsupportedFormat { extension }),
        }
    }
}

impl Dialogue {
    /// Parse, validate and normalize JSON source data
    pub fn from_json_str(source: &str) -> Result<Self, ModelError> {
        let mut dialogue: Dialogue = serde_json::from_str(source)?;
        dialogue.prepare()?;
        Ok(dialogue)
    }

    /// Parse, validate and normalize YAML source data
    pub fn from_yaml_str(source: &str) -> Result<Self, ModelError> {
        let mut dialogue: Dialogue = serde_yaml::from_str(source)?;
        dialogue.prepare()?;
        Ok(dialogue)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let format = DialogueFormat::from_path(path)?;
        let source = std::fs::read_to_string(path)?;

        tracing::debug!(path = %path.display(), ?format, "loading dialogue");
        match format {
            DialogueFormat::Json => Self::from_json_str(&source),
            DialogueFormat::Yaml => Self::from_yaml_str(&source),
        }
    }

    /// Validate structure, then normalize active flags
    pub fn prepare(&mut self) -> Result<(), ModelError> {
        self.validate()?;
        self.normalize();
        Ok(())
    }

    /// Check structural rules and fill missing question owners
    ///
    /// # Errors
    /// - [`ModelError::Empty`] when there are no paragraphs
    /// - [`ModelError::EmptyParagraph`] when a paragraph has no questions
    /// - [`ModelError::DuplicateParagraph`] / [`ModelError::DuplicateQuestion`]
    /// - [`ModelError::ForeignQuestion`] when a question names another paragraph
    pub fn validate(&mut self) -> Result<(), ModelError> {
        if self.paragraphs.is_empty() {
            return Err(ModelError::Empty);
        }

        let mut paragraph_ids = HashSet::new();
        for paragraph in &self.paragraphs {
            if !paragraph_ids.insert(&paragraph.id) {
                return Err(ModelError::DuplicateParagraph {
                    paragraph: paragraph.id.clone(),
                });
            }
            if paragraph.questions.is_empty() {
                return Err(ModelError::EmptyParagraph {
                    paragraph: paragraph.id.clone(),
                });
            }

            let mut question_ids = HashSet::new();
            for question in &paragraph.questions {
                if !question_ids.insert(&question.id) {
                    return Err(ModelError::DuplicateQuestion {
                        paragraph: paragraph.id.clone(),
                        question: question.id.clone(),
                    });
                }

                let unowned = question.paragraph_id == ParagraphId::default();
                if !unowned && question.paragraph_id != paragraph.id {
                    return Err(ModelError::ForeignQuestion {
                        paragraph: paragraph.id.clone(),
                        question: question.id.clone(),
                        claimed: question.paragraph_id.clone(),
                    });
                }
            }
        }

        // Nothing is written until every check has passed
        for paragraph in &mut self.paragraphs {
            for question in &mut paragraph.questions {
                if question.paragraph_id == ParagraphId::default() {
                    question.paragraph_id = paragraph.id.clone();
                }
            }
        }

        Ok(())
    }
}
