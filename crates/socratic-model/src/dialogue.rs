//! Dialogue data: paragraphs, questions and captured insights
//!
//! The serialized shape follows the source data format
//! (`questionParagraphs`, `paragraphId`, `isActive`, ...) so that a model
//! exported after a session can be fed back in unchanged.

use crate::id::{ParagraphId, QuestionId};
use serde::{Deserialize, Serialize};

/// A single prompt within a paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question id, unique within its paragraph
    pub id: QuestionId,
    /// Owning paragraph; empty in source data means "fill from parent"
    #[serde(default)]
    pub paragraph_id: ParagraphId,
    /// Prompt text
    #[serde(rename = "question", alias = "text", default)]
    pub text: String,
    /// Focused on initial render
    #[serde(default)]
    pub is_active: bool,
}

impl Question {
    /// Create an inactive question with no owning paragraph yet
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(id),
            paragraph_id: ParagraphId::default(),
            text: text.into(),
            is_active: false,
        }
    }

    /// Mark as the initially focused question
    #[inline]
    #[must_use]
    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }
}

/// The reaction recorded when the user leaves a paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    /// Chosen reaction category
    pub category: String,
    /// Free-text reflection, empty when the category needs none
    #[serde(default)]
    pub content: String,
    /// Weight of the spotted insight icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A themed group of sequential questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Paragraph id, unique within the dialogue
    pub id: ParagraphId,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Optional illustration URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ordered questions
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Insight captured when the paragraph was last left going forward
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<InsightRecord>,
    /// Shown on initial render
    #[serde(default)]
    pub is_active: bool,
}

impl Paragraph {
    /// Create an empty, inactive paragraph
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ParagraphId::new(id),
            title: title.into(),
            image: None,
            questions: Vec::new(),
            insight: None,
            is_active: false,
        }
    }

    /// Append a question, stamping this paragraph as its owner
    #[must_use]
    pub fn with_question(mut self, mut question: Question) -> Self {
        question.paragraph_id = self.id.clone();
        self.questions.push(question);
        self
    }

    /// Attach an illustration
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Mark as the initially shown paragraph
    #[inline]
    #[must_use]
    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }

    /// Position of a question within this paragraph
    #[must_use]
    pub fn question_index(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == id)
    }

    /// Question at `index`
    #[inline]
    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Entry question when moving forward
    #[inline]
    #[must_use]
    pub fn first_question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Entry question when moving backward
    #[inline]
    #[must_use]
    pub fn last_question(&self) -> Option<&Question> {
        self.questions.last()
    }

    /// Whether `id` is the final question of this paragraph
    #[must_use]
    pub fn is_last_question(&self, id: &QuestionId) -> bool {
        self.last_question().is_some_and(|q| &q.id == id)
    }

    /// First question flagged active
    #[must_use]
    pub fn active_question(&self) -> Option<&Question> {
        self.questions.iter().find(|q| q.is_active)
    }
}

/// The full ordered dialogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    /// Dialogue title
    #[serde(default)]
    pub title: String,
    /// Ordered paragraphs
    #[serde(rename = "questionParagraphs", default)]
    pub paragraphs: Vec<Paragraph>,
}

impl Dialogue {
    /// Create a dialogue from parts
    #[must_use]
    pub fn new(title: impl Into<String>, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            title: title.into(),
            paragraphs,
        }
    }

    /// Number of paragraphs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether there are no paragraphs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Total number of questions across all paragraphs
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.questions.len()).sum()
    }

    /// Position of a paragraph in the sequence
    #[must_use]
    pub fn paragraph_index(&self, id: &ParagraphId) -> Option<usize> {
        self.paragraphs.iter().position(|p| &p.id == id)
    }

    /// Look up a paragraph by id
    #[must_use]
    pub fn paragraph(&self, id: &ParagraphId) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| &p.id == id)
    }

    /// Paragraph at `index`
    #[inline]
    #[must_use]
    pub fn paragraph_at(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// First paragraph flagged active
    #[must_use]
    pub fn active_paragraph(&self) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.is_active)
    }

    /// Insight recorded for a paragraph
    #[must_use]
    pub fn insight(&self, id: &ParagraphId) -> Option<&InsightRecord> {
        self.paragraph(id).and_then(|p| p.insight.as_ref())
    }

    /// All recorded insights in paragraph order
    pub fn insights(&self) -> impl Iterator<Item = (&ParagraphId, &InsightRecord)> {
        self.paragraphs
            .iter()
            .filter_map(|p| p.insight.as_ref().map(|i| (&p.id, i)))
    }

    /// Store an insight, returning the record it replaced
    ///
    /// Returns `None` without storing when the paragraph does not exist.
    pub fn set_insight(
        &mut self,
        id: &ParagraphId,
        record: InsightRecord,
    ) -> Option<Option<InsightRecord>> {
        let paragraph = self.paragraphs.iter_mut().find(|p| &p.id == id)?;
        Some(paragraph.insight.replace(record))
    }
}
