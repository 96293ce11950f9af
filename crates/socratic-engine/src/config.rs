//! Dialogue configuration
//!
//! Holds the reaction catalogues offered at the end of each paragraph and the
//! reflection threshold enforced by the gate. Loadable from TOML, YAML or JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default minimum reflection length, in characters
pub const DEFAULT_MIN_REFLECTION_CHARS: usize = 25;

/// Default header text
pub const DEFAULT_HEADER: &str = "Socratic Dialogue";

/// Mode a dialogue is opened in
///
/// Only [`DialogueMode::Answer`] carries navigation; the other modes are
/// recognised so that configurations naming them fail with a precise error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueMode {
    /// Authoring UI
    Create,
    /// Interactive question-and-reflection flow
    Answer,
    /// Read-only view
    Reader,
}

impl DialogueMode {
    /// Lowercase name as used in configuration files
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DialogueMode::Create => "create",
            DialogueMode::Answer => "answer",
            DialogueMode::Reader => "reader",
        }
    }
}

impl fmt::Display for DialogueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialogueMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(DialogueMode::Create),
            "answer" => Ok(DialogueMode::Answer),
            "reader" => Ok(DialogueMode::Reader),
            other => Err(ConfigError::InvalidMode {
                value: other.to_string(),
            }),
        }
    }
}

/// A reaction category offered when a paragraph ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionOption {
    /// Category recorded in the insight
    pub category: String,
    /// Icon markup or glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether a written reflection must accompany this reaction
    #[serde(default = "default_requires_reflection")]
    pub requires_reflection: bool,
}

impl ReactionOption {
    /// Reaction that demands a reflection
    #[must_use]
    pub fn reflective(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            icon: None,
            requires_reflection: true,
        }
    }

    /// Reaction that is recorded without a reflection
    #[must_use]
    pub fn immediate(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            icon: None,
            requires_reflection: false,
        }
    }
}

fn default_requires_reflection() -> bool {
    true
}

/// A weighted insight-spotter icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotterReaction {
    /// Display name, unique within the catalogue
    pub name: String,
    /// Icon glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Weight stored with the insight
    pub value: f64,
    /// Longer explanation shown on selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SpotterReaction {
    /// Create a spotter with no icon or description
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            icon: None,
            value,
            description: None,
        }
    }
}

/// Configuration for one dialogue instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Mode the dialogue is opened in
    pub mode: DialogueMode,
    /// Header text
    #[serde(default = "default_header")]
    pub header: String,
    /// Reflection must be longer than this many characters (after trimming)
    #[serde(default = "default_min_reflection_chars")]
    pub min_reflection_chars: usize,
    /// Reaction categories offered at paragraph end
    #[serde(default)]
    pub reactions: Vec<ReactionOption>,
    /// Insight-spotter icons
    #[serde(default)]
    pub spotter_reactions: Vec<SpotterReaction>,
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

fn default_min_reflection_chars() -> usize {
    DEFAULT_MIN_REFLECTION_CHARS
}

impl DialogueConfig {
    /// Configuration with defaults for the given mode
    #[must_use]
    pub fn new(mode: DialogueMode) -> Self {
        Self {
            mode,
            header: default_header(),
            min_reflection_chars: DEFAULT_MIN_REFLECTION_CHARS,
            reactions: Vec::new(),
            spotter_reactions: Vec::new(),
        }
    }

    /// Answer-mode configuration with defaults
    #[inline]
    #[must_use]
    pub fn answer() -> Self {
        Self::new(DialogueMode::Answer)
    }

    /// With reflection threshold
    #[inline]
    #[must_use]
    pub fn with_min_reflection_chars(mut self, chars: usize) -> Self {
        self.min_reflection_chars = chars;
        self
    }

    /// With header text
    #[inline]
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// With an additional reaction category
    #[inline]
    #[must_use]
    pub fn with_reaction(mut self, reaction: ReactionOption) -> Self {
        self.reactions.push(reaction);
        self
    }

    /// With an additional spotter icon
    #[inline]
    #[must_use]
    pub fn with_spotter(mut self, spotter: SpotterReaction) -> Self {
        self.spotter_reactions.push(spotter);
        self
    }

    /// Look up a reaction by category
    #[must_use]
    pub fn reaction(&self, category: &str) -> Option<&ReactionOption> {
        self.reactions.iter().find(|r| r.category == category)
    }

    /// Look up a spotter by name
    #[must_use]
    pub fn spotter(&self, name: &str) -> Option<&SpotterReaction> {
        self.spotter_reactions.iter().find(|s| s.name == name)
    }

    /// Check threshold and catalogue uniqueness
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_reflection_chars == 0 {
            return Err(ConfigError::InvalidThreshold);
        }

        let mut seen = HashSet::new();
        for reaction in &self.reactions {
            if !seen.insert(reaction.category.as_str()) {
                return Err(ConfigError::DuplicateReaction {
                    name: reaction.category.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for spotter in &self.spotter_reactions {
            if !seen.insert(spotter.name.as_str()) {
                return Err(ConfigError::DuplicateReaction {
                    name: spotter.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Parse and validate TOML
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let source = std::fs::read_to_string(path)?;

        let config: Self = match extension.as_str() {
            "toml" => toml::from_str(&source)?,
            "yaml" | "yml" => serde_yaml::from_str(&source)?,
            "json" => serde_json::from_str(&source)?,
            _ => return Err(ConfigError::UnsupportedFormat { extension }),
        };
        config.validate()?;

        tracing::debug!(path = %path.display(), mode = %config.mode, "loaded dialogue config");
        Ok(config)
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self::answer()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unknown mode name
    #[error("invalid mode: '{value}'")]
    InvalidMode {
        /// Rejected mode name
        value: String,
    },

    /// Reflection threshold of zero
    #[error("min_reflection_chars must be greater than zero")]
    InvalidThreshold,

    /// Two reactions or spotters share a name
    #[error("duplicate reaction: '{name}'")]
    DuplicateReaction {
        /// Repeated category or spotter name
        name: String,
    },

    /// File extension not recognised
    #[error("unsupported config format: '{extension}'")]
    UnsupportedFormat {
        /// Lowercased file extension
        extension: String,
    },

    /// TOML decoding failed
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML decoding failed
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON decoding failed
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the file failed
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
