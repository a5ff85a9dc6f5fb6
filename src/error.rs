//! Error types for response parsing, layout, and map generation.

use std::fmt;
use thiserror::Error;

/// Structured failure kinds for turning a completion into an `IdeaMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// No JSON-like span was found in the response.
    SanitizeEmpty,
    /// The candidate span is not well-formed JSON.
    SyntaxError,
    /// The JSON does not have the shape of an idea map.
    SchemaError,
    /// Two tree nodes share the same id.
    DuplicateId,
    /// The tree nests deeper than the configured cap.
    TooDeep,
}

impl ParseErrorKind {
    /// Get an error code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SanitizeEmpty => "SANITIZE_EMPTY",
            Self::SyntaxError => "SYNTAX_ERROR",
            Self::SchemaError => "SCHEMA_ERROR",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::TooDeep => "TOO_DEEP",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A failed attempt to parse a completion.
///
/// Always carries the text that was parsed so callers can show it or decide
/// whether to re-prompt the provider.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail}{}", format_provider(.provider))]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Human-readable description.
    pub detail: String,
    /// The raw provider text (or the candidate, until the pipeline attaches the raw text).
    pub raw: String,
    /// Name of the provider that produced the text, when known.
    pub provider: Option<String>,
}

fn format_provider(provider: &Option<String>) -> String {
    match provider {
        Some(name) => format!(" (provider: {name})"),
        None => String::new(),
    }
}

impl ParseError {
    /// Create an error of `kind` carrying the text that failed to parse.
    pub fn new(kind: ParseErrorKind, detail: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            raw: raw.into(),
            provider: None,
        }
    }

    /// Replace the carried text with the original, unsanitized response.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Record which provider produced the text.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Stable code of the error kind, e.g. `SYNTAX_ERROR`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Invalid layout configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Node width or height is zero, negative, or not finite.
    #[error("Invalid node size: {width} x {height} (both must be finite and positive)")]
    InvalidNodeSize {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },

    /// A separation is negative or not finite.
    #[error("Invalid separation: {name} = {value} (must be finite and >= 0)")]
    InvalidSeparation {
        /// Which option.
        name: &'static str,
        /// Configured value.
        value: f32,
    },
}

/// Invalid validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorConfigError {
    /// `maxDepth` is zero or beyond what the JSON parser can nest.
    #[error("Invalid maxDepth: {value} (must be between 1 and {max})")]
    InvalidMaxDepth {
        /// Configured value.
        value: usize,
        /// Largest supported value.
        max: usize,
    },
}

/// Failure of an end-to-end generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The idea was empty or whitespace.
    #[error("Idea is required")]
    EmptyIdea,

    /// The provider call itself failed.
    #[error("Provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: anyhow::Error,
    },

    /// The completion could not be turned into an idea map.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The layout configuration was rejected.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
