//! Completion provider seam
//!
//! The pipeline only needs `complete(prompt) -> text`. Network clients live
//! outside this crate and implement [`CompletionProvider`].

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Something that turns a prompt into a completion.
pub trait CompletionProvider: Send + Sync {
    /// Return the full completion text for `prompt`.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the provider name for logging and diagnostics
    fn provider_name(&self) -> &str;
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for Arc<P> {
    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for Box<P> {
    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

// =============================================================================
// PROVIDER SELECTION
// =============================================================================

/// Environment variable whose presence selects Gemini.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable whose presence selects OpenAI.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Known provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    /// Pick a provider from configured API keys. Gemini wins when both are set.
    pub fn detect() -> Option<Self> {
        Self::detect_with(|name| std::env::var(name).ok())
    }

    /// As [`ProviderKind::detect`], reading variables through `lookup`.
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let present = |name: &str| lookup(name).is_some_and(|v| !v.trim().is_empty());
        if present(GEMINI_KEY_VAR) {
            Some(Self::Gemini)
        } else if present(OPENAI_KEY_VAR) {
            Some(Self::OpenAi)
        } else {
            None
        }
    }

    /// Like [`ProviderKind::detect`], but an error when no key is configured.
    pub fn from_env() -> Result<Self> {
        Self::detect().ok_or_else(|| {
            anyhow!(
                "No AI provider API key found (set {} or {})",
                GEMINI_KEY_VAR,
                OPENAI_KEY_VAR
            )
        })
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        }
    }

    /// Model used by default for this provider.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error type for parsing ProviderKind
#[derive(Debug)]
pub struct ParseProviderError(String);

impl fmt::Display for ParseProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseProviderError {}

impl FromStr for ProviderKind {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" | "gpt" => Ok(Self::OpenAi),
            other => Err(ParseProviderError(format!(
                "Unknown provider '{}'. Valid values: gemini, google, openai, gpt",
                other
            ))),
        }
    }
}

// =============================================================================
// CANNED PROVIDER
// =============================================================================

/// Replays a stored completion regardless of the prompt.
///
/// Used to run the pipeline over a saved response, and in tests.
#[derive(Debug, Clone)]
pub struct CannedProvider {
    name: String,
    response: String,
}

impl CannedProvider {
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: response.into(),
        }
    }
}

impl CompletionProvider for CannedProvider {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_detect_prefers_gemini() {
        let both = env(&[(GEMINI_KEY_VAR, "g"), (OPENAI_KEY_VAR, "o")]);
        assert_eq!(ProviderKind::detect_with(both), Some(ProviderKind::Gemini));
    }

    #[test]
    fn test_detect_openai_and_none() {
        let openai = env(&[(OPENAI_KEY_VAR, "o")]);
        assert_eq!(ProviderKind::detect_with(openai), Some(ProviderKind::OpenAi));

        let blank = env(&[(GEMINI_KEY_VAR, "  ")]);
        assert_eq!(ProviderKind::detect_with(blank), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("gpt".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("llama".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProviderKind::OpenAi.to_string(), "OpenAI");
        assert_eq!(ProviderKind::Gemini.default_model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_canned_provider_through_arc() {
        let provider: Arc<dyn CompletionProvider> =
            Arc::new(CannedProvider::new("Replay", "{\"ok\":true}"));
        assert_eq!(provider.complete("anything").unwrap(), "{\"ok\":true}");
        assert_eq!(provider.provider_name(), "Replay");
    }
}
