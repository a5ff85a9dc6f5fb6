//! Prompt construction for brace-map generation.

/// System message sent alongside the prompt by chat-style providers.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates JSON mind maps.";

const TEMPLATE: &str = include_str!("prompts/brace_map.md");

/// Build the user prompt for an idea.
///
/// The idea is inserted verbatim after the instructions; surrounding
/// whitespace is trimmed.
pub fn build_prompt(idea: &str) -> String {
    TEMPLATE.replace("{idea}", idea.trim())
}
