//! Brace Map - turns a language-model completion into a positioned graph.
//!
//! The crate has no network code: a provider hands over the raw completion
//! text and everything after that is synchronous and deterministic.
//!
//! # Architecture
//!
//! ```text
//! raw text ─► sanitize ─► validate ─► flatten ─► layout ─► GraphModel
//!             (span)      (IdeaMap)   (nodes,    (rank, order,
//!                                      edges)     position)
//! ```
//!
//! - [`sanitize`] - strip fences and prose around the JSON span
//! - [`validate`] - typed `IdeaMap`, with structured [`ParseError`]s
//! - [`flatten`] - preorder nodes and edges, branch color indices
//! - [`layout`] - layered tree layout, top-left anchored
//! - [`MapPipeline`] / [`MapGenerator`] - the stages composed
//!
//! # Example
//!
//! ```
//! use brace_map::MapPipeline;
//!
//! let raw = "```json\n{\"root\":{\"id\":\"r\",\"label\":\"Root\",\"children\":[\
//!            {\"id\":\"a\",\"label\":\"A\"},{\"id\":\"b\",\"label\":\"B\"}]},\
//!            \"complexity\":\"Low\"}\n```";
//!
//! let result = MapPipeline::default().run(raw, "Gemini").unwrap();
//! assert_eq!(result.graph.len(), 3);
//! assert_eq!(result.graph.node("b").unwrap().branch_index, Some(1));
//! ```

mod error;
pub mod flatten;
pub mod graph;
pub mod layout;
mod model;
pub mod palette;
pub mod pipeline;
pub mod prompt;
pub mod provider;
mod sanitize;
#[cfg(test)]
mod testing;
mod validate;

// Re-exports
pub use error::{
    GenerateError, LayoutError, ParseError, ParseErrorKind, ValidatorConfigError,
};
pub use flatten::{flatten, FlattenConfig, TreeFlattener};
pub use graph::{GraphEdge, GraphModel, GraphNode, Position, Rect, Size};
pub use layout::{layout, Direction, LayoutConfig, LayoutEngine};
pub use model::{Complexity, IdeaMap, IdeaTree};
pub use pipeline::{GeneratedMap, MapGenerator, MapPipeline, PipelineConfig};
pub use prompt::build_prompt;
pub use provider::{CannedProvider, CompletionProvider, ProviderKind};
pub use sanitize::sanitize;
pub use validate::{
    validate, TreeValidator, ValidatorConfig, DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH,
};
