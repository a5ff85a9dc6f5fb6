//! Completion → graph pipeline
//!
//! ```text
//! idea ─► build_prompt ─► CompletionProvider ─┐
//!                                             ▼
//!                        raw text ─► sanitize ─► validate ─► flatten ─► layout ─► GraphModel
//! ```
//!
//! `MapPipeline` covers everything after the provider; `MapGenerator` adds
//! the prompt and the provider call in front. Nothing is retried here: a
//! failure comes back with the raw text so the caller can decide to re-prompt.

use crate::error::{GenerateError, LayoutError, ParseError};
use crate::flatten::{FlattenConfig, TreeFlattener};
use crate::graph::GraphModel;
use crate::layout::{Direction, LayoutConfig, LayoutEngine};
use crate::model::IdeaMap;
use crate::prompt::build_prompt;
use crate::provider::CompletionProvider;
use crate::sanitize::sanitize;
use crate::validate::{TreeValidator, ValidatorConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// All stage options in one place, loadable from YAML or JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub validator: ValidatorConfig,
    pub flatten: FlattenConfig,
    pub layout: LayoutConfig,
}

impl PipelineConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config: Self = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config '{}'", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config '{}'", path.display()))?
        };
        config.validator.validate()?;
        config.layout.validate()?;
        Ok(config)
    }
}

/// A validated map and its positioned graph.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMap {
    pub map: IdeaMap,
    pub graph: GraphModel,
}

/// Sanitize → validate → flatten → layout over one raw completion.
#[derive(Debug, Clone, Default)]
pub struct MapPipeline {
    validator: TreeValidator,
    flattener: TreeFlattener,
    engine: LayoutEngine,
}

impl MapPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            validator: TreeValidator::new(config.validator),
            flattener: TreeFlattener::new(config.flatten),
            engine: LayoutEngine::new(config.layout),
        }
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        self.engine.config()
    }

    /// Sanitize and validate. Errors carry `raw` and `provider`.
    pub fn parse(&self, raw: &str, provider: &str) -> Result<IdeaMap, ParseError> {
        let candidate = sanitize(raw);
        debug!(
            provider,
            raw_len = raw.len(),
            candidate_len = candidate.len(),
            "parsing completion"
        );

        self.validator.validate(&candidate).map_err(|e| {
            let e = e.with_raw(raw).with_provider(provider);
            warn!(provider, code = e.code(), detail = %e.detail, "completion rejected");
            e
        })
    }

    /// Build a fresh graph for an already validated map.
    pub fn graph(&self, map: &IdeaMap) -> Result<GraphModel, LayoutError> {
        let (nodes, edges) = self.flattener.flatten(&map.root);
        let nodes = self.engine.layout(nodes, &edges)?;
        Ok(GraphModel::new(nodes, edges, self.engine.config()))
    }

    /// Build a fresh graph in a different direction. Nothing is reused from
    /// earlier layouts.
    pub fn relayout(&self, map: &IdeaMap, direction: Direction) -> Result<GraphModel, LayoutError> {
        let config = self.engine.config().clone().with_direction(direction);
        let (nodes, edges) = self.flattener.flatten(&map.root);
        let nodes = LayoutEngine::new(config.clone()).layout(nodes, &edges)?;
        Ok(GraphModel::new(nodes, edges, &config))
    }

    /// Run every stage over one completion.
    pub fn run(&self, raw: &str, provider: &str) -> Result<GeneratedMap, GenerateError> {
        let map = self.parse(raw, provider)?;
        let graph = self.graph(&map)?;
        info!(
            provider,
            nodes = graph.len(),
            edges = graph.edges().len(),
            complexity = %map.complexity,
            "built idea map"
        );
        Ok(GeneratedMap { map, graph })
    }
}

/// Prompt → provider → pipeline.
pub struct MapGenerator<P> {
    provider: P,
    pipeline: MapPipeline,
}

impl<P: CompletionProvider> MapGenerator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_pipeline(provider, MapPipeline::default())
    }

    pub fn with_pipeline(provider: P, pipeline: MapPipeline) -> Self {
        Self { provider, pipeline }
    }

    pub fn pipeline(&self) -> &MapPipeline {
        &self.pipeline
    }

    /// Generate a positioned map for `idea`.
    pub fn generate(&self, idea: &str) -> Result<GeneratedMap, GenerateError> {
        if idea.trim().is_empty() {
            return Err(GenerateError::EmptyIdea);
        }

        let name = self.provider.provider_name();
        let prompt = build_prompt(idea);
        debug!(provider = name, prompt_len = prompt.len(), "requesting completion");

        let raw = self
            .provider
            .complete(&prompt)
            .map_err(|source| GenerateError::Provider {
                provider: name.to_string(),
                source,
            })?;

        self.pipeline.run(&raw, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::provider::CannedProvider;
    use anyhow::anyhow;
    use std::io::Write;

    const FENCED: &str = "Sure! Here is the map:\n```json\n{\"root\":{\"id\":\"r\",\"label\":\"Root\",\"children\":[{\"id\":\"a\",\"label\":\"A\"},{\"id\":\"b\",\"label\":\"B\"}]},\"complexity\":\"Low\"}\n```";

    struct FailingProvider;

    impl CompletionProvider for FailingProvider {
        fn complete(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("HTTP 503"))
        }

        fn provider_name(&self) -> &str {
            "Flaky"
        }
    }

    #[test]
    fn test_run_fenced_response() {
        let result = MapPipeline::default().run(FENCED, "Gemini").unwrap();
        assert_eq!(result.graph.len(), 3);
        assert_eq!(result.graph.edges().len(), 2);
        assert_eq!(result.graph.node("a").unwrap().branch_index, Some(0));
        assert_eq!(result.graph.node("b").unwrap().branch_index, Some(1));
    }

    #[test]
    fn test_parse_error_carries_raw_and_provider() {
        let raw = "I could not come up with anything.";
        let err = MapPipeline::default().parse(raw, "OpenAI").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::SanitizeEmpty);
        assert_eq!(err.raw, raw);
        assert_eq!(err.provider.as_deref(), Some("OpenAI"));
    }

    #[test]
    fn test_relayout_matches_fresh_pipeline() {
        let pipeline = MapPipeline::default();
        let map = pipeline.parse(FENCED, "Gemini").unwrap();
        let tb = pipeline.relayout(&map, Direction::TopBottom).unwrap();
        assert_eq!(tb.direction(), Direction::TopBottom);

        let tb_pipeline = MapPipeline::new(PipelineConfig {
            layout: LayoutConfig::default().with_direction(Direction::TopBottom),
            ..Default::default()
        });
        assert_eq!(tb.nodes(), tb_pipeline.graph(&map).unwrap().nodes());
        // Original configuration untouched.
        assert_eq!(pipeline.layout_config().direction, Direction::LeftRight);
    }

    #[test]
    fn test_generator_rejects_empty_idea() {
        let generator = MapGenerator::new(CannedProvider::new("Replay", FENCED));
        assert!(matches!(generator.generate("   "), Err(GenerateError::EmptyIdea)));
    }

    #[test]
    fn test_generator_happy_path() {
        let generator = MapGenerator::new(CannedProvider::new("Replay", FENCED));
        let result = generator.generate("An airport ride app").unwrap();
        assert_eq!(result.graph.root().unwrap().id, "r");
    }

    #[test]
    fn test_generator_provider_failure() {
        let generator = MapGenerator::new(FailingProvider);
        let err = generator.generate("idea").unwrap_err();
        assert!(matches!(err, GenerateError::Provider { ref provider, .. } if provider == "Flaky"));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_generator_parse_failure() {
        let generator = MapGenerator::new(CannedProvider::new("Replay", "{\"root\": oops}"));
        match generator.generate("idea") {
            Err(GenerateError::Parse(e)) => {
                assert_eq!(e.kind, ParseErrorKind::SyntaxError);
                assert_eq!(e.raw, "{\"root\": oops}");
            }
            other => panic!("expected parse error, got {:?}", other.map(|m| m.graph.len())),
        }
    }

    #[test]
    fn test_config_yaml() {
        let yaml = "layout:\n  direction: TB\n  nodeWidth: 200\nvalidator:\n  maxDepth: 10\n";
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.layout.direction, Direction::TopBottom);
        assert_eq!(config.layout.node_width, 200.0);
        assert_eq!(config.validator.max_depth, 10);
        assert_eq!(config.flatten, FlattenConfig::default());
    }

    fn config_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_and_json() {
        let yaml = config_file(".yaml", "layout:\n  direction: TB\n");
        let config = PipelineConfig::load(yaml.path()).unwrap();
        assert_eq!(config.layout.direction, Direction::TopBottom);

        let json = config_file(".json", r#"{"validator":{"maxDepth":12}}"#);
        let config = PipelineConfig::load(json.path()).unwrap();
        assert_eq!(config.validator.max_depth, 12);
    }

    #[test]
    fn test_load_rejects_max_depth_beyond_parser() {
        let file = config_file(".yaml", "validator:\n  maxDepth: 100\n");
        let err = PipelineConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("maxDepth"), "{}", err);
    }

    #[test]
    fn test_load_rejects_bad_layout() {
        let file = config_file(".json", r#"{"layout":{"nodeHeight":-1}}"#);
        assert!(PipelineConfig::load(file.path()).is_err());
    }
}
