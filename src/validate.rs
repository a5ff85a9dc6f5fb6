//! Tree validation for sanitized completions.
//!
//! Implements all-or-nothing validation:
//! 1. Candidate is non-empty and parses as JSON
//! 2. Top level is an object with `root` and `complexity`
//! 3. Every node has a non-empty string `id` and a string `label`
//! 4. `children` is absent, null, or an array of nodes
//! 5. Nesting stays under the depth cap
//! 6. Ids are unique across the whole tree

use crate::error::{ParseError, ParseErrorKind, ValidatorConfigError};
use crate::model::{Complexity, IdeaMap, IdeaTree};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Default maximum number of tree levels (the root is level one).
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Deepest object/array nesting serde_json will parse.
const PARSER_NESTING_LIMIT: usize = 127;

/// Largest usable `max_depth`. Each level costs two nesting levels (the node
/// object and its `children` array) under the top-level object.
pub const MAX_SUPPORTED_DEPTH: usize = (PARSER_NESTING_LIMIT - 1) / 2;

/// Validator options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Maximum number of tree levels accepted, from 1 to
    /// [`MAX_SUPPORTED_DEPTH`].
    pub max_depth: usize,
}

impl ValidatorConfig {
    pub fn validate(&self) -> Result<(), ValidatorConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ValidatorConfigError::InvalidMaxDepth {
                value: self.max_depth,
                max: MAX_SUPPORTED_DEPTH,
            });
        }
        Ok(())
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Validates sanitized candidates into typed idea maps.
#[derive(Debug, Clone, Default)]
pub struct TreeValidator {
    config: ValidatorConfig,
}

/// Validate with the default configuration.
///
/// # Example
///
/// ```
/// use brace_map::{validate, Complexity};
///
/// let map = validate(r#"{"root":{"id":"r","label":"Root"},"complexity":"High"}"#).unwrap();
/// assert_eq!(map.complexity, Complexity::High);
/// assert!(map.root.is_leaf());
/// ```
pub fn validate(candidate: &str) -> Result<IdeaMap, ParseError> {
    TreeValidator::default().validate(candidate)
}

impl TreeValidator {
    /// A `max_depth` outside `1..=MAX_SUPPORTED_DEPTH` is clamped into range.
    pub fn new(mut config: ValidatorConfig) -> Self {
        let clamped = config.max_depth.clamp(1, MAX_SUPPORTED_DEPTH);
        if clamped != config.max_depth {
            warn!(
                requested = config.max_depth,
                max_depth = clamped,
                "maxDepth out of range, clamping"
            );
            config.max_depth = clamped;
        }
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Parse and validate a candidate produced by [`crate::sanitize`].
    ///
    /// Errors carry the candidate as their raw text; the pipeline swaps in
    /// the original response.
    pub fn validate(&self, candidate: &str) -> Result<IdeaMap, ParseError> {
        let fail = |kind, detail: String| ParseError::new(kind, detail, candidate);

        if candidate.trim().is_empty() {
            return Err(fail(
                ParseErrorKind::SanitizeEmpty,
                "no JSON object found in response".to_string(),
            ));
        }

        // serde_json refuses nesting past its own limit; catch that first so
        // it is reported as depth rather than syntax.
        let nesting = nesting_depth(candidate);
        if nesting > PARSER_NESTING_LIMIT {
            return Err(fail(
                ParseErrorKind::TooDeep,
                format!(
                    "JSON nests {} levels deep (parser limit {})",
                    nesting, PARSER_NESTING_LIMIT
                ),
            ));
        }

        let value: Value = serde_json::from_str(candidate)
            .map_err(|e| fail(ParseErrorKind::SyntaxError, e.to_string()))?;

        let top = match value {
            Value::Object(top) => top,
            other => {
                return Err(fail(
                    ParseErrorKind::SchemaError,
                    format!(
                        "expected a JSON object at top level, got {}",
                        type_name(&other)
                    ),
                ))
            }
        };

        let complexity =
            parse_complexity(&top).map_err(|detail| fail(ParseErrorKind::SchemaError, detail))?;

        let root_value = match top.get("root") {
            Some(v @ Value::Object(_)) => v,
            Some(other) => {
                return Err(fail(
                    ParseErrorKind::SchemaError,
                    format!("'root' must be an object, got {}", type_name(other)),
                ))
            }
            None => {
                return Err(fail(
                    ParseErrorKind::SchemaError,
                    "missing required field 'root'".to_string(),
                ))
            }
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut path = String::from("root");
        let root = self
            .build_node(root_value, 0, &mut path, &mut seen)
            .map_err(|(kind, detail)| fail(kind, detail))?;

        debug!(
            nodes = seen.len(),
            complexity = %complexity,
            "validated idea map"
        );

        Ok(IdeaMap { root, complexity })
    }

    fn build_node(
        &self,
        value: &Value,
        depth: usize,
        path: &mut String,
        seen: &mut HashSet<String>,
    ) -> Result<IdeaTree, (ParseErrorKind, String)> {
        if depth >= self.config.max_depth {
            return Err((
                ParseErrorKind::TooDeep,
                format!(
                    "tree exceeds {} levels at {}",
                    self.config.max_depth, path
                ),
            ));
        }

        let schema = |detail: String| (ParseErrorKind::SchemaError, detail);

        let Value::Object(fields) = value else {
            return Err(schema(format!(
                "{} must be an object, got {}",
                path,
                type_name(value)
            )));
        };

        let id = match fields.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => return Err(schema(format!("{}.id must not be empty", path))),
            Some(other) => {
                return Err(schema(format!(
                    "{}.id must be a string, got {}",
                    path,
                    type_name(other)
                )))
            }
            None => return Err(schema(format!("{} is missing 'id'", path))),
        };

        let label = match fields.get("label") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(schema(format!(
                    "{}.label must be a string, got {}",
                    path,
                    type_name(other)
                )))
            }
            None => return Err(schema(format!("{} is missing 'label'", path))),
        };

        let collapsed = match fields.get("collapsed") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(schema(format!(
                    "{}.collapsed must be a boolean, got {}",
                    path,
                    type_name(other)
                )))
            }
        };

        if !seen.insert(id.clone()) {
            return Err((
                ParseErrorKind::DuplicateId,
                format!("duplicate node id '{}' at {}", id, path),
            ));
        }

        let child_values: &[Value] = match fields.get("children") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(schema(format!(
                    "{}.children must be an array, got {}",
                    path,
                    type_name(other)
                )))
            }
        };

        let mut children = Vec::with_capacity(child_values.len());
        for (index, child) in child_values.iter().enumerate() {
            let restore = path.len();
            path.push_str(&format!(".children[{}]", index));
            children.push(self.build_node(child, depth + 1, path, seen)?);
            path.truncate(restore);
        }

        Ok(IdeaTree {
            id,
            label,
            children,
            collapsed,
        })
    }
}

fn parse_complexity(top: &Map<String, Value>) -> Result<Complexity, String> {
    match top.get("complexity") {
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(format!(
            "'complexity' must be a string, got {}",
            type_name(other)
        )),
        None => Err("missing required field 'complexity'".to_string()),
    }
}

/// Deepest `{`/`[` nesting in `text`, ignoring brackets inside strings.
fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
