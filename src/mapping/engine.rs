//! Rule compilation and bidirectional document transformation.

use log::{debug, warn};
use serde_json::{Map, Value};

use super::types::{MappingRule, ValidationReport};
use crate::error::{MapError, MapResult};
use crate::path::{self, parse_path, PathSegment};
use crate::transform::{parse_expression, Expression, Interpreter};

/// A rule with both paths and the transform expression parsed up front.
struct CompiledRule {
    rule: MappingRule,
    source: Option<Vec<PathSegment>>,
    target: Option<Vec<PathSegment>>,
    transform: Option<Expression>,
}

/// Applies an ordered rule set to arbitrary JSON documents, in either
/// direction, and validates required-field presence.
///
/// The engine holds no mutable state: every method takes `&self`, reads its
/// inputs, and allocates a fresh output, so one engine can serve concurrent
/// calls without locking as long as the caller keeps the inputs stable for
/// the duration of each call.
pub struct MappingEngine {
    rules: Vec<CompiledRule>,
}

impl MappingEngine {
    /// Compiles a rule set. Paths and transform expressions are parsed here
    /// so configuration mistakes fail before any transform is attempted.
    ///
    /// An empty `source_path` or `target_path` marks the side as unbound
    /// rather than malformed; such rules are skipped during transformation.
    ///
    /// # Errors
    ///
    /// Returns `MapError::RuleCompile`, identifying the rule by its target
    /// path, when either path or the transform expression fails to parse.
    pub fn new(rules: Vec<MappingRule>) -> MapResult<Self> {
        let compiled = rules
            .into_iter()
            .map(|rule| {
                compile_rule(rule).map_err(|(target_path, source)| MapError::RuleCompile {
                    target_path,
                    source: Box::new(source),
                })
            })
            .collect::<MapResult<Vec<_>>>()?;
        debug!("compiled {} mapping rules", compiled.len());
        Ok(Self { rules: compiled })
    }

    /// The rule set this engine was compiled from, in application order.
    pub fn rules(&self) -> impl Iterator<Item = &MappingRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    /// Transforms a source record into the target (SCIM-shaped) document.
    ///
    /// Rules apply in order. A rule is skipped entirely, writing no key, when
    /// its source side is unbound, its source path does not resolve, or its
    /// transform expression fails (the failure is logged and the remaining
    /// rules still run). A transform whose final result is an array or an
    /// object counts as failed: expressions produce scalars, and a non-scalar
    /// result means the expression is incomplete (`split(value, ' ')` without
    /// the `[0]`). When two rules name the same target path the later rule
    /// wins.
    pub fn transform_forward(&self, source: &Value) -> Value {
        let mut target = Value::Object(Map::new());
        for compiled in &self.rules {
            let (Some(source_segments), Some(target_segments)) =
                (&compiled.source, &compiled.target)
            else {
                continue;
            };
            let Some(extracted) = path::get(source, source_segments) else {
                continue;
            };
            let value = match &compiled.transform {
                Some(expression) => {
                    let mut interpreter = Interpreter::with_bindings(extracted, source);
                    match interpreter.evaluate(expression) {
                        Ok(Value::Array(_)) | Ok(Value::Object(_)) => {
                            warn!(
                                "transform for rule '{}' -> '{}' produced a non-scalar result; field omitted",
                                compiled.rule.source_path, compiled.rule.target_path
                            );
                            continue;
                        }
                        Ok(transformed) => transformed,
                        Err(error) => {
                            warn!(
                                "transform failed for rule '{}' -> '{}': {}",
                                compiled.rule.source_path, compiled.rule.target_path, error
                            );
                            continue;
                        }
                    }
                }
                None => extracted.clone(),
            };
            path::set(&mut target, target_segments, value);
        }
        target
    }

    /// Transforms a target-shaped document back into the source shape.
    ///
    /// Symmetric to `transform_forward` with the paths swapped. Transform
    /// expressions are declared forward-only and are not re-applied; rules
    /// with either side unbound are skipped.
    pub fn transform_reverse(&self, target: &Value) -> Value {
        let mut source = Value::Object(Map::new());
        for compiled in &self.rules {
            let (Some(source_segments), Some(target_segments)) =
                (&compiled.source, &compiled.target)
            else {
                continue;
            };
            let Some(extracted) = path::get(target, target_segments) else {
                continue;
            };
            path::set(&mut source, source_segments, extracted.clone());
        }
        source
    }

    /// Checks every `required` rule against a source record.
    ///
    /// A field counts as missing when its source path resolves to nothing,
    /// to `null`, or to the empty string. Numeric zero and `false` are
    /// present. All missing source paths are reported, not just the first.
    pub fn validate_required(&self, source: &Value) -> ValidationReport {
        let mut missing_fields = Vec::new();
        for compiled in &self.rules {
            if !compiled.rule.required {
                continue;
            }
            let present = compiled
                .source
                .as_ref()
                .and_then(|segments| path::get(source, segments))
                .map(|value| !matches!(value, Value::Null) && value.as_str() != Some(""))
                .unwrap_or(false);
            if !present {
                missing_fields.push(compiled.rule.source_path.clone());
            }
        }
        ValidationReport {
            valid: missing_fields.is_empty(),
            missing_fields,
        }
    }
}

fn compile_rule(rule: MappingRule) -> Result<CompiledRule, (String, MapError)> {
    let context = |error: MapError| (rule.target_path.clone(), error);

    let source = if rule.source_path.is_empty() {
        None
    } else {
        Some(parse_path(&rule.source_path).map_err(&context)?)
    };
    let target = if rule.target_path.is_empty() {
        None
    } else {
        Some(parse_path(&rule.target_path).map_err(&context)?)
    };
    let transform = match &rule.transform_expression {
        Some(expression) => Some(parse_expression(expression).map_err(&context)?),
        None => None,
    };

    Ok(CompiledRule {
        rule,
        source,
        target,
        transform,
    })
}
