use serde::{Deserialize, Serialize};

/// One declarative source-path to target-path binding.
///
/// The serialized form uses camelCase keys
/// (`{targetPath, sourcePath, required, transformExpression}`) so rule sets
/// round-trip losslessly through persisted JSON configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
    /// Dotted/bracketed path into the destination schema,
    /// e.g. `name.givenName` or `emails[0].value`.
    pub target_path: String,

    /// Dotted/bracketed path into the source object. Empty means unmapped;
    /// the rule is skipped until a source is bound.
    #[serde(default)]
    pub source_path: String,

    /// When true, validation fails if the resolved source value is absent,
    /// null, or the empty string.
    #[serde(default)]
    pub required: bool,

    /// Optional forward-only scalar transformation, written against the
    /// implicit `value` and `source` bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_expression: Option<String>,
}

impl MappingRule {
    /// Creates a plain rule binding `source_path` to `target_path`.
    pub fn new<S: Into<String>, T: Into<String>>(source_path: S, target_path: T) -> Self {
        Self {
            target_path: target_path.into(),
            source_path: source_path.into(),
            required: false,
            transform_expression: None,
        }
    }

    /// Marks the rule as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a transform expression.
    pub fn with_transform<E: Into<String>>(mut self, expression: E) -> Self {
        self.transform_expression = Some(expression.into());
        self
    }
}

/// Outcome of `MappingEngine::validate_required`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff no required field is missing.
    pub valid: bool,

    /// Source paths of every missing required field, in rule order.
    pub missing_fields: Vec<String>,
}
