//! # Mapping engine
//!
//! Declarative field-level mappings between an arbitrary source JSON shape
//! and a SCIM resource shape, applied in both directions.
//!
//! ## Components
//!
//! * `types` - `MappingRule` (the persisted rule form) and `ValidationReport`
//! * `engine` - `MappingEngine`: rule compilation, forward/reverse
//!   transformation, and required-field validation

pub mod engine;
pub mod types;

pub use engine::MappingEngine;
pub use types::{MappingRule, ValidationReport};
