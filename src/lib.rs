//! # scimmap
//!
//! Field-level mapping and bidirectional transformation between an arbitrary
//! REST API's JSON shape and SCIM 2.0 resources.
//!
//! The crate is the transformation core only: it takes a fetched record as
//! untyped JSON, an ordered list of path-to-path mapping rules (optionally
//! carrying a scalar transform expression), and produces a SCIM-shaped
//! document, or runs the inverse. HTTP, authentication, persistence, and UI
//! concerns live in the calling application.
//!
//! ## Example
//!
//! ```
//! use scimmap::{MappingEngine, MappingRule, SchemaAssembler};
//! use serde_json::json;
//!
//! # fn main() -> scimmap::MapResult<()> {
//! let engine = MappingEngine::new(vec![
//!     MappingRule::new("firstName", "name.givenName"),
//!     MappingRule::new("email", "emails[0].value"),
//!     MappingRule::new("active", "active").with_transform("Boolean(value)"),
//! ])?;
//!
//! let record = json!({"firstName": "John", "email": "john@x.com", "active": 1});
//! let document = engine.transform_forward(&record);
//! assert_eq!(document["name"]["givenName"], json!("John"));
//! assert_eq!(document["active"], json!(true));
//!
//! let envelope = SchemaAssembler::new().wrap_single(&document, "User")?;
//! assert_eq!(
//!     envelope["schemas"],
//!     json!(["urn:ietf:params:scim:schemas:core:2.0:User"])
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! * [`path`] - dotted/bracketed path parsing and JSON get/set
//! * [`transform`] - the sandboxed per-field expression language
//! * [`mapping`] - mapping rules and the bidirectional engine
//! * [`scim`] - SCIM envelope assembly
//! * [`config`] - persistable mapping profiles

pub mod config;
pub mod error;
pub mod mapping;
pub mod path;
pub mod scim;
pub mod transform;

pub use config::MappingProfile;
pub use error::{MapError, MapResult};
pub use mapping::{MappingEngine, MappingRule, ValidationReport};
pub use path::{parse_path, PathSegment};
pub use scim::{
    ResourceType, SchemaAssembler, GROUP_SCHEMA_URI, LIST_RESPONSE_SCHEMA_URI, USER_SCHEMA_URI,
};
pub use transform::{parse_expression, Expression, Interpreter};
