//! # Path addressing
//!
//! Generic get/set of values at dotted/bracketed paths inside untyped JSON.
//!
//! ## Components
//!
//! * `parser` - Parses path strings like `a.b[2].c` into typed segments
//! * `accessor` - Reads and writes `serde_json::Value` trees by segment list
//!
//! Reads distinguish "path not present" (`None`) from "path present, value is
//! null" (`Some(&Value::Null)`). Writes materialize intermediate containers,
//! padding arrays with empty objects so multi-valued attributes like
//! `emails[0].value` take the shape SCIM expects.

pub mod accessor;
pub mod parser;

pub use accessor::{get, set};
pub use parser::{parse_path, PathSegment};
