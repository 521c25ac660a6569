//! SCIM 2.0 envelope assembly.
//!
//! The schema URIs here are wire-format constants; identity providers match
//! them byte for byte.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::error::{MapError, MapResult};

/// SCIM core User schema URI.
pub const USER_SCHEMA_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// SCIM core Group schema URI.
pub const GROUP_SCHEMA_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// SCIM ListResponse message schema URI.
pub const LIST_RESPONSE_SCHEMA_URI: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

/// The supported SCIM resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    User,
    Group,
}

impl ResourceType {
    /// The core schema URI for this resource type.
    pub fn schema_uri(&self) -> &'static str {
        match self {
            ResourceType::User => USER_SCHEMA_URI,
            ResourceType::Group => GROUP_SCHEMA_URI,
        }
    }

    /// The `meta.resourceType` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::User => "User",
            ResourceType::Group => "Group",
        }
    }
}

impl FromStr for ResourceType {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(ResourceType::User),
            "Group" => Ok(ResourceType::Group),
            other => Err(MapError::UnsupportedResourceType(other.to_string())),
        }
    }
}

/// Wall-clock source for `meta` timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Assembles SCIM envelopes around transformed documents.
///
/// Envelopes are built fresh on every call and never retained; a failed call
/// leaves no partial state behind. The clock is injectable so tests can pin
/// the `meta` timestamps.
pub struct SchemaAssembler {
    clock: Clock,
}

impl Default for SchemaAssembler {
    fn default() -> Self {
        Self { clock: Utc::now }
    }
}

impl SchemaAssembler {
    /// Creates an assembler using the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an assembler with a fixed clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    /// Wraps a single transformed document in a SCIM resource envelope:
    /// `{schemas, ...document, meta}`.
    ///
    /// `created` and `lastModified` are both the assembly instant; the
    /// engine performs single-shot construction and does not track prior
    /// versions.
    ///
    /// # Errors
    ///
    /// `MapError::UnsupportedResourceType` for a resource type outside the
    /// supported set, `MapError::InvalidDocument` when `document` is not a
    /// JSON object.
    pub fn wrap_single(&self, document: &Value, resource_type: &str) -> MapResult<Value> {
        let resource_type: ResourceType = resource_type.parse()?;
        let fields = object_fields(document)?;
        let timestamp = (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut envelope = Map::new();
        envelope.insert(
            "schemas".to_string(),
            json!([resource_type.schema_uri()]),
        );
        for (key, value) in fields {
            envelope.insert(key.clone(), value.clone());
        }
        envelope.insert(
            "meta".to_string(),
            json!({
                "resourceType": resource_type.as_str(),
                "created": timestamp,
                "lastModified": timestamp,
            }),
        );
        Ok(Value::Object(envelope))
    }

    /// Wraps transformed documents in a SCIM ListResponse envelope.
    ///
    /// Each entry under `Resources` carries its per-item `schemas` array but
    /// no per-item `meta` block; `meta` appears only on single-resource
    /// envelopes.
    ///
    /// # Errors
    ///
    /// Same conditions as `wrap_single`; the first invalid document fails
    /// the whole call.
    pub fn wrap_list(&self, documents: &[Value], resource_type: &str) -> MapResult<Value> {
        let resource_type: ResourceType = resource_type.parse()?;

        let mut resources = Vec::with_capacity(documents.len());
        for document in documents {
            let fields = object_fields(document)?;
            let mut item = Map::new();
            item.insert(
                "schemas".to_string(),
                json!([resource_type.schema_uri()]),
            );
            for (key, value) in fields {
                item.insert(key.clone(), value.clone());
            }
            resources.push(Value::Object(item));
        }

        Ok(json!({
            "schemas": [LIST_RESPONSE_SCHEMA_URI],
            "totalResults": documents.len(),
            "itemsPerPage": documents.len(),
            "startIndex": 1,
            "Resources": resources,
        }))
    }
}

fn object_fields(document: &Value) -> MapResult<&Map<String, Value>> {
    document.as_object().ok_or_else(|| {
        MapError::InvalidDocument("resource document must be a JSON object".to_string())
    })
}
