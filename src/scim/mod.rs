//! # SCIM envelopes
//!
//! Wraps transformed documents with the protocol metadata SCIM clients
//! require: the `schemas` URI array and the `meta` block for single
//! resources, and the ListResponse envelope for collections.

pub mod envelope;

pub use envelope::{
    Clock, ResourceType, SchemaAssembler, GROUP_SCHEMA_URI, LIST_RESPONSE_SCHEMA_URI,
    USER_SCHEMA_URI,
};
