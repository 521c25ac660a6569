//! Pipeline coverage from raw record to SCIM envelope, including the
//! wire-format URIs identity providers match byte for byte.

use scimmap::{
    MappingEngine, MappingRule, SchemaAssembler, GROUP_SCHEMA_URI, LIST_RESPONSE_SCHEMA_URI,
    USER_SCHEMA_URI,
};
use serde_json::json;

#[test]
fn test_schema_uris_are_bit_exact() {
    assert_eq!(USER_SCHEMA_URI, "urn:ietf:params:scim:schemas:core:2.0:User");
    assert_eq!(
        GROUP_SCHEMA_URI,
        "urn:ietf:params:scim:schemas:core:2.0:Group"
    );
    assert_eq!(
        LIST_RESPONSE_SCHEMA_URI,
        "urn:ietf:params:scim:api:messages:2.0:ListResponse"
    );
}

#[test]
fn test_record_to_user_envelope() {
    let engine = MappingEngine::new(vec![
        MappingRule::new("login", "userName"),
        MappingRule::new("email", "emails[0].value"),
    ])
    .unwrap();
    let assembler = SchemaAssembler::new();

    let document = engine.transform_forward(&json!({"login": "jdoe", "email": "j@x.com"}));
    let envelope = assembler.wrap_single(&document, "User").unwrap();

    assert_eq!(envelope["schemas"], json!([USER_SCHEMA_URI]));
    assert_eq!(envelope["userName"], json!("jdoe"));
    assert_eq!(envelope["emails"], json!([{"value": "j@x.com"}]));

    let meta = &envelope["meta"];
    assert_eq!(meta["resourceType"], json!("User"));
    // Single-shot construction: both timestamps are the assembly instant.
    assert_eq!(meta["created"], meta["lastModified"]);
    assert!(meta["created"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_records_to_list_envelope() {
    let engine = MappingEngine::new(vec![MappingRule::new("login", "userName")]).unwrap();
    let assembler = SchemaAssembler::new();

    let documents: Vec<_> = [json!({"login": "a"}), json!({"login": "b"})]
        .iter()
        .map(|record| engine.transform_forward(record))
        .collect();
    let envelope = assembler.wrap_list(&documents, "User").unwrap();

    assert_eq!(envelope["schemas"], json!([LIST_RESPONSE_SCHEMA_URI]));
    assert_eq!(envelope["totalResults"], json!(2));
    assert_eq!(envelope["itemsPerPage"], json!(2));

    let resources = envelope["Resources"].as_array().unwrap();
    assert_eq!(resources[0]["userName"], json!("a"));
    assert_eq!(resources[1]["userName"], json!("b"));
    for resource in resources {
        assert_eq!(resource["schemas"], json!([USER_SCHEMA_URI]));
        assert!(resource.get("meta").is_none());
    }
}

#[test]
fn test_unknown_resource_type_fails_the_call_only() {
    let assembler = SchemaAssembler::new();
    assert!(assembler.wrap_single(&json!({}), "Device").is_err());
    // The assembler is still usable after a failed call.
    assert!(assembler.wrap_single(&json!({}), "User").is_ok());
}
