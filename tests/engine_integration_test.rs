//! End-to-end coverage of the mapping pipeline: rule compilation, forward
//! and reverse transformation, required-field validation, and profile
//! persistence feeding an engine.

use scimmap::{MappingEngine, MappingProfile, MappingRule};
use serde_json::{json, Value};

fn directory_rules() -> Vec<MappingRule> {
    vec![
        MappingRule::new("login", "userName").required(),
        MappingRule::new("firstName", "name.givenName"),
        MappingRule::new("lastName", "name.familyName"),
        MappingRule::new("email", "emails[0].value"),
        MappingRule::new("altEmail", "emails[1].value"),
        MappingRule::new("active", "active").with_transform("Boolean(value)"),
        MappingRule::new("firstName", "displayName")
            .with_transform("value + ' ' + source.lastName"),
    ]
}

#[test]
fn test_full_forward_transformation() {
    let engine = MappingEngine::new(directory_rules()).unwrap();
    let record = json!({
        "login": "jdoe",
        "firstName": "John",
        "lastName": "Doe",
        "email": "john@x.com",
        "active": 1
    });

    let document = engine.transform_forward(&record);

    assert_eq!(
        document,
        json!({
            "userName": "jdoe",
            "name": {"givenName": "John", "familyName": "Doe"},
            "emails": [{"value": "john@x.com"}],
            "active": true,
            "displayName": "John Doe"
        })
    );
}

#[test]
fn test_round_trip_reproduces_mapped_subset() {
    // Transform-free, fully bound rules: reverse(forward(x)) must reproduce
    // the subset of the source the rules cover.
    let rules = vec![
        MappingRule::new("login", "userName"),
        MappingRule::new("firstName", "name.givenName"),
        MappingRule::new("lastName", "name.familyName"),
        MappingRule::new("email", "emails[0].value"),
    ];
    let engine = MappingEngine::new(rules).unwrap();
    let record = json!({
        "login": "jdoe",
        "firstName": "John",
        "lastName": "Doe",
        "email": "john@x.com",
        "department": "not mapped"
    });

    let round_tripped = engine.transform_reverse(&engine.transform_forward(&record));

    assert_eq!(
        round_tripped,
        json!({
            "login": "jdoe",
            "firstName": "John",
            "lastName": "Doe",
            "email": "john@x.com"
        })
    );
}

#[test]
fn test_omission_invariant() {
    // A source miss must leave the target key absent, never null.
    let engine = MappingEngine::new(directory_rules()).unwrap();
    let document = engine.transform_forward(&json!({"login": "jdoe"}));

    assert_eq!(document.get("emails"), None);
    assert_eq!(document.get("active"), None);
    assert!(document.get("userName").is_some());
}

#[test]
fn test_one_failing_transform_does_not_poison_the_document() {
    let _ = env_logger::builder().is_test(true).try_init();
    let rules = vec![
        MappingRule::new("a", "a"),
        MappingRule::new("b", "b"),
        MappingRule::new("c", "c").with_transform("noSuchFunction(value)"),
        MappingRule::new("d", "d"),
        MappingRule::new("e", "e"),
    ];
    let engine = MappingEngine::new(rules).unwrap();
    let document = engine.transform_forward(&json!({"a": 1, "b": 2, "c": 3, "d": 4, "e": 5}));

    assert_eq!(document, json!({"a": 1, "b": 2, "d": 4, "e": 5}));
}

#[test]
fn test_required_validation_reports_structured_data() {
    let engine = MappingEngine::new(directory_rules()).unwrap();

    let report = engine.validate_required(&json!({"login": ""}));
    assert!(!report.valid);
    assert_eq!(report.missing_fields, vec!["login".to_string()]);

    let report = engine.validate_required(&json!({"login": "jdoe"}));
    assert!(report.valid);
    assert!(report.missing_fields.is_empty());
}

#[test]
fn test_profile_persists_and_rebuilds_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("directory-users.json");

    let mut profile = MappingProfile::new("Directory users", "User");
    profile.rules = directory_rules();
    profile.save(&path).unwrap();

    let loaded = MappingProfile::load(&path).unwrap();
    assert_eq!(loaded, profile);

    let engine = loaded.engine().unwrap();
    let document = engine.transform_forward(&json!({
        "login": "jdoe",
        "firstName": "J",
        "lastName": "D",
        "email": "j@d.com",
        "active": 0
    }));
    assert_eq!(document["active"], json!(false));
}

#[test]
fn test_persisted_rule_shape_matches_ui_configuration() {
    // The persisted form a configuration UI writes: camelCase keys, optional
    // transformExpression.
    let raw = r#"[
        {"targetPath": "userName", "sourcePath": "login", "required": true},
        {"targetPath": "active", "sourcePath": "enabled",
         "transformExpression": "Boolean(value)"},
        {"targetPath": "externalId", "sourcePath": ""}
    ]"#;
    let rules: Vec<MappingRule> = serde_json::from_str(raw).unwrap();
    let engine = MappingEngine::new(rules).unwrap();

    let document = engine.transform_forward(&json!({"login": "jdoe", "enabled": "yes"}));
    assert_eq!(document, json!({"userName": "jdoe", "active": true}));
}

#[test]
fn test_rule_order_independence_except_duplicate_targets() {
    // Two permutations of a duplicate-free rule set produce the same
    // document.
    let forward = vec![
        MappingRule::new("a", "x.one"),
        MappingRule::new("b", "x.two"),
        MappingRule::new("c", "y[0]"),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let record = json!({"a": 1, "b": 2, "c": 3});
    let first = MappingEngine::new(forward).unwrap().transform_forward(&record);
    let second = MappingEngine::new(reversed).unwrap().transform_forward(&record);
    assert_eq!(first, second);
}

#[test]
fn test_deeply_nested_and_array_heavy_source() {
    let rules = vec![
        MappingRule::new("org.teams[0].members[1].handle", "userName"),
        MappingRule::new("org.teams[0].name", "title"),
    ];
    let engine = MappingEngine::new(rules).unwrap();
    let record = json!({
        "org": {
            "teams": [
                {"name": "Platform", "members": [{"handle": "alice"}, {"handle": "bob"}]}
            ]
        }
    });

    let document = engine.transform_forward(&record);
    assert_eq!(document, json!({"userName": "bob", "title": "Platform"}));
}

#[test]
fn test_non_object_source_records_transform_to_empty_document() {
    // The engine must not assume any particular source shape.
    let engine = MappingEngine::new(directory_rules()).unwrap();
    for record in [json!(42), json!("scalar"), json!([1, 2, 3]), Value::Null] {
        assert_eq!(engine.transform_forward(&record), json!({}));
    }
}
