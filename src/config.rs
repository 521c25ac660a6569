//! Mapping profile persistence.
//!
//! A profile is the serializable bundle a calling application stores and
//! edits: the resource type plus an ordered rule set. Profiles persist as
//! JSON and round-trip losslessly; nothing in the serialized form is
//! engine-internal.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapResult;
use crate::mapping::{MappingEngine, MappingRule};

/// A named, persistable mapping configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MappingProfile {
    /// Display name for the profile.
    pub name: String,

    /// SCIM resource type the rules target (`User` or `Group`).
    pub resource_type: String,

    /// Ordered rule set.
    #[serde(default)]
    pub rules: Vec<MappingRule>,
}

impl MappingProfile {
    /// Creates an empty profile.
    pub fn new<N: Into<String>, R: Into<String>>(name: N, resource_type: R) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            rules: Vec::new(),
        }
    }

    /// Parses a profile from its JSON form.
    pub fn from_json(json: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the profile to pretty-printed JSON.
    pub fn to_json(&self) -> MapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a profile from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> MapResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Saves the profile as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MapResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Compiles this profile's rules into an engine.
    ///
    /// # Errors
    ///
    /// Propagates rule compilation failures; see `MappingEngine::new`.
    pub fn engine(&self) -> MapResult<MappingEngine> {
        MappingEngine::new(self.rules.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_profile() -> MappingProfile {
        let mut profile = MappingProfile::new("Directory users", "User");
        profile.rules = vec![
            MappingRule::new("login", "userName").required(),
            MappingRule::new("active", "active").with_transform("Boolean(value)"),
            MappingRule::new("", "externalId"),
        ];
        profile
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let profile = sample_profile();
        let text = profile.to_json().unwrap();
        let back = MappingProfile::from_json(&text).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_profile_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let profile = sample_profile();
        profile.save(&path).unwrap();
        let back = MappingProfile::load(&path).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_profile_builds_working_engine() {
        let engine = sample_profile().engine().unwrap();
        let result = engine.transform_forward(&json!({"login": "jdoe", "active": 1}));
        assert_eq!(result, json!({"userName": "jdoe", "active": true}));
    }

    #[test]
    fn test_profile_load_rejects_invalid_json() {
        assert!(MappingProfile::from_json("{not json").is_err());
    }
}
