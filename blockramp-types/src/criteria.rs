//! The criteria record and its validation/merge rules.

use crate::{CriteriaError, PostId, PostTypeSlug};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;

/// Global editor-load override.
///
/// Persisted as `1` (always) / `0` (never) for compatibility with records
/// written by earlier revisions of the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOverride {
    /// Never load the editor, regardless of post id or type.
    Never,
    /// Always load the editor on eligible screens.
    Always,
}

impl LoadOverride {
    /// Parses a load flag from an untrusted JSON value.
    /// Only `0`, `1`, `true` and `false` are accepted.
    pub fn from_value(value: &Value) -> crate::Result<Self> {
        match value {
            Value::Bool(true) => Ok(Self::Always),
            Value::Bool(false) => Ok(Self::Never),
            Value::Number(n) => match n.as_u64() {
                Some(1) => Ok(Self::Always),
                Some(0) => Ok(Self::Never),
                _ => Err(CriteriaError::InvalidLoadFlag(value.to_string())),
            },
            _ => Err(CriteriaError::InvalidLoadFlag(value.to_string())),
        }
    }
}

impl Serialize for LoadOverride {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Never => 0,
            Self::Always => 1,
        })
    }
}

impl<'de> Deserialize<'de> for LoadOverride {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

/// The validated record governing editor-load decisions.
///
/// All three fields are optional; an entirely empty record is not a valid
/// criteria value and is rejected at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Criteria {
    /// Global override: wins over post-type and post-id matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadOverride>,

    /// Post types for which the editor is enabled.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub post_types: BTreeSet<PostTypeSlug>,

    /// Explicit post ids for which the editor is enabled.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub post_ids: BTreeSet<PostId>,
}

impl Criteria {
    /// Structurally validates an untrusted JSON value into a criteria
    /// record.
    ///
    /// The value must be a non-empty mapping whose keys are a subset of
    /// `load`, `post_types` and `post_ids`; any unknown key or malformed
    /// field rejects the whole record.
    pub fn from_value(value: &Value) -> crate::Result<Self> {
        let map = match value.as_object() {
            Some(map) => map,
            None => return Err(CriteriaError::NotAnObject(value.to_string())),
        };
        if map.is_empty() {
            return Err(CriteriaError::Empty);
        }

        let mut criteria = Self::default();
        for (key, field) in map {
            match key.as_str() {
                "load" => criteria.load = Some(LoadOverride::from_value(field)?),
                "post_ids" => criteria.post_ids = parse_post_ids(field)?,
                "post_types" => criteria.post_types = parse_post_types(field)?,
                other => return Err(CriteriaError::UnknownField(other.to_string())),
            }
        }
        Ok(criteria)
    }

    /// Merges `self` (the newer value) over `existing`.
    ///
    /// A newer `load` flag evicts any stored one; `post_types` and
    /// `post_ids` are unioned. Associative and idempotent.
    #[must_use]
    pub fn merged_over(self, existing: Self) -> Self {
        let mut merged = existing;
        if self.load.is_some() {
            merged.load = self.load;
        }
        merged.post_types.extend(self.post_types);
        merged.post_ids.extend(self.post_ids);
        merged
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.load.is_none() && self.post_types.is_empty() && self.post_ids.is_empty()
    }

    /// Returns `true` when the record is exactly `{load: 0}` — the
    /// minimal "never load" state that cleanup leaves untouched.
    #[must_use]
    pub fn is_never_only(&self) -> bool {
        self.load == Some(LoadOverride::Never)
            && self.post_types.is_empty()
            && self.post_ids.is_empty()
    }
}

fn parse_post_ids(field: &Value) -> crate::Result<BTreeSet<PostId>> {
    let items = field
        .as_array()
        .ok_or_else(|| CriteriaError::InvalidPostId(field.to_string()))?;
    let mut ids = BTreeSet::new();
    for item in items {
        let id = item
            .as_u64()
            .ok_or_else(|| CriteriaError::InvalidPostId(item.to_string()))?;
        ids.insert(PostId::new(id)?);
    }
    Ok(ids)
}

fn parse_post_types(field: &Value) -> crate::Result<BTreeSet<PostTypeSlug>> {
    let items = field
        .as_array()
        .ok_or_else(|| CriteriaError::InvalidPostType(field.to_string()))?;
    let mut slugs = BTreeSet::new();
    for item in items {
        let raw = item
            .as_str()
            .ok_or_else(|| CriteriaError::InvalidPostType(item.to_string()))?;
        slugs.insert(PostTypeSlug::new(raw)?);
    }
    Ok(slugs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn slug(s: &str) -> PostTypeSlug {
        PostTypeSlug::new(s).unwrap()
    }

    fn id(n: u64) -> PostId {
        PostId::new(n).unwrap()
    }

    // ================================================================
    // Structural validation
    // ================================================================

    #[test]
    fn from_value_accepts_full_record() {
        let criteria =
            Criteria::from_value(&json!({"load": 1, "post_types": ["page"], "post_ids": [42, 7]}))
                .unwrap();
        assert_eq!(criteria.load, Some(LoadOverride::Always));
        assert!(criteria.post_types.contains(&slug("page")));
        assert!(criteria.post_ids.contains(&id(42)));
        assert!(criteria.post_ids.contains(&id(7)));
    }

    #[test]
    fn from_value_accepts_bool_load() {
        let criteria = Criteria::from_value(&json!({"load": false})).unwrap();
        assert_eq!(criteria.load, Some(LoadOverride::Never));
    }

    #[test]
    fn from_value_rejects_unknown_key() {
        let err = Criteria::from_value(&json!({"post_ids": [1], "colour": "red"})).unwrap_err();
        assert!(matches!(err, CriteriaError::UnknownField(k) if k == "colour"));
    }

    #[test]
    fn from_value_rejects_non_object() {
        assert!(matches!(
            Criteria::from_value(&json!([1, 2])),
            Err(CriteriaError::NotAnObject(_))
        ));
        assert!(matches!(
            Criteria::from_value(&json!("load")),
            Err(CriteriaError::NotAnObject(_))
        ));
    }

    #[test]
    fn from_value_rejects_empty_mapping() {
        assert!(matches!(
            Criteria::from_value(&json!({})),
            Err(CriteriaError::Empty)
        ));
    }

    #[test]
    fn from_value_rejects_bad_post_ids() {
        assert!(Criteria::from_value(&json!({"post_ids": [0]})).is_err());
        assert!(Criteria::from_value(&json!({"post_ids": [-3]})).is_err());
        assert!(Criteria::from_value(&json!({"post_ids": ["5"]})).is_err());
        assert!(Criteria::from_value(&json!({"post_ids": 5})).is_err());
    }

    #[test]
    fn from_value_rejects_bad_post_types() {
        assert!(Criteria::from_value(&json!({"post_types": ["Page"]})).is_err());
        assert!(Criteria::from_value(&json!({"post_types": ["my type"]})).is_err());
        assert!(Criteria::from_value(&json!({"post_types": [7]})).is_err());
        assert!(Criteria::from_value(&json!({"post_types": "page"})).is_err());
    }

    #[test]
    fn from_value_rejects_bad_load_flag() {
        assert!(Criteria::from_value(&json!({"load": 2})).is_err());
        assert!(Criteria::from_value(&json!({"load": -1})).is_err());
        assert!(Criteria::from_value(&json!({"load": "yes"})).is_err());
    }

    // ================================================================
    // Merge rule
    // ================================================================

    #[test]
    fn merge_new_load_evicts_stored_load() {
        // merge({load:1}, {post_ids:[5], load:0}) == {post_ids:[5], load:1}
        let newer = Criteria::from_value(&json!({"load": 1})).unwrap();
        let stored = Criteria::from_value(&json!({"post_ids": [5], "load": 0})).unwrap();

        let merged = newer.merged_over(stored);
        let expected = Criteria::from_value(&json!({"post_ids": [5], "load": 1})).unwrap();
        assert_eq!(merged, expected);
    }

    #[test]
    fn merge_keeps_stored_load_when_new_has_none() {
        let newer = Criteria::from_value(&json!({"post_ids": [9]})).unwrap();
        let stored = Criteria::from_value(&json!({"load": 0})).unwrap();

        let merged = newer.merged_over(stored);
        assert_eq!(merged.load, Some(LoadOverride::Never));
        assert!(merged.post_ids.contains(&id(9)));
    }

    #[test]
    fn merge_unions_and_dedupes_sets() {
        let newer =
            Criteria::from_value(&json!({"post_ids": [1, 2], "post_types": ["page"]})).unwrap();
        let stored =
            Criteria::from_value(&json!({"post_ids": [2, 3], "post_types": ["post"]})).unwrap();

        let merged = newer.merged_over(stored);
        assert_eq!(merged.post_ids.len(), 3);
        assert_eq!(merged.post_types.len(), 2);
    }

    // ================================================================
    // Record shape helpers
    // ================================================================

    #[test]
    fn never_only_detection() {
        assert!(Criteria::from_value(&json!({"load": 0})).unwrap().is_never_only());
        assert!(!Criteria::from_value(&json!({"load": 1})).unwrap().is_never_only());
        assert!(
            !Criteria::from_value(&json!({"load": 0, "post_ids": [1]}))
                .unwrap()
                .is_never_only()
        );
        assert!(!Criteria::default().is_never_only());
    }

    #[test]
    fn empty_detection() {
        assert!(Criteria::default().is_empty());
        assert!(!Criteria::from_value(&json!({"load": 0})).unwrap().is_empty());
    }

    // ================================================================
    // Persistence format
    // ================================================================

    #[test]
    fn serializes_load_as_integer() {
        let criteria = Criteria::from_value(&json!({"load": true})).unwrap();
        let value = serde_json::to_value(&criteria).unwrap();
        assert_eq!(value, json!({"load": 1}));
    }

    #[test]
    fn omits_unset_fields() {
        let criteria = Criteria::from_value(&json!({"post_ids": [42]})).unwrap();
        let value = serde_json::to_value(&criteria).unwrap();
        assert_eq!(value, json!({"post_ids": [42]}));
    }

    #[test]
    fn round_trips_through_json() {
        let original =
            Criteria::from_value(&json!({"load": 0, "post_types": ["page", "news-item"], "post_ids": [3]}))
                .unwrap();
        let value = serde_json::to_value(&original).unwrap();
        let restored: Criteria = serde_json::from_value(value).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let result: Result<Criteria, _> = serde_json::from_value(json!({"loda": 1}));
        assert!(result.is_err());
    }
}
