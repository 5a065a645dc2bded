//! The criteria store: pending value, two-phase validation, persistence.

use crate::registry::PostRegistry;
use crate::{ConfigBackend, StoreError, StoreResult, DEFAULT_OPTION_NAME, DEFAULT_UI_OPTION_NAME};
use blockramp_types::{Criteria, PostTypeSlug};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

/// Owns the persisted criteria record and the request-scoped pending value.
///
/// One instance per request. The pending value is *not* a cache: it holds
/// criteria that passed structural validation but have not yet been checked
/// against the live post-type registry. `save` performs that second check
/// and either persists or drops it.
#[derive(Debug)]
pub struct CriteriaStore<B> {
    backend: B,
    option_name: String,
    ui_option_name: String,
    pending: Option<Criteria>,
}

impl<B: ConfigBackend> CriteriaStore<B> {
    /// Creates a store with the default option names.
    pub fn new(backend: B) -> Self {
        Self::with_option_names(backend, DEFAULT_OPTION_NAME, DEFAULT_UI_OPTION_NAME)
    }

    /// Creates a store with explicit option names, for hosts that namespace
    /// their option table differently.
    pub fn with_option_names(backend: B, option_name: &str, ui_option_name: &str) -> Self {
        Self {
            backend,
            option_name: option_name.to_string(),
            ui_option_name: ui_option_name.to_string(),
            pending: None,
        }
    }

    /// The option name the criteria record is stored under.
    #[must_use]
    pub fn option_name(&self) -> &str {
        &self.option_name
    }

    /// Reads the persisted criteria record.
    ///
    /// A corrupt stored value is reported and treated as absent rather than
    /// failing the request.
    pub fn get(&self) -> StoreResult<Option<Criteria>> {
        let Some(value) = self.backend.get(&self.option_name)? else {
            return Ok(None);
        };
        match serde_json::from_value::<Criteria>(value) {
            Ok(criteria) => Ok(Some(criteria)),
            Err(e) => {
                warn!(option = %self.option_name, error = %e, "Stored criteria record is corrupt, ignoring");
                Ok(None)
            }
        }
    }

    /// The structurally-valid criteria awaiting semantic validation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&Criteria> {
        self.pending.as_ref()
    }

    /// Stages a criteria value, merging it over any already-pending one.
    ///
    /// Rejects an empty record; on rejection the previous pending value is
    /// untouched.
    pub fn set(&mut self, criteria: Criteria) -> StoreResult<()> {
        if criteria.is_empty() {
            return Err(StoreError::Criteria(blockramp_types::CriteriaError::Empty));
        }
        self.pending = Some(match self.pending.take() {
            Some(existing) => criteria.merged_over(existing),
            None => criteria,
        });
        Ok(())
    }

    /// Structurally validates untrusted input and stages it.
    pub fn set_value(&mut self, raw: &Value) -> StoreResult<()> {
        let criteria = Criteria::from_value(raw)?;
        self.set(criteria)
    }

    /// Validates the pending value against the live registry and persists
    /// it.
    ///
    /// Returns `Ok(false)` when nothing was pending. A pending value naming
    /// an unsupported post type is dropped with a warning and the persisted
    /// record is left untouched.
    pub fn save(&mut self, registry: &impl PostRegistry) -> StoreResult<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };

        let supported = registry.supported_post_types();
        if let Some(unknown) = pending.post_types.iter().find(|s| !supported.contains(*s)) {
            warn!(post_type = %unknown, "Cannot enable the block editor for an unsupported post type");
            return Err(StoreError::UnsupportedPostType(unknown.to_string()));
        }

        let value = serde_json::to_value(&pending)?;
        self.backend.set(&self.option_name, value)?;
        Ok(true)
    }

    /// Removes the persisted criteria record.
    pub fn delete(&mut self) -> StoreResult<()> {
        self.backend.delete(&self.option_name)
    }

    /// The enabled-post-types view: union of the settings-UI enable list
    /// and the stored criteria's `post_types`.
    pub fn enabled_post_types(&self) -> StoreResult<BTreeSet<PostTypeSlug>> {
        let mut enabled = match self.backend.get(&self.ui_option_name)? {
            Some(value) => parse_ui_option(&value),
            None => BTreeSet::new(),
        };
        if let Some(criteria) = self.get()? {
            enabled.extend(criteria.post_types);
        }
        Ok(enabled)
    }
}

/// The UI option is externally owned; accept both shapes it has been stored
/// in: a plain array of slugs, or a checkbox map of slug to truthy value.
fn parse_ui_option(value: &Value) -> BTreeSet<PostTypeSlug> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(PostTypeSlug::sanitized)
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, enabled)| truthy(enabled))
            .filter_map(|(slug, _)| PostTypeSlug::sanitized(slug))
            .collect(),
        other => {
            warn!(value = %other, "Unrecognized UI post-type option shape, ignoring");
            BTreeSet::new()
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false"),
        _ => false,
    }
}
