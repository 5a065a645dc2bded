//! The decision state machine: should-load, will-load, reconciliation.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::host::{EditorRuntime, HostProbe};
use crate::request::RequestContext;
use blockramp_criteria::{ConfigBackend, CriteriaStore, PostRegistry};
use blockramp_types::{Criteria, LoadOverride, PostId, PostTypeSlug};
use std::collections::BTreeSet;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The editor was forced to load.
    ForcedLoad,
    /// The editor was forced to stay unloaded.
    ForcedUnload,
    /// The host's default behavior already matched; nothing was done.
    Unchanged,
}

/// Per-request load-decision engine.
///
/// Owns the criteria store and its collaborators; `decision` and `active`
/// are request-scoped and must never outlive the request.
#[derive(Debug)]
pub struct RampEngine<B, R, P, E> {
    store: CriteriaStore<B>,
    registry: R,
    probe: P,
    runtime: E,
    config: EngineConfig,
    /// Recorded outcome of force-load/force-unload, consulted by the gate.
    decision: Option<bool>,
    /// Whether the theme's activation call was made this request.
    active: bool,
}

impl<B, R, P, E> RampEngine<B, R, P, E>
where
    B: ConfigBackend,
    R: PostRegistry,
    P: HostProbe,
    E: EditorRuntime,
{
    pub fn new(backend: B, registry: R, probe: P, runtime: E, config: EngineConfig) -> Self {
        let store =
            CriteriaStore::with_option_names(backend, &config.option_name, &config.ui_option_name);
        Self {
            store,
            registry,
            probe,
            runtime,
            config,
            decision: None,
            active: false,
        }
    }

    pub fn store(&self) -> &CriteriaStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CriteriaStore<B> {
        &mut self.store
    }

    pub fn runtime(&self) -> &E {
        &self.runtime
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clears request-scoped state, for hosts that pool engine instances
    /// across requests.
    pub fn reset(&mut self) {
        self.decision = None;
        self.active = false;
    }

    // ================================================================
    // Theme opt-in
    // ================================================================

    /// The theme-facing activation call. `None` means "always load".
    ///
    /// Raises the activation flag and stages the criteria when it differs
    /// from the stored record; staging is finalized by [`Self::save_pending`]
    /// once the registry is ready.
    pub fn activate(&mut self, criteria: Option<Criteria>) -> EngineResult<()> {
        self.active = true;
        let criteria = criteria.unwrap_or_else(|| Criteria {
            load: Some(LoadOverride::Always),
            ..Criteria::default()
        });
        if self.store.get()?.as_ref() != Some(&criteria) {
            self.store.set(criteria)?;
        }
        Ok(())
    }

    /// Finalizes staged criteria against the live registry. Returns whether
    /// anything was persisted.
    pub fn save_pending(&mut self) -> EngineResult<bool> {
        Ok(self.store.save(&self.registry)?)
    }

    // ================================================================
    // Decision predicates
    // ================================================================

    /// Whether the editor should load for this request, from stored
    /// criteria and the enabled-post-types view.
    ///
    /// The global `load` flag short-circuits post-type and post-id
    /// matching; a matched post type wins even when no post id resolved.
    /// Store failures degrade to "no criteria".
    pub fn should_load(&self, ctx: &RequestContext) -> bool {
        // Always load on the front-end so blocks keep rendering.
        if !ctx.is_admin {
            return true;
        }

        if !ctx.matches_screen(&self.config.edit_screens) {
            return false;
        }

        let criteria = self.store.get().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read stored criteria, treating as absent");
            None
        });
        let enabled = self.store.enabled_post_types().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read enabled post types, treating as empty");
            BTreeSet::new()
        });

        if criteria.is_none() && enabled.is_empty() {
            return false;
        }

        if let Some(load) = criteria.as_ref().and_then(|c| c.load) {
            return load == LoadOverride::Always;
        }

        let post_id = ctx.post_id();

        if self.is_enabled_post_type(ctx, post_id, &enabled) {
            return true;
        }

        let Some(post_id) = post_id else {
            return false;
        };

        criteria.is_some_and(|c| c.post_ids.contains(&post_id))
    }

    /// Whether the current request's post type is in the enabled view.
    fn is_enabled_post_type(
        &self,
        ctx: &RequestContext,
        post_id: Option<PostId>,
        enabled: &BTreeSet<PostTypeSlug>,
    ) -> bool {
        if enabled.is_empty() {
            return false;
        }

        let current = match post_id {
            Some(id) => self.registry.post_type_of(id),
            None => {
                if let Some(raw) = &ctx.post_type {
                    PostTypeSlug::sanitized(raw)
                } else if ctx.matches_screen(std::slice::from_ref(&self.config.new_post_screen)) {
                    // Plain new-post screens carry no post_type parameter.
                    PostTypeSlug::sanitized(&self.config.default_post_type)
                } else {
                    None
                }
            }
        };

        current.is_some_and(|post_type| enabled.contains(&post_type))
    }

    /// Whether the host will load the new editor by itself. Pure query.
    pub fn will_load(&self) -> bool {
        self.probe.major_version() >= self.config.host_version_threshold
            || self.probe.legacy_loader_registered()
    }

    // ================================================================
    // Reconciliation
    // ================================================================

    /// Compares should-load with will-load and emits at most one
    /// corrective action. Run once per admin bootstrap phase.
    pub fn decide(&mut self, ctx: &RequestContext) -> Decision {
        let should = self.should_load(ctx);
        let will = self.will_load();

        match (should, will) {
            (true, false) => match self.force_load() {
                Ok(()) => {
                    info!("Forcing the block editor to load");
                    Decision::ForcedLoad
                }
                Err(e) => {
                    warn!(error = %e, "Could not force-load the editor, leaving host default");
                    Decision::Unchanged
                }
            },
            (false, true) => {
                info!("Forcing the block editor to stay unloaded");
                self.force_unload();
                Decision::ForcedUnload
            }
            _ => Decision::Unchanged,
        }
    }

    /// Validates the configured editor bundle and activates it, recording
    /// the decision for the gate. On any failure the decision flag stays
    /// unset and the host default applies.
    pub fn force_load(&mut self) -> EngineResult<()> {
        let bundle = self.config.editor_bundle.clone();
        if !is_safe_bundle_path(&bundle) {
            return Err(EngineError::InvalidBundlePath { path: bundle });
        }
        if !bundle.exists() {
            return Err(EngineError::BundleMissing { path: bundle });
        }

        self.decision = Some(true);
        self.runtime.activate(&bundle);
        Ok(())
    }

    /// Records the unload decision. Choosing a fallback editor is the
    /// host's business, not the engine's.
    pub fn force_unload(&mut self) {
        self.decision = Some(false);
    }

    /// Low-level per-post-type veto/allow check, consulted by the host
    /// independently of [`Self::decide`].
    ///
    /// A host `false` is final; otherwise the recorded decision applies,
    /// and with no decision recorded the host's candidate passes through.
    pub fn gate(&self, can_edit: bool, post_type: &PostTypeSlug) -> bool {
        if !can_edit {
            return false;
        }
        match self.decision {
            Some(decision) => {
                debug!(post_type = %post_type, decision, "Gate override");
                decision
            }
            None => can_edit,
        }
    }

    // ================================================================
    // Late-request cleanup
    // ================================================================

    /// Forgets stored criteria when the activation call never happened
    /// this request — the theme removed its opt-in, so the record must go.
    ///
    /// A record that is exactly "never load" is already minimal and is
    /// left alone.
    pub fn cleanup(&mut self) -> EngineResult<()> {
        if self.store.get()?.as_ref().is_some_and(Criteria::is_never_only) {
            return Ok(());
        }
        if !self.active {
            self.store.delete()?;
        }
        Ok(())
    }

    /// Public post types that cannot host the editor, for settings-layer
    /// embedders.
    pub fn unsupported_post_types(&self) -> BTreeSet<PostTypeSlug> {
        self.registry.unsupported_post_types()
    }
}

/// Rejects traversal (`..` components), home expansion and drive/stream
/// separators before the bundle is handed to the runtime.
fn is_safe_bundle_path(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    if raw.starts_with('~') || raw.contains(':') {
        return false;
    }
    !path.components().any(|c| matches!(c, Component::ParentDir))
}
