//! Host-state collaborators.

use std::path::Path;

/// Probe of the host's own default editor behavior.
pub trait HostProbe {
    /// Host major version. At or above the configured threshold the host
    /// ships the new editor itself.
    fn major_version(&self) -> u32;

    /// Whether the legacy standalone editor plugin has hooked its loader
    /// into this request.
    fn legacy_loader_registered(&self) -> bool;
}

/// Fixed probe values, for tests and hosts whose state is known up front.
#[derive(Debug, Clone, Copy)]
pub struct StaticHostProbe {
    pub major_version: u32,
    pub legacy_loader: bool,
}

impl HostProbe for StaticHostProbe {
    fn major_version(&self) -> u32 {
        self.major_version
    }

    fn legacy_loader_registered(&self) -> bool {
        self.legacy_loader
    }
}

/// Activates the editor bundle once the engine has validated it.
pub trait EditorRuntime {
    /// Called at most once per request, after the bundle path passed the
    /// traversal and existence checks.
    fn activate(&mut self, bundle: &Path);
}

/// Runtime for hosts that only consult the gate and load nothing
/// themselves.
#[derive(Debug, Default)]
pub struct NoopRuntime;

impl EditorRuntime for NoopRuntime {
    fn activate(&mut self, _bundle: &Path) {}
}
