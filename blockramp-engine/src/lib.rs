//! Load-decision engine for Blockramp.
//!
//! Given the current request context, the stored criteria and a probe of
//! the host's own default behavior, the engine computes whether the block
//! editor *should* load, compares that with whether it *will* load, and
//! emits at most one corrective action per request: force-load or
//! force-unload.
//!
//! # Request lifecycle
//!
//! One engine instance per request, dependency-injected with its
//! collaborators:
//!
//! 1. theme opt-in (optional): [`RampEngine::activate`] stages criteria;
//! 2. once the post-type registry is populated:
//!    [`RampEngine::save_pending`];
//! 3. admin bootstrap: [`RampEngine::decide`];
//! 4. per post-type editor checks: [`RampEngine::gate`];
//! 5. late request phase: [`RampEngine::cleanup`].
//!
//! All failures degrade to "leave the host's current behavior unchanged";
//! none abort the request.

mod config;
mod engine;
mod error;
mod host;
mod request;

pub use config::EngineConfig;
pub use engine::{Decision, RampEngine};
pub use error::{EngineError, EngineResult};
pub use host::{EditorRuntime, HostProbe, NoopRuntime, StaticHostProbe};
pub use request::RequestContext;
