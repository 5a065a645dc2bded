//! Criteria persistence layer for Blockramp.
//!
//! Owns the validated criteria record and exposes get/set/save/delete over
//! a generic key-value backend. Validation is two-phase by design:
//!
//! - structural validation (cheap, local) gates whether a value becomes
//!   *pending* at all — this can run early in the request, before the
//!   host's post-type registry is populated;
//! - semantic validation (against the live registry) gates whether the
//!   pending value becomes *persisted*.
//!
//! A failed `set` leaves the pending value untouched; a failed `save`
//! drops the pending value and leaves the persisted record untouched. No
//! partial update is ever visible.

mod backend;
mod error;
mod registry;
mod store;

pub use backend::{ConfigBackend, JsonFileBackend, MemoryBackend};
pub use error::{StoreError, StoreResult};
pub use registry::{PostRegistry, StaticRegistry};
pub use store::CriteriaStore;

/// Default option name under which the criteria record is stored.
pub const DEFAULT_OPTION_NAME: &str = "blockramp_load_criteria";

/// Default option name for the settings-UI post-type enable list.
pub const DEFAULT_UI_OPTION_NAME: &str = "blockramp_post_types";
