//! Engine configuration — reads a `blockramp.toml` and falls back to
//! defaults on any problem.
//!
//! Everything the source plugin exposed through ambient filters (option
//! name, editor load path) is an explicit configuration field here, along
//! with the host version threshold that used to be a hard-coded constant.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Option name the criteria record is stored under.
    pub option_name: String,
    /// Option name of the settings-UI post-type enable list.
    pub ui_option_name: String,
    /// Path of the editor bootstrap resource included on force-load.
    pub editor_bundle: PathBuf,
    /// Host major version at and above which the host loads the new
    /// editor by itself.
    pub host_version_threshold: u32,
    /// Admin screens on which the decision applies.
    pub edit_screens: Vec<String>,
    /// The "new post" screen; requests to it without an explicit post type
    /// default to `default_post_type`.
    pub new_post_screen: String,
    /// Post type assumed on the plain new-post screen.
    pub default_post_type: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            option_name: blockramp_criteria::DEFAULT_OPTION_NAME.to_string(),
            ui_option_name: blockramp_criteria::DEFAULT_UI_OPTION_NAME.to_string(),
            editor_bundle: PathBuf::from("plugins/block-editor/block-editor.php"),
            host_version_threshold: 5,
            edit_screens: vec!["post.php".to_string(), "post-new.php".to_string()],
            new_post_screen: "post-new.php".to_string(),
            default_post_type: "post".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from an explicit TOML path.
    ///
    /// A missing file is normal and yields the defaults; an unreadable or
    /// unparsable file does too, with a warning — configuration problems
    /// must never change the host's editor behavior.
    pub fn load_from(path: PathBuf) -> Self {
        if !path.exists() {
            info!("No engine config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<RampFile>(&contents) {
                Ok(file) => {
                    info!("Loaded engine config from {:?}", path);
                    file.into_config()
                }
                Err(e) => {
                    warn!("Failed to parse engine config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read engine config {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }
}

/// Raw TOML structure matching the `blockramp.toml` format. Every key is
/// optional; unset keys inherit the default.
#[derive(Deserialize)]
struct RampFile {
    #[serde(default)]
    ramp: RampSection,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case", default)]
struct RampSection {
    option_name: Option<String>,
    ui_option_name: Option<String>,
    editor_bundle: Option<PathBuf>,
    host_version_threshold: Option<u32>,
    edit_screens: Option<Vec<String>>,
    new_post_screen: Option<String>,
    default_post_type: Option<String>,
}

impl RampFile {
    fn into_config(self) -> EngineConfig {
        let defaults = EngineConfig::default();
        let ramp = self.ramp;
        EngineConfig {
            option_name: ramp.option_name.unwrap_or(defaults.option_name),
            ui_option_name: ramp.ui_option_name.unwrap_or(defaults.ui_option_name),
            editor_bundle: ramp.editor_bundle.unwrap_or(defaults.editor_bundle),
            host_version_threshold: ramp
                .host_version_threshold
                .unwrap_or(defaults.host_version_threshold),
            edit_screens: ramp.edit_screens.unwrap_or(defaults.edit_screens),
            new_post_screen: ramp.new_post_screen.unwrap_or(defaults.new_post_screen),
            default_post_type: ramp.default_post_type.unwrap_or(defaults.default_post_type),
        }
    }
}
