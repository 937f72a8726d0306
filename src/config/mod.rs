//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`GTASKS_API_BASE_URL`, `GTASKS_API_TIMEOUT_SECS`,
//!    `GTASKS_AUTH_FLOW`, `GTASKS_CREDENTIALS_FILE`, `GTASKS_TOKEN_FILE`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./gtasks.toml in the current directory
//! 4. $XDG_CONFIG_HOME/gtasks/gtasks.toml (or ~/.config/gtasks/gtasks.toml)
//! 5. Built-in defaults
//!
//! The preference record (current task list) is not part of this file; it
//! lives in `config.json` next to it and is owned by [`crate::prefs`].

mod defaults;
mod env;
mod init;
mod loader;
mod sources;
mod types;

pub use init::{
    app_config_dir, config_root_dir, default_credentials_path, default_global_config_path,
    default_preferences_path, default_token_path, initialize_default_global_config,
};
pub use loader::{load_config, LoadedConfig};
pub use sources::ConfigSource;
pub use types::{ApiConfig, AuthConfig, AuthFlow, Config, DisplayConfig, GlobalConfigInitResult};
