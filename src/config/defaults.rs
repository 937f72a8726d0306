//! Default configuration constants.

/// Embedded default `gtasks.toml` template written by `gtasks init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/gtasks.toml");
/// Google Tasks REST base URL.
pub(super) const DEFAULT_API_BASE_URL: &str = "https://tasks.googleapis.com/tasks/v1";
/// Default timeout for Tasks API requests.
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
/// Default `maxResults` for task-list listing. The API caps this at 100.
pub(super) const DEFAULT_LIST_PAGE_SIZE: u32 = 100;
/// Upper bound accepted by the API for `maxResults`.
pub(super) const MAX_LIST_PAGE_SIZE: u32 = 100;
/// Loopback port 0 lets the OS pick a free port.
pub(super) const DEFAULT_REDIRECT_PORT: u16 = 0;

/// Directory name under the config root.
pub(super) const APP_DIR_NAME: &str = "gtasks";
/// Settings file name (`gtasks.toml`).
pub(super) const SETTINGS_FILE_NAME: &str = "gtasks.toml";
/// Preference record file name.
pub(super) const PREFERENCES_FILE_NAME: &str = "config.json";
/// Saved OAuth token file name.
pub(super) const TOKEN_FILE_NAME: &str = "token.json";
/// Client secrets file name.
pub(super) const CREDENTIALS_FILE_NAME: &str = "credentials.json";
