//! gtasks: manage Google Tasks from the terminal.
//!
//! The library holds everything the `gtasks` binary does apart from argument
//! parsing: settings and the persisted current-list preference, OAuth
//! credentials, the Tasks REST client, the command resolver that turns a
//! parsed command into remote calls, and the interactive view.
//!
//! # Quick start
//!
//! ```no_run
//! use gtasks::api::TasksClient;
//! use gtasks::auth::GoogleCredentialProvider;
//! use gtasks::config::load_config;
//! use gtasks::prefs::FilePreferenceStore;
//! use gtasks::resolver::{CommandResolver, StatusFilter};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = load_config(None)?;
//! let credentials = Arc::new(GoogleCredentialProvider::from_config(&loaded.config.auth)?);
//! let api = TasksClient::new(&loaded.config.api, credentials);
//! let prefs = FilePreferenceStore::at_default_location()?;
//! let resolver = CommandResolver::new(&api, &prefs, loaded.config.api.list_page_size);
//! for task in resolver.list_tasks(None, StatusFilter::Incomplete).await? {
//!     println!("{}", task.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod prefs;
pub mod render;
pub mod resolver;
#[cfg(test)]
pub mod testsupport;
pub mod tui;
