//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::defaults::MAX_LIST_PAGE_SIZE;
use super::env::apply_runtime_env_overrides;
use super::init::config_root_dir;
use super::sources::{read_config_text_with_sources, ConfigSource};
use super::Config;

/// Config plus the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    normalize(&mut config)?;
    tracing::debug!(?source, "loaded configuration");
    Ok(LoadedConfig { config, source })
}

fn normalize(config: &mut Config) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim().trim_end_matches('/');
    config.api.base_url = base_url.to_string();
    if config.api.base_url.is_empty() {
        return Err(ConfigError::Invalid(
            "api.base_url cannot be empty".to_string(),
        ));
    }
    // Zero would mean "no timeout" to reqwest.
    config.api.timeout_secs = config.api.timeout_secs.max(1);
    if config.api.list_page_size == 0 || config.api.list_page_size > MAX_LIST_PAGE_SIZE {
        return Err(ConfigError::Invalid(format!(
            "api.list_page_size must be between 1 and {MAX_LIST_PAGE_SIZE}, got {}",
            config.api.list_page_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthFlow;
    use std::collections::HashMap;

    fn files(entries: &[(&str, &str)]) -> HashMap<PathBuf, String> {
        entries
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect()
    }

    fn load_with(
        path_override: Option<&str>,
        files: HashMap<PathBuf, String>,
        env: &[(&str, &str)],
    ) -> Result<LoadedConfig, ConfigError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_from_sources(
            path_override,
            move |path| {
                files.get(path).cloned().ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing fixture")
                })
            },
            move |name| env.get(name).cloned(),
            || Some(PathBuf::from("/home/test/.config")),
        )
    }

    #[test]
    fn empty_sources_use_builtin_defaults() {
        let loaded = load_with(None, HashMap::new(), &[]).expect("defaults");
        assert_eq!(loaded.source, ConfigSource::BuiltInDefaults);
        assert_eq!(
            loaded.config.api.base_url,
            "https://tasks.googleapis.com/tasks/v1"
        );
        assert_eq!(loaded.config.api.list_page_size, 100);
        assert_eq!(loaded.config.auth.flow, AuthFlow::Auto);
        assert!(loaded.config.display.color);
    }

    #[test]
    fn local_file_wins_over_global_file() {
        let fixtures = files(&[
            ("gtasks.toml", "[display]\ncolor = false\n"),
            (
                "/home/test/.config/gtasks/gtasks.toml",
                "[display]\ncolor = true\n",
            ),
        ]);
        let loaded = load_with(None, fixtures, &[]).expect("load");
        assert_eq!(loaded.source, ConfigSource::Local);
        assert!(!loaded.config.display.color);
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let fixtures = files(&[(
            "/home/test/.config/gtasks/gtasks.toml",
            "[auth]\nflow = \"manual\"\n",
        )]);
        let loaded = load_with(None, fixtures, &[]).expect("load");
        assert!(matches!(loaded.source, ConfigSource::Global(_)));
        assert_eq!(loaded.config.auth.flow, AuthFlow::Manual);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_with(Some("nope.toml"), HashMap::new(), &[]).expect_err("must fail");
        assert!(err.to_string().starts_with("io:"), "got: {err}");
    }

    #[test]
    fn env_overrides_file_values() {
        let fixtures = files(&[(
            "gtasks.toml",
            "[api]\nbase_url = \"http://file\"\ntimeout_secs = 5\n",
        )]);
        let loaded = load_with(
            None,
            fixtures,
            &[
                ("GTASKS_API_BASE_URL", "http://env/"),
                ("GTASKS_API_TIMEOUT_SECS", "0"),
                ("GTASKS_AUTH_FLOW", "Carbonyl"),
                ("GTASKS_TOKEN_FILE", "/tmp/token.json"),
            ],
        )
        .expect("load");
        assert_eq!(loaded.config.api.base_url, "http://env");
        assert_eq!(loaded.config.api.timeout_secs, 1);
        assert_eq!(loaded.config.auth.flow, AuthFlow::Carbonyl);
        assert_eq!(
            loaded.config.auth.token_file.as_deref(),
            Some("/tmp/token.json")
        );
    }

    #[test]
    fn invalid_env_flow_is_rejected() {
        let err =
            load_with(None, HashMap::new(), &[("GTASKS_AUTH_FLOW", "sso")]).expect_err("invalid");
        assert!(err.to_string().contains("GTASKS_AUTH_FLOW"), "got: {err}");
    }

    #[test]
    fn page_size_out_of_range_is_rejected() {
        let fixtures = files(&[("gtasks.toml", "[api]\nlist_page_size = 500\n")]);
        let err = load_with(None, fixtures, &[]).expect_err("invalid");
        assert!(err.to_string().contains("list_page_size"), "got: {err}");
    }

    #[test]
    fn bundled_template_parses() {
        let fixtures = files(&[(
            "gtasks.toml",
            super::super::defaults::DEFAULT_CONFIG_TEMPLATE,
        )]);
        let loaded = load_with(None, fixtures, &[]).expect("template must parse");
        assert_eq!(loaded.config.api.timeout_secs, 30);
        assert_eq!(loaded.config.auth.redirect_port, 0);
    }
}
