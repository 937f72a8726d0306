//! Environment overrides (`GTASKS_*`).

use crate::error::ConfigError;

use super::{AuthFlow, Config};

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(env_lookup, "GTASKS_API_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(timeout) = non_empty(env_lookup, "GTASKS_API_TIMEOUT_SECS") {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid GTASKS_API_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.api.timeout_secs = parsed;
    }
    if let Some(flow) = non_empty(env_lookup, "GTASKS_AUTH_FLOW") {
        config.auth.flow = AuthFlow::parse(&flow).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "invalid GTASKS_AUTH_FLOW value `{flow}`: expected auto, carbonyl, or manual"
            ))
        })?;
    }
    if let Some(path) = non_empty(env_lookup, "GTASKS_CREDENTIALS_FILE") {
        config.auth.credentials_file = Some(path);
    }
    if let Some(path) = non_empty(env_lookup, "GTASKS_TOKEN_FILE") {
        config.auth.token_file = Some(path);
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
