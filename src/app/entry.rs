//! Application entry orchestration for the gtasks CLI.

use crate::app::commands;
use crate::cli::{self, Command, EditTarget, ListTarget, UseTarget};
use gtasks::api::TasksClient;
use gtasks::auth::{
    reset_tokens, token_health, CredentialProvider, GoogleCredentialProvider, LoginNotifier,
    LoginStep,
};
use gtasks::config::{initialize_default_global_config, load_config, Config, GlobalConfigInitResult};
use gtasks::prefs::FilePreferenceStore;
use gtasks::render::{RenderSink, Renderer};
use gtasks::resolver::CommandResolver;
use std::sync::Arc;

/// Top-level CLI entrypoint. Returns the process exit code.
pub(crate) async fn run(args: cli::Args) -> i32 {
    let bootstrap_renderer = Renderer::new(!args.no_color);
    if let Command::Init { force } = &args.command {
        if let Err(msg) = run_init_flow(&bootstrap_renderer, *force) {
            bootstrap_renderer.error(&msg);
            return 1;
        }
        return 0;
    }

    let config = match load_effective_config(&args) {
        Ok(config) => config,
        Err(msg) => {
            bootstrap_renderer.error(&msg);
            return 1;
        }
    };
    let renderer = Renderer::new(config.display.color);

    let result = match &args.command {
        Command::Login { check, reset } => {
            run_login_flow(&renderer, &config, *reset, *check).await
        }
        Command::Tui => run_tui(&renderer, &config).await,
        command => run_remote_command(&renderer, &config, command).await,
    };
    match result {
        Ok(()) => 0,
        Err(msg) => {
            renderer.error(&msg);
            1
        }
    }
}

/// Load settings and apply CLI overrides.
fn load_effective_config(args: &cli::Args) -> Result<Config, String> {
    let loaded = load_config(args.config.as_deref()).map_err(|err| err.to_string())?;
    tracing::debug!(source = ?loaded.source, "loaded settings");
    let mut config = loaded.config;
    apply_cli_overrides(args, &mut config);
    Ok(config)
}

/// Apply CLI runtime overrides that outrank config files and environment.
fn apply_cli_overrides(args: &cli::Args, config: &mut Config) {
    if let Some(flow) = args.auth_flow {
        config.auth.flow = flow;
    }
    if args.no_color {
        config.display.color = false;
    }
}

/// Credential provider that may run an interactive login on first use.
fn interactive_credentials(
    renderer: Renderer,
    config: &Config,
) -> Result<Arc<GoogleCredentialProvider>, String> {
    let provider = GoogleCredentialProvider::from_config(&config.auth)
        .map_err(|err| err.to_string())?
        .with_login_notifier(login_notifier(renderer));
    Ok(Arc::new(provider))
}

fn login_notifier(renderer: Renderer) -> LoginNotifier {
    Arc::new(move |step: LoginStep<'_>| match step {
        LoginStep::WaitingForRedirect {
            url,
            browser_opened,
        } => {
            renderer.activity("login");
            renderer.field("url", url);
            renderer.field(
                "browser",
                if browser_opened {
                    "opened"
                } else {
                    "not available (open URL manually)"
                },
            );
            renderer.activity("waiting for authorization");
        }
        LoginStep::PasteRequired { url } => {
            renderer.activity("login");
            renderer.field("url", url);
            renderer.activity(
                "open the URL, approve access, then paste the address you were sent to (or just the code):",
            );
        }
    })
}

async fn run_remote_command(
    renderer: &Renderer,
    config: &Config,
    command: &Command,
) -> Result<(), String> {
    let credentials = interactive_credentials(*renderer, config)?;
    let api = TasksClient::new(&config.api, credentials);
    let prefs = FilePreferenceStore::at_default_location().map_err(|err| err.to_string())?;
    let resolver = CommandResolver::new(&api, &prefs, config.api.list_page_size);

    let result = match command {
        Command::List {
            target: ListTarget::Lists,
        } => commands::list_lists(&resolver, renderer).await,
        Command::List {
            target: ListTarget::Tasks { list, status },
        } => commands::list_tasks(&resolver, renderer, list.list.as_deref(), *status).await,
        Command::Use {
            target: UseTarget::List { id, name },
        } => commands::use_list(&resolver, renderer, id.as_deref(), name.as_deref()).await,
        Command::Add { title, list } => {
            commands::add_task(&resolver, renderer, title, list.list.as_deref()).await
        }
        Command::Delete { task_id, list } => {
            commands::delete_task(&resolver, renderer, task_id, list.list.as_deref()).await
        }
        Command::Complete { task_id, list } => {
            commands::complete_task(&resolver, renderer, task_id, list.list.as_deref()).await
        }
        Command::Edit {
            target:
                EditTarget::Task {
                    id,
                    title,
                    description,
                    list,
                },
        } => {
            commands::edit_task(
                &resolver,
                renderer,
                id,
                title.as_deref(),
                description.as_deref(),
                list.list.as_deref(),
            )
            .await
        }
        Command::Edit {
            target: EditTarget::List { id, name },
        } => commands::edit_list(&resolver, renderer, id, name.as_deref()).await,
        Command::Login { .. } | Command::Init { .. } | Command::Tui => {
            return Err("command is not a task command".to_string())
        }
    };
    result.map_err(|err| err.to_string())
}

/// Obtain credentials up front, then hand the terminal to the interactive view.
async fn run_tui(renderer: &Renderer, config: &Config) -> Result<(), String> {
    let credentials = interactive_credentials(*renderer, config)?;
    // Login prompts cannot run once the alternate screen is up.
    credentials
        .access_token()
        .await
        .map_err(|err| err.to_string())?;
    let api = TasksClient::new(&config.api, credentials);
    let prefs = FilePreferenceStore::at_default_location().map_err(|err| err.to_string())?;
    gtasks::tui::run_interactive(
        Arc::new(api),
        Arc::new(prefs),
        config.api.list_page_size,
        renderer.color_enabled(),
    )
    .await
    .map_err(|err| format!("interactive view failed: {err}"))
}

/// Handle `gtasks init` and render user-facing status messages.
fn run_init_flow(renderer: &dyn RenderSink, force: bool) -> Result<(), String> {
    match initialize_default_global_config(force)
        .map_err(|e| format!("failed to initialize ~/.config/gtasks: {e}"))?
    {
        GlobalConfigInitResult::Created { path } => {
            renderer.activity("initialized gtasks config");
            renderer.field("path", &path.display().to_string());
            Ok(())
        }
        GlobalConfigInitResult::Overwritten { path, backup_path } => {
            renderer.activity("reinitialized gtasks config");
            renderer.field("path", &path.display().to_string());
            renderer.field("backup", &backup_path.display().to_string());
            Ok(())
        }
        GlobalConfigInitResult::AlreadyInitialized { path } => Err(format!(
            "gtasks is already initialized at {}. Use `gtasks init --force` to overwrite.",
            path.display()
        )),
    }
}

/// Handle `gtasks login`: show saved-login health, optionally reset it, then
/// run the configured authorization flow.
async fn run_login_flow(
    renderer: &Renderer,
    config: &Config,
    reset: bool,
    check: bool,
) -> Result<(), String> {
    let provider = interactive_credentials(*renderer, config)?;
    let token_path = provider.token_path();

    let health = token_health(token_path)
        .map_err(|err| format!("failed to check existing login health: {err}"))?;
    renderer.activity("login health");
    renderer.field("token_file", &token_path.display().to_string());
    renderer.field(
        "saved_credentials",
        if health.has_tokens { "yes" } else { "no" },
    );
    if let Some(expires_at_unix) = health.expires_at_unix {
        renderer.field("expires_at_unix", &expires_at_unix.to_string());
        renderer.field(
            "expiring_soon",
            if health.expiring_soon { "yes" } else { "no" },
        );
    }
    if check {
        return Ok(());
    }

    if reset {
        let removed = reset_tokens(token_path)
            .map_err(|err| format!("failed to reset saved login credentials: {err}"))?;
        renderer.activity("login reset");
        renderer.field(
            "status",
            if removed {
                "removed saved credentials"
            } else {
                "no saved credentials found"
            },
        );
    }

    provider
        .login()
        .await
        .map_err(|err| format!("login failed: {err}"))?;
    renderer.activity("login successful");
    renderer.field("flow", provider.flow().as_str());
    Ok(())
}
