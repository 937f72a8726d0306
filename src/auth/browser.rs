//! Browser launching for login flows.

use tokio::process::{Child, Command};

/// Terminal browser used by the `carbonyl` login flow.
const CARBONYL_COMMAND: &str = "carbonyl";

/// Best-effort system browser opener used by `gtasks login`.
pub fn try_open_browser(url: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        return std::process::Command::new("open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }
    #[cfg(target_os = "windows")]
    {
        return std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .status()
            .is_ok_and(|status| status.success());
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        return std::process::Command::new("xdg-open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }
    #[allow(unreachable_code)]
    false
}

/// Launch the carbonyl terminal browser on `url`.
///
/// The child is killed on drop so a finished redirect never leaves it running.
pub(crate) fn spawn_carbonyl(url: &str) -> std::io::Result<Child> {
    Command::new(CARBONYL_COMMAND)
        .arg(url)
        .kill_on_drop(true)
        .spawn()
}
