/// Shell hooks run around a countdown
use std::process::{Command, Stdio};

/// Returns the command to run, or `None` when the hook is unset, blank or
/// commented out with a leading `#`.
pub fn runnable(hook: Option<&str>) -> Option<&str> {
    let command = hook?.trim();
    if command.is_empty() || command.starts_with('#') {
        None
    } else {
        Some(command)
    }
}

/// Spawns the hook without waiting for it. Failures are only logged.
pub fn execute_hook(name: &str, hook: Option<&str>) {
    let Some(command) = runnable(hook) else {
        match hook {
            Some(h) if h.trim().starts_with('#') => {
                log::info!("{} hook is commented out: {}", name, h.trim())
            }
            _ => log::debug!("No {} hook configured", name),
        }
        return;
    };

    log::info!("Running {} hook: {}", name, command);
    match shell(command).stdin(Stdio::null()).spawn() {
        Ok(child) => log::debug!("{} hook started (pid {})", name, child.id()),
        Err(e) => log::warn!("Failed to run {} hook: {}", name, e),
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}
