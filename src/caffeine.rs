/// Keeps the machine awake while a countdown is running
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

/// How long a freshly spawned inhibitor must stay up to count as working.
const STARTUP_GRACE: Duration = Duration::from_millis(200);

/// Sleep suppression, chosen once at startup.
#[derive(Debug)]
pub enum Caffeine {
    Available(Inhibitor),
    Unavailable { reason: String },
}

/// An external program that blocks system sleep while it runs.
#[derive(Debug)]
pub struct Inhibitor {
    program: PathBuf,
    args: Vec<String>,
    child: Option<Child>,
}

impl Inhibitor {
    fn start(&mut self) -> Result<(), String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", self.program.display(), e))?;

        thread::sleep(STARTUP_GRACE);
        match child.try_wait() {
            Ok(Some(status)) => {
                return Err(format!("{} exited with {}", self.program.display(), status));
            }
            Ok(None) => {}
            Err(e) => log::warn!("Could not check {}: {}", self.program.display(), e),
        }

        log::info!("Sleep prevention started (pid {})", child.id());
        self.child = Some(child);
        Ok(())
    }
}

impl Caffeine {
    /// Looks for a sleep inhibitor for this platform on `PATH`.
    pub fn detect() -> Self {
        let (name, args) = inhibitor_command();
        if name.is_empty() {
            return Caffeine::Unavailable {
                reason: format!("not supported on {}", std::env::consts::OS),
            };
        }
        match which::which(name) {
            Ok(program) => {
                log::debug!("Found {} at: {}", name, program.display());
                Caffeine::Available(Inhibitor {
                    program,
                    args,
                    child: None,
                })
            }
            Err(e) => {
                log::debug!("{} not found in PATH: {}", name, e);
                Caffeine::Unavailable {
                    reason: format!("`{}` not found in PATH", name),
                }
            }
        }
    }

    /// Starts suppressing sleep. An inhibitor that fails to start, or that
    /// exits within `STARTUP_GRACE`, degrades to `Unavailable`.
    pub fn begin(&mut self) {
        let Caffeine::Available(inhibitor) = self else {
            return;
        };
        if let Err(reason) = inhibitor.start() {
            log::warn!("{}", reason);
            *self = Caffeine::Unavailable { reason };
        }
    }

    /// Stops suppressing sleep.
    pub fn end(&mut self) {
        let Caffeine::Available(inhibitor) = self else {
            return;
        };
        if let Some(mut child) = inhibitor.child.take() {
            if let Err(e) = child.kill() {
                log::warn!("Failed to stop sleep prevention: {}", e);
            }
            let _ = child.wait();
            log::info!("Sleep prevention stopped");
        }
    }

    /// Prefixes `text` with a warning when sleep cannot be suppressed.
    pub fn annotate(&self, text: &str) -> String {
        match self {
            Caffeine::Available(_) => text.to_string(),
            Caffeine::Unavailable { reason } => {
                format!("WARNING: sleep prevention unavailable: {}\n\n{}", reason, text)
            }
        }
    }
}

impl Drop for Caffeine {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(target_os = "macos")]
fn inhibitor_command() -> (&'static str, Vec<String>) {
    // -w ties the assertion to our pid so it lapses if we are killed
    let pid = std::process::id().to_string();
    (
        "caffeinate",
        vec!["-d".into(), "-i".into(), "-w".into(), pid],
    )
}

#[cfg(all(unix, not(target_os = "macos")))]
fn inhibitor_command() -> (&'static str, Vec<String>) {
    (
        "systemd-inhibit",
        vec![
            "--what=idle:sleep".into(),
            "--who=countdown".into(),
            "--why=countdown timer running".into(),
            "sleep".into(),
            "infinity".into(),
        ],
    )
}

#[cfg(not(unix))]
fn inhibitor_command() -> (&'static str, Vec<String>) {
    ("", Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_prepends_warning() {
        let caffeine = Caffeine::Unavailable {
            reason: "`caffeinate` not found in PATH".to_string(),
        };
        assert_eq!(
            caffeine.annotate("focus"),
            "WARNING: sleep prevention unavailable: `caffeinate` not found in PATH\n\nfocus"
        );
    }

    #[test]
    fn test_available_leaves_text_alone() {
        let caffeine = Caffeine::Available(Inhibitor {
            program: PathBuf::from("true"),
            args: Vec::new(),
            child: None,
        });
        assert_eq!(caffeine.annotate("focus"), "focus");
    }

    #[test]
    fn test_unavailable_begin_and_end_are_noops() {
        let mut caffeine = Caffeine::Unavailable {
            reason: "none".to_string(),
        };
        caffeine.begin();
        caffeine.end();
        assert!(matches!(caffeine, Caffeine::Unavailable { .. }));
    }

    #[test]
    fn test_failed_spawn_degrades_to_unavailable() {
        let mut caffeine = Caffeine::Available(Inhibitor {
            program: PathBuf::from("/nonexistent/countdown-inhibitor"),
            args: Vec::new(),
            child: None,
        });
        caffeine.begin();
        match &caffeine {
            Caffeine::Unavailable { reason } => assert!(reason.contains("failed to start")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_inhibitor_that_exits_at_once_degrades_to_warning() {
        let mut caffeine = Caffeine::Available(Inhibitor {
            program: PathBuf::from("false"),
            args: Vec::new(),
            child: None,
        });
        caffeine.begin();
        match &caffeine {
            Caffeine::Unavailable { reason } => assert!(reason.contains("exited with")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
        assert!(
            caffeine
                .annotate("focus")
                .starts_with("WARNING: sleep prevention unavailable: false exited with")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_begin_spawns_and_end_reaps() {
        let mut caffeine = Caffeine::Available(Inhibitor {
            program: PathBuf::from("sleep"),
            args: vec!["30".to_string()],
            child: None,
        });
        caffeine.begin();
        match &caffeine {
            Caffeine::Available(inhibitor) => assert!(inhibitor.child.is_some()),
            other => panic!("expected Available, got {:?}", other),
        }
        caffeine.end();
        match &caffeine {
            Caffeine::Available(inhibitor) => assert!(inhibitor.child.is_none()),
            other => panic!("expected Available, got {:?}", other),
        }
    }
}
