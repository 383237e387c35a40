use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.checkin-monitor/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.checkin-monitor/`
/// - `~/.checkin-monitor/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// Same as [`ensure_directories`] but rooted at an explicit base directory,
/// so tests can point at a temporary location.
pub fn ensure_directories_in(base_dir: &Path) -> anyhow::Result<()> {
    let monitor_dir = base_dir.join(".checkin-monitor");
    std::fs::create_dir_all(&monitor_dir)?;
    std::fs::create_dir_all(monitor_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// The CLI log-level names are mapped to a [`tracing_subscriber::EnvFilter`]
/// directive; anything unrecognised falls back to `"info"`.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let directive = match log_level.to_uppercase().as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "WARNING" => "warn",
        "ERROR" => "error",
        _ => "info",
    };

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_creates_hierarchy() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("create");

        assert!(tmp.path().join(".checkin-monitor").is_dir());
        assert!(tmp.path().join(".checkin-monitor").join("logs").is_dir());
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("first");
        ensure_directories_in(tmp.path()).expect("second");
    }
}
