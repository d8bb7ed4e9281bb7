//! One server per configured port.
//!
//! The lock file is named after the port and records the pid and spreadsheet
//! of the server holding it, so a second start can say who is in the way.

use anyhow::{Context, Result};
use fs2::FileExt;
use sheetbridge_core::Settings;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Released when dropped
pub struct ServerLock {
    _file: File,
}

/// Lock the configured port, or fail naming the server that already holds it.
pub fn acquire(settings: &Settings) -> Result<ServerLock> {
    let dir = dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .context("No runtime or cache directory to keep the server lock in")?
        .join("sheetbridge");

    acquire_in(&dir, settings.server_port, settings.spreadsheet_id.as_deref())
}

fn lock_path(dir: &Path, port: u16) -> PathBuf {
    dir.join(format!("server-{}.lock", port))
}

fn acquire_in(dir: &Path, port: u16, spreadsheet_id: Option<&str>) -> Result<ServerLock> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = lock_path(dir, port);
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("Failed to open lock file {}", path.display()))?;

    if file.try_lock_exclusive().is_err() {
        let holder = fs::read_to_string(&path).unwrap_or_default();
        anyhow::bail!(
            "{}\nIf no server is running, remove: {}",
            describe_holder(port, holder.trim()),
            path.display()
        );
    }

    // Only rewritten once the lock is ours
    file.set_len(0)?;
    writeln!(
        file,
        "{} {}",
        std::process::id(),
        spreadsheet_id.unwrap_or("-")
    )?;

    Ok(ServerLock { _file: file })
}

/// Lock contents are `"<pid> <spreadsheet id>"`.
fn describe_holder(port: u16, holder: &str) -> String {
    match holder.split_once(' ') {
        Some((pid, spreadsheet)) if spreadsheet != "-" => format!(
            "sheetbridge-server (pid {}) is already serving spreadsheet {} on port {}.",
            pid, spreadsheet, port
        ),
        Some((pid, _)) => format!(
            "sheetbridge-server (pid {}) is already running on port {}.",
            pid, port
        ),
        None => format!("Another sheetbridge-server is already running on port {}.", port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_second_server_on_same_port_is_refused() {
        let dir = tempfile::tempdir().unwrap();

        let _held = acquire_in(dir.path(), 4097, Some("sheet-abc")).unwrap();
        let err = acquire_in(dir.path(), 4097, Some("sheet-xyz")).err().unwrap();

        let message = err.to_string();
        assert!(message.contains("spreadsheet sheet-abc on port 4097"), "{}", message);
        assert!(message.contains("server-4097.lock"), "{}", message);
    }

    #[test]
    fn test_other_port_gets_its_own_lock() {
        let dir = tempfile::tempdir().unwrap();

        let _first = acquire_in(dir.path(), 4097, Some("sheet-abc")).unwrap();
        let _second = acquire_in(dir.path(), 4098, Some("sheet-abc")).unwrap();

        assert!(lock_path(dir.path(), 4098).exists());
    }

    #[test]
    fn test_lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        drop(acquire_in(dir.path(), 4097, None).unwrap());

        assert!(acquire_in(dir.path(), 4097, None).is_ok());
    }

    #[test]
    fn test_describe_holder() {
        assert_eq!(
            describe_holder(4097, "42 -"),
            "sheetbridge-server (pid 42) is already running on port 4097."
        );
        assert_eq!(
            describe_holder(4097, ""),
            "Another sheetbridge-server is already running on port 4097."
        );
    }
}
