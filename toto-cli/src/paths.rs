//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "in";
const ORGANIZATION: &str = "localtoto";
const APPLICATION: &str = "toto-admin";

const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the data directory for the session database.
///
/// - Linux: `$XDG_DATA_HOME/toto-admin` or `~/.local/share/toto-admin`
/// - macOS: `~/Library/Application Support/in.localtoto.toto-admin`
/// - Windows: `C:\Users\<User>\AppData\Roaming\localtoto\toto-admin\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the cache directory, which holds the logs.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the session database inside `dir`.
pub fn session_db(dir: &Path) -> PathBuf {
    dir.join("session.db")
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive `latest.log` under a timestamped name and prune old logs.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let latest = cache.join(LATEST_LOG);

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{}.log", timestamp)));
    }

    prune_logs(&cache, MAX_OLD_LOGS);
}

/// Remove archived logs in `dir`, keeping only the `keep` most recent.
fn prune_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    let excess = logs.len().saturating_sub(keep);
    for entry in logs.iter().take(excess) {
        let _ = fs::remove_file(entry.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_keeps_latest_and_newest() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        for i in 0..5 {
            fs::write(dir.join(format!("2026010{}_000000.log", i)), "").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        fs::write(dir.join(LATEST_LOG), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        prune_logs(dir, 2);

        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "20260103_000000.log",
                "20260104_000000.log",
                "latest.log",
                "notes.txt"
            ]
        );
    }
}
