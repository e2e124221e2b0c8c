use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and global
pub const DATA_DIR_NAME: &str = ".dailies";

/// Get the data directory
///
/// Resolution order: explicit override (`--dir` / `DAILIES_DIR`), then the nearest
/// `.dailies` directory walking up from the current directory, then `~/.dailies`.
pub fn get_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    // Check for local .dailies directory
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    // Fall back to global ~/.dailies
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .dailies directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = get_data_dir(override_dir)?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .dailies directory in the given directory
pub fn init_local_data_dir(parent: &Path) -> Result<PathBuf> {
    let data_dir = parent.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Task collection record
pub fn tasks_file(dir: &Path) -> PathBuf {
    dir.join("tasks.json")
}

/// Reset time + last reset marker record
pub fn settings_file(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

/// Log file used while the terminal UI owns the screen
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join("dailies.log")
}

/// Default export path for a given day
pub fn default_export_file(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("dailies-export-{}.json", date.format("%Y-%m-%d")))
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    // Sync to disk
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    // Atomically rename temp file to target
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Create a backup of a file with timestamp (used before giving up on an unreadable record)
pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = path.with_extension(format!("bak.{}.json", timestamp));

    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to backup file: {}", path.display()))?;

    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_dir_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = get_data_dir(Some(temp_dir.path())).unwrap();
        assert_eq!(dir, temp_dir.path());
    }

    #[test]
    fn test_find_local_data_dir_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = init_local_data_dir(temp_dir.path()).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_data_dir(&nested), Some(data_dir));
    }

    #[test]
    fn test_init_twice_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        init_local_data_dir(temp_dir.path()).unwrap();
        assert!(init_local_data_dir(temp_dir.path()).is_err());
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = tasks_file(temp_dir.path());

        atomic_write(&test_file, "[]").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "[]");

        atomic_write(&test_file, "[1]").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "[1]");
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let content = read_file(temp_dir.path().join("nonexistent.json")).unwrap();
        assert_eq!(content, "");
    }

    #[test]
    fn test_backup_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = settings_file(temp_dir.path());

        atomic_write(&test_file, "{broken").unwrap();
        let backup_path = backup_file(&test_file).unwrap();

        assert!(backup_path.exists());
        assert_ne!(backup_path, test_file);
        assert_eq!(read_file(&backup_path).unwrap(), "{broken");
    }

    #[test]
    fn test_default_export_file_name() {
        let dir = Path::new("/tmp/x");
        let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        assert_eq!(
            default_export_file(dir, date),
            PathBuf::from("/tmp/x/dailies-export-2024-07-04.json")
        );
    }
}
