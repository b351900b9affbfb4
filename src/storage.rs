use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::models::Project;

/// Returns the path to the projects database file (`projects.json`).
///
/// The path is determined in the following order:
/// 1. `FRONTMIND_DB` environment variable.
/// 2. `~/.local/share/frontmind/projects.json` (on Linux).
/// 3. `./projects.json` (fallback).
fn db_path() -> PathBuf {
    std::env::var("FRONTMIND_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("frontmind");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("projects.json");
        p
    })
}

/// Loads the full project array from the storage file.
///
/// Returns an empty vector if the file does not exist or cannot be read.
/// Blobs written before the Today list existed deserialize cleanly: missing
/// `isToday`/`todayOrder` fields default to `false`/`null` at every depth.
pub fn load_projects() -> Vec<Project> {
    let path = db_path();
    if !path.exists() {
        return Vec::new();
    }
    let mut f = match OpenOptions::new().read(true).open(&path) {
        Ok(f) => f,
        Err(_) => return Vec::new(),
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return Vec::new();
    }
    serde_json::from_str(&s).unwrap_or_else(|_| Vec::new())
}

/// Saves the full project array to the storage file, overwriting it.
pub fn save_projects(projects: &[Project]) -> std::io::Result<()> {
    let path = db_path();
    let s = serde_json::to_string_pretty(projects).unwrap_or_default();
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Default export filename, dated with the current day.
pub fn export_file_name() -> String {
    format!(
        "front-of-mind-backup-{}.json",
        Local::now().format("%Y-%m-%d")
    )
}

/// Writes the full project array as pretty JSON to the given path.
pub fn export_projects(projects: &[Project], path: &Path) -> std::io::Result<()> {
    let s = serde_json::to_string_pretty(projects).unwrap_or_default();
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Reads and parses a previously exported file.
///
/// Returns the parsed project array without touching the current database;
/// the caller decides whether to persist it. Malformed input is the one
/// fallible boundary in the system and surfaces here as an error.
pub fn import_projects(path: &Path) -> Result<Vec<Project>, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let projects: Vec<Project> = serde_json::from_str(&s)?;
    Ok(projects)
}

/// Deletes the projects database file.
pub fn delete_database() -> std::io::Result<()> {
    let path = db_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
