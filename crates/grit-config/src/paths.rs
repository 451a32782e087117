//! Where preset files live.
//!
//! - **User presets**: `~/.config/grit/presets/` (Linux),
//!   `~/Library/Application Support/grit/presets/` (macOS),
//!   `%APPDATA%\grit\presets\` (Windows)
//! - **System presets**: `/usr/share/grit/presets/` (Linux),
//!   `/Library/Application Support/grit/presets/` (macOS)
//!
//! ```rust,no_run
//! use grit_config::paths;
//!
//! if let Some(path) = paths::find_preset("crunch") {
//!     println!("found {}", path.display());
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::ConfigError;

const APP_NAME: &str = "grit";
const PRESETS_SUBDIR: &str = "presets";
const PRESET_EXTENSION: &str = "toml";

/// Per-user grit configuration directory.
///
/// Falls back to the working directory when the platform has none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Per-user preset directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Read-only preset directory shared by all users.
pub fn system_presets_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    let base = PathBuf::from("/usr/share");
    #[cfg(target_os = "macos")]
    let base = PathBuf::from("/Library/Application Support");
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_NAME).join(PRESETS_SUBDIR)
}

/// Directories searched by [`find_preset`], in order.
pub fn search_dirs() -> [PathBuf; 2] {
    [user_presets_dir(), system_presets_dir()]
}

/// Resolve a preset name or path to an existing file.
///
/// An existing file path is returned as is. Otherwise `name` (with `.toml`
/// appended when missing) is looked up in [`search_dirs`].
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &search_dirs())
}

/// [`find_preset`] over an explicit list of directories.
pub fn find_preset_in(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let path = Path::new(name);
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let filename = if path.extension().is_some_and(|ext| ext == PRESET_EXTENSION) {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.{PRESET_EXTENSION}"))
    };

    dirs.iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Create the user preset directory if needed and return it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Preset files in a directory, sorted by path.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == PRESET_EXTENSION))
        .collect();
    presets.sort();
    presets
}

/// Preset files from every search directory, user presets first.
pub fn list_all_presets() -> Vec<PathBuf> {
    search_dirs()
        .iter()
        .flat_map(|dir| list_presets_in_dir(dir))
        .collect()
}

/// Preset name for a file: its stem.
///
/// ```rust
/// use grit_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// assert_eq!(preset_name_from_path(Path::new("/p/crunch.toml")).as_deref(), Some("crunch"));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
