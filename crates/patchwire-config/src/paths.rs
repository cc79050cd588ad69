//! Where patch files live.
//!
//! - **User patches**: `~/.config/patchwire/patches/` (Linux), `~/Library/Application Support/patchwire/patches/` (macOS), `%APPDATA%\patchwire\patches\` (Windows)
//! - **System patches**: `/usr/share/patchwire/patches/` (Linux), `/Library/Application Support/patchwire/patches/` (macOS)
//!
//! ```rust,no_run
//! use patchwire_config::paths;
//!
//! if let Some(path) = paths::find_patch("ambient") {
//!     println!("found {}", path.display());
//! }
//! ```

use std::path::{Path, PathBuf};

const APP_NAME: &str = "patchwire";
const PATCHES_SUBDIR: &str = "patches";

/// File extension of patch documents.
pub const PATCH_EXTENSION: &str = "json";

/// Per-user patch directory. Falls back to `./patchwire/patches` when the
/// platform has no config directory.
pub fn user_patches_dir() -> PathBuf {
    user_config_dir().join(PATCHES_SUBDIR)
}

/// Per-user configuration directory.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// System-wide patch directory, usually read-only.
pub fn system_patches_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/usr/share").join(APP_NAME).join(PATCHES_SUBDIR)
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Application Support")
            .join(APP_NAME)
            .join(PATCHES_SUBDIR)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(PATCHES_SUBDIR)
    }
}

/// Find a patch file by path or by name.
///
/// An existing file path is returned as is. Otherwise `name` (with
/// `.json` appended if missing) is looked up in the user directory, then
/// the system directory.
pub fn find_patch(name: &str) -> Option<PathBuf> {
    find_patch_in(name, &[user_patches_dir(), system_patches_dir()])
}

fn find_patch_in(name: &str, search: &[PathBuf]) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if path.extension().is_some_and(|ext| ext == PATCH_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}.{PATCH_EXTENSION}")
    };

    search
        .iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Create the user patch directory if needed and return it.
pub fn ensure_user_patches_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_patches_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Patch files in the user directory, sorted by path.
pub fn list_user_patches() -> Vec<PathBuf> {
    list_patches_in_dir(&user_patches_dir())
}

/// Patch files in the system directory, sorted by path.
pub fn list_system_patches() -> Vec<PathBuf> {
    list_patches_in_dir(&system_patches_dir())
}

/// User patches followed by system patches. A name present in both
/// appears twice; [`find_patch`] prefers the user copy.
pub fn list_all_patches() -> Vec<PathBuf> {
    let mut patches = list_user_patches();
    patches.extend(list_system_patches());
    patches
}

fn list_patches_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut patches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == PATCH_EXTENSION))
        .collect();
    patches.sort();
    patches
}

/// Patch name for a file: its stem.
///
/// ```rust
/// use patchwire_config::paths::patch_name_from_path;
/// use std::path::Path;
///
/// let name = patch_name_from_path(Path::new("/patches/sliced_drone.json"));
/// assert_eq!(name.as_deref(), Some("sliced_drone"));
/// ```
pub fn patch_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
