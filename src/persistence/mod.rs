pub mod config;

use std::path::PathBuf;

/// Get or create the formplot config directory (~/.config/formplot/).
pub fn config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("formplot");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
