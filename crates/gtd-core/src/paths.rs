use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const GTD_DIR: &str = ".gtd";
pub const CONFIG_FILE: &str = ".gtd/config.yaml";
pub const STORE_FILE: &str = ".gtd/store.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn gtd_dir(root: &Path) -> PathBuf {
    root.join(GTD_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn store_path(root: &Path) -> PathBuf {
    root.join(STORE_FILE)
}
