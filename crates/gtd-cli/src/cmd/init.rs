use crate::output::print_json;
use anyhow::Context;
use gtd_core::config::Config;
use gtd_core::io::write_if_missing;
use gtd_core::paths;
use gtd_core::store::Store;
use std::path::Path;

/// Create `.gtd/` with a default config and an empty store. Existing files
/// are left alone, so running it twice is harmless.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config_yaml = serde_yaml::to_string(&Config::default())?;
    let wrote_config = write_if_missing(&paths::config_path(root), config_yaml.as_bytes())
        .context("failed to write config")?;

    let store_yaml = serde_yaml::to_string(&Store::new())?;
    let wrote_store = write_if_missing(&paths::store_path(root), store_yaml.as_bytes())
        .context("failed to write store")?;

    tracing::info!(root = %root.display(), wrote_config, wrote_store, "initialized");

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "created_config": wrote_config,
            "created_store": wrote_store,
        }))?;
    } else if wrote_config || wrote_store {
        println!("Initialized gtd in {}", paths::gtd_dir(root).display());
    } else {
        println!("Already initialized: {}", paths::gtd_dir(root).display());
    }
    Ok(())
}
