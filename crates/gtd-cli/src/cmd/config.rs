use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use gtd_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Validate the config for common mistakes
    Validate,
    /// Set how many projects the quick-pick list offers
    SetQuickPicks { count: usize },
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::SetQuickPicks { count } => {
            let mut cfg = Config::load(root).context("failed to load config")?;
            cfg.ranking.quick_picks = count;
            cfg.save(root).context("failed to save config")?;
            if json {
                print_json(&cfg)?;
            } else {
                println!("ranking.quick_picks = {count}");
            }
            Ok(())
        }
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;
    if json {
        print_json(&cfg)?;
    } else {
        print!("{}", serde_yaml::to_string(&cfg)?);
    }
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;
    let warnings = cfg.validate();
    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);

    if json {
        print_json(&serde_json::json!({
            "valid": !has_errors,
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!("Config OK");
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{tag}: {}", w.message);
        }
    }

    if has_errors {
        anyhow::bail!("config has errors");
    }
    Ok(())
}
