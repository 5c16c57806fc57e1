use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{get_config_path, Config};
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# lead-bro scoring config
#
# Each dimension lists signals: a form field and the points each answer earns.
# Sub-scores are capped at: budget 30, urgency 25, company_size 20,
# tech_readiness 15, decision_maker 10. Answers missing from a table score 0.
";

/// Render the default config as YAML, with a short explanatory header.
pub fn default_config_yaml() -> Result<String> {
    let config = Config {
        scoring: Some(ScoringConfig::default()),
    };
    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    Ok(format!("{}\n{}", HEADER, yaml))
}

/// Write the default config file.
///
/// Uses the default path (~/.config/lead-bro/config.yaml) when `path` is None.
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(path) => path,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let yaml = default_config_yaml()?;
    write_atomically(&config_path, &yaml)?;

    info!(path = %config_path.display(), "wrote default config");
    Ok(config_path)
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    // Commit the write atomically
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}
