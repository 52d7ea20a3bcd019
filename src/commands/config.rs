use anyhow::{Context, Result};

use crate::config::{self, Config};

pub fn list(config: &Config) -> Result<()> {
    // Config derives Serialize, so pretty-printing is just TOML output.
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    // Convert to a JSON value and walk the dot-separated key path, so
    // "refresh.interval_ms" works without per-field plumbing.
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .context(format!("Key not found: {}", part))?;
    }

    match current {
        serde_json::Value::String(s) => println!("{}", s),
        v => println!("{}", v),
    }

    Ok(())
}

pub fn set(config: &Config, key: &str, value: &str) -> Result<()> {
    let mut updated = serde_json::to_value(config).context("Failed to serialize config")?;

    // Walk to the parent of the target key, then overwrite the leaf.
    let parts: Vec<&str> = key.split('.').collect();
    let (leaf, path) = parts
        .split_last()
        .context("Config key must not be empty")?;

    let mut current = &mut updated;
    for part in path {
        current = current
            .get_mut(*part)
            .context(format!("Key not found: {}", part))?;
    }
    let slot = current
        .get_mut(*leaf)
        .context(format!("Key not found: {}", leaf))?;

    // Keep the original type: numbers stay numbers, strings stay strings.
    *slot = match slot {
        serde_json::Value::Number(_) => {
            let n: u64 = value
                .parse()
                .context(format!("Expected a number for '{}'", key))?;
            serde_json::Value::from(n)
        }
        _ => serde_json::Value::String(value.to_string()),
    };

    let new_config: Config =
        serde_json::from_value(updated).context(format!("Invalid value for '{}'", key))?;
    new_config.validate()?;

    let path = config::config_path()?;
    config::save_to_path(&new_config, &path)?;
    println!("✓ Set {} = {}", key, value);
    Ok(())
}
