//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use mbcomp_params::{ParamStore, Preset, get_factory_preset};
use std::path::Path;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))
}

/// Load a preset by factory name, falling back to a TOML file path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = Path::new(name);
    if path.exists() {
        return Preset::load(path).with_context(|| format!("loading preset '{}'", name));
    }

    anyhow::bail!(
        "Preset '{}' not found. Use 'mbcomp presets list' to see available presets.",
        name
    )
}

/// Applies `--set key=value` overrides in order.
pub fn apply_overrides(store: &ParamStore, overrides: &[(String, String)]) -> anyhow::Result<()> {
    for (key, value) in overrides {
        let stored = store
            .set_from_str(key, value)
            .with_context(|| format!("--set {}={}", key, value))?;
        tracing::debug!(param = %key, value = stored, "override");
    }
    Ok(())
}
