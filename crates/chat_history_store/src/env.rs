use anyhow::anyhow;
use std::path::PathBuf;

pub(crate) fn optional_trimmed_path_from_env(name: &str) -> anyhow::Result<Option<PathBuf>> {
    let value = match std::env::var_os(name) {
        Some(value) => value,
        None => return Ok(None),
    };

    let value = value.to_string_lossy();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{name} is set but empty"));
    }

    Ok(Some(PathBuf::from(trimmed)))
}

pub(crate) fn optional_flag_from_env(name: &str) -> anyhow::Result<Option<bool>> {
    let value = match std::env::var_os(name) {
        Some(value) => value,
        None => return Ok(None),
    };

    let value = value.to_string_lossy();
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        "" => Err(anyhow!("{name} is set but empty")),
        other => Err(anyhow!("{name} must be a boolean, got {other:?}")),
    }
}
