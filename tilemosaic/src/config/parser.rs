//! INI and environment parsing into `ConfigFile`.
//!
//! The single place where INI key names map to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::defaults::{ENV_CACHE_DISABLE, ENV_CACHE_MAXSIZE, ENV_CACHE_TTL};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Overlays the values found in `ini` on the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("max_entries") {
            config.cache.max_entries =
                parse_number(v, "cache", "max_entries", "must be a non-negative integer")?;
        }
        if let Some(v) = section.get("ttl") {
            config.cache.ttl =
                parse_number(v, "cache", "ttl", "must be a non-negative integer (seconds)")?;
        }
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool(v).ok_or_else(|| {
                invalid("cache", "enabled", v, "must be true or false")
            })?;
        }
    }

    // [reader] section
    if let Some(section) = ini.section(Some("reader")) {
        if let Some(v) = section.get("max_concurrency") {
            let n: usize =
                parse_number(v, "reader", "max_concurrency", "must be a positive integer")?;
            if n == 0 {
                return Err(invalid(
                    "reader",
                    "max_concurrency",
                    v,
                    "must be a positive integer",
                ));
            }
            config.reader.max_concurrency = n;
        }
        if let Some(v) = section.get("pixel_selection") {
            config.reader.pixel_selection = v.trim().parse().map_err(|_| {
                invalid(
                    "reader",
                    "pixel_selection",
                    v,
                    "must be one of: first, highest, lowest",
                )
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Applies the `TILEMOSAIC_CACHE_*` variables found through `lookup`.
pub(super) fn apply_overrides<F>(config: &mut ConfigFile, lookup: F) -> Result<(), ConfigFileError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_CACHE_TTL) {
        config.cache.ttl = parse_number(&v, "env", ENV_CACHE_TTL, "must be a non-negative integer")?;
    }
    if let Some(v) = lookup(ENV_CACHE_MAXSIZE) {
        config.cache.max_entries =
            parse_number(&v, "env", ENV_CACHE_MAXSIZE, "must be a non-negative integer")?;
    }
    if let Some(v) = lookup(ENV_CACHE_DISABLE) {
        let disable = parse_bool(&v)
            .ok_or_else(|| invalid("env", ENV_CACHE_DISABLE, &v, "must be true or false"))?;
        if disable {
            config.cache.enabled = false;
        }
    }
    Ok(())
}

fn parse_number<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
