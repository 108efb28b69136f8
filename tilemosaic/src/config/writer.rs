//! Serialization of `ConfigFile` to the commented INI written to disk.

use std::path::Path;

use super::settings::ConfigFile;

/// Commented INI form of `config`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[cache]
; Maximum number of resolved asset lists kept in memory (default: 512)
max_entries = {}
; Seconds an asset list stays cached (default: 300)
ttl = {}
; Set to false to resolve every request afresh
enabled = {}

[reader]
; Assets read concurrently per tile or point query (default: 20)
max_concurrency = {}
; How overlapping assets combine into a tile: first, highest, lowest
pixel_selection = {}

[logging]
; Log directory (default: ~/.tilemosaic/logs)
directory = {}
; Log file name (default: tilemosaic.log)
file = {}
"#,
        config.cache.max_entries,
        config.cache.ttl,
        config.cache.enabled,
        config.reader.max_concurrency,
        config.reader.pixel_selection,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Renders a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_every_section() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("[cache]"));
        assert!(content.contains("max_entries = 512"));
        assert!(content.contains("[reader]"));
        assert!(content.contains("pixel_selection = first"));
        assert!(content.contains("[logging]"));
    }
}
