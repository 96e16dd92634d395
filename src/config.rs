//! Settings file lookup.

use directories::ProjectDirs;
use gridfill_core::Settings;
use std::path::{Path, PathBuf};

const MAX_SETTINGS_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Load settings from `settings_file`, or the user config dir when none is
/// given. Problems never fail the run: they come back as warnings alongside
/// the defaults.
pub fn load_settings(settings_file: Option<&Path>) -> (Settings, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = settings_file
        .map(Path::to_path_buf)
        .or_else(user_settings_path)
    else {
        return (Settings::default(), warnings);
    };

    if !path.exists() {
        if settings_file.is_some() {
            warnings.push(format!("Settings file not found: {}", path.display()));
        }
        return (Settings::default(), warnings);
    }

    let settings = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_SETTINGS_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SETTINGS_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match Settings::from_toml_str(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    (settings.unwrap_or_default(), warnings)
}

fn user_settings_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridfill")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("settings.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gridfill_settings_{}_{}_{}.toml",
            name,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn test_explicit_file_is_read() {
        let path = temp_path("explicit");
        fs::write(&path, "max_discrete_refs = 12\nlog_level = \"debug\"\n").unwrap();
        let (settings, warnings) = load_settings(Some(&path));
        let _ = fs::remove_file(&path);

        assert!(warnings.is_empty());
        assert_eq!(settings.max_discrete_refs, 12);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let path = temp_path("missing");
        let (settings, warnings) = load_settings(Some(&path));
        assert_eq!(settings, Settings::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not found"));
    }

    #[test]
    fn test_bad_file_falls_back_to_defaults() {
        let path = temp_path("bad");
        fs::write(&path, "max_discrete_refs = \"lots\"\n").unwrap();
        let (settings, warnings) = load_settings(Some(&path));
        let _ = fs::remove_file(&path);

        assert_eq!(settings, Settings::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
    }
}
