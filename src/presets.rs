//! Loading per-vehicle JSON profiles from disk

use std::{
    fs,
    io::{Error as IoError, ErrorKind},
    path::Path,
};

use ahash::AHashMap;

use crate::{
    error::{ConfigError, ConfigResult},
    sim::{CarConfig, CarPreset},
};

pub const PROFILE_FILE_EXTENSION: &str = "json";

/// Loads every `*.json` profile in `folder`, keyed by file stem.
///
/// Profiles that fail to parse or validate are skipped with a warning.
pub fn load_dir<P: AsRef<Path>>(folder: P) -> ConfigResult<AHashMap<String, CarConfig>> {
    load_from_path(folder.as_ref())
}

fn load_from_path(folder: &Path) -> ConfigResult<AHashMap<String, CarConfig>> {
    if !folder.exists() {
        return Err(ConfigError::Io(IoError::new(
            ErrorKind::NotFound,
            format!("{} does not exist", folder.display()),
        )));
    }

    if !folder.is_dir() {
        return Err(ConfigError::Io(IoError::new(
            ErrorKind::NotADirectory,
            format!("{} is not a directory", folder.display()),
        )));
    }

    let mut profiles = AHashMap::new();

    for entry in fs::read_dir(folder)?.flatten() {
        let p = entry.path();

        if !p.is_file() || p.extension().is_none_or(|ext| ext != PROFILE_FILE_EXTENSION) {
            continue;
        }

        let Some(name) = p.file_stem().and_then(|stem| stem.to_str()) else {
            log::warn!("skipping {}: file name is not valid UTF-8", p.display());
            continue;
        };

        let config = fs::read_to_string(&p)
            .map_err(ConfigError::from)
            .and_then(|json| CarConfig::from_json_str(&json));

        match config {
            Ok(config) => {
                profiles.insert(name.to_string(), config);
            }
            Err(e) => log::warn!("skipping {}: {e}", p.display()),
        }
    }

    log::debug!("loaded {} car profiles from {}", profiles.len(), folder.display());

    Ok(profiles)
}

/// The built-in presets, keyed by their names
#[must_use]
pub fn builtin() -> AHashMap<String, CarConfig> {
    CarPreset::ALL
        .into_iter()
        .map(|preset| (preset.name().to_string(), preset.config()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stickshift-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_profiles_and_skips_bad_ones() {
        let dir = scratch_dir("presets");
        let sport = serde_json::to_string(&CarConfig::SPORT).unwrap();
        fs::write(dir.join("track_day.json"), sport).unwrap();
        fs::write(dir.join("broken.json"), "{ not json").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut invalid = CarConfig::CIVILIAN;
        invalid.chassis.mass = -1.0;
        fs::write(
            dir.join("invalid.json"),
            serde_json::to_string(&invalid).unwrap(),
        )
        .unwrap();

        let profiles = load_dir(&dir).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles["track_day"], CarConfig::SPORT);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = std::env::temp_dir().join("stickshift-definitely-missing");
        assert!(matches!(load_dir(dir), Err(ConfigError::Io(_))));
    }

    #[test]
    fn builtin_has_every_preset() {
        let presets = builtin();
        assert_eq!(presets.len(), CarPreset::ALL.len());
        assert_eq!(presets["truck"], CarConfig::TRUCK);
    }
}
