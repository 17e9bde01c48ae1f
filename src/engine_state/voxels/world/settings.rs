//! # World Settings
//!
//! Per-world configuration, fixed once the world is built. Settings are read
//! from JSON; every field is optional and falls back to its default.
//!
//! ```json
//! { "world_size": 21, "is_infinite_terrain": true, "seed": 1337 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::WorldError;
use crate::engine_state::voxels::chunk::CHUNK_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Columns per side of a bounded world. On infinite worlds this is the
    /// diameter of the area kept loaded around the camera.
    pub world_size: i32,
    pub is_infinite_terrain: bool,
    /// Seed for terrain noise and decoration.
    pub seed: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            world_size: 16,
            is_infinite_terrain: false,
            seed: 0,
        }
    }
}

impl WorldSettings {
    /// Reads and validates settings from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Location of the settings file
    ///
    /// # Returns
    /// The parsed settings, or a `WorldError` if the file cannot be read, is
    /// not valid JSON, or holds out-of-range values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| WorldError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    pub fn from_json_str(source: &str) -> Result<Self, WorldError> {
        let settings: WorldSettings = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that `world_size` is at least 1 and that the world's width in
    /// blocks fits in an `i32`.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.world_size < 1 {
            return Err(WorldError::InvalidSettings(format!(
                "world_size must be at least 1, got {}",
                self.world_size
            )));
        }
        if self.world_size > i32::MAX / CHUNK_SIZE {
            return Err(WorldError::InvalidSettings(format!(
                "world_size must be at most {}, got {}",
                i32::MAX / CHUNK_SIZE,
                self.world_size
            )));
        }
        Ok(())
    }

    /// Half the world size in columns, rounded down.
    pub fn half_size(&self) -> i32 {
        self.world_size / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = WorldSettings::from_json_str(r#"{ "seed": 42 }"#).unwrap();

        assert_eq!(settings.seed, 42);
        assert_eq!(settings.world_size, 16);
        assert!(!settings.is_infinite_terrain);
        assert_eq!(settings.half_size(), 8);
    }

    #[test]
    fn test_rejects_empty_world() {
        let result = WorldSettings::from_json_str(r#"{ "world_size": 0 }"#);
        assert!(matches!(result, Err(WorldError::InvalidSettings(_))));
    }

    #[test]
    fn test_rejects_world_wider_than_block_range() {
        let limit = i32::MAX / CHUNK_SIZE;

        let result = WorldSettings::from_json_str(&format!(r#"{{ "world_size": {} }}"#, limit + 1));
        assert!(matches!(result, Err(WorldError::InvalidSettings(_))));

        let settings = WorldSettings::from_json_str(&format!(r#"{{ "world_size": {} }}"#, limit));
        assert_eq!(settings.unwrap().world_size, limit);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = WorldSettings::from_json_str("{ world_size: ");
        assert!(matches!(result, Err(WorldError::SettingsParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "world_size": 21, "is_infinite_terrain": true }}"#).unwrap();

        let settings = WorldSettings::from_json_file(file.path()).unwrap();

        assert_eq!(settings.world_size, 21);
        assert!(settings.is_infinite_terrain);
        assert_eq!(settings.half_size(), 10);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = WorldSettings::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(WorldError::SettingsIo { .. })));
    }
}
