//! Persisted generator settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::crypto::EncodingMode;
use crate::storage::Storage;

/// Default visible length of a derived code.
pub const DEFAULT_LENGTH: usize = 16;

/// User preferences resolved before each derivation.
///
/// The master secret is deliberately not part of this file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    mode: EncodingMode,
    length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: EncodingMode::default(),
            length: DEFAULT_LENGTH,
        }
    }
}

impl Settings {
    pub fn new(mode: EncodingMode, length: usize) -> Result<Self> {
        let settings = Self { mode, length };
        settings.validate()?;
        Ok(settings)
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn set_mode(&mut self, mode: EncodingMode) {
        self.mode = mode;
    }

    pub fn set_length(&mut self, length: usize) -> Result<()> {
        Self::new(self.mode, length)?;
        self.length = length;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            anyhow::bail!("length must be at least 1");
        }
        Ok(())
    }

    /// Loads settings, falling back to defaults when nothing was saved yet.
    pub fn load(storage: &Storage) -> Result<Self> {
        if !storage.exists() {
            tracing::debug!(path = %storage.path().display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let data = storage.load()?;
        let settings: Self = serde_json::from_slice(&data).with_context(|| {
            format!("failed to parse settings file {}", storage.path().display())
        })?;
        settings
            .validate()
            .context("settings file contains invalid values")?;
        Ok(settings)
    }

    pub fn save(&self, storage: &Storage) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        storage.save(&data)?;
        tracing::info!(path = %storage.path().display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("settings.json"));
        let settings = Settings::load(&storage).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.length(), DEFAULT_LENGTH);
        assert_eq!(settings.mode(), EncodingMode::HexDigest);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("settings.json"));

        let settings = Settings::new(EncodingMode::CompactBase64, 12).unwrap();
        settings.save(&storage).unwrap();

        assert_eq!(Settings::load(&storage).unwrap(), settings);
    }

    #[test]
    fn file_uses_short_mode_names() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("settings.json"));
        Settings::new(EncodingMode::CompactBase64, 8)
            .unwrap()
            .save(&storage)
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&storage.load().unwrap()).unwrap();
        assert_eq!(json["mode"], "base64");
        assert_eq!(json["length"], 8);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("settings.json"));
        storage.save(br#"{"length": 10}"#).unwrap();

        let settings = Settings::load(&storage).unwrap();
        assert_eq!(settings.length(), 10);
        assert_eq!(settings.mode(), EncodingMode::HexDigest);
    }

    #[test]
    fn corrupt_file_fails() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("settings.json"));
        storage.save(b"not json").unwrap();
        assert!(Settings::load(&storage).is_err());
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(Settings::new(EncodingMode::HexDigest, 0).is_err());

        let mut settings = Settings::default();
        assert!(settings.set_length(0).is_err());
        assert_eq!(settings.length(), DEFAULT_LENGTH);
    }
}
