//! App-level settings persistence with file locking.
//!
//! Holds the user's bodyweight and preferred weight display. Saved as JSON
//! next to the workout database with an atomic temp-file rename.

use crate::weight::{clamp_bodyweight, WeightDisplay, DEFAULT_BODYWEIGHT_KG};
use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// User settings shared by every screen and command
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default = "default_bodyweight")]
    pub bodyweight_kg: f64,

    #[serde(default)]
    pub weight_display: WeightDisplay,
}

fn default_bodyweight() -> f64 {
    DEFAULT_BODYWEIGHT_KG
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bodyweight_kg: DEFAULT_BODYWEIGHT_KG,
            weight_display: WeightDisplay::default(),
        }
    }
}

impl AppSettings {
    /// Set bodyweight, clamped to the supported range; returns the stored value
    pub fn set_bodyweight(&mut self, kg: f64) -> f64 {
        self.bodyweight_kg = clamp_bodyweight(kg);
        self.bodyweight_kg
    }

    /// Load settings from a file with shared locking
    ///
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open settings {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock settings {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        if let Err(e) = read {
            tracing::warn!("Failed to read settings {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        match serde_json::from_str::<AppSettings>(&contents) {
            Ok(mut settings) => {
                let stored = settings.bodyweight_kg;
                if settings.set_bodyweight(stored) != stored {
                    tracing::warn!(
                        "Stored bodyweight {} out of range, clamped to {}",
                        stored,
                        settings.bodyweight_kg
                    );
                }
                tracing::debug!("Loaded settings from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save settings atomically with exclusive locking
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "settings path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }
}
