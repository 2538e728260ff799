//! Stored game preferences.
//!
//! The file is TOML:
//!
//! ```text
//! number_of_colors = 6
//! length_of_code = 4
//! allow_duplicates = true
//! max_rounds = 8
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::code_space::Rules;
use crate::error::{EngineError, SettingsError};
use crate::session::SessionOptions;

pub const DEFAULT_COLORS: usize = 6;
pub const DEFAULT_CODE_LENGTH: usize = 4;
pub const DEFAULT_ALLOW_DUPLICATES: bool = true;

/// Smallest board the game offers.
pub const MIN_COLORS: usize = 3;
pub const MIN_CODE_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "number_of_colors")]
    pub colors: usize,
    #[serde(rename = "length_of_code")]
    pub code_length: usize,
    pub allow_duplicates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
            code_length: DEFAULT_CODE_LENGTH,
            allow_duplicates: DEFAULT_ALLOW_DUPLICATES,
            max_rounds: None,
        }
    }
}

impl Settings {
    /// Raises colors and code length to the game's minimums, and turns
    /// duplicates on when the code is longer than the palette.
    #[must_use]
    pub fn clamped(self) -> Self {
        let colors = self.colors.max(MIN_COLORS);
        let code_length = self.code_length.max(MIN_CODE_LENGTH);
        Self {
            colors,
            code_length,
            allow_duplicates: self.allow_duplicates || code_length > colors,
            ..self
        }
    }

    /// # Errors
    ///
    /// [`EngineError::Configuration`] if the settings describe an unusable game.
    pub fn session_options(&self, seed: Option<u64>) -> Result<SessionOptions, EngineError> {
        let rules = Rules::new(self.colors, self.code_length, self.allow_duplicates)?;
        Ok(SessionOptions {
            rules,
            max_rounds: self.max_rounds,
            seed,
        })
    }
}

/// Parses settings text. Missing keys keep their defaults, unknown keys are ignored.
///
/// # Errors
///
/// [`SettingsError::Parse`] for malformed TOML or a value of the wrong type.
pub fn load_settings_from_str(data: &str) -> Result<Settings, SettingsError> {
    Ok(toml::from_str(data)?)
}

/// # Errors
///
/// [`SettingsError::Io`] if the file cannot be read, or a parse error.
pub fn load_settings_from_file<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
    let data = fs::read_to_string(path.as_ref())?;
    let settings = load_settings_from_str(&data)?;
    debug!("Loaded settings from {}: {settings:?}", path.as_ref().display());
    Ok(settings)
}

/// # Errors
///
/// [`SettingsError::Io`] if the file or its directory cannot be written.
pub fn write_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<(), SettingsError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string(settings)?)?;
    debug!("Wrote settings to {}", path.display());
    Ok(())
}

/// Default settings location, `<config dir>/mastermind/settings.toml`.
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mastermind").join("settings.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_settings_full() {
        let data = "number_of_colors = 8\nlength_of_code=5\nallow_duplicates = false\nmax_rounds = 10\n";
        let settings = load_settings_from_str(data).unwrap();
        assert_eq!(
            settings,
            Settings {
                colors: 8,
                code_length: 5,
                allow_duplicates: false,
                max_rounds: Some(10),
            }
        );
    }

    #[test]
    fn test_load_settings_defaults_comments_and_unknown_keys() {
        let data = "# preferences\n\nlength_of_code = 3\ntheme = \"dark\"\n";
        let settings = load_settings_from_str(data).unwrap();
        assert_eq!(settings.colors, DEFAULT_COLORS);
        assert_eq!(settings.code_length, 3);
        assert!(settings.allow_duplicates);
        assert_eq!(settings.max_rounds, None);
    }

    #[test]
    fn test_load_settings_bad_value() {
        let err = load_settings_from_str("number_of_colors = \"six\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_load_settings_missing_equals() {
        let err = load_settings_from_str("\nallow_duplicates true").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_written_settings_omit_unset_rounds() {
        let text = toml::to_string(&Settings::default()).unwrap();
        assert!(text.contains("number_of_colors = 6"));
        assert!(text.contains("length_of_code = 4"));
        assert!(!text.contains("max_rounds"));
    }

    #[test]
    fn test_clamped_minimums() {
        let settings = Settings {
            colors: 1,
            code_length: 1,
            allow_duplicates: false,
            max_rounds: Some(3),
        }
        .clamped();
        assert_eq!(settings.colors, MIN_COLORS);
        assert_eq!(settings.code_length, MIN_CODE_LENGTH);
        assert_eq!(settings.max_rounds, Some(3));
    }

    #[test]
    fn test_clamped_forces_duplicates_for_long_codes() {
        let settings = Settings {
            colors: 3,
            code_length: 4,
            allow_duplicates: false,
            max_rounds: None,
        }
        .clamped();
        assert!(settings.allow_duplicates);
        assert!(settings.session_options(None).is_ok());

        // Clamping colors up can make a short code fit again
        let fits = Settings {
            colors: 1,
            code_length: 3,
            allow_duplicates: false,
            max_rounds: None,
        }
        .clamped();
        assert!(!fits.allow_duplicates);
    }

    #[test]
    fn test_session_options_from_settings() {
        let options = Settings::default().session_options(Some(9)).unwrap();
        assert_eq!(options.rules.colors(), 6);
        assert_eq!(options.rules.code_length(), 4);
        assert_eq!(options.seed, Some(9));

        let bad = Settings {
            colors: 3,
            code_length: 4,
            allow_duplicates: false,
            max_rounds: None,
        };
        assert!(bad.session_options(None).is_err());
    }

    #[test]
    fn test_write_then_load_settings_file() {
        let path = std::env::temp_dir()
            .join("mastermind_settings_test")
            .join("settings.toml");
        let settings = Settings {
            colors: 7,
            code_length: 3,
            allow_duplicates: false,
            max_rounds: Some(6),
        };
        write_settings(&path, &settings).unwrap();
        assert_eq!(load_settings_from_file(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_settings_missing_file() {
        let err = load_settings_from_file("/nonexistent/mastermind/settings.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
