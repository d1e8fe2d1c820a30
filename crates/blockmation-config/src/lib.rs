use blockmation_engine::playback::{DEFAULT_FAST_MS, DEFAULT_MEDIUM_MS, DEFAULT_SLOW_MS};
use blockmation_engine::{Block, PlaybackSpeed, SpeedPresets, validate_new_dimensions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value in config file at {config_path}: {reason}")]
    ConfigValueError { config_path: PathBuf, reason: String },
}

/// Named playback speed as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedName {
    Slow,
    #[default]
    Medium,
    Fast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub slow_ms: u64,
    pub medium_ms: u64,
    pub fast_ms: u64,
    pub speed: SpeedName,
    /// Overrides `speed` with an arbitrary delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_delay_ms: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            slow_ms: DEFAULT_SLOW_MS,
            medium_ms: DEFAULT_MEDIUM_MS,
            fast_ms: DEFAULT_FAST_MS,
            speed: SpeedName::default(),
            custom_delay_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relative movie paths given on the command line resolve against this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movies_path: Option<PathBuf>,
    /// Size of a movie created from scratch
    pub default_dimensions: usize,
    pub default_brush: Block,
    pub playback: PlaybackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movies_path: None,
            default_dimensions: 20,
            default_brush: Block::DarkGray,
            playback: PlaybackConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        validate_new_dimensions(config.default_dimensions).map_err(|err| {
            ConfigError::ConfigValueError {
                config_path: config_path.to_path_buf(),
                reason: format!("default_dimensions: {err}"),
            }
        })?;

        // Expand shell variables and tilde in the loaded movies path
        config.movies_path = config
            .movies_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the config file, falling back to defaults when there is none
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/blockmation");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn speed_presets(&self) -> SpeedPresets {
        SpeedPresets {
            slow: Duration::from_millis(self.playback.slow_ms),
            medium: Duration::from_millis(self.playback.medium_ms),
            fast: Duration::from_millis(self.playback.fast_ms),
        }
    }

    pub fn playback_speed(&self) -> PlaybackSpeed {
        if let Some(delay_ms) = self.playback.custom_delay_ms {
            return PlaybackSpeed::Custom(Duration::from_millis(delay_ms));
        }
        match self.playback.speed {
            SpeedName::Slow => PlaybackSpeed::Slow,
            SpeedName::Medium => PlaybackSpeed::Medium,
            SpeedName::Fast => PlaybackSpeed::Fast,
        }
    }

    /// Resolve a movie path from the command line against `movies_path`
    pub fn resolve_movie_path(&self, path: &Path) -> PathBuf {
        match &self.movies_path {
            Some(movies_path) if path.is_relative() => movies_path.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        // Should contain the expected config file name
        assert!(path_str.ends_with(".config/blockmation/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.default_dimensions, 20);
        assert_eq!(config.default_brush, Block::DarkGray);
        assert_eq!(config.speed_presets(), SpeedPresets::default());
        assert_eq!(config.playback_speed(), PlaybackSpeed::Medium);
    }

    #[test]
    fn test_default_playback_table_in_milliseconds() {
        let playback = PlaybackConfig::default();

        assert_eq!(
            (playback.slow_ms, playback.medium_ms, playback.fast_ms),
            (500, 200, 100)
        );
        assert_eq!(playback.speed, SpeedName::Medium);
        assert_eq!(playback.custom_delay_ms, None);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            movies_path: Some(PathBuf::from("/tmp/test-movies")),
            default_dimensions: 32,
            default_brush: Block::Blue,
            playback: PlaybackConfig {
                speed: SpeedName::Fast,
                custom_delay_ms: Some(350),
                ..PlaybackConfig::default()
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_playback_table() {
        let config: Config = toml::from_str(
            r#"
default_brush = "red"

[playback]
slow_ms = 800
speed = "slow"
"#,
        )
        .unwrap();

        assert_eq!(config.default_brush, Block::Red);
        assert_eq!(config.playback.medium_ms, 200);
        assert_eq!(config.speed_presets().slow, Duration::from_millis(800));
        assert_eq!(config.playback_speed(), PlaybackSpeed::Slow);
        assert_eq!(
            config
                .playback_speed()
                .delay(&config.speed_presets()),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn test_custom_delay_overrides_named_speed() {
        let config: Config = toml::from_str(
            r#"
[playback]
speed = "fast"
custom_delay_ms = 350
"#,
        )
        .unwrap();

        assert_eq!(
            config.playback_speed(),
            PlaybackSpeed::Custom(Duration::from_millis(350))
        );
    }

    #[test]
    fn test_unknown_brush_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "default_brush = \"purple\"\n").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_unsupported_default_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "default_dimensions = 500\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigValueError { .. }));
        assert!(err.to_string().contains("default_dimensions"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("BLOCKMATION_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$BLOCKMATION_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("BLOCKMATION_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            movies_path: Some(PathBuf::from("/tmp/test-movies")),
            default_dimensions: 8,
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_movies_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("BLOCKMATION_MOVIES_ROOT", "/custom/movies");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "movies_path = \"$BLOCKMATION_MOVIES_ROOT/mine\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(
            config.movies_path,
            Some(PathBuf::from("/custom/movies/mine"))
        );

        unsafe {
            env::remove_var("BLOCKMATION_MOVIES_ROOT");
        }
    }

    #[test]
    fn test_resolve_movie_path() {
        let config = Config {
            movies_path: Some(PathBuf::from("/movies")),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_movie_path(Path::new("walk.txt")),
            PathBuf::from("/movies/walk.txt")
        );
        assert_eq!(
            config.resolve_movie_path(Path::new("/elsewhere/walk.txt")),
            PathBuf::from("/elsewhere/walk.txt")
        );
        assert_eq!(
            Config::default().resolve_movie_path(Path::new("walk.txt")),
            PathBuf::from("walk.txt")
        );
    }
}
