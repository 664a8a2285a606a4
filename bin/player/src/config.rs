//! Player configuration.
//!
//! Loaded via the `config` crate from a YAML settings file, with environment
//! overrides prefixed `MARQUEE_` (nested keys separated by `__`).

use indexmap::IndexMap;
use marquee_display::Rect;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::time::Duration;

/// Top-level player configuration.
#[derive(Debug, Deserialize)]
pub struct PlayerConfig {
    /// Period of the tick driver, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Display dimensions.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Event descriptors keyed by name, in declaration order.
    ///
    /// Kept untyped so that a malformed descriptor only skips that event.
    #[serde(default)]
    pub events: IndexMap<String, JsonValue>,
}

/// Display dimensions, in pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl DisplayConfig {
    #[must_use]
    pub fn area(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }
}

impl PlayerConfig {
    /// Loads configuration from `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the configuration does not
    /// match the schema, or the tick interval or display size is zero.
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .add_source(
                config::Environment::with_prefix("MARQUEE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(config::ConfigError::Message(format!(
                "display must have a non-zero size, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_event::EventDescriptor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write settings");
        file
    }

    #[test]
    fn display_config_has_correct_defaults() {
        let display = DisplayConfig::default();
        assert_eq!(display.area(), Rect::sized(1920, 1080));
    }

    #[test]
    fn loads_events_in_declaration_order() {
        let file = settings_file(
            r#"
tick_interval_ms: 250
display:
  width: 1280
  height: 720
events:
  zulu:
    type: PlayVideo
    schedule: every 10 seconds
    url: file:///zulu.mp4
  alpha:
    type: PlayVideo
    schedule: every day at 10:30
    tags: [lobby]
    cancel_on_error: true
    url: file:///alpha.mp4
    volume: 40
    geometry: [0, 0, 640, 360]
"#,
        );

        let config = PlayerConfig::load(file.path()).expect("load");

        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.display.area(), Rect::sized(1280, 720));
        assert_eq!(
            config.events.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["zulu", "alpha"]
        );

        let alpha = EventDescriptor::from_value("alpha", config.events["alpha"].clone())
            .expect("valid descriptor");
        assert_eq!(alpha.event_type, "PlayVideo");
        assert_eq!(alpha.schedule, "every day at 10:30");
        assert_eq!(alpha.tags, vec!["lobby".to_string()]);
        assert!(alpha.cancel_on_error);
        assert!(alpha.settings.contains_key("url"));
        assert!(alpha.settings.contains_key("volume"));
        assert!(alpha.settings.contains_key("geometry"));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let file = settings_file("events: {}\n");
        let config = PlayerConfig::load(file.path()).expect("load");

        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.display.area(), Rect::sized(1920, 1080));
        assert!(config.events.is_empty());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let file = settings_file("tick_interval_ms: 0\n");
        let err = PlayerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let result = PlayerConfig::load(&dir.path().join("absent.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_descriptor_does_not_fail_the_load() {
        let file = settings_file(
            r#"
events:
  good:
    type: PlayVideo
    schedule: every minute
    url: file:///good.mp4
  bad:
    type: PlayVideo
    url: file:///bad.mp4
"#,
        );

        let config = PlayerConfig::load(file.path()).expect("load");

        assert_eq!(config.events.len(), 2);
        assert!(EventDescriptor::from_value("good", config.events["good"].clone()).is_ok());
        assert!(EventDescriptor::from_value("bad", config.events["bad"].clone()).is_err());
    }
}
