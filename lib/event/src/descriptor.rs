//! Declarative event descriptors.

use crate::error::LoadError;
use rootcause::prelude::Report;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// The immutable description of one scheduled event.
///
/// Descriptors are usually read from the `events` table of the settings
/// file, where the table key supplies the name. Keys other than the common
/// ones below are collected into `settings` and interpreted by the event
/// type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Unique name, taken from the table key.
    #[serde(skip)]
    pub name: String,
    /// Tags attached to the event's trigger.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Event type tag, e.g. `PlayVideo`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Cadence expression, e.g. `every 10 seconds`.
    pub schedule: String,
    /// Whether a failing hook cancels the event.
    #[serde(default)]
    pub cancel_on_error: bool,
    /// Type-specific settings.
    #[serde(flatten)]
    pub settings: Map<String, JsonValue>,
}

impl EventDescriptor {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        event_type: impl Into<String>,
        schedule: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            event_type: event_type.into(),
            schedule: schedule.into(),
            cancel_on_error: false,
            settings: Map::new(),
        }
    }

    /// Reads a descriptor from its untyped form, naming it `name`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidDescriptor` if a common key is missing or
    /// has the wrong type.
    pub fn from_value(name: &str, value: JsonValue) -> Result<Self, Report<LoadError>> {
        let mut descriptor: Self =
            serde_json::from_value(value).map_err(|e| LoadError::InvalidDescriptor {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        descriptor.name = name.to_string();
        Ok(descriptor)
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_cancel_on_error(mut self, cancel_on_error: bool) -> Self {
        self.cancel_on_error = cancel_on_error;
        self
    }

    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Interprets the type-specific settings.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidSettings` if the settings do not match `T`.
    pub fn settings_as<T: DeserializeOwned>(&self) -> Result<T, Report<LoadError>> {
        let settings = serde_json::from_value(JsonValue::Object(self.settings.clone())).map_err(
            |e| LoadError::InvalidSettings {
                name: self.name.clone(),
                reason: e.to_string(),
            },
        )?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_common_fields_and_collects_the_rest() {
        let descriptor: EventDescriptor = serde_json::from_value(json!({
            "type": "PlayVideo",
            "schedule": "every 10 seconds",
            "tags": ["lobby"],
            "cancel_on_error": true,
            "url": "file:///clip.mp4",
            "volume": 40
        }))
        .expect("deserialize");

        assert_eq!(descriptor.name, "");
        assert_eq!(descriptor.event_type, "PlayVideo");
        assert_eq!(descriptor.schedule, "every 10 seconds");
        assert_eq!(descriptor.tags, vec!["lobby".to_string()]);
        assert!(descriptor.cancel_on_error);
        assert_eq!(descriptor.settings.len(), 2);
        assert_eq!(descriptor.settings["volume"], json!(40));
    }

    #[test]
    fn optional_fields_default() {
        let descriptor: EventDescriptor = serde_json::from_value(json!({
            "type": "PlayVideo",
            "schedule": "every day at 10:30"
        }))
        .expect("deserialize");

        assert!(descriptor.tags.is_empty());
        assert!(!descriptor.cancel_on_error);
        assert!(descriptor.settings.is_empty());
    }

    #[test]
    fn missing_schedule_is_rejected() {
        let result: Result<EventDescriptor, _> =
            serde_json::from_value(json!({ "type": "PlayVideo" }));
        assert!(result.is_err());
    }

    #[test]
    fn from_value_names_the_descriptor() {
        let descriptor = EventDescriptor::from_value(
            "clip",
            json!({ "type": "PlayVideo", "schedule": "every minute", "url": "file:///clip.mp4" }),
        )
        .expect("valid descriptor");
        assert_eq!(descriptor.name, "clip");
        assert_eq!(descriptor.settings.len(), 1);
    }

    #[test]
    fn from_value_rejects_malformed_common_keys() {
        for value in [
            json!({ "type": "PlayVideo" }),
            json!({ "type": "PlayVideo", "schedule": "every minute", "cancel_on_error": "yes" }),
            json!("PlayVideo every minute"),
        ] {
            let err = EventDescriptor::from_value("clip", value).unwrap_err();
            assert!(err.to_string().contains("event 'clip' is malformed"));
        }
    }

    #[test]
    fn settings_as_reports_descriptor_name() {
        #[derive(Debug, Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            url: String,
        }

        let descriptor = EventDescriptor::new("clip", "PlayVideo", "every minute");
        let err = descriptor.settings_as::<Needs>().unwrap_err();
        assert!(err.to_string().contains("event 'clip' has invalid settings"));
    }
}
