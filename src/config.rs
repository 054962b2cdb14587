//! Keyed thing configuration.
//!
//! Configs are flat JSON objects: the instance properties authored on a map
//! tile, optionally merged with a per-asset file such as `mouse.json`. Every
//! getter takes a default so that optional keys never fail a spawn; only
//! keys a behaviour cannot do without (the monster `mask`) surface errors.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::numeric::{clamp_f32, saturating_i32};

/// Errors raised while reading or interpreting a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config `{path}`")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The text is not valid JSON.
    #[error("failed to parse config `{path}`")]
    Parse {
        /// File the text came from.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON root is not an object.
    #[error("config root must be a JSON object")]
    NotAnObject,
    /// A key a behaviour needs is absent.
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),
    /// A key holds a value of the wrong shape.
    #[error("key `{key}` must hold {expected}")]
    BadValue {
        /// Offending key.
        key: &'static str,
        /// Shape the key should have held.
        expected: &'static str,
    },
}

/// A JSON object of typed-on-read settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingConfig(Map<String, Value>);

impl ThingConfig {
    /// An empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, which must be an object.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotAnObject`] for any other JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Parses `text`; `path` is only used to label errors.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::NotAnObject`] for a non-object root.
    pub fn from_json_str(path: impl Into<PathBuf>, text: &str) -> Result<Self, ConfigError> {
        let value = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.into(),
            source,
        })?;
        Self::from_value(value)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`Self::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(path, &text)
    }

    /// Builder-style [`Self::set`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Whether `key` is defined at all.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Raw JSON value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Copies in every key of `other` that this config does not define yet.
    ///
    /// Instance properties therefore win over asset defaults.
    pub fn merge(&mut self, other: Self) {
        for (key, value) in other.0 {
            self.0.entry(key).or_insert(value);
        }
    }

    /// String value, or `default` when absent or not a string.
    #[must_use]
    pub fn string(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_owned()
    }

    /// Integer value, saturated into `i32`. Floats are truncated.
    #[must_use]
    pub fn int(&self, key: &str, default: i32) -> i32 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .map(saturating_i32)
                .or_else(|| n.as_f64().and_then(clamp_f32).map(truncate_to_i32))
                .unwrap_or(default),
            _ => default,
        }
    }

    /// Numeric value narrowed to `f32`.
    #[must_use]
    pub fn float(&self, key: &str, default: f32) -> f32 {
        self.0
            .get(key)
            .and_then(Value::as_f64)
            .and_then(clamp_f32)
            .unwrap_or(default)
    }

    /// A numeric array, or `None` if the key is absent or holds anything
    /// else.
    #[must_use]
    pub fn floats(&self, key: &str) -> Option<Vec<f32>> {
        self.0
            .get(key)?
            .as_array()?
            .iter()
            .map(|v| v.as_f64().and_then(clamp_f32))
            .collect()
    }

    /// Two-component vector stored as `[x, y]`.
    #[must_use]
    pub fn vec2(&self, key: &str) -> Option<Vec2> {
        match self.floats(key)?.as_slice() {
            [x, y] => Some(Vec2::new(*x, *y)),
            _ => None,
        }
    }

    /// A string array such as animation state names.
    #[must_use]
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        self.0
            .get(key)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_owned))
            .collect()
    }

    /// The collision mask rectangle `[min_x, min_y, max_x, max_y]`.
    ///
    /// # Errors
    /// [`ConfigError::MissingKey`] if absent, [`ConfigError::BadValue`] if it
    /// is not an array of exactly four numbers.
    pub fn mask(&self) -> Result<[f32; 4], ConfigError> {
        if !self.has("mask") {
            return Err(ConfigError::MissingKey("mask"));
        }
        let bad = || ConfigError::BadValue {
            key: "mask",
            expected: "an array of four numbers",
        };
        match self.floats("mask").ok_or_else(bad)?.as_slice() {
            [a, b, c, d] => Ok([*a, *b, *c, *d]),
            _ => Err(bad()),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Float-to-int `as` saturates; truncation toward zero is intended."
)]
fn truncate_to_i32(value: f32) -> i32 {
    value as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn mouse() -> ThingConfig {
        ThingConfig::from_value(json!({
            "name": "mouse",
            "hp": 3,
            "mask": [2, 4, 14, 16],
            "origin": [0.5, 0.5],
            "states": ["left", "right"]
        }))
        .expect("mouse config is an object")
    }

    #[rstest]
    fn typed_getters_fall_back_to_defaults(mouse: ThingConfig) {
        assert_eq!(mouse.string("name", ""), "mouse");
        assert_eq!(mouse.int("hp", 5), 3);
        assert_eq!(mouse.int("damage", 1), 1);
        assert_eq!(mouse.string("name", "x"), "mouse");
        assert_eq!(mouse.string("type", "gold"), "gold");
        assert!((mouse.float("speed", 2.5) - 2.5).abs() < f32::EPSILON);
        assert_eq!(mouse.vec2("origin"), Some(Vec2::splat(0.5)));
        assert_eq!(
            mouse.strings("states"),
            Some(vec!["left".to_owned(), "right".to_owned()])
        );
    }

    #[rstest]
    fn mask_reads_four_numbers(mouse: ThingConfig) {
        assert_eq!(mouse.mask().expect("mask"), [2.0, 4.0, 14.0, 16.0]);
    }

    #[rstest]
    #[case(json!({}), "missing")]
    #[case(json!({"mask": [1, 2, 3]}), "bad")]
    #[case(json!({"mask": "wide"}), "bad")]
    fn mask_rejects_malformed_input(#[case] value: Value, #[case] expected: &str) {
        let cfg = ThingConfig::from_value(value).expect("object");
        match (cfg.mask(), expected) {
            (Err(ConfigError::MissingKey("mask")), "missing")
            | (Err(ConfigError::BadValue { key: "mask", .. }), "bad") => {}
            (other, _) => panic!("unexpected mask result: {other:?}"),
        }
    }

    #[rstest]
    fn merge_keeps_instance_keys(mut mouse: ThingConfig) {
        let asset = ThingConfig::new().with("hp", 9).with("depth", 1);
        mouse.merge(asset);
        assert_eq!(mouse.int("hp", 5), 3);
        assert!(mouse.has("depth"));
    }

    #[rstest]
    fn from_json_str_reports_parse_errors() {
        let err = ThingConfig::from_json_str("broken.json", "{ nope").expect_err("parse failure");
        assert!(matches!(err, ConfigError::Parse { .. }));
        let err = ThingConfig::from_json_str("list.json", "[1, 2]").expect_err("not an object");
        assert!(matches!(err, ConfigError::NotAnObject));
    }

    #[rstest]
    fn int_truncates_floats_and_saturates() {
        let cfg = ThingConfig::new()
            .with("damage", 2.9)
            .with("hp", i64::MAX);
        assert_eq!(cfg.int("damage", 1), 2);
        assert_eq!(cfg.int("hp", 5), i32::MAX);
    }
}
