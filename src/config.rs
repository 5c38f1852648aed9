//! Layered per-animation configuration.
//!
//! Values come from an ordered list of [`ConfigLayer`]s (command line overrides, then the
//! character's `config.toml`, then the game's, then built-in defaults). Every value is decoded
//! into a typed [`ConfigValue`] when its layer is built, so nothing downstream handles raw text.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::{
    Rgb, ScaleFactor,
    foundation::error::{SpriteError, SpriteResult},
    pipeline::PipelineSettings,
};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    AvgCharHeight,
    BackgroundColor,
    Saturation,
    ShouldOutline,
    OneFramePerFile,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::AvgCharHeight,
        ConfigKey::BackgroundColor,
        ConfigKey::Saturation,
        ConfigKey::ShouldOutline,
        ConfigKey::OneFramePerFile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::AvgCharHeight => "avg_char_height",
            ConfigKey::BackgroundColor => "background_color",
            ConfigKey::Saturation => "saturation",
            ConfigKey::ShouldOutline => "should_outline",
            ConfigKey::OneFramePerFile => "one_frame_per_file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Color(Rgb),
}

impl ConfigValue {
    /// Decode a textual value (command line or quoted TOML string) for `key`.
    pub fn parse_text(key: ConfigKey, text: &str) -> Result<Self, String> {
        let text = text.trim();
        match key {
            ConfigKey::AvgCharHeight => text
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| format!("expected an integer, got '{text}'")),
            ConfigKey::BackgroundColor => text
                .parse::<Rgb>()
                .map(Self::Color)
                .map_err(|e| e.to_string()),
            ConfigKey::Saturation => text
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| format!("expected a number, got '{text}'")),
            ConfigKey::ShouldOutline | ConfigKey::OneFramePerFile => {
                match text.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => Ok(Self::Boolean(true)),
                    "false" | "no" | "off" | "0" => Ok(Self::Boolean(false)),
                    _ => Err(format!("expected a boolean, got '{text}'")),
                }
            }
        }
    }

    pub fn from_toml(key: ConfigKey, value: &toml::Value) -> Result<Self, String> {
        use toml::Value;

        match (key, value) {
            (_, Value::String(s)) => Self::parse_text(key, s),
            (ConfigKey::AvgCharHeight, Value::Integer(v)) => Ok(Self::Integer(*v)),
            (ConfigKey::Saturation, Value::Float(v)) => Ok(Self::Float(*v)),
            (ConfigKey::Saturation, Value::Integer(v)) => Ok(Self::Float(*v as f64)),
            (ConfigKey::ShouldOutline | ConfigKey::OneFramePerFile, Value::Boolean(v)) => {
                Ok(Self::Boolean(*v))
            }
            (ConfigKey::BackgroundColor, Value::Array(items)) => {
                let components = items
                    .iter()
                    .map(|v| {
                        v.as_integer()
                            .ok_or_else(|| format!("color values must be integers, got {v}"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Rgb::from_components(&components)
                    .map(Self::Color)
                    .map_err(|e| e.to_string())
            }
            (_, other) => Err(format!("unsupported value {other}")),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgb> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }
}

/// One lookup source, e.g. a config file or the command line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigLayer {
    pub name: String,
    values: BTreeMap<ConfigKey, ConfigValue>,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    config: toml::Table,
}

impl ConfigLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn defaults() -> Self {
        Self::new("defaults")
            .with(ConfigKey::Saturation, ConfigValue::Float(1.0))
            .with(ConfigKey::ShouldOutline, ConfigValue::Boolean(false))
            .with(ConfigKey::OneFramePerFile, ConfigValue::Boolean(false))
    }

    pub fn with(mut self, key: ConfigKey, value: ConfigValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: ConfigKey) -> Option<&ConfigValue> {
        self.values.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse the `[config]` table of a TOML document. Unknown keys are ignored with a warning.
    pub fn from_toml_str(name: impl Into<String>, text: &str) -> SpriteResult<Self> {
        let name = name.into();
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| SpriteError::config(&name, e.message()))?;

        let mut layer = Self::new(name);
        for (raw_key, raw_value) in &file.config {
            let Some(key) = ConfigKey::from_name(raw_key) else {
                tracing::warn!(layer = %layer.name, key = %raw_key, "ignoring unknown config key");
                continue;
            };
            let value = ConfigValue::from_toml(key, raw_value)
                .map_err(|msg| SpriteError::config(&layer.name, format!("{key}: {msg}")))?;
            layer.set(key, value);
        }
        Ok(layer)
    }

    /// Load `dir/config.toml`. A missing file yields an empty layer.
    pub fn load_dir(dir: &Path) -> SpriteResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let name = path.display().to_string();
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let layer = Self::from_toml_str(name, &text)?;
                tracing::debug!(path = %path.display(), keys = layer.values.len(), "loaded config");
                Ok(layer)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new(name)),
            Err(e) => Err(SpriteError::config(name, format!("failed to read: {e}"))),
        }
    }
}

/// Ordered config sources; the first layer holding a key wins.
#[derive(Clone, Debug, Default)]
pub struct LayeredConfig {
    layers: Vec<ConfigLayer>,
}

impl LayeredConfig {
    pub fn new(layers: Vec<ConfigLayer>) -> Self {
        Self { layers }
    }

    /// Overrides, then `character_dir/config.toml`, then `game_dir/config.toml`, then defaults.
    pub fn for_character(
        overrides: &ConfigLayer,
        game_dir: &Path,
        character_dir: &Path,
    ) -> SpriteResult<Self> {
        Ok(Self::new(vec![
            overrides.clone(),
            ConfigLayer::load_dir(character_dir)?,
            ConfigLayer::load_dir(game_dir)?,
            ConfigLayer::defaults(),
        ]))
    }

    pub fn resolve(&self, key: ConfigKey) -> Option<&ConfigValue> {
        self.resolve_with_source(key).map(|(v, _)| v)
    }

    pub fn resolve_with_source(&self, key: ConfigKey) -> Option<(&ConfigValue, &str)> {
        self.layers
            .iter()
            .find_map(|layer| layer.get(key).map(|v| (v, layer.name.as_str())))
    }

    pub fn one_frame_per_file(&self) -> bool {
        self.resolve(ConfigKey::OneFramePerFile)
            .and_then(ConfigValue::as_bool)
            .unwrap_or(false)
    }

    /// Resolve the typed settings for one animation unit. Errors name the unit and parameter.
    pub fn animation_settings(&self, unit: &str) -> SpriteResult<AnimationSettings> {
        let wrong_type = |key: ConfigKey, value: &ConfigValue| {
            SpriteError::config(unit, format!("{key} has the wrong type ({value:?})"))
        };

        let avg_char_height = match self.resolve(ConfigKey::AvgCharHeight) {
            None => {
                return Err(SpriteError::config(
                    unit,
                    "avg_char_height must be defined in a config file or argument",
                ));
            }
            Some(v) => {
                let raw = v
                    .as_integer()
                    .ok_or_else(|| wrong_type(ConfigKey::AvgCharHeight, v))?;
                u32::try_from(raw).ok().filter(|h| *h > 0).ok_or_else(|| {
                    SpriteError::config(unit, format!("avg_char_height must be > 0, got {raw}"))
                })?
            }
        };

        let background_color = match self.resolve(ConfigKey::BackgroundColor) {
            None => None,
            Some(v) => Some(
                v.as_color()
                    .ok_or_else(|| wrong_type(ConfigKey::BackgroundColor, v))?,
            ),
        };

        let saturation = match self.resolve(ConfigKey::Saturation) {
            None => 1.0,
            Some(v) => {
                let s = v
                    .as_float()
                    .ok_or_else(|| wrong_type(ConfigKey::Saturation, v))?;
                if !s.is_finite() || s < 0.0 {
                    return Err(SpriteError::config(
                        unit,
                        format!("saturation must be a finite number >= 0, got {s}"),
                    ));
                }
                s as f32
            }
        };

        let should_outline = match self.resolve(ConfigKey::ShouldOutline) {
            None => false,
            Some(v) => v
                .as_bool()
                .ok_or_else(|| wrong_type(ConfigKey::ShouldOutline, v))?,
        };

        Ok(AnimationSettings {
            avg_char_height,
            background_color,
            saturation,
            should_outline,
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnimationSettings {
    pub avg_char_height: u32,
    pub background_color: Option<Rgb>,
    pub saturation: f32,
    pub should_outline: bool,
}

impl AnimationSettings {
    pub fn pipeline(&self) -> SpriteResult<PipelineSettings> {
        Ok(PipelineSettings {
            background_color: self.background_color,
            scale: ScaleFactor::for_avg_height(self.avg_char_height)?,
            saturation: self.saturation,
            outline: self.should_outline,
        })
    }
}
