use pixel_palette::Rgb;
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Upper bound for grid divisions along the longer side.
pub const MAX_GRID_ROWS: u32 = 400;

/// Palette used by the pixel-art stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteChoice {
    /// Keep 24-bit color
    #[default]
    None,
    Colors16,
    Colors32,
    Colors64,
    /// Fixed four-tone green palette
    GameBoy,
}

impl PaletteChoice {
    /// Number of adaptive colors, or `None` for the fixed/unquantized choices.
    pub fn adaptive_colors(self) -> Option<usize> {
        match self {
            PaletteChoice::Colors16 => Some(16),
            PaletteChoice::Colors32 => Some(32),
            PaletteChoice::Colors64 => Some(64),
            PaletteChoice::None | PaletteChoice::GameBoy => None,
        }
    }
}

impl fmt::Display for PaletteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaletteChoice::None => "none",
            PaletteChoice::Colors16 => "16",
            PaletteChoice::Colors32 => "32",
            PaletteChoice::Colors64 => "64",
            PaletteChoice::GameBoy => "gameboy",
        };
        f.write_str(name)
    }
}

impl FromStr for PaletteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match normalized.as_str() {
            "none" | "" => Ok(PaletteChoice::None),
            "16" | "16colors" | "colors16" => Ok(PaletteChoice::Colors16),
            "32" | "32colors" | "colors32" => Ok(PaletteChoice::Colors32),
            "64" | "64colors" | "colors64" => Ok(PaletteChoice::Colors64),
            "gameboy" | "gb" => Ok(PaletteChoice::GameBoy),
            _ => Err(format!("unknown palette '{s}'")),
        }
    }
}

/// Dithering applied by the pixel-art stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    #[default]
    None,
    FloydSteinberg,
    Ordered,
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DitherMode::None => "none",
            DitherMode::FloydSteinberg => "floyd-steinberg",
            DitherMode::Ordered => "ordered",
        };
        f.write_str(name)
    }
}

impl FromStr for DitherMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("none") => Ok(DitherMode::None),
            s if s.eq_ignore_ascii_case("floyd-steinberg")
                || s.eq_ignore_ascii_case("floyd_steinberg")
                || s.eq_ignore_ascii_case("floyd") =>
            {
                Ok(DitherMode::FloydSteinberg)
            }
            s if s.eq_ignore_ascii_case("ordered") || s.eq_ignore_ascii_case("bayer") => {
                Ok(DitherMode::Ordered)
            }
            _ => Err(format!("unknown dithering mode '{s}'")),
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

/// Snapshot of every user-tunable transform parameter.
///
/// Loaded from a flat YAML map; each key falls back to its default on its
/// own when missing or invalid. Stages only ever see a copy of this record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformSettings {
    pub h_padding: u32,
    pub v_padding: u32,
    pub zoom_factor: f64,

    pub grid_enabled: bool,
    /// Divisions along the longer side, `0..=400`
    pub grid_rows: u32,
    pub grid_thickness: u32,
    /// Lines whose index is a multiple of this get one extra pixel (0, 5 or 10)
    pub grid_highlight_every: u32,
    #[serde(serialize_with = "serialize_display")]
    pub grid_color: Rgb,
    #[serde(serialize_with = "serialize_display")]
    pub grid_number_text_color: Rgb,
    #[serde(serialize_with = "serialize_display")]
    pub grid_number_bg_color: Rgb,
    pub show_grid_numbers: bool,

    pub pixel_art_enabled: bool,
    pub pixel_art_scale: u32,
    #[serde(serialize_with = "serialize_display")]
    pub palette: PaletteChoice,
    #[serde(serialize_with = "serialize_display")]
    pub dithering: DitherMode,
    pub sharpen: bool,
    /// Derive the grid size from the pixel-art cell count
    pub sync_grid_to_pixels: bool,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            h_padding: 0,
            v_padding: 0,
            zoom_factor: 1.0,
            grid_enabled: true,
            grid_rows: 20,
            grid_thickness: 1,
            grid_highlight_every: 0,
            grid_color: Rgb::BLACK,
            grid_number_text_color: Rgb::BLACK,
            grid_number_bg_color: Rgb::WHITE,
            show_grid_numbers: false,
            pixel_art_enabled: false,
            pixel_art_scale: 8,
            palette: PaletteChoice::None,
            dithering: DitherMode::None,
            sharpen: false,
            sync_grid_to_pixels: false,
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "h_padding",
    "v_padding",
    "zoom_factor",
    "grid_enabled",
    "grid_rows",
    "grid_thickness",
    "grid_highlight_every",
    "grid_color",
    "grid_number_text_color",
    "grid_number_bg_color",
    "show_grid_numbers",
    "pixel_art_enabled",
    "pixel_art_scale",
    "palette",
    "dithering",
    "sharpen",
    "sync_grid_to_pixels",
];

/// Look up `key` and parse it, keeping `default` when missing or invalid.
fn field<T>(map: &Mapping, key: &str, default: T, parse: impl Fn(&Value) -> Option<T>) -> T {
    match map.get(key) {
        None | Some(Value::Null) => default,
        Some(value) => match parse(value) {
            Some(parsed) => parsed,
            None => {
                tracing::warn!(key, value = ?value, "Invalid setting, using default");
                default
            }
        },
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn as_bool(value: &Value) -> Option<bool> {
    value.as_bool()
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_color(value: &Value) -> Option<Rgb> {
    value.as_str().and_then(|s| s.parse().ok())
}

fn as_positive_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && *v > 0.0)
}

impl TransformSettings {
    /// Load settings from a YAML file. Never fails: unreadable files and
    /// broken YAML yield the defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let settings = Self::from_yaml_str(&content);
                tracing::info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    /// Parse settings from YAML text, falling back per key.
    pub fn from_yaml_str(content: &str) -> Self {
        match serde_yaml::from_str::<Value>(content) {
            Ok(Value::Mapping(map)) => Self::from_mapping(&map),
            Ok(Value::Null) => Self::default(),
            Ok(_) => {
                tracing::warn!("Settings file is not a key/value map, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse settings, using defaults");
                Self::default()
            }
        }
    }

    fn from_mapping(map: &Mapping) -> Self {
        for key in map.keys() {
            let known = key.as_str().is_some_and(|k| KNOWN_KEYS.contains(&k));
            if !known {
                tracing::warn!(key = ?key, "Ignoring unknown setting");
            }
        }

        let d = Self::default();
        let settings = Self {
            h_padding: field(map, "h_padding", d.h_padding, as_u32),
            v_padding: field(map, "v_padding", d.v_padding, as_u32),
            zoom_factor: field(map, "zoom_factor", d.zoom_factor, as_positive_f64),
            grid_enabled: field(map, "grid_enabled", d.grid_enabled, as_bool),
            grid_rows: field(map, "grid_rows", d.grid_rows, |v| {
                as_u32(v).filter(|&r| r <= MAX_GRID_ROWS)
            }),
            grid_thickness: field(map, "grid_thickness", d.grid_thickness, |v| {
                as_u32(v).filter(|&t| t >= 1)
            }),
            grid_highlight_every: field(map, "grid_highlight_every", d.grid_highlight_every, |v| {
                as_u32(v).filter(|h| matches!(h, 0 | 5 | 10))
            }),
            grid_color: field(map, "grid_color", d.grid_color, as_color),
            grid_number_text_color: field(
                map,
                "grid_number_text_color",
                d.grid_number_text_color,
                as_color,
            ),
            grid_number_bg_color: field(
                map,
                "grid_number_bg_color",
                d.grid_number_bg_color,
                as_color,
            ),
            show_grid_numbers: field(map, "show_grid_numbers", d.show_grid_numbers, as_bool),
            pixel_art_enabled: field(map, "pixel_art_enabled", d.pixel_art_enabled, as_bool),
            pixel_art_scale: field(map, "pixel_art_scale", d.pixel_art_scale, |v| {
                as_u32(v).filter(|&s| s >= 2)
            }),
            palette: field(map, "palette", d.palette, |v| {
                as_text(v).and_then(|s| s.parse().ok())
            }),
            dithering: field(map, "dithering", d.dithering, |v| {
                as_text(v).and_then(|s| s.parse().ok())
            }),
            sharpen: field(map, "sharpen", d.sharpen, as_bool),
            sync_grid_to_pixels: field(map, "sync_grid_to_pixels", d.sync_grid_to_pixels, as_bool),
        };

        settings.normalized()
    }

    /// Copy with every range enforced and sync disabled when pixel art is off.
    pub fn normalized(&self) -> Self {
        let mut s = self.clone();
        s.grid_rows = s.grid_rows.min(MAX_GRID_ROWS);
        s.grid_thickness = s.grid_thickness.max(1);
        if !matches!(s.grid_highlight_every, 0 | 5 | 10) {
            s.grid_highlight_every = 0;
        }
        s.pixel_art_scale = s.pixel_art_scale.max(2);
        if !(s.zoom_factor.is_finite() && s.zoom_factor > 0.0) {
            s.zoom_factor = 1.0;
        }
        if !s.pixel_art_enabled {
            s.sync_grid_to_pixels = false;
        }
        s
    }

    /// Serialize as the flat YAML map [`load`](Self::load) reads.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
