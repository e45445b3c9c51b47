//! Color gradients for magnitude-based glyph coloring.
//!
//! A gradient maps a normalized coordinate in `[0, 1]` to a color. Gradients
//! are defined as JSON stop lists so the ramp can be changed without a rebuild:
//!
//! ```json
//! {
//!   "stops": [
//!     { "position": 0.0, "color": "#08306b" },
//!     { "position": 1.0, "color": [220, 40, 30] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FieldError, FieldResult};

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorSpec")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Linear interpolation between two colors.
    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp_u8 =
            |a: u8, b: u8| -> u8 { ((a as f32) * (1.0 - t) + (b as f32) * t).round() as u8 };

        Color::new(
            lerp_u8(self.r, other.r),
            lerp_u8(self.g, other.g),
            lerp_u8(self.b, other.b),
            lerp_u8(self.a, other.a),
        )
    }

    /// Channels as floats in `[0, 1]`, the layout GPU color buffers expect.
    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Hex string in `#RRGGBBAA` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Accepted JSON spellings of a color.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    /// Hex string: "#RRGGBB" or "#RRGGBBAA"
    Hex(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: Option<u8> },
}

impl TryFrom<ColorSpec> for Color {
    type Error = String;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Hex(s) => parse_hex_color(&s),
            ColorSpec::Array(arr) => match arr.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Color::new(*r, *g, *b, *a)),
                _ => Err(format!("color array must have 3 or 4 entries, got {}", arr.len())),
            },
            ColorSpec::Rgba { r, g, b, a } => Ok(Color::new(r, g, b, a.unwrap_or(255))),
        }
    }
}

fn parse_hex_color(s: &str) -> Result<Color, String> {
    let hex = s.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .ok_or_else(|| format!("invalid hex color: {}", s))
    };

    match hex.len() {
        6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Ok(Color::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(format!("invalid hex color: {}", s)),
    }
}

/// Anything that maps a normalized scalar to a color.
///
/// Implemented for [`GradientConfig`] and for any `Fn(f32) -> Color`, so
/// callers can inject a closure where a configured ramp is overkill.
pub trait ColorRamp: Send + Sync {
    /// Color at normalized coordinate `t` (expected in `[0, 1]`).
    fn color_at(&self, t: f32) -> Color;
}

impl<F> ColorRamp for F
where
    F: Fn(f32) -> Color + Send + Sync,
{
    fn color_at(&self, t: f32) -> Color {
        self(t)
    }
}

/// Interpolation method between color stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
}

/// A color stop in a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Normalized position of this stop in `[0, 1]`
    pub position: f32,

    /// The color at this stop
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// Stop-based gradient over the normalized range `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Color stops defining the gradient
    pub stops: Vec<ColorStop>,

    /// How to interpolate between stops
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self::ocean()
    }
}

impl GradientConfig {
    /// Slow-to-fast current ramp: deep blue, cyan, green, yellow, red.
    pub fn ocean() -> Self {
        Self {
            stops: vec![
                ColorStop::new(0.0, Color::rgb(8, 48, 107)),
                ColorStop::new(0.25, Color::rgb(0, 190, 230)),
                ColorStop::new(0.5, Color::rgb(40, 200, 80)),
                ColorStop::new(0.75, Color::rgb(250, 220, 40)),
                ColorStop::new(1.0, Color::rgb(220, 40, 30)),
            ],
            interpolation: Interpolation::Linear,
        }
    }

    /// Load a gradient from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> FieldResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a gradient from a JSON string.
    pub fn from_json(json: &str) -> FieldResult<Self> {
        let gradient: GradientConfig = serde_json::from_str(json)?;
        gradient.validate()?;
        Ok(gradient)
    }

    pub fn validate(&self) -> FieldResult<()> {
        if self.stops.len() < 2 {
            return Err(FieldError::config("gradient must have at least 2 color stops"));
        }

        for stop in &self.stops {
            if !(0.0..=1.0).contains(&stop.position) {
                return Err(FieldError::config(format!(
                    "gradient stop position {} is outside [0, 1]",
                    stop.position
                )));
            }
        }

        if self
            .stops
            .windows(2)
            .any(|pair| pair[1].position <= pair[0].position)
        {
            return Err(FieldError::config(
                "gradient stops must be in ascending position order",
            ));
        }

        Ok(())
    }

    /// Interpolate the color at `t`, clamping to the outermost stops.
    pub fn sample(&self, t: f32) -> Color {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::transparent(),
        };

        if t.is_nan() || t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (low, high) = (&pair[0], &pair[1]);
            if t <= high.position {
                let local = (t - low.position) / (high.position - low.position);
                return match self.interpolation {
                    Interpolation::Linear => low.color.lerp(&high.color, local),
                    Interpolation::Step if local < 0.5 => low.color,
                    Interpolation::Step => high.color,
                };
            }
        }

        last.color
    }

    /// Evenly spaced legend entries from 0 up to `max_magnitude`.
    ///
    /// Returns an empty legend when fewer than two steps are requested.
    pub fn legend(&self, max_magnitude: f32, steps: usize) -> Vec<LegendEntry> {
        if steps < 2 {
            return Vec::new();
        }

        (0..steps)
            .map(|i| {
                let t = i as f32 / (steps - 1) as f32;
                let value = t * max_magnitude;
                LegendEntry {
                    value,
                    color: self.sample(t),
                    label: format!("{:.2} m/s", value),
                }
            })
            .collect()
    }
}

impl ColorRamp for GradientConfig {
    fn color_at(&self, t: f32) -> Color {
        self.sample(t)
    }
}

/// One swatch of a speed legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    /// Speed this swatch represents
    pub value: f32,
    pub color: Color,
    pub label: String,
}
