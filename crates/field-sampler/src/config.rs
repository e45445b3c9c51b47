//! Configuration for sampling and batching.

use seaview_common::{FieldError, FieldResult};

/// Maximum instances a single instanced draw call accepts.
pub const MAX_INSTANCES_PER_BATCH: usize = 1023;

/// Configuration for [`crate::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// World-space distance between neighbouring grid cells
    pub spacing: f32,

    /// Largest number of poses in one batch
    pub instance_cap: usize,

    /// Uniform scale applied to every glyph
    pub glyph_scale: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            instance_cap: MAX_INSTANCES_PER_BATCH,
            glyph_scale: 1.0,
        }
    }
}

impl SamplerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SEAVIEW_SPACING") {
            if let Ok(spacing) = val.parse() {
                config.spacing = spacing;
            }
        }

        if let Ok(val) = std::env::var("SEAVIEW_INSTANCE_CAP") {
            if let Ok(cap) = val.parse() {
                config.instance_cap = cap;
            }
        }

        if let Ok(val) = std::env::var("SEAVIEW_GLYPH_SCALE") {
            if let Ok(scale) = val.parse() {
                config.glyph_scale = scale;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> FieldResult<()> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(FieldError::config("spacing must be a positive number"));
        }

        if self.instance_cap == 0 || self.instance_cap > MAX_INSTANCES_PER_BATCH {
            return Err(FieldError::config(format!(
                "instance_cap must be 1-{}",
                MAX_INSTANCES_PER_BATCH
            )));
        }

        if !self.glyph_scale.is_finite() || self.glyph_scale <= 0.0 {
            return Err(FieldError::config("glyph_scale must be a positive number"));
        }

        Ok(())
    }
}
