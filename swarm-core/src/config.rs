use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    color::Rgba,
    error::Result,
    types::{Status, Theme},
};

pub const MAX_PARTICLES: i32 = 5000;

/// Host-supplied animation parameters.
///
/// A config is always replaced wholesale; the stage re-derives whatever
/// depends on it. Out-of-range values are clamped by [`AnimationConfig::sanitized`]
/// rather than rejected: when loaded from JSON, a count outside the `i32` range
/// saturates and a malformed colour falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Number of particles. Negative values are treated as zero.
    #[serde(deserialize_with = "saturating_count")]
    pub particle_count: i32,
    /// Multiplier on the animation clock.
    pub base_speed: f32,
    /// Particle radius before the canvas-width scale factor.
    pub particle_size: f32,
    /// Amplitude of random jitter and glitches, in `[0, 1]`.
    pub chaos_factor: f32,
    /// Maximum distance for connective edges; `0` disables them.
    pub connection_threshold: f32,
    pub theme: Theme,
    #[serde(deserialize_with = "primary_or_default")]
    pub primary_color: Rgba,
    #[serde(deserialize_with = "accent_or_default")]
    pub accent_color: Rgba,
    pub status: Status,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            particle_count: 800,
            base_speed: 1.0,
            particle_size: 2.0,
            chaos_factor: 0.15,
            connection_threshold: 0.0,
            theme: Theme::Light,
            primary_color: Rgba::ZINC_900,
            accent_color: Rgba::SKY_500,
            status: Status::Idle,
        }
    }
}

impl AnimationConfig {
    /// Parses a config document, filling missing fields from [`Default`].
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: AnimationConfig = serde_json::from_str(json)?;
        Ok(cfg.sanitized())
    }

    /// Clamps every field into its supported range. NaN falls back to the default.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let clamp = |v: f32, lo: f32, hi: f32, fallback: f32| {
            if v.is_nan() { fallback } else { v.clamp(lo, hi) }
        };

        Self {
            particle_count: self.particle_count.clamp(0, MAX_PARTICLES),
            base_speed: clamp(self.base_speed, 0.1, 3.0, d.base_speed),
            particle_size: clamp(self.particle_size, 0.5, 4.0, d.particle_size),
            chaos_factor: clamp(self.chaos_factor, 0.0, 1.0, d.chaos_factor),
            connection_threshold: clamp(self.connection_threshold, 0.0, 200.0, 0.0),
            ..self
        }
    }

    /// Particle count as a store length.
    pub fn count(&self) -> usize {
        self.particle_count.max(0) as usize
    }

    /// Muted tone used for resting particles (scan grid background dots).
    pub fn muted_color(&self) -> Rgba {
        match self.theme {
            Theme::Dark => Rgba::ZINC_600,
            Theme::Light => Rgba::ZINC_200,
        }
    }
}

/// Any JSON number, saturated into `i32`; anything else is the default count.
fn saturating_count<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<i32, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(match value.as_f64() {
        // `as` saturates and maps NaN to 0.
        Some(n) => n as i32,
        None => {
            log::warn!("particle_count {value} is not a number; using the default");
            AnimationConfig::default().particle_count
        }
    })
}

fn color_or<'de, D: Deserializer<'de>>(
    de: D,
    fallback: Rgba,
) -> std::result::Result<Rgba, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(match value.as_str() {
        Some(s) => Rgba::parse_or(s, fallback),
        None => {
            log::warn!("colour {value} is not a string; using {fallback}");
            fallback
        }
    })
}

fn primary_or_default<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Rgba, D::Error> {
    color_or(de, AnimationConfig::default().primary_color)
}

fn accent_or_default<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Rgba, D::Error> {
    color_or(de, AnimationConfig::default().accent_color)
}
