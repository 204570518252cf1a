use glam::Vec2;
use rand::Rng;

use crate::{color::Rgba, types::ParticleId};

/// Stage width at which particles are drawn at exactly `particle_size`.
pub const REFERENCE_WIDTH: f32 = 400.0;

pub const DEFAULT_FRICTION: f32 = 0.80;
pub const DEFAULT_EASE: f32 = 0.12;

#[derive(Clone, Debug)]
pub struct Particle {
    pub id: ParticleId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Home coordinate; fallback target and anchor for idle noise.
    pub base: Vec2,
    pub target: Vec2,
    pub radius: f32,
    pub friction: f32,
    pub ease: f32,
    pub color: Rgba,
    pub alpha: f32,
    /// Per-frame radius multiplier written by time-dependent generators.
    pub scale: f32,
    /// Lane, orbit or role bucket assigned by the current generator.
    pub group: Option<u8>,
    /// Logical edge this particle renders as, for line-flow effects.
    pub connector: Option<usize>,
}

impl Particle {
    pub fn new(id: ParticleId, pos: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            base: pos,
            target: pos,
            radius,
            friction: DEFAULT_FRICTION,
            ease: DEFAULT_EASE,
            color,
            alpha: 1.0,
            scale: 1.0,
            group: None,
            connector: None,
        }
    }

    /// Deterministic value in `[0, 1)` derived from the particle id and a salt.
    ///
    /// Used wherever a generator wants per-particle variety that must not
    /// change between frames (phase offsets, blink rates, grid cells).
    pub fn noise(&self, salt: f32) -> f32 {
        hash01(self.id as f32 * 1.618 + salt)
    }

    /// Clears the per-generator role and visual modulation.
    pub fn reset_role(&mut self) {
        self.group = None;
        self.connector = None;
        self.alpha = 1.0;
        self.scale = 1.0;
    }
}

pub(crate) fn hash01(seed: f32) -> f32 {
    let x = (seed * 12.9898 + 78.233).sin() * 43758.545;
    (x - x.floor()).min(0.999_999)
}

/// Radius for `base_size` at the given canvas width, scaled by
/// `width / REFERENCE_WIDTH` clamped to `[0.6, 1.5]`.
pub fn scale_radius(base_size: f32, canvas_width: f32) -> f32 {
    let factor = (canvas_width / REFERENCE_WIDTH).clamp(0.6, 1.5);
    (base_size * factor).max(0.0)
}

/// The mutable particle population.
#[derive(Debug, Default)]
pub struct ParticleStore {
    pub particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Resizes the population to `count`, keeping surviving particles as they are.
    ///
    /// New particles are appended at uniformly random positions inside the
    /// canvas; shrinking truncates from the tail. Every particle's radius is
    /// re-derived from `base_size` and `width`.
    pub fn reseed(
        &mut self,
        width: f32,
        height: f32,
        count: usize,
        base_size: f32,
        color: Rgba,
        rng: &mut impl Rng,
    ) {
        let radius = scale_radius(base_size, width);
        let before = self.particles.len();

        self.particles.truncate(count);
        while self.particles.len() < count {
            let id = self.particles.len();
            let pos = random_in_rect(width, height, rng);
            self.particles.push(Particle::new(id, pos, radius, color));
        }

        for p in &mut self.particles {
            p.radius = radius;
        }

        log::debug!("reseed {before} -> {count} particles at {width}x{height}");
    }

    /// Drops every particle and regenerates the population from scratch.
    pub fn reset(
        &mut self,
        width: f32,
        height: f32,
        count: usize,
        base_size: f32,
        color: Rgba,
        rng: &mut impl Rng,
    ) {
        self.particles.clear();
        self.reseed(width, height, count, base_size, color, rng);
    }
}

fn random_in_rect(width: f32, height: f32, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * width.max(0.0),
        rng.random::<f32>() * height.max(0.0),
    )
}
