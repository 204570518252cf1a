//! Glyph generators: sphere, checkmark, triangle and the error cross.

use glam::Vec2;
use rand::Rng;

use super::{GenContext, TargetGenerator, fill_segment, sample_disk, segment_ranges};
use crate::{color::Rgba, particle::Particle};

/// Uniform disk around the canvas center. Also the fallback for generators
/// that lack their payload.
pub struct Sphere;

impl Sphere {
    pub fn radius(ctx: &GenContext<'_>) -> f32 {
        ctx.min_dim() * 0.25
    }
}

impl TargetGenerator for Sphere {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let center = ctx.center();
        let radius = Self::radius(ctx);
        for p in particles {
            p.target = center + sample_disk(ctx.rng, radius);
            p.color = ctx.config.primary_color;
        }
    }

    /// Slow breathing drift around the assigned target.
    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        for p in particles {
            let phase = ctx.time + p.id as f32;
            p.pos += Vec2::new(phase.cos(), phase.sin()) * 0.2;
        }
    }
}

pub struct Checkmark;

impl Checkmark {
    pub const SPLIT: f32 = 0.35;

    /// Size, short-stroke start, elbow and long-stroke end.
    pub fn geometry(width: f32, height: f32) -> (f32, [Vec2; 3]) {
        let c = Vec2::new(width, height) * 0.5;
        let size = width.min(height) * 0.5;
        let p1 = c + Vec2::new(-0.5, 0.0) * size;
        let p2 = c + Vec2::new(-0.1, 0.4) * size;
        let p3 = c + Vec2::new(0.5, -0.5) * size;
        (size, [p1, p2, p3])
    }
}

impl TargetGenerator for Checkmark {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let (size, [p1, p2, p3]) = Self::geometry(ctx.width, ctx.height);
        let thickness = size * 0.15;
        let ranges = segment_ranges(particles.len(), &[Self::SPLIT, 1.0 - Self::SPLIT]);

        fill_segment(particles, ranges[0].clone(), p1, p2, thickness, ctx.rng);
        fill_segment(particles, ranges[1].clone(), p2, p3, thickness, ctx.rng);

        for p in particles {
            p.color = Rgba::EMERALD_500;
        }
    }
}

pub struct Triangle;

impl Triangle {
    /// Size, apex, bottom-right and bottom-left corners.
    pub fn geometry(width: f32, height: f32) -> (f32, [Vec2; 3]) {
        let size = width.min(height) * 0.45;
        let c = Vec2::new(width * 0.5, height * 0.5 + size * 0.2);
        let p1 = c + Vec2::new(0.0, -1.2) * size;
        let p2 = c + Vec2::new(1.0, 0.5) * size;
        let p3 = c + Vec2::new(-1.0, 0.5) * size;
        (size, [p1, p2, p3])
    }
}

impl TargetGenerator for Triangle {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let (size, [p1, p2, p3]) = Self::geometry(ctx.width, ctx.height);
        let thickness = size * 0.1;
        let ranges = segment_ranges(particles.len(), &[1.0 / 3.0; 3]);

        fill_segment(particles, ranges[0].clone(), p1, p2, thickness, ctx.rng);
        fill_segment(particles, ranges[1].clone(), p2, p3, thickness, ctx.rng);
        fill_segment(particles, ranges[2].clone(), p3, p1, thickness, ctx.rng);

        for p in particles {
            p.color = Rgba::AMBER_500;
        }
    }
}

/// Two crossed diagonals that glitch with the chaos factor.
pub struct CrossedLines;

impl CrossedLines {
    pub fn geometry(width: f32, height: f32) -> (f32, [(Vec2, Vec2); 2]) {
        let c = Vec2::new(width, height) * 0.5;
        let size = width.min(height) * 0.4;
        let down = (c + Vec2::new(-size, -size), c + Vec2::new(size, size));
        let up = (c + Vec2::new(size, -size), c + Vec2::new(-size, size));
        (size, [down, up])
    }
}

impl TargetGenerator for CrossedLines {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let (size, lines) = Self::geometry(ctx.width, ctx.height);
        let thickness = size * 0.15;

        for p in particles {
            let (a, b) = lines[p.id % 2];
            let normal = (b - a).normalize_or_zero().perp();
            let t = ctx.rng.random::<f32>();
            let jitter = ctx.centered_random() * thickness;
            p.target = a.lerp(b, t) + normal * jitter;
            p.group = Some((p.id % 2) as u8);
            p.color = Rgba::RED_500;
        }
    }

    /// Occasional displacement kicks; rate and amplitude scale with chaos.
    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let chaos = ctx.config.chaos_factor;
        if chaos <= 0.0 {
            return;
        }
        for p in particles {
            if ctx.rng.random::<f32>() < chaos * 0.02 {
                let kick = Vec2::new(ctx.centered_random(), ctx.centered_random());
                p.pos += kick * 16.0 * chaos;
            }
        }
    }
}
