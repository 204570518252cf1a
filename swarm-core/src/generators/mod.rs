//! Target generators: one per [`Mode`].
//!
//! A generator places the swarm. [`TargetGenerator::assign`] runs whenever
//! mode, status, payload or canvas size changes and writes each particle's
//! `target`, `color`, `group` and `connector`. [`TargetGenerator::animate`]
//! runs every frame for generators whose targets or looks depend on time
//! or on the live status.
//!
//! Mode to generator is a table lookup ([`generator_for`]); each generator
//! is a unit struct that can be tested on its own.

mod ambient;
mod graph;
mod scan;
mod shapes;
mod status;
mod telemetry;

use std::ops::Range;

use glam::Vec2;
use rand::{Rng, rngs::StdRng};

use crate::{
    config::AnimationConfig, graph::GraphPayload, mode::Mode, particle::Particle, types::Status,
};

pub use ambient::{DeviceMesh, IdleSwarm, IncidentPulse, ProcessingRing, VoiceWaveform};
pub use graph::RelationshipGraph;
pub use scan::{RESTING_ALPHA, SCAN_BAND, SCAN_SPEED, ScanGrid, wave_intensity, wave_position};
pub use shapes::{Checkmark, CrossedLines, Sphere, Triangle};
pub use status::{CommandTunnel, FirmwareUpdate, Pairing, SecuritySweep};
pub use telemetry::{LANES, PACKET_SPEED, Telemetry};

/// Everything a generator may read while placing particles.
pub struct GenContext<'a> {
    pub width: f32,
    pub height: f32,
    /// Animation clock, in clock units.
    pub time: f32,
    pub status: Status,
    pub config: &'a AnimationConfig,
    pub payload: Option<&'a GraphPayload>,
    pub rng: &'a mut StdRng,
}

impl GenContext<'_> {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Uniform random value in `[-0.5, 0.5)`.
    pub fn centered_random(&mut self) -> f32 {
        self.rng.random::<f32>() - 0.5
    }
}

pub trait TargetGenerator: Sync {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>);

    fn animate(&self, _particles: &mut [Particle], _ctx: &mut GenContext<'_>) {}
}

pub fn generator_for(mode: Mode) -> &'static dyn TargetGenerator {
    match mode {
        Mode::Loading => &Sphere,
        Mode::Success => &Checkmark,
        Mode::Warning => &Triangle,
        Mode::Error => &CrossedLines,
        Mode::Empty => &ScanGrid,
        Mode::RelationshipGraph => &RelationshipGraph,
        Mode::IdleSwarm => &IdleSwarm,
        Mode::VoiceWaveform => &VoiceWaveform,
        Mode::ProcessingRing => &ProcessingRing,
        Mode::DeviceMesh => &DeviceMesh,
        Mode::Telemetry => &Telemetry,
        Mode::CommandTunnel => &CommandTunnel,
        Mode::FirmwareUpdate => &FirmwareUpdate,
        Mode::IncidentPulse => &IncidentPulse,
        Mode::Pairing => &Pairing,
        Mode::SecuritySweep => &SecuritySweep,
    }
}

/// Clears per-generator roles and runs the mode's `assign`.
pub fn assign_targets(mode: Mode, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
    for p in particles.iter_mut() {
        p.reset_role();
    }
    generator_for(mode).assign(particles, ctx);
}

/// Uniform point in a disk of `radius` around the origin.
///
/// Uses `sqrt(u)` for the radius so that area, not distance, is uniform.
pub fn sample_disk(rng: &mut impl Rng, radius: f32) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    let r = rng.random::<f32>().sqrt() * radius;
    Vec2::from_angle(angle) * r
}

/// Same as [`sample_disk`] but driven by two fixed values in `[0, 1)`.
pub fn disk_point(u: f32, v: f32, radius: f32) -> Vec2 {
    Vec2::from_angle(v * std::f32::consts::TAU) * (u.sqrt() * radius)
}

/// Splits `count` indices into consecutive segments.
///
/// Every segment but the last gets `floor(count * ratio)`; the last one
/// takes whatever is left, so the ranges always cover `0..count` exactly.
pub fn segment_ranges(count: usize, ratios: &[f32]) -> Vec<Range<usize>> {
    let Some((_, head)) = ratios.split_last() else {
        return Vec::new();
    };

    let mut ranges = Vec::with_capacity(ratios.len());
    let mut start = 0;
    for ratio in head {
        let len = ((count as f32 * ratio).floor() as usize).min(count - start);
        ranges.push(start..start + len);
        start += len;
    }
    ranges.push(start..count);
    ranges
}

/// Lays the particles of `range` along `a -> b` with a perpendicular
/// random offset of at most `thickness / 2`.
pub fn fill_segment(
    particles: &mut [Particle],
    range: Range<usize>,
    a: Vec2,
    b: Vec2,
    thickness: f32,
    rng: &mut impl Rng,
) {
    let normal = (b - a).try_normalize().map(|d| d.perp()).unwrap_or(Vec2::Y);
    let len = range.len().max(1) as f32;

    for (k, p) in particles[range].iter_mut().enumerate() {
        let t = k as f32 / len;
        let jitter = (rng.random::<f32>() - 0.5) * thickness;
        p.target = a.lerp(b, t) + normal * jitter;
    }
}

/// Moves a target horizontally; when the new value wrapped around the
/// canvas, the particle jumps with it instead of easing across the stage.
pub(crate) fn wrap_target_x(p: &mut Particle, x: f32, span: f32) {
    if (x - p.target.x).abs() > span * 0.5 {
        p.pos.x += x - p.target.x;
    }
    p.target.x = x;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::{color::Rgba, particle::ParticleStore};
    use rand::SeedableRng;

    pub fn particles(count: usize) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(0xD07);
        let mut store = ParticleStore::new();
        store.reseed(600.0, 400.0, count, 2.0, Rgba::ZINC_900, &mut rng);
        store.particles
    }

    pub fn ctx<'a>(
        config: &'a AnimationConfig,
        payload: Option<&'a GraphPayload>,
        rng: &'a mut StdRng,
    ) -> GenContext<'a> {
        GenContext {
            width: 600.0,
            height: 400.0,
            time: 0.0,
            status: Status::Idle,
            config,
            payload,
            rng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn disk_sampler_is_area_uniform_and_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let radius = 50.0;
        let samples: Vec<f32> = (0..10_000)
            .map(|_| sample_disk(&mut rng, radius).length())
            .collect();

        assert!(samples.iter().all(|&r| r <= radius + 1e-4));

        // Area-uniform: only a quarter of the points fall inside r/2.
        // A naive `random() * R` would put about half of them there.
        let inner = samples.iter().filter(|&&r| r < radius * 0.5).count() as f32 / 10_000.0;
        assert!((0.22..0.28).contains(&inner), "inner fraction {inner}");

        // Mean radius is 2R/3 for area-uniform sampling, R/2 for the naive one.
        let mean = samples.iter().sum::<f32>() / 10_000.0;
        assert!((mean / radius - 2.0 / 3.0).abs() < 0.02, "mean {mean}");
    }

    #[test]
    fn disk_point_stays_inside() {
        for i in 0..100 {
            let u = i as f32 / 100.0;
            assert!(disk_point(u, 1.0 - u, 10.0).length() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn segment_ranges_cover_every_index() {
        for count in [0usize, 1, 2, 10, 101, 799, 800] {
            for ratios in [&[0.35, 0.65][..], &[1.0 / 3.0; 3][..], &[0.5, 0.3, 0.2][..]] {
                let ranges = segment_ranges(count, ratios);
                assert_eq!(ranges.len(), ratios.len());
                assert_eq!(ranges.first().map(|r| r.start), Some(0));
                assert_eq!(ranges.last().map(|r| r.end), Some(count));
                for pair in ranges.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
                assert_eq!(ranges.iter().map(|r| r.len()).sum::<usize>(), count);
            }
        }
    }

    #[test]
    fn segment_ranges_last_absorbs_remainder() {
        let ranges = segment_ranges(10, &[1.0 / 3.0; 3]);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn every_mode_handles_tiny_and_empty_populations() {
        let config = AnimationConfig::default();
        let payload = crate::graph::GraphPayload::sample();
        for mode in Mode::ALL {
            for count in [0usize, 1, 2, 5] {
                let mut ps = testing::particles(count);
                let mut rng = StdRng::seed_from_u64(1);
                let mut ctx = testing::ctx(&config, Some(&payload), &mut rng);
                assign_targets(mode, &mut ps, &mut ctx);
                ctx.time = 3.7;
                generator_for(mode).animate(&mut ps, &mut ctx);
                assert!(
                    ps.iter().all(|p| p.target.is_finite() && p.pos.is_finite()),
                    "{mode:?} with {count} particles"
                );
            }
        }
    }

    #[test]
    fn every_mode_places_targets_near_the_canvas() {
        let config = AnimationConfig::default();
        let payload = crate::graph::GraphPayload::sample();
        for mode in Mode::ALL {
            for status in Status::ALL {
                let mut ps = testing::particles(300);
                let mut rng = StdRng::seed_from_u64(2);
                let mut ctx = testing::ctx(&config, Some(&payload), &mut rng);
                ctx.status = status;
                assign_targets(mode, &mut ps, &mut ctx);
                for frame in 0..30 {
                    ctx.time = frame as f32 * 0.2;
                    generator_for(mode).animate(&mut ps, &mut ctx);
                }
                for p in &ps {
                    assert!(
                        (-60.0..=660.0).contains(&p.target.x)
                            && (-60.0..=460.0).contains(&p.target.y),
                        "{mode:?}/{status:?} target {:?}",
                        p.target
                    );
                }
            }
        }
    }
}
