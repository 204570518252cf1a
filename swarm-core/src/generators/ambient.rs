//! Ambient catalog: swarm, voice, processing, mesh and incident visuals.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::{GenContext, TargetGenerator, disk_point};
use crate::{color::Rgba, particle::Particle, physics::PULSE_RATE, types::Status};

/// Keeps a home coordinate inside the current canvas, for free-body modes
/// whose targets only matter if the mode changes back to easing.
fn home_target(p: &Particle, ctx: &GenContext<'_>) -> Vec2 {
    p.base.clamp(Vec2::ZERO, Vec2::new(ctx.width, ctx.height).max(Vec2::ZERO))
}

/// Free wandering over the whole canvas.
pub struct IdleSwarm;

impl TargetGenerator for IdleSwarm {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        for p in particles {
            p.target = home_target(p, ctx);
            p.color = ctx.config.primary_color;
            p.alpha = 0.8;
        }
    }
}

/// A travelling sine along the horizontal axis, loud while active.
pub struct VoiceWaveform;

impl VoiceWaveform {
    /// Peak amplitude as a fraction of `min(width, height)`.
    pub fn amplitude(status: Status) -> f32 {
        match status {
            Status::Idle => 0.05,
            Status::Active => 0.3,
            Status::Success => 0.12,
            Status::Error => 0.2,
        }
    }
}

impl TargetGenerator for VoiceWaveform {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let pad = ctx.width * 0.1;
        let span = ctx.width - pad * 2.0;
        let n = particles.len().max(1) as f32;
        for (i, p) in particles.iter_mut().enumerate() {
            p.target.x = pad + i as f32 / n * span;
        }
        self.animate(particles, ctx);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let mid = ctx.height * 0.5;
        let amp = Self::amplitude(ctx.status) * ctx.min_dim();
        let n = particles.len().max(1) as f32;
        let color = match ctx.status {
            Status::Idle => ctx.config.primary_color,
            Status::Active => ctx.config.accent_color,
            Status::Success => Rgba::EMERALD_500,
            Status::Error => Rgba::RED_500,
        };

        for (i, p) in particles.iter_mut().enumerate() {
            // Taper towards both ends.
            let envelope = (PI * i as f32 / n).sin();
            let wave = (p.target.x * 0.03 + ctx.time * 4.0).sin();
            let thickness = (p.noise(0.2) - 0.5) * 4.0;
            p.target.y = mid + wave * amp * envelope + thickness;
            p.color = color;
        }
    }
}

/// Rotating ring with a bright head running around it.
pub struct ProcessingRing;

impl ProcessingRing {
    const HEAD_TRAIL: f32 = TAU * 0.2;

    pub fn radius(ctx: &GenContext<'_>) -> f32 {
        ctx.min_dim() * 0.3
    }
}

impl TargetGenerator for ProcessingRing {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        self.animate(particles, ctx);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let c = ctx.center();
        let radius = Self::radius(ctx);
        let n = particles.len().max(1) as f32;
        let spin = ctx.time * 0.5;
        let head = (ctx.time * 2.5).rem_euclid(TAU);
        let primary = ctx.config.primary_color;
        let accent = ctx.config.accent_color;

        for (i, p) in particles.iter_mut().enumerate() {
            let slot = i as f32 / n * TAU;
            let r = radius + (p.noise(0.3) - 0.5) * 8.0;
            p.target = c + Vec2::from_angle(slot + spin) * r;

            let lag = (head - slot).rem_euclid(TAU);
            let glow = (1.0 - lag / Self::HEAD_TRAIL).max(0.0);
            p.color = primary.mix(accent, glow);
            p.alpha = 0.3 + 0.7 * glow;
            p.scale = 1.0 + 0.5 * glow;
        }
    }
}

const MESH_NODES: usize = 6;

/// A hub and six devices with traffic shuttling along their links.
pub struct DeviceMesh;

impl DeviceMesh {
    pub const NODES: usize = MESH_NODES;
    pub const LINKS: usize = 12;
    const CLUSTER_SHARE: f32 = 0.6;
    const CLUSTER_RADIUS: f32 = 14.0;
    /// The node flagged when status is `Error`.
    pub const FAULTY_NODE: usize = 1;

    /// Hub followed by the six nodes on a hexagon.
    pub fn clusters(ctx: &GenContext<'_>) -> [Vec2; MESH_NODES + 1] {
        let c = ctx.center();
        let d = ctx.min_dim() * 0.35;
        let mut out = [c; MESH_NODES + 1];
        for (j, slot) in out.iter_mut().skip(1).enumerate() {
            let angle = j as f32 / Self::NODES as f32 * TAU - FRAC_PI_2;
            *slot = c + Vec2::from_angle(angle) * d;
        }
        out
    }

    /// Endpoints of link `j`: six spokes from the hub, then the ring.
    fn link(clusters: &[Vec2; MESH_NODES + 1], j: usize) -> (Vec2, Vec2) {
        let j = j % Self::LINKS;
        if j < Self::NODES {
            (clusters[0], clusters[j + 1])
        } else {
            let a = j - Self::NODES;
            (clusters[a + 1], clusters[(a + 1) % Self::NODES + 1])
        }
    }
}

impl TargetGenerator for DeviceMesh {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let clusters = Self::clusters(ctx);
        let in_clusters = (particles.len() as f32 * Self::CLUSTER_SHARE).floor() as usize;

        for (i, p) in particles.iter_mut().enumerate() {
            if i < in_clusters {
                let k = i % clusters.len();
                let offset = disk_point(p.noise(0.1), p.noise(0.2), Self::CLUSTER_RADIUS);
                p.target = clusters[k] + offset;
                p.group = Some(k as u8);
            } else {
                p.connector = Some(i % Self::LINKS);
            }
        }
        self.animate(particles, ctx);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let clusters = Self::clusters(ctx);
        let link_color = if ctx.status == Status::Active {
            ctx.config.accent_color
        } else {
            ctx.config.muted_color()
        };

        for p in particles {
            if let Some(link) = p.connector {
                let (a, b) = Self::link(&clusters, link);
                let t = ((ctx.time * 0.6 + p.noise(0.4) * TAU).sin() + 1.0) * 0.5;
                p.target = a.lerp(b, t);
                p.color = link_color;
                continue;
            }
            let faulty = ctx.status == Status::Error
                && p.group == Some(Self::FAULTY_NODE as u8 + 1);
            p.color = if faulty {
                Rgba::RED_500
            } else {
                ctx.config.primary_color
            };
        }
    }
}

/// Red free-body swarm whose brightness follows the pulse phase.
pub struct IncidentPulse;

impl IncidentPulse {
    /// Brightness for the pulse phase at `time`.
    pub fn intensity(time: f32) -> f32 {
        (time * PULSE_RATE).sin().max(0.0)
    }
}

impl TargetGenerator for IncidentPulse {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        for p in particles.iter_mut() {
            p.target = home_target(p, ctx);
            p.color = Rgba::RED_500;
        }
        self.animate(particles, ctx);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let pulse = Self::intensity(ctx.time);
        for p in particles {
            p.alpha = 0.4 + 0.6 * pulse;
            p.scale = 1.0 + 0.4 * pulse;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::config::AnimationConfig;
    use rand::{SeedableRng, rngs::StdRng};

    fn run(
        generator: &dyn TargetGenerator,
        status: Status,
        time: f32,
        count: usize,
    ) -> Vec<Particle> {
        let config = AnimationConfig::default();
        let mut rng = StdRng::seed_from_u64(41);
        let mut ps = testing::particles(count);
        let mut ctx = testing::ctx(&config, None, &mut rng);
        ctx.status = status;
        ctx.time = time;
        generator.assign(&mut ps, &mut ctx);
        generator.animate(&mut ps, &mut ctx);
        ps
    }

    fn max_deviation(ps: &[Particle]) -> f32 {
        ps.iter().map(|p| (p.target.y - 200.0).abs()).fold(0.0, f32::max)
    }

    #[test]
    fn idle_swarm_targets_stay_home() {
        let ps = run(&IdleSwarm, Status::Idle, 0.0, 100);
        assert!(ps.iter().all(|p| p.target == p.base));
    }

    #[test]
    fn voice_is_ordered_and_louder_when_active() {
        let quiet = run(&VoiceWaveform, Status::Idle, 0.4, 300);
        let loud = run(&VoiceWaveform, Status::Active, 0.4, 300);
        assert!(quiet.windows(2).all(|w| w[0].target.x < w[1].target.x));
        assert!(max_deviation(&loud) > max_deviation(&quiet) * 3.0);
        assert!(max_deviation(&loud) <= 400.0 * 0.3 + 2.0);
    }

    #[test]
    fn ring_keeps_its_radius_while_spinning() {
        for time in [0.0, 1.3, 9.0] {
            let ps = run(&ProcessingRing, Status::Idle, time, 120);
            let c = Vec2::new(300.0, 200.0);
            assert!(ps.iter().all(|p| (p.target.distance(c) - 120.0).abs() <= 4.0 + 1e-3));
            assert!(ps.iter().any(|p| p.alpha > 0.9));
            assert!(ps.iter().any(|p| p.alpha < 0.4));
        }
    }

    #[test]
    fn mesh_links_cover_spokes_and_ring() {
        let config = AnimationConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let ctx = testing::ctx(&config, None, &mut rng);
        let clusters = DeviceMesh::clusters(&ctx);
        for j in 0..DeviceMesh::LINKS {
            let (a, b) = DeviceMesh::link(&clusters, j);
            assert_ne!(a, b);
            if j < DeviceMesh::NODES {
                assert_eq!(a, clusters[0]);
            } else {
                assert_ne!(a, clusters[0]);
                assert_ne!(b, clusters[0]);
            }
        }
    }

    #[test]
    fn mesh_splits_population_and_flags_faulty_node() {
        let ps = run(&DeviceMesh, Status::Error, 1.0, 200);
        assert_eq!(ps.iter().filter(|p| p.group.is_some()).count(), 120);
        assert_eq!(ps.iter().filter(|p| p.connector.is_some()).count(), 80);

        let faulty = Some(DeviceMesh::FAULTY_NODE as u8 + 1);
        assert!(
            ps.iter()
                .filter(|p| p.group == faulty)
                .all(|p| p.color == Rgba::RED_500)
        );
        assert!(
            ps.iter()
                .filter(|p| p.group == Some(0))
                .all(|p| p.color != Rgba::RED_500)
        );

        let calm = run(&DeviceMesh, Status::Idle, 1.0, 200);
        assert!(calm.iter().all(|p| p.color != Rgba::RED_500));
    }

    #[test]
    fn incident_brightness_follows_pulse() {
        let peak = std::f32::consts::FRAC_PI_2 / PULSE_RATE;
        let bright = run(&IncidentPulse, Status::Idle, peak, 20);
        let dark = run(&IncidentPulse, Status::Idle, peak * 3.0, 20);
        assert!(bright.iter().all(|p| p.alpha > 0.99 && p.color == Rgba::RED_500));
        assert!(dark.iter().all(|p| (p.alpha - 0.4).abs() < 1e-3));
    }
}
