//! Generators that reinterpret the same population per live [`Status`].
//!
//! Each of these recomputes its layout every frame from the current status
//! and clock, so a status change mid-animation takes effect on the next
//! frame without a reassign. Per-particle variety comes from
//! [`Particle::noise`] so the layout is stable between frames.

use std::f32::consts::TAU;

use glam::Vec2;

use super::{GenContext, TargetGenerator, disk_point, wrap_target_x};
use crate::{color::Rgba, particle::Particle, types::Status};

/// Loose ring at rest, a beam flowing right while active, a shockwave on
/// success, and a scatter toward the edges on error.
pub struct CommandTunnel;

impl CommandTunnel {
    const BEAM_SPEED: f32 = 160.0;

    fn place(particles: &mut [Particle], ctx: &GenContext<'_>, continuous: bool) {
        let c = ctx.center();
        let m = ctx.min_dim();
        let t = ctx.time;
        let width = ctx.width.max(1.0);

        for p in particles {
            let angle = p.noise(0.1) * TAU;
            match ctx.status {
                Status::Idle => {
                    let r = m * 0.3 + (p.noise(0.2) - 0.5) * m * 0.1;
                    p.target = c + Vec2::from_angle(angle + t * 0.2) * r;
                    p.color = ctx.config.primary_color;
                    p.alpha = 0.6;
                }
                Status::Active => {
                    let x = (p.noise(0.3) * width + t * Self::BEAM_SPEED).rem_euclid(width);
                    if continuous {
                        wrap_target_x(p, x, width);
                    } else {
                        p.target.x = x;
                    }
                    p.target.y = c.y + (p.noise(0.4) - 0.5) * m * 0.08;
                    p.color = ctx.config.accent_color;
                    p.alpha = 1.0;
                }
                Status::Success => {
                    let phase = (t * 0.8 + p.noise(0.5) * 0.15).fract();
                    p.target = c + Vec2::from_angle(angle) * phase * m * 0.45;
                    p.color = Rgba::EMERALD_500;
                    p.alpha = 1.0 - phase * 0.7;
                }
                Status::Error => {
                    let half = Vec2::new(ctx.width, ctx.height) * 0.5 - Vec2::splat(10.0);
                    let dir = Vec2::from_angle(angle);
                    // Scale the direction until it hits the inset canvas border.
                    let reach = (half.x / dir.x.abs().max(1e-3)).min(half.y / dir.y.abs().max(1e-3));
                    let glitch = (t * 13.0 + p.id as f32).sin() * ctx.config.chaos_factor * 6.0;
                    p.target = c + dir * (reach - glitch.abs()).max(0.0);
                    p.color = Rgba::RED_500;
                    p.alpha = 0.9;
                }
            }
        }
    }
}

impl TargetGenerator for CommandTunnel {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        Self::place(particles, ctx, false);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        Self::place(particles, ctx, true);
    }
}

/// A grid of cells that fills with progress while active.
pub struct FirmwareUpdate;

impl FirmwareUpdate {
    const PROGRESS_RATE: f32 = 0.15;

    /// Columns and rows for `count` cells in a `width x height` area.
    fn grid(count: usize, width: f32, height: f32) -> (usize, usize) {
        let aspect = (width / height.max(1.0)).max(0.1);
        let cols = ((count as f32 * aspect).sqrt().ceil() as usize).max(1);
        (cols, count.div_ceil(cols).max(1))
    }

    fn place(particles: &mut [Particle], ctx: &GenContext<'_>) {
        let size = Vec2::new(ctx.width * 0.6, ctx.height * 0.4);
        let origin = ctx.center() - size * 0.5;
        let (cols, rows) = Self::grid(particles.len(), size.x, size.y);
        let progress = (ctx.time * Self::PROGRESS_RATE).fract();
        let muted = ctx.config.muted_color();
        let chaos = ctx.config.chaos_factor;

        for p in particles {
            let (row, col) = (p.id / cols, p.id % cols);
            let cell = Vec2::new(
                (col as f32 + 0.5) / cols as f32,
                (row as f32 + 0.5) / rows as f32,
            );
            p.target = origin + cell * size;
            p.group = Some(u8::from(cell.x < progress));

            match ctx.status {
                Status::Idle => {
                    p.color = muted;
                    p.alpha = 0.5;
                }
                Status::Active => {
                    let lit = cell.x < progress;
                    p.color = if lit { ctx.config.accent_color } else { muted };
                    p.alpha = if lit { 1.0 } else { 0.35 };
                }
                Status::Success => {
                    p.color = Rgba::EMERALD_500;
                    p.alpha = 1.0;
                }
                Status::Error => {
                    let failed = (1.0 / 3.0..2.0 / 3.0).contains(&cell.y);
                    if failed {
                        p.target.x += (ctx.time * 20.0 + p.id as f32).sin() * chaos * 4.0;
                        p.color = Rgba::RED_500;
                        p.alpha = 1.0;
                    } else {
                        p.color = muted;
                        p.alpha = 0.35;
                    }
                }
            }
        }
    }
}

impl TargetGenerator for FirmwareUpdate {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        Self::place(particles, ctx);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        Self::place(particles, ctx);
    }
}

/// Two clusters, one per `id % 2`, whose distance follows the status.
pub struct Pairing;

impl Pairing {
    /// Horizontal offset of each cluster from the center.
    fn separation(ctx: &GenContext<'_>, cluster_radius: f32) -> f32 {
        let rest = ctx.width * 0.25;
        match ctx.status {
            Status::Idle => rest,
            Status::Active => rest * (0.55 + 0.45 * (ctx.time * 1.5).cos()),
            Status::Success => 0.0,
            Status::Error => (ctx.width * 0.5 - cluster_radius - 10.0).max(0.0),
        }
    }

    fn place(particles: &mut [Particle], ctx: &GenContext<'_>) {
        let c = ctx.center();
        let radius = ctx.min_dim() * 0.12;
        let sep = Self::separation(ctx, radius);
        let spread = if ctx.status == Status::Success { radius * 1.3 } else { radius };
        let shake = if ctx.status == Status::Error {
            (ctx.time * 25.0).sin() * 3.0
        } else {
            0.0
        };

        for p in particles {
            let side = (p.id % 2) as u8;
            let sign = if side == 0 { -1.0 } else { 1.0 };
            let offset = disk_point(p.noise(0.1), p.noise(0.2), spread);
            p.target = c + Vec2::new(sign * (sep + shake), 0.0) + offset;
            p.group = Some(side);
            p.color = match ctx.status {
                Status::Success => Rgba::EMERALD_500,
                Status::Error => Rgba::RED_500,
                _ if side == 0 => ctx.config.primary_color,
                _ => ctx.config.accent_color,
            };
        }
    }
}

impl TargetGenerator for Pairing {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        Self::place(particles, ctx);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        Self::place(particles, ctx);
    }
}

/// Radar disk with a rotating sweep that lights the particles behind it.
pub struct SecuritySweep;

impl SecuritySweep {
    /// Angular width of the afterglow behind the sweep line.
    const TRAIL: f32 = TAU * 0.25;

    pub fn sweep_angle(time: f32, status: Status) -> f32 {
        let rate = if status == Status::Active { 2.0 } else { 1.0 };
        (time * rate).rem_euclid(TAU)
    }

    /// Glow in `[0, 1]` for a particle at `angle`; 1 right on the sweep line.
    pub fn glow(angle: f32, sweep: f32) -> f32 {
        let lag = (sweep - angle).rem_euclid(TAU);
        (1.0 - lag / Self::TRAIL).max(0.0)
    }
}

impl TargetGenerator for SecuritySweep {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let c = ctx.center();
        let radius = ctx.min_dim() * 0.35;
        for p in particles.iter_mut() {
            p.target = c + disk_point(p.noise(0.1), p.noise(0.2), radius);
        }
        self.animate(particles, ctx);
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let c = ctx.center();
        let sweep = Self::sweep_angle(ctx.time, ctx.status);
        let lit = match ctx.status {
            Status::Success => Rgba::EMERALD_500,
            Status::Error => Rgba::RED_500,
            _ => ctx.config.accent_color,
        };
        let muted = ctx.config.muted_color();

        for p in particles {
            let angle = (p.target - c).to_angle();
            let glow = Self::glow(angle, sweep);
            p.color = muted.mix(lit, glow);
            p.alpha = 0.25 + 0.75 * glow;
            p.scale = 1.0 + 0.6 * glow;
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
        let mut rng = StdRng::seed_from_u64(31);
        let mut ps = testing::particles(count);
        let mut ctx = testing::ctx(&config, None, &mut rng);
        ctx.status = status;
        ctx.time = time;
        generator.assign(&mut ps, &mut ctx);
        generator.animate(&mut ps, &mut ctx);
        ps
    }

    fn spread_y(ps: &[Particle]) -> f32 {
        let (lo, hi) = ps
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.target.y), hi.max(p.target.y)));
        hi - lo
    }

    #[test]
    fn tunnel_beam_is_tight_and_flows_right() {
        let beam = run(&CommandTunnel, Status::Active, 0.0, 200);
        let ring = run(&CommandTunnel, Status::Idle, 0.0, 200);
        assert!(spread_y(&beam) < spread_y(&ring) * 0.3);

        let later = run(&CommandTunnel, Status::Active, 0.1, 200);
        // Most particles moved right by 16px; the rest wrapped around.
        let moved_right = beam
            .iter()
            .zip(&later)
            .filter(|(a, b)| (b.target.x - a.target.x - 16.0).abs() < 1e-2)
            .count();
        assert!(moved_right > 180, "{moved_right}");
    }

    #[test]
    fn tunnel_error_pushes_particles_to_the_edges() {
        let ps = run(&CommandTunnel, Status::Error, 1.0, 200);
        let c = Vec2::new(300.0, 200.0);
        assert!(ps.iter().all(|p| p.target.distance(c) > 150.0));
        assert!(ps.iter().all(|p| {
            (0.0..=600.0).contains(&p.target.x) && (0.0..=400.0).contains(&p.target.y)
        }));
        assert!(ps.iter().all(|p| p.color == Rgba::RED_500));
    }

    #[test]
    fn tunnel_success_is_a_shockwave() {
        let ps = run(&CommandTunnel, Status::Success, 0.3, 200);
        let c = Vec2::new(300.0, 200.0);
        assert!(ps.iter().all(|p| p.target.distance(c) <= 400.0 * 0.45 + 1e-3));
        assert!(ps.iter().all(|p| p.color == Rgba::EMERALD_500));
    }

    #[test]
    fn firmware_progress_lights_left_columns_first() {
        // progress = 0.15 * 3.0 = 0.45
        let ps = run(&FirmwareUpdate, Status::Active, 3.0, 400);
        let config = AnimationConfig::default();
        for p in &ps {
            let left = p.target.x < 300.0 - 180.0 + 360.0 * 0.4;
            let right = p.target.x > 300.0 - 180.0 + 360.0 * 0.5;
            if left {
                assert_eq!(p.color, config.accent_color);
            }
            if right {
                assert_eq!(p.color, config.muted_color());
            }
        }
    }

    #[test]
    fn firmware_success_and_error_tint_cells() {
        let ok = run(&FirmwareUpdate, Status::Success, 1.0, 100);
        assert!(ok.iter().all(|p| p.color == Rgba::EMERALD_500));

        let failed = run(&FirmwareUpdate, Status::Error, 1.0, 100);
        let red = failed.iter().filter(|p| p.color == Rgba::RED_500).count();
        assert!(red > 0 && red < 100);
    }

    #[test]
    fn pairing_clusters_merge_on_success() {
        let mean_x = |ps: &[Particle], side: u8| {
            let side: Vec<_> = ps.iter().filter(|p| p.group == Some(side)).collect();
            side.iter().map(|p| p.target.x).sum::<f32>() / side.len() as f32
        };
        let apart = run(&Pairing, Status::Idle, 0.0, 400);
        let merged = run(&Pairing, Status::Success, 0.0, 400);
        let repelled = run(&Pairing, Status::Error, 0.0, 400);

        let gap = |ps: &[Particle]| (mean_x(ps, 1) - mean_x(ps, 0)).abs();
        assert!(gap(&merged) < 15.0);
        assert!(gap(&apart) > 250.0);
        assert!(gap(&repelled) > gap(&apart));
    }

    #[test]
    fn pairing_drifts_while_active() {
        let a = run(&Pairing, Status::Active, 0.0, 100);
        let b = run(&Pairing, Status::Active, 2.0, 100);
        assert!(a.iter().zip(&b).any(|(p, q)| p.target != q.target));
    }

    #[test]
    fn sweep_glow_trails_behind_the_line() {
        assert_eq!(SecuritySweep::glow(1.0, 1.0), 1.0);
        assert!(SecuritySweep::glow(0.8, 1.0) > 0.8);
        // Just ahead of the line is dark.
        assert_eq!(SecuritySweep::glow(1.2, 1.0), 0.0);
        // Across the wrap at 0/TAU.
        assert!(SecuritySweep::glow(TAU - 0.1, 0.1) > 0.8);
    }

    #[test]
    fn sweep_status_changes_tint() {
        let err = run(&SecuritySweep, Status::Error, 1.0, 300);
        let brightest = err
            .iter()
            .max_by(|a, b| a.alpha.total_cmp(&b.alpha))
            .map(|p| p.color);
        // Red has a much lower green channel than the muted zinc.
        assert!(brightest.is_some_and(|c| c.g < 120), "{brightest:?}");
        assert!(err.iter().any(|p| p.alpha < 0.5));
    }
}
