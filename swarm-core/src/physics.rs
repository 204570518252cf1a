//! Integration schemes that advance particles one frame.
//!
//! Two strategies coexist and are picked per mode through
//! [`crate::mode::Mode::scheme`]:
//!
//! - [`EasingIntegrator`] — velocity accumulates a fraction of the remaining
//!   distance to `target`, decays by `friction`, and integrates into `pos`.
//!   Used for every mode that forms a shape.
//! - [`FreeBodyIntegrator`] — jitter, periodic radial pulses, damping and
//!   boundary bounces, with no convergence target.
//!
//! Pointer repulsion ([`crate::pointer`]) is applied after either scheme.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::particle::Particle;

/// Gain applied on top of each particle's `ease`.
pub const EASE_GAIN: f32 = 0.1;

/// Per-frame velocity retention under the free-body scheme.
pub const FREE_BODY_DAMPING: f32 = 0.96;
/// Fraction of speed kept after hitting a wall.
pub const RESTITUTION: f32 = 0.8;
/// Largest per-frame jitter kick at `chaos_factor = 1`.
pub const JITTER: f32 = 0.6;
/// Angular frequency of the pulse phase, in clock units.
pub const PULSE_RATE: f32 = 2.2;
/// `sin(time * PULSE_RATE)` above which the pulse fires.
pub const PULSE_THRESHOLD: f32 = 0.95;
/// Outward kick applied per frame while the pulse is firing.
pub const PULSE_IMPULSE: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    Easing,
    FreeBody,
}

impl Scheme {
    pub fn integrator(self) -> &'static dyn Integrator {
        match self {
            Scheme::Easing => &EasingIntegrator,
            Scheme::FreeBody => &FreeBodyIntegrator,
        }
    }
}

/// Per-frame inputs shared by the integrators.
pub struct StepEnv<'a> {
    pub width: f32,
    pub height: f32,
    pub time: f32,
    pub chaos: f32,
    pub rng: &'a mut StdRng,
}

impl StepEnv<'_> {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

pub trait Integrator {
    fn step(&self, particles: &mut [Particle], env: &mut StepEnv<'_>);
}

/// Damped spring towards `target`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EasingIntegrator;

impl EasingIntegrator {
    pub fn step_one(p: &mut Particle) {
        let d = p.target - p.pos;
        p.vel += d * (p.ease * EASE_GAIN);
        p.vel *= p.friction;
        p.pos += p.vel;
    }
}

impl Integrator for EasingIntegrator {
    fn step(&self, particles: &mut [Particle], _env: &mut StepEnv<'_>) {
        for p in particles {
            Self::step_one(p);
        }
    }
}

/// Whether the easing recurrence with these parameters converges without overshoot.
///
/// The error obeys `e[n+1] = (1 + f - f·k)·e[n] - f·e[n-1]` with
/// `k = ease·EASE_GAIN`; both roots are real (and the approach monotone from
/// rest) when `k <= (1 - √f)² / f`.
pub fn is_overdamped(ease: f32, friction: f32) -> bool {
    if !(0.0..1.0).contains(&friction) || friction == 0.0 || ease <= 0.0 {
        return false;
    }
    let k = ease * EASE_GAIN;
    let limit = (1.0 - friction.sqrt()).powi(2) / friction;
    k <= limit
}

/// Jitter, pulses and wall bounces.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeBodyIntegrator;

impl FreeBodyIntegrator {
    pub fn pulse_active(time: f32) -> bool {
        (time * PULSE_RATE).sin() > PULSE_THRESHOLD
    }

    /// Distance from center within which the pulse pushes particles.
    pub fn capture_radius(width: f32, height: f32) -> f32 {
        width.min(height) * 0.3
    }
}

impl Integrator for FreeBodyIntegrator {
    fn step(&self, particles: &mut [Particle], env: &mut StepEnv<'_>) {
        let center = env.center();
        let pulse = Self::pulse_active(env.time);
        let capture = Self::capture_radius(env.width, env.height);
        let kick = JITTER * env.chaos.clamp(0.0, 1.0);

        for p in particles {
            if kick > 0.0 {
                p.vel.x += env.rng.random_range(-1.0..=1.0) * kick;
                p.vel.y += env.rng.random_range(-1.0..=1.0) * kick;
            }

            if pulse {
                let out = p.pos - center;
                let dist = out.length();
                if dist < capture {
                    let dir = out
                        .try_normalize()
                        .unwrap_or_else(|| Vec2::from_angle(p.noise(0.7) * TAU));
                    p.vel += dir * PULSE_IMPULSE * (1.0 - dist / capture);
                }
            }

            p.pos += p.vel;
            p.vel *= FREE_BODY_DAMPING;

            bounce(&mut p.pos.x, &mut p.vel.x, p.radius, env.width);
            bounce(&mut p.pos.y, &mut p.vel.y, p.radius, env.height);
        }
    }
}

/// Reflects one axis off `[radius, extent - radius]`.
fn bounce(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) {
    let lo = radius.min(extent * 0.5);
    let hi = (extent - radius).max(lo);
    if *pos < lo {
        *pos = lo;
        *vel = -*vel * RESTITUTION;
    } else if *pos > hi {
        *pos = hi;
        *vel = -*vel * RESTITUTION;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::particle::{DEFAULT_EASE, DEFAULT_FRICTION};
    use rand::SeedableRng;

    fn particle_at(pos: Vec2, target: Vec2) -> Particle {
        let mut p = Particle::new(0, pos, 2.0, Rgba::ZINC_900);
        p.target = target;
        p
    }

    #[test]
    fn default_parameters_are_overdamped() {
        assert!(is_overdamped(DEFAULT_EASE, DEFAULT_FRICTION));
        assert!(!is_overdamped(1.0, 0.95));
        assert!(!is_overdamped(0.1, 1.0));
    }

    #[test]
    fn easing_converges_monotonically_without_overshoot() {
        for (ease, friction) in [(DEFAULT_EASE, DEFAULT_FRICTION), (0.1, 0.7), (0.3, 0.5)] {
            assert!(is_overdamped(ease, friction), "({ease}, {friction})");

            let target = Vec2::new(300.0, 200.0);
            let mut p = particle_at(Vec2::new(0.0, 0.0), target);
            p.ease = ease;
            p.friction = friction;

            let mut prev = (target - p.pos).length();
            for step in 0..400 {
                EasingIntegrator::step_one(&mut p);
                let err = (target - p.pos).length();
                assert!(
                    err <= prev + 1e-3,
                    "error grew at step {step}: {prev} -> {err}"
                );
                // Never passes the target along the approach direction.
                assert!(p.pos.x <= target.x + 1e-3 && p.pos.y <= target.y + 1e-3);
                prev = err;
            }
            assert!(prev < 1.0, "did not converge: {prev}");
        }
    }

    #[test]
    fn easing_keeps_velocity_across_target_changes() {
        let mut p = particle_at(Vec2::ZERO, Vec2::new(100.0, 0.0));
        for _ in 0..5 {
            EasingIntegrator::step_one(&mut p);
        }
        let v = p.vel;
        p.target = Vec2::new(-100.0, 0.0);
        assert_eq!(p.vel, v);
        EasingIntegrator::step_one(&mut p);
        assert!(p.vel.x < v.x);
    }

    #[test]
    fn free_body_stays_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut particles: Vec<Particle> = (0..200)
            .map(|i| {
                let mut p = particle_at(Vec2::new(200.0, 150.0), Vec2::ZERO);
                p.id = i;
                p.vel = Vec2::new((i as f32 - 100.0) * 0.3, (i % 7) as f32 * 2.0);
                p
            })
            .collect();

        for frame in 0..600 {
            let mut env = StepEnv {
                width: 400.0,
                height: 300.0,
                time: frame as f32 * 0.015,
                chaos: 1.0,
                rng: &mut rng,
            };
            FreeBodyIntegrator.step(&mut particles, &mut env);
        }

        for p in &particles {
            assert!(p.pos.x >= p.radius && p.pos.x <= 400.0 - p.radius);
            assert!(p.pos.y >= p.radius && p.pos.y <= 300.0 - p.radius);
        }
    }

    #[test]
    fn bounce_flips_and_damps_velocity() {
        let mut pos = -3.0;
        let mut vel = -5.0;
        bounce(&mut pos, &mut vel, 2.0, 100.0);
        assert_eq!(pos, 2.0);
        assert_eq!(vel, 5.0 * RESTITUTION);

        let mut pos = 120.0;
        let mut vel = 4.0;
        bounce(&mut pos, &mut vel, 2.0, 100.0);
        assert_eq!(pos, 98.0);
        assert_eq!(vel, -4.0 * RESTITUTION);
    }

    #[test]
    fn pulse_pushes_particles_near_center_outward() {
        let mut rng = StdRng::seed_from_u64(10);
        // First time after 0 where sin(t * PULSE_RATE) peaks.
        let t = std::f32::consts::FRAC_PI_2 / PULSE_RATE;
        assert!(FreeBodyIntegrator::pulse_active(t));

        let mut near = vec![particle_at(Vec2::new(210.0, 150.0), Vec2::ZERO)];
        let mut env = StepEnv {
            width: 400.0,
            height: 300.0,
            time: t,
            chaos: 0.0,
            rng: &mut rng,
        };
        FreeBodyIntegrator.step(&mut near, &mut env);
        assert!(near[0].vel.x > 0.0);
        assert!(near[0].pos.x > 210.0);
    }

    #[test]
    fn no_pulse_and_no_chaos_means_pure_damping() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut ps = vec![particle_at(Vec2::new(100.0, 100.0), Vec2::ZERO)];
        ps[0].vel = Vec2::new(1.0, 0.0);
        let mut env = StepEnv {
            width: 400.0,
            height: 300.0,
            time: 0.0,
            chaos: 0.0,
            rng: &mut rng,
        };
        FreeBodyIntegrator.step(&mut ps, &mut env);
        assert_eq!(ps[0].pos, Vec2::new(101.0, 100.0));
        assert_eq!(ps[0].vel, Vec2::new(FREE_BODY_DAMPING, 0.0));
    }
}
