//! Scanning grid with a travelling highlight.

use super::{GenContext, TargetGenerator};
use crate::particle::Particle;

/// Wave front speed, in pixels per clock unit.
pub const SCAN_SPEED: f32 = 300.0;
/// Width of the off-screen run-up; the front starts at `-SCAN_BAND / 2`.
/// Also the glow falloff distance. A 120 px band lights only a sliver of a
/// dense grid; 200 px keeps the highlight readable around the front.
pub const SCAN_BAND: f32 = 200.0;
/// Alpha of dots outside the highlight.
pub const RESTING_ALPHA: f32 = 0.45;

const PADDING: f32 = 20.0;

/// Horizontal position of the scan front at `time`.
pub fn wave_position(time: f32, width: f32) -> f32 {
    (time * SCAN_SPEED).rem_euclid(width + SCAN_BAND) - SCAN_BAND * 0.5
}

/// Highlight strength in `[0, 1]` for a particle at horizontal distance `d` from the front.
pub fn wave_intensity(d: f32) -> f32 {
    (1.0 - d.abs() / SCAN_BAND).max(0.0)
}

pub struct ScanGrid;

impl TargetGenerator for ScanGrid {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let pad_x = PADDING.min(ctx.width * 0.5);
        let pad_y = PADDING.min(ctx.height * 0.5);
        let span_x = ctx.width - pad_x * 2.0;
        let span_y = ctx.height - pad_y * 2.0;

        for p in particles {
            p.target.x = pad_x + (ctx.centered_random() + 0.5) * span_x;
            p.target.y = pad_y + (ctx.centered_random() + 0.5) * span_y;
            p.color = ctx.config.muted_color();
            p.alpha = RESTING_ALPHA;
        }
    }

    /// Raises alpha and radius around the front without moving targets.
    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let front = wave_position(ctx.time, ctx.width);
        let muted = ctx.config.muted_color();
        let accent = ctx.config.accent_color;

        for p in particles {
            let intensity = wave_intensity(p.target.x - front);
            p.color = muted.mix(accent, (intensity * 2.0).min(1.0));
            p.alpha = RESTING_ALPHA + (1.0 - RESTING_ALPHA) * intensity;
            p.scale = 1.0 + 0.8 * intensity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::config::AnimationConfig;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn wave_starts_off_screen() {
        assert_eq!(wave_position(0.0, 600.0), -100.0);
    }

    #[test]
    fn wave_wraps_after_crossing() {
        // 300 * 2.6 = 780 -> front at 680, past the right edge.
        assert!((wave_position(2.6, 600.0) - 680.0).abs() < 1e-3);
        // 300 * 2.7 = 810 wraps to 10 -> front at -90.
        assert!((wave_position(2.7, 600.0) + 90.0).abs() < 1e-2);
    }

    #[test]
    fn scan_targets_stay_in_padded_rect() {
        let config = AnimationConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut ps = testing::particles(400);
        let mut ctx = testing::ctx(&config, None, &mut rng);
        ScanGrid.assign(&mut ps, &mut ctx);
        assert!(ps.iter().all(|p| {
            (20.0..=580.0).contains(&p.target.x) && (20.0..=380.0).contains(&p.target.y)
        }));
    }

    #[test]
    fn particles_near_front_are_highlighted() {
        let config = AnimationConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut ps = testing::particles(2000);
        let mut ctx = testing::ctx(&config, None, &mut rng);
        ScanGrid.assign(&mut ps, &mut ctx);
        let targets: Vec<_> = ps.iter().map(|p| p.target).collect();

        // (1.0 * 300) mod (600 + 200) - 100: the front sits at x = 200.
        ctx.time = 1.0;
        ScanGrid.animate(&mut ps, &mut ctx);

        let near: Vec<_> = ps
            .iter()
            .filter(|p| (p.target.x - 300.0).abs() < 80.0)
            .collect();
        assert!(!near.is_empty());
        for p in near {
            assert!(p.alpha > RESTING_ALPHA, "alpha {}", p.alpha);
            assert!(p.scale > 1.0, "scale {}", p.scale);
        }

        let far = ps.iter().filter(|p| p.target.x > 500.0);
        for p in far {
            assert_eq!(p.alpha, RESTING_ALPHA);
            assert_eq!(p.scale, 1.0);
        }

        // The highlight never moves targets.
        assert!(ps.iter().zip(targets).all(|(p, t)| p.target == t));
    }
}
