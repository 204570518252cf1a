//! Animation clock and drawing of the particle population.

use crate::{color::Rgba, particle::Particle, surface::Surface};

/// Clock units per 60 Hz frame.
pub const NOMINAL_DT: f32 = 0.015;
/// Clock units per second of real time (`NOMINAL_DT * 60`).
pub const CLOCK_RATE: f32 = NOMINAL_DT * 60.0;
/// Longest real-time step fed to the clock, so a stalled host does not
/// fast-forward every animation.
pub const MAX_FRAME_SECS: f32 = 0.1;

/// How many following particles (by index) each particle may connect to.
pub const EDGE_NEIGHBORS: usize = 2;
pub const EDGE_WIDTH: f32 = 0.5;

/// Animation time, advanced by real time scaled by `base_speed`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    time: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advances by `real_dt` seconds at `speed` and returns the clock delta.
    pub fn advance(&mut self, real_dt: f32, speed: f32) -> f32 {
        let dt = real_dt.clamp(0.0, MAX_FRAME_SECS) * CLOCK_RATE * speed.max(0.0);
        self.time += dt;
        dt
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

/// Alpha of an edge between particles `distance` apart.
pub fn edge_alpha(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    (1.0 - distance / threshold) * 0.5
}

/// Draws one frame of `particles` onto `surface`.
///
/// 1. Clears the surface to transparent.
/// 2. Fills every particle as a disc of `radius * scale` in its colour
///    with its alpha applied.
/// 3. When `threshold > 0`, strokes a line from each particle to each of
///    the next [`EDGE_NEIGHBORS`] particles by index that lies closer than
///    `threshold`, with alpha from [`edge_alpha`].
///
/// ### Parameters
/// - `particles` - The population, in index order.
/// - `threshold` - Connection distance; `0` disables edges.
/// - `edge_color` - Base colour of the connection lines.
/// - `surface` - Drawing target.
///
/// ### Returns
/// The number of edges drawn.
pub fn draw(
    particles: &[Particle],
    threshold: f32,
    edge_color: Rgba,
    surface: &mut dyn Surface,
) -> usize {
    surface.clear(Rgba::TRANSPARENT);

    for p in particles {
        let radius = p.radius * p.scale;
        if p.alpha <= 0.0 || radius <= 0.0 {
            continue;
        }
        surface.fill_circle(p.pos, radius, p.color.with_alpha(p.alpha));
    }

    if threshold <= 0.0 {
        return 0;
    }

    let mut edges = 0;
    for (i, a) in particles.iter().enumerate() {
        for b in particles.iter().skip(i + 1).take(EDGE_NEIGHBORS) {
            let alpha = edge_alpha(a.pos.distance(b.pos), threshold);
            if alpha > 0.0 {
                surface.stroke_line(a.pos, b.pos, EDGE_WIDTH, edge_color.with_alpha(alpha));
                edges += 1;
            }
        }
    }
    edges
}
