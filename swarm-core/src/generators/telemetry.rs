//! Three telemetry lanes sharing one population: a waveform, a packet
//! stream and a blinking status grid.

use std::f32::consts::TAU;

use super::{GenContext, TargetGenerator, wrap_target_x};
use crate::particle::Particle;

pub const LANES: usize = 3;
/// Packet drift in pixels per frame at `base_speed == 1`.
pub const PACKET_SPEED: f32 = 2.0;
/// Particles per packet.
pub const PACKET_SIZE: usize = 6;

const PADDING: f32 = 24.0;
const PACKET_SPACING: f32 = 48.0;

const WAVEFORM: u8 = 0;
const PACKETS: u8 = 1;
const GRID: u8 = 2;

pub struct Telemetry;

/// Vertical band of one lane.
struct Lane {
    top: f32,
    height: f32,
}

impl Lane {
    fn new(lane: u8, canvas_height: f32) -> Self {
        let height = canvas_height / LANES as f32;
        Self {
            top: height * lane as f32,
            height,
        }
    }

    fn middle(&self) -> f32 {
        self.top + self.height * 0.5
    }
}

/// Number of particles with `id % LANES == lane` among `count`.
fn lane_len(count: usize, lane: u8) -> usize {
    (count + LANES - 1 - lane as usize) / LANES
}

fn waveform_y(x: f32, time: f32, lane: &Lane) -> f32 {
    lane.middle() + (x * 0.02 + time * 3.0).sin() * lane.height * 0.3
}

fn grid_cols(len: usize, span_x: f32, band: f32) -> usize {
    let aspect = (span_x / band.max(1.0)).max(1.0);
    ((len as f32 * aspect).sqrt().ceil() as usize).max(1)
}

impl TargetGenerator for Telemetry {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let pad = PADDING.min(ctx.width * 0.25);
        let span_x = ctx.width - pad * 2.0;
        let n = particles.len();

        let wave_len = lane_len(n, WAVEFORM).max(1) as f32;
        let grid_len = lane_len(n, GRID);
        let grid_band = Lane::new(GRID, ctx.height);
        let cols = grid_cols(grid_len, span_x, grid_band.height);
        let rows = grid_len.div_ceil(cols).max(1);

        for p in particles {
            let lane = (p.id % LANES) as u8;
            let rank = p.id / LANES;
            let band = Lane::new(lane, ctx.height);
            p.group = Some(lane);

            match lane {
                WAVEFORM => {
                    let x = pad + rank as f32 / wave_len * span_x;
                    p.target.x = x;
                    p.target.y = waveform_y(x, ctx.time, &band);
                    p.color = ctx.config.accent_color;
                }
                PACKETS => {
                    let packet = rank / PACKET_SIZE;
                    let slot = rank % PACKET_SIZE;
                    let head = (packet as f32 * PACKET_SPACING).rem_euclid(ctx.width.max(1.0));
                    p.target.x = head + (slot % 3) as f32 * 4.0;
                    p.target.y = band.middle() + ((slot / 3) as f32 - 0.5) * 4.0;
                    p.color = ctx.config.primary_color;
                }
                _ => {
                    let (row, col) = (rank / cols, rank % cols);
                    p.target.x = pad + (col as f32 + 0.5) / cols as f32 * span_x;
                    p.target.y = band.top + (row as f32 + 0.5) / rows as f32 * band.height;
                    p.color = ctx.config.muted_color();
                }
            }
        }
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let step = PACKET_SPEED * ctx.config.base_speed;
        let width = ctx.width.max(1.0);

        for p in particles {
            match p.group {
                Some(WAVEFORM) => {
                    let band = Lane::new(WAVEFORM, ctx.height);
                    p.target.y = waveform_y(p.target.x, ctx.time, &band);
                }
                Some(PACKETS) => {
                    // Packets leave on the left and come back in on the right.
                    let x = (p.target.x - step).rem_euclid(width);
                    wrap_target_x(p, x, width);
                }
                Some(GRID) => {
                    let rate = 2.0 + p.noise(0.3) * 4.0;
                    let on = (ctx.time * rate + p.noise(0.9) * TAU).sin() > 0.0;
                    p.alpha = if on { 1.0 } else { 0.25 };
                }
                _ => {}
            }
        }
    }
}
