//! Relationship-graph layout: a center cluster, one satellite cluster per
//! neighbour, and connector particles along the edges between them.

use rand::Rng;

use super::{GenContext, Sphere, TargetGenerator, sample_disk};
use crate::{
    color::Rgba,
    graph::{CENTER_RADIUS, GraphLayout, SATELLITE_RADIUS},
    particle::Particle,
};

/// Share of the population in the center cluster.
const CENTER_SHARE: f32 = 0.5;
/// Share of the population split across all neighbour clusters.
const SATELLITE_SHARE: f32 = 0.3;

/// Center entity, one cluster per neighbour, and connector particles that
/// shuttle along the center-neighbour edges.
pub struct RelationshipGraph;

/// How many particles go to the center cluster and to each neighbour.
fn split(count: usize, neighbors: usize) -> (usize, usize) {
    let center = (count as f32 * CENTER_SHARE).floor() as usize;
    let per_neighbor = (count as f32 * SATELLITE_SHARE / neighbors.max(1) as f32).floor() as usize;
    (center, per_neighbor)
}

/// Position along an edge for a connector at `time`; in `[0, 1]`.
fn shuttle(id: usize, time: f32) -> f32 {
    let rate = 0.02 + (id % 100) as f32 * 0.0001;
    ((time * rate + id as f32).sin() + 1.0) * 0.5
}

impl TargetGenerator for RelationshipGraph {
    fn assign(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let Some(payload) = ctx.payload.filter(|p| !p.neighbors.is_empty()) else {
            return Sphere.assign(particles, ctx);
        };
        let k = payload.neighbors.len();
        let layout = GraphLayout::new(ctx.width, ctx.height, k);
        let primary = ctx.config.primary_color;
        let (center_count, per_neighbor) = split(particles.len(), k);
        let satellite_end = center_count + per_neighbor * k;

        for (i, p) in particles.iter_mut().enumerate() {
            if i < center_count {
                p.target = layout.center + sample_disk(ctx.rng, CENTER_RADIUS);
                p.color = payload.center.category.color().unwrap_or(primary);
                p.group = Some(0);
            } else if i < satellite_end {
                let idx = ((i - center_count) / per_neighbor).min(k - 1);
                let node = &payload.neighbors[idx].node;
                p.target = layout.neighbors[idx] + sample_disk(ctx.rng, SATELLITE_RADIUS);
                p.color = node.category.color().unwrap_or(primary);
                p.group = u8::try_from(idx + 1).ok();
            } else {
                let edge = i % k;
                let t = ctx.rng.random::<f32>();
                p.target = layout.center.lerp(layout.neighbors[edge], t);
                p.color = Rgba::ZINC_300;
                p.connector = Some(edge);
            }
        }

        log::trace!(
            "graph: {center_count} center, {per_neighbor} x {k} neighbours, {} connectors",
            particles.len().saturating_sub(satellite_end)
        );
    }

    fn animate(&self, particles: &mut [Particle], ctx: &mut GenContext<'_>) {
        let Some(payload) = ctx.payload.filter(|p| !p.neighbors.is_empty()) else {
            return Sphere.animate(particles, ctx);
        };
        let layout = GraphLayout::new(ctx.width, ctx.height, payload.neighbors.len());

        for p in particles {
            let Some(end) = p.connector.and_then(|edge| layout.neighbors.get(edge)) else {
                continue;
            };
            p.target = layout.center.lerp(*end, shuttle(p.id, ctx.time));
        }
    }
}
