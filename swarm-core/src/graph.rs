//! Relationship-graph payload, its radial layout, and overlay placement.
//!
//! The layout is the single source of truth for where the center and
//! neighbour clusters sit: the generator places particles from it and the
//! host places text labels from it, so the two never disagree.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{color::Rgba, error::Result};

/// Radius of the central node cluster.
pub const CENTER_RADIUS: f32 = 50.0;
/// Radius of each neighbour cluster.
pub const SATELLITE_RADIUS: f32 = 25.0;
/// Neighbour distance from center, as a fraction of `min(width, height)`.
pub const SATELLITE_DISTANCE: f32 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Device,
    Space,
    Incident,
    Command,
    Policy,
    Asset,
}

impl EntityCategory {
    /// Cluster colour; `None` means "use the primary colour".
    pub fn color(self) -> Option<Rgba> {
        match self {
            EntityCategory::Device => Some(Rgba::BLUE_500),
            EntityCategory::Space => Some(Rgba::ZINC_400),
            EntityCategory::Incident => Some(Rgba::RED_500),
            EntityCategory::Command => Some(Rgba::VIOLET_500),
            EntityCategory::Asset => Some(Rgba::EMERALD_500),
            EntityCategory::Policy => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityCategory::Device => "device",
            EntityCategory::Space => "space",
            EntityCategory::Incident => "incident",
            EntityCategory::Command => "command",
            EntityCategory::Policy => "policy",
            EntityCategory::Asset => "asset",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub category: EntityCategory,
}

impl GraphNode {
    pub fn new(id: &str, label: &str, category: EntityCategory) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub node: GraphNode,
    pub relation: String,
}

/// A center entity and its ordered neighbours.
///
/// Neighbour order decides angular placement; it is never re-sorted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub center: GraphNode,
    pub neighbors: Vec<Neighbor>,
}

impl GraphPayload {
    pub fn new(center: GraphNode) -> Self {
        Self {
            center,
            neighbors: Vec::new(),
        }
    }

    pub fn with_neighbor(mut self, node: GraphNode, relation: &str) -> Self {
        self.neighbors.push(Neighbor {
            node,
            relation: relation.to_string(),
        });
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A device with four related entities.
    pub fn sample() -> Self {
        use EntityCategory::*;
        GraphPayload::new(GraphNode::new("d1", "Poly Studio X50", Device))
            .with_neighbor(GraphNode::new("s1", "Huddle Room A", Space), "Located In")
            .with_neighbor(GraphNode::new("i1", "High Latency", Incident), "Active Incident")
            .with_neighbor(GraphNode::new("c1", "Reboot Device", Command), "Suggested Action")
            .with_neighbor(GraphNode::new("a1", "Serial #99X", Asset), "Asset Tag")
    }
}

/// Angle of neighbour `i` of `count`, starting at twelve o'clock.
pub fn neighbor_angle(i: usize, count: usize) -> f32 {
    (i as f32 / count.max(1) as f32) * TAU - FRAC_PI_2
}

/// Screen-space cluster centers for a canvas and neighbour count.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLayout {
    pub center: Vec2,
    pub satellite_distance: f32,
    pub neighbors: Vec<Vec2>,
}

impl GraphLayout {
    pub fn new(width: f32, height: f32, neighbor_count: usize) -> Self {
        let center = Vec2::new(width, height) * 0.5;
        let satellite_distance = width.min(height) * SATELLITE_DISTANCE;
        let neighbors = (0..neighbor_count)
            .map(|i| center + Vec2::from_angle(neighbor_angle(i, neighbor_count)) * satellite_distance)
            .collect();
        Self {
            center,
            satellite_distance,
            neighbors,
        }
    }
}

/// A label position the host can render text at.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelAnchor {
    pub pos: Vec2,
    pub label: String,
    pub category: EntityCategory,
    /// Relation to the center; `None` for the center itself.
    pub relation: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphAnchors {
    pub center: LabelAnchor,
    pub neighbors: Vec<LabelAnchor>,
}

impl GraphAnchors {
    pub fn new(payload: &GraphPayload, width: f32, height: f32) -> Self {
        let layout = GraphLayout::new(width, height, payload.neighbors.len());
        let center = LabelAnchor {
            pos: layout.center,
            label: payload.center.label.clone(),
            category: payload.center.category,
            relation: None,
        };
        let neighbors = payload
            .neighbors
            .iter()
            .zip(layout.neighbors)
            .map(|(n, pos)| LabelAnchor {
                pos,
                label: n.node.label.clone(),
                category: n.node.category,
                relation: Some(n.relation.clone()),
            })
            .collect();
        Self { center, neighbors }
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

pub const PANEL_GAP: f32 = 24.0;
pub const PANEL_MARGIN: f32 = 20.0;

/// Top-left corner for a panel of `panel` size floating beside `anchor`.
///
/// The panel goes to the right of the anchor, vertically centered on it.
/// If it would overflow the viewport on the right it flips to the left
/// side; vertically it is clamped to keep [`PANEL_MARGIN`] from both edges.
pub fn place_companion_panel(anchor: Bounds, panel: Vec2, viewport: Vec2) -> Vec2 {
    let mut left = anchor.max().x + PANEL_GAP;
    if left + panel.x > viewport.x {
        left = anchor.min.x - panel.x - PANEL_GAP;
    }

    let top = anchor.min.y + anchor.size.y * 0.5 - panel.y * 0.5;
    let lowest = viewport.y - panel.y - PANEL_MARGIN;
    // min then max: a panel taller than the viewport pins to the top margin.
    let top = top.min(lowest).max(PANEL_MARGIN);

    Vec2::new(left, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_start_at_twelve_oclock_and_go_clockwise() {
        let layout = GraphLayout::new(600.0, 400.0, 4);
        let d = 400.0 * SATELLITE_DISTANCE;
        let expected = [
            Vec2::new(300.0, 200.0 - d),
            Vec2::new(300.0 + d, 200.0),
            Vec2::new(300.0, 200.0 + d),
            Vec2::new(300.0 - d, 200.0),
        ];
        for (got, want) in layout.neighbors.iter().zip(expected) {
            assert!(got.distance(want) < 1e-3, "{got:?} vs {want:?}");
        }
    }

    #[test]
    fn anchors_follow_payload_order() {
        let payload = GraphPayload::sample();
        let anchors = GraphAnchors::new(&payload, 600.0, 450.0);
        assert_eq!(anchors.center.label, "Poly Studio X50");
        assert_eq!(anchors.center.relation, None);
        assert_eq!(anchors.neighbors.len(), 4);
        assert_eq!(anchors.neighbors[1].label, "High Latency");
        assert_eq!(anchors.neighbors[1].relation.as_deref(), Some("Active Incident"));
    }

    #[test]
    fn payload_round_trips_through_json() {
        let json = r#"{
            "center": { "id": "d2", "label": "Corporate Network", "category": "device" },
            "neighbors": [
                { "node": { "id": "p1", "label": "QoS Policy", "category": "policy" }, "relation": "Governed By" }
            ]
        }"#;
        let payload = GraphPayload::from_json(json).unwrap();
        assert_eq!(payload.neighbors[0].node.category, EntityCategory::Policy);
        assert!(GraphPayload::from_json("{}").is_err());
    }

    #[test]
    fn panel_goes_right_when_it_fits() {
        let anchor = Bounds::new(100.0, 300.0, 200.0, 100.0);
        let pos = place_companion_panel(anchor, Vec2::new(400.0, 320.0), Vec2::new(1280.0, 800.0));
        assert_eq!(pos.x, 300.0 + PANEL_GAP);
        assert_eq!(pos.y, 350.0 - 160.0);
    }

    #[test]
    fn panel_flips_left_on_overflow() {
        let anchor = Bounds::new(900.0, 300.0, 200.0, 100.0);
        let pos = place_companion_panel(anchor, Vec2::new(400.0, 320.0), Vec2::new(1280.0, 800.0));
        assert_eq!(pos.x, 900.0 - 400.0 - PANEL_GAP);
    }

    #[test]
    fn panel_is_clamped_vertically() {
        let panel = Vec2::new(400.0, 320.0);
        let viewport = Vec2::new(1280.0, 800.0);

        let high = place_companion_panel(Bounds::new(10.0, 0.0, 50.0, 20.0), panel, viewport);
        assert_eq!(high.y, PANEL_MARGIN);

        let low = place_companion_panel(Bounds::new(10.0, 780.0, 50.0, 20.0), panel, viewport);
        assert_eq!(low.y, 800.0 - 320.0 - PANEL_MARGIN);
        assert!(low.y + panel.y <= viewport.y - PANEL_MARGIN);
    }
}
