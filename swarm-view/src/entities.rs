//! Entity cards shown in the sidebar. Hovering one opens a companion
//! relationship graph built from its payload.

use swarm_core::graph::{EntityCategory, GraphNode, GraphPayload};

/// Size of the floating companion graph, in logical pixels.
pub const COMPANION_SIZE: egui::Vec2 = egui::vec2(400.0, 320.0);

#[derive(Clone, Debug)]
pub struct EntityCard {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub payload: GraphPayload,
}

impl EntityCard {
    /// Short text under the subtitle, e.g. `"3 related"`.
    pub fn summary(&self) -> String {
        format!("{} related", self.payload.neighbors.len())
    }
}

pub fn cards() -> Vec<EntityCard> {
    use EntityCategory::*;

    vec![
        EntityCard {
            title: "Poly Studio X50",
            subtitle: "Video bar in Huddle Room A",
            payload: GraphPayload::sample(),
        },
        EntityCard {
            title: "Corporate Network",
            subtitle: "Primary office backbone",
            payload: GraphPayload::new(GraphNode::new("n1", "Corporate Network", Device))
                .with_neighbor(GraphNode::new("s2", "NYC Office", Space), "Region")
                .with_neighbor(GraphNode::new("p1", "QoS Policy", Policy), "Governed By")
                .with_neighbor(GraphNode::new("d2", "Lobby Switch", Device), "Connected Peer"),
        },
        EntityCard {
            title: "Firewall Gateway",
            subtitle: "Edge security appliance",
            payload: GraphPayload::new(GraphNode::new("f1", "Firewall Gateway", Device))
                .with_neighbor(GraphNode::new("s3", "Server Room", Space), "Location")
                .with_neighbor(GraphNode::new("c2", "Firmware Update", Command), "Pending"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_card_has_a_connected_graph() {
        let cards = cards();
        assert_eq!(cards.len(), 3);
        for card in &cards {
            assert_eq!(card.payload.center.label, card.title);
            assert!(!card.payload.neighbors.is_empty());
        }
        assert_eq!(cards[2].summary(), "2 related");
    }
}
