//! The closed set of animation modes and their declarative properties.

use serde::{Deserialize, Serialize};

use crate::physics::Scheme;

/// Symbolic state the swarm is shaped into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Loading,
    Success,
    Warning,
    Error,
    Empty,
    RelationshipGraph,
    IdleSwarm,
    VoiceWaveform,
    ProcessingRing,
    DeviceMesh,
    Telemetry,
    CommandTunnel,
    FirmwareUpdate,
    IncidentPulse,
    Pairing,
    SecuritySweep,
}

/// Sidebar grouping used by hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Core,
    Assistant,
    Devices,
    Operations,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Core,
        Category::Assistant,
        Category::Devices,
        Category::Operations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Core => "Core states",
            Category::Assistant => "Assistant",
            Category::Devices => "Devices",
            Category::Operations => "Operations",
        }
    }
}

impl Mode {
    pub const ALL: [Mode; 16] = [
        Mode::Loading,
        Mode::Success,
        Mode::Warning,
        Mode::Error,
        Mode::Empty,
        Mode::RelationshipGraph,
        Mode::IdleSwarm,
        Mode::VoiceWaveform,
        Mode::ProcessingRing,
        Mode::DeviceMesh,
        Mode::Telemetry,
        Mode::CommandTunnel,
        Mode::FirmwareUpdate,
        Mode::IncidentPulse,
        Mode::Pairing,
        Mode::SecuritySweep,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Loading => "Processing",
            Mode::Success => "Success",
            Mode::Warning => "System Warning",
            Mode::Error => "Critical Failure",
            Mode::Empty => "Scanning",
            Mode::RelationshipGraph => "Entity Graph",
            Mode::IdleSwarm => "Idle",
            Mode::VoiceWaveform => "Listening",
            Mode::ProcessingRing => "Thinking",
            Mode::DeviceMesh => "Device Mesh",
            Mode::Telemetry => "Telemetry",
            Mode::CommandTunnel => "Command",
            Mode::FirmwareUpdate => "Firmware Update",
            Mode::IncidentPulse => "Incident",
            Mode::Pairing => "Pairing",
            Mode::SecuritySweep => "Security Scan",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mode::Loading => "Centralized data aggregation.",
            Mode::Success => "Verification complete.",
            Mode::Warning => "Stability compromised.",
            Mode::Error => "Containment breach / Entropy.",
            Mode::Empty => "Searching for signals.",
            Mode::RelationshipGraph => "Visualizing relationships.",
            Mode::IdleSwarm => "Ambient presence.",
            Mode::VoiceWaveform => "Capturing voice input.",
            Mode::ProcessingRing => "Working on a request.",
            Mode::DeviceMesh => "Network topology.",
            Mode::Telemetry => "Live device metrics.",
            Mode::CommandTunnel => "Dispatching a command.",
            Mode::FirmwareUpdate => "Rolling out firmware.",
            Mode::IncidentPulse => "Active incident.",
            Mode::Pairing => "Linking a new device.",
            Mode::SecuritySweep => "Auditing the perimeter.",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Mode::Loading
            | Mode::Success
            | Mode::Warning
            | Mode::Error
            | Mode::Empty
            | Mode::RelationshipGraph => Category::Core,
            Mode::IdleSwarm | Mode::VoiceWaveform | Mode::ProcessingRing => Category::Assistant,
            Mode::DeviceMesh | Mode::Telemetry | Mode::Pairing => Category::Devices,
            Mode::CommandTunnel
            | Mode::FirmwareUpdate
            | Mode::IncidentPulse
            | Mode::SecuritySweep => Category::Operations,
        }
    }

    /// Integration scheme used while this mode is active.
    ///
    /// Only the two modes without a shape run free. `Error` still eases onto
    /// its crossed lines; its chaos is the per-frame glitch its generator adds
    /// to the targets, so the glyph stays readable.
    pub fn scheme(self) -> Scheme {
        match self {
            Mode::IdleSwarm | Mode::IncidentPulse => Scheme::FreeBody,
            _ => Scheme::Easing,
        }
    }

    /// Whether the generator re-reads `status` every frame.
    pub fn is_status_driven(self) -> bool {
        matches!(
            self,
            Mode::VoiceWaveform
                | Mode::DeviceMesh
                | Mode::CommandTunnel
                | Mode::FirmwareUpdate
                | Mode::Pairing
                | Mode::SecuritySweep
        )
    }

    /// Stage size the host should give this mode, in logical pixels.
    pub fn preferred_size(self) -> (f32, f32) {
        match self {
            Mode::Loading => (500.0, 500.0),
            Mode::RelationshipGraph => (600.0, 450.0),
            Mode::Success => (320.0, 320.0),
            Mode::Warning => (400.0, 350.0),
            Mode::Error => (450.0, 450.0),
            Mode::Empty | Mode::Telemetry => (600.0, 400.0),
            Mode::CommandTunnel | Mode::FirmwareUpdate => (560.0, 360.0),
            _ => (480.0, 400.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_lists_every_mode_once() {
        let set: HashSet<Mode> = Mode::ALL.into_iter().collect();
        assert_eq!(set.len(), Mode::ALL.len());
    }

    #[test]
    fn every_category_has_modes() {
        for cat in Category::ALL {
            assert!(Mode::ALL.iter().any(|m| m.category() == cat), "{cat:?}");
        }
    }

    #[test]
    fn free_body_is_reserved_for_unshaped_modes() {
        let free: Vec<Mode> = Mode::ALL
            .into_iter()
            .filter(|m| m.scheme() == Scheme::FreeBody)
            .collect();
        assert_eq!(free, vec![Mode::IdleSwarm, Mode::IncidentPulse]);
        // The error glyph is a target shape and must converge.
        assert_eq!(Mode::Error.scheme(), Scheme::Easing);
        assert_eq!(Mode::Success.scheme(), Scheme::Easing);
        assert_eq!(Mode::RelationshipGraph.scheme(), Scheme::Easing);
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Mode::RelationshipGraph).unwrap();
        assert_eq!(json, "\"relationship_graph\"");
        let back: Mode = serde_json::from_str("\"security_sweep\"").unwrap();
        assert_eq!(back, Mode::SecuritySweep);
    }
}
