use serde::{Deserialize, Serialize};

/// Identifier for a particle in a [`crate::particle::ParticleStore`].
///
/// This is an index into `ParticleStore::particles` and doubles as the
/// deterministic noise seed for that particle. It is stable for as long as
/// the particle survives reseeds.
pub type ParticleId = usize;

/// Lifecycle phase that reparametrizes a mode's generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Active,
    Success,
    Error,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Idle, Status::Active, Status::Success, Status::Error];

    pub fn label(self) -> &'static str {
        match self {
            Status::Idle => "Idle",
            Status::Active => "Active",
            Status::Success => "Success",
            Status::Error => "Error",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}
