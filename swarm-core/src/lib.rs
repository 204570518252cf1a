//! Particle iconography engine.
//!
//! A swarm of point particles reshapes itself into symbols (sphere,
//! checkmark, triangle, scanning grid, relationship graph, telemetry lanes
//! and more) to communicate application state.
//!
//! Main components:
//! - [`stage`] — the host-facing engine that ties everything together.
//! - [`particle`] — the particle model and the population store.
//! - [`generators`] — one target generator per [`mode::Mode`].
//! - [`physics`] — the easing and free-body integrators.
//! - [`pointer`] — local repulsion around the pointer.
//! - [`renderer`] — animation clock and drawing onto a [`surface::Surface`].
//! - [`flow`] / [`scheduler`] — timed multi-step flows and their timers.
//! - [`graph`] — relationship-graph payload, layout and overlay placement.
//! - [`config`], [`state`], [`types`], [`color`], [`error`] — inputs and shared types.

pub mod color;
pub mod config;
pub mod error;
pub mod flow;
pub mod generators;
pub mod graph;
pub mod mode;
pub mod particle;
pub mod physics;
pub mod pointer;
pub mod renderer;
pub mod scheduler;
pub mod stage;
pub mod state;
pub mod surface;
pub mod types;

pub use config::AnimationConfig;
pub use error::{Error, Result};
pub use mode::Mode;
pub use stage::Stage;
pub use types::Status;
