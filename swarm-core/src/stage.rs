//! The host-facing engine: one stage per animated canvas.
//!
//! A [`Stage`] owns the particle store, the scene inputs, the flow
//! sequencer and the clock. Hosts write inputs through the setters between
//! frames and call [`Stage::frame`] once per display refresh for as long as
//! it returns `true`.
//!
//! Per frame:
//! 1. Advance real time and apply any flow steps that came due.
//! 2. Reseed and/or recompute targets if size, count or scene inputs changed.
//! 3. Advance the animation clock and run the mode's `animate`.
//! 4. Integrate with the mode's scheme, then apply pointer repulsion.
//! 5. Draw.

use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::AnimationConfig,
    error::{Error, Result},
    flow::{FlowEvent, FlowLibrary, FlowSequencer},
    generators::{GenContext, assign_targets, generator_for},
    graph::{GraphAnchors, GraphPayload},
    mode::Mode,
    particle::{Particle, ParticleStore},
    physics::StepEnv,
    pointer::Pointer,
    renderer::{self, Clock},
    state::{SceneState, StateCell},
    surface::Surface,
    types::Status,
};

/// The inputs a reseed depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    width: f32,
    height: f32,
    count: usize,
    particle_size: f32,
}

pub struct Stage {
    state: StateCell,
    /// State version whose targets are currently assigned.
    applied_version: Option<u64>,
    layout: Option<Layout>,
    width: f32,
    height: f32,
    store: ParticleStore,
    pointer: Pointer,
    clock: Clock,
    /// Real time accumulated over frames; drives flow timers.
    elapsed: Duration,
    flows: FlowLibrary,
    sequencer: FlowSequencer,
    rng: StdRng,
    running: bool,
}

impl Stage {
    pub fn new(config: AnimationConfig, flows: FlowLibrary) -> Self {
        Self::with_rng(config, flows, StdRng::from_os_rng())
    }

    /// A stage whose particle placement is reproducible.
    pub fn with_seed(config: AnimationConfig, flows: FlowLibrary, seed: u64) -> Self {
        Self::with_rng(config, flows, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AnimationConfig, flows: FlowLibrary, rng: StdRng) -> Self {
        let state = SceneState {
            config: config.sanitized(),
            ..SceneState::default()
        };
        Self {
            state: StateCell::new(state),
            applied_version: None,
            layout: None,
            width: 0.0,
            height: 0.0,
            store: ParticleStore::new(),
            pointer: Pointer::default(),
            clock: Clock::new(),
            elapsed: Duration::ZERO,
            flows,
            sequencer: FlowSequencer::new(),
            rng,
            running: true,
        }
    }

    // --- inputs ---

    /// Switches mode. A manual mode change cancels any running flow.
    pub fn set_mode(&mut self, mode: Mode) {
        self.sequencer.cancel();
        self.apply_mode_status(mode, None);
    }

    /// Sets the status. Modes whose generators ignore status keep their
    /// current targets instead of being re-placed.
    pub fn set_status(&mut self, status: Status) {
        let was_current = self.applied_version == Some(self.state.version());
        let changed = self.state.update(|s| s.config.status = status);
        if changed && was_current && !self.mode().is_status_driven() {
            self.applied_version = Some(self.state.version());
        }
        self.sync();
    }

    /// Replaces the config wholesale; out-of-range values are clamped.
    pub fn set_config(&mut self, config: AnimationConfig) {
        let clean = config.clone().sanitized();
        if clean != config {
            log::warn!("config out of range, clamped: {config:?}");
        }
        self.state.update(|s| s.config = clean);
        self.sync();
    }

    pub fn set_graph_payload(&mut self, payload: Option<GraphPayload>) {
        self.state.update(|s| s.payload = payload);
        self.sync();
    }

    /// Sets the canvas size in logical pixels.
    pub fn resize(&mut self, width: f32, height: f32) {
        let (width, height) = (sanitize_extent(width), sanitize_extent(height));
        if (width, height) == (self.width, self.height) {
            return;
        }
        log::debug!("resize {}x{} -> {width}x{height}", self.width, self.height);
        self.width = width;
        self.height = height;
        self.sync();
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.moved(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    // --- flows ---

    pub fn start_flow(&mut self, id: &str) -> Result<()> {
        let Some(flow) = self.flows.get(id) else {
            log::warn!("start_flow: no flow named {id:?}");
            return Err(Error::UnknownFlow(id.to_string()));
        };
        self.sequencer.start(flow, self.elapsed);
        // The first step is due now; apply it without waiting a frame.
        self.poll_flows();
        Ok(())
    }

    pub fn cancel_flow(&mut self) {
        self.sequencer.cancel();
    }

    pub fn active_flow(&self) -> Option<&str> {
        self.sequencer.active()
    }

    pub fn caption(&self) -> Option<&str> {
        self.sequencer.caption()
    }

    pub fn flows(&self) -> &FlowLibrary {
        &self.flows
    }

    // --- frame loop ---

    /// Advances by `real_dt` seconds and draws onto `surface`.
    ///
    /// Returns `false` once the stage has been [stopped](Self::stop); the
    /// host should then stop scheduling frames. Nothing is drawn in that case.
    pub fn frame(&mut self, real_dt: f32, surface: &mut dyn Surface) -> bool {
        if !self.running {
            return false;
        }
        let real_dt = if real_dt.is_finite() { real_dt.clamp(0.0, 1.0) } else { 0.0 };

        self.elapsed += Duration::from_secs_f32(real_dt);
        self.poll_flows();
        self.sync();

        let state = self.state.snapshot();
        self.clock.advance(real_dt, state.config.base_speed);

        if self.has_area() {
            let mode = state.mode;
            let mut ctx = GenContext {
                width: self.width,
                height: self.height,
                time: self.clock.time(),
                status: state.config.status,
                config: &state.config,
                payload: state.payload.as_ref(),
                rng: &mut self.rng,
            };
            generator_for(mode).animate(&mut self.store.particles, &mut ctx);

            let mut env = StepEnv {
                width: self.width,
                height: self.height,
                time: self.clock.time(),
                chaos: state.config.chaos_factor,
                rng: &mut self.rng,
            };
            mode.scheme()
                .integrator()
                .step(&mut self.store.particles, &mut env);
            self.pointer.apply(&mut self.store.particles);
        }

        renderer::draw(
            &self.store.particles,
            state.config.connection_threshold,
            state.config.primary_color,
            surface,
        );
        true
    }

    /// Stops the frame loop for good; later [`frame`](Self::frame) calls do nothing.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("stage stopped");
        }
        self.running = false;
        self.sequencer.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Regenerates every particle at a random position and restarts the clock.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.layout = None;
        self.store.particles.clear();
        self.sync();
    }

    // --- queries ---

    /// Label positions for the relationship graph, when one is showing.
    pub fn label_anchors(&self) -> Option<GraphAnchors> {
        let state = self.state.get();
        if state.mode != Mode::RelationshipGraph || !self.has_area() {
            return None;
        }
        state
            .payload
            .as_ref()
            .filter(|p| !p.neighbors.is_empty())
            .map(|p| GraphAnchors::new(p, self.width, self.height))
    }

    pub fn mode(&self) -> Mode {
        self.state.get().mode
    }

    pub fn status(&self) -> Status {
        self.state.get().config.status
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.state.get().config
    }

    pub fn payload(&self) -> Option<&GraphPayload> {
        self.state.get().payload.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.store.particles
    }

    /// Animation clock, in clock units.
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    // --- internals ---

    fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    fn apply_mode_status(&mut self, mode: Mode, status: Option<Status>) {
        self.state.update(|s| {
            s.mode = mode;
            if let Some(status) = status {
                s.config.status = status;
            }
        });
        self.sync();
    }

    fn poll_flows(&mut self) {
        for event in self.sequencer.poll(self.elapsed) {
            if let FlowEvent::Step { step, .. } = event {
                self.apply_mode_status(step.mode, Some(step.status));
            }
        }
    }

    /// Reseeds when the layout changed and reassigns targets when anything
    /// they depend on changed. Does nothing while the canvas has no area.
    fn sync(&mut self) {
        if !self.has_area() {
            return;
        }
        let state = self.state.snapshot();
        let layout = Layout {
            width: self.width,
            height: self.height,
            count: state.config.count(),
            particle_size: state.config.particle_size,
        };

        let reseeded = self.layout != Some(layout);
        if reseeded {
            self.store.reseed(
                layout.width,
                layout.height,
                layout.count,
                layout.particle_size,
                state.config.primary_color,
                &mut self.rng,
            );
            self.layout = Some(layout);
        }

        if !reseeded && self.applied_version == Some(self.state.version()) {
            return;
        }

        let mut ctx = GenContext {
            width: self.width,
            height: self.height,
            time: self.clock.time(),
            status: state.config.status,
            config: &state.config,
            payload: state.payload.as_ref(),
            rng: &mut self.rng,
        };
        assign_targets(state.mode, &mut self.store.particles, &mut ctx);
        self.applied_version = Some(self.state.version());
        log::debug!(
            "targets for {:?}/{:?}: {} particles",
            state.mode,
            state.config.status,
            self.store.len()
        );
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
