//! Scripted, timed sequences of mode/status changes.
//!
//! A [`FlowDefinition`] is plain data (usually loaded from JSON). The
//! [`FlowSequencer`] turns one into timers on a [`TimerQueue`]; the stage
//! polls it with its own clock and applies whatever comes due. A flow never
//! touches particles directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::Result, mode::Mode, scheduler::TimerQueue, types::Status};

const BUILTIN_FLOWS: &str = include_str!("../assets/flows.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowStep {
    pub mode: Mode,
    pub status: Status,
    pub duration_ms: u64,
    #[serde(default)]
    pub caption: String,
}

impl FlowStep {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub id: String,
    pub label: String,
    pub steps: Vec<FlowStep>,
}

impl FlowDefinition {
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(FlowStep::duration).sum()
    }
}

/// An ordered set of flows, looked up by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowLibrary {
    flows: Vec<FlowDefinition>,
}

impl FlowLibrary {
    pub fn new(flows: Vec<FlowDefinition>) -> Self {
        Self { flows }
    }

    /// Parses a JSON array of flow definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let flows: Vec<FlowDefinition> = serde_json::from_str(json)?;
        Ok(Self::new(flows))
    }

    /// The flows bundled with the crate.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_FLOWS).unwrap_or_else(|err| {
            log::error!("bundled flows failed to parse: {err}");
            Self::default()
        })
    }

    pub fn get(&self, id: &str) -> Option<&FlowDefinition> {
        self.flows.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowDefinition> {
        self.flows.iter()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
    /// Step `index` of `flow` is due; the stage applies its mode and status.
    Step {
        flow: String,
        index: usize,
        step: FlowStep,
    },
    /// The last step's duration has elapsed.
    Finished { flow: String },
}

/// Idle until [`start`](Self::start), running until its finish timer fires
/// or it is cancelled.
#[derive(Debug, Default)]
pub struct FlowSequencer {
    timers: TimerQueue<FlowEvent>,
    active: Option<String>,
    caption: Option<String>,
}

impl FlowSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `flow` at `now`, cancelling whatever was pending before.
    ///
    /// Step `k` is due at `now + sum(duration[0..k])`; a finish event is
    /// due at `now + total_duration`.
    pub fn start(&mut self, flow: &FlowDefinition, now: Duration) {
        self.timers.cancel_all();

        let mut at = now;
        for (index, step) in flow.steps.iter().enumerate() {
            self.timers.schedule(
                at,
                FlowEvent::Step {
                    flow: flow.id.clone(),
                    index,
                    step: step.clone(),
                },
            );
            at += step.duration();
        }
        self.timers.schedule(
            at,
            FlowEvent::Finished {
                flow: flow.id.clone(),
            },
        );

        self.active = Some(flow.id.clone());
        self.caption = None;
        log::info!(
            "flow {} started: {} steps over {:?}",
            flow.id,
            flow.steps.len(),
            flow.total_duration()
        );
    }

    /// Drops every pending step. Returns whether a flow was running.
    pub fn cancel(&mut self) -> bool {
        self.timers.cancel_all();
        self.caption = None;
        match self.active.take() {
            Some(id) => {
                log::info!("flow {id} cancelled");
                true
            }
            None => false,
        }
    }

    /// Returns the events due at `now` and updates the active flow and caption.
    pub fn poll(&mut self, now: Duration) -> Vec<FlowEvent> {
        let events = self.timers.poll(now);
        for event in &events {
            match event {
                FlowEvent::Step { flow, index, step } => {
                    log::trace!("flow {flow} step {index}: {:?}/{:?}", step.mode, step.status);
                    self.caption = Some(step.caption.clone()).filter(|c| !c.is_empty());
                }
                FlowEvent::Finished { flow } => {
                    log::info!("flow {flow} finished");
                    self.active = None;
                    self.caption = None;
                }
            }
        }
        events
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}
