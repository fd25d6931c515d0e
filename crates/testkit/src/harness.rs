//! Tick harness for deterministic, frame-stepped scenario tests.
//!
//! A run steps a small scenario for a fixed number of ticks and snapshots
//! selected state after each one. The report is returned to the caller for
//! assertions instead of being compared against files on disk.

use anyhow::Result;
use serde::Serialize;
use vrdock_core::SimTick;

/// Configuration for a tick run.
#[derive(Debug, Clone)]
pub struct TickRunConfig {
    /// Human-readable name (carried into the report).
    pub name: String,
    /// Number of ticks to step (report includes the initial snapshot at tick 0).
    pub ticks: u64,
    /// Seconds per tick handed to the step function.
    pub dt: f32,
}

impl TickRunConfig {
    /// Run `ticks` ticks at 72 Hz.
    pub fn new(name: impl Into<String>, ticks: u64) -> Self {
        Self {
            name: name.into(),
            ticks,
            dt: 1.0 / 72.0,
        }
    }
}

/// Single snapshot frame captured at a given tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Every frame captured by [`run_ticks`].
#[derive(Debug, Clone, Serialize)]
pub struct TickReport<S> {
    /// Name from the run configuration.
    pub name: String,
    /// Frames in tick order.
    pub frames: Vec<TickFrame<S>>,
}

impl<S> TickReport<S> {
    /// Snapshot after the last step.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|frame| &frame.snapshot)
    }
}

/// Step `state` and collect snapshots.
///
/// Captures the initial snapshot at tick 0, then steps `config.ticks` times,
/// capturing a snapshot after each step (so the report contains `ticks + 1`
/// frames). The first failing step aborts the run.
pub fn run_ticks<State, Snapshot, StepFn, SnapFn>(
    config: TickRunConfig,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> Result<(State, TickReport<Snapshot>)>
where
    StepFn: FnMut(SimTick, f32, &mut State) -> Result<()>,
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(config.ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(TickFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..config.ticks {
        step(tick, config.dt, &mut state)?;
        tick = tick.advance(1);
        frames.push(TickFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    tracing::debug!(name = %config.name, frames = frames.len(), "tick run finished");
    Ok((
        state,
        TickReport {
            name: config.name,
            frames,
        },
    ))
}
