use crate::config::AppConfig;
use crate::scripted_input::{ScriptedInputPlayer, ScriptedOp};
use crate::stock::{self, StockSurface};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use vrdock_core::{DeviceId, SimTick};
use vrdock_input::InteractionEvent;
use vrdock_testkit::{EventRecord, JsonlSink};

/// Ticks run after the last scripted step so transitions can settle.
const SETTLE_TICKS: u64 = 30;

pub struct HeadlessConfig {
    pub app: AppConfig,
    pub scripted_input: Option<PathBuf>,
    pub event_log: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub dt: f32,
}

/// What a headless run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSummary {
    pub ticks: u64,
    pub events: usize,
    pub haptic_pulses: usize,
    pub crank_value: Option<f32>,
    pub head_tracking: bool,
    pub head_lock_icon: Option<String>,
    pub raised_shapes: usize,
    pub script_finished: bool,
}

pub fn run(cfg: HeadlessConfig) -> Result<HeadlessSummary> {
    let mut stock = stock::build(&cfg.app)?;
    let mut player = match &cfg.scripted_input {
        Some(path) => Some(
            ScriptedInputPlayer::from_path(path)
                .with_context(|| format!("failed to load scripted input {}", path.display()))?,
        ),
        None => None,
    };
    let mut sink = match &cfg.event_log {
        Some(path) => Some(JsonlSink::create(path)?),
        None => None,
    };

    let limit = cfg.max_ticks.unwrap_or_else(|| {
        player
            .as_ref()
            .map_or(SETTLE_TICKS, |p| p.last_tick() + SETTLE_TICKS)
    });

    let mut summary = HeadlessSummary {
        ticks: 0,
        events: 0,
        haptic_pulses: 0,
        crank_value: None,
        head_tracking: false,
        head_lock_icon: None,
        raised_shapes: 0,
        script_finished: true,
    };
    let mut log = |tick: SimTick, events: &[InteractionEvent], summary: &mut HeadlessSummary| -> Result<()> {
        summary.events += events.len();
        if let Some(sink) = sink.as_mut() {
            for event in events {
                sink.write(&EventRecord::new(tick, event))?;
            }
        }
        Ok(())
    };

    for _ in 0..limit {
        let tick = stock.surface.tick_count();
        if let Some(player) = player.as_mut() {
            for op in player.due(tick) {
                let events = apply(&mut stock, op)?;
                log(tick, &events, &mut summary)?;
            }
        }

        let events = stock.surface.tick(cfg.dt)?;
        log(tick, &events, &mut summary)?;

        for pulse in stock.surface.world_mut().drain_haptics() {
            debug!(device = %pulse.device, intensity = pulse.intensity, "haptic pulse");
            summary.haptic_pulses += 1;
        }
        summary.ticks += 1;
    }

    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }
    summary.crank_value = stock
        .crank
        .as_ref()
        .map(|binding| stock.surface.world().properties().get(binding).unwrap_or(0.0));
    summary.head_tracking = stock.surface.head().is_tracking();
    let dock = stock.surface.dock();
    summary.head_lock_icon = dock
        .button(stock.head_lock)
        .and_then(|button| button.icon_path())
        .map(str::to_string);
    summary.raised_shapes = stock
        .shapes
        .iter()
        .filter(|shape| dock.button(**shape).is_some_and(|button| button.is_active()))
        .count();
    if let Some(player) = player.as_ref() {
        summary.script_finished = player.is_finished();
        if !summary.script_finished {
            warn!(limit, "tick limit reached before the script finished");
        }
    }

    info!(
        ticks = summary.ticks,
        events = summary.events,
        pulses = summary.haptic_pulses,
        head_tracking = summary.head_tracking,
        raised_shapes = summary.raised_shapes,
        "headless run finished"
    );
    Ok(summary)
}

fn device(stock: &StockSurface, index: u32) -> Result<DeviceId> {
    stock
        .devices
        .get(index as usize)
        .copied()
        .with_context(|| format!("no controller with index {index}"))
}

fn apply(stock: &mut StockSurface, op: ScriptedOp) -> Result<Vec<InteractionEvent>> {
    debug!(?op, "scripted input");
    match op {
        ScriptedOp::Connect { device: index, source } => {
            let id = device(stock, index)?;
            stock.surface.world_mut().connect(id, source)?;
        }
        ScriptedOp::Disconnect { device: index } => {
            let id = device(stock, index)?;
            stock.surface.world_mut().disconnect(id)?;
        }
        ScriptedOp::RayPose { device: index, pose } => {
            let id = device(stock, index)?;
            stock.surface.world_mut().set_ray_pose(id, pose)?;
        }
        ScriptedOp::GripPose { device: index, pose } => {
            let id = device(stock, index)?;
            stock.surface.world_mut().set_grip_pose(id, pose)?;
        }
        ScriptedOp::Action { device: index, action } => {
            let id = device(stock, index)?;
            return Ok(stock.surface.handle_action(id, action)?);
        }
        ScriptedOp::Camera { pose } => stock.surface.set_camera_pose(pose),
    }
    Ok(Vec::new())
}
