//! Tick-stamped controller input read from a JSON script.
//!
//! ```json
//! { "steps": [
//!     { "tick": 0, "op": "connect", "device": 1, "source": { "has_haptics": true } },
//!     { "tick": 2, "op": "ray_pose", "device": 1, "pose": { "position": [0.0, 0.2, 0.0] } },
//!     { "tick": 5, "op": "action", "device": 1, "action": "selectstart" }
//! ] }
//! ```

use serde::Deserialize;
use std::{fs, path::Path};
use vrdock_core::{SimTick, Transform3D};
use vrdock_input::{InputSource, PrimaryAction};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ScriptedStep {
    tick: u64,
    #[serde(flatten)]
    op: ScriptedOp,
}

/// One host-side input notification. `device` is the controller index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptedOp {
    Connect {
        device: u32,
        #[serde(default)]
        source: InputSource,
    },
    Disconnect {
        device: u32,
    },
    RayPose {
        device: u32,
        pose: Transform3D,
    },
    GripPose {
        device: u32,
        pose: Transform3D,
    },
    Action {
        device: u32,
        action: PrimaryAction,
    },
    Camera {
        pose: Transform3D,
    },
}

pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let mut file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        // Stable: steps sharing a tick keep file order.
        file.steps.sort_by_key(|step| step.tick);
        Ok(Self {
            steps: file.steps,
            index: 0,
        })
    }

    /// Ops scheduled at or before `tick` that have not been handed out yet.
    pub fn due(&mut self, tick: SimTick) -> Vec<ScriptedOp> {
        let mut ops = Vec::new();
        while let Some(step) = self.steps.get(self.index) {
            if step.tick > tick.0 {
                break;
            }
            ops.push(step.op.clone());
            self.index += 1;
        }
        ops
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Tick of the last scripted step.
    pub fn last_tick(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.tick)
    }
}
