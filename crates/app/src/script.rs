//! Stroke scripts: a recorded sequence of UI commands, pointer events and
//! frame ticks, replayed against a session.

use std::path::Path;

use anyhow::{Context, Result};
use brushwork_ipc::{PointerEvent, SessionCommand};
use painting::{BrushSession, Canvas, ManualScheduler};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// One entry of a stroke script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ScriptStep {
    Command(SessionCommand),
    Pointer(PointerEvent),
    /// Let the animation run for up to `count` frames
    Frames { count: usize },
}

/// Counters reported after a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub commands: usize,
    pub rejected: usize,
    pub pointer_events: usize,
    pub frames: usize,
    /// Dirty tiles read back after each step
    pub uploaded_tiles: usize,
    pub uploaded_bytes: usize,
}

pub fn parse(json: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("script must be a JSON array of steps")
}

pub fn load(path: &Path) -> Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&json).with_context(|| format!("failed to parse script {}", path.display()))
}

/// Feed every step into the session. Rejected commands are logged and skipped.
pub fn replay(
    session: &mut BrushSession<Canvas, ManualScheduler>,
    steps: &[ScriptStep],
) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for (index, step) in steps.iter().enumerate() {
        match step {
            ScriptStep::Command(command) => {
                stats.commands += 1;
                if let Err(err) = session.handle_command(command) {
                    warn!("step {}: {:?} rejected: {}", index, command, err);
                    stats.rejected += 1;
                }
            }
            ScriptStep::Pointer(event) => {
                stats.pointer_events += 1;
                session.handle_pointer(*event);
            }
            ScriptStep::Frames { count } => {
                let ran = session.run_until_idle(*count);
                debug!("step {}: ran {} of {} frames", index, ran, count);
                stats.frames += ran;
            }
        }
        upload_dirty_tiles(session, &mut stats);
    }
    stats
}

/// Read back every tile the last step touched, the way a windowed host would
/// refresh its texture
fn upload_dirty_tiles(
    session: &mut BrushSession<Canvas, ManualScheduler>,
    stats: &mut ReplayStats,
) {
    let dirty = session.target_mut().take_dirty_tiles();
    if dirty.is_empty() {
        return;
    }
    let tiles = session.target().tiles();
    let bytes: usize = dirty.iter().map(|&coord| tiles.get_tile_bytes(coord).len()).sum();
    trace!("uploading {} tiles ({} bytes)", dirty.len(), bytes);
    stats.uploaded_tiles += dirty.len();
    stats.uploaded_bytes += bytes;
}
