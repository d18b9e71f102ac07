//! Brushwork - headless brush session host
//!
//! Replays a stroke script through a brush session, lets any living brush
//! animation run to completion, and writes the surface out as a PNG.

use anyhow::{Context, Result};
use brushwork_config::SessionConfig;
use painting::{
    BrushKind, BrushParams, BrushSession, Canvas, ColorRgb, LIVING_LIFESPAN, ManualScheduler,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod script;

use config::ReplayConfig;

/// Upper bound on frames pumped after the script ends
const MAX_DRAIN_FRAMES: usize = 10 * LIVING_LIFESPAN as usize;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let replay = ReplayConfig::from_args(std::env::args().skip(1))?;
    let config = SessionConfig::from_env();
    info!(
        "Starting Brushwork {} on a {}x{} surface",
        env!("CARGO_PKG_VERSION"),
        config.surface.width,
        config.surface.height
    );

    let steps = script::load(&replay.script)?;
    let mut session = build_session(&config, replay.seed);
    let stats = script::replay(&mut session, &steps);
    let drained = session.run_until_idle(MAX_DRAIN_FRAMES);
    if session.is_animating() {
        warn!("Animation still running after {} frames, stopping", drained);
    }
    info!(
        "Replayed {} steps: {} commands ({} rejected), {} pointer events, {} frames, {} tile uploads ({} KiB)",
        steps.len(),
        stats.commands,
        stats.rejected,
        stats.pointer_events,
        stats.frames + drained,
        stats.uploaded_tiles,
        stats.uploaded_bytes / 1024
    );

    write_png(session.target(), &replay.output)?;
    info!("Wrote {}", replay.output.display());
    Ok(())
}

/// Session from config; invalid brush settings fall back to the defaults
fn build_session(config: &SessionConfig, seed: Option<u64>) -> BrushSession<Canvas, ManualScheduler> {
    let canvas = Canvas::new(config.surface.width, config.surface.height);
    let kind = BrushKind::from_name(&config.brush.brush);

    let color = ColorRgb::parse(&config.brush.color).unwrap_or_else(|err| {
        warn!("{}, using default color", err);
        BrushParams::default().color
    });
    let params = BrushParams::new(config.brush.size, color).unwrap_or_else(|err| {
        warn!("{}, using default size", err);
        let mut params = BrushParams::default();
        params.color = color;
        params
    });

    match seed {
        Some(seed) => BrushSession::with_seed(canvas, ManualScheduler::new(), kind, params, seed),
        None => BrushSession::new(canvas, ManualScheduler::new(), kind, params),
    }
}

fn write_png(canvas: &Canvas, path: &std::path::Path) -> Result<()> {
    let surface = canvas.surface();
    let image = image::RgbaImage::from_raw(surface.width, surface.height, surface.to_rgba8())
        .context("surface buffer does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}
