/// Default tile size for dirty tracking on the CPU surface.
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Upper bound on interpolated points per segment
pub const MAX_SUBDIVISIONS: usize = 16_384;

/// Number of entries in a stroke brush color palette.
pub const PALETTE_SIZE: usize = 5;

// Waxy brush

/// Arc length between stamps, independent of brush size.
pub const WAXY_STEP_DISTANCE: f32 = 2.0;
/// Positional jitter is `size / WAXY_JITTER_DIVISOR`.
pub const WAXY_JITTER_DIVISOR: f32 = 10.0;
pub const WAXY_BASE_ALPHA: f32 = 0.8;
pub const WAXY_TEXTURE_ALPHA: f32 = 0.2;

/// Side length of the grain texture in pixels.
pub const GRAIN_TEXTURE_SIZE: u32 = 100;
pub const GRAIN_DOT_COUNT: usize = 1000;
pub const GRAIN_MAX_RADIUS: f32 = 1.5;
pub const GRAIN_MAX_ALPHA: f32 = 0.2;

// Liquid brush

pub const LIQUID_STEP_DISTANCE: f32 = 1.0;
/// Fixed center jitter per palette circle, in pixels.
pub const LIQUID_CENTER_JITTER: f32 = 3.0;
pub const LIQUID_CHANNEL_JITTER: f32 = 20.0;
pub const LIQUID_MIN_VARIATION_ALPHA: f32 = 0.1;
pub const LIQUID_MAX_VARIATION_ALPHA: f32 = 0.4;
/// Chance per step of dropping a new splatter.
pub const LIQUID_SPLATTER_CHANCE: f64 = 0.05;
/// Segments shorter than this never spawn splatter.
pub const LIQUID_SPLATTER_MIN_DISTANCE: f32 = 10.0;
pub const LIQUID_SPLATTER_MAX_GROWTH: f32 = 0.3;

// Graphite brush

/// Maximum number of tracked points kept in the history.
pub const GRAPHITE_HISTORY_CAPACITY: usize = 10;
/// Segment length is divided by this "time unit" to get a speed.
pub const GRAPHITE_TIME_UNIT: f32 = 5.0;
pub const GRAPHITE_MAX_SPEED: f32 = 10.0;
/// How strongly speed thins the line.
pub const GRAPHITE_THINNING: f32 = 0.5;
pub const GRAPHITE_MIN_PRESSURE: f32 = 0.2;
pub const GRAPHITE_MAX_PRESSURE: f32 = 1.0;
pub const GRAPHITE_LINE_ALPHA: f32 = 0.8;
pub const GRAPHITE_DOT_ALPHA: f32 = 0.7;
/// One graphite speck per this many pixels of segment.
pub const GRAPHITE_SPECK_SPACING: f32 = 2.0;

// Living brush

/// Particle lifetime in ticks.
pub const LIVING_LIFESPAN: u32 = 300;
pub const LIVING_GRAVITY: f32 = 0.05;
pub const LIVING_WIND: f32 = 0.02;
/// Multiplicative size decay per tick (0.7% per frame).
pub const LIVING_EVAPORATION: f32 = 0.993;
/// Particles at or below this size are invisible and get dropped.
pub const LIVING_VISIBILITY_FLOOR: f32 = 0.5;
/// Extra pixels erased around a particle before it moves.
pub const LIVING_ERASE_MARGIN: f32 = 2.0;
pub const LIVING_MAX_STEP: f32 = 5.0;
pub const LIVING_ALPHA_SCALE: f32 = 0.8;
