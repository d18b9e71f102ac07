//! Brushwork painting system - procedural brushes over a raster canvas
//!
//! This crate provides the brush rendering and animation engine:
//! - [`render`] - Immediate-mode drawing interface and the software [`Canvas`]
//! - [`surface`] - CPU straight-alpha RGBA surface
//! - [`tiles`] - Tile management with dirty tracking
//! - [`brush`] - The stroke protocol and the waxy, liquid, graphite and living brushes
//! - [`animation`] - Particle physics and the self-terminating frame loop
//! - [`scheduler`] - Frame callback scheduling with cancellable handles
//! - [`session`] - Controller owning the active brush, surface and scheduler

pub mod animation;
pub mod brush;
pub mod constants;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod texture;
pub mod tiles;
pub mod types;

pub use animation::*;
pub use brush::*;
pub use constants::*;
pub use error::*;
pub use render::*;
pub use scheduler::*;
pub use session::*;
pub use surface::*;
pub use texture::*;
pub use tiles::*;
pub use types::*;
