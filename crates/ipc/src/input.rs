//! Pointer input, normalized by the host to a single pointer in
//! surface-local coordinates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    /// The pointer left the surface; ends a stroke like `Up`
    Leave,
}

impl PointerEvent {
    /// Position carried by the event, if any
    pub fn position(&self) -> Option<[f32; 2]> {
        match *self {
            PointerEvent::Down { x, y } | PointerEvent::Move { x, y } => Some([x, y]),
            PointerEvent::Up | PointerEvent::Leave => None,
        }
    }
}
