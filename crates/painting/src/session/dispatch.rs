//! Routing of host messages into the session

use brushwork_ipc::{ClientMessage, PointerEvent, SessionCommand};
use glam::Vec2;
use tracing::warn;

use crate::error::PaintError;
use crate::render::RenderTarget;
use crate::scheduler::FrameScheduler;
use crate::types::ColorRgb;

use super::BrushSession;

impl<T: RenderTarget, S: FrameScheduler> BrushSession<T, S> {
    /// Apply a UI command. Rejected settings leave the session unchanged.
    pub fn handle_command(&mut self, command: &SessionCommand) -> Result<(), PaintError> {
        match command {
            SessionCommand::SetBrushType { name } => {
                self.select_brush_type(name);
            }
            SessionCommand::SetBrushSize { size } => self.resize_brush(*size)?,
            SessionCommand::SetBrushColor { color } => {
                let color = ColorRgb::try_from(color).inspect_err(|err| {
                    warn!("set_brush_color rejected: {}", err);
                })?;
                self.recolor_brush(color);
            }
            SessionCommand::Clear => self.clear_surface(),
        }
        Ok(())
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => self.pointer_down(Vec2::new(x, y)),
            PointerEvent::Move { x, y } => self.pointer_move(Vec2::new(x, y)),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    pub fn handle_message(&mut self, message: &ClientMessage) -> Result<(), PaintError> {
        match message {
            ClientMessage::Command(command) => self.handle_command(command),
            ClientMessage::Pointer(event) => {
                self.handle_pointer(*event);
                Ok(())
            }
        }
    }
}
