//! IPC message protocol for Brushwork
//!
//! Defines the messages a host UI sends to a brush session: direct commands
//! (brush type, size, color, clear) and the normalized pointer path.

mod commands;
mod error;
mod input;
mod messages;

pub use commands::{ColorInput, SessionCommand};
pub use error::IpcError;
pub use input::PointerEvent;
pub use messages::ClientMessage;
