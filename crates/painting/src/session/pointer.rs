//! Pointer path handling for the brush session

use glam::Vec2;
use tracing::{debug, info};

use crate::render::RenderTarget;
use crate::scheduler::FrameScheduler;

use super::BrushSession;

impl<T: RenderTarget, S: FrameScheduler> BrushSession<T, S> {
    /// Begin a stroke at `point`
    pub fn pointer_down(&mut self, point: Vec2) {
        self.brush.start_stroke(&mut self.target, point);
        self.pressing = true;
        self.last_point = point;
        debug!("pointer_down: ({:.1}, {:.1})", point.x, point.y);
    }

    /// Extend the current stroke. Ignored unless the pointer is down.
    pub fn pointer_move(&mut self, point: Vec2) {
        if !self.pressing {
            return;
        }
        self.brush
            .continue_stroke(&mut self.target, self.last_point, point);
        self.last_point = point;
    }

    /// Finish the current stroke. Safe to call when no stroke is active.
    pub fn pointer_up(&mut self) {
        if !self.pressing {
            return;
        }
        self.pressing = false;

        let was_animating = self.brush.is_animating();
        self.brush.end_stroke(&mut self.target, &mut self.scheduler);
        if !was_animating && self.brush.is_animating() {
            info!("Animation started");
        }
    }

    /// The pointer left the surface; ends the stroke like `pointer_up`
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}
