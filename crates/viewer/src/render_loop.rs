use orbitview_orbit::Orbitable;
use orbitview_render::{Renderable, Scene};

use crate::interaction::InteractionController;
use crate::viewport::Viewport;

/// Per-frame driver.
///
/// Each frame applies pending drag movement to the model, steps the orbit
/// layer, then draws, in that order. A stopped loop does nothing.
#[derive(Debug, Default)]
pub struct RenderLoop {
    running: bool,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!("render loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(frames = self.frames, "render loop stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. Returns false if the loop is stopped.
    pub fn frame<R: Renderable, O: Orbitable>(
        &mut self,
        controller: &mut InteractionController,
        orbit: &mut O,
        viewport: &mut Viewport<R>,
        scene: &mut Scene,
    ) -> bool {
        if !self.running {
            return false;
        }
        let _span = tracing::info_span!("frame", n = self.frames).entered();

        controller.apply_drag(scene);
        controller.step_orbit(orbit, viewport.camera_mut());
        viewport.render(scene);

        self.frames += 1;
        true
    }
}
