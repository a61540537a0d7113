use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use orbitview_common::NodeId;
use orbitview_input::InputEvent;
use orbitview_orbit::Orbitable;
use orbitview_render::{PerspectiveCamera, Scene};

use crate::loader::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// Pointer bookkeeping for the manual drag layer.
///
/// `dragging` is true exactly when the most recent press has not been
/// matched by a release. `previous` is the position the model rotation was
/// last synced to; `current` is the latest pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    dragging: bool,
    previous: Vec2,
    current: Vec2,
}

impl PointerState {
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    pub fn phase(&self) -> DragPhase {
        if self.dragging {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Movement not yet applied to the model.
    pub fn delta(&self) -> Vec2 {
        self.current - self.previous
    }
}

/// Translates pointer drags into model rotation, and hands the orbit layer
/// its pivot and per-frame step.
///
/// Drag rotation is a model transform; orbiting is a camera transform. The
/// two are independent and both act on a primary-button drag.
#[derive(Debug)]
pub struct InteractionController {
    pointer: PointerState,
    sensitivity: f32,
    model: Option<NodeId>,
}

impl InteractionController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            pointer: PointerState::default(),
            sensitivity,
            model: None,
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.pointer = PointerState {
            dragging: true,
            previous: position,
            current: position,
        };
        tracing::trace!(?position, "drag started");
    }

    /// Moves outside a drag are ignored.
    pub fn pointer_move(&mut self, position: Vec2) {
        if self.pointer.dragging {
            self.pointer.current = position;
        }
    }

    pub fn pointer_up(&mut self) {
        if self.pointer.dragging {
            tracing::trace!(position = ?self.pointer.current, "drag ended");
        }
        self.pointer.dragging = false;
    }

    /// Feed a window pointer event. Returns whether it was a pointer event.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { position, .. } => self.pointer_down(position),
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Resized(_) | InputEvent::Wheel { .. } => return false,
        }
        true
    }

    /// Make `model` the drag target and move the orbit pivot to its center.
    pub fn attach_model<O: Orbitable>(
        &mut self,
        model: &Model,
        orbit: &mut O,
        camera: &mut PerspectiveCamera,
    ) {
        self.model = Some(model.node);
        orbit.set_target(model.center);
        orbit.update(camera);
    }

    pub fn detach_model(&mut self) -> Option<NodeId> {
        self.model.take()
    }

    /// Apply the pending drag movement to the model's rotation.
    ///
    /// Horizontal movement turns the model about Y, vertical movement tilts
    /// it about X, and the tilt is held within ±π/2. Does nothing, and keeps
    /// the pending movement, while no model is attached. Returns the applied
    /// pixel delta.
    pub fn apply_drag(&mut self, scene: &mut Scene) -> Option<Vec2> {
        if !self.pointer.dragging {
            return None;
        }
        let node = scene.get_mut(self.model?)?;

        let delta = self.pointer.delta();
        let rotation = &mut node.transform.rotation;
        rotation.y += delta.x * self.sensitivity;
        rotation.x += delta.y * self.sensitivity;
        rotation.x = rotation.x.clamp(-FRAC_PI_2, FRAC_PI_2);

        self.pointer.previous = self.pointer.current;
        Some(delta)
    }

    /// Advance the orbit layer by one frame.
    pub fn step_orbit<O: Orbitable>(&self, orbit: &mut O, camera: &mut PerspectiveCamera) -> bool {
        orbit.update(camera)
    }
}
