//! Orbit camera state and the input state machine that drives it.

use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Pointer button roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Rotate drag (left button).
    Primary,
    /// Pan drag (right button).
    Secondary,
    /// Anything else; ignored.
    Other,
}

/// Wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Away from the user: zoom in.
    Up,
    /// Towards the user: zoom out.
    Down,
}

/// Commands the viewer loop acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Advance to the next object.
    NextObject,
    /// Go back to the previous object.
    PreviousObject,
    /// Stop the viewer.
    Quit,
}

/// Platform-independent input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonPressed(PointerButton),
    ButtonReleased(PointerButton),
    /// Pointer motion since the previous event, in pixels.
    PointerMoved { dx: f32, dy: f32 },
    Scroll(ScrollDirection),
    Command(ViewerCommand),
}

/// Orbit camera parameters.
///
/// Angles are in degrees, pan offsets in pointer pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub yaw: f32,
    /// Kept for a future pitch control; nothing writes it today.
    pub pitch: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
    pub rotating: bool,
    pub panning: bool,
}

impl CameraState {
    /// Initial state at the given zoom distance.
    pub fn new(zoom: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
            zoom,
            rotating: false,
            panning: false,
        }
    }

    /// Model-view transform: translate by the pan and zoom, then pitch, then yaw.
    pub fn model_view(&self, pan_divisor: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(
            self.pan_x / pan_divisor,
            self.pan_y / pan_divisor,
            -self.zoom,
        )) * Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.yaw.to_radians())
    }
}

/// Owns the [`CameraState`] and applies input events to it.
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    zoom_step: f32,
    min_zoom: f32,
}

impl CameraController {
    /// Creates a controller from camera options.
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            state: CameraState::new(options.initial_zoom.max(options.min_zoom)),
            zoom_step: options.zoom_step,
            min_zoom: options.min_zoom,
        }
    }

    /// Current camera state.
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Applies one event. Commands are handed back to the caller.
    pub fn handle(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        let state = &mut self.state;
        match event {
            InputEvent::ButtonPressed(PointerButton::Primary) => state.rotating = true,
            InputEvent::ButtonReleased(PointerButton::Primary) => state.rotating = false,
            InputEvent::ButtonPressed(PointerButton::Secondary) => state.panning = true,
            InputEvent::ButtonReleased(PointerButton::Secondary) => state.panning = false,
            InputEvent::ButtonPressed(PointerButton::Other)
            | InputEvent::ButtonReleased(PointerButton::Other) => {}
            InputEvent::PointerMoved { dx, dy } => {
                if state.rotating {
                    // Vertical motion does not tilt the camera.
                    state.yaw += dx;
                }
                if state.panning {
                    state.pan_x += dx;
                    state.pan_y -= dy;
                }
            }
            InputEvent::Scroll(ScrollDirection::Up) => {
                state.zoom = (state.zoom - self.zoom_step).max(self.min_zoom);
            }
            InputEvent::Scroll(ScrollDirection::Down) => state.zoom += self.zoom_step,
            InputEvent::Command(command) => return Some(command),
        }
        None
    }
}
