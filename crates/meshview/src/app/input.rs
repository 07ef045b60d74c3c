//! Translation of winit window events into viewer input.

use meshview_core::{InputEvent, PointerButton, ScrollDirection, ViewerCommand};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Stateful mapper from [`WindowEvent`] to [`InputEvent`].
///
/// Cursor positions are absolute in winit, so the last one is kept to produce deltas.
#[derive(Debug, Default)]
pub struct InputTranslator {
    cursor: Option<(f64, f64)>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps one window event. Events the viewer does not care about yield `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::Command(ViewerCommand::Quit)),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => key_command(*code).map(InputEvent::Command),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = pointer_button(*button);
                Some(match state {
                    ElementState::Pressed => InputEvent::ButtonPressed(button),
                    ElementState::Released => InputEvent::ButtonReleased(button),
                })
            }
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => scroll_direction(delta).map(InputEvent::Scroll),
            _ => None,
        }
    }

    fn cursor_moved(&mut self, x: f64, y: f64) -> Option<InputEvent> {
        let previous = self.cursor.replace((x, y))?;
        let dx = (x - previous.0) as f32;
        let dy = (y - previous.1) as f32;
        (dx != 0.0 || dy != 0.0).then_some(InputEvent::PointerMoved { dx, dy })
    }
}

fn key_command(code: KeyCode) -> Option<ViewerCommand> {
    match code {
        KeyCode::Escape => Some(ViewerCommand::Quit),
        KeyCode::KeyP | KeyCode::ArrowRight => Some(ViewerCommand::NextObject),
        KeyCode::KeyO | KeyCode::ArrowLeft => Some(ViewerCommand::PreviousObject),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

fn scroll_direction(delta: &MouseScrollDelta) -> Option<ScrollDirection> {
    let y = match delta {
        MouseScrollDelta::LineDelta(_, y) => f64::from(*y),
        MouseScrollDelta::PixelDelta(pos) => pos.y,
    };
    if y > 0.0 {
        Some(ScrollDirection::Up)
    } else if y < 0.0 {
        Some(ScrollDirection::Down)
    } else {
        None
    }
}
