//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit mouse and touch events into engine PointerEvents.
//
// Architecture:
//   Winit Events → InputProcessor → PointerEvent (engine type) → InputBuffer
//
// Stateful tracking: caches the last cursor position (button events carry
// none), whether the primary button is held, and whether the cursor is
// inside the window. A release while outside becomes `UpOutside`.
// Only the left button and the first active touch act as the pointer.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton, TouchPhase};

//=== Internal Dependencies ===============================================

use crate::core::input::PointerEvent;

//=== InputProcessor ======================================================

/// Converts Winit events to PointerEvents with stateful cursor tracking.
pub(crate) struct InputProcessor {
    position: (f32, f32),
    surface: (f32, f32),
    inside: bool,
    pressed: bool,
    touch: Option<u64>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            position: (0.0, 0.0),
            surface: (width as f32, height as f32),
            inside: false,
            pressed: false,
            touch: None,
        }
    }

    //--- Window State -----------------------------------------------------

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.surface = (width as f32, height as f32);
    }

    pub(crate) fn cursor_entered(&mut self) {
        self.inside = true;
    }

    pub(crate) fn cursor_left(&mut self) {
        self.inside = false;
    }

    pub(crate) fn is_pressed(&self) -> bool {
        self.pressed
    }

    //--- Event Processing -------------------------------------------------

    /// Records the position; emits a move only while inside the surface.
    pub(crate) fn process_mouse_move(&mut self, x: f32, y: f32) -> Option<PointerEvent> {
        self.position = (x, y);
        self.within_surface().then_some(PointerEvent::Move { x, y })
    }

    /// Left button only. Releases without a matching press are dropped.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }

        let (x, y) = self.position;
        match state {
            ElementState::Pressed => {
                if !self.within_surface() {
                    return None;
                }
                self.pressed = true;
                Some(PointerEvent::Down { x, y })
            }
            ElementState::Released => self.release(x, y),
        }
    }

    /// Follows the first finger down until it lifts.
    pub(crate) fn process_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        x: f32,
        y: f32,
    ) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started if self.touch.is_none() => {
                self.touch = Some(id);
                self.position = (x, y);
                self.pressed = true;
                Some(PointerEvent::Down { x, y })
            }
            TouchPhase::Moved if self.touch == Some(id) => {
                self.position = (x, y);
                Some(PointerEvent::Move { x, y })
            }
            TouchPhase::Ended if self.touch == Some(id) => {
                self.position = (x, y);
                let event = self.release(x, y);
                self.touch = None;
                event
            }
            TouchPhase::Cancelled if self.touch == Some(id) => {
                self.touch = None;
                self.pressed = false;
                Some(PointerEvent::UpOutside { x, y })
            }
            _ => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn release(&mut self, x: f32, y: f32) -> Option<PointerEvent> {
        if !std::mem::take(&mut self.pressed) {
            return None;
        }
        if self.within_surface() {
            Some(PointerEvent::Up { x, y })
        } else {
            Some(PointerEvent::UpOutside { x, y })
        }
    }

    fn within_surface(&self) -> bool {
        let (x, y) = self.position;
        let (width, height) = self.surface;
        self.inside || (self.touch.is_some() && x >= 0.0 && y >= 0.0 && x < width && y < height)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
