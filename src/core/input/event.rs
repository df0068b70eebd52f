//=========================================================================
// Pointer Event Types
//
// Portable representation of pointer input delivered to the mounted
// scene's root node.
//
// Mouse and touch are folded into a single pointer: the platform layer
// maps the primary button and the first touch onto the same four
// phases. Coordinates are window pixels as the platform reports them.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    PointerEvent (this module)
//         ↓
//    AppShell::dispatch_pointer
//         ↓
//    SceneContainer (click effect, then scene behavior)
// ```
//
//=========================================================================

//=== PointerPhase ========================================================

/// Which part of a press gesture an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Released after leaving the surface.
    UpOutside,
}

//=== PointerEvent ========================================================

/// Single pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    UpOutside { x: f32, y: f32 },
}

impl PointerEvent {
    pub fn phase(&self) -> PointerPhase {
        match self {
            PointerEvent::Down { .. } => PointerPhase::Down,
            PointerEvent::Move { .. } => PointerPhase::Move,
            PointerEvent::Up { .. } => PointerPhase::Up,
            PointerEvent::UpOutside { .. } => PointerPhase::UpOutside,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        match *self {
            PointerEvent::Down { x, y }
            | PointerEvent::Move { x, y }
            | PointerEvent::Up { x, y }
            | PointerEvent::UpOutside { x, y } => (x, y),
        }
    }

    pub fn is_down(&self) -> bool {
        self.phase() == PointerPhase::Down
    }

    /// Moves can be coalesced: only the latest position matters.
    pub fn is_continuous(&self) -> bool {
        self.phase() == PointerPhase::Move
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_and_position_agree_with_variant() {
        let event = PointerEvent::UpOutside { x: 4.0, y: -2.0 };
        assert_eq!(event.phase(), PointerPhase::UpOutside);
        assert_eq!(event.position(), (4.0, -2.0));
        assert!(!event.is_down());
    }

    #[test]
    fn only_moves_are_continuous() {
        assert!(PointerEvent::Move { x: 0.0, y: 0.0 }.is_continuous());
        assert!(!PointerEvent::Down { x: 0.0, y: 0.0 }.is_continuous());
        assert!(!PointerEvent::Up { x: 0.0, y: 0.0 }.is_continuous());
    }
}
