//=========================================================================
// Input Buffer
//
// Collects pointer events between two platform frame boundaries and
// splits them into discrete and continuous categories.
//
// Responsibilities:
// - Keep presses and releases in arrival order
// - Coalesce moves to the latest position
// - Hand one frame's worth of events to the platform via `drain()`
//
// Notes:
// A press or release flushes the pending move into the discrete list
// first, so a drag that ends in the same frame keeps its final position
// ahead of the release.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::PointerEvent;

//=== InputBuffer Struct ==================================================
pub(crate) struct InputBuffer {
    discrete: Vec<PointerEvent>,
    continuous: Option<PointerEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 16;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: None,
        }
    }

    //--- Event Handling ---------------------------------------------------
    pub(crate) fn push(&mut self, event: PointerEvent) {
        if event.is_continuous() {
            self.continuous = Some(event);
            return;
        }

        if let Some(pending) = self.continuous.take() {
            self.discrete.push(pending);
        }
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns this frame's (discrete, continuous) events, or `None` when
    // nothing was buffered.
    //
    pub(crate) fn drain(&mut self) -> Option<(Vec<PointerEvent>, Vec<PointerEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.continuous.take().into_iter().collect();
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + usize::from(self.continuous.is_some())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down { x, y }
    }

    fn mv(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move { x, y }
    }

    #[test]
    fn moves_are_coalesced() {
        let mut buffer = InputBuffer::new();
        buffer.push(mv(10.0, 10.0));
        buffer.push(mv(20.0, 30.0));

        assert_eq!(buffer.len(), 1);
        let (discrete, continuous) = buffer.drain().expect("buffered");
        assert!(discrete.is_empty());
        assert_eq!(continuous, vec![mv(20.0, 30.0)]);
    }

    #[test]
    fn release_keeps_the_move_before_it() {
        let mut buffer = InputBuffer::new();
        buffer.push(down(0.0, 0.0));
        buffer.push(mv(5.0, 5.0));
        buffer.push(mv(8.0, 9.0));
        buffer.push(PointerEvent::Up { x: 8.0, y: 9.0 });

        let (discrete, continuous) = buffer.drain().expect("buffered");
        assert_eq!(
            discrete,
            vec![down(0.0, 0.0), mv(8.0, 9.0), PointerEvent::Up { x: 8.0, y: 9.0 }]
        );
        assert!(continuous.is_empty());
    }

    #[test]
    fn repeated_discrete_event_is_ignored() {
        let mut buffer = InputBuffer::new();
        buffer.push(down(1.0, 1.0));
        buffer.push(down(1.0, 1.0));

        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn drain_clears_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push(down(1.0, 1.0));
        buffer.push(mv(2.0, 2.0));

        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }
}
