//=========================================================================
// Transition Queue
//=========================================================================
//
// Scene requests that arrive while a transition is still in flight.
//
// The app shell processes this queue whenever a transition settles, one
// request at a time, in arrival order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== SceneRequest ========================================================

/// Deferred scene-switch state machine input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    /// Replace the current scene with the named one.
    Switch(String),
    /// Tear down the current scene without replacement.
    Close,
}

//=== TransitionQueue =====================================================

#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: VecDeque<SceneRequest>,
}

impl TransitionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `request` unless it repeats the current tail.
    ///
    /// Returns `true` if the request was queued.
    pub fn push(&mut self, request: SceneRequest) -> bool {
        if self.queue.back() == Some(&request) {
            return false;
        }
        self.queue.push_back(request);
        true
    }

    /// Takes the oldest request.
    pub fn pop(&mut self) -> Option<SceneRequest> {
        self.queue.pop_front()
    }

    /// Most recent request.
    pub fn back(&self) -> Option<&SceneRequest> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn switch(name: &str) -> SceneRequest {
        SceneRequest::Switch(name.to_string())
    }

    #[test]
    fn requests_come_out_in_arrival_order() {
        let mut queue = TransitionQueue::new();
        queue.push(switch("drawing"));
        queue.push(SceneRequest::Close);
        queue.push(switch("main"));

        assert_eq!(queue.pop(), Some(switch("drawing")));
        assert_eq!(queue.pop(), Some(SceneRequest::Close));
        assert_eq!(queue.pop(), Some(switch("main")));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn repeated_tail_is_collapsed() {
        let mut queue = TransitionQueue::new();

        assert!(queue.push(switch("drawing")));
        assert!(!queue.push(switch("drawing")));
        assert!(queue.push(switch("main")));
        assert!(queue.push(switch("drawing")), "Only the tail is compared");

        assert_eq!(queue.len(), 3);
    }
}
