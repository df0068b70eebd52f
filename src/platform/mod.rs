//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core thread via crossbeam.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  EventCollector  │
//  │   ↓                      │    │  ↓               │
//  │  InputProcessor          │    │  AppShell        │
//  │   ├─ Tracks cursor       │    │   ├─ pointer     │
//  │   └─ Inside / pressed    │    │   ├─ pause/resume│
//  │   ↓                      │    │   └─ tick        │
//  │  InputBuffer             │    │                  │
//  │   ├─ discrete: Vec<>     │    └──────────────────┘
//  │   └─ continuous: latest  │             ↑
//  │   ↓                      │             │
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  Channel ────────────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Frame boundary is RedrawRequested. Empty buffers are not sent.
// Focus loss and app suspension are forwarded as `Suspended`; regaining
// either is forwarded as `Resumed`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::PointerEvent;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::settings::Settings;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window owner and pointer event aggregator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and sends
/// batched events to the core thread. Not Send/Sync.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,
    title: String,
    size: LogicalSize<u32>,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
    focused: bool,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub(crate) fn new(event_sender: Sender<PlatformEvent>, settings: &Settings) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: settings.title.clone(),
            size: LogicalSize::new(settings.surface_width, settings.surface_height),
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(settings.surface_width, settings.surface_height),
            focused: true,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop on the calling thread until the window closes.
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the event loop cannot be created or aborts.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    fn buffer_pointer(&mut self, event: Option<PointerEvent>) {
        match event {
            Some(event) => self.buffer.push(event),
            None => trace!(target: "platform::input", "Pointer event filtered"),
        }
    }

    /// Flushes buffered pointer events to the core thread.
    ///
    /// A disconnected channel drops the events with a warning so the
    /// window can still be closed normally.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            let discrete_count = discrete.len();
            let continuous_count = continuous.len();

            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete_count,
                continuous_count
            );

            if self
                .event_sender
                .send(PlatformEvent::Inputs { discrete, continuous })
                .is_err()
            {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events",
                    discrete_count + continuous_count
                );
            }
        }
    }

    /// Forwards a focus change once per actual change.
    fn set_focus(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;

        let event = if focused {
            PlatformEvent::Resumed
        } else {
            PlatformEvent::Suspended
        };
        debug!(target: "platform", "Focus changed: {:?}", event);
        if self.event_sender.send(event).is_err() {
            warn!(target: "platform", "Channel disconnected, focus change dropped");
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first call; later calls are app resumes.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Application resumed");
            self.set_focus(true);
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(self.size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Application suspended");
        self.set_focus(false);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => self.set_focus(focused),

            WindowEvent::Resized(size) => self.input_processor.resize(size.width, size.height),

            WindowEvent::CursorEntered { .. } => self.input_processor.cursor_entered(),

            WindowEvent::CursorLeft { .. } => self.input_processor.cursor_left(),

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.buffer_pointer(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer_pointer(event);
            }

            WindowEvent::Touch(touch) => {
                let event = self.input_processor.process_touch(
                    touch.id,
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
                self.buffer_pointer(event);
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
