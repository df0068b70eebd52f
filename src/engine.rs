//=========================================================================
// Deco Stage Engine
//
// Main entry point: owns the window thread and the core thread.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(build_shell)──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ spawns core thread (AppShell)
//         ├─ with_channel_capacity() └─ runs platform
//         └─ with_settings()            blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::app::AppShell;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::settings::Settings;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (shell ticks per second)
/// - **Channel capacity**: 128 events
/// - **Settings**: [`Settings::default`]
///
/// # Examples
///
/// ```no_run
/// use std::rc::Rc;
/// use deco_stage::prelude::*;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .build()
///     .run(|settings| {
///         let assets = AssetContext::from_backend(Rc::new(MemoryBackend::new()));
///         let mut shell = AppShell::new(assets, settings.clone());
///         shell.register_scene("main", |app| SceneContainer::new("main", app, [], ()));
///         shell
///     });
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    settings: Settings,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            settings: Settings::default(),
        }
    }

    /// Sets the target ticks per second for the core thread.
    ///
    /// Each tick drains app events, follows navigation and advances any
    /// in-flight scene transition by one step.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Window title, surface size and app-wide constants.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Engine {
        info!(target: "app", "Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        Engine {
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            settings: self.settings,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Deco Stage runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Core Thread @ TPS)
///   │     └─► AppShell → SceneContainer
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Pointer Polling
///
/// Communication: crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    tps: f64,
    channel_capacity: usize,
    settings: Settings,
}

impl Engine {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the window closes.
    ///
    /// `build_shell` runs on the core thread, which then owns the shell.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → core channel
    /// 2. Spawns the core thread, which builds the shell and mounts the
    ///    store's current view
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close the core thread shuts the shell down and exits
    pub fn run<F>(self, build_shell: F)
    where
        F: FnOnce(&Settings) -> AppShell + Send + 'static,
    {
        info!(target: "app", "Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Spawn the core thread -------------------------------------
        let platform = Platform::new(tx, &self.settings);
        let core_handle = CoreSystemsOrchestrator::new(rx).spawn_core_thread(
            build_shell,
            self.settings,
            self.tps,
        );
        info!(target: "app", "Core thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        if let Err(e) = platform.run() {
            error!(target: "platform", "Platform error: {}", e);
        }

        info!(target: "platform", "Platform event loop exited");

        //--- 4. Cleanup: Wait for core thread to terminate ---------------
        match core_handle.join() {
            Ok(()) => info!(target: "app", "Core thread terminated cleanly"),
            Err(e) => error!(target: "app", "Core thread panicked: {:?}", e),
        }

        info!(target: "app", "Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.settings, Settings::default());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = EngineBuilder::new().with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn build_carries_settings() {
        let settings = Settings {
            title: "Sticker Book".into(),
            ..Settings::default()
        };
        let engine = EngineBuilder::new().with_settings(settings).build();

        assert_eq!(engine.settings().title, "Sticker Book");
        assert_eq!(engine.tps, 60.0);
    }
}
