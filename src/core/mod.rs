//=========================================================================
// Core Systems Orchestrator
//
// Drives the app shell on the logic (non-platform) thread.
//
// Responsibilities:
// - Build the app shell on the thread that owns it
// - Receive platform events via the crossbeam channel
// - Forward pointer and focus changes to the active scene
// - Tick the shell at a fixed rate (TPS) and shut it down on exit
//
// Notes:
// The shell holds `Rc` state and never crosses threads. Only its factory
// and the settings are moved into the core thread.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod app;
pub mod assets;
pub mod error;
pub mod events;
pub mod input;
pub mod lifecycle;
pub(crate) mod platform_bridge;
pub mod scene;
pub mod settings;
pub mod store;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_utils;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use app::AppShell;
use platform_bridge::{CoreSignal, EventCollector, PlatformEvent, TickControl};
use settings::Settings;

//=== CoreSystemsOrchestrator =============================================

pub(crate) struct CoreSystemsOrchestrator {
    collector: EventCollector,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            collector: EventCollector::new(receiver),
        }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Builds the shell on a fresh thread and runs it until the window
    // closes or the platform hangs up.
    //
    pub(crate) fn spawn_core_thread<F>(
        self,
        build_shell: F,
        settings: Settings,
        tps: f64,
    ) -> thread::JoinHandle<()>
    where
        F: FnOnce(&Settings) -> AppShell + Send + 'static,
    {
        thread::spawn(move || {
            let mut shell = build_shell(&settings);
            self.run(&mut shell, tps);
        })
    }

    //--- run() ------------------------------------------------------------
    //
    // Each tick:
    //  1. Collects platform events
    //  2. Forwards pointer and focus signals to the shell
    //  3. Advances the shell (events, navigation, transitions)
    //  4. Sleeps to maintain fixed pacing
    //
    pub(crate) fn run(mut self, shell: &mut AppShell, tps: f64) {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        if let Err(err) = shell.start_scene() {
            error!(target: "app", "Failed to start the initial scene: {}", err);
        }

        loop {
            let frame_start = Instant::now();

            if self.collector.collect_frame() == TickControl::Exit {
                info!(target: "app", "Core thread exiting");
                break;
            }

            self.dispatch(shell);
            shell.tick();

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        shell.shutdown();
    }

    fn dispatch(&mut self, shell: &mut AppShell) {
        for signal in self.collector.take_signals() {
            let result = match signal {
                CoreSignal::Pointer(event) => {
                    shell.dispatch_pointer(event);
                    Ok(())
                }
                CoreSignal::Suspended => shell.pause_scene(),
                CoreSignal::Resumed => shell.resume_scene(),
            };
            if let Err(err) = result {
                warn!(target: "app", "Focus change ignored: {}", err);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
