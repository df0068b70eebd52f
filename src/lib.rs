//=========================================================================
// Deco Stage — Library Root
//
// Resource-managed scene and widget lifecycle for an interactive
// character decoration activity.
//
// Responsibilities:
// - Expose the scene / widget containers and their resource sets (`core`)
// - Expose the engine facade that runs an `AppShell` behind a window
// - Keep the winit integration (`platform`) private
//
// Typical usage:
// ```no_run
// use std::rc::Rc;
// use deco_stage::prelude::*;
//
// fn main() {
//     EngineBuilder::new().build().run(|settings| {
//         let assets = AssetContext::from_backend(Rc::new(MemoryBackend::new()));
//         let mut shell = AppShell::new(assets, settings.clone());
//         shell.register_scene("main", |app| SceneContainer::new("main", app, [], ()));
//         shell
//     });
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
