//=========================================================================
// Scene System
//=========================================================================
//
// Full-screen containers and the hooks concrete scenes plug into.
//
// Architecture:
//   SceneContainer
//     ├─ SceneCore      resources, enabled flag, event sender, store
//     ├─ ClickEffect    pointer-down feedback
//     └─ Box<dyn SceneBehavior>
//
// Flow:
//   new() → initialize_scene() → run_scene() ⇄ pause/resume → uninitialize_scene()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::PointerEvent;

//=== Module Declarations =================================================

mod click_effect;
mod container;
mod registry;

//=== Public API ==========================================================

pub use click_effect::ClickEffect;
pub use container::{SceneContainer, SceneCore, SceneState};
pub use registry::{SceneFactory, SceneRegistry};

//=== SceneBehavior Trait =================================================

/// Scene-specific logic composed into a [`SceneContainer`].
///
/// Every hook has an empty default. Hooks never load or unload; the
/// container does that around them.
///
/// # Minimal Implementation
///
/// ```rust
/// # use deco_stage::prelude::*;
/// struct MainMenu;
///
/// impl SceneBehavior for MainMenu {
///     fn run(&mut self, scene: &mut SceneCore) {
///         scene.enable(true);
///     }
/// }
/// ```
pub trait SceneBehavior {
    /// Called once after resources load, before the scene is Ready.
    fn on_loaded(&mut self, _scene: &mut SceneCore) {}

    /// Called when the scene starts running.
    fn run(&mut self, _scene: &mut SceneCore) {}

    fn pause(&mut self, _scene: &mut SceneCore) {}

    fn resume(&mut self, _scene: &mut SceneCore) {}

    /// Called before resources are released. Resources are still loaded.
    fn quit(&mut self, _scene: &mut SceneCore) {}

    /// Pointer input. Ignoring it while disabled is up to the behavior.
    fn on_pointer(&mut self, _scene: &mut SceneCore, _event: PointerEvent) {}
}

/// Placeholder scene with no logic of its own.
impl SceneBehavior for () {}
