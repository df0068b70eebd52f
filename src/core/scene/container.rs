//=========================================================================
// Scene Container
//=========================================================================
//
// Full-screen resource container with a one-shot initialize /
// uninitialize envelope.
//
// State machine:
//   Constructed → Initializing → Ready → Running ⇄ Paused
//                                  │        │        │
//                                  └────────┴────────┴─► Uninitializing → Disposed
//
// Every transition is checked; a call the current state does not allow
// returns a `LifecycleError` and runs no hook.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::click_effect::ClickEffect;
use super::SceneBehavior;
use crate::core::app::AppContext;
use crate::core::assets::{AssetContext, LoadReport, NodeId, ResourceItem, ResourceSet};
use crate::core::error::LifecycleError;
use crate::core::events::{AppEvent, EventParameter, EventSender, EventSource};
use crate::core::input::PointerEvent;
use crate::core::lifecycle::Lifecycle;
use crate::core::settings::Settings;
use crate::core::store::ActivityStore;

//=== SceneState ==========================================================

/// Lifecycle position of a scene instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    Constructed,
    Initializing,
    Ready,
    Running,
    Paused,
    Uninitializing,
    Disposed,
}

impl SceneState {
    /// Resources are loaded and the scene may be torn down.
    pub fn is_live(self) -> bool {
        matches!(self, SceneState::Ready | SceneState::Running | SceneState::Paused)
    }
}

//=== SceneCore ===========================================================

/// Scene data visible to [`SceneBehavior`] hooks.
pub struct SceneCore {
    name: String,
    resources: ResourceSet,
    enabled: bool,
    events: EventSender,
    store: ActivityStore,
    settings: Rc<Settings>,
}

impl SceneCore {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceSet {
        &mut self.resources
    }

    pub fn assets(&self) -> &AssetContext {
        self.resources.context()
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Asks the app for an action. One-way; nothing comes back.
    pub fn fire_scene_event(&self, name: &str, parameter: Option<EventParameter>) {
        self.events.fire(AppEvent {
            source: EventSource::Scene,
            sender: self.name.clone(),
            name: name.to_string(),
            parameter,
        });
    }
}

//=== SceneContainer ======================================================

pub struct SceneContainer {
    core: SceneCore,
    state: SceneState,
    click_effect: ClickEffect,
    behavior: Box<dyn SceneBehavior>,
}

impl SceneContainer {
    //--- Construction -----------------------------------------------------

    /// Declares the scene's resources. Nothing is loaded yet.
    pub fn new<B>(
        name: impl Into<String>,
        app: &AppContext,
        items: impl IntoIterator<Item = ResourceItem>,
        behavior: B,
    ) -> Self
    where
        B: SceneBehavior + 'static,
    {
        let settings = Rc::clone(&app.settings);
        let mut resources = ResourceSet::new(app.assets.clone(), items)
            .with_video_fps(settings.video_update_fps);

        let click_effect = ClickEffect::new(&settings);
        click_effect.declare(&mut resources);

        app.assets
            .surface()
            .set_z_index(resources.node(), settings.scene_z_index);

        Self {
            core: SceneCore {
                name: name.into(),
                resources,
                enabled: true,
                events: app.events.clone(),
                store: app.store.clone(),
                settings,
            },
            state: SceneState::Constructed,
            click_effect,
            behavior: Box::new(behavior),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Loads resources, wires the click effect and runs `on_loaded`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyInitialized`] unless the scene is freshly
    /// constructed. Nothing is loaded in that case.
    pub async fn initialize_scene(&mut self) -> Result<LoadReport, LifecycleError> {
        if self.state != SceneState::Constructed {
            warn!(target: "scene", "{}: initialize ignored while {:?}", self.core.name, self.state);
            return Err(LifecycleError::AlreadyInitialized {
                name: self.core.name.clone(),
            });
        }

        self.state = SceneState::Initializing;
        debug!(target: "scene", "{}: initializing", self.core.name);

        let report = self.core.resources.load().await?;

        let z_index = self.core.settings.top_most_z_index;
        self.click_effect.wire(&self.core.resources, z_index);
        self.behavior.on_loaded(&mut self.core);

        self.state = SceneState::Ready;
        info!(target: "scene", "{}: ready ({} loaded, {} failed)",
            self.core.name, report.loaded.len(), report.failed.len());
        Ok(report)
    }

    /// Runs the quit hook, then releases the click effect and resources.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotInitialized`] unless the scene is Ready,
    /// Running or Paused.
    pub async fn uninitialize_scene(&mut self) -> Result<(), LifecycleError> {
        if !self.state.is_live() {
            warn!(target: "scene", "{}: uninitialize ignored while {:?}", self.core.name, self.state);
            return Err(LifecycleError::NotInitialized {
                name: self.core.name.clone(),
            });
        }

        self.state = SceneState::Uninitializing;
        debug!(target: "scene", "{}: uninitializing", self.core.name);

        // Quit may still read resources; release happens after.
        self.behavior.quit(&mut self.core);
        self.click_effect.unwire(&self.core.resources);

        if let Err(err) = self.core.resources.unload().await {
            warn!(target: "scene", "{}: {}", self.core.name, err);
        }

        self.state = SceneState::Disposed;
        info!(target: "scene", "{}: disposed", self.core.name);
        Ok(())
    }

    pub fn run_scene(&mut self) -> Result<(), LifecycleError> {
        self.transition(SceneState::Ready, SceneState::Running, "run")?;
        self.behavior.run(&mut self.core);
        Ok(())
    }

    pub fn pause_scene(&mut self) -> Result<(), LifecycleError> {
        self.transition(SceneState::Running, SceneState::Paused, "pause")?;
        self.behavior.pause(&mut self.core);
        Ok(())
    }

    pub fn resume_scene(&mut self) -> Result<(), LifecycleError> {
        self.transition(SceneState::Paused, SceneState::Running, "resume")?;
        self.behavior.resume(&mut self.core);
        Ok(())
    }

    fn transition(
        &mut self,
        from: SceneState,
        to: SceneState,
        action: &'static str,
    ) -> Result<(), LifecycleError> {
        if self.state != from {
            return Err(LifecycleError::InvalidTransition {
                name: self.core.name.clone(),
                from: self.state,
                action,
            });
        }
        debug!(target: "scene", "{}: {:?} -> {:?}", self.core.name, from, to);
        self.state = to;
        Ok(())
    }

    //--- Input ------------------------------------------------------------

    /// Delivers a pointer event: click feedback on down, then the behavior.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.state.is_live() {
            trace!(target: "scene", "{}: pointer dropped while {:?}", self.core.name, self.state);
            return;
        }

        if let PointerEvent::Down { x, y } = event {
            self.click_effect.trigger(self.core.resources.context(), x, y);
        }
        self.behavior.on_pointer(&mut self.core, event);
    }

    pub fn hide_click_effect(&self) {
        self.click_effect.hide(self.core.resources.context());
    }

    //--- Delegation -------------------------------------------------------

    pub fn enable(&mut self, enabled: bool) {
        self.core.enable(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    pub fn fire_scene_event(&self, name: &str, parameter: Option<EventParameter>) {
        self.core.fire_scene_event(name, parameter);
    }

    //--- Accessors --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn node(&self) -> NodeId {
        self.core.resources.node()
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.core.resources
    }

    pub fn core(&self) -> &SceneCore {
        &self.core
    }

    pub fn click_effect(&self) -> &ClickEffect {
        &self.click_effect
    }
}

impl Lifecycle for SceneContainer {
    fn initialize(&mut self) -> LocalBoxFuture<'_, Result<(), LifecycleError>> {
        async move { self.initialize_scene().await.map(|_| ()) }.boxed_local()
    }

    fn uninitialize(&mut self) -> LocalBoxFuture<'_, Result<(), LifecycleError>> {
        self.uninitialize_scene().boxed_local()
    }

    fn is_running(&self) -> bool {
        self.state == SceneState::Running
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
