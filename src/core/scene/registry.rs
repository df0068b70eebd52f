//=========================================================================
// Scene Registry
//=========================================================================
//
// Named scene factories.
//
// A scene instance lives exactly once, so the registry stores how to
// build a scene rather than the scene itself. Every switch constructs a
// fresh instance.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::SceneContainer;
use crate::core::app::AppContext;

//=== SceneFactory ========================================================

/// Builds a fresh scene instance for the given app context.
pub type SceneFactory = Rc<dyn Fn(&AppContext) -> SceneContainer>;

//=== SceneRegistry =======================================================

#[derive(Default)]
pub struct SceneRegistry {
    factories: HashMap<String, SceneFactory>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&AppContext) -> SceneContainer + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Rc::new(factory)).is_some() {
            warn!(target: "scene", "Scene {:?} was already registered and has been replaced", name);
        } else {
            debug!(target: "scene", "Registered scene {:?}", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Shared handle to the factory registered under `name`.
    pub fn factory(&self, name: &str) -> Option<SceneFactory> {
        self.factories.get(name).cloned()
    }

    /// Constructs a new instance of the scene registered under `name`.
    pub fn build(&self, name: &str, app: &AppContext) -> Option<SceneContainer> {
        self.factories.get(name).map(|factory| factory(app))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
