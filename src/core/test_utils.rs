//! Test helpers shared by the core unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::app::AppContext;
use crate::core::assets::{AssetContext, MemoryBackend};
use crate::core::events::{event_channel, EventReceiver};
use crate::core::input::PointerEvent;
use crate::core::scene::{SceneBehavior, SceneCore};
use crate::core::settings::Settings;
use crate::core::store::ActivityStore;
use crate::core::widget::{WidgetBehavior, WidgetCore};

//=== Journal =============================================================

/// Shared, ordered record of hook invocations.
#[derive(Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn contains(&self, entry: &str) -> bool {
        self.0.borrow().iter().any(|e| e == entry)
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }
}

//=== Context =============================================================

/// App context over `backend` with default settings and a fresh store.
pub(crate) fn app_context(backend: &Rc<MemoryBackend>) -> (AppContext, EventReceiver) {
    let (events, receiver) = event_channel();
    let app = AppContext::new(
        AssetContext::from_backend(backend.clone()),
        Rc::new(Settings::default()),
        events,
        ActivityStore::default(),
    );
    (app, receiver)
}

//=== RecordingScene ======================================================

/// Scene behavior that journals every hook as `"<label>:<hook>"`.
pub(crate) struct RecordingScene {
    label: String,
    journal: Journal,
    backend: Option<Rc<MemoryBackend>>,
}

impl RecordingScene {
    pub(crate) fn new(label: &str, journal: &Journal) -> Self {
        Self {
            label: label.to_string(),
            journal: journal.clone(),
            backend: None,
        }
    }

    /// Also marks the quit hook in the backend call log.
    pub(crate) fn marking(mut self, backend: &Rc<MemoryBackend>) -> Self {
        self.backend = Some(backend.clone());
        self
    }

    fn record(&self, hook: &str) {
        self.journal.push(format!("{}:{}", self.label, hook));
    }
}

impl SceneBehavior for RecordingScene {
    fn on_loaded(&mut self, _scene: &mut SceneCore) {
        self.record("on_loaded");
    }

    fn run(&mut self, _scene: &mut SceneCore) {
        self.record("run");
    }

    fn pause(&mut self, _scene: &mut SceneCore) {
        self.record("pause");
    }

    fn resume(&mut self, _scene: &mut SceneCore) {
        self.record("resume");
    }

    fn quit(&mut self, scene: &mut SceneCore) {
        self.record("quit");
        let loaded = scene.resources().items().iter().filter(|i| i.is_loaded()).count();
        self.record(&format!("quit saw {} loaded", loaded));
        if let Some(backend) = &self.backend {
            backend.mark(format!("{}:quit", self.label));
        }
    }

    fn on_pointer(&mut self, _scene: &mut SceneCore, _event: PointerEvent) {
        self.record("pointer");
    }
}

//=== RecordingWidget =====================================================

/// Widget behavior that journals every hook as `"<label>:<hook>"`.
pub(crate) struct RecordingWidget {
    label: String,
    journal: Journal,
}

impl RecordingWidget {
    pub(crate) fn new(label: &str, journal: &Journal) -> Self {
        Self {
            label: label.to_string(),
            journal: journal.clone(),
        }
    }
}

impl WidgetBehavior for RecordingWidget {
    fn on_loaded(&mut self, _widget: &mut WidgetCore) {
        self.journal.push(format!("{}:on_loaded", self.label));
    }

    fn quit(&mut self, _widget: &mut WidgetCore) {
        self.journal.push(format!("{}:quit", self.label));
    }
}
