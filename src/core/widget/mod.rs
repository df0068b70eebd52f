//=========================================================================
// Widget Container
//=========================================================================
//
// Reusable UI control backed by its own resource set.
//
// Unlike a scene, a widget's load / unload cycle may repeat:
//   show()  → lazy initialize_widget() on first show, then visible
//   hide()  → invisible, resources stay loaded
//   uninitialize_widget() → quit hook, unload, eligible for re-init
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::app::AppContext;
use crate::core::assets::{AssetContext, LoadReport, NodeId, ResourceItem, ResourceSet};
use crate::core::error::LifecycleError;
use crate::core::events::{AppEvent, EventParameter, EventSender, EventSource};
use crate::core::lifecycle::Lifecycle;
use crate::core::settings::Settings;
use crate::core::store::ActivityStore;

//=== WidgetBehavior Trait ================================================

/// Widget-specific logic composed into a [`WidgetContainer`].
pub trait WidgetBehavior {
    /// Called after each successful load.
    fn on_loaded(&mut self, _widget: &mut WidgetCore) {}

    /// Called before resources are released.
    fn quit(&mut self, _widget: &mut WidgetCore) {}
}

impl WidgetBehavior for () {}

//=== WidgetCore ==========================================================

pub struct WidgetCore {
    name: String,
    resources: ResourceSet,
    enabled: bool,
    visible: bool,
    events: EventSender,
    store: ActivityStore,
    settings: Rc<Settings>,
}

impl WidgetCore {
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

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fire_widget_event(&self, name: &str, parameter: Option<EventParameter>) {
        self.events.fire(AppEvent {
            source: EventSource::Widget,
            sender: self.name.clone(),
            name: name.to_string(),
            parameter,
        });
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.resources
            .context()
            .surface()
            .set_visible(self.resources.node(), visible);
    }
}

//=== WidgetContainer =====================================================

pub struct WidgetContainer {
    core: WidgetCore,
    initialized: bool,
    behavior: Box<dyn WidgetBehavior>,
}

impl WidgetContainer {
    /// Declares the widget's resources. Starts hidden and disabled.
    pub fn new<B>(
        name: impl Into<String>,
        app: &AppContext,
        items: impl IntoIterator<Item = ResourceItem>,
        behavior: B,
    ) -> Self
    where
        B: WidgetBehavior + 'static,
    {
        let settings = Rc::clone(&app.settings);
        let resources = ResourceSet::new(app.assets.clone(), items)
            .with_video_fps(settings.video_update_fps);

        let surface = app.assets.surface();
        surface.set_z_index(resources.node(), settings.widget_z_index);
        surface.set_visible(resources.node(), false);

        Self {
            core: WidgetCore {
                name: name.into(),
                resources,
                enabled: false,
                visible: false,
                events: app.events.clone(),
                store: app.store.clone(),
                settings,
            },
            initialized: false,
            behavior: Box::new(behavior),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Loads resources and runs `on_loaded`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyInitialized`] while already initialized.
    pub async fn initialize_widget(&mut self) -> Result<LoadReport, LifecycleError> {
        if self.initialized {
            warn!(target: "widget", "{}: already initialized", self.core.name);
            return Err(LifecycleError::AlreadyInitialized {
                name: self.core.name.clone(),
            });
        }

        let report = self.core.resources.load().await?;
        self.behavior.on_loaded(&mut self.core);
        self.initialized = true;

        debug!(target: "widget", "{}: initialized", self.core.name);
        Ok(report)
    }

    /// Runs the quit hook and unloads. No-op unless initialized.
    pub async fn uninitialize_widget(&mut self) {
        if !self.initialized {
            return;
        }

        self.behavior.quit(&mut self.core);
        if let Err(err) = self.core.resources.unload().await {
            warn!(target: "widget", "{}: {}", self.core.name, err);
        }
        self.initialized = false;

        debug!(target: "widget", "{}: uninitialized", self.core.name);
    }

    //--- Visibility -------------------------------------------------------

    /// Initializes on first show, then makes the widget visible.
    pub async fn show(&mut self) -> Result<(), LifecycleError> {
        if !self.initialized {
            self.initialize_widget().await?;
        }
        self.core.set_visible(true);
        Ok(())
    }

    /// Hides without unloading.
    pub fn hide(&mut self) {
        self.core.set_visible(false);
    }

    //--- Delegation -------------------------------------------------------

    pub fn enable(&mut self, enabled: bool) {
        self.core.enable(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    pub fn is_visible(&self) -> bool {
        self.core.is_visible()
    }

    pub fn fire_widget_event(&self, name: &str, parameter: Option<EventParameter>) {
        self.core.fire_widget_event(name, parameter);
    }

    //--- Accessors --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn node(&self) -> NodeId {
        self.core.resources.node()
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.core.resources
    }

    pub fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }
}

impl Lifecycle for WidgetContainer {
    fn initialize(&mut self) -> LocalBoxFuture<'_, Result<(), LifecycleError>> {
        async move { self.initialize_widget().await.map(|_| ()) }.boxed_local()
    }

    fn uninitialize(&mut self) -> LocalBoxFuture<'_, Result<(), LifecycleError>> {
        async move {
            if !self.initialized {
                return Err(LifecycleError::NotInitialized {
                    name: self.core.name.clone(),
                });
            }
            self.uninitialize_widget().await;
            Ok(())
        }
        .boxed_local()
    }

    fn is_running(&self) -> bool {
        self.initialized && self.core.visible
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::{BackendCall, MemoryBackend, ResourceKind};
    use crate::core::test_utils::{app_context, Journal, RecordingWidget};
    use futures::executor::block_on;

    fn palette(backend: &Rc<MemoryBackend>, journal: &Journal) -> WidgetContainer {
        let (app, _rx) = app_context(backend);
        WidgetContainer::new(
            "palette",
            &app,
            [ResourceItem::new(ResourceKind::Image, "swatch", "images/widget/swatch.png")],
            RecordingWidget::new("palette", journal),
        )
    }

    fn unloads(backend: &MemoryBackend) -> usize {
        backend.count(|c| matches!(c, BackendCall::Unload(_)))
    }

    #[test]
    fn starts_hidden_disabled_and_unloaded() {
        let backend = Rc::new(MemoryBackend::new());
        let journal = Journal::default();
        let widget = palette(&backend, &journal);

        assert!(!widget.is_initialized());
        assert!(!widget.is_visible());
        assert!(!widget.is_enabled());
        assert!(!backend.is_visible(widget.node()));
        assert_eq!(backend.z_index(widget.node()), Some(Settings::default().widget_z_index));
    }

    #[test]
    fn first_show_initializes_once() {
        let backend = Rc::new(MemoryBackend::new());
        let journal = Journal::default();
        let mut widget = palette(&backend, &journal);

        block_on(widget.show()).expect("show");
        block_on(widget.show()).expect("show again");

        assert!(widget.is_visible());
        assert!(backend.is_visible(widget.node()));
        assert_eq!(journal.count("palette:on_loaded"), 1);
    }

    #[test]
    fn hide_never_unloads() {
        let backend = Rc::new(MemoryBackend::new());
        let journal = Journal::default();
        let mut widget = palette(&backend, &journal);

        block_on(widget.show()).expect("show");
        widget.hide();

        assert!(!widget.is_visible());
        assert!(widget.resources().is_loaded());
        assert_eq!(unloads(&backend), 0);
    }

    #[test]
    fn show_after_uninitialize_reinitializes() {
        let backend = Rc::new(MemoryBackend::new());
        let journal = Journal::default();
        let mut widget = palette(&backend, &journal);

        block_on(widget.show()).expect("show");
        widget.hide();
        block_on(widget.uninitialize_widget());
        assert!(!widget.is_initialized());
        assert_eq!(unloads(&backend), 1);

        block_on(widget.show()).expect("show after uninitialize");

        assert_eq!(
            journal.entries(),
            ["palette:on_loaded", "palette:quit", "palette:on_loaded"]
        );
        assert!(widget.resources().is_loaded());
    }

    #[test]
    fn uninitialize_without_initialize_is_a_no_op() {
        let backend = Rc::new(MemoryBackend::new());
        let journal = Journal::default();
        let mut widget = palette(&backend, &journal);

        block_on(widget.uninitialize_widget());

        assert!(journal.entries().is_empty());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn explicit_initialize_twice_is_rejected() {
        let backend = Rc::new(MemoryBackend::new());
        let journal = Journal::default();
        let mut widget = palette(&backend, &journal);

        block_on(widget.initialize_widget()).expect("initialize");
        let second = block_on(widget.initialize_widget());

        assert!(matches!(second, Err(LifecycleError::AlreadyInitialized { .. })));
        assert_eq!(journal.count("palette:on_loaded"), 1);
    }

    #[test]
    fn widget_events_are_tagged_with_their_source() {
        let backend = Rc::new(MemoryBackend::new());
        let (app, rx) = app_context(&backend);
        let widget = WidgetContainer::new("palette", &app, [], ());

        widget.fire_widget_event("color", Some(EventParameter::Index(3)));

        let events = rx.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, EventSource::Widget);
        assert_eq!(events[0].parameter, Some(EventParameter::Index(3)));
    }

    #[test]
    fn lifecycle_uninitialize_reports_misuse() {
        let backend = Rc::new(MemoryBackend::new());
        let journal = Journal::default();
        let mut widget = palette(&backend, &journal);

        assert!(block_on(Lifecycle::uninitialize(&mut widget)).is_err());

        block_on(Lifecycle::initialize(&mut widget)).expect("initialize");
        block_on(Lifecycle::uninitialize(&mut widget)).expect("uninitialize");
        assert!(!widget.is_initialized());
    }
}
