//=========================================================================
// App Shell
//=========================================================================
//
// Owns the render surface and the single active scene, and swaps scenes
// in response to navigation.
//
// Architecture:
//   AppShell
//     ├─ SceneRegistry      name → factory
//     ├─ Stage              NoScene | Active | Transitioning
//     ├─ TransitionQueue    requests made mid-transition
//     ├─ Subscription       activity store → switch_scene
//     └─ EventReceiver      scene / widget events → handler
//
// Switch sequence (one transition future, polled once per tick):
//   detach old → old.uninitialize_scene() → free old node → release lease
//   → build new → take lease → attach new → new.initialize_scene()
//   → run_scene()
//
// The outgoing scene finishes tearing down, texture cache clear
// included, before the incoming scene is even constructed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::future::Future;
use std::mem;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::noop_waker;
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetContext, CacheLease, NodeId};
use crate::core::error::{DecoError, DecoResult};
use crate::core::events::{event_channel, AppEvent, EventReceiver};
use crate::core::input::PointerEvent;
use crate::core::scene::{SceneContainer, SceneFactory, SceneRegistry};
use crate::core::settings::Settings;
use crate::core::store::{ActivityStore, Subscription};

//=== Module Declarations =================================================

mod context;
mod transition_queue;

//=== Public API ==========================================================

pub use context::AppContext;
pub use transition_queue::{SceneRequest, TransitionQueue};

/// Receives every scene and widget event drained by [`AppShell::tick`].
pub type EventHandler = Box<dyn FnMut(&AppEvent, &AppContext)>;

//=== Stage ===============================================================

type Mounted = (SceneContainer, CacheLease);
type TransitionFuture = LocalBoxFuture<'static, DecoResult<Option<Mounted>>>;

enum Stage {
    NoScene,
    Active {
        view: String,
        scene: SceneContainer,
        lease: CacheLease,
    },
    Transitioning {
        target: Option<String>,
        /// Node of the incoming scene once the transition has attached it.
        mounting: Rc<Cell<Option<NodeId>>>,
        future: TransitionFuture,
    },
}

//=== AppShell ============================================================

pub struct AppShell {
    app: AppContext,
    registry: SceneRegistry,
    stage: Stage,
    queue: TransitionQueue,
    events: EventReceiver,
    navigation: Subscription,
    handler: EventHandler,
}

impl AppShell {
    //--- Construction -----------------------------------------------------

    pub fn new(assets: AssetContext, settings: Settings) -> Self {
        let (sender, events) = event_channel();
        let store = ActivityStore::default();
        let navigation = store.subscribe();

        Self {
            app: AppContext::new(assets, Rc::new(settings), sender, store),
            registry: SceneRegistry::new(),
            stage: Stage::NoScene,
            queue: TransitionQueue::new(),
            events,
            navigation,
            handler: Box::new(default_event_handler),
        }
    }

    /// Observes `store` instead of a private one.
    pub fn with_store(mut self, store: ActivityStore) -> Self {
        self.navigation = store.subscribe();
        self.app.store = store;
        self
    }

    pub fn register_scene<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&AppContext) -> SceneContainer + 'static,
    {
        self.registry.register(name, factory);
    }

    /// Replaces the default event handler.
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: FnMut(&AppEvent, &AppContext) + 'static,
    {
        self.handler = Box::new(handler);
    }

    //--- Scene Switching --------------------------------------------------

    /// Mounts the scene named by the store's current view.
    pub fn start_scene(&mut self) -> DecoResult<()> {
        let view = self.app.store.current_view();
        info!(target: "app", "Starting with view {:?}", view);
        self.switch_scene(&view)
    }

    /// Replaces the current scene with a fresh instance of `name`.
    ///
    /// While another transition is in flight the request is queued.
    ///
    /// # Errors
    ///
    /// [`DecoError::UnknownScene`] if nothing is registered under `name`.
    /// The current scene is left untouched.
    pub fn switch_scene(&mut self, name: &str) -> DecoResult<()> {
        if !self.registry.contains(name) {
            warn!(target: "app", "Cannot switch to unknown scene {:?}", name);
            return Err(DecoError::UnknownScene(name.to_string()));
        }

        if self.is_transitioning() {
            if self.queue.push(SceneRequest::Switch(name.to_string())) {
                debug!(target: "app", "Queued switch to {:?}", name);
            }
            return Ok(());
        }

        self.begin(Some(name))
    }

    /// Detaches and tears down the current scene without replacement.
    pub fn close_scene(&mut self) {
        if self.is_transitioning() {
            self.queue.push(SceneRequest::Close);
            return;
        }
        if let Err(err) = self.begin(None) {
            warn!(target: "app", "Close failed: {}", err);
        }
    }

    fn begin(&mut self, target: Option<&str>) -> DecoResult<()> {
        let incoming = match target {
            Some(name) => Some(
                self.registry
                    .factory(name)
                    .ok_or_else(|| DecoError::UnknownScene(name.to_string()))?,
            ),
            None => None,
        };

        let outgoing = match mem::replace(&mut self.stage, Stage::NoScene) {
            Stage::Active { view, scene, lease } => {
                debug!(target: "app", "Detaching scene {:?}", view);
                self.app.assets.surface().detach(scene.node());
                Some((scene, lease))
            }
            Stage::NoScene => None,
            in_flight @ Stage::Transitioning { .. } => {
                self.stage = in_flight;
                return Ok(());
            }
        };

        if outgoing.is_none() && incoming.is_none() {
            return Ok(());
        }

        info!(target: "app", "Scene transition -> {:?}", target);
        let mounting = Rc::new(Cell::new(None));
        self.stage = Stage::Transitioning {
            target: target.map(str::to_string),
            mounting: Rc::clone(&mounting),
            future: transition(self.app.clone(), outgoing, incoming, mounting),
        };
        Ok(())
    }

    //--- Per-Frame Update -------------------------------------------------

    /// Drains app events, follows navigation, and advances the transition.
    pub fn tick(&mut self) {
        self.drain_events();
        self.poll_navigation();
        self.poll_transition();
    }

    /// Ticks until no transition is running or queued.
    ///
    /// Returns `false` if `max_ticks` ran out first.
    pub fn tick_until_idle(&mut self, max_ticks: usize) -> bool {
        for _ in 0..max_ticks {
            self.tick();
            if self.is_idle() {
                return true;
            }
        }
        self.is_idle()
    }

    fn drain_events(&mut self) {
        for event in self.events.drain() {
            (self.handler)(&event, &self.app);
        }
    }

    fn poll_navigation(&mut self) {
        let Some(state) = self.navigation.poll() else {
            return;
        };
        if self.pending_view() == Some(state.current_view.as_str()) {
            return;
        }
        if let Err(err) = self.switch_scene(&state.current_view) {
            warn!(target: "app", "Navigation ignored: {}", err);
        }
    }

    fn poll_transition(&mut self) {
        self.stage = match mem::replace(&mut self.stage, Stage::NoScene) {
            Stage::Transitioning {
                target,
                mounting,
                mut future,
            } => {
                let waker = noop_waker();
                let mut cx = Context::from_waker(&waker);
                let poll = future.as_mut().poll(&mut cx);
                match poll {
                    Poll::Pending => Stage::Transitioning {
                        target,
                        mounting,
                        future,
                    },
                    Poll::Ready(result) => settle(target, result),
                }
            }
            settled => settled,
        };

        if !self.is_transitioning() {
            self.process_queue();
        }
    }

    fn process_queue(&mut self) {
        while !self.is_transitioning() {
            let Some(request) = self.queue.pop() else {
                break;
            };
            let result = match &request {
                SceneRequest::Switch(name) => self.begin(Some(name.as_str())),
                SceneRequest::Close => self.begin(None),
            };
            if let Err(err) = result {
                warn!(target: "app", "Queued {:?} dropped: {}", request, err);
            }
        }
    }

    //--- Input & Focus ----------------------------------------------------

    /// Forwards `event` to the active scene; dropped mid-transition.
    pub fn dispatch_pointer(&mut self, event: PointerEvent) {
        match &mut self.stage {
            Stage::Active { scene, .. } => scene.handle_pointer(event),
            _ => trace!(target: "app", "{:?} dropped, no input-ready scene", event.phase()),
        }
    }

    pub fn pause_scene(&mut self) -> DecoResult<()> {
        match &mut self.stage {
            Stage::Active { scene, .. } => Ok(scene.pause_scene()?),
            _ => Ok(()),
        }
    }

    pub fn resume_scene(&mut self) -> DecoResult<()> {
        match &mut self.stage {
            Stage::Active { scene, .. } => Ok(scene.resume_scene()?),
            _ => Ok(()),
        }
    }

    //--- Shutdown ---------------------------------------------------------

    /// Closes the current scene and drives its teardown to completion.
    pub fn shutdown(&mut self) {
        const SHUTDOWN_TICK_LIMIT: usize = 1_000;

        self.queue.clear();
        self.close_scene();

        for _ in 0..SHUTDOWN_TICK_LIMIT {
            if self.is_idle() {
                break;
            }
            self.poll_transition();
        }

        if !self.is_idle() {
            warn!(target: "app", "Shutdown abandoned an unfinished scene transition");
            self.queue.clear();
            let abandoned = mem::replace(&mut self.stage, Stage::NoScene);
            if let Stage::Transitioning { mounting, .. } = &abandoned {
                if let Some(node) = mounting.get() {
                    self.app.assets.surface().detach(node);
                }
            }
            drop(abandoned);
        }
        info!(target: "app", "App shell shut down");
    }

    //--- Accessors --------------------------------------------------------

    /// The mounted, input-ready scene.
    pub fn current_scene(&self) -> Option<&SceneContainer> {
        match &self.stage {
            Stage::Active { scene, .. } => Some(scene),
            _ => None,
        }
    }

    /// Registry name of the mounted scene.
    pub fn current_view(&self) -> Option<&str> {
        match &self.stage {
            Stage::Active { view, .. } => Some(view),
            _ => None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.stage, Stage::Transitioning { .. })
    }

    pub fn queued_requests(&self) -> usize {
        self.queue.len()
    }

    pub fn context(&self) -> &AppContext {
        &self.app
    }

    pub fn store(&self) -> &ActivityStore {
        &self.app.store
    }

    fn is_idle(&self) -> bool {
        !self.is_transitioning() && self.queue.is_empty()
    }

    /// View the shell is heading to once queued work settles.
    fn pending_view(&self) -> Option<&str> {
        match self.queue.back() {
            Some(SceneRequest::Switch(name)) => return Some(name),
            Some(SceneRequest::Close) => return None,
            None => {}
        }
        match &self.stage {
            Stage::Active { view, .. } => Some(view),
            Stage::Transitioning { target, .. } => target.as_deref(),
            Stage::NoScene => None,
        }
    }
}

//=== Transition ==========================================================

fn transition(
    app: AppContext,
    outgoing: Option<Mounted>,
    incoming: Option<SceneFactory>,
    mounting: Rc<Cell<Option<NodeId>>>,
) -> TransitionFuture {
    async move {
        if let Some((mut scene, lease)) = outgoing {
            if let Err(err) = scene.uninitialize_scene().await {
                warn!(target: "app", "{}", err);
            }
            drop(scene);
            drop(lease);
        }

        let Some(factory) = incoming else {
            return Ok(None);
        };

        let mut scene = factory(&app);
        let lease = app.assets.acquire_lease()?;
        app.assets.surface().attach(scene.node());
        mounting.set(Some(scene.node()));

        let report = match scene.initialize_scene().await {
            Ok(report) => report,
            Err(err) => {
                app.assets.surface().detach(scene.node());
                return Err(DecoError::from(err));
            }
        };
        if !report.is_complete() {
            warn!(target: "app", "Scene {} mounted degraded, missing {:?}", scene.name(), report.failed);
        }
        Ok(Some((scene, lease)))
    }
    .boxed_local()
}

/// Final stage once the transition future resolves.
fn settle(target: Option<String>, result: DecoResult<Option<Mounted>>) -> Stage {
    match result {
        Ok(Some((mut scene, lease))) => {
            if let Err(err) = scene.run_scene() {
                warn!(target: "app", "{}", err);
            }
            let view = target.unwrap_or_else(|| scene.name().to_string());
            info!(target: "app", "Scene {:?} is active", view);
            Stage::Active { view, scene, lease }
        }
        Ok(None) => {
            info!(target: "app", "Scene closed");
            Stage::NoScene
        }
        Err(err) => {
            warn!(target: "app", "Transition to {:?} failed: {}", target, err);
            Stage::NoScene
        }
    }
}

//=== Default Handler =====================================================

/// `"navigate"` with a text parameter sets the current view.
fn default_event_handler(event: &AppEvent, app: &AppContext) {
    match (event.name.as_str(), event.text()) {
        ("navigate", Some(view)) => app.store.set_current_view(view),
        _ => info!(
            target: "app",
            "Unhandled {:?} event {:?} from {} ({:?})",
            event.source, event.name, event.sender, event.parameter
        ),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::{BackendCall, MemoryBackend, ResourceItem, ResourceKind};
    use crate::core::events::EventParameter;
    use crate::core::scene::{SceneBehavior, SceneCore, SceneState};
    use crate::core::test_utils::{Journal, RecordingScene};
    use std::cell::RefCell;

    const IDLE: usize = 200;

    fn bg_path(name: &str) -> String {
        format!("images/{}/bg.png", name)
    }

    fn shell(backend: MemoryBackend) -> (Rc<MemoryBackend>, Journal, AppShell) {
        let backend = Rc::new(backend);
        let journal = Journal::default();
        let mut shell = AppShell::new(AssetContext::from_backend(backend.clone()), Settings::default());

        for name in ["main", "drawing", "sticker"] {
            let journal = journal.clone();
            let marker = backend.clone();
            shell.register_scene(name, move |app| {
                SceneContainer::new(
                    name,
                    app,
                    [ResourceItem::new(ResourceKind::Image, "bg", bg_path(name))],
                    RecordingScene::new(name, &journal).marking(&marker),
                )
            });
        }
        (backend, journal, shell)
    }

    /// Remembers the picked character when leaving.
    struct SavesCharacter;

    impl SceneBehavior for SavesCharacter {
        fn quit(&mut self, scene: &mut SceneCore) {
            scene.store().set_char_number(2);
        }
    }

    fn load_of(backend: &MemoryBackend, name: &str) -> Option<usize> {
        let path = bg_path(name);
        backend.position(|c| *c == BackendCall::LoadTexture(path.clone()))
    }

    #[test]
    fn back_to_back_switches_leave_one_scene_attached() {
        let (backend, journal, mut shell) = shell(MemoryBackend::new());

        shell.switch_scene("main").expect("switch main");
        shell.switch_scene("drawing").expect("switch drawing");
        assert!(shell.tick_until_idle(IDLE));

        let current = shell.current_scene().expect("active scene");
        assert_eq!(current.name(), "drawing");
        assert_eq!(backend.attached_nodes(), vec![current.node()]);

        let quit = backend
            .position(|c| *c == BackendCall::Mark("main:quit".into()))
            .expect("main quit");
        let load = load_of(&backend, "drawing").expect("drawing loaded");
        assert!(quit < load, "Outgoing quit must precede incoming load");
        assert_eq!(journal.count("main:quit"), 1);
    }

    #[test]
    fn outgoing_cache_clear_precedes_incoming_load() {
        let (backend, _journal, mut shell) = shell(MemoryBackend::new());

        shell.switch_scene("main").expect("switch");
        assert!(shell.tick_until_idle(IDLE));
        backend.clear_calls();

        shell.switch_scene("sticker").expect("switch");
        assert!(shell.tick_until_idle(IDLE));

        let clear = backend
            .position(|c| *c == BackendCall::ClearTextureCache)
            .expect("cache cleared");
        let prefetch = backend
            .position(|c| matches!(c, BackendCall::BackgroundLoad(_)))
            .expect("incoming prefetch");
        assert!(clear < prefetch);
        assert!(shell.context().assets.is_leased(), "Active scene holds the lease");
    }

    #[test]
    fn unknown_scene_leaves_current_scene_untouched() {
        let (_backend, journal, mut shell) = shell(MemoryBackend::new());
        shell.switch_scene("main").expect("switch");
        assert!(shell.tick_until_idle(IDLE));

        let result = shell.switch_scene("gallery");

        assert_eq!(result, Err(DecoError::UnknownScene("gallery".into())));
        assert_eq!(shell.current_view(), Some("main"));
        assert!(!journal.contains("main:quit"));
    }

    #[test]
    fn start_scene_follows_the_store() {
        let (_backend, _journal, mut shell) = shell(MemoryBackend::new());

        shell.start_scene().expect("start");
        assert!(shell.tick_until_idle(IDLE));
        assert_eq!(shell.current_view(), Some("main"));

        shell.store().set_current_view("drawing");
        assert!(shell.tick_until_idle(IDLE));
        assert_eq!(shell.current_view(), Some("drawing"));
    }

    #[test]
    fn navigate_event_switches_scene() {
        let (_backend, _journal, mut shell) = shell(MemoryBackend::new());
        shell.start_scene().expect("start");
        assert!(shell.tick_until_idle(IDLE));

        shell
            .current_scene()
            .expect("active")
            .fire_scene_event("navigate", Some(EventParameter::Text("sticker".into())));
        assert!(shell.tick_until_idle(IDLE));

        assert_eq!(shell.current_view(), Some("sticker"));
        assert_eq!(shell.store().current_view(), "sticker");
    }

    #[test]
    fn custom_handler_receives_events() {
        let (_backend, _journal, mut shell) = shell(MemoryBackend::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        shell.on_event(move |event, _app| sink.borrow_mut().push(event.name.clone()));

        shell.start_scene().expect("start");
        assert!(shell.tick_until_idle(IDLE));
        shell.current_scene().expect("active").fire_scene_event("done", None);
        shell.tick();

        assert_eq!(*seen.borrow(), ["done"]);
    }

    #[test]
    fn pointer_is_dropped_until_scene_is_ready() {
        let (_backend, journal, mut shell) = shell(MemoryBackend::new());
        shell.switch_scene("main").expect("switch");

        shell.dispatch_pointer(PointerEvent::Down { x: 1.0, y: 1.0 });
        assert_eq!(journal.count("main:pointer"), 0);

        assert!(shell.tick_until_idle(IDLE));
        shell.dispatch_pointer(PointerEvent::Down { x: 1.0, y: 1.0 });
        assert_eq!(journal.count("main:pointer"), 1);
    }

    #[test]
    fn partial_failure_mounts_degraded_scene() {
        let (_backend, _journal, mut shell) = shell(MemoryBackend::new().with_missing(bg_path("drawing")));

        shell.switch_scene("drawing").expect("switch");
        assert!(shell.tick_until_idle(IDLE));

        let scene = shell.current_scene().expect("mounted despite failure");
        assert_eq!(scene.state(), SceneState::Running);
        assert_eq!(scene.resources().get_sprite("bg"), None);
    }

    #[test]
    fn stalled_media_stalls_the_transition_not_the_shell() {
        let backend = MemoryBackend::new().with_stalled("videos/intro.mp4");
        let (_backend, journal, mut shell) = shell(backend);
        shell.register_scene("intro", |app| {
            SceneContainer::new(
                "intro",
                app,
                [ResourceItem::new(ResourceKind::Video, "intro", "videos/intro.mp4")],
                (),
            )
        });

        shell.switch_scene("intro").expect("switch");
        assert!(!shell.tick_until_idle(50));

        assert!(shell.is_transitioning());
        assert!(shell.current_scene().is_none());
        shell.dispatch_pointer(PointerEvent::Down { x: 0.0, y: 0.0 });
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn close_scene_detaches_and_releases_everything() {
        let (backend, journal, mut shell) = shell(MemoryBackend::new());
        shell.switch_scene("main").expect("switch");
        assert!(shell.tick_until_idle(IDLE));

        shell.close_scene();
        assert!(shell.tick_until_idle(IDLE));

        assert!(shell.current_scene().is_none());
        assert!(backend.attached_nodes().is_empty());
        assert!(!shell.context().assets.is_leased());
        assert_eq!(backend.live_sprites(), 0);
        assert!(journal.contains("main:quit"));
    }

    #[test]
    fn pause_and_resume_reach_the_active_scene() {
        let (_backend, journal, mut shell) = shell(MemoryBackend::new());
        assert!(shell.pause_scene().is_ok(), "No scene is not an error");

        shell.switch_scene("main").expect("switch");
        assert!(shell.tick_until_idle(IDLE));

        shell.pause_scene().expect("pause");
        assert!(shell.pause_scene().is_err(), "Pausing twice is a misuse");
        shell.resume_scene().expect("resume");

        assert_eq!(journal.count("main:pause"), 1);
        assert_eq!(journal.count("main:resume"), 1);
    }

    #[test]
    fn shutdown_mid_transition_tears_the_scene_down() {
        let (backend, journal, mut shell) = shell(MemoryBackend::new());
        shell.switch_scene("main").expect("switch");
        shell.tick();

        shell.shutdown();

        assert!(shell.current_scene().is_none());
        assert!(!shell.is_transitioning());
        assert!(journal.contains("main:quit"));
        assert!(backend.attached_nodes().is_empty());
    }

    #[test]
    fn incoming_scene_is_built_after_outgoing_quit() {
        let (_backend, _journal, mut shell) = shell(MemoryBackend::new());
        shell.register_scene("drawing", |app| SceneContainer::new("drawing", app, [], SavesCharacter));
        shell.register_scene("sticker", |app| {
            let path = format!("images/char{}.png", app.store.char_number());
            SceneContainer::new(
                "sticker",
                app,
                [ResourceItem::new(ResourceKind::Image, "char", path)],
                (),
            )
        });

        shell.store().set_current_view("drawing");
        assert!(shell.tick_until_idle(IDLE));
        shell.store().set_current_view("sticker");
        assert!(shell.tick_until_idle(IDLE));

        let scene = shell.current_scene().expect("sticker mounted");
        assert_eq!(shell.store().char_number(), 2);
        assert_eq!(
            scene.resources().item("char").map(ResourceItem::path),
            Some("images/char2.png"),
            "Factory must see the character saved by the outgoing quit"
        );
    }

    #[test]
    fn shutdown_during_stalled_transition_detaches_the_incoming_scene() {
        let backend = MemoryBackend::new().with_stalled("videos/intro.mp4");
        let (backend, _journal, mut shell) = shell(backend);
        shell.register_scene("intro", |app| {
            SceneContainer::new(
                "intro",
                app,
                [ResourceItem::new(ResourceKind::Video, "intro", "videos/intro.mp4")],
                (),
            )
        });

        shell.switch_scene("intro").expect("switch");
        shell.tick();
        assert_eq!(backend.attached_nodes().len(), 1, "Incoming scene is on stage while loading");

        shell.shutdown();

        assert!(!shell.is_transitioning());
        assert!(backend.attached_nodes().is_empty());
        assert_eq!(backend.live_nodes(), 0);
        assert!(!shell.context().assets.is_leased());
    }

    #[test]
    fn switching_scenes_does_not_leak_nodes() {
        let (backend, _journal, mut shell) = shell(MemoryBackend::new());
        shell.switch_scene("main").expect("switch");
        assert!(shell.tick_until_idle(IDLE));
        assert_eq!(backend.live_nodes(), 1);

        for name in ["drawing", "sticker", "main", "drawing"] {
            shell.switch_scene(name).expect("switch");
            assert!(shell.tick_until_idle(IDLE));
            assert_eq!(backend.live_nodes(), 1, "Only {:?} should own a node", name);
        }

        shell.close_scene();
        assert!(shell.tick_until_idle(IDLE));
        assert_eq!(backend.live_nodes(), 0);
    }

    #[test]
    fn queued_duplicate_switches_collapse() {
        let (_backend, _journal, mut shell) = shell(MemoryBackend::new());
        shell.switch_scene("main").expect("switch");

        shell.switch_scene("drawing").expect("queue");
        shell.switch_scene("drawing").expect("collapse");

        assert_eq!(shell.queued_requests(), 1);
    }
}
