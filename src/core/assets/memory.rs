//=========================================================================
// Memory Backend
//=========================================================================
//
// In-memory implementation of every collaborator trait.
//
// Used headless (no GPU, no audio device) and by the test suite. Every
// call is appended to a log so ordering guarantees can be asserted, and
// every load suspends once before resolving so that the phases of a
// container load are observable across ticks.
//
// Paths can be marked missing (decode fails), stalled (never resolves),
// or checked against an on-disk asset root.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, FutureExt, LocalBoxFuture};
use log::trace;

//=== Internal Dependencies ===============================================

use super::backend::{
    AssetLoader, MediaId, MediaKind, MediaLoader, NodeId, RenderSurface, SkeletonId, SoundId,
    SpriteId, TextureId,
};
use crate::core::error::MediaError;

//=== BackendCall =========================================================

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    BackgroundLoad(String),
    LoadTexture(String),
    LoadSkeleton(String),
    Unload(String),
    LoadSound(String),
    OpenMedia(MediaKind, String),
    PlaySound(SoundId),
    PauseSound(SoundId),
    DestroySound(SoundId),
    PlayMedia(MediaId),
    PauseMedia(MediaId),
    RewindMedia(MediaId),
    Attach(NodeId),
    Detach(NodeId),
    DestroyNode(NodeId),
    RemoveChildren(NodeId),
    CreateSprite(SpriteId),
    DestroySprite(SpriteId),
    DestroyTexture(TextureId, bool),
    AttachSkeleton(NodeId, SkeletonId),
    DetachSkeleton(NodeId, SkeletonId),
    PlaySkeleton(SkeletonId, String),
    ClearTextureCache,
    /// Caller annotation, see [`MemoryBackend::mark`].
    Mark(String),
}

//=== Internal State ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Child {
    Sprite(SpriteId),
    Skeleton(SkeletonId),
}

#[derive(Default)]
struct State {
    next_id: u64,
    calls: Vec<BackendCall>,

    missing: HashSet<String>,
    stalled: HashSet<String>,
    asset_root: Option<PathBuf>,

    cache: HashMap<String, u64>,
    prefetched: HashSet<String>,

    nodes: HashSet<NodeId>,
    stage: Vec<NodeId>,
    children: HashMap<NodeId, Vec<Child>>,
    z_index: HashMap<NodeId, i32>,
    visible: HashMap<NodeId, bool>,

    sprites: HashSet<SpriteId>,
    textures: HashSet<TextureId>,
    sounds: HashSet<SoundId>,
    playing: HashSet<u64>,
}

impl State {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn exists(&self, path: &str) -> bool {
        if self.missing.contains(path) {
            return false;
        }
        match &self.asset_root {
            Some(root) => root.join(path).is_file(),
            None => true,
        }
    }

    /// Resolves a cacheable asset, reusing the cached id for `path`.
    fn resolve_cached(&mut self, path: &str) -> Option<u64> {
        if !self.exists(path) {
            return None;
        }
        if let Some(&id) = self.cache.get(path) {
            return Some(id);
        }
        let id = self.next();
        self.cache.insert(path.to_string(), id);
        Some(id)
    }
}

//=== YieldNow ============================================================

/// Suspends exactly once, waking itself so any executor re-polls it.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

//=== MemoryBackend =======================================================

/// Headless engine with a call log.
///
/// ```
/// use std::rc::Rc;
/// use deco_stage::core::assets::{AssetContext, MemoryBackend};
///
/// let backend = Rc::new(MemoryBackend::new().with_missing("images/main/mirror.png"));
/// let assets = AssetContext::from_backend(backend.clone());
/// assert!(backend.calls().is_empty());
/// # let _ = assets;
/// ```
pub struct MemoryBackend {
    state: RefCell<State>,
}

impl MemoryBackend {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::default()),
        }
    }

    /// Loads of `path` fail (decode returns nothing / media errors).
    pub fn with_missing(self, path: impl Into<String>) -> Self {
        self.state.borrow_mut().missing.insert(path.into());
        self
    }

    /// Loads of `path` never resolve.
    pub fn with_stalled(self, path: impl Into<String>) -> Self {
        self.state.borrow_mut().stalled.insert(path.into());
        self
    }

    /// Only paths that exist as files under `root` resolve.
    pub fn with_asset_root(self, root: impl Into<PathBuf>) -> Self {
        self.state.borrow_mut().asset_root = Some(root.into());
        self
    }

    //--- Inspection -------------------------------------------------------

    /// Snapshot of every recorded call, oldest first.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    /// Appends a caller label to the log, interleaved with engine calls.
    pub fn mark(&self, label: impl Into<String>) {
        self.record(BackendCall::Mark(label.into()));
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Position of the first recorded call matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&BackendCall) -> bool) -> Option<usize> {
        self.state.borrow().calls.iter().position(|c| predicate(c))
    }

    /// Nodes currently attached to the stage root, in attach order.
    pub fn attached_nodes(&self) -> Vec<NodeId> {
        self.state.borrow().stage.clone()
    }

    /// Nodes created and not yet destroyed.
    pub fn live_nodes(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.state.borrow().children.get(&node).map_or(0, Vec::len)
    }

    pub fn z_index(&self, node: NodeId) -> Option<i32> {
        self.state.borrow().z_index.get(&node).copied()
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.state.borrow().visible.get(&node).copied().unwrap_or(true)
    }

    pub fn live_sprites(&self) -> usize {
        self.state.borrow().sprites.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn live_sounds(&self) -> usize {
        self.state.borrow().sounds.len()
    }

    pub fn is_sound_playing(&self, sound: SoundId) -> bool {
        self.state.borrow().playing.contains(&sound.0)
    }

    pub fn is_media_playing(&self, media: MediaId) -> bool {
        self.state.borrow().playing.contains(&media.0)
    }

    pub fn is_cached(&self, path: &str) -> bool {
        self.state.borrow().cache.contains_key(path)
    }

    pub fn was_prefetched(&self, path: &str) -> bool {
        self.state.borrow().prefetched.contains(path)
    }

    //--- Internal Helpers -------------------------------------------------

    fn record(&self, call: BackendCall) {
        trace!(target: "assets", "backend: {:?}", call);
        self.state.borrow_mut().calls.push(call);
    }

    fn is_stalled(&self, path: &str) -> bool {
        self.state.borrow().stalled.contains(path)
    }

    async fn settle(&self, path: &str) {
        if self.is_stalled(path) {
            future::pending::<()>().await;
        }
        yield_now().await;
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

//=== AssetLoader =========================================================

impl AssetLoader for MemoryBackend {
    fn background_load(&self, path: &str) {
        self.record(BackendCall::BackgroundLoad(path.to_string()));
        let mut state = self.state.borrow_mut();
        if state.exists(path) {
            state.prefetched.insert(path.to_string());
        }
    }

    fn load_texture<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Option<TextureId>> {
        async move {
            self.record(BackendCall::LoadTexture(path.to_string()));
            self.settle(path).await;
            let mut state = self.state.borrow_mut();
            let texture = state.resolve_cached(path).map(TextureId)?;
            state.textures.insert(texture);
            Some(texture)
        }
        .boxed_local()
    }

    fn load_skeleton<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Option<SkeletonId>> {
        async move {
            self.record(BackendCall::LoadSkeleton(path.to_string()));
            self.settle(path).await;
            self.state.borrow_mut().resolve_cached(path).map(SkeletonId)
        }
        .boxed_local()
    }

    fn unload<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, ()> {
        async move {
            self.record(BackendCall::Unload(path.to_string()));
            yield_now().await;
            let mut state = self.state.borrow_mut();
            if let Some(id) = state.cache.remove(path) {
                state.textures.remove(&TextureId(id));
            }
            state.prefetched.remove(path);
        }
        .boxed_local()
    }
}

//=== MediaLoader =========================================================

impl MediaLoader for MemoryBackend {
    fn load_sound<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<SoundId, MediaError>> {
        async move {
            self.record(BackendCall::LoadSound(path.to_string()));
            self.settle(path).await;
            let mut state = self.state.borrow_mut();
            if !state.exists(path) {
                return Err(MediaError::Unreadable {
                    path: path.to_string(),
                    reason: "not found".to_string(),
                });
            }
            let sound = SoundId(state.next());
            state.sounds.insert(sound);
            Ok(sound)
        }
        .boxed_local()
    }

    fn open_media<'a>(
        &'a self,
        kind: MediaKind,
        path: &'a str,
    ) -> LocalBoxFuture<'a, Result<MediaId, MediaError>> {
        async move {
            self.record(BackendCall::OpenMedia(kind, path.to_string()));
            self.settle(path).await;
            let mut state = self.state.borrow_mut();
            if !state.exists(path) {
                return Err(MediaError::Unreadable {
                    path: path.to_string(),
                    reason: "element reported an error".to_string(),
                });
            }
            Ok(MediaId(state.next()))
        }
        .boxed_local()
    }

    fn play_sound(&self, sound: SoundId) {
        self.record(BackendCall::PlaySound(sound));
        self.state.borrow_mut().playing.insert(sound.0);
    }

    fn pause_sound(&self, sound: SoundId) {
        self.record(BackendCall::PauseSound(sound));
        self.state.borrow_mut().playing.remove(&sound.0);
    }

    fn destroy_sound(&self, sound: SoundId) {
        self.record(BackendCall::DestroySound(sound));
        self.state.borrow_mut().sounds.remove(&sound);
    }

    fn play_media(&self, media: MediaId) {
        self.record(BackendCall::PlayMedia(media));
        self.state.borrow_mut().playing.insert(media.0);
    }

    fn pause_media(&self, media: MediaId) {
        self.record(BackendCall::PauseMedia(media));
        self.state.borrow_mut().playing.remove(&media.0);
    }

    fn rewind_media(&self, media: MediaId) {
        self.record(BackendCall::RewindMedia(media));
    }
}

//=== RenderSurface =======================================================

impl RenderSurface for MemoryBackend {
    fn create_node(&self) -> NodeId {
        let mut state = self.state.borrow_mut();
        let node = NodeId(state.next());
        state.nodes.insert(node);
        node
    }

    fn destroy_node(&self, node: NodeId) {
        if !self.state.borrow_mut().nodes.remove(&node) {
            return;
        }
        self.record(BackendCall::DestroyNode(node));
        let mut state = self.state.borrow_mut();
        state.stage.retain(|&n| n != node);
        state.children.remove(&node);
        state.z_index.remove(&node);
        state.visible.remove(&node);
    }

    fn attach(&self, node: NodeId) {
        self.record(BackendCall::Attach(node));
        let mut state = self.state.borrow_mut();
        if !state.stage.contains(&node) {
            state.stage.push(node);
        }
    }

    fn detach(&self, node: NodeId) {
        self.record(BackendCall::Detach(node));
        self.state.borrow_mut().stage.retain(|&n| n != node);
    }

    fn set_z_index(&self, node: NodeId, z_index: i32) {
        self.state.borrow_mut().z_index.insert(node, z_index);
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        self.state.borrow_mut().visible.insert(node, visible);
    }

    fn remove_children(&self, node: NodeId) {
        self.record(BackendCall::RemoveChildren(node));
        self.state.borrow_mut().children.remove(&node);
    }

    fn create_sprite(&self, texture: TextureId) -> SpriteId {
        let mut state = self.state.borrow_mut();
        let sprite = SpriteId(state.next());
        state.sprites.insert(sprite);
        state.textures.insert(texture);
        drop(state);
        self.record(BackendCall::CreateSprite(sprite));
        sprite
    }

    fn destroy_sprite(&self, sprite: SpriteId) {
        self.record(BackendCall::DestroySprite(sprite));
        let mut state = self.state.borrow_mut();
        state.sprites.remove(&sprite);
        for children in state.children.values_mut() {
            children.retain(|c| *c != Child::Sprite(sprite));
        }
    }

    fn add_sprite(&self, parent: NodeId, sprite: SpriteId) {
        self.state.borrow_mut().children.entry(parent).or_default().push(Child::Sprite(sprite));
    }

    fn texture_from_media(&self, _media: MediaId, _fps: u32) -> TextureId {
        let mut state = self.state.borrow_mut();
        let texture = TextureId(state.next());
        state.textures.insert(texture);
        texture
    }

    fn destroy_texture(&self, texture: TextureId, destroy_base: bool) {
        self.record(BackendCall::DestroyTexture(texture, destroy_base));
        self.state.borrow_mut().textures.remove(&texture);
    }

    fn attach_skeleton(&self, parent: NodeId, skeleton: SkeletonId, z_index: i32) {
        self.record(BackendCall::AttachSkeleton(parent, skeleton));
        let mut state = self.state.borrow_mut();
        state.children.entry(parent).or_default().push(Child::Skeleton(skeleton));
        state.z_index.insert(NodeId(skeleton.0), z_index);
    }

    fn detach_skeleton(&self, parent: NodeId, skeleton: SkeletonId) {
        self.record(BackendCall::DetachSkeleton(parent, skeleton));
        if let Some(children) = self.state.borrow_mut().children.get_mut(&parent) {
            children.retain(|c| *c != Child::Skeleton(skeleton));
        }
    }

    fn set_skeleton_visible(&self, skeleton: SkeletonId, visible: bool) {
        self.state.borrow_mut().visible.insert(NodeId(skeleton.0), visible);
    }

    fn play_skeleton(&self, skeleton: SkeletonId, animation: &str, _x: f32, _y: f32) {
        self.record(BackendCall::PlaySkeleton(skeleton, animation.to_string()));
    }

    fn clear_texture_cache(&self) {
        self.record(BackendCall::ClearTextureCache);
        let mut state = self.state.borrow_mut();
        state.cache.clear();
        state.prefetched.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
