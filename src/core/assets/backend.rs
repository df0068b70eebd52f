//=========================================================================
// Collaborator Interface
//=========================================================================
//
// The boundary between the container lifecycle and the rendering/media
// engine it drives.
//
// Architecture:
//   ResourceItem / ResourceSet
//        │
//        ├─► AssetLoader    image + vector skeleton decode, prefetch, unload
//        ├─► MediaLoader    audio engine sounds, audio/video elements
//        └─► RenderSurface  scene graph nodes, sprites, textures, cache
//
// All handles are opaque copies; the engine owns the real objects.
// Async methods return `LocalBoxFuture` so the traits stay object safe
// on the single-threaded core loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use futures::future::LocalBoxFuture;

//=== Internal Dependencies ===============================================

use crate::core::error::MediaError;

//=== Handles =============================================================

/// Scene graph node (container) owned by the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Decoded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Drawable sprite bound to a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u64);

/// Decoded sound held by the audio engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub u64);

/// Audio or video media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(pub u64);

/// Decoded vector skeleton animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkeletonId(pub u64);

/// Kind of media element to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

//=== AssetLoader =========================================================

/// Loader for cacheable assets (images and vector skeletons).
///
/// The loader keeps a process-wide cache keyed by path. `load_*` resolves
/// to `None` when the asset cannot be decoded; that is not an error at
/// this boundary.
pub trait AssetLoader {
    /// Starts a non-blocking warm-up of the cache for `path`.
    fn background_load(&self, path: &str);

    fn load_texture<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Option<TextureId>>;

    fn load_skeleton<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Option<SkeletonId>>;

    /// Releases the cached asset for `path`.
    fn unload<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, ()>;
}

//=== MediaLoader =========================================================

/// Audio engine and media element access.
pub trait MediaLoader {
    fn load_sound<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<SoundId, MediaError>>;

    /// Opens a media element and resolves once it can play.
    ///
    /// A readiness error resolves to `Err`. An element that never becomes
    /// ready never resolves.
    fn open_media<'a>(
        &'a self,
        kind: MediaKind,
        path: &'a str,
    ) -> LocalBoxFuture<'a, Result<MediaId, MediaError>>;

    fn play_sound(&self, sound: SoundId);
    fn pause_sound(&self, sound: SoundId);
    fn destroy_sound(&self, sound: SoundId);

    fn play_media(&self, media: MediaId);
    fn pause_media(&self, media: MediaId);
    fn rewind_media(&self, media: MediaId);
}

//=== RenderSurface =======================================================

/// Scene graph and GPU-side resources.
pub trait RenderSurface {
    //--- Nodes ------------------------------------------------------------

    fn create_node(&self) -> NodeId;

    /// Frees `node`, detaching it first if it is on the stage.
    fn destroy_node(&self, node: NodeId);

    /// Adds `node` to the stage root.
    fn attach(&self, node: NodeId);

    /// Removes `node` from the stage root.
    fn detach(&self, node: NodeId);

    fn set_z_index(&self, node: NodeId, z_index: i32);
    fn set_visible(&self, node: NodeId, visible: bool);

    /// Drops every child currently parented to `node`.
    fn remove_children(&self, node: NodeId);

    //--- Sprites & Textures -----------------------------------------------

    fn create_sprite(&self, texture: TextureId) -> SpriteId;
    fn destroy_sprite(&self, sprite: SpriteId);

    /// Parents `sprite` under `node`.
    fn add_sprite(&self, parent: NodeId, sprite: SpriteId);

    /// Creates a texture streaming frames from `media` at `fps`.
    fn texture_from_media(&self, media: MediaId, fps: u32) -> TextureId;

    /// Destroys `texture`; `destroy_base` also frees the GPU resource.
    fn destroy_texture(&self, texture: TextureId, destroy_base: bool);

    //--- Skeletons --------------------------------------------------------

    fn attach_skeleton(&self, parent: NodeId, skeleton: SkeletonId, z_index: i32);
    fn detach_skeleton(&self, parent: NodeId, skeleton: SkeletonId);
    fn set_skeleton_visible(&self, skeleton: SkeletonId, visible: bool);
    fn play_skeleton(&self, skeleton: SkeletonId, animation: &str, x: f32, y: f32);

    //--- Cache ------------------------------------------------------------

    /// Drops the engine's global texture cache.
    fn clear_texture_cache(&self);
}
