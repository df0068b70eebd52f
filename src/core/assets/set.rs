//=========================================================================
// Resource Set
//=========================================================================
//
// Composite render node that owns an ordered list of resource items and
// drives their load / unload pipeline.
//
// Load phases:
//   1. background prefetch   image + vector skeleton paths, fire-and-forget
//   2. blocking, media       audio + video items, one at a time
//   3. blocking, visual      image + vector skeleton items, one at a time
//
// A failed item is logged and skipped; the remaining items still load.
// Unload destroys every item in list order, drops the node's children,
// and clears the engine's global texture cache. Dropping the set frees
// its node.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::backend::{MediaId, NodeId, SkeletonId, SoundId, SpriteId, TextureId};
use super::context::AssetContext;
use super::item::{AudioHandle, ResourceItem, ResourcePayload};
use super::kind::ResourceKind;
use crate::core::error::LifecycleError;

//=== LoadReport ==========================================================

/// Outcome of one `load()` pass, by item name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
}

impl LoadReport {
    /// True when no item failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

//=== ResourceSet =========================================================

pub struct ResourceSet {
    ctx: AssetContext,
    node: NodeId,
    items: Vec<ResourceItem>,
    loaded: bool,
    video_fps: u32,
}

impl ResourceSet {
    //--- Construction -----------------------------------------------------

    /// Creates the set and its render node. Duplicate paths in `items`
    /// are dropped, first occurrence wins.
    pub fn new(ctx: AssetContext, items: impl IntoIterator<Item = ResourceItem>) -> Self {
        let node = ctx.surface().create_node();
        let mut set = Self {
            ctx,
            node,
            items: Vec::new(),
            loaded: false,
            video_fps: 30,
        };
        for item in items {
            set.add_item(item);
        }
        set
    }

    /// Sets the frame rate video textures refresh at.
    pub fn with_video_fps(mut self, fps: u32) -> Self {
        self.video_fps = fps;
        self
    }

    //--- Registration -----------------------------------------------------

    /// Registers `item` unless an item with the same path or name exists.
    ///
    /// Returns `true` if the item was added.
    pub fn add_item(&mut self, item: ResourceItem) -> bool {
        if self.items.iter().any(|i| i.path() == item.path()) {
            debug!(target: "assets", "Skipping duplicate resource path {}", item.path());
            return false;
        }
        if self.items.iter().any(|i| i.name() == item.name()) {
            warn!(
                target: "assets",
                "Resource name {:?} is already taken, skipping {}",
                item.name(),
                item.path()
            );
            return false;
        }
        self.items.push(item);
        true
    }

    /// Registers `path` under its own path as the lookup name.
    pub fn add_resource_item(&mut self, kind: ResourceKind, path: &str) -> bool {
        self.add_item(ResourceItem::new(kind, path, path))
    }

    //--- Pipeline ---------------------------------------------------------

    /// Warms the asset cache for every image and vector skeleton path.
    pub fn background_prefetch(&self) {
        for item in self.items.iter().filter(|i| i.kind().is_prefetchable()) {
            self.ctx.loader().background_load(item.path());
        }
    }

    /// Loads every item: prefetch, then media, then visual assets.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyLoaded`] if a previous `load()` has not been
    /// followed by `unload()`. Nothing is prefetched or loaded in that case.
    pub async fn load(&mut self) -> Result<LoadReport, LifecycleError> {
        if self.loaded {
            return Err(LifecycleError::AlreadyLoaded);
        }
        self.loaded = true;

        self.background_prefetch();

        let ctx = &self.ctx;
        let fps = self.video_fps;
        let mut report = LoadReport::default();

        let phases: [fn(ResourceKind) -> bool; 2] =
            [ResourceKind::is_media, ResourceKind::is_prefetchable];
        for phase in phases {
            for item in self.items.iter_mut().filter(|i| phase(i.kind())) {
                if item.load(ctx, fps).await {
                    report.loaded.push(item.name().to_string());
                } else {
                    report.failed.push(item.name().to_string());
                }
            }
        }

        if report.is_complete() {
            info!(target: "assets", "Loaded {} resources", report.loaded.len());
        } else {
            warn!(
                target: "assets",
                "Loaded {} resources, {} failed: {:?}",
                report.loaded.len(),
                report.failed.len(),
                report.failed
            );
        }
        Ok(report)
    }

    /// Releases every item, the node's children and the texture cache.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotLoaded`] if `load()` has not run.
    pub async fn unload(&mut self) -> Result<(), LifecycleError> {
        if !self.loaded {
            return Err(LifecycleError::NotLoaded);
        }

        let ctx = &self.ctx;
        for item in self.items.iter_mut() {
            item.destroy(ctx).await;
        }

        ctx.surface().remove_children(self.node);
        ctx.clear_texture_cache();
        self.loaded = false;

        debug!(target: "assets", "Unloaded {} resources", self.items.len());
        Ok(())
    }

    //--- Lookups ----------------------------------------------------------

    /// First item registered under `name`.
    pub fn item(&self, name: &str) -> Option<&ResourceItem> {
        self.items.iter().find(|i| i.name() == name)
    }

    fn payload(&self, name: &str) -> Option<&ResourcePayload> {
        self.item(name)?.payload()
    }

    pub fn get_sprite(&self, name: &str) -> Option<SpriteId> {
        match self.payload(name)? {
            ResourcePayload::Image { sprite, .. } | ResourcePayload::Video { sprite, .. } => {
                Some(*sprite)
            }
            _ => None,
        }
    }

    pub fn get_texture(&self, name: &str) -> Option<TextureId> {
        match self.payload(name)? {
            ResourcePayload::Image { texture, .. } | ResourcePayload::Video { texture, .. } => {
                Some(*texture)
            }
            _ => None,
        }
    }

    pub fn get_vector_skeleton(&self, name: &str) -> Option<SkeletonId> {
        match self.payload(name)? {
            ResourcePayload::VectorSkeleton(skeleton) => Some(*skeleton),
            _ => None,
        }
    }

    /// Audio handle from whichever backend loaded it.
    pub fn get_audio(&self, name: &str) -> Option<AudioHandle> {
        match self.payload(name)? {
            ResourcePayload::Audio(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Audio engine handle only.
    pub fn get_sound(&self, name: &str) -> Option<SoundId> {
        match self.get_audio(name)? {
            AudioHandle::Sound(sound) => Some(sound),
            AudioHandle::Element(_) => None,
        }
    }

    /// Audio media element only.
    pub fn get_audio_element(&self, name: &str) -> Option<MediaId> {
        match self.get_audio(name)? {
            AudioHandle::Element(media) => Some(media),
            AudioHandle::Sound(_) => None,
        }
    }

    pub fn get_video(&self, name: &str) -> Option<MediaId> {
        match self.payload(name)? {
            ResourcePayload::Video { media, .. } => Some(*media),
            _ => None,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn items(&self) -> &[ResourceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True between a `load()` and the matching `unload()`.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn context(&self) -> &AssetContext {
        &self.ctx
    }
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        self.ctx.surface().destroy_node(self.node);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
