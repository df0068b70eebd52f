//=========================================================================
// Assets
//=========================================================================
//
// Declared resources, their load / unload pipeline, and the collaborator
// boundary to the rendering and media engine.
//
//=========================================================================

pub mod backend;
pub mod context;
pub mod item;
pub mod kind;
pub mod memory;
pub mod set;

pub use backend::{
    AssetLoader, MediaId, MediaKind, MediaLoader, NodeId, RenderSurface, SkeletonId, SoundId,
    SpriteId, TextureId,
};
pub use context::{AssetContext, CacheLease};
pub use item::{AudioHandle, ResourceItem, ResourcePayload};
pub use kind::ResourceKind;
pub use memory::{BackendCall, MemoryBackend};
pub use set::{LoadReport, ResourceSet};
