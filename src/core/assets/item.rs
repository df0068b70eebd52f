//=========================================================================
// Resource Item
//=========================================================================
//
// One declared asset: kind, lookup name, load path, and the payload it
// holds once loaded.
//
// The payload is a sum type with one variant per loadable kind, so a
// loaded item can only carry the handles that belong to its kind, and
// "loaded" is simply "payload present".
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::backend::{MediaId, MediaKind, SkeletonId, SoundId, SpriteId, TextureId};
use super::context::AssetContext;
use super::kind::ResourceKind;
use crate::core::settings::AudioBackend;

//=== Payload =============================================================

/// Audio handle produced by whichever backend loaded the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioHandle {
    /// Decoded sound owned by the audio engine.
    Sound(SoundId),
    /// Media element; paused on release, never destroyed.
    Element(MediaId),
}

/// Handles held by a loaded item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePayload {
    Image {
        texture: TextureId,
        sprite: SpriteId,
    },
    Audio(AudioHandle),
    Video {
        media: MediaId,
        texture: TextureId,
        sprite: SpriteId,
    },
    VectorSkeleton(SkeletonId),
}

//=== ResourceItem ========================================================

/// A named, path-addressed asset and its loaded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceItem {
    kind: ResourceKind,
    name: String,
    path: String,
    payload: Option<ResourcePayload>,
}

impl ResourceItem {
    /// Describes an asset. No I/O happens here.
    pub fn new(kind: ResourceKind, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            path: path.into(),
            payload: None,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn payload(&self) -> Option<&ResourcePayload> {
        self.payload.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.payload.is_some()
    }

    //--- Load -------------------------------------------------------------

    /// Loads the payload for this item's kind.
    ///
    /// Returns `true` when the item ended up loaded. Decode failures and
    /// media readiness errors are logged and leave the item unloaded.
    pub(crate) async fn load(&mut self, ctx: &AssetContext, video_fps: u32) -> bool {
        let payload = match self.kind {
            ResourceKind::None => {
                debug!(target: "assets", "{}: kind none, nothing to load", self.name);
                return false;
            }
            ResourceKind::Image => self.load_image(ctx).await,
            ResourceKind::Audio => self.load_audio(ctx).await,
            ResourceKind::Video => self.load_video(ctx, video_fps).await,
            ResourceKind::VectorSkeleton => self.load_skeleton(ctx).await,
        };

        match payload {
            Some(payload) => {
                debug!(target: "assets", "Loaded {} {} ({})", self.kind, self.name, self.path);
                self.payload = Some(payload);
                true
            }
            None => {
                warn!(
                    target: "assets",
                    "Failed to load {} {} from {}",
                    self.kind, self.name, self.path
                );
                false
            }
        }
    }

    async fn load_image(&self, ctx: &AssetContext) -> Option<ResourcePayload> {
        let texture = ctx.loader().load_texture(&self.path).await?;
        let sprite = ctx.surface().create_sprite(texture);
        Some(ResourcePayload::Image { texture, sprite })
    }

    async fn load_skeleton(&self, ctx: &AssetContext) -> Option<ResourcePayload> {
        let skeleton = ctx.loader().load_skeleton(&self.path).await?;
        Some(ResourcePayload::VectorSkeleton(skeleton))
    }

    async fn load_audio(&self, ctx: &AssetContext) -> Option<ResourcePayload> {
        let handle = match ctx.audio_backend() {
            AudioBackend::SoundEngine => ctx.media().load_sound(&self.path).await.map(AudioHandle::Sound),
            AudioBackend::MediaElement => ctx
                .media()
                .open_media(MediaKind::Audio, &self.path)
                .await
                .map(AudioHandle::Element),
        };

        match handle {
            Ok(handle) => Some(ResourcePayload::Audio(handle)),
            Err(err) => {
                warn!(target: "assets", "{}: {}", self.name, err);
                None
            }
        }
    }

    async fn load_video(&self, ctx: &AssetContext, fps: u32) -> Option<ResourcePayload> {
        let media = match ctx.media().open_media(MediaKind::Video, &self.path).await {
            Ok(media) => media,
            Err(err) => {
                warn!(target: "assets", "{}: {}", self.name, err);
                return None;
            }
        };

        // Hold on the first frame until a scene starts playback.
        ctx.media().rewind_media(media);
        ctx.media().pause_media(media);

        let texture = ctx.surface().texture_from_media(media, fps);
        let sprite = ctx.surface().create_sprite(texture);
        Some(ResourcePayload::Video {
            media,
            texture,
            sprite,
        })
    }

    //--- Destroy ----------------------------------------------------------

    /// Releases the payload. Safe to call on an item that never loaded.
    ///
    /// The payload is taken before any release call, so the item never
    /// holds a handle the engine has already freed.
    pub async fn destroy(&mut self, ctx: &AssetContext) {
        let Some(payload) = self.payload.take() else {
            return;
        };

        match payload {
            ResourcePayload::Image { sprite, .. } => {
                ctx.surface().destroy_sprite(sprite);
                ctx.loader().unload(&self.path).await;
            }
            ResourcePayload::Audio(AudioHandle::Sound(sound)) => {
                ctx.media().pause_sound(sound);
                ctx.media().destroy_sound(sound);
            }
            ResourcePayload::Audio(AudioHandle::Element(media)) => {
                ctx.media().pause_media(media);
            }
            ResourcePayload::Video {
                media,
                texture,
                sprite,
            } => {
                ctx.media().pause_media(media);
                ctx.surface().destroy_sprite(sprite);
                ctx.surface().destroy_texture(texture, true);
            }
            ResourcePayload::VectorSkeleton(_) => {
                ctx.loader().unload(&self.path).await;
            }
        }

        debug!(target: "assets", "Released {} {}", self.kind, self.name);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::memory::{BackendCall, MemoryBackend};
    use futures::executor::block_on;
    use std::rc::Rc;

    fn setup() -> (Rc<MemoryBackend>, AssetContext) {
        let backend = Rc::new(MemoryBackend::new().with_missing("bad.mp3"));
        let ctx = AssetContext::from_backend(backend.clone());
        (backend, ctx)
    }

    #[test]
    fn destroy_on_never_loaded_item_is_a_no_op() {
        let (backend, ctx) = setup();
        let mut item = ResourceItem::new(ResourceKind::Image, "bg", "images/bg.png");

        block_on(item.destroy(&ctx));
        block_on(item.destroy(&ctx));

        assert!(!item.is_loaded());
        assert!(item.payload().is_none());
        assert!(backend.calls().is_empty(), "Nothing should reach the engine");
    }

    #[test]
    fn image_load_creates_sprite_and_destroy_unloads_path() {
        let (backend, ctx) = setup();
        let mut item = ResourceItem::new(ResourceKind::Image, "bg", "images/bg.png");

        assert!(block_on(item.load(&ctx, 30)));
        assert!(matches!(item.payload(), Some(ResourcePayload::Image { .. })));
        assert_eq!(backend.live_sprites(), 1);

        block_on(item.destroy(&ctx));

        assert!(!item.is_loaded());
        assert_eq!(backend.live_sprites(), 0);
        assert!(backend.calls().contains(&BackendCall::Unload("images/bg.png".into())));
    }

    #[test]
    fn media_error_resolves_unloaded_instead_of_failing() {
        // Readiness errors stay non-fatal: the item reports false and the
        // caller carries on with the next item.
        let (_backend, ctx) = setup();
        let mut item = ResourceItem::new(ResourceKind::Audio, "click", "bad.mp3");

        assert!(!block_on(item.load(&ctx, 30)));
        assert!(!item.is_loaded());
    }

    #[test]
    fn sound_engine_audio_is_paused_then_destroyed() {
        let (backend, ctx) = setup();
        let mut item = ResourceItem::new(ResourceKind::Audio, "bgm", "sounds/bgm.mp3");
        block_on(item.load(&ctx, 30));

        let Some(ResourcePayload::Audio(AudioHandle::Sound(sound))) = item.payload().copied() else {
            panic!("expected a sound handle, got {:?}", item.payload());
        };
        backend.clear_calls();
        block_on(item.destroy(&ctx));

        assert_eq!(
            backend.calls(),
            vec![BackendCall::PauseSound(sound), BackendCall::DestroySound(sound)]
        );
        assert_eq!(backend.live_sounds(), 0);
    }

    #[test]
    fn media_element_audio_is_only_paused() {
        let (backend, ctx) = setup();
        let ctx = ctx.with_audio_backend(AudioBackend::MediaElement);
        let mut item = ResourceItem::new(ResourceKind::Audio, "bgm", "sounds/bgm.mp3");
        block_on(item.load(&ctx, 30));

        let Some(ResourcePayload::Audio(AudioHandle::Element(media))) = item.payload().copied() else {
            panic!("expected a media element, got {:?}", item.payload());
        };
        backend.clear_calls();
        block_on(item.destroy(&ctx));

        assert_eq!(backend.calls(), vec![BackendCall::PauseMedia(media)]);
    }

    #[test]
    fn video_is_parked_on_first_frame_and_fully_released() {
        let (backend, ctx) = setup();
        let mut item = ResourceItem::new(ResourceKind::Video, "intro", "videos/intro.mp4");
        block_on(item.load(&ctx, 30));

        let Some(ResourcePayload::Video { media, texture, sprite }) = item.payload().copied() else {
            panic!("expected a video payload, got {:?}", item.payload());
        };
        let calls = backend.calls();
        let rewind = calls.iter().position(|c| *c == BackendCall::RewindMedia(media));
        let pause = calls.iter().position(|c| *c == BackendCall::PauseMedia(media));
        assert!(rewind.is_some() && rewind < pause, "Video must rewind then pause");

        backend.clear_calls();
        block_on(item.destroy(&ctx));

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::PauseMedia(media),
                BackendCall::DestroySprite(sprite),
                BackendCall::DestroyTexture(texture, true),
            ]
        );
    }

    #[test]
    fn none_kind_is_never_loaded() {
        let (backend, ctx) = setup();
        let mut item = ResourceItem::new(ResourceKind::None, "placeholder", "nothing");

        assert!(!block_on(item.load(&ctx, 30)));
        assert!(backend.calls().is_empty());
    }
}
