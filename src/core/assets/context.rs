//=========================================================================
// Asset Context
//=========================================================================
//
// Explicit handle to the engine collaborators, injected into every
// resource set instead of being reached through global state.
//
// The texture cache is process-wide. `acquire_lease()` hands out a single
// `CacheLease` at a time; the app shell holds it for the lifetime of the
// mounted scene so a second scene can never load into a cache the first
// one is about to clear.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::backend::{AssetLoader, MediaLoader, RenderSurface};
use crate::core::error::DecoError;
use crate::core::settings::AudioBackend;

//=== AssetContext ========================================================

/// Cheap-clone bundle of the asset, media and render collaborators.
#[derive(Clone)]
pub struct AssetContext {
    loader: Rc<dyn AssetLoader>,
    media: Rc<dyn MediaLoader>,
    surface: Rc<dyn RenderSurface>,
    audio_backend: AudioBackend,
    leased: Rc<Cell<bool>>,
}

impl AssetContext {
    //--- Construction -----------------------------------------------------

    pub fn new(
        loader: Rc<dyn AssetLoader>,
        media: Rc<dyn MediaLoader>,
        surface: Rc<dyn RenderSurface>,
    ) -> Self {
        Self {
            loader,
            media,
            surface,
            audio_backend: AudioBackend::default(),
            leased: Rc::new(Cell::new(false)),
        }
    }

    /// Builds a context from one backend implementing all three roles.
    pub fn from_backend<B>(backend: Rc<B>) -> Self
    where
        B: AssetLoader + MediaLoader + RenderSurface + 'static,
    {
        let loader: Rc<dyn AssetLoader> = backend.clone();
        let media: Rc<dyn MediaLoader> = backend.clone();
        let surface: Rc<dyn RenderSurface> = backend;
        Self::new(loader, media, surface)
    }

    /// Selects which collaborator produces audio payloads.
    pub fn with_audio_backend(mut self, audio_backend: AudioBackend) -> Self {
        self.audio_backend = audio_backend;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn loader(&self) -> &dyn AssetLoader {
        self.loader.as_ref()
    }

    pub fn media(&self) -> &dyn MediaLoader {
        self.media.as_ref()
    }

    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    pub fn audio_backend(&self) -> AudioBackend {
        self.audio_backend
    }

    //--- Texture Cache ----------------------------------------------------

    /// Drops the global texture cache.
    pub fn clear_texture_cache(&self) {
        debug!(target: "assets", "Clearing texture cache");
        self.surface.clear_texture_cache();
    }

    /// Takes the exclusive cache lease.
    ///
    /// # Errors
    ///
    /// [`DecoError::CacheLeased`] while another lease is alive.
    pub fn acquire_lease(&self) -> Result<CacheLease, DecoError> {
        if self.leased.replace(true) {
            return Err(DecoError::CacheLeased);
        }
        Ok(CacheLease {
            leased: Rc::clone(&self.leased),
        })
    }

    pub fn is_leased(&self) -> bool {
        self.leased.get()
    }
}

//=== CacheLease ==========================================================

/// Exclusive claim on the texture cache; released on drop.
#[derive(Debug)]
pub struct CacheLease {
    leased: Rc<Cell<bool>>,
}

impl Drop for CacheLease {
    fn drop(&mut self) {
        self.leased.set(false);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::memory::MemoryBackend;

    fn context() -> AssetContext {
        AssetContext::from_backend(Rc::new(MemoryBackend::new()))
    }

    #[test]
    fn second_lease_is_refused_until_first_drops() {
        let ctx = context();

        let lease = ctx.acquire_lease().expect("first lease");
        assert!(ctx.is_leased());
        assert_eq!(ctx.acquire_lease().unwrap_err(), DecoError::CacheLeased);

        drop(lease);
        assert!(!ctx.is_leased());
        assert!(ctx.acquire_lease().is_ok());
    }

    #[test]
    fn clones_share_the_lease() {
        let ctx = context();
        let other = ctx.clone();

        let _lease = ctx.acquire_lease().expect("lease");
        assert!(other.acquire_lease().is_err(), "Clones must see the same lease");
    }

    #[test]
    fn audio_backend_defaults_to_sound_engine() {
        let ctx = context();
        assert_eq!(ctx.audio_backend(), AudioBackend::SoundEngine);

        let ctx = ctx.with_audio_backend(AudioBackend::MediaElement);
        assert_eq!(ctx.audio_backend(), AudioBackend::MediaElement);
    }
}
