//=========================================================================
// App Context
//=========================================================================
//
// Everything a scene or widget needs from its app, passed explicitly at
// construction.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetContext;
use crate::core::events::EventSender;
use crate::core::settings::Settings;
use crate::core::store::ActivityStore;

//=== AppContext ==========================================================

/// Shared handles handed to scene and widget factories.
#[derive(Clone)]
pub struct AppContext {
    pub assets: AssetContext,
    pub settings: Rc<Settings>,
    pub events: EventSender,
    pub store: ActivityStore,
}

impl AppContext {
    /// Bundles the handles; the asset context follows the configured
    /// audio backend.
    pub fn new(
        assets: AssetContext,
        settings: Rc<Settings>,
        events: EventSender,
        store: ActivityStore,
    ) -> Self {
        let assets = assets.with_audio_backend(settings.audio_backend);
        Self {
            assets,
            settings,
            events,
            store,
        }
    }
}
