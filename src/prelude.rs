//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use deco_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};

// App shell
pub use crate::core::app::{AppContext, AppShell};
pub use crate::core::settings::{AudioBackend, Settings};
pub use crate::core::store::{ActivityState, ActivityStore};
pub use crate::core::events::{AppEvent, EventParameter, EventSource};

// Containers
pub use crate::core::lifecycle::Lifecycle;
pub use crate::core::scene::{SceneBehavior, SceneContainer, SceneCore, SceneState};
pub use crate::core::widget::{WidgetBehavior, WidgetContainer, WidgetCore};

// Resources
pub use crate::core::assets::{
    AssetContext, MemoryBackend, ResourceItem, ResourceKind, ResourceSet,
};

// Input
pub use crate::core::input::PointerEvent;

// Errors
pub use crate::core::error::{DecoError, DecoResult, LifecycleError, MediaError};
