//=========================================================================
// Error Taxonomy
//=========================================================================
//
// Errors surfaced by the container lifecycle and the app shell.
//
// Asset-load and media-readiness failures are deliberately absent from
// the lifecycle path: they degrade a single item and are logged where
// they happen. What remains here is misuse of the exactly-once
// contracts and structural violations (unknown scene, cache leased).
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneState;

//=== LifecycleError ======================================================

/// Rejected lifecycle call. The guarded work was not performed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// `initialize` called on a container that already ran it.
    #[error("{name} is already initialized")]
    AlreadyInitialized { name: String },

    /// `uninitialize` called before initialization finished.
    #[error("{name} is not initialized")]
    NotInitialized { name: String },

    /// `load` called twice without an `unload` in between.
    #[error("resources are already loaded")]
    AlreadyLoaded,

    /// `unload` called on a resource set that holds nothing.
    #[error("resources are not loaded")]
    NotLoaded,

    /// State machine transition not allowed from the current state.
    #[error("{name}: cannot {action} while {from:?}")]
    InvalidTransition {
        name: String,
        from: SceneState,
        action: &'static str,
    },
}

//=== MediaError ==========================================================

/// Readiness failure reported by the media collaborator.
///
/// Items convert this into `loaded == false` plus a log line; it never
/// travels further up than the item that requested the media.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("media {path} could not be read: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("media {path} has an unsupported format")]
    Unsupported { path: String },
}

//=== DecoError ===========================================================

/// Top-level error for app shell operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoError {
    /// No factory is registered under the requested scene name.
    #[error("no scene registered under {0:?}")]
    UnknownScene(String),

    /// Another scene still holds the texture cache lease.
    #[error("texture cache is leased by another scene")]
    CacheLeased,

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Convenience alias used by shell-level APIs.
pub type DecoResult<T> = Result<T, DecoError>;

//=========================================================================
// Unit Tests
//=========================================================================
