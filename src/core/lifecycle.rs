//=========================================================================
// Lifecycle
//=========================================================================

//=== External Dependencies ===============================================

use futures::future::LocalBoxFuture;

//=== Internal Dependencies ===============================================

use crate::core::error::LifecycleError;

//=== Lifecycle Trait =====================================================

/// Initialize / uninitialize envelope shared by scenes and widgets.
///
/// Both calls are guarded: a call the current state does not allow
/// returns a [`LifecycleError`] and performs no work.
pub trait Lifecycle {
    fn initialize(&mut self) -> LocalBoxFuture<'_, Result<(), LifecycleError>>;

    fn uninitialize(&mut self) -> LocalBoxFuture<'_, Result<(), LifecycleError>>;

    /// True while the container is live and accepting input.
    fn is_running(&self) -> bool;
}
