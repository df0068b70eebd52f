//=========================================================================
// Click Effect
//=========================================================================
//
// Short feedback animation + sound played at every pointer-down on a
// scene.
//
// The effect alternates between two animation poses so repeated taps
// read as distinct feedback. Its two resources are declared into the
// scene's resource set at construction and wired after load; when either
// is missing the effect runs degraded (still cycles, plays what exists).
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetContext, AudioHandle, ResourceKind, ResourceSet, SkeletonId};
use crate::core::settings::Settings;

//=== ClickEffect =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wiring {
    skeleton: Option<SkeletonId>,
    audio: Option<AudioHandle>,
}

#[derive(Debug, Clone)]
pub struct ClickEffect {
    audio_path: String,
    skeleton_path: String,
    animations: [String; 2],
    index: usize,
    wiring: Option<Wiring>,
}

impl ClickEffect {
    pub fn new(settings: &Settings) -> Self {
        Self {
            audio_path: settings.click_effect_audio.clone(),
            skeleton_path: settings.click_effect_skeleton.clone(),
            animations: settings.click_effect_animations.clone(),
            index: 0,
            wiring: None,
        }
    }

    /// Registers the effect's sound and skeleton with `resources`.
    pub fn declare(&self, resources: &mut ResourceSet) {
        resources.add_resource_item(ResourceKind::Audio, &self.audio_path);
        resources.add_resource_item(ResourceKind::VectorSkeleton, &self.skeleton_path);
    }

    /// Attaches the loaded skeleton above everything else in the scene.
    pub fn wire(&mut self, resources: &ResourceSet, z_index: i32) {
        let skeleton = resources.get_vector_skeleton(&self.skeleton_path);
        let audio = resources.get_audio(&self.audio_path);

        match skeleton {
            Some(skeleton) => {
                let surface = resources.context().surface();
                surface.attach_skeleton(resources.node(), skeleton, z_index);
                surface.set_skeleton_visible(skeleton, false);
            }
            None => warn!(target: "scene", "Click effect skeleton missing: {}", self.skeleton_path),
        }
        if audio.is_none() {
            warn!(target: "scene", "Click effect sound missing: {}", self.audio_path);
        }

        self.wiring = Some(Wiring { skeleton, audio });
    }

    /// Detaches the skeleton and forgets the handles.
    pub fn unwire(&mut self, resources: &ResourceSet) {
        let Some(wiring) = self.wiring.take() else {
            return;
        };
        let ctx = resources.context();
        if let Some(audio) = wiring.audio {
            stop(ctx, audio);
        }
        if let Some(skeleton) = wiring.skeleton {
            ctx.surface().detach_skeleton(resources.node(), skeleton);
        }
    }

    /// Plays the next pose at `(x, y)`.
    ///
    /// Returns the pose index used, or `None` when the effect is not wired.
    pub fn trigger(&mut self, ctx: &AssetContext, x: f32, y: f32) -> Option<usize> {
        let wiring = self.wiring?;
        let index = self.index;
        self.index = (self.index + 1) % self.animations.len();

        if let Some(skeleton) = wiring.skeleton {
            ctx.surface().set_skeleton_visible(skeleton, true);
            ctx.surface().play_skeleton(skeleton, &self.animations[index], x, y);
        }
        if let Some(audio) = wiring.audio {
            play(ctx, audio);
        }

        debug!(target: "scene", "Click effect pose {} at ({}, {})", index, x, y);
        Some(index)
    }

    pub fn hide(&self, ctx: &AssetContext) {
        if let Some(skeleton) = self.wiring.and_then(|w| w.skeleton) {
            ctx.surface().set_skeleton_visible(skeleton, false);
        }
    }

    /// Pose the next trigger will use.
    pub fn next_index(&self) -> usize {
        self.index
    }

    pub fn is_wired(&self) -> bool {
        self.wiring.is_some()
    }
}

fn play(ctx: &AssetContext, audio: AudioHandle) {
    match audio {
        AudioHandle::Sound(sound) => ctx.media().play_sound(sound),
        AudioHandle::Element(media) => {
            ctx.media().rewind_media(media);
            ctx.media().play_media(media);
        }
    }
}

fn stop(ctx: &AssetContext, audio: AudioHandle) {
    match audio {
        AudioHandle::Sound(sound) => ctx.media().pause_sound(sound),
        AudioHandle::Element(media) => ctx.media().pause_media(media),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::{BackendCall, MemoryBackend};
    use futures::executor::block_on;
    use std::rc::Rc;

    fn loaded_set(backend: &Rc<MemoryBackend>, effect: &ClickEffect) -> ResourceSet {
        let mut set = ResourceSet::new(AssetContext::from_backend(backend.clone()), []);
        effect.declare(&mut set);
        block_on(set.load()).expect("load");
        set
    }

    #[test]
    fn trigger_before_wiring_does_nothing() {
        let backend = Rc::new(MemoryBackend::new());
        let mut effect = ClickEffect::new(&Settings::default());
        let ctx = AssetContext::from_backend(backend.clone());

        assert_eq!(effect.trigger(&ctx, 1.0, 1.0), None);
        assert_eq!(effect.next_index(), 0);
    }

    #[test]
    fn poses_alternate_between_two_animations() {
        let backend = Rc::new(MemoryBackend::new());
        let mut effect = ClickEffect::new(&Settings::default());
        let set = loaded_set(&backend, &effect);
        effect.wire(&set, 100);

        let poses: Vec<_> = (0..3)
            .filter_map(|_| effect.trigger(set.context(), 10.0, 20.0))
            .collect();

        assert_eq!(poses, [0, 1, 0]);
        let played: Vec<_> = backend
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::PlaySkeleton(_, name) => Some(name),
                _ => None,
            })
            .collect();
        assert_eq!(played, ["01", "02", "01"]);
        assert_eq!(backend.count(|c| matches!(c, BackendCall::PlaySound(_))), 3);
    }

    #[test]
    fn missing_assets_degrade_without_stopping_the_cycle() {
        let settings = Settings::default();
        let backend = Rc::new(MemoryBackend::new().with_missing(settings.click_effect_skeleton.clone()));
        let mut effect = ClickEffect::new(&settings);
        let set = loaded_set(&backend, &effect);
        effect.wire(&set, 100);

        assert_eq!(effect.trigger(set.context(), 0.0, 0.0), Some(0));
        assert_eq!(effect.trigger(set.context(), 0.0, 0.0), Some(1));
        assert_eq!(backend.count(|c| matches!(c, BackendCall::PlaySkeleton(..))), 0);
        assert_eq!(backend.count(|c| matches!(c, BackendCall::PlaySound(_))), 2);
    }

    #[test]
    fn unwire_detaches_the_skeleton() {
        let backend = Rc::new(MemoryBackend::new());
        let mut effect = ClickEffect::new(&Settings::default());
        let set = loaded_set(&backend, &effect);
        effect.wire(&set, 100);
        assert_eq!(backend.child_count(set.node()), 1);

        effect.unwire(&set);

        assert!(!effect.is_wired());
        assert_eq!(backend.child_count(set.node()), 0);
    }
}
