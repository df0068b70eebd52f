//=========================================================================
// Settings
//=========================================================================
//
// Static values shared by the whole activity: surface size, layering,
// audio backend selection and the click-feedback effect assets.
//
//=========================================================================

//=== AudioBackend ========================================================

/// Which collaborator produces audio payloads.
///
/// `SoundEngine` items hold a sound handle that is paused and destroyed on
/// release. `MediaElement` items hold a media element that is only paused,
/// so the element can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioBackend {
    #[default]
    SoundEngine,
    MediaElement,
}

//=== Settings ============================================================

/// Activity-wide configuration.
///
/// # Default Values
///
/// - **Surface**: 1300 x 780
/// - **Layers**: scene 1, widget 10, top-most 100
/// - **Audio**: [`AudioBackend::SoundEngine`]
/// - **Click effect**: `./resources/common/Effects_Click.{mp3,json}`,
///   animations `"01"` / `"02"`
/// - **Video texture refresh**: 30 fps
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub title: String,
    pub surface_width: u32,
    pub surface_height: u32,

    pub scene_z_index: i32,
    pub widget_z_index: i32,
    pub top_most_z_index: i32,

    pub audio_backend: AudioBackend,

    pub click_effect_audio: String,
    pub click_effect_skeleton: String,
    pub click_effect_animations: [String; 2],

    pub video_update_fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Deco Stage".to_string(),
            surface_width: 1300,
            surface_height: 780,
            scene_z_index: 1,
            widget_z_index: 10,
            top_most_z_index: 100,
            audio_backend: AudioBackend::SoundEngine,
            click_effect_audio: "./resources/common/Effects_Click.mp3".to_string(),
            click_effect_skeleton: "./resources/common/Effects_Click.json".to_string(),
            click_effect_animations: ["01".to_string(), "02".to_string()],
            video_update_fps: 30,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
