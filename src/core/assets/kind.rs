//=========================================================================
// Resource Kind
//=========================================================================

use std::fmt;

/// Closed set of asset kinds a container can declare.
///
/// The kind selects both the loader used by `load()` and the release
/// procedure used by `destroy()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceKind {
    /// Registered but never loaded.
    #[default]
    None,
    Image,
    Audio,
    Video,
    /// Bone/keyframe driven 2D animation.
    VectorSkeleton,
}

impl ResourceKind {
    /// Kinds warmed by the background prefetch and loaded in the second
    /// blocking phase.
    pub fn is_prefetchable(self) -> bool {
        matches!(self, ResourceKind::Image | ResourceKind::VectorSkeleton)
    }

    /// Kinds backed by a media element, loaded in the first blocking phase.
    pub fn is_media(self) -> bool {
        matches!(self, ResourceKind::Audio | ResourceKind::Video)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::None => "none",
            ResourceKind::Image => "image",
            ResourceKind::Audio => "audio",
            ResourceKind::Video => "video",
            ResourceKind::VectorSkeleton => "vector skeleton",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_partition_loadable_kinds() {
        for kind in [
            ResourceKind::Image,
            ResourceKind::Audio,
            ResourceKind::Video,
            ResourceKind::VectorSkeleton,
        ] {
            assert!(
                kind.is_media() ^ kind.is_prefetchable(),
                "{kind} must belong to exactly one load phase"
            );
        }
        assert!(!ResourceKind::None.is_media());
        assert!(!ResourceKind::None.is_prefetchable());
    }
}
