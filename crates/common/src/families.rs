//! Asset family table: the content categories the pipeline publishes and the
//! file formats each one accepts.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Model,
    Rig,
    Animation,
    Material,
    Texture,
    Scene,
    Camera,
    Lighting,
}

pub const ALL: [Family; 8] = [
    Family::Model,
    Family::Rig,
    Family::Animation,
    Family::Material,
    Family::Texture,
    Family::Scene,
    Family::Camera,
    Family::Lighting,
];

impl Family {
    pub fn parse(name: &str) -> Option<Family> {
        match name.trim().to_lowercase().as_str() {
            "model" => Some(Family::Model),
            "rig" => Some(Family::Rig),
            "animation" => Some(Family::Animation),
            "material" => Some(Family::Material),
            "texture" => Some(Family::Texture),
            "scene" => Some(Family::Scene),
            "camera" => Some(Family::Camera),
            "lighting" => Some(Family::Lighting),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Model => "model",
            Family::Rig => "rig",
            Family::Animation => "animation",
            Family::Material => "material",
            Family::Texture => "texture",
            Family::Scene => "scene",
            Family::Camera => "camera",
            Family::Lighting => "lighting",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Family::Model => "3D Model",
            Family::Rig => "Character Rig",
            Family::Animation => "Animation",
            Family::Material => "Material",
            Family::Texture => "Texture",
            Family::Scene => "Scene Setup",
            Family::Camera => "Camera",
            Family::Lighting => "Lighting Setup",
        }
    }

    /// File extensions (lowercase, no dot) accepted for uploads of this family.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Family::Model => &["ma", "mb", "fbx", "obj", "abc"],
            Family::Rig => &["ma", "mb"],
            Family::Animation => &["ma", "mb", "abc", "fbx"],
            Family::Material => &["ma", "mb", "json"],
            Family::Texture => &["jpg", "png", "tga", "exr", "hdr", "tiff"],
            Family::Scene => &["ma", "mb", "json"],
            Family::Camera => &["ma", "mb", "abc"],
            Family::Lighting => &["ma", "mb"],
        }
    }

    pub fn allows_extension(self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.extensions().contains(&ext.as_str())
    }
}

pub fn is_known(name: &str) -> bool {
    Family::parse(name).is_some()
}

/// Families that support a given file extension.
pub fn families_for_extension(ext: &str) -> Vec<Family> {
    ALL.iter().copied().filter(|f| f.allows_extension(ext)).collect()
}
