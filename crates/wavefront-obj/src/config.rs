//! Options that shape a load.

use serde::{Deserialize, Serialize};
use wavefront_core::{Attrib, AttribSet};

/// Which optional attributes a load keeps. Fixed when the loader is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Keep normal indices from face statements.
    pub load_normals: bool,
    /// Keep texture coordinate indices from face statements.
    pub load_tex_coords: bool,
    /// Build per-vertex colors (explicit vertex colors, else material diffuse).
    pub load_colors: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            load_normals: true,
            load_tex_coords: true,
            load_colors: true,
        }
    }
}

impl LoadOptions {
    /// Positions only.
    pub fn positions_only() -> Self {
        Self {
            load_normals: false,
            load_tex_coords: false,
            load_colors: false,
        }
    }

    /// The attribute set these options allow in a built mesh.
    pub fn requested_attribs(&self) -> AttribSet {
        let mut set = AttribSet::from(Attrib::Position);
        if self.load_normals {
            set.insert(Attrib::Normal);
        }
        if self.load_tex_coords {
            set.insert(Attrib::TexCoord0);
        }
        if self.load_colors {
            set.insert(Attrib::Color);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requests_everything() {
        let options = LoadOptions::default();
        assert_eq!(options.requested_attribs(), AttribSet::all());
    }

    #[test]
    fn positions_only_requests_position() {
        let set = LoadOptions::positions_only().requested_attribs();
        assert_eq!(set, AttribSet::from(Attrib::Position));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: LoadOptions = toml::from_str("load_colors = false").unwrap();
        assert!(options.load_normals);
        assert!(options.load_tex_coords);
        assert!(!options.load_colors);
    }
}
