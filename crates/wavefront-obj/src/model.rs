//! In-memory form of a parsed OBJ file.

use glam::{Vec2, Vec3};
use wavefront_core::Color;

use crate::error::ObjWarning;
use crate::material::{MaterialId, MaterialTable};

/// Raw attribute values in file order. All indices into these are 0-based.
#[derive(Debug, Clone, Default)]
pub struct AttributePools {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    /// Parallel to `positions`: entry `i` colors position `i`, `None` when
    /// the file gave that position no color.
    pub colors: Vec<Option<Color>>,
}

impl AttributePools {
    /// Append a position with its explicit color, if any.
    pub fn push_position(&mut self, position: Vec3, color: Option<Color>) {
        self.positions.push(position);
        self.colors.push(color);
    }

    /// Explicit color of a position, if the file gave one.
    pub fn color_of(&self, position: usize) -> Option<Color> {
        self.colors.get(position).copied().flatten()
    }

    /// Whether any position carries an explicit color.
    pub fn has_colors(&self) -> bool {
        self.colors.iter().any(Option::is_some)
    }
}

/// One face corner. Indices are resolved, 0-based and in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corner {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

/// A convex polygon with at least three corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub corners: Vec<Corner>,
    pub material: Option<MaterialId>,
}

impl Face {
    /// Fan triangulation from corner 0, keeping the original winding.
    pub fn triangles(&self) -> impl Iterator<Item = [Corner; 3]> + '_ {
        let first = self.corners[0];
        self.corners
            .windows(2)
            .skip(1)
            .map(move |pair| [first, pair[0], pair[1]])
    }
}

/// A named run of faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Pool sizes when the group was opened.
    pub base_position_offset: usize,
    pub base_tex_coord_offset: usize,
    pub base_normal_offset: usize,
    pub faces: Vec<Face>,
    pub has_tex_coords: bool,
    pub has_normals: bool,
}

impl Group {
    pub fn new(name: impl Into<String>, pools: &AttributePools) -> Self {
        Self {
            name: name.into(),
            base_position_offset: pools.positions.len(),
            base_tex_coord_offset: pools.tex_coords.len(),
            base_normal_offset: pools.normals.len(),
            faces: Vec::new(),
            has_tex_coords: false,
            has_normals: false,
        }
    }

    pub fn push_face(&mut self, face: Face) {
        self.has_tex_coords |= face.corners.iter().any(|c| c.tex_coord.is_some());
        self.has_normals |= face.corners.iter().any(|c| c.normal.is_some());
        self.faces.push(face);
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn num_triangles(&self) -> usize {
        self.faces.iter().map(|f| f.corners.len() - 2).sum()
    }

    /// Whether any face of the group references a material.
    pub fn has_materials(&self) -> bool {
        self.faces.iter().any(|f| f.material.is_some())
    }

    /// Whether any corner references a position parsed before this group.
    pub fn references_earlier_positions(&self) -> bool {
        self.faces
            .iter()
            .flat_map(|f| f.corners.iter())
            .any(|c| c.position < self.base_position_offset)
    }
}

/// Everything one OBJ load produced.
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub groups: Vec<Group>,
    pub pools: AttributePools,
    pub materials: MaterialTable,
    pub warnings: Vec<ObjWarning>,
}

impl LoadedModel {
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }

    pub fn warnings(&self) -> &[ObjWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(position: usize) -> Corner {
        Corner {
            position,
            tex_coord: None,
            normal: None,
        }
    }

    #[test]
    fn color_of_distinguishes_uncolored_positions() {
        let mut pools = AttributePools::default();
        pools.push_position(Vec3::ZERO, None);
        pools.push_position(Vec3::X, Some(Color::WHITE));
        assert_eq!(pools.color_of(0), None);
        assert_eq!(pools.color_of(1), Some(Color::WHITE));
        assert_eq!(pools.color_of(2), None);
        assert!(pools.has_colors());
    }

    #[test]
    fn quad_fans_into_two_triangles() {
        let face = Face {
            corners: (0..4).map(corner).collect(),
            material: None,
        };
        let tris: Vec<Vec<usize>> = face
            .triangles()
            .map(|t| t.iter().map(|c| c.position).collect())
            .collect();
        assert_eq!(tris, vec![vec![0, 1, 2], vec![0, 2, 3]]);
    }

    #[test]
    fn triangle_fans_into_itself() {
        let face = Face {
            corners: (0..3).map(corner).collect(),
            material: None,
        };
        assert_eq!(face.triangles().count(), 1);
    }

    #[test]
    fn group_flags_follow_faces() {
        let mut pools = AttributePools::default();
        pools.push_position(Vec3::ZERO, None);
        let mut group = Group::new("g", &pools);
        assert_eq!(group.base_position_offset, 1);

        group.push_face(Face {
            corners: vec![corner(0), corner(0), corner(0)],
            material: None,
        });
        assert!(!group.has_normals);
        assert!(!group.has_tex_coords);
        assert!(group.references_earlier_positions());

        let mut with_normal = corner(1);
        with_normal.normal = Some(0);
        group.push_face(Face {
            corners: vec![with_normal, corner(1), corner(1), corner(1)],
            material: Some(MaterialId(0)),
        });
        assert!(group.has_normals);
        assert!(!group.has_tex_coords);
        assert!(group.has_materials());
        assert_eq!(group.num_triangles(), 3);
    }
}
