//! Vertex deduplication and index building.
//!
//! OBJ corners index positions, texture coordinates and normals separately.
//! Renderers want one index per vertex. The builder walks the faces of one
//! group, fans each face into triangles and gives every distinct
//! combination of referenced attributes its own output vertex, in the order
//! the combinations are first seen.

use std::collections::HashMap;

use tracing::debug;
use wavefront_core::{Attrib, AttribSet, Color};

use crate::material::MaterialId;
use crate::model::{Corner, Face, Group, LoadedModel};

/// An indexed triangle list built from one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
}

impl OutputMesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    /// Attributes this mesh carries.
    pub fn attribs(&self) -> AttribSet {
        let mut set = AttribSet::from(Attrib::Position);
        if self.normals.is_some() {
            set.insert(Attrib::Normal);
        }
        if self.tex_coords.is_some() {
            set.insert(Attrib::TexCoord0);
        }
        if self.colors.is_some() {
            set.insert(Attrib::Color);
        }
        set
    }

    /// Flat float view of one attribute buffer.
    pub fn attrib_data(&self, attrib: Attrib) -> Option<&[f32]> {
        match attrib {
            Attrib::Position => Some(bytemuck::cast_slice(&self.positions)),
            Attrib::Normal => self.normals.as_deref().map(bytemuck::cast_slice),
            Attrib::TexCoord0 => self.tex_coords.as_deref().map(bytemuck::cast_slice),
            Attrib::Color => self.colors.as_deref().map(bytemuck::cast_slice),
        }
    }
}

/// Identity of an output vertex.
///
/// Components outside the key shape stay `None`. `material` is only set
/// when the vertex takes its color from the face material, since that is
/// the one case where two corners with equal indices can differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct VertexKey {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
    material: Option<MaterialId>,
}

/// Which attributes take part in vertex identity for one build.
#[derive(Debug, Clone, Copy)]
struct KeyShape {
    tex_coords: bool,
    normals: bool,
    colors: bool,
}

impl KeyShape {
    fn new(model: &LoadedModel, group: &Group, requested: AttribSet) -> Self {
        Self {
            tex_coords: requested.contains(Attrib::TexCoord0) && group.has_tex_coords,
            normals: requested.contains(Attrib::Normal) && group.has_normals,
            colors: requested.contains(Attrib::Color)
                && (model.pools.has_colors() || group.has_materials()),
        }
    }

    fn key(&self, model: &LoadedModel, face: &Face, corner: &Corner) -> VertexKey {
        let material_color =
            self.colors && model.pools.color_of(corner.position).is_none();
        VertexKey {
            position: corner.position,
            tex_coord: corner.tex_coord.filter(|_| self.tex_coords),
            normal: corner.normal.filter(|_| self.normals),
            material: face.material.filter(|_| material_color),
        }
    }
}

/// Build the output mesh for `group`, keeping only the `requested`
/// attributes the group actually has.
pub fn build_mesh(model: &LoadedModel, group: &Group, requested: AttribSet) -> OutputMesh {
    let shape = KeyShape::new(model, group, requested);
    let pools = &model.pools;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();
    let mut colors = Vec::new();
    let mut indices = Vec::with_capacity(group.num_triangles() * 3);
    let mut unique: HashMap<VertexKey, u32> = HashMap::new();

    for face in &group.faces {
        for triangle in face.triangles() {
            for corner in &triangle {
                let key = shape.key(model, face, corner);
                let index = *unique.entry(key).or_insert_with(|| {
                    positions.push(pools.positions[key.position].to_array());
                    if shape.normals {
                        let normal = key.normal.map(|n| pools.normals[n].to_array());
                        normals.push(normal.unwrap_or_default());
                    }
                    if shape.tex_coords {
                        let uv = key.tex_coord.map(|t| pools.tex_coords[t].to_array());
                        tex_coords.push(uv.unwrap_or_default());
                    }
                    if shape.colors {
                        let color = pools
                            .color_of(key.position)
                            .or_else(|| {
                                key.material
                                    .and_then(|id| model.materials.get(id))
                                    .map(|m| m.diffuse)
                            })
                            .unwrap_or(Color::WHITE);
                        colors.push(color.to_array());
                    }
                    (positions.len() - 1) as u32
                });
                indices.push(index);
            }
        }
    }

    debug!(
        "Built mesh for group '{}': {} vertices, {} triangles",
        group.name,
        positions.len(),
        indices.len() / 3
    );

    OutputMesh {
        positions,
        normals: shape.normals.then_some(normals),
        tex_coords: shape.tex_coords.then_some(tex_coords),
        colors: shape.colors.then_some(colors),
        indices,
    }
}
