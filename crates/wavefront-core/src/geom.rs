//! Geometry source/target interface
//!
//! A [`GeometrySource`] describes a mesh (vertex count, index count,
//! primitive kind, per-attribute widths) and can copy it into any
//! [`GeometryTarget`]. Loaders implement the source side; renderers and
//! writers implement the target side.

use std::fmt;

/// A per-vertex attribute kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attrib {
    Position,
    Normal,
    TexCoord0,
    Color,
}

impl Attrib {
    /// Every attribute kind, in buffer order.
    pub const ALL: [Attrib; 4] = [
        Attrib::Position,
        Attrib::Normal,
        Attrib::TexCoord0,
        Attrib::Color,
    ];

    fn bit(self) -> u8 {
        match self {
            Attrib::Position => 1 << 0,
            Attrib::Normal => 1 << 1,
            Attrib::TexCoord0 => 1 << 2,
            Attrib::Color => 1 << 3,
        }
    }
}

impl fmt::Display for Attrib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attrib::Position => "position",
            Attrib::Normal => "normal",
            Attrib::TexCoord0 => "texcoord0",
            Attrib::Color => "color",
        };
        f.write_str(name)
    }
}

/// A small set of [`Attrib`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttribSet(u8);

impl AttribSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every attribute kind.
    pub fn all() -> Self {
        Attrib::ALL.into_iter().collect()
    }

    /// Builder-style insert.
    pub fn with(mut self, attrib: Attrib) -> Self {
        self.insert(attrib);
        self
    }

    pub fn insert(&mut self, attrib: Attrib) {
        self.0 |= attrib.bit();
    }

    pub fn remove(&mut self, attrib: Attrib) {
        self.0 &= !attrib.bit();
    }

    pub fn contains(&self, attrib: Attrib) -> bool {
        self.0 & attrib.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Attributes present in both sets.
    pub fn intersection(&self, other: AttribSet) -> AttribSet {
        AttribSet(self.0 & other.0)
    }

    /// Iterate the contained attributes in buffer order.
    pub fn iter(&self) -> impl Iterator<Item = Attrib> {
        let set = *self;
        Attrib::ALL.into_iter().filter(move |a| set.contains(*a))
    }
}

impl From<Attrib> for AttribSet {
    fn from(attrib: Attrib) -> Self {
        AttribSet::empty().with(attrib)
    }
}

impl FromIterator<Attrib> for AttribSet {
    fn from_iter<I: IntoIterator<Item = Attrib>>(iter: I) -> Self {
        let mut set = AttribSet::empty();
        for attrib in iter {
            set.insert(attrib);
        }
        set
    }
}

/// How the index buffer is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

/// Receiver of a bulk geometry copy.
pub trait GeometryTarget {
    /// Receive one attribute buffer, `dims` floats per vertex.
    fn copy_attrib(&mut self, attrib: Attrib, dims: u8, data: &[f32]);

    /// Receive the index buffer.
    fn copy_indices(&mut self, primitive: Primitive, indices: &[u32]);
}

/// A mesh that can describe itself and copy its buffers into a target.
pub trait GeometrySource {
    type Error: std::error::Error + 'static;

    fn num_vertices(&self) -> Result<usize, Self::Error>;

    fn num_indices(&self) -> Result<usize, Self::Error>;

    fn primitive(&self) -> Primitive;

    /// Floats per vertex for `attrib`, or 0 if the source never has it.
    fn attrib_dims(&self, attrib: Attrib) -> u8;

    fn available_attribs(&self) -> AttribSet;

    /// Copy the requested attributes (those also available) and the index
    /// buffer into `target`.
    fn load_into(
        &self,
        target: &mut dyn GeometryTarget,
        requested: AttribSet,
    ) -> Result<(), Self::Error>;
}

/// A [`GeometryTarget`] that keeps flat copies of every buffer it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub tex_coords: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
    pub primitive: Option<Primitive>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy everything `source` has to offer.
    pub fn from_source<S: GeometrySource>(source: &S) -> Result<Self, S::Error> {
        let mut buffers = Self::new();
        source.load_into(&mut buffers, source.available_attribs())?;
        Ok(buffers)
    }

    /// The flat buffer for `attrib`.
    pub fn attrib(&self, attrib: Attrib) -> &[f32] {
        match attrib {
            Attrib::Position => &self.positions,
            Attrib::Normal => &self.normals,
            Attrib::TexCoord0 => &self.tex_coords,
            Attrib::Color => &self.colors,
        }
    }

    /// Raw bytes of an attribute buffer, ready for upload.
    pub fn attrib_bytes(&self, attrib: Attrib) -> &[u8] {
        bytemuck::cast_slice(self.attrib(attrib))
    }

    /// Raw bytes of the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn has(&self, attrib: Attrib) -> bool {
        !self.attrib(attrib).is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, index: usize) -> [f32; 3] {
        let p = &self.positions[index * 3..index * 3 + 3];
        [p[0], p[1], p[2]]
    }

    pub fn normal(&self, index: usize) -> [f32; 3] {
        let n = &self.normals[index * 3..index * 3 + 3];
        [n[0], n[1], n[2]]
    }

    pub fn tex_coord(&self, index: usize) -> [f32; 2] {
        let t = &self.tex_coords[index * 2..index * 2 + 2];
        [t[0], t[1]]
    }

    /// Index triples, one per triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

impl GeometryTarget for MeshBuffers {
    fn copy_attrib(&mut self, attrib: Attrib, _dims: u8, data: &[f32]) {
        let buffer = match attrib {
            Attrib::Position => &mut self.positions,
            Attrib::Normal => &mut self.normals,
            Attrib::TexCoord0 => &mut self.tex_coords,
            Attrib::Color => &mut self.colors,
        };
        buffer.clear();
        buffer.extend_from_slice(data);
    }

    fn copy_indices(&mut self, primitive: Primitive, indices: &[u32]) {
        self.primitive = Some(primitive);
        self.indices.clear();
        self.indices.extend_from_slice(indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrib_set_membership() {
        let set = AttribSet::from(Attrib::Position).with(Attrib::Normal);
        assert!(set.contains(Attrib::Position));
        assert!(set.contains(Attrib::Normal));
        assert!(!set.contains(Attrib::Color));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Attrib::Position, Attrib::Normal]
        );
    }

    #[test]
    fn attrib_set_intersection_and_remove() {
        let mut all = AttribSet::all();
        all.remove(Attrib::TexCoord0);
        let other: AttribSet = [Attrib::TexCoord0, Attrib::Color].into_iter().collect();
        assert_eq!(all.intersection(other), AttribSet::from(Attrib::Color));
        assert!(AttribSet::empty().is_empty());
    }

    #[test]
    fn mesh_buffers_collects_copies() {
        let mut buffers = MeshBuffers::new();
        buffers.copy_attrib(Attrib::Position, 3, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        buffers.copy_attrib(Attrib::TexCoord0, 2, &[0.5, 0.25, 1.0, 0.0]);
        buffers.copy_indices(Primitive::Triangles, &[0, 1, 1]);

        assert_eq!(buffers.vertex_count(), 2);
        assert_eq!(buffers.position(1), [3.0, 4.0, 5.0]);
        assert_eq!(buffers.tex_coord(0), [0.5, 0.25]);
        assert!(!buffers.has(Attrib::Normal));
        assert_eq!(buffers.primitive, Some(Primitive::Triangles));
        assert_eq!(buffers.triangles().collect::<Vec<_>>(), vec![[0, 1, 1]]);
        assert_eq!(buffers.index_bytes().len(), 12);
        assert_eq!(buffers.attrib_bytes(Attrib::Position).len(), 24);
    }
}
