//! OBJ loader: parse once, select a group, serve the cached mesh.

use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use wavefront_core::{Attrib, AttribSet, GeometrySource, GeometryTarget, Primitive};

use crate::builder::{build_mesh, OutputMesh};
use crate::config::LoadOptions;
use crate::error::{ObjError, ObjWarning};
use crate::model::{Group, LoadedModel};
use crate::parser::ObjParser;
use crate::source::{FileSource, StreamSource};

/// Which group the output mesh is built from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupSelection {
    /// The first group.
    #[default]
    Default,
    Index(usize),
    Name(String),
}

impl fmt::Display for GroupSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSelection::Default => write!(f, "#0"),
            GroupSelection::Index(index) => write!(f, "#{index}"),
            GroupSelection::Name(name) => write!(f, "'{name}'"),
        }
    }
}

enum CacheState {
    NotBuilt,
    Built(Arc<OutputMesh>),
}

/// Loads an Alias|Wavefront OBJ stream and serves one group of it as an
/// indexed triangle mesh.
///
/// Parsing happens at construction. A failed parse leaves the loader in a
/// failed state: every geometry access returns the parse error. The output
/// mesh is built on first access and reused afterwards.
pub struct ObjLoader {
    model: Result<LoadedModel, ObjError>,
    options: LoadOptions,
    selection: GroupSelection,
    cache: Mutex<CacheState>,
}

impl ObjLoader {
    /// Parse `reader`. `mtllib` statements cannot be resolved and are
    /// reported as warnings.
    pub fn new<R: BufRead>(reader: R, options: LoadOptions) -> Self {
        Self::from_parse(ObjParser::new(&options, None).parse(reader), options)
    }

    /// Parse `reader`, opening `mtllib` references through `source`.
    pub fn with_source<R: BufRead>(
        reader: R,
        source: &dyn StreamSource,
        options: LoadOptions,
    ) -> Self {
        Self::from_parse(ObjParser::new(&options, Some(source)).parse(reader), options)
    }

    /// Parse `reader` with materials taken from a separate `materials` stream.
    pub fn with_materials<R: BufRead, M: BufRead>(
        reader: R,
        materials: M,
        options: LoadOptions,
    ) -> Self {
        let mut parser = ObjParser::new(&options, None);
        parser.preload_materials("<material stream>", materials);
        Self::from_parse(parser.parse(reader), options)
    }

    /// Open `name` through `source` and parse it; `mtllib` references use the
    /// same source.
    pub fn from_source(source: &dyn StreamSource, name: &str, options: LoadOptions) -> Self {
        match source.open(name) {
            Ok(reader) => Self::with_source(reader, source, options),
            Err(e) => Self::from_parse(Err(ObjError::stream_unavailable(name, e)), options),
        }
    }

    /// Load an OBJ file, resolving material libraries next to it.
    pub fn open(path: impl AsRef<Path>, options: LoadOptions) -> Self {
        let path = path.as_ref();
        let source = FileSource::for_file(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_source(&source, &name, options)
    }

    /// Parse in-memory OBJ text.
    pub fn from_text(text: &str, options: LoadOptions) -> Self {
        Self::new(text.as_bytes(), options)
    }

    fn from_parse(model: Result<LoadedModel, ObjError>, options: LoadOptions) -> Self {
        if let Err(e) = &model {
            debug!("OBJ load failed: {}", e);
        }
        Self {
            model,
            options,
            selection: GroupSelection::Default,
            cache: Mutex::new(CacheState::NotBuilt),
        }
    }

    /// Build from the group at `index`. Discards a previously built mesh.
    pub fn select_group_index(&mut self, index: usize) -> &mut Self {
        self.select(GroupSelection::Index(index))
    }

    /// Build from the first group called `name`. Discards a previously
    /// built mesh.
    pub fn select_group_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.select(GroupSelection::Name(name.into()))
    }

    fn select(&mut self, selection: GroupSelection) -> &mut Self {
        let cache = self.cache.get_mut();
        if matches!(cache, CacheState::Built(_)) && self.selection != selection {
            debug!("Group selection changed to {}, dropping built mesh", selection);
        }
        *cache = CacheState::NotBuilt;
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> &GroupSelection {
        &self.selection
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// The parsed model, or the error that stopped the parse.
    pub fn model(&self) -> Result<&LoadedModel, ObjError> {
        self.model.as_ref().map_err(|e| e.clone())
    }

    pub fn error(&self) -> Option<&ObjError> {
        self.model.as_ref().err()
    }

    pub fn is_failed(&self) -> bool {
        self.model.is_err()
    }

    /// Groups in file order; empty for a failed load.
    pub fn groups(&self) -> &[Group] {
        match &self.model {
            Ok(model) => &model.groups,
            Err(_) => &[],
        }
    }

    pub fn num_groups(&self) -> usize {
        self.groups().len()
    }

    /// Warnings recovered from during the load.
    pub fn warnings(&self) -> &[ObjWarning] {
        match &self.model {
            Ok(model) => model.warnings(),
            Err(_) => &[],
        }
    }

    /// The selected group. `None` only for a model without faces under the
    /// default selection.
    pub fn selected_group(&self) -> Result<Option<&Group>, ObjError> {
        let model = self.model()?;
        let index = match &self.selection {
            GroupSelection::Default if model.groups.is_empty() => return Ok(None),
            GroupSelection::Default => Some(0),
            GroupSelection::Index(index) => Some(*index).filter(|i| *i < model.groups.len()),
            GroupSelection::Name(name) => model.group_index(name),
        };
        match index {
            Some(index) => Ok(Some(&model.groups[index])),
            None => Err(ObjError::InvalidGroupSelection {
                selection: self.selection.to_string(),
                available: model.groups.len(),
            }),
        }
    }

    /// The output mesh, built on first call.
    ///
    /// Concurrent first calls build once; the others wait and share it.
    pub fn output_mesh(&self) -> Result<Arc<OutputMesh>, ObjError> {
        let model = self.model()?;
        let mut cache = self.cache.lock();
        if let CacheState::Built(mesh) = &*cache {
            return Ok(Arc::clone(mesh));
        }

        let mesh = match self.selected_group()? {
            Some(group) => build_mesh(model, group, self.options.requested_attribs()),
            None => OutputMesh::default(),
        };
        let mesh = Arc::new(mesh);
        *cache = CacheState::Built(Arc::clone(&mesh));
        Ok(mesh)
    }
}

impl GeometrySource for ObjLoader {
    type Error = ObjError;

    fn num_vertices(&self) -> Result<usize, ObjError> {
        Ok(self.output_mesh()?.num_vertices())
    }

    fn num_indices(&self) -> Result<usize, ObjError> {
        Ok(self.output_mesh()?.num_indices())
    }

    fn primitive(&self) -> Primitive {
        Primitive::Triangles
    }

    fn attrib_dims(&self, attrib: Attrib) -> u8 {
        match attrib {
            Attrib::Position | Attrib::Normal | Attrib::Color => 3,
            Attrib::TexCoord0 => 2,
        }
    }

    fn available_attribs(&self) -> AttribSet {
        let Ok(model) = &self.model else {
            return AttribSet::empty();
        };

        let mut set = AttribSet::from(Attrib::Position);
        if model.groups.iter().any(|g| g.has_normals) {
            set.insert(Attrib::Normal);
        }
        if model.groups.iter().any(|g| g.has_tex_coords) {
            set.insert(Attrib::TexCoord0);
        }
        if model.pools.has_colors() || model.groups.iter().any(Group::has_materials) {
            set.insert(Attrib::Color);
        }
        set.intersection(self.options.requested_attribs())
    }

    fn load_into(
        &self,
        target: &mut dyn GeometryTarget,
        requested: AttribSet,
    ) -> Result<(), ObjError> {
        let mesh = self.output_mesh()?;
        for attrib in requested.intersection(mesh.attribs()).iter() {
            if let Some(data) = mesh.attrib_data(attrib) {
                target.copy_attrib(attrib, self.attrib_dims(attrib), data);
            }
        }
        target.copy_indices(self.primitive(), &mesh.indices);
        Ok(())
    }
}
