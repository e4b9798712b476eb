//! Wavefront OBJ - Alias|Wavefront OBJ and MTL loading
//!
//! Parses OBJ geometry statements (and the MTL material statements they
//! reference) into groups of faces over shared attribute pools, then builds
//! an indexed triangle mesh for one selected group, merging corners that
//! reference the same attribute combination into a single output vertex.

mod builder;
mod config;
mod error;
mod loader;
mod material;
mod model;
mod parser;
mod scanner;
mod source;
mod writer;

pub use builder::{build_mesh, OutputMesh};
pub use config::LoadOptions;
pub use error::{ObjError, ObjWarning};
pub use loader::{GroupSelection, ObjLoader};
pub use material::{parse_materials, Material, MaterialId, MaterialTable};
pub use model::{AttributePools, Corner, Face, Group, LoadedModel};
pub use parser::parse_obj;
pub use scanner::{Line, LineScanner};
pub use source::{FileSource, MemorySource, StreamSource};
pub use writer::{write_obj, write_obj_file, WriteError, WriteOptions};
