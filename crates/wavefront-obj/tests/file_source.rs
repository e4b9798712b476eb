use std::fs;

use wavefront_core::{Attrib, GeometrySource, MeshBuffers};
use wavefront_obj::{write_obj_file, LoadOptions, ObjError, ObjLoader, ObjWarning, WriteOptions};

const TRIANGLE: &str = "\
mtllib paint.mtl
v 0 0 0
v 1 0 0
v 0 1 0
g tri
usemtl orange
f 1 2 3
";

const PAINT: &str = "\
# two materials
newmtl orange
Ka 0.2 0.1 0
Kd 1 0.5 0
newmtl grey
Kd 0.5 0.5 0.5
";

#[test]
fn mtllib_resolves_next_to_the_obj_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tri.obj"), TRIANGLE).unwrap();
    fs::write(dir.path().join("paint.mtl"), PAINT).unwrap();

    let loader = ObjLoader::open(dir.path().join("tri.obj"), LoadOptions::default());
    assert!(loader.warnings().is_empty());

    let model = loader.model().unwrap();
    assert_eq!(model.materials.len(), 2);

    let buffers = MeshBuffers::from_source(&loader).unwrap();
    assert_eq!(buffers.colors, vec![1.0, 0.5, 0.0, 1.0, 0.5, 0.0, 1.0, 0.5, 0.0]);
}

#[test]
fn missing_material_file_is_recovered() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tri.obj"), TRIANGLE).unwrap();

    let loader = ObjLoader::open(dir.path().join("tri.obj"), LoadOptions::default());
    assert!(!loader.is_failed());
    assert_eq!(loader.num_indices().unwrap(), 3);

    let warnings = loader.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(matches!(warnings[0], ObjWarning::MaterialStreamUnavailable { .. }));
    assert!(matches!(
        warnings[1],
        ObjWarning::UnresolvedMaterialReference { .. }
    ));
    assert!(!loader.available_attribs().contains(Attrib::Color));
}

#[test]
fn missing_obj_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ObjLoader::open(dir.path().join("nope.obj"), LoadOptions::default());
    assert!(loader.is_failed());
    assert!(matches!(
        loader.num_vertices(),
        Err(ObjError::StreamUnavailable { .. })
    ));
}

#[test]
fn write_obj_file_creates_a_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tri.obj"), TRIANGLE).unwrap();
    fs::write(dir.path().join("paint.mtl"), PAINT).unwrap();
    let loader = ObjLoader::open(dir.path().join("tri.obj"), LoadOptions::default());

    let out = dir.path().join("out.obj");
    write_obj_file(&out, &loader, &WriteOptions::default()).unwrap();

    let reloaded = ObjLoader::open(&out, LoadOptions::default());
    assert_eq!(reloaded.num_vertices().unwrap(), 3);
    assert_eq!(reloaded.num_indices().unwrap(), 3);
}
